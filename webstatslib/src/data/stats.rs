//! Core data structures for access-log statistics.
//!
//! Two layers of counters exist:
//!
//! - **[`Accumulator`]**: six counters owned by one file task. Each worker
//!   parses its lines into a private accumulator; nothing else touches it.
//! - **[`StatsAggregator`]**: the run-wide counter set. Workers hand their
//!   accumulator over through [`StatsAggregator::merge`], once per file, and
//!   the final [`Report`] is read after every worker has joined.
//!
//! Counters are `f64`: very large logs cannot overflow them, and values stay
//! exact up to 2^53.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};
use std::sync::{Mutex, MutexGuard};

/// Bytes per mebibyte, used for the "MB transferred" column.
pub const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Per-task statistics for one log file.
///
/// - `total_gets`: every line fed to the parser
/// - `failed_gets`: lines whose status field is 404
/// - `total_bytes`: sum of the bytes field
/// - `local_*`: the same, restricted to local addresses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Accumulator {
    /// Bytes sent to local addresses
    pub local_bytes: f64,
    /// Bytes sent to all addresses
    pub total_bytes: f64,
    /// Requests from local addresses
    pub local_gets: f64,
    /// All requests
    pub total_gets: f64,
    /// Requests answered with 404
    pub failed_gets: f64,
    /// Local requests answered with 404
    pub local_failed_gets: f64,
}

impl Accumulator {
    /// Create a new accumulator with all zeros.
    pub fn new() -> Self {
        Self::default()
    }

    /// True if no line has been counted.
    pub fn is_empty(&self) -> bool {
        self.total_gets == 0.0
    }
}

impl Add for Accumulator {
    type Output = Self;

    fn add(mut self, other: Self) -> Self {
        self += other;
        self
    }
}

impl AddAssign for Accumulator {
    fn add_assign(&mut self, other: Self) {
        self.local_bytes += other.local_bytes;
        self.total_bytes += other.total_bytes;
        self.local_gets += other.local_gets;
        self.total_gets += other.total_gets;
        self.failed_gets += other.failed_gets;
        self.local_failed_gets += other.local_failed_gets;
    }
}

impl std::iter::Sum for Accumulator {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), Add::add)
    }
}

/// Final summary of a run, as shown in the report table.
///
/// Counts are whole numbers; byte totals are converted to mebibytes but not
/// rounded, so callers choose the display precision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub local_gets: u64,
    pub local_failed_gets: u64,
    pub local_mib: f64,
    pub total_gets: u64,
    pub failed_gets: u64,
    pub total_mib: f64,
}

impl From<&Accumulator> for Report {
    fn from(acc: &Accumulator) -> Self {
        Self {
            local_gets: acc.local_gets as u64,
            local_failed_gets: acc.local_failed_gets as u64,
            local_mib: acc.local_bytes / BYTES_PER_MIB,
            total_gets: acc.total_gets as u64,
            failed_gets: acc.failed_gets as u64,
            total_mib: acc.total_bytes / BYTES_PER_MIB,
        }
    }
}

/// Run-wide statistics shared by every file worker.
///
/// All six counters sit behind a single lock and can only be changed through
/// [`merge`](Self::merge), so a reader never sees a half-applied update.
#[derive(Debug, Default)]
pub struct StatsAggregator {
    totals: Mutex<Accumulator>,
}

impl StatsAggregator {
    /// Create an empty aggregator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock the totals, recovering from a worker that panicked mid-run.
    ///
    /// A merge is a plain sequence of additions that cannot panic halfway,
    /// so the data behind a poisoned lock is still consistent.
    fn lock_totals(&self) -> MutexGuard<'_, Accumulator> {
        match self.totals.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                tracing::warn!("worker thread panicked, recovering aggregate statistics");
                poisoned.into_inner()
            }
        }
    }

    /// Fold one task's accumulator into the shared totals.
    ///
    /// The accumulator is consumed: a task hands its counters over exactly once.
    pub fn merge(&self, acc: Accumulator) {
        tracing::trace!(gets = acc.total_gets, bytes = acc.total_bytes, "merging accumulator");
        let mut totals = self.lock_totals();
        *totals += acc;
    }

    /// Copy of the current raw totals.
    pub fn snapshot(&self) -> Accumulator {
        self.lock_totals().clone()
    }

    /// Summary for display. Call after every worker has finished.
    pub fn report(&self) -> Report {
        Report::from(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::thread;

    fn acc(lb: f64, tb: f64, lg: f64, tg: f64, fg: f64, lfg: f64) -> Accumulator {
        Accumulator {
            local_bytes: lb,
            total_bytes: tb,
            local_gets: lg,
            total_gets: tg,
            failed_gets: fg,
            local_failed_gets: lfg,
        }
    }

    #[test]
    fn test_accumulator_default() {
        let a = Accumulator::new();
        assert!(a.is_empty());
        assert_eq!(a.total_gets, 0.0);
        assert_eq!(a.total_bytes, 0.0);
    }

    #[test]
    fn test_accumulator_add() {
        let a = acc(10.0, 100.0, 1.0, 5.0, 2.0, 1.0);
        let b = acc(5.0, 50.0, 2.0, 3.0, 0.0, 0.0);
        let sum = a + b;
        assert_eq!(sum, acc(15.0, 150.0, 3.0, 8.0, 2.0, 1.0));
    }

    #[test]
    fn test_accumulator_sum() {
        let parts = vec![
            acc(1.0, 2.0, 1.0, 1.0, 0.0, 0.0),
            acc(0.0, 3.0, 0.0, 1.0, 1.0, 0.0),
        ];
        let sum: Accumulator = parts.into_iter().sum();
        assert_eq!(sum, acc(1.0, 5.0, 1.0, 2.0, 1.0, 0.0));
    }

    #[test]
    fn test_report_conversion() {
        let totals = acc(
            2.0 * BYTES_PER_MIB,
            3.5 * BYTES_PER_MIB,
            4.0,
            10.0,
            3.0,
            1.0,
        );
        let report = Report::from(&totals);
        assert_eq!(report.local_gets, 4);
        assert_eq!(report.local_failed_gets, 1);
        assert_eq!(report.local_mib, 2.0);
        assert_eq!(report.total_gets, 10);
        assert_eq!(report.failed_gets, 3);
        assert_eq!(report.total_mib, 3.5);
    }

    #[test]
    fn test_empty_aggregator_report() {
        let agg = StatsAggregator::new();
        assert_eq!(agg.report(), Report::default());
    }

    #[test]
    fn test_merge_concurrent() {
        let agg = StatsAggregator::new();
        thread::scope(|s| {
            for _ in 0..16 {
                s.spawn(|| agg.merge(acc(1.0, 10.0, 1.0, 2.0, 1.0, 1.0)));
            }
        });
        assert_eq!(agg.snapshot(), acc(16.0, 160.0, 16.0, 32.0, 16.0, 16.0));
    }

    #[test]
    fn test_merge_survives_poisoned_lock() {
        let agg = StatsAggregator::new();
        agg.merge(acc(0.0, 1.0, 0.0, 1.0, 0.0, 0.0));

        let result = thread::scope(|s| {
            s.spawn(|| {
                let _guard = agg.totals.lock().unwrap();
                panic!("worker failure");
            })
            .join()
        });
        assert!(result.is_err());

        agg.merge(acc(0.0, 1.0, 0.0, 1.0, 0.0, 0.0));
        assert_eq!(agg.snapshot().total_gets, 2.0);
    }

    fn arb_accumulator() -> impl Strategy<Value = Accumulator> {
        (
            0u32..1_000_000,
            0u32..1_000_000,
            0u32..10_000,
            0u32..10_000,
            0u32..10_000,
            0u32..10_000,
        )
            .prop_map(|(lb, tb, lg, tg, fg, lfg)| {
                acc(lb as f64, tb as f64, lg as f64, tg as f64, fg as f64, lfg as f64)
            })
    }

    proptest! {
        #[test]
        fn prop_merge_order_independent(
            parts in prop::collection::vec(arb_accumulator(), 0..12),
        ) {
            let forward = StatsAggregator::new();
            for part in parts.iter().cloned() {
                forward.merge(part);
            }

            let backward = StatsAggregator::new();
            for part in parts.iter().rev().cloned() {
                backward.merge(part);
            }

            let expected: Accumulator = parts.into_iter().sum();
            prop_assert_eq!(forward.snapshot(), expected.clone());
            prop_assert_eq!(backward.snapshot(), expected);
        }
    }
}
