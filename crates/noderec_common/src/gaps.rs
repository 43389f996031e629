//! Gap detection over the analyze series.
//!
//! The recorder samples once per second; any row whose observed delta
//! deviates from that cadence marks a padded interval that has to be
//! annotated in the crew ledgers.

use crate::series::SeriesRecord;

/// Expected sampling cadence in seconds.
const NOMINAL_DELTA: i64 = 1;

/// A padded interval, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GapInterval {
    pub start: i64,
    pub stop: i64,
}

impl GapInterval {
    /// Interval ending at the record's second, spanning its whole delta.
    pub fn from_record(record: &SeriesRecord) -> Self {
        Self {
            start: record.second - record.delta + 1,
            stop: record.second,
        }
    }

    /// Seconds covered by the interval.
    pub fn seconds(&self) -> i64 {
        self.stop - self.start + 1
    }
}

/// One interval per record whose delta deviates from the nominal cadence,
/// in file order. Single pass over the materialized series; an empty result
/// means the node has no padded samples.
pub fn find_gaps(series: &[SeriesRecord]) -> Vec<GapInterval> {
    series
        .iter()
        .filter(|record| record.delta != NOMINAL_DELTA)
        .map(GapInterval::from_record)
        .collect()
}
