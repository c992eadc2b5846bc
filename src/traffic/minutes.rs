//! Minute-of-day bucketing of trips.

use chrono::{NaiveDateTime, Timelike};

use crate::trips::Trip;

/// Number of minute slots in one day.
pub const MINUTES_PER_DAY: usize = 1440;

/// Converts a timestamp to its minute-of-day index in `[0, 1439]`.
///
/// Only the wall-clock hour and minute matter; seconds and the date are
/// discarded.
pub fn minute_of_day(ts: &NaiveDateTime) -> u16 {
    (ts.hour() * 60 + ts.minute()) as u16
}

/// Per-minute trip buckets, built once from the full trip set.
///
/// Two parallel 1440-slot arrays: one keyed by each trip's start minute
/// (departures), one by its end minute (arrivals). Slots hold indices into
/// the trip vec rather than clones. Append-only during the build pass and
/// read-only afterwards.
#[derive(Debug)]
pub struct MinuteBuckets {
    departures: Vec<Vec<usize>>,
    arrivals: Vec<Vec<usize>>,
}

impl MinuteBuckets {
    pub fn build(trips: &[Trip]) -> Self {
        let mut departures = vec![Vec::new(); MINUTES_PER_DAY];
        let mut arrivals = vec![Vec::new(); MINUTES_PER_DAY];

        for (idx, trip) in trips.iter().enumerate() {
            departures[trip.start_minute as usize].push(idx);
            arrivals[trip.end_minute as usize].push(idx);
        }

        Self {
            departures,
            arrivals,
        }
    }

    /// Buckets keyed by start minute.
    pub fn departures(&self) -> &[Vec<usize>] {
        &self.departures
    }

    /// Buckets keyed by end minute.
    pub fn arrivals(&self) -> &[Vec<usize>] {
        &self.arrivals
    }
}

impl Default for MinuteBuckets {
    fn default() -> Self {
        Self::build(&[])
    }
}
