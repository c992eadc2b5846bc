//! Per-station arrival/departure counting.

use std::collections::HashMap;

use super::window::{TimeFilter, TimeWindow};
use crate::trips::Trip;

/// Departure and arrival counts keyed by station identifier.
///
/// Derived from whatever trip collection was passed in (full dataset or a
/// windowed subset); ids absent from a map count as zero.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TrafficCounts {
    pub departures: HashMap<String, u32>,
    pub arrivals: HashMap<String, u32>,
}

impl TrafficCounts {
    /// Two independent group-by-count passes over the same trips: start
    /// station → departures, end station → arrivals.
    pub fn aggregate<'a, I>(trips: I) -> Self
    where
        I: IntoIterator<Item = &'a Trip>,
    {
        let mut counts = TrafficCounts::default();
        for trip in trips {
            *counts
                .departures
                .entry(trip.start_station_id.clone())
                .or_default() += 1;
            *counts
                .arrivals
                .entry(trip.end_station_id.clone())
                .or_default() += 1;
        }
        counts
    }

    pub fn departures_at(&self, id: &str) -> u32 {
        self.departures.get(id).copied().unwrap_or(0)
    }

    pub fn arrivals_at(&self, id: &str) -> u32 {
        self.arrivals.get(id).copied().unwrap_or(0)
    }
}

/// Trips with either endpoint minute inside `window`.
pub fn filter_trips(trips: &[Trip], window: TimeWindow) -> Vec<&Trip> {
    trips
        .iter()
        .filter(|t| window.contains(t.start_minute) || window.contains(t.end_minute))
        .collect()
}

/// Aggregates honoring the active time filter: every trip for
/// [`TimeFilter::All`], the windowed subset otherwise.
pub fn aggregate_filtered(trips: &[Trip], filter: TimeFilter) -> TrafficCounts {
    match filter.window() {
        None => TrafficCounts::aggregate(trips),
        Some(window) => TrafficCounts::aggregate(filter_trips(trips, window)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::test_trip;

    fn sample_trips() -> Vec<Trip> {
        vec![
            test_trip("A", "B", 480, 500),
            test_trip("A", "B", 485, 505),
            test_trip("A", "A", 490, 510),
            test_trip("B", "A", 1400, 20),
        ]
    }

    #[test]
    fn test_aggregate_counts_both_directions() {
        let trips = sample_trips();
        let counts = TrafficCounts::aggregate(&trips);

        assert_eq!(counts.departures_at("A"), 3);
        assert_eq!(counts.departures_at("B"), 1);
        assert_eq!(counts.arrivals_at("A"), 2);
        assert_eq!(counts.arrivals_at("B"), 2);
    }

    #[test]
    fn test_missing_id_counts_as_zero() {
        let trips = sample_trips();
        let counts = TrafficCounts::aggregate(&trips);

        assert_eq!(counts.departures_at("unknown"), 0);
        assert_eq!(counts.arrivals_at("unknown"), 0);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let trips = sample_trips();
        let first = TrafficCounts::aggregate(&trips);
        let second = TrafficCounts::aggregate(&trips);
        assert_eq!(first, second);
    }

    #[test]
    fn test_filter_keeps_trip_when_either_endpoint_qualifies() {
        // Starts well outside an 08:20-centered window but ends inside it.
        let trips = vec![test_trip("A", "B", 100, 500)];
        let window = TimeWindow::around(500, 60);

        assert_eq!(filter_trips(&trips, window).len(), 1);
    }

    #[test]
    fn test_filter_window_wraps_midnight() {
        let trips = sample_trips();
        let window = TimeWindow::around(10, 60);

        // Only the 23:20 → 00:20 trip touches the window.
        let kept = filter_trips(&trips, window);
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].start_minute, 1400);
    }

    #[test]
    fn test_aggregate_filtered_all_vs_windowed() {
        let trips = sample_trips();

        let all = aggregate_filtered(&trips, TimeFilter::All);
        assert_eq!(all.departures_at("A") + all.departures_at("B"), 4);

        let windowed = aggregate_filtered(&trips, TimeFilter::Minute(490));
        assert_eq!(windowed.departures_at("A"), 3);
        assert_eq!(windowed.departures_at("B"), 0);
    }
}
