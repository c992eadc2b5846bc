//! Joining aggregated counts onto station records.

use super::aggregate::TrafficCounts;
use crate::stations::Station;

/// A station together with its traffic counts under the active filter.
///
/// Invariant: `total_traffic == arrivals + departures`. Always rebuilt by
/// [`enrich`], never mutated incrementally.
#[derive(Debug, Clone, PartialEq)]
pub struct StationTraffic {
    pub station: Station,
    pub arrivals: u32,
    pub departures: u32,
    pub total_traffic: u32,
}

/// Joins count maps onto stations by canonical identifier.
///
/// Pure: inputs are untouched and a fresh collection comes back, preserving
/// the original station order. Stations whose id is unknown to the counts
/// (or unresolvable) get zeros.
pub fn enrich(stations: &[Station], counts: &TrafficCounts) -> Vec<StationTraffic> {
    stations
        .iter()
        .map(|station| {
            let (arrivals, departures) = match station.id() {
                Some(id) => (counts.arrivals_at(id), counts.departures_at(id)),
                None => (0, 0),
            };
            StationTraffic {
                station: station.clone(),
                arrivals,
                departures,
                total_traffic: arrivals + departures,
            }
        })
        .collect()
}
