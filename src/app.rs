//! Application state: the authoritative station/trip collections plus the
//! active time filter.
//!
//! Loads may land in either order and a failed load simply never calls the
//! corresponding setter, leaving prior state intact. Every change recomputes
//! the full frame from the stored collections; derived views are never
//! mutated in place.

use crate::render::RenderFrame;
use crate::stations::Station;
use crate::traffic::aggregate::{TrafficCounts, aggregate_filtered};
use crate::traffic::enrich::{StationTraffic, enrich};
use crate::traffic::minutes::{MINUTES_PER_DAY, MinuteBuckets};
use crate::traffic::window::{TimeFilter, TimeWindow, WINDOW_RADIUS};
use crate::trips::Trip;

#[derive(Debug, Default)]
pub struct App {
    stations: Vec<Station>,
    trips: Vec<Trip>,
    buckets: MinuteBuckets,
    filter: TimeFilter,
}

impl App {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the station set. Trips loaded earlier keep counting.
    pub fn set_stations(&mut self, stations: Vec<Station>) {
        self.stations = stations;
    }

    /// Replaces the trip set and rebuilds the minute buckets from it. The
    /// buckets are read-only until the next full load.
    pub fn set_trips(&mut self, trips: Vec<Trip>) {
        self.buckets = MinuteBuckets::build(&trips);
        self.trips = trips;
    }

    pub fn set_filter(&mut self, filter: TimeFilter) {
        self.filter = filter;
    }

    pub fn filter(&self) -> TimeFilter {
        self.filter
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn trips(&self) -> &[Trip] {
        &self.trips
    }

    /// Stations joined with counts under the active filter. Pure over the
    /// stored collections; safe to call with either source still missing.
    pub fn enriched(&self) -> Vec<StationTraffic> {
        let counts = aggregate_filtered(&self.trips, self.filter);
        enrich(&self.stations, &counts)
    }

    /// The full recompute-then-render pipeline: filter → aggregate → enrich
    /// → scale. Invoked after every state change rather than diffing.
    pub fn frame(&self) -> RenderFrame {
        RenderFrame::build(&self.enriched(), self.filter)
    }

    /// Counts for one window via the pre-built minute buckets. A trip
    /// landing in the window on both endpoints is deduplicated so it counts
    /// once, matching the direct per-trip filter.
    fn windowed_counts(&self, window: TimeWindow) -> TrafficCounts {
        let mut ids = window.select(self.buckets.departures());
        ids.extend(window.select(self.buckets.arrivals()));
        ids.sort_unstable();
        ids.dedup();

        TrafficCounts::aggregate(ids.into_iter().map(|i| &self.trips[i]))
    }

    /// One frame per `step` minutes across the whole day, windowing through
    /// the minute buckets instead of rescanning every trip per frame.
    pub fn sweep(&self, step: u16) -> Vec<RenderFrame> {
        let step = step.max(1);
        let mut frames = Vec::with_capacity(MINUTES_PER_DAY / usize::from(step) + 1);

        let mut minute = 0u16;
        while usize::from(minute) < MINUTES_PER_DAY {
            let filter = TimeFilter::Minute(minute);
            let counts = self.windowed_counts(TimeWindow::around(minute, WINDOW_RADIUS));
            let enriched = enrich(&self.stations, &counts);
            frames.push(RenderFrame::build(&enriched, filter));
            minute += step;
        }

        frames
    }
}
