//! Station traffic aggregation.
//!
//! This module buckets trips by minute of day, selects circular ±60-minute
//! windows around a slider-chosen time, counts arrivals and departures per
//! station, joins the counts onto station records, and derives the radius
//! and color scales the renderer consumes.

pub mod aggregate;
pub mod enrich;
pub mod minutes;
pub mod scale;
pub mod window;
