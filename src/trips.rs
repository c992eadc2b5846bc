//! Trip records: CSV deserialization and timestamp parsing.

use anyhow::{Result, bail};
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::traffic::minutes::minute_of_day;

/// A single bike rental: start/end station and timestamps, with the
/// minute-of-day of each endpoint precomputed at parse time. Immutable once
/// loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Trip {
    pub start_station_id: String,
    pub end_station_id: String,
    pub started_at: NaiveDateTime,
    pub ended_at: NaiveDateTime,
    pub start_minute: u16,
    pub end_minute: u16,
}

/// The columns we care about; source CSVs carry more (ride id, bike type,
/// station names) and those are ignored.
#[derive(Debug, Deserialize)]
struct TripRow {
    start_station_id: String,
    end_station_id: String,
    started_at: String,
    ended_at: String,
}

// Source exports vary between a space and a `T` separator, with or without
// fractional seconds.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

fn parse_timestamp(raw: &str) -> Result<NaiveDateTime> {
    for fmt in TIMESTAMP_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw.trim(), fmt) {
            return Ok(ts);
        }
    }
    bail!("unrecognized timestamp: {raw:?}")
}

impl Trip {
    fn from_row(row: TripRow) -> Result<Self> {
        let started_at = parse_timestamp(&row.started_at)?;
        let ended_at = parse_timestamp(&row.ended_at)?;

        Ok(Trip {
            start_minute: minute_of_day(&started_at),
            end_minute: minute_of_day(&ended_at),
            start_station_id: row.start_station_id,
            end_station_id: row.end_station_id,
            started_at,
            ended_at,
        })
    }
}

/// Parses a trip CSV export into [`Trip`] records.
///
/// Individual unreadable rows are skipped and counted rather than failing
/// the whole load.
pub fn parse_trips(bytes: &[u8]) -> Result<Vec<Trip>> {
    let mut rdr = csv::Reader::from_reader(bytes);
    let mut trips = Vec::new();
    let mut skipped = 0usize;

    for result in rdr.deserialize() {
        let row: TripRow = match result {
            Ok(row) => row,
            Err(e) => {
                debug!(error = %e, "Skipping unreadable trip row");
                skipped += 1;
                continue;
            }
        };

        match Trip::from_row(row) {
            Ok(trip) => trips.push(trip),
            Err(e) => {
                debug!(error = %e, "Skipping trip with bad timestamp");
                skipped += 1;
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, loaded = trips.len(), "Some trip rows could not be parsed");
    }

    Ok(trips)
}

/// Builds a trip with the given endpoints and minutes, for tests.
#[cfg(test)]
pub fn test_trip(start_id: &str, end_id: &str, start_minute: u16, end_minute: u16) -> Trip {
    use chrono::NaiveDate;

    let day = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
    let at = |minute: u16| {
        day.and_hms_opt(u32::from(minute) / 60, u32::from(minute) % 60, 0)
            .unwrap()
    };

    Trip {
        start_station_id: start_id.to_string(),
        end_station_id: end_id.to_string(),
        started_at: at(start_minute),
        ended_at: at(end_minute),
        start_minute,
        end_minute,
    }
}
