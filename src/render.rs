//! Render frame output: marker records as JSON, station counts as CSV.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::WriterBuilder;
use serde::Serialize;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use tracing::debug;

use crate::traffic::enrich::StationTraffic;
use crate::traffic::scale::{RadiusScale, blend, departure_ratio, flow_step};
use crate::traffic::window::TimeFilter;

/// One circle on the map overlay. Position is lon/lat; projecting to screen
/// coordinates is the map's job and happens on every pan/zoom, not here.
#[derive(Debug, Clone, Serialize)]
pub struct Marker {
    pub station_id: Option<String>,
    pub name: Option<String>,
    pub lon: f64,
    pub lat: f64,
    pub radius: f64,
    pub fill: String,
    pub departure_ratio: f64,
    pub flow_step: f64,
    pub departures: u32,
    pub arrivals: u32,
    pub total_traffic: u32,
    pub tooltip: String,
}

/// Everything the rendering surface needs for one redraw.
#[derive(Debug, Clone, Serialize)]
pub struct RenderFrame {
    pub generated_at: DateTime<Utc>,
    pub time_filter: i32,
    pub time_label: String,
    pub markers: Vec<Marker>,
}

impl RenderFrame {
    /// Maps an enriched station set through the derived scales into marker
    /// records. Scales are rederived here on every call.
    pub fn build(enriched: &[StationTraffic], filter: TimeFilter) -> Self {
        let scale = RadiusScale::derive(enriched, filter);

        let markers = enriched
            .iter()
            .map(|s| {
                let ratio = departure_ratio(s);
                Marker {
                    station_id: s.station.id().map(str::to_string),
                    name: s.station.name.clone(),
                    lon: s.station.lon,
                    lat: s.station.lat,
                    radius: scale.radius(s.total_traffic),
                    fill: blend(ratio).to_hex(),
                    departure_ratio: ratio,
                    flow_step: flow_step(ratio),
                    departures: s.departures,
                    arrivals: s.arrivals,
                    total_traffic: s.total_traffic,
                    tooltip: format!(
                        "{} trips ({} departures, {} arrivals)",
                        s.total_traffic, s.departures, s.arrivals
                    ),
                }
            })
            .collect();

        RenderFrame {
            generated_at: Utc::now(),
            time_filter: filter.raw(),
            time_label: filter.label(),
            markers,
        }
    }
}

/// Writes a value as pretty JSON to `path`, or to stdout when `path` is `-`.
pub fn write_json<T: Serialize>(path: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    if path == "-" {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
    } else {
        std::fs::write(path, json)?;
    }
    Ok(())
}

/// A per-station counts row for CSV export.
#[derive(Debug, Serialize)]
struct CountRow<'a> {
    station_id: Option<&'a str>,
    name: Option<&'a str>,
    lon: f64,
    lat: f64,
    departures: u32,
    arrivals: u32,
    total_traffic: u32,
    time_label: &'a str,
}

/// Appends enriched station counts as CSV rows.
///
/// Creates the file with headers if it does not already exist, so repeated
/// exports (e.g. one per time window) accumulate in one file.
pub fn append_counts_csv(
    path: &str,
    enriched: &[StationTraffic],
    filter: TimeFilter,
) -> Result<()> {
    let file_exists = Path::new(path).exists();
    debug!(path, file_exists, "Appending station counts");

    let file = OpenOptions::new().append(true).create(true).open(path)?;

    let mut writer = WriterBuilder::new()
        .has_headers(!file_exists) // IMPORTANT when appending
        .from_writer(file);

    let label = filter.label();
    for s in enriched {
        writer.serialize(CountRow {
            station_id: s.station.id(),
            name: s.station.name.as_deref(),
            lon: s.station.lon,
            lat: s.station.lat,
            departures: s.departures,
            arrivals: s.arrivals,
            total_traffic: s.total_traffic,
            time_label: &label,
        })?;
    }
    writer.flush()?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stations::test_station;
    use std::env;
    use std::fs;

    fn traffic(id: &str, departures: u32, arrivals: u32) -> StationTraffic {
        StationTraffic {
            station: test_station(id, -71.09, 42.36),
            arrivals,
            departures,
            total_traffic: arrivals + departures,
        }
    }

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[test]
    fn test_frame_tooltip_and_label() {
        let enriched = vec![traffic("A", 3, 1)];
        let frame = RenderFrame::build(&enriched, TimeFilter::All);

        assert_eq!(frame.time_filter, -1);
        assert_eq!(frame.time_label, "any time");
        assert_eq!(frame.markers[0].tooltip, "4 trips (3 departures, 1 arrivals)");
    }

    #[test]
    fn test_busier_station_gets_larger_radius() {
        let enriched = vec![traffic("A", 3, 1), traffic("B", 0, 2)];
        let frame = RenderFrame::build(&enriched, TimeFilter::All);

        assert_eq!(frame.markers[0].total_traffic, 4);
        assert_eq!(frame.markers[1].total_traffic, 2);
        assert!(frame.markers[0].radius > frame.markers[1].radius);
        assert_eq!(frame.markers[0].radius, 10.0);
    }

    #[test]
    fn test_marker_blend_fields() {
        let enriched = vec![traffic("A", 4, 0), traffic("B", 0, 0)];
        let frame = RenderFrame::build(&enriched, TimeFilter::All);

        assert_eq!(frame.markers[0].departure_ratio, 1.0);
        assert_eq!(frame.markers[0].fill, "#4682b4");
        assert_eq!(frame.markers[0].flow_step, 1.0);
        assert_eq!(frame.markers[1].departure_ratio, 0.0);
        assert_eq!(frame.markers[1].fill, "#ff8c00");
    }

    #[test]
    fn test_append_counts_csv_writes_header_once() {
        let path = temp_path("bike_traffic_test_counts.csv");
        let _ = fs::remove_file(&path);

        let enriched = vec![traffic("A", 3, 1)];
        append_counts_csv(&path, &enriched, TimeFilter::All).unwrap();
        append_counts_csv(&path, &enriched, TimeFilter::Minute(510)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header_count = content
            .lines()
            .filter(|l| l.contains("total_traffic"))
            .count();
        assert_eq!(header_count, 1);
        assert_eq!(content.lines().count(), 3);
        assert!(content.contains("8:30 AM"));

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_json_to_file() {
        let path = temp_path("bike_traffic_test_frame.json");
        let _ = fs::remove_file(&path);

        let frame = RenderFrame::build(&[traffic("A", 1, 1)], TimeFilter::All);
        write_json(&path, &frame).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("\"markers\""));
        assert!(content.contains("\"time_label\": \"any time\""));

        fs::remove_file(&path).unwrap();
    }
}
