//! Derived render scales: marker radius and the departure/arrival blend.

use super::enrich::StationTraffic;
use super::window::TimeFilter;

/// Marker radius range in pixels when all trips are shown.
pub const RANGE_UNFILTERED: (f64, f64) = (0.5, 10.0);
/// Wider range when a time window is active, since fewer trips are in play.
pub const RANGE_FILTERED: (f64, f64) = (1.0, 20.0);

/// Blend endpoint for all-departure stations (steelblue).
pub const DEPARTURES_COLOR: Rgb = Rgb(70, 130, 180);
/// Blend endpoint for all-arrival stations (darkorange).
pub const ARRIVALS_COLOR: Rgb = Rgb(255, 140, 0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Square-root scale from total traffic to marker radius.
///
/// Rederived on every enrichment pass because the domain max shifts with
/// the filter; never cached across filter changes.
#[derive(Debug, Clone, Copy)]
pub struct RadiusScale {
    domain_max: f64,
    range: (f64, f64),
}

impl RadiusScale {
    /// Derives the scale from the enriched set and the active filter. The
    /// domain max falls back to 1 when every station is idle so the scale
    /// stays well-defined.
    pub fn derive(stations: &[StationTraffic], filter: TimeFilter) -> Self {
        let domain_max = stations
            .iter()
            .map(|s| s.total_traffic)
            .max()
            .unwrap_or(0)
            .max(1);
        let range = match filter {
            TimeFilter::All => RANGE_UNFILTERED,
            TimeFilter::Minute(_) => RANGE_FILTERED,
        };
        Self {
            domain_max: f64::from(domain_max),
            range,
        }
    }

    pub fn radius(&self, total_traffic: u32) -> f64 {
        let (lo, hi) = self.range;
        lo + (hi - lo) * (f64::from(total_traffic) / self.domain_max).sqrt()
    }
}

/// Share of a station's traffic that is departures, in `[0, 1]`; zero for
/// idle stations. Used as the blend weight toward the departure color.
pub fn departure_ratio(station: &StationTraffic) -> f64 {
    if station.total_traffic > 0 {
        f64::from(station.departures) / f64::from(station.total_traffic)
    } else {
        0.0
    }
}

/// Linear mix between the two endpoint colors; `ratio = 1` is all departures.
pub fn blend(ratio: f64) -> Rgb {
    let r = ratio.clamp(0.0, 1.0);
    let mix = |dep: u8, arr: u8| (f64::from(arr) + (f64::from(dep) - f64::from(arr)) * r).round() as u8;
    Rgb(
        mix(DEPARTURES_COLOR.0, ARRIVALS_COLOR.0),
        mix(DEPARTURES_COLOR.1, ARRIVALS_COLOR.1),
        mix(DEPARTURES_COLOR.2, ARRIVALS_COLOR.2),
    )
}

/// Quantizes a ratio onto three discrete flow steps over `[0, 1]`, for
/// renderers that want banded rather than continuous coloring.
pub fn flow_step(ratio: f64) -> f64 {
    match ratio {
        r if r < 1.0 / 3.0 => 0.0,
        r if r < 2.0 / 3.0 => 0.5,
        _ => 1.0,
    }
}
