//! Station metadata: GBFS-style JSON parsing and identifier resolution.

use anyhow::Result;
use serde::{Deserialize, Deserializer};

/// A docking station as published in the station information feed.
///
/// The feed is inconsistent about identifiers: older exports carry a
/// `Number` field, newer ones `short_name`, and some rows have both or
/// either empty. [`Station::id`] resolves the canonical one.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Station {
    #[serde(rename = "Number", default)]
    pub number: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(deserialize_with = "f64_or_string")]
    pub lon: f64,
    #[serde(deserialize_with = "f64_or_string")]
    pub lat: f64,
}

impl Station {
    /// Canonical station identifier: ordered candidate fields, first
    /// non-empty wins. `None` when no candidate yields a value; such a
    /// station still renders, with zero counts.
    pub fn id(&self) -> Option<&str> {
        [self.number.as_deref(), self.short_name.as_deref()]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.is_empty())
    }
}

// Coordinates arrive as JSON numbers or as quoted strings depending on the
// export.
fn f64_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => s.trim().parse().map_err(serde::de::Error::custom),
    }
}

#[derive(Debug, Deserialize)]
struct StationFile {
    data: StationData,
}

#[derive(Debug, Deserialize)]
struct StationData {
    stations: Vec<Station>,
}

/// Parses a station information JSON document (`{"data": {"stations": [...]}}`).
pub fn parse_stations(bytes: &[u8]) -> Result<Vec<Station>> {
    let file: StationFile = serde_json::from_slice(bytes)?;
    Ok(file.data.stations)
}

#[cfg(test)]
pub fn test_station(id: &str, lon: f64, lat: f64) -> Station {
    Station {
        number: Some(id.to_string()),
        short_name: None,
        name: None,
        lon,
        lat,
    }
}
