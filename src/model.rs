/// Core data types for the aurora forecast pipeline.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no I/O, only types and the timestamp format they share.

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::fmt;

/// Canonical timestamp layout for samples, `now`, and rendered output.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

// ---------------------------------------------------------------------------
// Location
// ---------------------------------------------------------------------------

/// Result of geocoding the user-supplied place name.
///
/// Coordinates arrive already rounded to 2 decimal places by the geocoder
/// adapter; nothing downstream re-validates the range.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub display_name: String,
}

// ---------------------------------------------------------------------------
// Data sources
// ---------------------------------------------------------------------------

/// Geomagnetic index provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    /// GFZ Potsdam Hp30 ensemble forecast (CSV, 30-minute cadence).
    Gfz,
    /// NOAA SWPC planetary Kp forecast (JSON, 3-hour cadence).
    Noaa,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Gfz => write!(f, "GFZ"),
            DataSource::Noaa => write!(f, "NOAA"),
        }
    }
}

/// Which GFZ ensemble column to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EstimateColumn {
    Low,
    #[default]
    Median,
    High,
}

impl EstimateColumn {
    /// Zero-based column position in a GFZ row (`time,low,_,median,_,high`).
    pub fn column_index(self) -> usize {
        match self {
            EstimateColumn::Low => 1,
            EstimateColumn::Median => 3,
            EstimateColumn::High => 5,
        }
    }
}

impl fmt::Display for EstimateColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EstimateColumn::Low => write!(f, "low"),
            EstimateColumn::Median => write!(f, "median"),
            EstimateColumn::High => write!(f, "high"),
        }
    }
}

// ---------------------------------------------------------------------------
// Series types
// ---------------------------------------------------------------------------

/// One normalized (timestamp, index value) pair from a provider.
///
/// `timestamp` is UTC at minute precision. `value` is non-negative with no
/// upper bound (Hp30 can exceed 9).
#[derive(Debug, Clone, PartialEq)]
pub struct IndexSample {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

impl IndexSample {
    pub fn formatted_time(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}

/// Qualitative visibility category derived from probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Outlook {
    None,
    Low,
    Fair,
    Good,
    Excellent,
}

impl fmt::Display for Outlook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outlook::None => write!(f, "None"),
            Outlook::Low => write!(f, "Low"),
            Outlook::Fair => write!(f, "Fair"),
            Outlook::Good => write!(f, "Good"),
            Outlook::Excellent => write!(f, "Excellent"),
        }
    }
}

/// A sample with its visibility figures for the observer's latitude.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSample {
    pub sample: IndexSample,
    pub min_latitude: i32,
    pub probability: u8,
    pub outlook: Outlook,
}

/// Historical and forecast slices ready for rendering.
///
/// `historical` holds at most 16 entries, oldest first. `forecast` holds at
/// most the sample cap derived from the requested hours.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ForecastWindow {
    pub historical: Vec<EnrichedSample>,
    pub forecast: Vec<EnrichedSample>,
}

impl ForecastWindow {
    pub fn has_results(&self) -> bool {
        !self.forecast.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Transport result
// ---------------------------------------------------------------------------

/// Raw body and HTTP status as handed over by the transport layer.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResponse {
    pub body: String,
    pub status: u16,
}
