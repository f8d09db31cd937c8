//! Provider ingestion: geocoding, transport, and index-series parsing.
//!
//! The traits here are the seams between the pure forecast core and the
//! network. `http` provides the blocking `reqwest` implementations; tests
//! substitute in-memory stubs.

pub mod geocode;
pub mod gfz;
pub mod http;
pub mod noaa;

use crate::config::RunConfig;
use crate::error::ForecastError;
use crate::model::{DataSource, EstimateColumn, FetchResponse, GeoPoint, IndexSample};

/// Resolves a free-text place name to coordinates.
pub trait Geocoder {
    fn geocode(&self, query: &str) -> Result<GeoPoint, ForecastError>;
}

/// Downloads a provider payload.
///
/// Transport failures come back already tagged (`Network`, `Timeout`,
/// `RateLimited`, `Unavailable`); any other status is returned as-is in
/// the response for the pipeline to reject.
pub trait Fetcher {
    fn fetch(&self, source: DataSource) -> Result<FetchResponse, ForecastError>;
}

/// Provider-specific payload parser, chosen once per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSeriesParser {
    Gfz { estimate: EstimateColumn },
    Noaa,
}

impl IndexSeriesParser {
    pub fn for_config(config: &RunConfig) -> Self {
        match config.data_source {
            DataSource::Gfz => IndexSeriesParser::Gfz { estimate: config.estimate },
            DataSource::Noaa => IndexSeriesParser::Noaa,
        }
    }

    /// Converts a raw payload into an ordered series of samples.
    pub fn parse(&self, body: &str) -> Result<Vec<IndexSample>, ForecastError> {
        match self {
            IndexSeriesParser::Gfz { estimate } => gfz::parse_gfz_csv(body, *estimate),
            IndexSeriesParser::Noaa => noaa::parse_noaa_json(body),
        }
    }
}

/// Rejects index values that cannot be a geomagnetic index reading.
pub(crate) fn validate_index_value(value: f64) -> Result<f64, String> {
    if !value.is_finite() {
        Err(format!("non-finite index value {}", value))
    } else if value < 0.0 {
        Err(format!("negative index value {}", value))
    } else {
        Ok(value)
    }
}
