//! Failure taxonomy shared by every stage of a forecast run.
//!
//! All variants are terminal for the run. `NoResults` is deliberately not
//! here: an empty forecast is a successful outcome, see `pipeline::RunStatus`.

use crate::model::DataSource;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum ForecastError {
    /// Run options rejected at the validation boundary.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration file could not be read or parsed.
    #[error("Config file error: {0}")]
    ConfigFile(String),

    /// The geocoder returned no usable coordinates for the query.
    #[error("Location not found: {0}")]
    GeocodingNotFound(String),

    /// Payload has the wrong top-level shape for its provider.
    #[error("Invalid {provider} response: {reason}")]
    UpstreamInvalid { provider: DataSource, reason: String },

    /// Payload contained no rows at all.
    #[error("Empty {0} response")]
    UpstreamEmpty(DataSource),

    /// Payload had rows but none produced a valid sample.
    #[error("Parse error ({provider}): {reason}")]
    ParseFailure { provider: DataSource, reason: String },

    /// Connection-level failure reported by the transport.
    #[error("Network error: {0}")]
    Network(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    /// HTTP 429.
    #[error("Rate limited by {0}")]
    RateLimited(String),

    /// HTTP 5xx.
    #[error("{service} unavailable (HTTP {status})")]
    Unavailable { service: String, status: u16 },

    /// Any other non-200 status.
    #[error("HTTP error: {0}")]
    HttpStatus(u16),
}

impl ForecastError {
    /// Short stable tag used in logs and by the CLI exit-code mapping.
    pub fn kind(&self) -> &'static str {
        match self {
            ForecastError::InvalidConfig(_) => "invalid_config",
            ForecastError::ConfigFile(_) => "config_file",
            ForecastError::GeocodingNotFound(_) => "geocoding_not_found",
            ForecastError::UpstreamInvalid { .. } => "upstream_invalid",
            ForecastError::UpstreamEmpty(_) => "upstream_empty",
            ForecastError::ParseFailure { .. } => "parse_failure",
            ForecastError::Network(_) => "network_error",
            ForecastError::Timeout(_) => "timeout",
            ForecastError::RateLimited(_) => "rate_limited",
            ForecastError::Unavailable { .. } => "unavailable",
            ForecastError::HttpStatus(_) => "http_status",
        }
    }

    /// Process exit code for this failure. 0 and 1 are reserved for
    /// success and the no-results outcome.
    pub fn exit_code(&self) -> u8 {
        match self {
            ForecastError::InvalidConfig(_) | ForecastError::ConfigFile(_) => 2,
            ForecastError::GeocodingNotFound(_) => 3,
            ForecastError::Network(_) | ForecastError::Timeout(_) => 4,
            ForecastError::RateLimited(_)
            | ForecastError::Unavailable { .. }
            | ForecastError::HttpStatus(_) => 5,
            ForecastError::UpstreamInvalid { .. }
            | ForecastError::UpstreamEmpty(_)
            | ForecastError::ParseFailure { .. } => 6,
        }
    }

    /// Transport failures come from outside the core and are passed
    /// through unchanged.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            ForecastError::Network(_)
                | ForecastError::Timeout(_)
                | ForecastError::RateLimited(_)
                | ForecastError::Unavailable { .. }
                | ForecastError::HttpStatus(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_parse_failure_are_distinct() {
        let empty = ForecastError::UpstreamEmpty(DataSource::Gfz);
        let parse = ForecastError::ParseFailure {
            provider: DataSource::Gfz,
            reason: "no valid rows".to_string(),
        };
        assert_ne!(empty.kind(), parse.kind());
        assert_eq!(empty.exit_code(), parse.exit_code());
    }

    #[test]
    fn test_exit_codes_never_collide_with_success_or_no_results() {
        let all = [
            ForecastError::InvalidConfig("x".into()),
            ForecastError::ConfigFile("x".into()),
            ForecastError::GeocodingNotFound("x".into()),
            ForecastError::UpstreamInvalid { provider: DataSource::Noaa, reason: "x".into() },
            ForecastError::UpstreamEmpty(DataSource::Noaa),
            ForecastError::ParseFailure { provider: DataSource::Noaa, reason: "x".into() },
            ForecastError::Network("x".into()),
            ForecastError::Timeout("x".into()),
            ForecastError::RateLimited("x".into()),
            ForecastError::Unavailable { service: "x".into(), status: 503 },
            ForecastError::HttpStatus(404),
        ];
        for err in &all {
            assert!(err.exit_code() >= 2, "{} must not map to 0 or 1", err.kind());
        }
    }

    #[test]
    fn test_transport_classification() {
        assert!(ForecastError::Timeout("geocoder".into()).is_transport());
        assert!(ForecastError::HttpStatus(404).is_transport());
        assert!(!ForecastError::UpstreamEmpty(DataSource::Gfz).is_transport());
        assert!(!ForecastError::GeocodingNotFound("Nowhere".into()).is_transport());
    }

    #[test]
    fn test_display_messages() {
        let err = ForecastError::Unavailable { service: "NOAA".into(), status: 503 };
        assert_eq!(err.to_string(), "NOAA unavailable (HTTP 503)");
        assert_eq!(ForecastError::HttpStatus(404).to_string(), "HTTP error: 404");
    }
}
