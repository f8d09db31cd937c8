/// Blocking HTTP transport for the geocoder and index providers
///
/// Wraps a single `reqwest::blocking::Client` configured with the run's
/// timeout and User-Agent. Transport errors and throttling/outage statuses
/// are tagged here so the pipeline can pass them through unchanged.

use std::time::Duration;

use crate::config::{AppConfig, EndpointConfig};
use crate::error::ForecastError;
use crate::ingest::geocode::parse_search_response;
use crate::ingest::{Fetcher, Geocoder};
use crate::logging::{self, Component};
use crate::model::{DataSource, FetchResponse, GeoPoint};

const GEOCODER_SERVICE: &str = "geocoder";

pub struct HttpClient {
    client: reqwest::blocking::Client,
    endpoints: EndpointConfig,
}

impl HttpClient {
    pub fn new(config: &AppConfig) -> Result<Self, ForecastError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.http.timeout_secs))
            .user_agent(config.http.user_agent.as_str())
            .build()
            .map_err(|e| ForecastError::Network(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoints: config.endpoints.clone(),
        })
    }
}

/// Maps a `reqwest` failure to a transport tag.
fn transport_error(service: &str, err: reqwest::Error) -> ForecastError {
    if err.is_timeout() {
        ForecastError::Timeout(service.to_string())
    } else {
        ForecastError::Network(format!("{}: {}", service, err))
    }
}

/// Tags throttling and server-side outages. Other statuses are left for
/// the caller to judge.
pub fn classify_status(service: &str, status: u16) -> Option<ForecastError> {
    match status {
        429 => Some(ForecastError::RateLimited(service.to_string())),
        500..=599 => Some(ForecastError::Unavailable {
            service: service.to_string(),
            status,
        }),
        _ => None,
    }
}

impl Fetcher for HttpClient {
    fn fetch(&self, source: DataSource) -> Result<FetchResponse, ForecastError> {
        let url = self.endpoints.index_url(source);
        let service = source.to_string();
        logging::debug(source.into(), None, &format!("GET {}", url));

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| transport_error(&service, e))?;

        let status = response.status().as_u16();
        if let Some(err) = classify_status(&service, status) {
            return Err(err);
        }

        let body = response.text().map_err(|e| transport_error(&service, e))?;
        logging::debug(source.into(), None, &format!("HTTP {} ({} bytes)", status, body.len()));
        Ok(FetchResponse { body, status })
    }
}

impl Geocoder for HttpClient {
    fn geocode(&self, query: &str) -> Result<GeoPoint, ForecastError> {
        logging::debug(Component::Geocoder, Some(query), &format!("GET {}", self.endpoints.geocoder));

        let response = self
            .client
            .get(&self.endpoints.geocoder)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .header("Accept", "application/json")
            .send()
            .map_err(|e| transport_error(GEOCODER_SERVICE, e))?;

        let status = response.status().as_u16();
        if let Some(err) = classify_status(GEOCODER_SERVICE, status) {
            return Err(err);
        }
        if status != 200 {
            return Err(ForecastError::HttpStatus(status));
        }

        let body = response
            .text()
            .map_err(|e| transport_error(GEOCODER_SERVICE, e))?;
        parse_search_response(&body, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(classify_status("NOAA", 200), None);
        assert_eq!(classify_status("NOAA", 404), None);
        assert_eq!(
            classify_status("NOAA", 429),
            Some(ForecastError::RateLimited("NOAA".to_string()))
        );
        assert_eq!(
            classify_status("GFZ", 503),
            Some(ForecastError::Unavailable { service: "GFZ".to_string(), status: 503 })
        );
    }

    #[test]
    fn test_client_builds_from_default_config() {
        assert!(HttpClient::new(&AppConfig::default()).is_ok());
    }
}
