/// Nominatim (OpenStreetMap) geocoding response handling
///
/// Turns a search response into a `GeoPoint`. The HTTP request itself lives
/// in `ingest::http`; this module only validates and converts the body.
///
/// API Documentation: https://nominatim.org/release-docs/latest/api/Search/

use serde::Deserialize;

use crate::error::ForecastError;
use crate::model::GeoPoint;

// ============================================================================
// Nominatim Response Structures
// ============================================================================

/// One search hit. Nominatim encodes coordinates as strings.
#[derive(Debug, Deserialize)]
pub struct NominatimPlace {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: String,
}

// ============================================================================
// Parsing
// ============================================================================

/// Rounds a coordinate to 2 decimal places by formatting and re-parsing,
/// which is the precision every later comparison works with.
pub fn round_coordinate(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

/// Converts a Nominatim search response into the first usable `GeoPoint`.
///
/// An empty result list, or a first hit whose coordinates are missing,
/// unparseable, or outside the valid range, is `GeocodingNotFound`.
pub fn parse_search_response(body: &str, query: &str) -> Result<GeoPoint, ForecastError> {
    let not_found = || ForecastError::GeocodingNotFound(query.to_string());

    let places: Vec<NominatimPlace> = serde_json::from_str(body).map_err(|_| not_found())?;
    let place = places.into_iter().next().ok_or_else(not_found)?;

    let latitude: f64 = place.lat.trim().parse().map_err(|_| not_found())?;
    let longitude: f64 = place.lon.trim().parse().map_err(|_| not_found())?;
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(not_found());
    }

    let display_name = if place.display_name.trim().is_empty() {
        query.to_string()
    } else {
        place.display_name
    };

    Ok(GeoPoint {
        latitude: round_coordinate(latitude),
        longitude: round_coordinate(longitude),
        display_name,
    })
}

// ============================================================================
// Tests
// ============================================================================
