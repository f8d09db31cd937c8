/// Provider registry for the aurora forecast service.
///
/// Defines the geomagnetic index providers this tool can read, along with
/// their endpoints, sample cadence, and which optional run flags they
/// support. This is the single source of truth for provider metadata; all
/// other modules should look providers up here rather than hardcoding URLs
/// or cadences.

use crate::model::DataSource;

// ---------------------------------------------------------------------------
// Provider metadata
// ---------------------------------------------------------------------------

/// Metadata for a single index provider.
pub struct Provider {
    pub source: DataSource,
    /// Human-readable provider name for report headers.
    pub name: &'static str,
    /// Name of the index this provider forecasts.
    pub index_name: &'static str,
    /// Default download URL; overridable through configuration.
    pub default_url: &'static str,
    /// Minutes between consecutive samples.
    pub cadence_minutes: u32,
    /// Provider publishes low/median/high ensemble columns.
    pub supports_estimate: bool,
    /// Provider feed includes observed values before "now".
    pub supports_historical: bool,
}

/// Sources:
///   - GFZ Hp30 forecast: spaceweather.gfz.de (ensemble CSV, 30-minute values)
///   - NOAA Kp forecast: services.swpc.noaa.gov (observed + predicted 3-hour Kp)
pub static PROVIDER_REGISTRY: &[Provider] = &[
    Provider {
        source: DataSource::Gfz,
        name: "GFZ Potsdam",
        index_name: "Hp30",
        default_url: "https://spaceweather.gfz.de/fileadmin/SW-Monitor/hp30_product_file_FORECAST_HP30_SWIFT_DRIVEN_LAST.csv",
        cadence_minutes: 30,
        supports_estimate: true,
        supports_historical: false,
    },
    Provider {
        source: DataSource::Noaa,
        name: "NOAA SWPC",
        index_name: "Kp",
        default_url: "https://services.swpc.noaa.gov/products/noaa-planetary-k-index-forecast.json",
        cadence_minutes: 180,
        supports_estimate: false,
        supports_historical: true,
    },
];

/// Number of historical samples kept when historical output is requested.
pub const HISTORICAL_SAMPLE_LIMIT: usize = 16;

/// Looks up a provider by data source.
///
/// Every `DataSource` variant has a registry entry; the registry tests
/// guard that.
pub fn provider(source: DataSource) -> &'static Provider {
    PROVIDER_REGISTRY
        .iter()
        .find(|p| p.source == source)
        .unwrap_or(&PROVIDER_REGISTRY[0])
}

/// Converts a requested forecast span into a sample count for a provider:
/// `ceil(hours * 60 / cadence)`.
///
/// GFZ (30 min): 24h → 48. NOAA (3 h): 24h → 8, 25h → 9.
/// Computed in `u64` so unvalidated hour counts cannot overflow.
pub fn forecast_sample_cap(source: DataSource, forecast_hours: u32) -> usize {
    let cadence = u64::from(provider(source).cadence_minutes);
    let samples = (u64::from(forecast_hours) * 60).div_ceil(cadence);
    usize::try_from(samples).unwrap_or(usize::MAX)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
