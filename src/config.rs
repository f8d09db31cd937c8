//! Run options and application configuration.
//!
//! `RunConfig` is the validated, immutable set of options for one forecast
//! run. `AppConfig` holds everything around it (endpoints, HTTP settings,
//! logging, defaults) and is layered from built-in defaults, an optional
//! TOML file, and environment variables (with `.env` support).

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ForecastError;
use crate::logging::LogLevel;
use crate::model::{DataSource, EstimateColumn};
use crate::providers::provider;

pub const MIN_FORECAST_HOURS: u32 = 1;
pub const MAX_FORECAST_HOURS: u32 = 72;

const DEFAULT_CONFIG_FILE: &str = "./aurora.toml";
const DEFAULT_GEOCODER_URL: &str = "https://nominatim.openstreetmap.org/search";
const DEFAULT_USER_AGENT: &str = concat!("aurora_forecast/", env!("CARGO_PKG_VERSION"));

// ---------------------------------------------------------------------------
// Run configuration
// ---------------------------------------------------------------------------

/// Validated options for a single run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub data_source: DataSource,
    pub forecast_hours: u32,
    pub min_magnitude: u32,
    /// Only meaningful for GFZ.
    pub estimate: EstimateColumn,
    /// Only allowed for NOAA.
    pub show_historical: bool,
    pub raw_output: bool,
}

/// Unvalidated run options as collected from config file and CLI flags.
/// `None` means "not specified"; `validate` fills in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RunOptions {
    pub source: Option<DataSource>,
    pub hours: Option<u32>,
    pub min_magnitude: Option<u32>,
    pub estimate: Option<EstimateColumn>,
    pub historical: Option<bool>,
    pub raw: Option<bool>,
}

impl RunOptions {
    /// Overlays `other` on top of `self`; fields set in `other` win.
    pub fn merged_with(&self, other: &RunOptions) -> RunOptions {
        RunOptions {
            source: other.source.or(self.source),
            hours: other.hours.or(self.hours),
            min_magnitude: other.min_magnitude.or(self.min_magnitude),
            estimate: other.estimate.or(self.estimate),
            historical: other.historical.or(self.historical),
            raw: other.raw.or(self.raw),
        }
    }

    /// Layers CLI flags over config-file defaults.
    ///
    /// Provider-specific file defaults (`estimate`, `historical`) are dropped
    /// when the resolved source does not support them, so a file written for
    /// one provider never rejects a run against the other. The same options
    /// passed as flags are kept and still rejected by `validate`.
    pub fn layered(file: &RunOptions, cli: &RunOptions) -> RunOptions {
        let mut merged = file.merged_with(cli);
        let info = provider(merged.source.unwrap_or(DataSource::Gfz));
        if cli.estimate.is_none() && !info.supports_estimate {
            merged.estimate = None;
        }
        if cli.historical.is_none() && !info.supports_historical {
            merged.historical = None;
        }
        merged
    }

    /// Applies defaults and checks the cross-field rules:
    /// hours in 1..=72, estimate only for providers that publish ensembles,
    /// historical only for providers whose feed includes observed values.
    pub fn validate(&self) -> Result<RunConfig, ForecastError> {
        let data_source = self.source.unwrap_or(DataSource::Gfz);
        let info = provider(data_source);

        let forecast_hours = self.hours.unwrap_or(24);
        if !(MIN_FORECAST_HOURS..=MAX_FORECAST_HOURS).contains(&forecast_hours) {
            return Err(ForecastError::InvalidConfig(format!(
                "forecast hours must be between {} and {}, got {}",
                MIN_FORECAST_HOURS, MAX_FORECAST_HOURS, forecast_hours
            )));
        }

        if self.estimate.is_some() && !info.supports_estimate {
            return Err(ForecastError::InvalidConfig(format!(
                "estimate selection is only available for providers with ensemble forecasts, not {}",
                data_source
            )));
        }

        let show_historical = self.historical.unwrap_or(false);
        if show_historical && !info.supports_historical {
            return Err(ForecastError::InvalidConfig(format!(
                "historical data is not available from {}",
                data_source
            )));
        }

        Ok(RunConfig {
            data_source,
            forecast_hours,
            min_magnitude: self.min_magnitude.unwrap_or(0),
            estimate: self.estimate.unwrap_or_default(),
            show_historical,
            raw_output: self.raw.unwrap_or(false),
        })
    }
}

// ---------------------------------------------------------------------------
// Application configuration (TOML + environment)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub geocoder: String,
    pub gfz: String,
    pub noaa: String,
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            geocoder: DEFAULT_GEOCODER_URL.to_string(),
            gfz: provider(DataSource::Gfz).default_url.to_string(),
            noaa: provider(DataSource::Noaa).default_url.to_string(),
        }
    }
}

impl EndpointConfig {
    pub fn index_url(&self, source: DataSource) -> &str {
        match source {
            DataSource::Gfz => &self.gfz,
            DataSource::Noaa => &self.noaa,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub timeout_secs: u64,
    /// Nominatim's usage policy requires an identifying User-Agent.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// One of debug, info, warn, error.
    pub level: String,
    pub file: Option<String>,
}

impl LoggingConfig {
    pub fn log_level(&self) -> Result<LogLevel, ForecastError> {
        self.level
            .parse()
            .map_err(|e| ForecastError::ConfigFile(format!("[logging] level: {}", e)))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: RunOptions,
    pub endpoints: EndpointConfig,
    pub http: HttpConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ForecastError> {
        let config: Self =
            toml::from_str(contents).map_err(|e| ForecastError::ConfigFile(e.to_string()))?;
        config.logging.log_level()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ForecastError> {
        let contents = fs::read_to_string(path).map_err(|e| {
            ForecastError::ConfigFile(format!("{}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    /// Loads configuration in precedence order: defaults, then the TOML
    /// file, then environment overrides.
    ///
    /// File lookup: `explicit_path` if given (must exist), else
    /// `$AURORA_CONFIG` (must exist), else `./aurora.toml` if present.
    pub fn load(explicit_path: Option<&Path>) -> Result<Self, ForecastError> {
        dotenv::dotenv().ok();

        let path: Option<PathBuf> = match explicit_path {
            Some(p) => Some(p.to_path_buf()),
            None => match env::var("AURORA_CONFIG") {
                Ok(p) if !p.trim().is_empty() => Some(PathBuf::from(p)),
                _ => {
                    let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                    default.exists().then_some(default)
                }
            },
        };

        let mut config = match path {
            Some(p) => Self::from_file(&p)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|key| env::var(key).ok());
        Ok(config)
    }

    /// Applies `AURORA_*` overrides. The lookup is injected so tests do not
    /// have to mutate the process environment.
    pub fn apply_env_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = non_empty("AURORA_GEOCODER_URL") {
            self.endpoints.geocoder = url;
        }
        if let Some(url) = non_empty("AURORA_GFZ_URL") {
            self.endpoints.gfz = url;
        }
        if let Some(url) = non_empty("AURORA_NOAA_URL") {
            self.endpoints.noaa = url;
        }
        if let Some(file) = non_empty("AURORA_LOG_FILE") {
            self.logging.file = Some(file);
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
