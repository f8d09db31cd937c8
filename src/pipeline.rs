//! Forecast pipeline orchestration.
//!
//! validate config → geocode → fetch → parse → window → render → classify.
//!
//! Every stage short-circuits on failure and nothing is rendered until all
//! data is available, so a failed run never produces partial output. There
//! are no retries at this layer.

use chrono::NaiveDateTime;

use crate::analysis::window::build_window;
use crate::config::{RunConfig, RunOptions};
use crate::error::ForecastError;
use crate::ingest::http::classify_status;
use crate::ingest::{Fetcher, Geocoder, IndexSeriesParser};
use crate::logging::{self, Component};
use crate::model::GeoPoint;
use crate::render::{RenderOptions, ReportContext, render};

/// Terminal non-failure states of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// At least one forecast row survived filtering.
    Success,
    /// The run completed but no forecast row qualified.
    NoResults,
}

impl RunStatus {
    pub fn exit_code(self) -> u8 {
        match self {
            RunStatus::Success => 0,
            RunStatus::NoResults => 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub status: RunStatus,
    /// Rendered text for stdout. Empty in raw mode when there are no results.
    pub output: String,
    pub location: GeoPoint,
    pub config: RunConfig,
}

/// Runs one forecast for `location_query`.
///
/// `now` is read once by the caller and used for the historical/forecast
/// split and the report's generation time.
pub fn run_forecast<G, F>(
    location_query: &str,
    options: &RunOptions,
    geocoder: &G,
    fetcher: &F,
    now: NaiveDateTime,
    color: bool,
) -> Result<RunOutcome, ForecastError>
where
    G: Geocoder,
    F: Fetcher,
{
    let config = options
        .validate()
        .inspect_err(|e| logging::log_failure(Component::Pipeline, "Config validation", e))?;

    let query = location_query.trim();
    if query.is_empty() {
        return Err(ForecastError::InvalidConfig("location must not be empty".to_string()));
    }

    let location = geocoder
        .geocode(query)
        .inspect_err(|e| logging::log_failure(Component::Geocoder, "Geocoding", e))?;
    logging::info(
        Component::Geocoder,
        Some(query),
        &format!(
            "resolved to {} ({:.2}, {:.2})",
            location.display_name, location.latitude, location.longitude
        ),
    );

    let source = config.data_source;
    let component = Component::from(source);
    let response = fetcher
        .fetch(source)
        .inspect_err(|e| logging::log_failure(component, "Fetch", e))?;
    if response.status != 200 {
        let err = classify_status(&source.to_string(), response.status)
            .unwrap_or(ForecastError::HttpStatus(response.status));
        logging::log_failure(component, "Fetch", &err);
        return Err(err);
    }

    let parser = IndexSeriesParser::for_config(&config);
    let series = parser
        .parse(&response.body)
        .inspect_err(|e| logging::log_failure(component, "Parse", e))?;
    logging::debug(component, None, &format!("parsed {} samples", series.len()));

    let window = build_window(&series, now, &config, location.latitude);
    logging::debug(
        Component::Pipeline,
        None,
        &format!(
            "window: {} historical, {} forecast",
            window.historical.len(),
            window.forecast.len()
        ),
    );

    let ctx = ReportContext {
        location: &location,
        config: &config,
        generated_at: now,
    };
    let rendered = render(&window, &ctx, RenderOptions { raw: config.raw_output, color });

    let status = if rendered.had_results {
        RunStatus::Success
    } else {
        logging::info(Component::Pipeline, None, "no forecast periods match the filters");
        RunStatus::NoResults
    };

    Ok(RunOutcome {
        status,
        output: rendered.text,
        location,
        config,
    })
}
