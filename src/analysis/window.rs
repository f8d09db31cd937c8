//! Forecast windowing.
//!
//! Splits a normalized series at `now` into a historical slice and a forecast
//! slice, applies the magnitude filter, truncates each slice, and enriches
//! every retained sample with its visibility figures.
//!
//! # Clock injection
//! `now` is a parameter rather than a call to `Utc::now()`, so windowing is
//! deterministic in tests and the same inputs always give the same window.

use chrono::{NaiveDateTime, Timelike};

use crate::analysis::latitude::minimum_latitude;
use crate::analysis::probability::{outlook, probability};
use crate::config::RunConfig;
use crate::model::{EnrichedSample, ForecastWindow, IndexSample};
use crate::providers::{HISTORICAL_SAMPLE_LIMIT, forecast_sample_cap};

/// Attaches minimum latitude, probability, and outlook to a sample.
pub fn enrich(sample: &IndexSample, observer_latitude: f64) -> EnrichedSample {
    let min_latitude = minimum_latitude(sample.value);
    let probability = probability(observer_latitude, min_latitude);
    EnrichedSample {
        sample: sample.clone(),
        min_latitude,
        probability,
        outlook: outlook(probability),
    }
}

/// Drops seconds and sub-seconds so `now` compares at the same precision as
/// the series timestamps.
pub fn truncate_to_minute(now: NaiveDateTime) -> NaiveDateTime {
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

/// Builds the historical and forecast slices for one run.
///
/// - historical: samples strictly before `now`, sorted ascending, last 16
///   kept; only computed when `config.show_historical` is set.
/// - forecast: samples at or after `now` in provider order, first N kept
///   where N comes from the requested hours and the provider cadence.
///
/// The magnitude filter runs before truncation on both slices, so a strict
/// filter can shrink the window below its nominal size.
pub fn build_window(
    series: &[IndexSample],
    now: NaiveDateTime,
    config: &RunConfig,
    observer_latitude: f64,
) -> ForecastWindow {
    let now = truncate_to_minute(now);
    let passes_filter = |s: &&IndexSample| {
        config.min_magnitude == 0 || s.value >= f64::from(config.min_magnitude)
    };

    let historical = if config.show_historical {
        let mut past: Vec<&IndexSample> = series
            .iter()
            .filter(|s| s.timestamp < now)
            .filter(passes_filter)
            .collect();
        past.sort_by_key(|s| s.timestamp);
        let skip = past.len().saturating_sub(HISTORICAL_SAMPLE_LIMIT);
        past[skip..]
            .iter()
            .map(|s| enrich(s, observer_latitude))
            .collect()
    } else {
        Vec::new()
    };

    let cap = forecast_sample_cap(config.data_source, config.forecast_hours);
    let forecast = series
        .iter()
        .filter(|s| s.timestamp >= now)
        .filter(passes_filter)
        .take(cap)
        .map(|s| enrich(s, observer_latitude))
        .collect();

    ForecastWindow { historical, forecast }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DataSource, EstimateColumn, Outlook};
    use chrono::{Duration, NaiveDate};

    /// A fixed "now" used across all tests: 2026-01-21 06:00 UTC.
    fn fixed_now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, 21)
            .unwrap()
            .and_hms_opt(6, 0, 0)
            .unwrap()
    }

    fn config(source: DataSource, hours: u32) -> RunConfig {
        RunConfig {
            data_source: source,
            forecast_hours: hours,
            min_magnitude: 0,
            estimate: EstimateColumn::Median,
            show_historical: false,
            raw_output: false,
        }
    }

    /// One sample per value starting at `start`, spaced `step_minutes` apart.
    fn series(start: NaiveDateTime, step_minutes: i64, values: &[f64]) -> Vec<IndexSample> {
        values
            .iter()
            .enumerate()
            .map(|(i, &value)| IndexSample {
                timestamp: start + Duration::minutes(step_minutes * i as i64),
                value,
            })
            .collect()
    }

    // --- Split --------------------------------------------------------------

    #[test]
    fn test_sample_at_now_belongs_to_forecast() {
        let data = series(fixed_now() - Duration::minutes(30), 30, &[3.0, 4.0, 5.0]);
        let mut cfg = config(DataSource::Noaa, 72);
        cfg.show_historical = true;
        let window = build_window(&data, fixed_now(), &cfg, 65.0);
        assert_eq!(window.historical.len(), 1);
        assert_eq!(window.forecast.len(), 2);
        assert_eq!(window.forecast[0].sample.timestamp, fixed_now());
    }

    #[test]
    fn test_now_with_seconds_is_truncated_before_split() {
        let data = series(fixed_now(), 30, &[3.0]);
        let now = fixed_now() + Duration::seconds(45);
        let window = build_window(&data, now, &config(DataSource::Gfz, 1), 65.0);
        assert_eq!(window.forecast.len(), 1, "06:00 sample is not in the past at 06:00:45");
    }

    #[test]
    fn test_historical_not_computed_unless_requested() {
        let data = series(fixed_now() - Duration::hours(9), 180, &[2.0, 3.0, 4.0, 5.0]);
        let window = build_window(&data, fixed_now(), &config(DataSource::Noaa, 24), 65.0);
        assert!(window.historical.is_empty());
        assert_eq!(window.forecast.len(), 1);
    }

    // --- Truncation ---------------------------------------------------------

    #[test]
    fn test_gfz_forecast_capped_at_two_samples_per_hour() {
        let data = series(fixed_now(), 30, &[3.0; 100]);
        let window = build_window(&data, fixed_now(), &config(DataSource::Gfz, 24), 65.0);
        assert_eq!(window.forecast.len(), 48);
    }

    #[test]
    fn test_noaa_forecast_cap_uses_ceiling_of_hours_over_three() {
        let data = series(fixed_now(), 180, &[3.0; 30]);
        let w24 = build_window(&data, fixed_now(), &config(DataSource::Noaa, 24), 65.0);
        let w25 = build_window(&data, fixed_now(), &config(DataSource::Noaa, 25), 65.0);
        assert_eq!(w24.forecast.len(), 8);
        assert_eq!(w25.forecast.len(), 9);
    }

    #[test]
    fn test_historical_keeps_most_recent_sixteen_sorted_ascending() {
        // 20 past samples, deliberately shuffled.
        let mut data = series(fixed_now() - Duration::hours(60), 180, &[1.0; 20]);
        data.reverse();
        data.swap(3, 11);
        let mut cfg = config(DataSource::Noaa, 3);
        cfg.show_historical = true;
        let window = build_window(&data, fixed_now(), &cfg, 65.0);

        assert_eq!(window.historical.len(), 16);
        for pair in window.historical.windows(2) {
            assert!(pair[0].sample.timestamp < pair[1].sample.timestamp);
        }
        assert_eq!(
            window.historical.last().unwrap().sample.timestamp,
            fixed_now() - Duration::hours(3),
            "the newest past sample must be retained"
        );
    }

    #[test]
    fn test_forecast_keeps_provider_order() {
        let mut data = series(fixed_now(), 180, &[1.0, 2.0, 3.0]);
        data.swap(0, 2);
        let window = build_window(&data, fixed_now(), &config(DataSource::Noaa, 72), 65.0);
        let values: Vec<f64> = window.forecast.iter().map(|e| e.sample.value).collect();
        assert_eq!(values, vec![3.0, 2.0, 1.0]);
    }

    // --- Magnitude filter ---------------------------------------------------

    #[test]
    fn test_magnitude_filter_applies_before_truncation() {
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 2.0 } else { 8.0 }).collect();
        let data = series(fixed_now(), 30, &values);
        let mut cfg = config(DataSource::Gfz, 10); // cap 20 admits all samples
        cfg.min_magnitude = 5;
        let window = build_window(&data, fixed_now(), &cfg, 65.0);

        assert_eq!(window.forecast.len(), 10, "all ten 8-valued samples survive");
        assert!(window.forecast.iter().all(|e| e.sample.value == 8.0));
    }

    #[test]
    fn test_magnitude_filter_can_shrink_window_below_cap() {
        let values: Vec<f64> = (0..20).map(|i| if i % 2 == 0 { 2.0 } else { 8.0 }).collect();
        let data = series(fixed_now(), 30, &values);
        let mut cfg = config(DataSource::Gfz, 3); // cap 6
        cfg.min_magnitude = 5;
        let window = build_window(&data, fixed_now(), &cfg, 65.0);
        assert_eq!(window.forecast.len(), 6);
        assert_eq!(window.forecast[0].sample.timestamp, fixed_now() + Duration::minutes(30));
    }

    #[test]
    fn test_magnitude_filter_also_applies_to_historical() {
        let data = series(fixed_now() - Duration::hours(12), 180, &[2.0, 6.0, 3.0, 7.0, 1.0]);
        let mut cfg = config(DataSource::Noaa, 3);
        cfg.show_historical = true;
        cfg.min_magnitude = 5;
        let window = build_window(&data, fixed_now(), &cfg, 65.0);
        let past: Vec<f64> = window.historical.iter().map(|e| e.sample.value).collect();
        assert_eq!(past, vec![6.0, 7.0]);
        assert!(window.forecast.is_empty());
        assert!(!window.has_results());
    }

    // --- Enrichment & purity ------------------------------------------------

    #[test]
    fn test_samples_are_enriched_for_observer_latitude() {
        let data = series(fixed_now(), 30, &[6.0]);
        let window = build_window(&data, fixed_now(), &config(DataSource::Gfz, 1), 59.33);
        let row = &window.forecast[0];
        assert_eq!(row.min_latitude, 57);
        assert_eq!(row.probability, 46);
        assert_eq!(row.outlook, Outlook::Fair);
    }

    #[test]
    fn test_windowing_is_idempotent() {
        let data = series(fixed_now() - Duration::hours(6), 30, &[1.0, 4.5, 6.5, 8.0, 2.0, 9.3]);
        let mut cfg = config(DataSource::Noaa, 24);
        cfg.show_historical = true;
        let first = build_window(&data, fixed_now(), &cfg, 64.12);
        let second = build_window(&data, fixed_now(), &cfg, 64.12);
        assert_eq!(first, second);
    }
}
