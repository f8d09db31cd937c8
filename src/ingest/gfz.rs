/// GFZ Potsdam Hp30 forecast parser
///
/// The GFZ space weather service publishes an ensemble Hp30 forecast as a
/// CSV file: one header line, then one row per 30-minute interval:
///
///   Time (UTC),minimum,0.25-quantile,median,0.75-quantile,maximum,...
///   21-01-2026 06:30,5.33,5.67,6.0,6.33,7.1
///
/// Only the timestamp and the requested estimate column are kept.

use chrono::NaiveDateTime;

use crate::error::ForecastError;
use crate::ingest::validate_index_value;
use crate::logging::{self, Component};
use crate::model::{DataSource, EstimateColumn, IndexSample};

/// GFZ timestamp layout (day first).
const GFZ_TIME_FORMAT: &str = "%d-%m-%Y %H:%M";

/// Parse a GFZ Hp30 CSV payload.
///
/// - no non-blank lines → `UpstreamEmpty`
/// - header without a delimiter → `UpstreamInvalid`
/// - first data row malformed, or no valid rows at all → `ParseFailure`
///
/// Malformed rows after the first are skipped.
pub fn parse_gfz_csv(
    body: &str,
    estimate: EstimateColumn,
) -> Result<Vec<IndexSample>, ForecastError> {
    let mut lines = body.lines().filter(|l| !l.trim().is_empty());

    let header = lines.next().ok_or(ForecastError::UpstreamEmpty(DataSource::Gfz))?;
    if !header.contains(',') {
        return Err(ForecastError::UpstreamInvalid {
            provider: DataSource::Gfz,
            reason: "header line is not comma-delimited".to_string(),
        });
    }

    let column = estimate.column_index();
    let mut samples = Vec::new();

    for (i, line) in lines.enumerate() {
        match parse_row(line, column) {
            Ok(sample) => samples.push(sample),
            Err(reason) if i == 0 => {
                return Err(ForecastError::ParseFailure {
                    provider: DataSource::Gfz,
                    reason: format!("first data row: {}", reason),
                });
            }
            Err(reason) => {
                logging::debug(Component::Gfz, None, &format!("skipping row {}: {}", i + 2, reason));
            }
        }
    }

    if samples.is_empty() {
        return Err(ForecastError::ParseFailure {
            provider: DataSource::Gfz,
            reason: "no data rows after header".to_string(),
        });
    }

    Ok(samples)
}

/// Parse one CSV row into a sample, reading the value from `column`.
fn parse_row(line: &str, column: usize) -> Result<IndexSample, String> {
    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() <= column {
        return Err(format!(
            "expected at least {} columns, found {}",
            column + 1,
            fields.len()
        ));
    }

    let time_str = fields[0].trim();
    let timestamp = NaiveDateTime::parse_from_str(time_str, GFZ_TIME_FORMAT)
        .map_err(|e| format!("invalid timestamp '{}': {}", time_str, e))?;

    let value_str = fields[column].trim();
    let value: f64 = value_str
        .parse()
        .map_err(|_| format!("invalid value '{}'", value_str))?;

    Ok(IndexSample {
        timestamp,
        value: validate_index_value(value)?,
    })
}

// ============================================================================
// Tests
// ============================================================================
