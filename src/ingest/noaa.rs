/// NOAA SWPC planetary Kp forecast parser
///
/// The Kp forecast product is a JSON array of arrays. The first inner array
/// holds column labels; each following one is a 3-hour interval:
///
///   [["time_tag","kp","observed","noaa_scale"],
///    ["2026-01-21 00:00:00","2.67","observed",null],
///    ["2026-01-21 03:00:00","4.00","predicted",null]]
///
/// Values arrive as strings in current feeds and as numbers in older ones;
/// both are accepted.

use chrono::NaiveDateTime;
use serde_json::Value;

use crate::analysis::window::truncate_to_minute;
use crate::error::ForecastError;
use crate::ingest::validate_index_value;
use crate::logging::{self, Component};
use crate::model::{DataSource, IndexSample};

/// Timestamp layouts seen in the `time_tag` column.
const NOAA_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

fn invalid(reason: impl Into<String>) -> ForecastError {
    ForecastError::UpstreamInvalid {
        provider: DataSource::Noaa,
        reason: reason.into(),
    }
}

/// Parse a NOAA Kp forecast payload.
///
/// - blank body or `[]` → `UpstreamEmpty`
/// - not JSON, not an array, or no readable first cell → `UpstreamInvalid`
/// - first data row malformed, or header only → `ParseFailure`
///
/// Malformed rows after the first are skipped.
pub fn parse_noaa_json(body: &str) -> Result<Vec<IndexSample>, ForecastError> {
    if body.trim().is_empty() {
        return Err(ForecastError::UpstreamEmpty(DataSource::Noaa));
    }

    let root: Value =
        serde_json::from_str(body).map_err(|e| invalid(format!("not valid JSON: {}", e)))?;
    let rows = root
        .as_array()
        .ok_or_else(|| invalid("top level is not an array"))?;

    if rows.is_empty() {
        return Err(ForecastError::UpstreamEmpty(DataSource::Noaa));
    }

    rows[0]
        .as_array()
        .and_then(|header| header.first())
        .ok_or_else(|| invalid("first element is not a non-empty array"))?;

    let mut samples = Vec::new();
    for (i, row) in rows.iter().skip(1).enumerate() {
        match parse_row(row) {
            Ok(sample) => samples.push(sample),
            Err(reason) if i == 0 => {
                return Err(ForecastError::ParseFailure {
                    provider: DataSource::Noaa,
                    reason: format!("first data row: {}", reason),
                });
            }
            Err(reason) => {
                logging::debug(Component::Noaa, None, &format!("skipping row {}: {}", i + 1, reason));
            }
        }
    }

    if samples.is_empty() {
        return Err(ForecastError::ParseFailure {
            provider: DataSource::Noaa,
            reason: "no data rows after header".to_string(),
        });
    }

    Ok(samples)
}

fn parse_row(row: &Value) -> Result<IndexSample, String> {
    let cells = row.as_array().ok_or("row is not an array")?;

    let time_str = cells
        .first()
        .and_then(Value::as_str)
        .ok_or("missing time_tag")?;
    let timestamp = parse_time_tag(time_str)?;

    let value = match cells.get(1) {
        Some(Value::String(s)) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid Kp value '{}'", s))?,
        Some(Value::Number(n)) => n.as_f64().ok_or("Kp value out of range")?,
        Some(other) => return Err(format!("unexpected Kp value {}", other)),
        None => return Err("missing Kp value".to_string()),
    };

    Ok(IndexSample {
        timestamp,
        value: validate_index_value(value)?,
    })
}

/// Parses a `time_tag` and drops anything below minute precision.
fn parse_time_tag(s: &str) -> Result<NaiveDateTime, String> {
    let s = s.trim();
    NOAA_TIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(truncate_to_minute)
        .ok_or_else(|| format!("invalid time_tag '{}'", s))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = r#"["time_tag","kp","observed","noaa_scale"]"#;

    fn payload(rows: &[&str]) -> String {
        let mut parts = vec![HEADER];
        parts.extend_from_slice(rows);
        format!("[{}]", parts.join(","))
    }

    #[test]
    fn test_parses_string_and_numeric_values() {
        let body = payload(&[
            r#"["2026-01-21 00:00:00","2.67","observed",null]"#,
            r#"["2026-01-21 03:00:00",4.33,"predicted","G1"]"#,
        ]);
        let samples = parse_noaa_json(&body).expect("valid payload");
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].formatted_time(), "2026-01-21 00:00");
        assert_eq!(samples[0].value, 2.67);
        assert_eq!(samples[1].formatted_time(), "2026-01-21 03:00");
        assert_eq!(samples[1].value, 4.33);
    }

    #[test]
    fn test_accepts_minute_and_millisecond_time_tags() {
        let body = payload(&[
            r#"["2026-01-21 06:00","3.00"]"#,
            r#"["2026-01-21T09:00:00.000","5.00"]"#,
        ]);
        let samples = parse_noaa_json(&body).unwrap();
        assert_eq!(samples[0].formatted_time(), "2026-01-21 06:00");
        assert_eq!(samples[1].formatted_time(), "2026-01-21 09:00");
    }

    // --- Error taxonomy -----------------------------------------------------

    #[test]
    fn test_empty_array_is_upstream_empty() {
        assert_eq!(parse_noaa_json("[]"), Err(ForecastError::UpstreamEmpty(DataSource::Noaa)));
        assert_eq!(parse_noaa_json("  "), Err(ForecastError::UpstreamEmpty(DataSource::Noaa)));
    }

    #[test]
    fn test_wrong_shape_is_upstream_invalid() {
        for body in [
            r#"{"error":"maintenance"}"#,
            r#"[{"time_tag":"2026-01-21 00:00:00","kp":2.67}]"#,
            r#"[[]]"#,
            "<html>502 Bad Gateway</html>",
        ] {
            assert!(
                matches!(parse_noaa_json(body), Err(ForecastError::UpstreamInvalid { .. })),
                "body {} should be UpstreamInvalid",
                body
            );
        }
    }

    #[test]
    fn test_header_only_is_parse_failure() {
        let result = parse_noaa_json(&payload(&[]));
        assert!(matches!(result, Err(ForecastError::ParseFailure { .. })), "got {:?}", result);
    }

    #[test]
    fn test_malformed_first_row_fails_whole_parse() {
        let body = payload(&[
            r#"["2026-01-21 00:00:00","n/a"]"#,
            r#"["2026-01-21 03:00:00","4.00"]"#,
        ]);
        assert!(matches!(parse_noaa_json(&body), Err(ForecastError::ParseFailure { .. })));
    }

    #[test]
    fn test_malformed_later_rows_are_skipped() {
        let body = payload(&[
            r#"["2026-01-21 00:00:00","2.00"]"#,
            r#"["2026-01-21 03:00:00",null]"#,
            r#""not a row""#,
            r#"["2026-01-21 09:00:00","6.67"]"#,
        ]);
        let samples = parse_noaa_json(&body).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[1].value, 6.67);
    }
}
