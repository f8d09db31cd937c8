//! Forecast rendering.
//!
//! Two mutually exclusive modes:
//! - table: header block with run metadata, then an aligned table with
//!   historical rows (if any), a divider, and forecast rows.
//! - raw: forecast rows only, tab-separated, no header, no color.
//!
//! Rendering is pure: it returns text and never touches stdout or detects
//! a terminal. Color is an explicit option.

use chrono::NaiveDateTime;

use crate::config::RunConfig;
use crate::model::{DataSource, EnrichedSample, ForecastWindow, GeoPoint, Outlook, TIMESTAMP_FORMAT};
use crate::providers::provider;

const ANSI_RESET: &str = "\x1b[0m";
const ANSI_DIM: &str = "\x1b[2m";
const ANSI_BOLD: &str = "\x1b[1m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderOptions {
    pub raw: bool,
    /// ANSI colors in table mode. Ignored in raw mode.
    pub color: bool,
}

/// Metadata shown in the table header.
#[derive(Debug, Clone, Copy)]
pub struct ReportContext<'a> {
    pub location: &'a GeoPoint,
    pub config: &'a RunConfig,
    pub generated_at: NaiveDateTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedOutput {
    pub text: String,
    /// True iff the forecast slice is non-empty.
    pub had_results: bool,
}

pub fn render(window: &ForecastWindow, ctx: &ReportContext<'_>, options: RenderOptions) -> RenderedOutput {
    let text = if options.raw {
        render_raw(window)
    } else {
        render_table(window, ctx, options.color)
    };
    RenderedOutput {
        text,
        had_results: window.has_results(),
    }
}

// ---------------------------------------------------------------------------
// Raw mode
// ---------------------------------------------------------------------------

/// One line per forecast row:
/// `timestamp \t index(2dp) \t min_latitude \t probability \t outlook`.
pub fn render_raw(window: &ForecastWindow) -> String {
    window
        .forecast
        .iter()
        .map(|row| {
            format!(
                "{}\t{:.2}\t{}\t{}\t{}\n",
                row.sample.formatted_time(),
                row.sample.value,
                row.min_latitude,
                row.probability,
                row.outlook
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Table mode
// ---------------------------------------------------------------------------

const TIME_WIDTH: usize = 16;
const INDEX_WIDTH: usize = 6;
const MIN_LAT_WIDTH: usize = 7;
const PROBABILITY_WIDTH: usize = 11;

const NO_RESULTS_LINE: &str = "No forecast periods match the current filters.";

fn outlook_color(outlook: Outlook) -> &'static str {
    match outlook {
        Outlook::None => "\x1b[90m",
        Outlook::Low => "\x1b[34m",
        Outlook::Fair => "\x1b[36m",
        Outlook::Good => "\x1b[33m",
        Outlook::Excellent => "\x1b[32m",
    }
}

fn paint(text: &str, code: &str, color: bool) -> String {
    if color {
        format!("{}{}{}", code, text, ANSI_RESET)
    } else {
        text.to_string()
    }
}

fn header_block(ctx: &ReportContext<'_>, color: bool) -> Vec<String> {
    let source = ctx.config.data_source;
    let info = provider(source);

    let mut lines = vec![
        paint(&format!("Aurora forecast for {}", ctx.location.display_name), ANSI_BOLD, color),
        format!(
            "  Coordinates:      {:.2}, {:.2}",
            ctx.location.latitude, ctx.location.longitude
        ),
        format!("  Data source:      {} ({})", info.name, info.index_name),
    ];
    if source == DataSource::Gfz {
        lines.push(format!("  Estimate:         {}", ctx.config.estimate));
    }
    let filter = match ctx.config.min_magnitude {
        0 => "none".to_string(),
        m => format!("{} ≥ {}", info.index_name, m),
    };
    lines.push(format!("  Magnitude filter: {}", filter));
    lines.push(format!(
        "  Generated:        {} UTC",
        ctx.generated_at.format(TIMESTAMP_FORMAT)
    ));
    lines
}

fn table_row(row: &EnrichedSample, color: bool, dim: bool) -> String {
    let cells = format!(
        "{:<tw$}  {:>iw$.2}  {:>mw$}  {:>pw$}  ",
        row.sample.formatted_time(),
        row.sample.value,
        format!("≥{}°", row.min_latitude),
        format!("{}%", row.probability),
        tw = TIME_WIDTH,
        iw = INDEX_WIDTH,
        mw = MIN_LAT_WIDTH,
        pw = PROBABILITY_WIDTH,
    );
    let outlook = paint(&row.outlook.to_string(), outlook_color(row.outlook), color);
    if dim && color {
        format!("{}{}{}{}", ANSI_DIM, cells, ANSI_RESET, outlook)
    } else {
        format!("{}{}", cells, outlook)
    }
}

pub fn render_table(window: &ForecastWindow, ctx: &ReportContext<'_>, color: bool) -> String {
    let index_name = provider(ctx.config.data_source).index_name;
    let mut lines = header_block(ctx, color);
    lines.push(String::new());

    if !window.has_results() && window.historical.is_empty() {
        lines.push(NO_RESULTS_LINE.to_string());
        return lines.join("\n") + "\n";
    }

    lines.push(format!(
        "{:<tw$}  {:>iw$}  {:>mw$}  {:>pw$}  Outlook",
        "Time (UTC)",
        index_name,
        "Min Lat",
        "Probability",
        tw = TIME_WIDTH,
        iw = INDEX_WIDTH,
        mw = MIN_LAT_WIDTH,
        pw = PROBABILITY_WIDTH,
    ));
    lines.push(format!(
        "{}  {}  {}  {}  {}",
        "-".repeat(TIME_WIDTH),
        "-".repeat(INDEX_WIDTH),
        "-".repeat(MIN_LAT_WIDTH),
        "-".repeat(PROBABILITY_WIDTH),
        "-".repeat(9),
    ));

    if !window.historical.is_empty() {
        lines.extend(window.historical.iter().map(|row| table_row(row, color, true)));
        lines.push(paint(&divider(), ANSI_DIM, color));
    }
    if window.has_results() {
        lines.extend(window.forecast.iter().map(|row| table_row(row, color, false)));
    } else {
        lines.push(NO_RESULTS_LINE.to_string());
    }

    lines.join("\n") + "\n"
}

/// Separator between historical and forecast rows.
pub fn divider() -> String {
    let label = " forecast ";
    let total = TIME_WIDTH + INDEX_WIDTH + MIN_LAT_WIDTH + PROBABILITY_WIDTH + 9 + 8;
    let side = (total - label.chars().count()) / 2;
    format!("{}{}{}", "─".repeat(side), label, "─".repeat(side))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
