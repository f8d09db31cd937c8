use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::Utc;
use clap::{ArgAction, Parser, ValueEnum};

use aurora_forecast::config::{AppConfig, RunOptions};
use aurora_forecast::ingest::http::HttpClient;
use aurora_forecast::logging::{self, Component, LogLevel};
use aurora_forecast::model::{DataSource, EstimateColumn};
use aurora_forecast::pipeline::run_forecast;

#[derive(Parser, Debug)]
#[command(author, version, about = "Aurora visibility forecast for a place name", long_about = None)]
struct Cli {
    /// Place to forecast for, e.g. "Tromsø" or "Fairbanks, Alaska"
    #[arg(required = true, num_args = 1..)]
    location: Vec<String>,

    /// Geomagnetic index provider
    #[arg(short, long, value_enum)]
    source: Option<SourceOpt>,

    /// Forecast span in hours (1-72)
    #[arg(short = 'H', long)]
    hours: Option<u32>,

    /// Only show periods with an index value at or above this
    #[arg(short, long)]
    min_magnitude: Option<u32>,

    /// GFZ ensemble column to use
    #[arg(short, long, value_enum)]
    estimate: Option<EstimateOpt>,

    /// Include up to 16 past observations (NOAA only)
    #[arg(long, action = ArgAction::SetTrue)]
    historical: bool,

    /// Tab-separated forecast rows only, for scripts
    #[arg(short, long, action = ArgAction::SetTrue)]
    raw: bool,

    /// When to use ANSI colors in table output
    #[arg(long, value_enum, default_value_t = ColorOpt::Auto)]
    color: ColorOpt,

    /// Path to a TOML config file (default: $AURORA_CONFIG or ./aurora.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Debug logging with timestamps on stderr
    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SourceOpt {
    Gfz,
    Noaa,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum EstimateOpt {
    Low,
    Median,
    High,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum ColorOpt {
    Auto,
    Always,
    Never,
}

impl Cli {
    /// Flags the user actually passed; unset flags fall back to the
    /// config file defaults.
    fn run_options(&self) -> RunOptions {
        RunOptions {
            source: self.source.map(|s| match s {
                SourceOpt::Gfz => DataSource::Gfz,
                SourceOpt::Noaa => DataSource::Noaa,
            }),
            hours: self.hours,
            min_magnitude: self.min_magnitude,
            estimate: self.estimate.map(|e| match e {
                EstimateOpt::Low => EstimateColumn::Low,
                EstimateOpt::Median => EstimateColumn::Median,
                EstimateOpt::High => EstimateColumn::High,
            }),
            historical: self.historical.then_some(true),
            raw: self.raw.then_some(true),
        }
    }

    fn use_color(&self) -> bool {
        match self.color {
            ColorOpt::Always => true,
            ColorOpt::Never => false,
            ColorOpt::Auto => {
                std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
            }
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let app = match AppConfig::load(cli.config.as_deref()) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    let level = if cli.verbose {
        LogLevel::Debug
    } else {
        match app.logging.log_level() {
            Ok(level) => level,
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(e.exit_code());
            }
        }
    };
    logging::init_logger(level, app.logging.file.as_deref(), cli.verbose);

    let client = match HttpClient::new(&app) {
        Ok(client) => client,
        Err(e) => {
            logging::log_failure(Component::System, "HTTP client setup", &e);
            eprintln!("Error: {}", e);
            return ExitCode::from(e.exit_code());
        }
    };

    let options = RunOptions::layered(&app.defaults, &cli.run_options());
    let location = cli.location.join(" ");
    let now = Utc::now().naive_utc();

    match run_forecast(&location, &options, &client, &client, now, cli.use_color()) {
        Ok(outcome) => {
            print!("{}", outcome.output);
            ExitCode::from(outcome.status.exit_code())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(e.exit_code())
        }
    }
}
