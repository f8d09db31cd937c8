//! Location-specific aurora visibility forecasts.
//!
//! Combines a geomagnetic index forecast (GFZ Hp30 or NOAA Kp) with the
//! geocoded latitude of a place name and renders per-interval visibility
//! probabilities as a table or as tab-separated records.

pub mod analysis;
pub mod config;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod providers;
pub mod render;
