//! Visibility analysis for the aurora forecast service.
//!
//! Pure computations over normalized index series. Nothing in here performs
//! I/O or reads the clock; `now` and the observer latitude are passed in.
//!
//! Submodules:
//! - `latitude`: index value → minimum visibility latitude.
//! - `probability`: observer latitude vs. minimum latitude → probability and outlook.
//! - `window`: splits a series into historical and forecast slices and enriches them.

pub mod latitude;
pub mod probability;
pub mod window;
