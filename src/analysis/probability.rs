//! Visibility probability and outlook.
//!
//! Aurora visibility is symmetric across hemispheres, so only the absolute
//! observer latitude matters. Each degree poleward of the minimum latitude
//! adds 20 percentage points, capped at 100.

use crate::model::Outlook;

/// Percentage points gained per degree beyond the minimum latitude.
const PERCENT_PER_DEGREE: f64 = 20.0;

/// Absorbs binary representation error in `|lat| - min_lat` for
/// 2-decimal latitudes (60.05 - 60 is 0.04999…).
const FLOOR_TOLERANCE: f64 = 1e-9;

/// Probability (0–100) of seeing aurora at `observer_latitude` when the
/// minimum visibility latitude is `min_latitude`.
///
/// Truncates rather than rounds: a 4.99° margin gives 99, only ≥ 5.0° gives 100.
pub fn probability(observer_latitude: f64, min_latitude: i32) -> u8 {
    let diff = observer_latitude.abs() - f64::from(min_latitude);
    if diff.is_nan() || diff <= 0.0 {
        return 0;
    }
    (diff * PERCENT_PER_DEGREE + FLOOR_TOLERANCE).floor().min(100.0) as u8
}

/// Qualitative category for a probability. Upper bounds are inclusive:
/// 20 is Low, 50 is Fair, 75 is Good.
pub fn outlook(probability: u8) -> Outlook {
    match probability {
        0 => Outlook::None,
        1..=20 => Outlook::Low,
        21..=50 => Outlook::Fair,
        51..=75 => Outlook::Good,
        _ => Outlook::Excellent,
    }
}
