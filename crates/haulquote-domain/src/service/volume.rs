//! Volume calculation from bounding-box measurements

use haulquote_types::Measurement;

pub const CUBIC_FEET_PER_CUBIC_YARD: f64 = 27.0;

/// Slack applied before rounding up so that binary noise such as
/// `0.30000000000000004` does not bump a value to the next tenth.
const ROUNDING_SLACK: f64 = 1e-9;

/// Density-adjusted pile volume in cubic yards.
pub fn volume_cubic_yards(m: &Measurement) -> f64 {
    let cubic_feet = m.length_ft * m.width_ft * m.height_ft * m.density_factor;
    (cubic_feet / CUBIC_FEET_PER_CUBIC_YARD).max(0.0)
}

/// Round up at the tenths digit. Quotes err high, never low.
pub fn ceil_to_tenth(value: f64) -> f64 {
    if value <= 0.0 {
        return 0.0;
    }
    ((value * 10.0) - ROUNDING_SLACK).ceil() / 10.0
}

/// Display form of a volume, e.g. `3.1 yds³`.
pub fn format_volume(value: f64) -> String {
    format!("{:.1} yds³", ceil_to_tenth(value))
}
