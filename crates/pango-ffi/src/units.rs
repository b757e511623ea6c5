//! Conversions between Pango units and device units.
//!
//! Pure Rust versions of `pango_units_from_double`, `pango_units_to_double`
//! and the `PANGO_PIXELS` family, so callers don't need a native call for
//! arithmetic.

use crate::sys::PANGO_SCALE;

/// Device units to Pango units, rounding to nearest.
pub fn units_from_double(d: f64) -> i32 {
    (d * PANGO_SCALE as f64 + 0.5).floor() as i32
}

/// Pango units to device units.
pub fn units_to_double(i: i32) -> f64 {
    i as f64 / PANGO_SCALE as f64
}

/// Round Pango units to whole device units (`PANGO_PIXELS`).
pub fn pixels(d: i32) -> i32 {
    (d + 512) >> 10
}

pub fn pixels_floor(d: i32) -> i32 {
    d >> 10
}

pub fn pixels_ceil(d: i32) -> i32 {
    (d + 1023) >> 10
}
