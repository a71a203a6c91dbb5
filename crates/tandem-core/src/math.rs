//! Level conversions and numeric helpers for the dynamics path.
//!
//! All functions are allocation-free and `no_std` friendly.
//!
//! # Level Conversions
//!
//! - [`db_to_linear`] / [`linear_to_db`] - Convert between dB and linear gain
//! - [`level_db`] - Rectified sample level in dB, floored at [`SILENCE_FLOOR_DB`]
//!
//! # Utilities
//!
//! - [`flush_denormal`] - Zero out values small enough to turn subnormal

use libm::{expf, logf};

/// Lowest level, in dB, the envelope path ever reports.
///
/// Silence (an exact zero sample) maps to this value instead of −∞.
pub const SILENCE_FLOOR_DB: f32 = -100.0;

/// Convert decibels to linear gain.
///
/// # Arguments
/// * `db` - Value in decibels
///
/// # Returns
/// Linear gain value (e.g., 0 dB → 1.0, -6 dB → 0.5, +6 dB → 2.0)
///
/// # Example
/// ```rust
/// use tandem_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    // 10^(dB/20) = e^(dB * ln(10)/20)
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Convert linear gain to decibels.
///
/// Inputs at or below `1e-10` are clamped there, so the result is always
/// finite (never below −200 dB).
///
/// # Example
/// ```rust
/// use tandem_core::linear_to_db;
///
/// assert!((linear_to_db(1.0) - 0.0).abs() < 0.001);
/// assert!((linear_to_db(0.5) - (-6.02)).abs() < 0.01);
/// assert!(linear_to_db(0.0).is_finite());
/// ```
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    // 20 * log10(linear) = 20 * ln(linear) / ln(10)
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Instantaneous level of a sample in dB, never below [`SILENCE_FLOOR_DB`].
///
/// The sample is rectified first. A NaN sample reads as silence here (the
/// floor comparison follows `f32::max`), while ±∞ reads as +∞ dB. Neither is
/// sanitised anywhere else: callers must supply finite audio.
///
/// # Example
/// ```rust
/// use tandem_core::{level_db, SILENCE_FLOOR_DB};
///
/// assert_eq!(level_db(0.0), SILENCE_FLOOR_DB);
/// assert!((level_db(-1.0) - 0.0).abs() < 1e-6);
/// ```
#[inline]
pub fn level_db(sample: f32) -> f32 {
    linear_to_db(sample.abs()).max(SILENCE_FLOOR_DB)
}

/// Flush denormal (subnormal) floats to zero.
///
/// Values with magnitude below 1e-20 are replaced with 0.0. Applied to the
/// linear output-gain smoothers as they decay toward zero. Not for dB-domain
/// state, where 0.0 is an ordinary level.
///
/// # Example
/// ```rust
/// use tandem_core::flush_denormal;
///
/// assert_eq!(flush_denormal(1e-25), 0.0);
/// assert_eq!(flush_denormal(-3.0), -3.0);
/// ```
#[inline]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_to_linear() {
        assert!((db_to_linear(0.0) - 1.0).abs() < 1e-6);
        assert!((db_to_linear(20.0) - 10.0).abs() < 1e-4);
        assert!((db_to_linear(-20.0) - 0.1).abs() < 1e-6);
        assert!((db_to_linear(-100.0) - 1e-5).abs() < 1e-9);
    }

    #[test]
    fn test_linear_to_db() {
        assert!((linear_to_db(1.0) - 0.0).abs() < 1e-6);
        assert!((linear_to_db(10.0) - 20.0).abs() < 1e-4);
        assert!((linear_to_db(0.1) - (-20.0)).abs() < 1e-4);
    }

    #[test]
    fn test_db_roundtrip() {
        for db in [-60.0f32, -18.0, -3.0, 0.0, 6.0] {
            let back = linear_to_db(db_to_linear(db));
            assert!((back - db).abs() < 1e-3, "{db} dB came back as {back}");
        }
    }

    #[test]
    fn test_level_db_floor() {
        assert_eq!(level_db(0.0), SILENCE_FLOOR_DB);
        assert_eq!(level_db(-0.0), SILENCE_FLOOR_DB);
        assert_eq!(level_db(1e-9), SILENCE_FLOOR_DB);
        assert!(level_db(0.5) > SILENCE_FLOOR_DB);
    }

    #[test]
    fn test_level_db_rectifies() {
        assert_eq!(level_db(-0.25), level_db(0.25));
    }

    #[test]
    fn test_level_db_non_finite() {
        assert_eq!(level_db(f32::NAN), SILENCE_FLOOR_DB);
        assert_eq!(level_db(f32::NEG_INFINITY), f32::INFINITY);
    }

    #[test]
    fn test_flush_denormal() {
        assert_eq!(flush_denormal(1.0), 1.0);
        assert_eq!(flush_denormal(-0.5), -0.5);
        assert_eq!(flush_denormal(1e-10), 1e-10);
        assert_eq!(flush_denormal(1e-21), 0.0);
        assert_eq!(flush_denormal(-1e-21), 0.0);
        assert_eq!(flush_denormal(0.0), 0.0);
    }
}
