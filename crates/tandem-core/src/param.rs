//! Smoothed parameter values for zipper-free gain changes.
//!
//! The output gains of both stages are user-facing linear multipliers that can
//! change while audio is running. [`SmoothedParam`] eases toward each new
//! target with the same one-pole recurrence the stages use, advanced once per
//! sample by whichever stage consumes it.
//!
//! ## Usage
//!
//! ```rust
//! use tandem_core::SmoothedParam;
//!
//! let mut gain = SmoothedParam::standard(1.0, 48000.0);
//! gain.set_target(0.5);
//!
//! // 10 ms at 48 kHz
//! for _ in 0..480 {
//!     let g = gain.advance();
//!     assert!(g <= 1.0 && g >= 0.5);
//! }
//! ```

use crate::coeff::{one_pole_step, smoothing_coefficient};
use crate::math::flush_denormal;

/// Smoothing time used for output gains (ms).
pub const STANDARD_SMOOTHING_MS: f32 = 10.0;

/// A value with built-in one-pole smoothing.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    /// Current smoothed value
    current: f32,
    /// Target value we're smoothing towards
    target: f32,
    /// Smoothing coefficient (0 = instant, ~1 = very slow)
    coeff: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Create a smoothed parameter with full configuration.
    ///
    /// # Arguments
    /// * `initial` - Initial value
    /// * `sample_rate` - Sample rate in Hz
    /// * `smoothing_time_ms` - Smoothing time constant in milliseconds
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: smoothing_coefficient(smoothing_time_ms, sample_rate),
            smoothing_time_ms,
        }
    }

    /// Create with the 10 ms output-gain smoothing.
    pub fn standard(initial: f32, sample_rate: f32) -> Self {
        Self::with_config(initial, sample_rate, STANDARD_SMOOTHING_MS)
    }

    /// Set the value to smooth towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Recalculate the coefficient for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.coeff = smoothing_coefficient(self.smoothing_time_ms, sample_rate);
    }

    /// Advance by one sample and return the smoothed value.
    ///
    /// Values decaying toward zero are flushed once they drop below 1e-20.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current = flush_denormal(one_pole_step(self.current, self.target, self.coeff));
        self.current
    }

    /// Current smoothed value without advancing.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Target value.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Jump to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }
}
