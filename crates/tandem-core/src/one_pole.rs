//! One-pole smoother with its own memory.
//!
//! A single-pole IIR lowpass parameterised by a time constant:
//!
//! ```text
//! y[n] = coeff * y[n-1] + (1 - coeff) * x[n]
//! ```
//!
//! where `coeff = exp(-1 / (time_ms * sample_rate / 1000))`. The envelope
//! follower runs two of these side by side (attack and release) and advances
//! both on every sample.
//!
//! # Usage
//!
//! ```rust
//! use tandem_core::OnePole;
//!
//! let mut lp = OnePole::new(48000.0, 10.0, 0.0);
//! let y = lp.process(1.0);
//! assert!(y > 0.0 && y < 1.0);
//! ```

use crate::coeff::{one_pole_step, smoothing_coefficient};

/// One-pole smoother with a time constant in milliseconds.
///
/// # Invariants
///
/// - `coeff` is always in [0, 1); 0 means the output tracks the input exactly
/// - `state` never passes the input it is moving toward
#[derive(Debug, Clone)]
pub struct OnePole {
    state: f32,
    coeff: f32,
    sample_rate: f32,
    time_ms: f32,
}

impl OnePole {
    /// Create a new smoother.
    ///
    /// # Arguments
    ///
    /// * `sample_rate` - Sample rate in Hz
    /// * `time_ms` - Time constant in milliseconds
    /// * `initial` - Starting output value
    pub fn new(sample_rate: f32, time_ms: f32, initial: f32) -> Self {
        Self {
            state: initial,
            coeff: smoothing_coefficient(time_ms, sample_rate),
            sample_rate,
            time_ms,
        }
    }

    /// Update sample rate and recalculate the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.coeff = smoothing_coefficient(self.time_ms, sample_rate);
    }

    /// Advance one sample toward `input` and return the new output.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        self.state = one_pole_step(self.state, input, self.coeff);
        self.state
    }

    /// Last output without advancing.
    #[inline]
    pub fn value(&self) -> f32 {
        self.state
    }

    /// Current smoothing coefficient.
    #[inline]
    pub fn coeff(&self) -> f32 {
        self.coeff
    }

    /// Force the filter memory to `value`.
    pub fn reset_to(&mut self, value: f32) {
        self.state = value;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settles_on_constant_input() {
        let mut lp = OnePole::new(48000.0, 1.0, 0.0);
        let mut out = 0.0;
        for _ in 0..4800 {
            out = lp.process(-20.0);
        }
        assert!((out - (-20.0)).abs() < 1e-3, "should settle, got {out}");
    }

    #[test]
    fn zero_time_tracks_input() {
        let mut lp = OnePole::new(48000.0, 0.0, -100.0);
        assert_eq!(lp.process(-6.0), -6.0);
        assert_eq!(lp.process(-60.0), -60.0);
    }

    #[test]
    fn sample_rate_change_rederives_coeff() {
        let mut lp = OnePole::new(44100.0, 10.0, 0.0);
        let before = lp.coeff();
        lp.set_sample_rate(96000.0);
        assert!(lp.coeff() > before);
    }

    #[test]
    fn reset_to_sets_memory() {
        let mut lp = OnePole::new(48000.0, 10.0, 0.0);
        lp.process(1.0);
        lp.reset_to(-100.0);
        assert_eq!(lp.value(), -100.0);
    }
}
