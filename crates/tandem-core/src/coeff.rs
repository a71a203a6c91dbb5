//! Time-constant to coefficient conversions.
//!
//! Every smoother in the dynamics path is the same one-pole recurrence:
//!
//! ```text
//! y[n] = coeff * y[n-1] + (1 - coeff) * x[n]
//! ```
//!
//! with `coeff = exp(-1 / (time_ms * sample_rate / 1000))`. After one time
//! constant the output has covered ~63.2% of a step. These are pure functions;
//! callers cache the results and recompute only when a time parameter or the
//! sample rate changes, so `exp` never runs per sample.

use libm::expf;

/// Convert a duration in milliseconds to a (fractional) number of samples.
///
/// Whole-millisecond durations at integer sample rates come out exact.
///
/// # Example
/// ```rust
/// use tandem_core::ms_to_samples;
///
/// assert_eq!(ms_to_samples(40.0, 48000.0), 1920.0);
/// ```
#[inline]
pub fn ms_to_samples(ms: f32, sample_rate: f32) -> f32 {
    ms * sample_rate / 1000.0
}

/// One-pole smoothing coefficient for a time constant in milliseconds.
///
/// Returns a value in `[0, 1)`. A time constant of zero (or a non-positive
/// sample count) yields `0.0`, which makes the smoother follow its input
/// instantly.
///
/// # Example
/// ```rust
/// use tandem_core::smoothing_coefficient;
///
/// let c = smoothing_coefficient(1.0, 48000.0);
/// assert!(c > 0.97 && c < 1.0);
/// assert_eq!(smoothing_coefficient(0.0, 48000.0), 0.0);
/// ```
pub fn smoothing_coefficient(ms: f32, sample_rate: f32) -> f32 {
    let samples = ms_to_samples(ms, sample_rate);
    if samples > 0.0 {
        expf(-1.0 / samples)
    } else {
        0.0
    }
}

/// One step of the one-pole recurrence, moving `current` toward `target`.
///
/// Evaluated as `current + (1 - coeff) * (target - current)`, which is the
/// same recurrence but leaves `current` bit-exact once it equals `target`.
/// The result never passes `target`, so a step response is monotonic.
/// Nothing is flushed here; linear-domain callers wrap the step in
/// [`flush_denormal`](crate::flush_denormal) themselves.
#[inline]
pub fn one_pole_step(current: f32, target: f32, coeff: f32) -> f32 {
    current + (1.0 - coeff) * (target - current)
}

/// Attack/release coefficient pair derived from two time constants.
///
/// Immutable between recomputes: build a new value with
/// [`from_times`](Self::from_times) whenever either time or the sample rate
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SmoothingCoefficients {
    /// Coefficient used while the smoothed quantity rises.
    pub attack: f32,
    /// Coefficient used while the smoothed quantity falls.
    pub release: f32,
}

impl SmoothingCoefficients {
    /// Derive both coefficients from attack/release times in milliseconds.
    pub fn from_times(attack_ms: f32, release_ms: f32, sample_rate: f32) -> Self {
        Self {
            attack: smoothing_coefficient(attack_ms, sample_rate),
            release: smoothing_coefficient(release_ms, sample_rate),
        }
    }

    /// Pick the coefficient for moving from `current` toward `target`.
    ///
    /// Rising (`target > current`) uses the attack coefficient; anything else
    /// uses release.
    #[inline]
    pub fn select(&self, current: f32, target: f32) -> f32 {
        if target > current {
            self.attack
        } else {
            self.release
        }
    }
}
