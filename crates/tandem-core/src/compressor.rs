//! Downward compressor stage with hard or soft knee.
//!
//! A feed-forward gain computer driven by the shared envelope, followed by
//! attack/release smoothing of the resulting gain in dB.
//!
//! # Signal Flow
//!
//! ```text
//! envelope dB → static curve (threshold, ratio, knee) → −reduction + makeup
//!             → one-pole smoothing (dB) → linear gain × output gain
//! ```
//!
//! # Static Curve
//!
//! With `over = envelope − threshold`, knee width `W` and ratio `R`:
//!
//! | Region | Reduction (dB) |
//! |--------|----------------|
//! | `W = 0`, `over > 0` | `over − over / R` |
//! | `over ≤ −W/2` | `0` |
//! | `−W/2 < over ≤ W/2` | `(1 − 1/R) · (over + W/2)² / (2W)` |
//! | `over > W/2` | `over − over / R` |
//!
//! The quadratic has slope 0 at the lower knee edge and slope `1 − 1/R` at the
//! upper one, where it meets the linear segment at `W/2 − W/(2R)`.
//!
//! # Smoothing Direction
//!
//! The attack coefficient is used whenever the target *gain* is above the
//! current gain (reduction easing off), release whenever it is at or below.
//! This is the reverse of the textbook "attack = compression onset" naming
//! and determines the measured timing, so it is kept as is.

use crate::coeff::{SmoothingCoefficients, one_pole_step};
use crate::math::db_to_linear;

/// Hard-knee gain reduction in dB (always ≥ 0).
///
/// # Example
/// ```rust
/// use tandem_core::hard_knee_reduction_db;
///
/// assert_eq!(hard_knee_reduction_db(-3.0, 4.0), 0.0);
/// assert_eq!(hard_knee_reduction_db(8.0, 4.0), 6.0);
/// ```
#[inline]
pub fn hard_knee_reduction_db(over_db: f32, ratio: f32) -> f32 {
    if over_db > 0.0 {
        over_db - over_db / ratio
    } else {
        0.0
    }
}

/// Static gain reduction in dB for a level `over_db` above threshold.
///
/// A knee width of zero selects the hard knee. Ratio must be positive and the
/// knee non-negative; both are checked in debug builds only.
///
/// # Example
/// ```rust
/// use tandem_core::gain_reduction_db;
///
/// // Ratio 4, 6 dB knee: the quadratic meets the linear segment at +3 dB
/// assert!((gain_reduction_db(3.0, 6.0, 4.0) - 2.25).abs() < 1e-5);
/// assert_eq!(gain_reduction_db(-3.0, 6.0, 4.0), 0.0);
/// ```
#[inline]
pub fn gain_reduction_db(over_db: f32, knee_db: f32, ratio: f32) -> f32 {
    debug_assert!(ratio > 0.0, "compressor ratio must be positive, got {ratio}");
    debug_assert!(knee_db >= 0.0, "knee width must be non-negative, got {knee_db}");

    if knee_db <= 0.0 {
        return hard_knee_reduction_db(over_db, ratio);
    }

    let half_knee = knee_db / 2.0;
    if over_db <= -half_knee {
        0.0
    } else if over_db > half_knee {
        over_db - over_db / ratio
    } else {
        let x = over_db + half_knee;
        (1.0 - 1.0 / ratio) * x * x / (2.0 * knee_db)
    }
}

/// Raw compressor settings in user units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    /// Threshold (dB).
    pub threshold_db: f32,
    /// Ratio (≥ 1).
    pub ratio: f32,
    /// Knee width (dB, ≥ 0; 0 is a hard knee).
    pub knee_db: f32,
    /// Time for the gain to rise (ms).
    pub attack_ms: f32,
    /// Time for the gain to fall (ms).
    pub release_ms: f32,
    /// Makeup gain (dB).
    pub makeup_db: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold_db: -18.0,
            ratio: 4.0,
            knee_db: 6.0,
            attack_ms: 5.0,
            release_ms: 50.0,
            makeup_db: 0.0,
        }
    }
}

/// Compressor configuration in the form the stage consumes each sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorConfig {
    /// Threshold (dB).
    pub threshold_db: f32,
    /// Ratio.
    pub ratio: f32,
    /// Knee width (dB).
    pub knee_db: f32,
    /// Makeup gain (dB).
    pub makeup_db: f32,
    /// Gain smoothing coefficients.
    pub coefficients: SmoothingCoefficients,
}

impl CompressorConfig {
    /// Derive the per-sample configuration from raw settings.
    pub fn derive(settings: &CompressorSettings, sample_rate: f32) -> Self {
        Self {
            threshold_db: settings.threshold_db,
            ratio: settings.ratio,
            knee_db: settings.knee_db,
            makeup_db: settings.makeup_db,
            coefficients: SmoothingCoefficients::from_times(
                settings.attack_ms,
                settings.release_ms,
                sample_rate,
            ),
        }
    }

    /// Target gain in dB for an envelope level, before smoothing.
    #[inline]
    pub fn target_gain_db(&self, envelope_db: f32) -> f32 {
        let over_db = envelope_db - self.threshold_db;
        -gain_reduction_db(over_db, self.knee_db, self.ratio) + self.makeup_db
    }
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self::derive(&CompressorSettings::default(), 48000.0)
    }
}

/// Compressor state: the smoothed gain in dB.
///
/// # Example
///
/// ```rust
/// use tandem_core::{CompressorConfig, CompressorStage};
///
/// let config = CompressorConfig::default();
/// let mut comp = CompressorStage::new();
///
/// // Well below threshold: unity gain
/// assert_eq!(comp.process(-60.0, &config, 1.0), 1.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CompressorStage {
    /// Smoothed gain (dB), makeup included
    current_gain_db: f32,
    /// Static reduction from the last processed sample (dB, ≥ 0)
    last_reduction_db: f32,
}

impl CompressorStage {
    /// Create a compressor at unity gain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance one sample and return the smoothed gain in dB.
    #[inline]
    pub fn advance(&mut self, envelope_db: f32, config: &CompressorConfig) -> f32 {
        let over_db = envelope_db - config.threshold_db;
        self.last_reduction_db = gain_reduction_db(over_db, config.knee_db, config.ratio);

        let target_db = -self.last_reduction_db + config.makeup_db;
        let coeff = config.coefficients.select(self.current_gain_db, target_db);
        self.current_gain_db = one_pole_step(self.current_gain_db, target_db, coeff);
        self.current_gain_db
    }

    /// Advance one sample and return the linear gain, including the
    /// already-smoothed linear output gain for this sample.
    #[inline]
    pub fn process(
        &mut self,
        envelope_db: f32,
        config: &CompressorConfig,
        output_gain: f32,
    ) -> f32 {
        db_to_linear(self.advance(envelope_db, config)) * output_gain
    }

    /// Current smoothed gain in dB (makeup included).
    pub fn gain_db(&self) -> f32 {
        self.current_gain_db
    }

    /// Static gain reduction computed for the last sample (dB, ≥ 0).
    ///
    /// A value of 0.0 means the envelope was below the knee.
    pub fn gain_reduction_db(&self) -> f32 {
        self.last_reduction_db
    }

    /// Return to unity gain.
    pub fn reset(&mut self) {
        self.current_gain_db = 0.0;
        self.last_reduction_db = 0.0;
    }
}
