//! Noise gate stage with hysteresis and hold.
//!
//! The gate consumes an envelope in dB (already linked across channels) and
//! produces a gain. It never looks at audio samples itself.
//!
//! # State Machine
//!
//! ```text
//! env > open   → open, hold counter re-armed (every loud sample)
//! env < close  → counter > 0 ? counter -= 1 (stay open) : closed
//! otherwise    → unchanged (hysteresis dead zone)
//! ```
//!
//! with `close = open + hysteresis` and `hysteresis <= 0`. The target gain is
//! 0 dB when open and the reduction floor when closed; the current gain moves
//! toward it with the attack coefficient while rising and the release
//! coefficient while falling.

use crate::coeff::{SmoothingCoefficients, ms_to_samples, one_pole_step};
use crate::math::db_to_linear;

/// Raw gate settings in user units (dB, ms).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateSettings {
    /// Level above which the gate opens (dB).
    pub threshold_db: f32,
    /// Offset of the close threshold below the open threshold (dB, ≤ 0).
    pub hysteresis_db: f32,
    /// Gain applied while closed (dB, ≤ 0).
    pub reduction_db: f32,
    /// Gain ramp time while opening (ms).
    pub attack_ms: f32,
    /// Time the gate stays open after the level drops below close (ms).
    pub hold_ms: f32,
    /// Gain ramp time while closing (ms).
    pub release_ms: f32,
}

impl Default for GateSettings {
    fn default() -> Self {
        Self {
            threshold_db: -50.0,
            hysteresis_db: -3.0,
            reduction_db: -100.0,
            attack_ms: 3.0,
            hold_ms: 40.0,
            release_ms: 10.0,
        }
    }
}

/// Gate configuration in the form the stage consumes each sample.
///
/// Derived from [`GateSettings`] with [`derive`](Self::derive); nothing here
/// needs a transcendental function at run time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GateConfig {
    /// Open threshold (dB).
    pub open_threshold_db: f32,
    /// Close threshold (dB), `open_threshold_db + hysteresis`.
    pub close_threshold_db: f32,
    /// Closed-gate gain (dB).
    pub reduction_db: f32,
    /// Hold length in whole samples.
    pub hold_samples: u32,
    /// Gain smoothing coefficients.
    pub coefficients: SmoothingCoefficients,
}

impl GateConfig {
    /// Derive the per-sample configuration from raw settings.
    ///
    /// The hold length is truncated to whole samples.
    pub fn derive(settings: &GateSettings, sample_rate: f32) -> Self {
        Self {
            open_threshold_db: settings.threshold_db,
            close_threshold_db: settings.threshold_db + settings.hysteresis_db,
            reduction_db: settings.reduction_db,
            hold_samples: ms_to_samples(settings.hold_ms, sample_rate).max(0.0) as u32,
            coefficients: SmoothingCoefficients::from_times(
                settings.attack_ms,
                settings.release_ms,
                sample_rate,
            ),
        }
    }
}

impl Default for GateConfig {
    fn default() -> Self {
        Self::derive(&GateSettings::default(), 48000.0)
    }
}

/// Gate state: open flag, hold countdown and smoothed gain.
///
/// # Example
///
/// ```rust
/// use tandem_core::{GateConfig, GateSettings, GateStage};
///
/// let config = GateConfig::derive(&GateSettings::default(), 48000.0);
/// let mut gate = GateStage::new();
///
/// // Loud signal: gate stays open at unity
/// let gain = gate.process(-20.0, &config, 1.0);
/// assert_eq!(gain, 1.0);
/// ```
#[derive(Debug, Clone)]
pub struct GateStage {
    is_open: bool,
    /// Samples of hold remaining
    hold_counter: u32,
    /// Smoothed gain (dB)
    current_gain_db: f32,
}

impl GateStage {
    /// Create an open gate at unity gain.
    pub fn new() -> Self {
        Self {
            is_open: true,
            hold_counter: 0,
            current_gain_db: 0.0,
        }
    }

    /// Advance one sample and return the smoothed gain in dB.
    #[inline]
    pub fn advance(&mut self, envelope_db: f32, config: &GateConfig) -> f32 {
        if envelope_db > config.open_threshold_db {
            self.is_open = true;
            self.hold_counter = config.hold_samples;
        } else if envelope_db < config.close_threshold_db {
            if self.hold_counter > 0 {
                self.hold_counter -= 1;
            } else {
                self.is_open = false;
            }
        }

        let target_db = if self.is_open {
            0.0
        } else {
            config.reduction_db
        };

        if target_db != self.current_gain_db {
            let coeff = config.coefficients.select(self.current_gain_db, target_db);
            self.current_gain_db = one_pole_step(self.current_gain_db, target_db, coeff);
        }
        self.current_gain_db
    }

    /// Advance one sample and return the linear gain, including the
    /// already-smoothed linear output gain for this sample.
    #[inline]
    pub fn process(&mut self, envelope_db: f32, config: &GateConfig, output_gain: f32) -> f32 {
        db_to_linear(self.advance(envelope_db, config)) * output_gain
    }

    /// Whether the gate is currently open (including the hold phase).
    pub fn is_open(&self) -> bool {
        self.is_open
    }

    /// Hold samples remaining.
    pub fn hold_counter(&self) -> u32 {
        self.hold_counter
    }

    /// Current smoothed gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.current_gain_db
    }

    /// Return to the open, unity-gain state.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for GateStage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(sample_rate: f32) -> GateConfig {
        GateConfig::derive(&GateSettings::default(), sample_rate)
    }

    #[test]
    fn test_derive_close_threshold() {
        let cfg = config(48000.0);
        assert_eq!(cfg.open_threshold_db, -50.0);
        assert_eq!(cfg.close_threshold_db, -53.0);
        assert_eq!(cfg.hold_samples, 1920);
    }

    #[test]
    fn test_gate_starts_open() {
        let gate = GateStage::new();
        assert!(gate.is_open());
        assert_eq!(gate.gain_db(), 0.0);
        assert_eq!(gate.hold_counter(), 0);
    }

    #[test]
    fn test_gate_closes_below_threshold() {
        let cfg = config(48000.0);
        let mut gate = GateStage::new();

        // No hold armed yet: first quiet sample closes immediately
        gate.advance(-80.0, &cfg);
        assert!(!gate.is_open());

        // 10 ms release, 100 ms of silence: gain reaches the floor
        let mut gain_db = 0.0;
        for _ in 0..4800 {
            gain_db = gate.advance(-80.0, &cfg);
        }
        assert!(gain_db < -99.0, "gate should settle at reduction, got {gain_db}");
    }

    #[test]
    fn test_gate_hysteresis_dead_zone() {
        let cfg = config(48000.0);
        let mut gate = GateStage::new();

        for i in 0..48000 {
            let env = if i % 2 == 0 { -49.0 } else { -51.0 };
            gate.advance(env, &cfg);
            assert!(gate.is_open(), "gate re-closed at sample {i}");
        }
        assert_eq!(gate.gain_db(), 0.0);
    }

    #[test]
    fn test_gate_closes_below_close_threshold_after_hold() {
        let cfg = config(48000.0);
        let mut gate = GateStage::new();
        gate.advance(-49.0, &cfg);

        for _ in 0..cfg.hold_samples {
            gate.advance(-54.0, &cfg);
            assert!(gate.is_open());
        }
        gate.advance(-54.0, &cfg);
        assert!(!gate.is_open());
    }

    #[test]
    fn test_hold_rearms_on_every_loud_sample() {
        let cfg = config(48000.0);
        let mut gate = GateStage::new();

        gate.advance(-10.0, &cfg);
        for _ in 0..100 {
            gate.advance(-60.0, &cfg);
        }
        assert_eq!(gate.hold_counter(), cfg.hold_samples - 100);

        gate.advance(-10.0, &cfg);
        assert_eq!(gate.hold_counter(), cfg.hold_samples);
    }

    #[test]
    fn test_dead_zone_freezes_hold_counter() {
        let cfg = config(48000.0);
        let mut gate = GateStage::new();

        gate.advance(-10.0, &cfg);
        gate.advance(-60.0, &cfg);
        let remaining = gate.hold_counter();
        for _ in 0..500 {
            gate.advance(-52.0, &cfg);
        }
        assert_eq!(gate.hold_counter(), remaining);
    }

    #[test]
    fn test_gate_attack_release_smoothing() {
        let cfg = config(48000.0);
        let mut gate = GateStage::new();

        // Close and settle
        let mut prev = gate.advance(-90.0, &cfg);
        for _ in 0..2000 {
            let g = gate.advance(-90.0, &cfg);
            assert!(g <= prev, "release must be monotonically decreasing");
            prev = g;
        }

        // Open: gain rises monotonically toward 0 dB
        for _ in 0..2000 {
            let g = gate.advance(-20.0, &cfg);
            assert!(g >= prev, "attack must be monotonically increasing");
            assert!(g <= 0.0);
            prev = g;
        }
    }

    #[test]
    fn test_output_gain_applied() {
        let cfg = config(48000.0);
        let mut gate = GateStage::new();
        let gain = gate.process(-20.0, &cfg, 0.5);
        assert_eq!(gain, 0.5);
    }

    #[test]
    fn test_gate_reset() {
        let cfg = config(48000.0);
        let mut gate = GateStage::new();
        for _ in 0..1000 {
            gate.advance(-90.0, &cfg);
        }
        gate.reset();
        assert!(gate.is_open());
        assert_eq!(gate.gain_db(), 0.0);
        assert_eq!(gate.hold_counter(), 0);
    }
}
