//! Envelope follower in the dB domain.
//!
//! Each input sample is rectified and converted to dB, then smoothed by two
//! one-pole filters running in parallel: one tuned for attack, one for
//! release. Both filters advance on every sample; the follower only chooses
//! which of the two outputs becomes the envelope:
//!
//! ```text
//! instant = max(20·log10|x|, floor)
//! a[n]    = ca · a[n-1] + (1 - ca) · instant
//! r[n]    = cr · r[n-1] + (1 - cr) · instant
//! env[n]  = instant > env[n-1] ? a[n] : r[n]
//! ```
//!
//! Keeping both memories live means a direction change picks up a branch
//! whose state is continuous with the recent signal, which shapes transients
//! differently from a single filter that swaps coefficients.

use crate::math::{SILENCE_FLOOR_DB, level_db};
use crate::one_pole::OnePole;

/// Attack time of the detector in milliseconds.
pub const DETECTOR_ATTACK_MS: f32 = 1.0;

/// Release time of the detector in milliseconds.
pub const DETECTOR_RELEASE_MS: f32 = 100.0;

/// dB-domain envelope follower with dual attack/release branches.
///
/// One instance per input channel. The envelope never reports a value below
/// [`SILENCE_FLOOR_DB`].
///
/// # Example
///
/// ```rust
/// use tandem_core::{EnvelopeFollower, SILENCE_FLOOR_DB};
///
/// let mut env = EnvelopeFollower::new(48000.0);
/// assert_eq!(env.level_db(), SILENCE_FLOOR_DB);
///
/// let level = env.process(0.5);
/// assert!(level > SILENCE_FLOOR_DB);
/// ```
#[derive(Debug, Clone)]
pub struct EnvelopeFollower {
    /// Current envelope level (dB)
    envelope_db: f32,
    /// Attack-branch filter memory
    attack: OnePole,
    /// Release-branch filter memory
    release: OnePole,
}

impl EnvelopeFollower {
    /// Create a follower with the detector's fixed times (1 ms / 100 ms).
    pub fn new(sample_rate: f32) -> Self {
        Self::with_times(sample_rate, DETECTOR_ATTACK_MS, DETECTOR_RELEASE_MS)
    }

    /// Create with specified attack and release times.
    pub fn with_times(sample_rate: f32, attack_ms: f32, release_ms: f32) -> Self {
        Self {
            envelope_db: SILENCE_FLOOR_DB,
            attack: OnePole::new(sample_rate, attack_ms, SILENCE_FLOOR_DB),
            release: OnePole::new(sample_rate, release_ms, SILENCE_FLOOR_DB),
        }
    }

    /// Recompute coefficients for a new sample rate and reset all state.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.attack.set_sample_rate(sample_rate);
        self.release.set_sample_rate(sample_rate);
        self.reset();
    }

    /// Process a sample and return the envelope in dB.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let instant_db = level_db(input);

        // Both branches advance unconditionally.
        let attacked = self.attack.process(instant_db);
        let released = self.release.process(instant_db);

        let selected = if instant_db > self.envelope_db {
            attacked
        } else {
            released
        };
        self.envelope_db = selected.max(SILENCE_FLOOR_DB);
        self.envelope_db
    }

    /// Current envelope in dB without processing new input.
    #[inline]
    pub fn level_db(&self) -> f32 {
        self.envelope_db
    }

    /// Attack-branch coefficient.
    pub fn attack_coeff(&self) -> f32 {
        self.attack.coeff()
    }

    /// Release-branch coefficient.
    pub fn release_coeff(&self) -> f32 {
        self.release.coeff()
    }

    /// Return the envelope and both branch memories to the silence floor.
    pub fn reset(&mut self) {
        self.envelope_db = SILENCE_FLOOR_DB;
        self.attack.reset_to(SILENCE_FLOOR_DB);
        self.release.reset_to(SILENCE_FLOOR_DB);
    }
}

impl Default for EnvelopeFollower {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_attack() {
        let mut env = EnvelopeFollower::new(48000.0);

        // 1 ms attack: 10 time constants in 480 samples
        let mut envelope = SILENCE_FLOOR_DB;
        for _ in 0..480 {
            envelope = env.process(1.0);
        }

        assert!(envelope > -0.1, "Envelope should rise to 0 dB, got {envelope}");
    }

    #[test]
    fn test_envelope_release() {
        let mut env = EnvelopeFollower::new(48000.0);

        // Long enough for the release branch memory to settle at 0 dB too
        for _ in 0..96000 {
            env.process(1.0);
        }

        // 100 ms release: one time constant covers ~63% of the 100 dB drop
        let mut envelope = 0.0;
        for _ in 0..4800 {
            envelope = env.process(0.0);
        }

        assert!(
            (envelope - (-63.2)).abs() < 1.0,
            "Envelope should fall ~63 dB after one time constant, got {envelope}"
        );
    }

    #[test]
    fn test_envelope_silence_stays_at_floor() {
        let mut env = EnvelopeFollower::new(48000.0);
        for _ in 0..1000 {
            assert_eq!(env.process(0.0), SILENCE_FLOOR_DB);
        }
    }

    #[test]
    fn test_envelope_rectifies() {
        let mut a = EnvelopeFollower::new(48000.0);
        let mut b = EnvelopeFollower::new(48000.0);
        assert_eq!(a.process(-0.5), b.process(0.5));
    }

    #[test]
    fn test_both_branches_advance() {
        let mut env = EnvelopeFollower::new(48000.0);
        for _ in 0..100 {
            env.process(0.5);
        }
        // The release branch was not selected while rising, but it moved.
        assert!(env.release.value() > SILENCE_FLOOR_DB);
        assert!(env.attack.value() > env.release.value());
    }

    #[test]
    fn test_envelope_step_response_is_monotonic() {
        let mut env = EnvelopeFollower::new(48000.0);

        // One second of full scale: the attack branch closes in on 0 dB and
        // must keep being selected, with no dip back to the release branch.
        let mut prev = env.level_db();
        for i in 0..48000 {
            let level = env.process(1.0);
            assert!(level >= prev, "envelope fell at sample {i}: {prev} -> {level}");
            prev = level;
        }
        assert!(prev > -1e-3, "envelope settled at {prev}");

        // One second of silence: a steady fall toward the floor.
        for i in 0..48000 {
            let level = env.process(0.0);
            assert!(level <= prev, "envelope rose at sample {i}: {prev} -> {level}");
            prev = level;
        }
        assert!(prev < -99.0, "envelope released to {prev}");
    }

    #[test]
    fn test_release_picks_up_lagging_branch() {
        let mut env = EnvelopeFollower::new(48000.0);
        // Short burst: attack branch reaches the tone, release branch lags far behind.
        for _ in 0..480 {
            env.process(1.0);
        }
        let release_memory = env.release.value();
        let after = env.process(0.0);
        assert!(after < -50.0, "release branch should take over, got {after}");
        assert!(after < release_memory + 1e-3);
    }

    #[test]
    fn test_envelope_reset() {
        let mut env = EnvelopeFollower::new(48000.0);

        for _ in 0..100 {
            env.process(1.0);
        }

        env.reset();
        assert_eq!(env.level_db(), SILENCE_FLOOR_DB);
        assert_eq!(env.attack.value(), SILENCE_FLOOR_DB);
        assert_eq!(env.release.value(), SILENCE_FLOOR_DB);
    }

    #[test]
    fn test_prepare_rederives_and_resets() {
        let mut env = EnvelopeFollower::new(44100.0);
        let before = env.attack_coeff();
        env.process(1.0);
        env.prepare(96000.0);
        assert!(env.attack_coeff() > before);
        assert_eq!(env.level_db(), SILENCE_FLOOR_DB);
    }
}
