//! Multichannel gate + compressor with linked detection.
//!
//! Per sample, every prepared channel's envelope follower sees its own input;
//! the loudest envelope (channel max, in dB) drives one gate and one
//! compressor, and the product of their gains is written back into every
//! channel. Channels therefore never drift apart in level.
//!
//! ```text
//! ch0 ─ env ─┐
//! ch1 ─ env ─┼─ max dB ─ gate gain × compressor gain ─▶ × every channel
//! ...        ┘
//! ```
//!
//! Nothing on the processing path allocates or locks. Per-channel state is
//! sized once in [`DynamicsEngine::prepare`].

use alloc::vec::Vec;

use crate::compressor::CompressorStage;
use crate::envelope::EnvelopeFollower;
use crate::gate::GateStage;
use crate::math::SILENCE_FLOOR_DB;
use crate::params::DynamicsParams;

/// Block size assumed until [`DynamicsEngine::prepare`] says otherwise.
pub const DEFAULT_MAX_BLOCK_SIZE: usize = 512;

/// Gate followed by compressor, sharing one channel-linked envelope.
///
/// # Example
///
/// ```rust
/// use tandem_core::DynamicsEngine;
///
/// let mut engine = DynamicsEngine::new(48000.0, 2);
/// engine.params_mut().set_compressor_threshold_db(-30.0);
///
/// let mut left = vec![0.5f32; 256];
/// let mut right = vec![0.25f32; 256];
/// engine.process_block(&mut [&mut left[..], &mut right[..]]);
///
/// // Both channels received the same gain
/// assert!((left[255] / right[255] - 2.0).abs() < 1e-4);
/// ```
#[derive(Debug, Clone)]
pub struct DynamicsEngine {
    params: DynamicsParams,
    followers: Vec<EnvelopeFollower>,
    gate: GateStage,
    compressor: CompressorStage,
    max_block_size: usize,
}

impl DynamicsEngine {
    /// Create an engine with default parameters, prepared for
    /// `channel_count` channels.
    pub fn new(sample_rate: f32, channel_count: usize) -> Self {
        Self::with_params(DynamicsParams::new(sample_rate), channel_count)
    }

    /// Create an engine around existing parameters, prepared at their
    /// sample rate.
    pub fn with_params(params: DynamicsParams, channel_count: usize) -> Self {
        let sample_rate = params.sample_rate();
        let mut engine = Self {
            params,
            followers: Vec::new(),
            gate: GateStage::new(),
            compressor: CompressorStage::new(),
            max_block_size: DEFAULT_MAX_BLOCK_SIZE,
        };
        engine.prepare(sample_rate, DEFAULT_MAX_BLOCK_SIZE, channel_count);
        engine
    }

    /// Size per-channel state, re-derive every coefficient and reset.
    ///
    /// The only method that allocates. Output-gain smoothers jump to their
    /// targets so a fresh start never ramps.
    pub fn prepare(&mut self, sample_rate: f32, max_block_size: usize, channel_count: usize) {
        self.max_block_size = max_block_size;
        self.followers
            .resize_with(channel_count, || EnvelopeFollower::new(sample_rate));
        for follower in &mut self.followers {
            follower.prepare(sample_rate);
        }

        self.params.set_sample_rate(sample_rate);
        self.params.snap_output_gains();
        self.gate.reset();
        self.compressor.reset();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            max_block_size,
            channel_count,
            "dynamics engine prepared"
        );
    }

    /// Return every stage and envelope to its initial state without
    /// reallocating.
    pub fn reset(&mut self) {
        for follower in &mut self.followers {
            follower.reset();
        }
        self.gate.reset();
        self.compressor.reset();
        self.params.snap_output_gains();

        #[cfg(feature = "tracing")]
        tracing::debug!("dynamics engine reset");
    }

    /// Process planar audio in place, one slice per channel.
    ///
    /// All slices should have the same length; processing stops at the
    /// shortest. Channels beyond the prepared count get the linked gain but
    /// do not feed detection. With both stages disabled the buffer is left
    /// untouched.
    pub fn process_block(&mut self, channels: &mut [&mut [f32]]) {
        if self.is_bypassed() {
            return;
        }

        debug_assert!(
            channels.windows(2).all(|w| w[0].len() == w[1].len()),
            "channel slices differ in length"
        );
        let num_samples = channels.iter().map(|c| c.len()).min().unwrap_or(0);

        for n in 0..num_samples {
            let mut envelope_db = SILENCE_FLOOR_DB;
            for (channel, follower) in channels.iter().zip(self.followers.iter_mut()) {
                envelope_db = envelope_db.max(follower.process(channel[n]));
            }

            let gain = self.linked_gain(envelope_db);
            for channel in channels.iter_mut() {
                channel[n] *= gain;
            }
        }
    }

    /// Process a flat channel-major buffer in place
    /// (`buffer[ch * num_samples + n]`).
    ///
    /// `buffer.len()` should be a multiple of `num_channels`; a trailing
    /// remainder is left untouched.
    pub fn process_channel_major(&mut self, buffer: &mut [f32], num_channels: usize) {
        if self.is_bypassed() || num_channels == 0 {
            return;
        }

        debug_assert!(
            buffer.len() % num_channels == 0,
            "buffer length {} is not a multiple of {num_channels} channels",
            buffer.len()
        );
        let num_samples = buffer.len() / num_channels;

        for n in 0..num_samples {
            let mut envelope_db = SILENCE_FLOOR_DB;
            for (ch, follower) in self.followers.iter_mut().take(num_channels).enumerate() {
                envelope_db = envelope_db.max(follower.process(buffer[ch * num_samples + n]));
            }

            let gain = self.linked_gain(envelope_db);
            for ch in 0..num_channels {
                buffer[ch * num_samples + n] *= gain;
            }
        }
    }

    /// Gate gain × compressor gain for one sample of linked envelope.
    #[inline]
    fn linked_gain(&mut self, envelope_db: f32) -> f32 {
        let gate_enabled = self.params.gate_enabled();
        let compressor_enabled = self.params.compressor_enabled();
        let (gate_config, compressor_config, gate_output, compressor_output) =
            self.params.split_for_processing();

        let gate_gain = if gate_enabled {
            self.gate
                .process(envelope_db, gate_config, gate_output.advance())
        } else {
            1.0
        };

        let compressor_gain = if compressor_enabled {
            self.compressor
                .process(envelope_db, compressor_config, compressor_output.advance())
        } else {
            1.0
        };

        gate_gain * compressor_gain
    }

    fn is_bypassed(&self) -> bool {
        !self.params.gate_enabled() && !self.params.compressor_enabled()
    }

    /// Parameters.
    pub fn params(&self) -> &DynamicsParams {
        &self.params
    }

    /// Mutable parameters. Changes take effect on the next sample.
    pub fn params_mut(&mut self) -> &mut DynamicsParams {
        &mut self.params
    }

    /// Prepared sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.params.sample_rate()
    }

    /// Number of channels with their own envelope follower.
    pub fn channel_count(&self) -> usize {
        self.followers.len()
    }

    /// Largest block the host announced in [`prepare`](Self::prepare).
    pub fn max_block_size(&self) -> usize {
        self.max_block_size
    }

    /// Whether the gate is open (including hold).
    pub fn gate_is_open(&self) -> bool {
        self.gate.is_open()
    }

    /// Smoothed gate gain in dB.
    pub fn gate_gain_db(&self) -> f32 {
        self.gate.gain_db()
    }

    /// Smoothed compressor gain in dB, makeup included.
    pub fn compressor_gain_db(&self) -> f32 {
        self.compressor.gain_db()
    }

    /// Static compressor gain reduction from the last sample (dB, ≥ 0).
    pub fn compressor_gain_reduction_db(&self) -> f32 {
        self.compressor.gain_reduction_db()
    }

    /// Envelope of one channel in dB, or `None` past the prepared count.
    pub fn envelope_db(&self, channel: usize) -> Option<f32> {
        self.followers.get(channel).map(EnvelopeFollower::level_db)
    }
}

impl Default for DynamicsEngine {
    fn default() -> Self {
        Self::new(48000.0, 2)
    }
}
