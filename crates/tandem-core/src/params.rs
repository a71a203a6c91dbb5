//! User parameters of the dynamics engine and their derived forms.
//!
//! [`DynamicsParams`] owns the raw user values, clamps every write to the
//! parameter's range and immediately re-derives whatever the audio path
//! needs: close threshold, hold length in samples, smoothing coefficients and
//! linear output-gain targets. The stages read the derived
//! [`GateConfig`]/[`CompressorConfig`] snapshots and never evaluate `exp`
//! per sample.
//!
//! ## Parameter Indices (`ParameterInfo`)
//!
//! | Index | String ID | Range | Default |
//! |-------|-----------|-------|---------|
//! | 0 | `gate_enabled` | 0–1 | 1 |
//! | 1 | `gate_output_gain` | -60.0–6.0 dB | 0.0 |
//! | 2 | `gate_threshold` | -100.0–0.0 dB | -50.0 |
//! | 3 | `gate_hysteresis` | -20.0–0.0 dB | -3.0 |
//! | 4 | `gate_reduction` | -100.0–0.0 dB | -100.0 |
//! | 5 | `gate_attack` | 0.0–100.0 ms | 3.0 |
//! | 6 | `gate_hold` | 0.0–1000.0 ms | 40.0 |
//! | 7 | `gate_release` | 0.0–10000.0 ms | 10.0 |
//! | 8 | `compressor_enabled` | 0–1 | 1 |
//! | 9 | `compressor_output_gain` | -60.0–6.0 dB | 0.0 |
//! | 10 | `compressor_threshold` | -50.0–0.0 dB | -18.0 |
//! | 11 | `compressor_ratio` | 1.0–20.0 | 4.0 |
//! | 12 | `compressor_knee` | 0.0–24.0 dB | 6.0 |
//! | 13 | `compressor_attack` | 0.0–100.0 ms | 5.0 |
//! | 14 | `compressor_release` | 0.0–500.0 ms | 50.0 |
//! | 15 | `compressor_makeup_gain` | -24.0–24.0 dB | 0.0 |

use crate::compressor::{CompressorConfig, CompressorSettings};
use crate::gate::{GateConfig, GateSettings};
use crate::math::db_to_linear;
use crate::param::SmoothedParam;
use crate::param_info::{ParamDescriptor, ParamId, ParamScale, ParameterInfo};

/// Number of parameters exposed through [`ParameterInfo`].
pub const PARAM_COUNT: usize = 16;

/// Parameter indices, in [`ParameterInfo`] order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
#[allow(missing_docs)]
pub enum ParamIndex {
    GateEnabled = 0,
    GateOutputGain,
    GateThreshold,
    GateHysteresis,
    GateReduction,
    GateAttack,
    GateHold,
    GateRelease,
    CompressorEnabled,
    CompressorOutputGain,
    CompressorThreshold,
    CompressorRatio,
    CompressorKnee,
    CompressorAttack,
    CompressorRelease,
    CompressorMakeupGain,
}

impl ParamIndex {
    /// All indices in order.
    pub const ALL: [ParamIndex; PARAM_COUNT] = [
        ParamIndex::GateEnabled,
        ParamIndex::GateOutputGain,
        ParamIndex::GateThreshold,
        ParamIndex::GateHysteresis,
        ParamIndex::GateReduction,
        ParamIndex::GateAttack,
        ParamIndex::GateHold,
        ParamIndex::GateRelease,
        ParamIndex::CompressorEnabled,
        ParamIndex::CompressorOutputGain,
        ParamIndex::CompressorThreshold,
        ParamIndex::CompressorRatio,
        ParamIndex::CompressorKnee,
        ParamIndex::CompressorAttack,
        ParamIndex::CompressorRelease,
        ParamIndex::CompressorMakeupGain,
    ];

    /// Index for a raw `usize`, if in range.
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Descriptor for this parameter.
    pub fn descriptor(self) -> ParamDescriptor {
        let (desc, string_id, group) = match self {
            ParamIndex::GateEnabled => (
                ParamDescriptor::toggle("Gate Enabled", "Gate", true),
                "gate_enabled",
                "gate",
            ),
            ParamIndex::GateOutputGain => (
                ParamDescriptor::gain_db("Gate Output Gain", "G Out", -60.0, 6.0, 0.0)
                    .with_scale(ParamScale::Power(0.5)),
                "gate_output_gain",
                "gate",
            ),
            ParamIndex::GateThreshold => (
                ParamDescriptor::gain_db("Gate Threshold", "G Thresh", -100.0, 0.0, -50.0),
                "gate_threshold",
                "gate",
            ),
            ParamIndex::GateHysteresis => (
                ParamDescriptor::gain_db("Gate Hysteresis", "G Hyst", -20.0, 0.0, -3.0),
                "gate_hysteresis",
                "gate",
            ),
            ParamIndex::GateReduction => (
                ParamDescriptor::gain_db("Gate Reduction", "G Reduce", -100.0, 0.0, -100.0),
                "gate_reduction",
                "gate",
            ),
            ParamIndex::GateAttack => (
                ParamDescriptor::time_ms("Gate Attack", "G Attack", 0.0, 100.0, 3.0),
                "gate_attack",
                "gate",
            ),
            ParamIndex::GateHold => (
                ParamDescriptor::time_ms("Gate Hold", "G Hold", 0.0, 1000.0, 40.0),
                "gate_hold",
                "gate",
            ),
            ParamIndex::GateRelease => (
                ParamDescriptor::time_ms("Gate Release", "G Rel", 0.0, 10000.0, 10.0)
                    .with_scale(ParamScale::Power(5.0)),
                "gate_release",
                "gate",
            ),
            ParamIndex::CompressorEnabled => (
                ParamDescriptor::toggle("Compressor Enabled", "Comp", true),
                "compressor_enabled",
                "compressor",
            ),
            ParamIndex::CompressorOutputGain => (
                ParamDescriptor::gain_db("Compressor Output Gain", "C Out", -60.0, 6.0, 0.0)
                    .with_scale(ParamScale::Power(0.5)),
                "compressor_output_gain",
                "compressor",
            ),
            ParamIndex::CompressorThreshold => (
                ParamDescriptor::gain_db("Compressor Threshold", "C Thresh", -50.0, 0.0, -18.0),
                "compressor_threshold",
                "compressor",
            ),
            ParamIndex::CompressorRatio => (
                ParamDescriptor {
                    name: "Compressor Ratio",
                    short_name: "C Ratio",
                    ..ParamDescriptor::ratio(1.0, 20.0, 4.0)
                },
                "compressor_ratio",
                "compressor",
            ),
            ParamIndex::CompressorKnee => (
                ParamDescriptor::gain_db("Compressor Knee", "C Knee", 0.0, 24.0, 6.0),
                "compressor_knee",
                "compressor",
            ),
            ParamIndex::CompressorAttack => (
                ParamDescriptor::time_ms("Compressor Attack", "C Attack", 0.0, 100.0, 5.0),
                "compressor_attack",
                "compressor",
            ),
            ParamIndex::CompressorRelease => (
                ParamDescriptor::time_ms("Compressor Release", "C Rel", 0.0, 500.0, 50.0),
                "compressor_release",
                "compressor",
            ),
            ParamIndex::CompressorMakeupGain => (
                ParamDescriptor::gain_db("Compressor Makeup Gain", "C Makeup", -24.0, 24.0, 0.0),
                "compressor_makeup_gain",
                "compressor",
            ),
        };
        desc.with_id(ParamId(self as u32 + 1), string_id)
            .with_group(group)
    }
}

/// Raw parameter values plus everything derived from them.
///
/// # Example
///
/// ```rust
/// use tandem_core::{DynamicsParams, ParameterInfo};
///
/// let mut params = DynamicsParams::new(48000.0);
/// params.set_gate_threshold_db(-40.0);
/// params.set_gate_hysteresis_db(-6.0);
/// assert_eq!(params.gate_config().close_threshold_db, -46.0);
///
/// let idx = params.find_param_by_string_id("compressor_ratio").unwrap();
/// params.set_param(idx, 50.0);
/// assert_eq!(params.compressor_settings().ratio, 20.0);
/// ```
#[derive(Debug, Clone)]
pub struct DynamicsParams {
    sample_rate: f32,
    gate_enabled: bool,
    compressor_enabled: bool,
    gate: GateSettings,
    compressor: CompressorSettings,
    gate_output_gain_db: f32,
    compressor_output_gain_db: f32,
    gate_config: GateConfig,
    compressor_config: CompressorConfig,
    /// Linear gate output gain
    gate_output_gain: SmoothedParam,
    /// Linear compressor output gain
    compressor_output_gain: SmoothedParam,
}

impl DynamicsParams {
    /// Create with default values at the given sample rate.
    pub fn new(sample_rate: f32) -> Self {
        let gate = GateSettings::default();
        let compressor = CompressorSettings::default();
        Self {
            sample_rate,
            gate_enabled: true,
            compressor_enabled: true,
            gate,
            compressor,
            gate_output_gain_db: 0.0,
            compressor_output_gain_db: 0.0,
            gate_config: GateConfig::derive(&gate, sample_rate),
            compressor_config: CompressorConfig::derive(&compressor, sample_rate),
            gate_output_gain: SmoothedParam::standard(1.0, sample_rate),
            compressor_output_gain: SmoothedParam::standard(1.0, sample_rate),
        }
    }

    /// Re-derive every time-based form for a new sample rate.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.gate_output_gain.set_sample_rate(sample_rate);
        self.compressor_output_gain.set_sample_rate(sample_rate);
        self.rederive_gate();
        self.rederive_compressor();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            sample_rate,
            hold_samples = self.gate_config.hold_samples,
            "dynamics parameters re-derived"
        );
    }

    /// Current sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Snap both output-gain smoothers to their targets.
    pub fn snap_output_gains(&mut self) {
        self.gate_output_gain.snap_to_target();
        self.compressor_output_gain.snap_to_target();
    }

    // --- gate ---

    /// Enable or bypass the gate.
    pub fn set_gate_enabled(&mut self, enabled: bool) {
        self.gate_enabled = enabled;
    }

    /// Whether the gate is enabled.
    pub fn gate_enabled(&self) -> bool {
        self.gate_enabled
    }

    /// Gate output gain in dB (smoothed when applied).
    pub fn set_gate_output_gain_db(&mut self, db: f32) {
        self.gate_output_gain_db = clamp_to(ParamIndex::GateOutputGain, db);
        self.gate_output_gain
            .set_target(db_to_linear(self.gate_output_gain_db));
    }

    /// Gate open threshold in dB.
    pub fn set_gate_threshold_db(&mut self, db: f32) {
        self.gate.threshold_db = clamp_to(ParamIndex::GateThreshold, db);
        self.rederive_gate();
    }

    /// Gate hysteresis in dB (≤ 0).
    pub fn set_gate_hysteresis_db(&mut self, db: f32) {
        self.gate.hysteresis_db = clamp_to(ParamIndex::GateHysteresis, db);
        self.rederive_gate();
    }

    /// Gain while the gate is closed, in dB.
    pub fn set_gate_reduction_db(&mut self, db: f32) {
        self.gate.reduction_db = clamp_to(ParamIndex::GateReduction, db);
        self.rederive_gate();
    }

    /// Gate attack time in ms.
    pub fn set_gate_attack_ms(&mut self, ms: f32) {
        self.gate.attack_ms = clamp_to(ParamIndex::GateAttack, ms);
        self.rederive_gate();
    }

    /// Gate hold time in ms.
    pub fn set_gate_hold_ms(&mut self, ms: f32) {
        self.gate.hold_ms = clamp_to(ParamIndex::GateHold, ms);
        self.rederive_gate();
    }

    /// Gate release time in ms.
    pub fn set_gate_release_ms(&mut self, ms: f32) {
        self.gate.release_ms = clamp_to(ParamIndex::GateRelease, ms);
        self.rederive_gate();
    }

    /// Raw gate settings.
    pub fn gate_settings(&self) -> &GateSettings {
        &self.gate
    }

    /// Derived gate configuration.
    pub fn gate_config(&self) -> &GateConfig {
        &self.gate_config
    }

    // --- compressor ---

    /// Enable or bypass the compressor.
    pub fn set_compressor_enabled(&mut self, enabled: bool) {
        self.compressor_enabled = enabled;
    }

    /// Whether the compressor is enabled.
    pub fn compressor_enabled(&self) -> bool {
        self.compressor_enabled
    }

    /// Compressor output gain in dB (smoothed when applied).
    pub fn set_compressor_output_gain_db(&mut self, db: f32) {
        self.compressor_output_gain_db = clamp_to(ParamIndex::CompressorOutputGain, db);
        self.compressor_output_gain
            .set_target(db_to_linear(self.compressor_output_gain_db));
    }

    /// Compressor threshold in dB.
    pub fn set_compressor_threshold_db(&mut self, db: f32) {
        self.compressor.threshold_db = clamp_to(ParamIndex::CompressorThreshold, db);
        self.rederive_compressor();
    }

    /// Compression ratio.
    pub fn set_compressor_ratio(&mut self, ratio: f32) {
        self.compressor.ratio = clamp_to(ParamIndex::CompressorRatio, ratio);
        self.rederive_compressor();
    }

    /// Knee width in dB; 0 selects the hard knee.
    pub fn set_compressor_knee_db(&mut self, db: f32) {
        self.compressor.knee_db = clamp_to(ParamIndex::CompressorKnee, db);
        self.rederive_compressor();
    }

    /// Compressor attack time in ms.
    pub fn set_compressor_attack_ms(&mut self, ms: f32) {
        self.compressor.attack_ms = clamp_to(ParamIndex::CompressorAttack, ms);
        self.rederive_compressor();
    }

    /// Compressor release time in ms.
    pub fn set_compressor_release_ms(&mut self, ms: f32) {
        self.compressor.release_ms = clamp_to(ParamIndex::CompressorRelease, ms);
        self.rederive_compressor();
    }

    /// Makeup gain in dB.
    pub fn set_compressor_makeup_db(&mut self, db: f32) {
        self.compressor.makeup_db = clamp_to(ParamIndex::CompressorMakeupGain, db);
        self.rederive_compressor();
    }

    /// Raw compressor settings.
    pub fn compressor_settings(&self) -> &CompressorSettings {
        &self.compressor
    }

    /// Derived compressor configuration.
    pub fn compressor_config(&self) -> &CompressorConfig {
        &self.compressor_config
    }

    /// Derived configs plus mutable access to the output-gain smoothers, for
    /// the per-sample loop.
    #[inline]
    pub(crate) fn split_for_processing(
        &mut self,
    ) -> (
        &GateConfig,
        &CompressorConfig,
        &mut SmoothedParam,
        &mut SmoothedParam,
    ) {
        (
            &self.gate_config,
            &self.compressor_config,
            &mut self.gate_output_gain,
            &mut self.compressor_output_gain,
        )
    }

    /// Linear gate output-gain smoother.
    pub fn gate_output_gain(&self) -> &SmoothedParam {
        &self.gate_output_gain
    }

    /// Linear compressor output-gain smoother.
    pub fn compressor_output_gain(&self) -> &SmoothedParam {
        &self.compressor_output_gain
    }

    fn rederive_gate(&mut self) {
        self.gate_config = GateConfig::derive(&self.gate, self.sample_rate);
    }

    fn rederive_compressor(&mut self) {
        self.compressor_config = CompressorConfig::derive(&self.compressor, self.sample_rate);
    }
}

impl Default for DynamicsParams {
    fn default() -> Self {
        Self::new(48000.0)
    }
}

fn clamp_to(index: ParamIndex, value: f32) -> f32 {
    index.descriptor().clamp(value)
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

impl ParameterInfo for DynamicsParams {
    fn param_count(&self) -> usize {
        PARAM_COUNT
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        ParamIndex::from_index(index).map(ParamIndex::descriptor)
    }

    fn get_param(&self, index: usize) -> f32 {
        let Some(index) = ParamIndex::from_index(index) else {
            return 0.0;
        };
        match index {
            ParamIndex::GateEnabled => flag(self.gate_enabled),
            ParamIndex::GateOutputGain => self.gate_output_gain_db,
            ParamIndex::GateThreshold => self.gate.threshold_db,
            ParamIndex::GateHysteresis => self.gate.hysteresis_db,
            ParamIndex::GateReduction => self.gate.reduction_db,
            ParamIndex::GateAttack => self.gate.attack_ms,
            ParamIndex::GateHold => self.gate.hold_ms,
            ParamIndex::GateRelease => self.gate.release_ms,
            ParamIndex::CompressorEnabled => flag(self.compressor_enabled),
            ParamIndex::CompressorOutputGain => self.compressor_output_gain_db,
            ParamIndex::CompressorThreshold => self.compressor.threshold_db,
            ParamIndex::CompressorRatio => self.compressor.ratio,
            ParamIndex::CompressorKnee => self.compressor.knee_db,
            ParamIndex::CompressorAttack => self.compressor.attack_ms,
            ParamIndex::CompressorRelease => self.compressor.release_ms,
            ParamIndex::CompressorMakeupGain => self.compressor.makeup_db,
        }
    }

    fn set_param(&mut self, index: usize, value: f32) {
        let Some(index) = ParamIndex::from_index(index) else {
            return;
        };
        match index {
            ParamIndex::GateEnabled => self.set_gate_enabled(value > 0.5),
            ParamIndex::GateOutputGain => self.set_gate_output_gain_db(value),
            ParamIndex::GateThreshold => self.set_gate_threshold_db(value),
            ParamIndex::GateHysteresis => self.set_gate_hysteresis_db(value),
            ParamIndex::GateReduction => self.set_gate_reduction_db(value),
            ParamIndex::GateAttack => self.set_gate_attack_ms(value),
            ParamIndex::GateHold => self.set_gate_hold_ms(value),
            ParamIndex::GateRelease => self.set_gate_release_ms(value),
            ParamIndex::CompressorEnabled => self.set_compressor_enabled(value > 0.5),
            ParamIndex::CompressorOutputGain => self.set_compressor_output_gain_db(value),
            ParamIndex::CompressorThreshold => self.set_compressor_threshold_db(value),
            ParamIndex::CompressorRatio => self.set_compressor_ratio(value),
            ParamIndex::CompressorKnee => self.set_compressor_knee_db(value),
            ParamIndex::CompressorAttack => self.set_compressor_attack_ms(value),
            ParamIndex::CompressorRelease => self.set_compressor_release_ms(value),
            ParamIndex::CompressorMakeupGain => self.set_compressor_makeup_db(value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coeff::smoothing_coefficient;

    #[test]
    fn test_defaults_match_descriptors() {
        let params = DynamicsParams::default();
        for i in 0..params.param_count() {
            let desc = params.param_info(i).unwrap();
            assert_eq!(
                params.get_param(i),
                desc.default,
                "default mismatch for {}",
                desc.string_id
            );
        }
    }

    #[test]
    fn test_ids_are_unique_and_stable() {
        let params = DynamicsParams::default();
        for i in 0..PARAM_COUNT {
            let desc = params.param_info(i).unwrap();
            assert_eq!(desc.id, ParamId(i as u32 + 1));
            assert_eq!(params.find_param_by_string_id(desc.string_id), Some(i));
            assert!(!desc.string_id.is_empty());
        }
        assert!(params.param_info(PARAM_COUNT).is_none());
    }

    #[test]
    fn test_setters_clamp() {
        let mut params = DynamicsParams::default();
        params.set_gate_hysteresis_db(5.0);
        assert_eq!(params.gate_settings().hysteresis_db, 0.0);
        params.set_compressor_ratio(0.0);
        assert_eq!(params.compressor_settings().ratio, 1.0);
        params.set_compressor_knee_db(-3.0);
        assert_eq!(params.compressor_settings().knee_db, 0.0);
        params.set_gate_release_ms(1e9);
        assert_eq!(params.gate_settings().release_ms, 10000.0);
    }

    #[test]
    fn test_threshold_and_hysteresis_rederive_close() {
        let mut params = DynamicsParams::default();
        assert_eq!(params.gate_config().close_threshold_db, -53.0);
        params.set_gate_threshold_db(-30.0);
        assert_eq!(params.gate_config().close_threshold_db, -33.0);
        params.set_gate_hysteresis_db(-10.0);
        assert_eq!(params.gate_config().close_threshold_db, -40.0);
    }

    #[test]
    fn test_time_setters_rederive_coefficients() {
        let mut params = DynamicsParams::new(48000.0);
        params.set_gate_attack_ms(0.0);
        assert_eq!(params.gate_config().coefficients.attack, 0.0);
        params.set_compressor_release_ms(200.0);
        assert_eq!(
            params.compressor_config().coefficients.release,
            smoothing_coefficient(200.0, 48000.0)
        );
        params.set_gate_hold_ms(10.0);
        assert_eq!(params.gate_config().hold_samples, 480);
    }

    #[test]
    fn test_sample_rate_rederives_everything() {
        let mut params = DynamicsParams::new(48000.0);
        params.set_sample_rate(96000.0);
        assert_eq!(params.gate_config().hold_samples, 3840);
        assert_eq!(
            params.compressor_config().coefficients.attack,
            smoothing_coefficient(5.0, 96000.0)
        );
        assert_eq!(params.sample_rate(), 96000.0);
    }

    #[test]
    fn test_output_gain_targets_linear() {
        let mut params = DynamicsParams::default();
        params.set_gate_output_gain_db(-6.0);
        let target = params.gate_output_gain().target();
        assert!((target - 0.501).abs() < 1e-3);
        // Not applied until smoothed or snapped
        assert_eq!(params.gate_output_gain().get(), 1.0);
        params.snap_output_gains();
        assert_eq!(params.gate_output_gain().get(), target);
        assert_eq!(params.get_param(ParamIndex::GateOutputGain as usize), -6.0);
    }

    #[test]
    fn test_enable_flags_via_set_param() {
        let mut params = DynamicsParams::default();
        params.set_param(ParamIndex::GateEnabled as usize, 0.0);
        params.set_param(ParamIndex::CompressorEnabled as usize, 0.2);
        assert!(!params.gate_enabled());
        assert!(!params.compressor_enabled());
        assert_eq!(params.get_param(ParamIndex::GateEnabled as usize), 0.0);
        params.set_param(ParamIndex::CompressorEnabled as usize, 1.0);
        assert!(params.compressor_enabled());
    }

    #[test]
    fn test_out_of_range_index_ignored() {
        let mut params = DynamicsParams::default();
        params.set_param(99, 1.0);
        assert_eq!(params.get_param(99), 0.0);
        assert_eq!(ParamIndex::from_index(16), None);
        assert_eq!(ParamIndex::from_index(11), Some(ParamIndex::CompressorRatio));
    }
}
