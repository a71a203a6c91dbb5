//! Preset file format and operations.

use serde::{Deserialize, Serialize};
use std::path::Path;

use tandem_core::{
    CompressorSettings, DynamicsParams, GateSettings, PARAM_COUNT, ParamIndex, ParameterInfo,
};

use crate::error::ConfigError;
use crate::validation::validate_preset;

/// A complete set of gate and compressor parameters.
///
/// Every key is optional in the file; anything missing takes the engine's
/// default. Unknown keys are rejected when parsing.
///
/// # TOML Format
///
/// ```toml
/// name = "Vocal"
/// description = "Gentle leveling with a soft gate"
///
/// [gate]
/// enabled = true
/// threshold = -55.0
/// hysteresis = -4.0
/// hold = 60.0
///
/// [compressor]
/// threshold = -20.0
/// ratio = 3.0
/// makeup_gain = 4.0
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Preset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Gate parameters.
    #[serde(default)]
    pub gate: GateSection,

    /// Compressor parameters.
    #[serde(default)]
    pub compressor: CompressorSection,
}

/// `[gate]` table. Levels in dB, times in ms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct GateSection {
    pub enabled: bool,
    pub output_gain: f32,
    pub threshold: f32,
    pub hysteresis: f32,
    pub reduction: f32,
    pub attack: f32,
    pub hold: f32,
    pub release: f32,
}

impl Default for GateSection {
    fn default() -> Self {
        let g = GateSettings::default();
        Self {
            enabled: true,
            output_gain: 0.0,
            threshold: g.threshold_db,
            hysteresis: g.hysteresis_db,
            reduction: g.reduction_db,
            attack: g.attack_ms,
            hold: g.hold_ms,
            release: g.release_ms,
        }
    }
}

/// `[compressor]` table. Levels in dB, times in ms.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
#[allow(missing_docs)]
pub struct CompressorSection {
    pub enabled: bool,
    pub output_gain: f32,
    pub threshold: f32,
    pub ratio: f32,
    pub knee: f32,
    pub attack: f32,
    pub release: f32,
    pub makeup_gain: f32,
}

impl Default for CompressorSection {
    fn default() -> Self {
        let c = CompressorSettings::default();
        Self {
            enabled: true,
            output_gain: 0.0,
            threshold: c.threshold_db,
            ratio: c.ratio,
            knee: c.knee_db,
            attack: c.attack_ms,
            release: c.release_ms,
            makeup_gain: c.makeup_db,
        }
    }
}

fn flag(value: bool) -> f32 {
    if value { 1.0 } else { 0.0 }
}

impl Preset {
    /// Create a preset with default values.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            gate: GateSection::default(),
            compressor: CompressorSection::default(),
        }
    }

    /// Capture the current raw values of a parameter set.
    pub fn from_params(name: impl Into<String>, params: &DynamicsParams) -> Self {
        let v = |index: ParamIndex| params.get_param(index as usize);
        Self {
            name: name.into(),
            description: None,
            gate: GateSection {
                enabled: params.gate_enabled(),
                output_gain: v(ParamIndex::GateOutputGain),
                threshold: v(ParamIndex::GateThreshold),
                hysteresis: v(ParamIndex::GateHysteresis),
                reduction: v(ParamIndex::GateReduction),
                attack: v(ParamIndex::GateAttack),
                hold: v(ParamIndex::GateHold),
                release: v(ParamIndex::GateRelease),
            },
            compressor: CompressorSection {
                enabled: params.compressor_enabled(),
                output_gain: v(ParamIndex::CompressorOutputGain),
                threshold: v(ParamIndex::CompressorThreshold),
                ratio: v(ParamIndex::CompressorRatio),
                knee: v(ParamIndex::CompressorKnee),
                attack: v(ParamIndex::CompressorAttack),
                release: v(ParamIndex::CompressorRelease),
                makeup_gain: v(ParamIndex::CompressorMakeupGain),
            },
        }
    }

    /// Every value paired with its parameter, in parameter-index order.
    pub fn values(&self) -> [(ParamIndex, f32); PARAM_COUNT] {
        let g = &self.gate;
        let c = &self.compressor;
        [
            (ParamIndex::GateEnabled, flag(g.enabled)),
            (ParamIndex::GateOutputGain, g.output_gain),
            (ParamIndex::GateThreshold, g.threshold),
            (ParamIndex::GateHysteresis, g.hysteresis),
            (ParamIndex::GateReduction, g.reduction),
            (ParamIndex::GateAttack, g.attack),
            (ParamIndex::GateHold, g.hold),
            (ParamIndex::GateRelease, g.release),
            (ParamIndex::CompressorEnabled, flag(c.enabled)),
            (ParamIndex::CompressorOutputGain, c.output_gain),
            (ParamIndex::CompressorThreshold, c.threshold),
            (ParamIndex::CompressorRatio, c.ratio),
            (ParamIndex::CompressorKnee, c.knee),
            (ParamIndex::CompressorAttack, c.attack),
            (ParamIndex::CompressorRelease, c.release),
            (ParamIndex::CompressorMakeupGain, c.makeup_gain),
        ]
    }

    /// Validate, then write every value into `params`.
    ///
    /// Nothing is applied if any value is out of range.
    pub fn apply_to(&self, params: &mut DynamicsParams) -> Result<(), ConfigError> {
        validate_preset(self)?;
        for (index, value) in self.values() {
            params.set_param(index as usize, value);
        }
        Ok(())
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Parse a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::create_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Serialize the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_engine() {
        let preset = Preset::default();
        let params = DynamicsParams::default();
        for (index, value) in preset.values() {
            assert_eq!(
                value,
                params.get_param(index as usize),
                "{:?} default differs",
                index
            );
        }
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let preset = Preset::from_toml(
            r#"
name = "Partial"

[compressor]
ratio = 8.0
"#,
        )
        .unwrap();
        assert_eq!(preset.name, "Partial");
        assert_eq!(preset.compressor.ratio, 8.0);
        assert_eq!(preset.compressor.threshold, -18.0);
        assert_eq!(preset.gate, GateSection::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result = Preset::from_toml(
            r#"
name = "Bad"

[gate]
lookahead = 5.0
"#,
        );
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_misplaced_key_and_stray_table_rejected() {
        // A section key written at the top level
        let result = Preset::from_toml("name = \"x\"\nratio = 8.0\n");
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));

        let result = Preset::from_toml(
            r#"
name = "x"

[compressor]
ratio = 8.0

[limiter]
ceiling = -1.0
"#,
        );
        assert!(matches!(result, Err(ConfigError::TomlParse(_))));
    }

    #[test]
    fn test_from_params_captures_values() {
        let mut params = DynamicsParams::default();
        params.set_gate_hold_ms(120.0);
        params.set_compressor_enabled(false);
        params.set_compressor_output_gain_db(-3.0);

        let preset = Preset::from_params("Captured", &params);
        assert_eq!(preset.gate.hold, 120.0);
        assert!(!preset.compressor.enabled);
        assert_eq!(preset.compressor.output_gain, -3.0);
    }

    #[test]
    fn test_apply_to_sets_params() {
        let mut preset = Preset::new("Apply");
        preset.gate.threshold = -40.0;
        preset.gate.enabled = false;
        preset.compressor.knee = 0.0;

        let mut params = DynamicsParams::default();
        preset.apply_to(&mut params).unwrap();

        assert!(!params.gate_enabled());
        assert_eq!(params.gate_config().open_threshold_db, -40.0);
        assert_eq!(params.compressor_settings().knee_db, 0.0);
    }

    #[test]
    fn test_apply_to_rejects_out_of_range_without_changes() {
        let mut preset = Preset::new("Bad");
        preset.gate.threshold = -40.0;
        preset.compressor.ratio = 50.0;

        let mut params = DynamicsParams::default();
        let err = preset.apply_to(&mut params).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert_eq!(params.gate_settings().threshold_db, -50.0);
    }

    #[test]
    fn test_toml_roundtrip_keeps_description() {
        let mut preset = Preset::new("Round");
        preset.description = Some("kept".to_string());
        let text = preset.to_toml().unwrap();
        assert!(text.contains("[gate]"));
        assert!(text.contains("[compressor]"));
        assert_eq!(Preset::from_toml(&text).unwrap(), preset);
    }
}
