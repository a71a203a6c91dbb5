//! Shared CLI helpers used across multiple commands.

use tandem_config::{Preset, find_preset, get_factory_preset, validate_param};
use tandem_core::{DynamicsParams, ParameterInfo};

/// Parse a `key=value` string for clap's `value_parser`.
pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!(
            "Invalid parameter format: '{}' (expected key=value)",
            s
        )),
    }
}

/// Load a preset by name or path.
///
/// Factory presets win over user presets of the same name; anything else is
/// resolved through the user preset directory or as a file path.
pub fn load_preset(name: &str) -> anyhow::Result<Preset> {
    if let Some(preset) = get_factory_preset(name) {
        return Ok(preset);
    }

    if let Some(path) = find_preset(name) {
        tracing::debug!(path = %path.display(), "loading preset file");
        return Ok(Preset::load(&path)?);
    }

    anyhow::bail!(
        "Preset '{}' not found. Use 'tandem presets list' to see available presets.",
        name
    )
}

/// Apply `id=value` overrides. Values are validated before anything is set.
///
/// Toggles accept `on`/`off`/`true`/`false` as well as numbers.
pub fn apply_param_overrides(
    params: &mut DynamicsParams,
    overrides: &[(String, String)],
) -> anyhow::Result<()> {
    let mut resolved = Vec::with_capacity(overrides.len());
    for (key, raw) in overrides {
        let value = parse_param_value(raw)
            .ok_or_else(|| anyhow::anyhow!("invalid value for '{}': '{}'", key, raw))?;
        let index = validate_param(key, value)?;
        resolved.push((index as usize, value));
    }

    for (index, value) in resolved {
        params.set_param(index, value);
        tracing::debug!(index, value, "parameter override");
    }
    Ok(())
}

fn parse_param_value(raw: &str) -> Option<f32> {
    match raw.to_ascii_lowercase().as_str() {
        "on" | "true" => Some(1.0),
        "off" | "false" => Some(0.0),
        other => other.trim_end_matches("db").trim_end_matches("ms").trim().parse().ok(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key_val() {
        assert_eq!(
            parse_key_val("gate_hold=120"),
            Ok(("gate_hold".to_string(), "120".to_string()))
        );
        assert_eq!(
            parse_key_val("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert!(parse_key_val("novalue").is_err());
        assert!(parse_key_val("=3").is_err());
    }

    #[test]
    fn test_parse_param_value() {
        assert_eq!(parse_param_value("off"), Some(0.0));
        assert_eq!(parse_param_value("On"), Some(1.0));
        assert_eq!(parse_param_value("-12.5dB"), Some(-12.5));
        assert_eq!(parse_param_value("40ms"), Some(40.0));
        assert_eq!(parse_param_value("loud"), None);
    }

    #[test]
    fn test_overrides_are_all_or_nothing() {
        let mut params = DynamicsParams::default();
        let overrides = vec![
            ("gate_threshold".to_string(), "-30".to_string()),
            ("compressor_ratio".to_string(), "99".to_string()),
        ];
        assert!(apply_param_overrides(&mut params, &overrides).is_err());
        assert_eq!(params.gate_settings().threshold_db, -50.0);

        let overrides = vec![
            ("gate_threshold".to_string(), "-30".to_string()),
            ("compressor_enabled".to_string(), "off".to_string()),
        ];
        apply_param_overrides(&mut params, &overrides).unwrap();
        assert_eq!(params.gate_settings().threshold_db, -30.0);
        assert!(!params.compressor_enabled());
    }

    #[test]
    fn test_unknown_override_rejected() {
        let mut params = DynamicsParams::default();
        let err = apply_param_overrides(&mut params, &[("lookahead".into(), "5".into())])
            .unwrap_err();
        assert!(err.to_string().contains("unknown parameter"), "got: {err}");
    }

    #[test]
    fn test_load_factory_and_missing_preset() {
        assert_eq!(load_preset("drums").unwrap().name, "Drums");
        assert!(load_preset("definitely_not_a_preset_name").is_err());
    }
}
