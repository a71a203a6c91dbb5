//! Factory presets bundled with tandem.
//!
//! Always available without files on disk. Each is a complete starting point
//! for a common source; any key a preset leaves out takes the engine default.

use crate::Preset;

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("default", DEFAULT_PRESET),
    ("vocal", VOCAL_PRESET),
    ("drums", DRUMS_PRESET),
    ("bass", BASS_PRESET),
    ("gentle_leveling", GENTLE_LEVELING_PRESET),
    ("hard_gate", HARD_GATE_PRESET),
];

/// Engine defaults.
const DEFAULT_PRESET: &str = r#"
name = "Default"
description = "Engine defaults: -50 dB gate, 4:1 soft-knee compressor at -18 dB"
"#;

/// Soft gate under a moderate leveling compressor.
const VOCAL_PRESET: &str = r#"
name = "Vocal"
description = "Soft gate for breaths and room tone, 3:1 leveling with makeup"

[gate]
threshold = -55.0
hysteresis = -4.0
reduction = -18.0
attack = 5.0
hold = 80.0
release = 150.0

[compressor]
threshold = -22.0
ratio = 3.0
knee = 8.0
attack = 8.0
release = 120.0
makeup_gain = 5.0
"#;

/// Tight gate and fast compression for close-miked drums.
const DRUMS_PRESET: &str = r#"
name = "Drums"
description = "Tight gate against bleed, fast 6:1 compression for punch"

[gate]
threshold = -38.0
hysteresis = -6.0
reduction = -40.0
attack = 0.5
hold = 30.0
release = 60.0

[compressor]
threshold = -16.0
ratio = 6.0
knee = 3.0
attack = 2.0
release = 80.0
makeup_gain = 4.0
"#;

/// Slow release keeps low notes from pumping.
const BASS_PRESET: &str = r#"
name = "Bass"
description = "Gate off, 4:1 with a slow release to hold sustained notes even"

[gate]
enabled = false

[compressor]
threshold = -20.0
ratio = 4.0
knee = 6.0
attack = 15.0
release = 250.0
makeup_gain = 3.0
"#;

/// Low ratio, wide knee, no gate.
const GENTLE_LEVELING_PRESET: &str = r#"
name = "Gentle Leveling"
description = "2:1 over a wide knee for transparent level riding"

[gate]
enabled = false

[compressor]
threshold = -24.0
ratio = 2.0
knee = 18.0
attack = 20.0
release = 300.0
makeup_gain = 2.0
"#;

/// Full-depth gate, compressor off.
const HARD_GATE_PRESET: &str = r#"
name = "Hard Gate"
description = "Full-depth gate with short hold, compressor bypassed"

[gate]
threshold = -40.0
hysteresis = -2.0
reduction = -100.0
attack = 0.2
hold = 10.0
release = 5.0

[compressor]
enabled = false
"#;

/// Every factory preset, in display order.
///
/// # Example
///
/// ```rust
/// use tandem_config::factory_presets;
///
/// for preset in factory_presets() {
///     println!("{}: {}", preset.name, preset.description.as_deref().unwrap_or(""));
/// }
/// ```
pub fn factory_presets() -> Vec<Preset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| Preset::from_toml(toml).ok())
        .collect()
}

/// Look up a factory preset by identifier or display name, ignoring case.
///
/// ```rust
/// use tandem_config::get_factory_preset;
///
/// assert_eq!(get_factory_preset("hard_gate").unwrap().name, "Hard Gate");
/// assert_eq!(get_factory_preset("hard gate").unwrap().name, "Hard Gate");
/// assert!(get_factory_preset("mastering").is_none());
/// ```
pub fn get_factory_preset(name: &str) -> Option<Preset> {
    if let Some((_, toml)) = FACTORY_PRESETS_TOML
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(name))
    {
        return Preset::from_toml(toml).ok();
    }

    factory_presets()
        .into_iter()
        .find(|preset| preset.name.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate_preset;

    #[test]
    fn test_all_factory_presets_parse_and_validate() {
        for (id, toml) in FACTORY_PRESETS_TOML {
            let preset = Preset::from_toml(toml)
                .unwrap_or_else(|e| panic!("factory preset '{id}' should parse: {e}"));
            assert!(!preset.name.is_empty(), "'{id}' has no name");
            assert!(preset.description.is_some(), "'{id}' has no description");
            if let Err(e) = validate_preset(&preset) {
                panic!("factory preset '{id}' out of range: {e}");
            }
        }
        assert_eq!(factory_presets().len(), FACTORY_PRESETS_TOML.len());
    }

    #[test]
    fn test_default_matches_preset_default_values() {
        let preset = get_factory_preset("default").unwrap();
        assert_eq!(preset.gate, Preset::default().gate);
        assert_eq!(preset.compressor, Preset::default().compressor);
    }

    #[test]
    fn test_lookup_by_display_name_any_case() {
        assert_eq!(
            get_factory_preset("GENTLE LEVELING").unwrap().name,
            "Gentle Leveling"
        );
        assert_eq!(get_factory_preset("Vocal").unwrap().name, "Vocal");
        assert_eq!(get_factory_preset("DRUMS").unwrap().name, "Drums");
        assert!(get_factory_preset("my_custom_preset").is_none());
    }

    #[test]
    fn test_stage_toggles() {
        assert!(!get_factory_preset("bass").unwrap().gate.enabled);
        assert!(!get_factory_preset("hard_gate").unwrap().compressor.enabled);
        assert!(get_factory_preset("vocal").unwrap().gate.enabled);
    }
}
