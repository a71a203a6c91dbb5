//! Integration tests for tandem-config: presets on disk, applied to a
//! running engine.

use tandem_config::{ConfigError, Preset, factory_presets, get_factory_preset, validate_preset};
use tandem_core::{DynamicsEngine, DynamicsParams};
use tempfile::TempDir;

#[test]
fn save_then_load_from_disk() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nested").join("dir").join("vocal.toml");

    let preset = get_factory_preset("vocal").unwrap();
    preset.save(&path).unwrap();
    assert!(path.is_file());

    let loaded = Preset::load(&path).unwrap();
    assert_eq!(loaded, preset);
}

#[test]
fn load_missing_file_reports_path() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("nope.toml");

    match Preset::load(&path) {
        Err(ConfigError::ReadFile { path: p, .. }) => assert_eq!(p, path),
        other => panic!("expected ReadFile, got {other:?}"),
    }
}

#[test]
fn captured_engine_state_round_trips() {
    let mut engine = DynamicsEngine::new(48000.0, 2);
    {
        let params = engine.params_mut();
        params.set_gate_threshold_db(-42.0);
        params.set_gate_release_ms(250.0);
        params.set_compressor_ratio(8.0);
        params.set_compressor_makeup_db(-2.5);
    }

    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("captured.toml");
    Preset::from_params("Captured", engine.params())
        .save(&path)
        .unwrap();

    let mut fresh = DynamicsParams::new(44100.0);
    Preset::load(&path).unwrap().apply_to(&mut fresh).unwrap();

    assert_eq!(fresh.gate_settings(), engine.params().gate_settings());
    assert_eq!(
        fresh.compressor_settings(),
        engine.params().compressor_settings()
    );
    // Time constants are re-derived at the target's own sample rate
    assert_eq!(fresh.gate_config().hold_samples, 1764);
}

#[test]
fn every_factory_preset_drives_the_engine() {
    for preset in factory_presets() {
        validate_preset(&preset).unwrap();

        let mut engine = DynamicsEngine::new(48000.0, 2);
        preset.apply_to(engine.params_mut()).unwrap();
        engine.params_mut().snap_output_gains();

        let mut l: Vec<f32> = (0..4800).map(|i| (i as f32 * 0.05).sin() * 0.6).collect();
        let mut r = l.clone();
        engine.process_block(&mut [&mut l[..], &mut r[..]]);

        assert!(
            l.iter().chain(&r).all(|s| s.is_finite() && s.abs() <= 4.0),
            "'{}' produced bad output",
            preset.name
        );
        assert_eq!(l, r, "'{}' did not link channels", preset.name);
    }
}

#[test]
fn hand_edited_file_with_bad_value_is_rejected() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("edited.toml");
    std::fs::write(
        &path,
        r#"
name = "Edited"

[gate]
hold = 5000.0
"#,
    )
    .unwrap();

    let preset = Preset::load(&path).unwrap();
    let mut params = DynamicsParams::default();
    let err = preset.apply_to(&mut params).unwrap_err();
    assert!(err.to_string().contains("gate_hold"), "got: {err}");
    assert_eq!(params.gate_settings().hold_ms, 40.0);
}
