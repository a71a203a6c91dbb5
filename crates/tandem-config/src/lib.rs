//! Preset files, validation and factory presets for the tandem dynamics
//! engine.
//!
//! A [`Preset`] is a TOML file holding every raw gate and compressor
//! parameter. Presets are validated against the engine's parameter
//! descriptors before they are applied, so a bad file never leaves a
//! half-applied parameter set behind.
//!
//! # Example
//!
//! ```rust
//! use tandem_config::{get_factory_preset, Preset};
//! use tandem_core::DynamicsEngine;
//!
//! let mut engine = DynamicsEngine::new(48000.0, 2);
//! let preset = get_factory_preset("vocal").unwrap();
//! preset.apply_to(engine.params_mut()).unwrap();
//!
//! let text = preset.to_toml().unwrap();
//! assert_eq!(Preset::from_toml(&text).unwrap(), preset);
//! ```

mod error;
mod preset;

/// Platform-specific preset directories.
pub mod paths;

/// Parameter and preset validation.
pub mod validation;

/// Presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{factory_presets, get_factory_preset};
pub use paths::{find_preset, list_user_presets, preset_name_from_path, user_presets_dir};
pub use preset::{CompressorSection, GateSection, Preset};
pub use validation::{
    ValidationError, ValidationResult, find_param, validate_param, validate_preset,
};
