//! Preset and parameter validation.
//!
//! Values are checked against the engine's own parameter descriptors, so the
//! ranges here can never drift from what [`DynamicsParams`] accepts.
//!
//! # Example
//!
//! ```rust
//! use tandem_config::{validate_param, ValidationError};
//!
//! assert!(validate_param("compressor_ratio", 4.0).is_ok());
//! assert!(matches!(
//!     validate_param("compressor_ratio", 40.0),
//!     Err(ValidationError::OutOfRange { .. })
//! ));
//! ```
//!
//! [`DynamicsParams`]: tandem_core::DynamicsParams

use tandem_core::{ParamDescriptor, ParamIndex};
use thiserror::Error;

use crate::Preset;

/// Validation error types.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Unknown parameter string ID.
    #[error("unknown parameter: {0}")]
    UnknownParameter(String),

    /// Parameter value out of range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// String ID of the parameter.
        param: String,
        /// The value that was out of range.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// Multiple validation errors.
    #[error("multiple validation errors: {}", .0.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Look up a parameter by its string ID.
pub fn find_param(string_id: &str) -> Option<(ParamIndex, ParamDescriptor)> {
    ParamIndex::ALL
        .iter()
        .map(|&index| (index, index.descriptor()))
        .find(|(_, desc)| desc.string_id == string_id)
}

fn check_range(desc: &ParamDescriptor, value: f32) -> ValidationResult<()> {
    if desc.contains(value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            param: desc.string_id.to_string(),
            value,
            min: desc.min,
            max: desc.max,
        })
    }
}

/// Validate a single value given by string ID. Returns the parameter's index.
pub fn validate_param(string_id: &str, value: f32) -> ValidationResult<ParamIndex> {
    let (index, desc) = find_param(string_id)
        .ok_or_else(|| ValidationError::UnknownParameter(string_id.to_string()))?;
    check_range(&desc, value)?;
    Ok(index)
}

/// Validate every value in a preset.
///
/// A single failure is returned as-is; several are wrapped in
/// [`ValidationError::Multiple`].
pub fn validate_preset(preset: &Preset) -> ValidationResult<()> {
    let mut errors: Vec<ValidationError> = preset
        .values()
        .iter()
        .filter_map(|&(index, value)| check_range(&index.descriptor(), value).err())
        .collect();

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(errors)),
    }
}
