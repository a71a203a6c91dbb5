//! Tandem Core - gate and compressor dynamics engine
//!
//! A noise gate and a downward compressor in series, both driven by a shared
//! dB-domain envelope that is linked across channels. Built for real-time
//! audio: nothing allocates, locks or calls `exp` on the processing path.
//!
//! # Signal Flow
//!
//! ```text
//! sample ─▶ |x| → dB ─▶ attack/release follower (per channel)
//!                              │
//!                      channel max (dB)
//!                       ┌──────┴──────┐
//!                  gate gain      compressor gain
//!                       └──── × ──────┘
//!                              ▼
//!                   applied to every channel
//! ```
//!
//! # Building Blocks
//!
//! - [`EnvelopeFollower`] - Dual-branch dB envelope (1 ms / 100 ms)
//! - [`GateStage`] - Hysteresis + hold state machine with smoothed gain
//! - [`CompressorStage`] - Hard/soft-knee gain computer with smoothed gain
//! - [`DynamicsEngine`] - Multichannel driver with channel-max linking
//!
//! ## Parameters
//!
//! - [`DynamicsParams`] - Sixteen user parameters plus their derived forms
//! - [`ParameterInfo`] - Index-based introspection used by presets and CLIs
//! - [`SmoothedParam`] - Zipper-free output gains
//!
//! ## Utilities
//!
//! - Level conversions: [`db_to_linear`], [`linear_to_db`], [`level_db`]
//! - Coefficients: [`smoothing_coefficient`], [`ms_to_samples`], [`one_pole_step`]
//!
//! # no_std Support
//!
//! The crate is `no_std` compatible (it needs `alloc` for the per-channel
//! follower list). Disable the default `std` feature:
//!
//! ```toml
//! [dependencies]
//! tandem-core = { version = "0.1", default-features = false }
//! ```
//!
//! # Example
//!
//! ```rust
//! use tandem_core::DynamicsEngine;
//!
//! let mut engine = DynamicsEngine::new(48000.0, 2);
//! engine.params_mut().set_gate_threshold_db(-60.0);
//! engine.params_mut().set_compressor_ratio(8.0);
//!
//! let mut left = vec![0.0f32; 512];
//! let mut right = vec![0.0f32; 512];
//! engine.process_block(&mut [&mut left[..], &mut right[..]]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod coeff;
pub mod compressor;
pub mod engine;
pub mod envelope;
pub mod gate;
pub mod math;
pub mod one_pole;
pub mod param;
pub mod param_info;
pub mod params;

// Re-export main types at crate root
pub use coeff::{SmoothingCoefficients, ms_to_samples, one_pole_step, smoothing_coefficient};
pub use compressor::{
    CompressorConfig, CompressorSettings, CompressorStage, gain_reduction_db,
    hard_knee_reduction_db,
};
pub use engine::{DEFAULT_MAX_BLOCK_SIZE, DynamicsEngine};
pub use envelope::{DETECTOR_ATTACK_MS, DETECTOR_RELEASE_MS, EnvelopeFollower};
pub use gate::{GateConfig, GateSettings, GateStage};
pub use math::{SILENCE_FLOOR_DB, db_to_linear, flush_denormal, level_db, linear_to_db};
pub use one_pole::OnePole;
pub use param::{STANDARD_SMOOTHING_MS, SmoothedParam};
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};
pub use params::{DynamicsParams, PARAM_COUNT, ParamIndex};
