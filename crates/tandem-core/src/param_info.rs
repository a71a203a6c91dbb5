//! Parameter introspection for the dynamics engine.
//!
//! The [`ParameterInfo`] trait gives index-based access to a processor's
//! parameters together with a [`ParamDescriptor`] per index: display names,
//! range, default, unit, control taper and stable identifiers. Preset
//! files and the command line address parameters by their `string_id`; hosts
//! and controllers use the index or the numeric [`ParamId`].
//!
//! # Example
//!
//! ```rust
//! use tandem_core::{ParameterInfo, ParamDescriptor, ParamId};
//!
//! struct Trim {
//!     gain_db: f32,
//! }
//!
//! impl ParameterInfo for Trim {
//!     fn param_count(&self) -> usize { 1 }
//!
//!     fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
//!         match index {
//!             0 => Some(ParamDescriptor::gain_db("Trim", "Trim", -24.0, 24.0, 0.0)
//!                 .with_id(ParamId(1), "trim")),
//!             _ => None,
//!         }
//!     }
//!
//!     fn get_param(&self, index: usize) -> f32 {
//!         match index {
//!             0 => self.gain_db,
//!             _ => 0.0,
//!         }
//!     }
//!
//!     fn set_param(&mut self, index: usize, value: f32) {
//!         if let Some(desc) = self.param_info(index) {
//!             self.gain_db = desc.clamp(value);
//!         }
//!     }
//! }
//!
//! let mut trim = Trim { gain_db: 0.0 };
//! trim.set_param(0, 40.0);
//! assert_eq!(trim.get_param(0), 24.0);
//! assert_eq!(trim.find_param_by_string_id("trim"), Some(0));
//! ```

/// Control taper of a parameter's range, shown next to the range in
/// parameter listings.
///
/// - **Linear**: a control position `p` in `[0, 1]` maps to `min + p * (max - min)`
/// - **Power(exp)**: `p` maps to `min + p.powf(exp) * (max - min)`
///
/// `Power` with `exp > 1` gives more resolution near `min` (long release
/// times); `exp < 1` gives more near `max` (output gains close to 0 dB).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ParamScale {
    /// Equal resolution across the range.
    #[default]
    Linear,
    /// Power curve with the given exponent.
    Power(f32),
}

/// Stable numeric parameter identifier.
///
/// Once assigned, a `ParamId` never changes for a given parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParamId(pub u32);

/// Parameter capability flags.
///
/// # Example
///
/// ```rust
/// use tandem_core::ParamFlags;
///
/// let flags = ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED);
/// assert!(flags.contains(ParamFlags::STEPPED));
/// assert!(!ParamFlags::NONE.contains(ParamFlags::AUTOMATABLE));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParamFlags(u8);

impl ParamFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);
    /// Can be automated.
    pub const AUTOMATABLE: Self = Self(1 << 0);
    /// Discrete steps (on/off switches).
    pub const STEPPED: Self = Self(1 << 1);

    /// Returns `true` if all bits in `other` are set in `self`.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns the union of two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl Default for ParamFlags {
    fn default() -> Self {
        Self::AUTOMATABLE
    }
}

/// Index-based parameter access.
///
/// Valid indices are `0..param_count()` and stay stable for the lifetime of
/// the implementor. Out-of-range reads return `0.0` and out-of-range writes
/// are ignored.
pub trait ParameterInfo {
    /// Number of parameters.
    fn param_count(&self) -> usize;

    /// Descriptor for `index`, or `None` if out of range.
    fn param_info(&self, index: usize) -> Option<ParamDescriptor>;

    /// Current value of the parameter at `index`.
    fn get_param(&self, index: usize) -> f32;

    /// Set the parameter at `index`. Implementations clamp to the
    /// descriptor's range.
    fn set_param(&mut self, index: usize, value: f32);

    /// Find a parameter index by its exact `string_id`.
    fn find_param_by_string_id(&self, string_id: &str) -> Option<usize> {
        (0..self.param_count()).find(|&i| self.param_info(i).is_some_and(|d| d.string_id == string_id))
    }
}

/// Metadata for a single parameter.
///
/// `short_name` should stay within 8 characters for small displays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamDescriptor {
    /// Full display name (e.g. "Gate Threshold").
    pub name: &'static str,
    /// Short display name (e.g. "Thresh").
    pub short_name: &'static str,
    /// Unit for formatting.
    pub unit: ParamUnit,
    /// Minimum value.
    pub min: f32,
    /// Maximum value.
    pub max: f32,
    /// Default value.
    pub default: f32,
    /// Recommended increment for stepped control.
    pub step: f32,
    /// Stable numeric ID. `ParamId(0)` means unassigned.
    pub id: ParamId,
    /// Stable string ID used by presets and the command line.
    pub string_id: &'static str,
    /// Control taper.
    pub scale: ParamScale,
    /// Capability flags.
    pub flags: ParamFlags,
    /// Group name (`"gate"`, `"compressor"`); empty for top level.
    pub group: &'static str,
}

impl ParamDescriptor {
    /// Gain or level parameter in decibels.
    pub fn gain_db(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::Decibels,
            min,
            max,
            default,
            step: 0.1,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE,
            group: "",
        }
    }

    /// Time parameter in milliseconds.
    pub fn time_ms(
        name: &'static str,
        short_name: &'static str,
        min: f32,
        max: f32,
        default: f32,
    ) -> Self {
        Self {
            unit: ParamUnit::Milliseconds,
            ..Self::gain_db(name, short_name, min, max, default)
        }
    }

    /// Compression ratio (n:1).
    pub fn ratio(min: f32, max: f32, default: f32) -> Self {
        Self {
            unit: ParamUnit::Ratio,
            ..Self::gain_db("Ratio", "Ratio", min, max, default)
        }
    }

    /// On/off switch (0 or 1).
    pub fn toggle(name: &'static str, short_name: &'static str, default_on: bool) -> Self {
        Self {
            name,
            short_name,
            unit: ParamUnit::None,
            min: 0.0,
            max: 1.0,
            default: if default_on { 1.0 } else { 0.0 },
            step: 1.0,
            id: ParamId(0),
            string_id: "",
            scale: ParamScale::Linear,
            flags: ParamFlags::AUTOMATABLE.union(ParamFlags::STEPPED),
            group: "",
        }
    }

    /// Set the stable numeric and string IDs.
    ///
    /// ```rust
    /// use tandem_core::{ParamDescriptor, ParamId};
    ///
    /// let desc = ParamDescriptor::ratio(1.0, 20.0, 4.0).with_id(ParamId(11), "compressor_ratio");
    /// assert_eq!(desc.id, ParamId(11));
    /// assert_eq!(desc.string_id, "compressor_ratio");
    /// ```
    pub const fn with_id(mut self, id: ParamId, string_id: &'static str) -> Self {
        self.id = id;
        self.string_id = string_id;
        self
    }

    /// Set the control taper.
    pub const fn with_scale(mut self, scale: ParamScale) -> Self {
        self.scale = scale;
        self
    }

    /// Set the group.
    pub const fn with_group(mut self, group: &'static str) -> Self {
        self.group = group;
        self
    }

    /// Clamp a value to `[min, max]`.
    ///
    /// NaN clamps to `min`.
    ///
    /// ```rust
    /// use tandem_core::ParamDescriptor;
    ///
    /// let desc = ParamDescriptor::gain_db("Threshold", "Thresh", -50.0, 0.0, -18.0);
    /// assert_eq!(desc.clamp(-80.0), -50.0);
    /// assert_eq!(desc.clamp(3.0), 0.0);
    /// assert_eq!(desc.clamp(-12.0), -12.0);
    /// ```
    #[inline]
    pub fn clamp(&self, value: f32) -> f32 {
        if value > self.max {
            self.max
        } else if value >= self.min {
            value
        } else {
            self.min
        }
    }

    /// Whether `value` lies within `[min, max]`.
    #[inline]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Unit for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamUnit {
    /// Decibels.
    Decibels,
    /// Milliseconds.
    Milliseconds,
    /// Ratio (n:1).
    Ratio,
    /// Dimensionless (switches).
    None,
}

impl ParamUnit {
    /// Suffix string for display.
    ///
    /// ```rust
    /// use tandem_core::ParamUnit;
    ///
    /// assert_eq!(ParamUnit::Decibels.suffix(), " dB");
    /// assert_eq!(ParamUnit::Ratio.suffix(), ":1");
    /// ```
    pub const fn suffix(&self) -> &'static str {
        match self {
            ParamUnit::Decibels => " dB",
            ParamUnit::Milliseconds => " ms",
            ParamUnit::Ratio => ":1",
            ParamUnit::None => "",
        }
    }
}
