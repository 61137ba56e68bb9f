//! Operating modes and the ordered set a fuel cell selects them from.
//!
//! A [`ModeSet`] is validated once at construction and never empty. Only
//! [`crate::rescale`] mutates the rates inside it afterwards.

use crate::id::ResourceId;
use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors raised while building a [`ModeSet`]. Fatal to device initialization.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("mode set must contain at least one mode")]
    EmptyModeSet,
    #[error("mode {mode}: invalid rate {rate} for resource {resource:?}")]
    InvalidRate {
        mode: usize,
        resource: ResourceId,
        rate: f64,
    },
    #[error("mode {mode}: invalid max charge rate {rate}")]
    InvalidMaxChargeRate { mode: usize, rate: f64 },
    #[error("mode {mode}: produces charge but has no inputs")]
    UnfueledMode { mode: usize },
}

/// Errors raised by explicit mode selection. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ModeError {
    #[error("mode index {index} out of range (mode count {len})")]
    IndexOutOfRange { index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// Resource flows
// ---------------------------------------------------------------------------

/// A single input or output rate, in units per second.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceFlow {
    resource: ResourceId,
    rate: f64,
}

impl ResourceFlow {
    pub fn new(resource: ResourceId, rate: f64) -> Self {
        Self { resource, rate }
    }

    pub fn resource(&self) -> ResourceId {
        self.resource
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        self.rate *= factor;
    }
}

// ---------------------------------------------------------------------------
// Operating mode
// ---------------------------------------------------------------------------

/// One selectable production profile: fuels in, byproducts out, and the
/// charge produced per second at full throttle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OperatingMode {
    max_charge_rate: f64,
    inputs: Vec<ResourceFlow>,
    #[serde(default)]
    outputs: Vec<ResourceFlow>,
}

impl OperatingMode {
    pub fn new(max_charge_rate: f64, inputs: Vec<ResourceFlow>, outputs: Vec<ResourceFlow>) -> Self {
        Self {
            max_charge_rate,
            inputs,
            outputs,
        }
    }

    pub fn max_charge_rate(&self) -> f64 {
        self.max_charge_rate
    }

    pub fn inputs(&self) -> &[ResourceFlow] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[ResourceFlow] {
        &self.outputs
    }

    pub fn has_byproducts(&self) -> bool {
        !self.outputs.is_empty()
    }

    /// Check the mode's rates. `index` is only used for error reporting.
    pub fn validate(&self, index: usize) -> Result<(), ConfigError> {
        if !is_valid_rate(self.max_charge_rate) {
            return Err(ConfigError::InvalidMaxChargeRate {
                mode: index,
                rate: self.max_charge_rate,
            });
        }
        for flow in self.inputs.iter().chain(self.outputs.iter()) {
            if !is_valid_rate(flow.rate) {
                return Err(ConfigError::InvalidRate {
                    mode: index,
                    resource: flow.resource,
                    rate: flow.rate,
                });
            }
        }
        if self.inputs.is_empty() && self.max_charge_rate > 0.0 {
            return Err(ConfigError::UnfueledMode { mode: index });
        }
        Ok(())
    }

    pub(crate) fn scale(&mut self, factor: f64) {
        self.max_charge_rate *= factor;
        for flow in self.inputs.iter_mut().chain(self.outputs.iter_mut()) {
            flow.scale(factor);
        }
    }
}

fn is_valid_rate(rate: f64) -> bool {
    rate.is_finite() && rate >= 0.0
}

// ---------------------------------------------------------------------------
// Mode set
// ---------------------------------------------------------------------------

/// Ordered, non-empty list of modes. The active mode is an index held by
/// the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<OperatingMode>", into = "Vec<OperatingMode>")]
pub struct ModeSet {
    modes: Vec<OperatingMode>,
}

impl ModeSet {
    /// Validate and wrap a list of modes.
    pub fn new(modes: Vec<OperatingMode>) -> Result<Self, ConfigError> {
        if modes.is_empty() {
            return Err(ConfigError::EmptyModeSet);
        }
        for (index, mode) in modes.iter().enumerate() {
            mode.validate(index)?;
        }
        Ok(Self { modes })
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    /// Always false for a set built through [`ModeSet::new`].
    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&OperatingMode> {
        self.modes.get(index)
    }

    pub fn modes(&self) -> &[OperatingMode] {
        &self.modes
    }

    /// True if any mode emits at least one byproduct.
    pub fn has_byproducts(&self) -> bool {
        self.modes.iter().any(OperatingMode::has_byproducts)
    }

    pub(crate) fn modes_mut(&mut self) -> &mut [OperatingMode] {
        &mut self.modes
    }
}

impl TryFrom<Vec<OperatingMode>> for ModeSet {
    type Error = ConfigError;

    fn try_from(modes: Vec<OperatingMode>) -> Result<Self, Self::Error> {
        Self::new(modes)
    }
}

impl From<ModeSet> for Vec<OperatingMode> {
    fn from(set: ModeSet) -> Self {
        set.modes
    }
}

// ---------------------------------------------------------------------------
// Mode selection
// ---------------------------------------------------------------------------

/// Direction for cycling through modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeDirection {
    Next,
    Previous,
}

/// Step the active index one mode forward or back, wrapping at both ends.
///
/// An out-of-range `current` is clamped to the last mode first. An empty
/// set returns `0`.
pub fn advance(set: &ModeSet, current: usize, direction: ModeDirection) -> usize {
    let len = set.len();
    if len == 0 {
        warn!("advance called on an empty mode set, falling back to index 0");
        return 0;
    }
    let current = current.min(len - 1);
    match direction {
        ModeDirection::Next => (current + 1) % len,
        ModeDirection::Previous => (current + len - 1) % len,
    }
}

/// Check an explicitly requested index against the set.
pub fn set_index(set: &ModeSet, index: usize) -> Result<usize, ModeError> {
    if index < set.len() {
        Ok(index)
    } else {
        Err(ModeError::IndexOutOfRange {
            index,
            len: set.len(),
        })
    }
}
