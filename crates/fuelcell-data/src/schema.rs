//! Serde data file structs for fuel cell definitions.
//!
//! These structs define the on-disk format for a fuel cell's modes and
//! default settings. They are deserialized from RON, JSON, or TOML data
//! files and then resolved into core types by the loader.

use serde::Deserialize;

// ===========================================================================
// Modes
// ===========================================================================

/// One input or output rate, supporting a short tuple form and a full form.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FlowData {
    /// Short form: `("Hydrogen", 2.0)`.
    Short(String, f64),
    /// Full form with named fields.
    Full {
        #[serde(alias = "name")]
        resource: String,
        rate: f64,
    },
}

impl FlowData {
    pub fn resource(&self) -> &str {
        match self {
            FlowData::Short(name, _) => name,
            FlowData::Full { resource, .. } => resource,
        }
    }

    pub fn rate(&self) -> f64 {
        match self {
            FlowData::Short(_, rate) => *rate,
            FlowData::Full { rate, .. } => *rate,
        }
    }
}

/// An operating mode definition in a data file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ModeData {
    #[serde(alias = "max_ec")]
    pub max_charge_rate: f64,
    #[serde(default, alias = "fuels")]
    pub inputs: Vec<FlowData>,
    #[serde(default, alias = "byproducts")]
    pub outputs: Vec<FlowData>,
}

// ===========================================================================
// Settings and options
// ===========================================================================

/// Per-device defaults for the user controls. Missing fields keep the
/// engine defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SettingsData {
    #[serde(default)]
    pub throttle: Option<f64>,
    #[serde(default)]
    pub threshold: Option<f64>,
    #[serde(default)]
    pub enabled: Option<bool>,
}

/// Game-wide behaviour switches.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OptionsData {
    #[serde(default)]
    pub needs_charge_to_start: bool,
    #[serde(default, alias = "auto_switch_on_starvation")]
    pub auto_switch: bool,
}

// ===========================================================================
// Top level
// ===========================================================================

/// A complete fuel cell definition.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FuelCellData {
    pub modes: Vec<ModeData>,
    #[serde(default)]
    pub settings: SettingsData,
    #[serde(default)]
    pub options: OptionsData,
}

impl FuelCellData {
    /// Every resource name referenced by any mode, in first-seen order.
    pub fn resource_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for mode in &self.modes {
            for flow in mode.inputs.iter().chain(&mode.outputs) {
                if !names.contains(&flow.resource()) {
                    names.push(flow.resource());
                }
            }
        }
        names
    }
}
