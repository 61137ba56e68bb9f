//! Resolution pipeline: reads a fuel cell data file, resolves resource names
//! against a registry, and builds a validated [`ModeSet`] plus parameters.
//!
//! Provides format detection (RON/JSON/TOML) and deserialization helpers
//! shared by the path- and string-based entry points.

use crate::schema::{FlowData, FuelCellData, ModeData, OptionsData, SettingsData};
use fuelcell_core::mode::{ConfigError, ModeSet, OperatingMode, ResourceFlow};
use fuelcell_core::params::EngineParameters;
use fuelcell_core::registry::{RegistryBuilder, ResourceRegistry};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use tracing::debug;

// ===========================================================================
// Errors
// ===========================================================================

/// Errors that can occur during data loading.
#[derive(Debug, thiserror::Error)]
pub enum DataLoadError {
    /// The file has an extension we don't support.
    #[error("unsupported format for file: {file}")]
    UnsupportedFormat { file: PathBuf },

    /// A deserialization error occurred.
    #[error("parse error in {file}: {detail}")]
    Parse { file: PathBuf, detail: String },

    /// A resource name could not be resolved against the registry.
    #[error("unresolved resource '{name}' in mode {mode} of {file}")]
    UnresolvedRef {
        file: PathBuf,
        name: String,
        mode: usize,
    },

    /// The modes parsed but failed validation.
    #[error("invalid modes in {file}: {source}")]
    InvalidModes {
        file: PathBuf,
        #[source]
        source: ConfigError,
    },

    /// An I/O error occurred.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

// ===========================================================================
// Format detection
// ===========================================================================

/// Supported data file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Ron,
    Toml,
    Json,
}

/// Detect the format of a file based on its extension.
pub fn detect_format(path: &Path) -> Result<Format, DataLoadError> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => Ok(Format::Ron),
        Some("toml") => Ok(Format::Toml),
        Some("json") => Ok(Format::Json),
        _ => Err(DataLoadError::UnsupportedFormat {
            file: path.to_path_buf(),
        }),
    }
}

// ===========================================================================
// Deserialization
// ===========================================================================

/// Deserialize `content` in the given format. `file` is only used in errors.
pub fn deserialize_str<T: DeserializeOwned>(
    content: &str,
    format: Format,
    file: &Path,
) -> Result<T, DataLoadError> {
    let parse_err = |detail: String| DataLoadError::Parse {
        file: file.to_path_buf(),
        detail,
    };
    match format {
        Format::Ron => ron::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Json => serde_json::from_str(content).map_err(|e| parse_err(e.to_string())),
        Format::Toml => toml::from_str(content).map_err(|e| parse_err(e.to_string())),
    }
}

/// Read a file and deserialize it according to its format (detected from extension).
pub fn deserialize_file<T: DeserializeOwned>(path: &Path) -> Result<T, DataLoadError> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    deserialize_str(&content, format, path)
}

// ===========================================================================
// Resolution
// ===========================================================================

/// A fuel cell definition resolved into core types.
#[derive(Debug, Clone)]
pub struct LoadedFuelCell {
    pub modes: ModeSet,
    pub params: EngineParameters,
}

/// Register every resource `data` references, so a later
/// [`resolve_fuel_cell`] cannot fail on an unknown name.
pub fn register_resources(data: &FuelCellData, builder: &mut RegistryBuilder) {
    for name in data.resource_names() {
        builder.register_resource(name);
    }
}

fn resolve_flows(
    flows: &[FlowData],
    registry: &ResourceRegistry,
    mode: usize,
    file: &Path,
) -> Result<Vec<ResourceFlow>, DataLoadError> {
    flows
        .iter()
        .map(|flow| -> Result<ResourceFlow, DataLoadError> {
            let id = registry
                .resolve(flow.resource())
                .map_err(|_| DataLoadError::UnresolvedRef {
                    file: file.to_path_buf(),
                    name: flow.resource().to_string(),
                    mode,
                })?;
            Ok(ResourceFlow::new(id, flow.rate()))
        })
        .collect()
}

fn resolve_mode(
    data: &ModeData,
    registry: &ResourceRegistry,
    index: usize,
    file: &Path,
) -> Result<OperatingMode, DataLoadError> {
    let inputs = resolve_flows(&data.inputs, registry, index, file)?;
    let outputs = resolve_flows(&data.outputs, registry, index, file)?;
    debug!(
        mode = index,
        max_charge_rate = data.max_charge_rate,
        inputs = inputs.len(),
        outputs = outputs.len(),
        "loaded fuel cell mode"
    );
    Ok(OperatingMode::new(data.max_charge_rate, inputs, outputs))
}

fn build_params(settings: &SettingsData, options: &OptionsData) -> EngineParameters {
    let mut params = EngineParameters {
        needs_charge_to_start: options.needs_charge_to_start,
        auto_switch_on_starvation: options.auto_switch,
        ..EngineParameters::default()
    };
    if let Some(throttle) = settings.throttle {
        params.set_throttle(throttle);
    }
    if let Some(threshold) = settings.threshold {
        params.set_threshold(threshold);
    }
    if let Some(enabled) = settings.enabled {
        params.enabled = enabled;
    }
    params
}

/// Resolve parsed data into a validated mode set and parameters.
pub fn resolve_fuel_cell(
    data: &FuelCellData,
    registry: &ResourceRegistry,
    file: &Path,
) -> Result<LoadedFuelCell, DataLoadError> {
    let modes = data
        .modes
        .iter()
        .enumerate()
        .map(|(index, mode)| resolve_mode(mode, registry, index, file))
        .collect::<Result<Vec<_>, _>>()?;
    let modes = ModeSet::new(modes).map_err(|source| DataLoadError::InvalidModes {
        file: file.to_path_buf(),
        source,
    })?;
    let params = build_params(&data.settings, &data.options);

    debug!(
        file = %file.display(),
        modes = modes.len(),
        throttle = params.throttle,
        threshold = params.threshold,
        "loaded fuel cell configuration"
    );
    Ok(LoadedFuelCell { modes, params })
}

/// Load a fuel cell definition from a RON, TOML, or JSON file.
pub fn load_fuel_cell(
    path: &Path,
    registry: &ResourceRegistry,
) -> Result<LoadedFuelCell, DataLoadError> {
    let data: FuelCellData = deserialize_file(path)?;
    resolve_fuel_cell(&data, registry, path)
}

/// Load a fuel cell definition from an in-memory string.
pub fn load_fuel_cell_str(
    content: &str,
    format: Format,
    registry: &ResourceRegistry,
) -> Result<LoadedFuelCell, DataLoadError> {
    let file = Path::new("<inline>");
    let data: FuelCellData = deserialize_str(content, format, file)?;
    resolve_fuel_cell(&data, registry, file)
}

// ===========================================================================
// Tests
// ===========================================================================
