//! Versioned binary snapshots of a fuel cell's persistent fields.
//!
//! Only what the user can change is saved: the active mode index, the
//! throttle and threshold, the enabled flag, and the cumulative rescale
//! factor. Modes come from configuration and are never part of a snapshot.

use crate::device::FuelCell;
use crate::params::EngineParameters;
use crate::rescale::RescaleError;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Magic number identifying a fuel cell snapshot.
pub const SNAPSHOT_MAGIC: u32 = 0x0DFC_0001;

/// Current format version. Increment when breaking the wire format.
pub const FORMAT_VERSION: u32 = 1;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("bitcode encoding failed: {0}")]
    Encode(String),
    #[error("bitcode decoding failed: {0}")]
    Decode(String),
    #[error("invalid magic number: expected 0x{:08X}, got 0x{:08X}", SNAPSHOT_MAGIC, .0)]
    InvalidMagic(u32),
    #[error("unsupported format version: expected {}, got {}", FORMAT_VERSION, .0)]
    UnsupportedVersion(u32),
    #[error("snapshot from future version {0} (this build supports up to {FORMAT_VERSION})")]
    FutureVersion(u32),
    #[error("invalid {field} in snapshot: {value}")]
    InvalidField { field: &'static str, value: f64 },
    #[error("snapshot scale could not be applied: {0}")]
    Rescale(#[from] RescaleError),
}

// ---------------------------------------------------------------------------
// Snapshot layout
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub magic: u32,
    pub version: u32,
}

impl SnapshotHeader {
    pub fn new() -> Self {
        Self {
            magic: SNAPSHOT_MAGIC,
            version: FORMAT_VERSION,
        }
    }

    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.magic != SNAPSHOT_MAGIC {
            return Err(SnapshotError::InvalidMagic(self.magic));
        }
        if self.version > FORMAT_VERSION {
            return Err(SnapshotError::FutureVersion(self.version));
        }
        if self.version < FORMAT_VERSION {
            return Err(SnapshotError::UnsupportedVersion(self.version));
        }
        Ok(())
    }
}

impl Default for SnapshotHeader {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct FuelCellSnapshot {
    header: SnapshotHeader,
    mode_index: u32,
    throttle: f64,
    threshold: f64,
    enabled: bool,
    scale: f64,
}

// ---------------------------------------------------------------------------
// FuelCell methods
// ---------------------------------------------------------------------------

impl FuelCell {
    /// Serialize the persistent fields to a binary blob via bitcode.
    pub fn snapshot(&self) -> Result<Vec<u8>, SnapshotError> {
        let snapshot = FuelCellSnapshot {
            header: SnapshotHeader::new(),
            mode_index: u32::try_from(self.mode_index()).unwrap_or(u32::MAX),
            throttle: self.params.throttle,
            threshold: self.params.threshold,
            enabled: self.params.enabled,
            scale: self.scale(),
        };
        bitcode::serialize(&snapshot).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Apply a snapshot taken by [`snapshot`](Self::snapshot).
    ///
    /// The game-wide options in [`EngineParameters`] are kept as
    /// configured. A mode index beyond the current set falls back to 0.
    /// The modes are rescaled by the saved scale relative to the current
    /// one, so afterwards [`scale`](Self::scale) describes the rates.
    /// Throttle and threshold are clamped into their step range.
    ///
    /// Nothing changes if any field is rejected.
    pub fn restore(&mut self, data: &[u8]) -> Result<(), SnapshotError> {
        let snapshot: FuelCellSnapshot =
            bitcode::deserialize(data).map_err(|e| SnapshotError::Decode(e.to_string()))?;
        snapshot.header.validate()?;
        snapshot.validate_fields()?;

        let mut params = EngineParameters {
            enabled: snapshot.enabled,
            ..self.params.clone()
        };
        params.set_throttle(snapshot.throttle);
        params.set_threshold(snapshot.threshold);

        self.restore_scale(snapshot.scale)?;
        self.restore_fields(snapshot.mode_index as usize, params);
        Ok(())
    }
}

impl FuelCellSnapshot {
    fn validate_fields(&self) -> Result<(), SnapshotError> {
        if !self.scale.is_finite() || self.scale <= 0.0 {
            return Err(SnapshotError::InvalidField {
                field: "scale",
                value: self.scale,
            });
        }
        for (field, value) in [("throttle", self.throttle), ("threshold", self.threshold)] {
            if !value.is_finite() {
                return Err(SnapshotError::InvalidField { field, value });
            }
        }
        Ok(())
    }
}
