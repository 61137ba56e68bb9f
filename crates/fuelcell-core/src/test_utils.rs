//! Shared test helpers for unit tests, integration tests, and benchmarks.
//!
//! Gated behind `#[cfg(any(test, feature = "test-utils"))]`. The resource
//! ids below match the order [`test_registry`] registers names in.

use crate::id::ResourceId;
use crate::mode::{ModeSet, OperatingMode, ResourceFlow};
use crate::registry::{RegistryBuilder, ResourceRegistry};
use crate::storage::{StorageTank, TankSet};

// ===========================================================================
// Resource ids
// ===========================================================================

pub fn charge() -> ResourceId {
    ResourceId(0)
}
pub fn hydrogen() -> ResourceId {
    ResourceId(1)
}
pub fn oxygen() -> ResourceId {
    ResourceId(2)
}
pub fn water() -> ResourceId {
    ResourceId(3)
}
pub fn methane() -> ResourceId {
    ResourceId(4)
}

/// Registry with ElectricCharge, Hydrogen, Oxygen, Water, Methane.
pub fn test_registry() -> ResourceRegistry {
    let mut builder = RegistryBuilder::new();
    builder.register_resource("Hydrogen");
    builder.register_resource("Oxygen");
    builder.register_resource("Water");
    builder.register_resource("Methane");
    builder.build()
}

// ===========================================================================
// Modes
// ===========================================================================

/// Hydrogen-only mode without byproducts.
pub fn hydrogen_mode(max_charge_rate: f64, hydrogen_rate: f64) -> OperatingMode {
    OperatingMode::new(
        max_charge_rate,
        vec![ResourceFlow::new(hydrogen(), hydrogen_rate)],
        vec![],
    )
}

/// 10 EC/s from 2 H2 + 1 O2, venting 0.5 water.
pub fn hydrolox_mode() -> OperatingMode {
    OperatingMode::new(
        10.0,
        vec![
            ResourceFlow::new(hydrogen(), 2.0),
            ResourceFlow::new(oxygen(), 1.0),
        ],
        vec![ResourceFlow::new(water(), 0.5)],
    )
}

/// 8 EC/s from 1 methane.
pub fn methane_mode() -> OperatingMode {
    OperatingMode::new(8.0, vec![ResourceFlow::new(methane(), 1.0)], vec![])
}

/// Hydrogen, hydrolox, methane.
pub fn three_mode_set() -> ModeSet {
    ModeSet::new(vec![hydrogen_mode(10.0, 2.0), hydrolox_mode(), methane_mode()])
        .expect("test modes are valid")
}

// ===========================================================================
// Tanks
// ===========================================================================

/// Empty 100 EC battery, 50/100 of each fuel, empty 10-unit water tank.
pub fn standard_tanks() -> TankSet {
    TankSet::new(vec![
        StorageTank::empty(charge(), 100.0),
        StorageTank::new(hydrogen(), 50.0, 100.0),
        StorageTank::new(oxygen(), 50.0, 100.0),
        StorageTank::new(methane(), 50.0, 100.0),
        StorageTank::empty(water(), 10.0),
    ])
}
