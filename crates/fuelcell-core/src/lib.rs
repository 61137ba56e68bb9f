//! Fuel Cell Core -- the allocation engine for an on-demand fuel cell.
//!
//! A fuel cell burns one of several selectable fuel mixes to refill an
//! electric charge buffer, producing only while the buffer sits below a
//! user-set threshold.
//!
//! # Tick
//!
//! Each call to [`engine::tick`] (or [`device::FuelCell::tick`]) decides,
//! for one fixed timestep:
//!
//! 1. **Gate** -- disabled, stalled on an empty buffer, or no demand.
//! 2. **Bound** -- the sustained duration is the minimum over the charge
//!    headroom and every fuel's remaining supply.
//! 3. **Commit** -- charge, consumption, and byproducts scaled by that
//!    duration, or `FuelDeprived` if it is zero.
//!
//! The engine never touches storage. The host applies the returned
//! [`engine::TickResult`] to its own containers, or to a
//! [`storage::TankSet`].
//!
//! # Key Types
//!
//! - [`mode::ModeSet`] -- Validated, non-empty list of operating modes.
//! - [`params::EngineParameters`] -- Throttle, threshold, and switches.
//! - [`device::FuelCell`] -- Stateful wrapper with mode selection and rescale.
//! - [`status::DisplayRecord`] -- Read-only view for host UIs.
//! - [`registry::ResourceRegistry`] -- Name to [`id::ResourceId`] lookup.
//! - [`snapshot`] -- Versioned save and restore via bitcode.

pub mod device;
pub mod engine;
pub mod id;
pub mod mode;
pub mod params;
pub mod registry;
pub mod rescale;
pub mod resource;
pub mod snapshot;
pub mod status;
pub mod storage;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
