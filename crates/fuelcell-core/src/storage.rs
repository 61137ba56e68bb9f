//! A minimal container model for hosts that do not bring their own.
//!
//! A [`TankSet`] holds any number of tanks, several of which may carry the
//! same resource. Availability is summed across them, and a [`TickResult`]
//! is applied by filling or draining tanks in order.

use crate::engine::TickResult;
use crate::id::ResourceId;
use crate::resource::{ResourceAvailability, ResourceSnapshot};
use serde::{Deserialize, Serialize};

/// One container of a single resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageTank {
    pub resource: ResourceId,
    pub amount: f64,
    pub capacity: f64,
}

impl StorageTank {
    pub fn new(resource: ResourceId, amount: f64, capacity: f64) -> Self {
        Self {
            resource,
            amount,
            capacity,
        }
    }

    pub fn empty(resource: ResourceId, capacity: f64) -> Self {
        Self::new(resource, 0.0, capacity)
    }

    pub fn availability(&self) -> ResourceAvailability {
        ResourceAvailability::new(self.amount, self.capacity)
    }

    pub fn headroom(&self) -> f64 {
        (self.capacity - self.amount).max(0.0)
    }

    /// Add up to `quantity`. Returns the amount that didn't fit.
    #[must_use = "overflow indicates the amount that did not fit"]
    pub fn fill(&mut self, quantity: f64) -> f64 {
        let to_add = quantity.min(self.headroom()).max(0.0);
        self.amount += to_add;
        quantity - to_add
    }

    /// Remove up to `quantity`. Returns the amount actually removed.
    #[must_use = "returns the amount actually removed, which may be less than requested"]
    pub fn drain(&mut self, quantity: f64) -> f64 {
        let to_remove = quantity.min(self.amount).max(0.0);
        self.amount -= to_remove;
        to_remove
    }
}

/// An ordered collection of tanks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TankSet {
    tanks: Vec<StorageTank>,
}

impl TankSet {
    pub fn new(tanks: Vec<StorageTank>) -> Self {
        Self { tanks }
    }

    pub fn push(&mut self, tank: StorageTank) {
        self.tanks.push(tank);
    }

    pub fn tanks(&self) -> &[StorageTank] {
        &self.tanks
    }

    pub fn tanks_mut(&mut self) -> &mut [StorageTank] {
        &mut self.tanks
    }

    /// Combined availability of `resource` over every tank holding it.
    pub fn availability(&self, resource: ResourceId) -> ResourceAvailability {
        self.tanks
            .iter()
            .filter(|t| t.resource == resource)
            .map(StorageTank::availability)
            .sum()
    }

    pub fn amount(&self, resource: ResourceId) -> f64 {
        self.availability(resource).amount
    }

    /// Freeze the current totals for one tick.
    pub fn snapshot(&self) -> ResourceSnapshot {
        self.tanks
            .iter()
            .map(|t| (t.resource, t.availability()))
            .collect()
    }

    /// Spread `quantity` over matching tanks in order. Returns what didn't fit.
    pub fn add(&mut self, resource: ResourceId, quantity: f64) -> f64 {
        let mut remaining = quantity;
        for tank in self.tanks.iter_mut().filter(|t| t.resource == resource) {
            if remaining <= 0.0 {
                break;
            }
            remaining = tank.fill(remaining);
        }
        remaining
    }

    /// Drain `quantity` from matching tanks in order. Returns what was removed.
    pub fn remove(&mut self, resource: ResourceId, quantity: f64) -> f64 {
        let mut removed = 0.0;
        for tank in self.tanks.iter_mut().filter(|t| t.resource == resource) {
            if removed >= quantity {
                break;
            }
            removed += tank.drain(quantity - removed);
        }
        removed
    }

    /// Apply a tick's deltas. Returns the total amount of charge and
    /// byproducts that had nowhere to go.
    pub fn apply(&mut self, result: &TickResult, charge: ResourceId) -> f64 {
        let mut vented = self.add(charge, result.charge_delta);
        for &(resource, amount) in &result.consumed {
            self.remove(resource, amount);
        }
        for &(resource, amount) in &result.produced {
            vented += self.add(resource, amount);
        }
        vented
    }
}
