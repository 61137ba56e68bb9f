//! Per-tick resource availability queries.

use crate::id::ResourceId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::iter::Sum;

/// How much of a resource is reachable right now, and how much room there is.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceAvailability {
    pub amount: f64,
    pub capacity: f64,
}

impl ResourceAvailability {
    pub fn new(amount: f64, capacity: f64) -> Self {
        Self { amount, capacity }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Merge two containers' totals.
    pub fn combine(self, other: Self) -> Self {
        Self {
            amount: self.amount + other.amount,
            capacity: self.capacity + other.capacity,
        }
    }

    /// Negative and non-finite values read as zero.
    pub fn sanitized(self) -> Self {
        Self {
            amount: non_negative(self.amount),
            capacity: non_negative(self.capacity),
        }
    }
}

impl Sum for ResourceAvailability {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::empty(), Self::combine)
    }
}

pub(crate) fn non_negative(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 { value } else { 0.0 }
}

/// A frozen per-resource view of availability for one tick.
///
/// Resources missing from the snapshot read as empty.
#[derive(Debug, Clone, Default)]
pub struct ResourceSnapshot {
    totals: HashMap<ResourceId, ResourceAvailability>,
}

impl ResourceSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a container's contents to the running total for `resource`.
    pub fn add(&mut self, resource: ResourceId, availability: ResourceAvailability) {
        let entry = self.totals.entry(resource).or_default();
        *entry = entry.combine(availability);
    }

    pub fn with(mut self, resource: ResourceId, availability: ResourceAvailability) -> Self {
        self.add(resource, availability);
        self
    }

    pub fn lookup(&self, resource: ResourceId) -> ResourceAvailability {
        self.totals.get(&resource).copied().unwrap_or_default()
    }
}

impl FromIterator<(ResourceId, ResourceAvailability)> for ResourceSnapshot {
    fn from_iter<I: IntoIterator<Item = (ResourceId, ResourceAvailability)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (resource, availability) in iter {
            snapshot.add(resource, availability);
        }
        snapshot
    }
}
