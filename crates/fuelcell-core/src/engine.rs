//! Per-tick allocation: how long the cell can run this tick, and what it
//! consumes and produces in that time.
//!
//! # Bottleneck computation
//!
//! The sustained duration `t` starts at the timestep and is lowered by each
//! constraint in turn:
//!
//! 1. Charge headroom: `charge_need / rated_output`.
//! 2. Each fuel: `available / (rate * throttle)`.
//!
//! Every fuel is queried exactly once, against the same snapshot, before any
//! bound is applied. A `t` of exactly zero counts as fuel deprivation.
//!
//! [`tick`] is pure. It never selects a different mode; when auto-switching
//! is enabled it only reports the request in [`TickResult::switch_mode`].

use crate::id::ResourceId;
use crate::mode::{ModeDirection, OperatingMode};
use crate::params::EngineParameters;
use crate::resource::{ResourceAvailability, non_negative};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Operating state
// ---------------------------------------------------------------------------

/// What the fuel cell is doing. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperatingState {
    /// Not configured yet. Never produced by [`tick`].
    #[default]
    Error,
    Off,
    Nominal,
    FuelDeprived,
    NoDemand,
    Stalled,
}

impl OperatingState {
    /// Short human-readable status.
    pub fn label(self) -> &'static str {
        match self {
            OperatingState::Error => "ERROR!",
            OperatingState::Off => "Off",
            OperatingState::Nominal => "Nominal",
            OperatingState::FuelDeprived => "Fuel Deprived",
            OperatingState::NoDemand => "No Demand",
            OperatingState::Stalled => "Stalled",
        }
    }

    pub fn is_producing(self) -> bool {
        self == OperatingState::Nominal
    }
}

impl std::fmt::Display for OperatingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tick result
// ---------------------------------------------------------------------------

/// The outcome of a single tick.
///
/// `consumed` and `produced` hold non-negative magnitudes; the host removes
/// `consumed` from its stores and adds `produced` and `charge_delta`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickResult {
    pub state: OperatingState,
    /// Charge produced this tick.
    pub charge_delta: f64,
    /// Fuel consumed this tick, in mode input order.
    pub consumed: Vec<(ResourceId, f64)>,
    /// Byproducts produced this tick, in mode output order.
    pub produced: Vec<(ResourceId, f64)>,
    /// Seconds of the tick the cell actually ran.
    pub duration: f64,
    /// The timestep this result covers.
    pub dt: f64,
    /// Throttle applied, after clamping.
    pub throttle: f64,
    /// Set when the cell starved and auto-switching is enabled.
    pub switch_mode: Option<ModeDirection>,
}

impl TickResult {
    /// A result with no production, consumption, or mode request.
    pub fn idle(state: OperatingState, dt: f64, throttle: f64) -> Self {
        Self {
            state,
            charge_delta: 0.0,
            consumed: Vec::new(),
            produced: Vec::new(),
            duration: 0.0,
            dt,
            throttle,
            switch_mode: None,
        }
    }

    /// Signed store adjustments: charge and byproducts positive, fuels negative.
    pub fn signed_deltas(&self, charge: ResourceId) -> Vec<(ResourceId, f64)> {
        let mut deltas = Vec::with_capacity(1 + self.consumed.len() + self.produced.len());
        if self.charge_delta > 0.0 {
            deltas.push((charge, self.charge_delta));
        }
        deltas.extend(self.consumed.iter().map(|&(id, amount)| (id, -amount)));
        deltas.extend(self.produced.iter().copied());
        deltas
    }

    /// Amount consumed of `resource` this tick (summed if listed twice).
    pub fn consumed_of(&self, resource: ResourceId) -> f64 {
        total_for(&self.consumed, resource)
    }

    /// Amount produced of `resource` this tick (summed if listed twice).
    pub fn produced_of(&self, resource: ResourceId) -> f64 {
        total_for(&self.produced, resource)
    }
}

fn total_for(entries: &[(ResourceId, f64)], resource: ResourceId) -> f64 {
    entries
        .iter()
        .filter(|(id, _)| *id == resource)
        .map(|(_, amount)| amount)
        .sum()
}

// ---------------------------------------------------------------------------
// tick
// ---------------------------------------------------------------------------

/// Run one allocation step for `mode`.
///
/// # Arguments
/// * `charge`      - charge storage totals reachable by the cell
/// * `fuel_lookup` - availability per fuel resource; called once per input
/// * `dt`          - fixed timestep in seconds
pub fn tick<F>(
    mode: &OperatingMode,
    params: &EngineParameters,
    charge: ResourceAvailability,
    fuel_lookup: F,
    dt: f64,
) -> TickResult
where
    F: Fn(ResourceId) -> ResourceAvailability,
{
    let throttle = params.effective_throttle();

    if !params.enabled {
        return TickResult::idle(OperatingState::Off, dt, throttle);
    }

    let charge = charge.sanitized();

    if params.needs_charge_to_start && charge.amount == 0.0 {
        return TickResult::idle(OperatingState::Stalled, dt, throttle);
    }

    let charge_need = charge.capacity * params.effective_threshold() - charge.amount;
    if charge_need <= 0.0 {
        return TickResult::idle(OperatingState::NoDemand, dt, throttle);
    }

    // Zero-length tick: nothing can be absorbed, and it is not starvation.
    if !(dt.is_finite() && dt > 0.0) {
        return TickResult::idle(OperatingState::NoDemand, dt, throttle);
    }

    let rated_output = mode.max_charge_rate() * throttle;
    let mut duration = if rated_output > 0.0 {
        dt.min(charge_need / rated_output)
    } else {
        dt
    };

    // Snapshot every input before bounding so repeated resources see the
    // same totals.
    let available: Vec<f64> = mode
        .inputs()
        .iter()
        .map(|flow| non_negative(fuel_lookup(flow.resource()).amount))
        .collect();

    for (flow, amount) in mode.inputs().iter().zip(available) {
        let demand = flow.rate() * throttle;
        if demand > 0.0 {
            duration = duration.min(amount / demand);
        }
    }

    if duration.is_nan() || duration <= 0.0 {
        let mut result = TickResult::idle(OperatingState::FuelDeprived, dt, throttle);
        if params.auto_switch_on_starvation {
            result.switch_mode = Some(ModeDirection::Next);
        }
        return result;
    }

    let adjusted_ratio = throttle * duration;
    TickResult {
        state: OperatingState::Nominal,
        charge_delta: rated_output * duration,
        consumed: mode
            .inputs()
            .iter()
            .map(|flow| (flow.resource(), flow.rate() * adjusted_ratio))
            .collect(),
        produced: mode
            .outputs()
            .iter()
            .map(|flow| (flow.resource(), flow.rate() * adjusted_ratio))
            .collect(),
        duration,
        dt,
        throttle,
        switch_mode: None,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
