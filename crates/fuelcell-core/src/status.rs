//! Read-only views derived from tick results, for whatever UI the host has.
//!
//! Nothing here touches engine state. Colours and markup are left to the
//! host; the strings produced are plain text.

use crate::engine::{OperatingState, TickResult};
use crate::mode::{ModeSet, OperatingMode, ResourceFlow};
use crate::registry::ResourceRegistry;
use std::collections::BTreeSet;
use std::fmt;
use std::fmt::Write as _;

// ---------------------------------------------------------------------------
// Display record
// ---------------------------------------------------------------------------

/// Current vs. maximum charge rate, plus the state, for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DisplayRecord {
    pub state: OperatingState,
    /// Charge per second actually produced this tick.
    pub current_rate: f64,
    /// Charge per second at the current throttle.
    pub max_rate: f64,
}

impl DisplayRecord {
    /// Record shown before the first tick.
    pub fn unconfigured() -> Self {
        Self {
            state: OperatingState::Error,
            current_rate: 0.0,
            max_rate: 0.0,
        }
    }
}

impl fmt::Display for DisplayRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} / {} EC/s",
            self.state.label(),
            format_amount(self.current_rate),
            format_amount(self.max_rate)
        )
    }
}

/// Project a tick result onto the mode it ran.
pub fn project(result: &TickResult, mode: &OperatingMode) -> DisplayRecord {
    let current_rate = if result.dt.is_finite() && result.dt > 0.0 {
        result.charge_delta / result.dt
    } else {
        0.0
    };
    let max_rate = match result.state {
        OperatingState::Off | OperatingState::Error => 0.0,
        _ => mode.max_charge_rate() * result.throttle,
    };
    DisplayRecord {
        state: result.state,
        current_rate,
        max_rate,
    }
}

/// Whether the displayed text needs refreshing.
pub fn diff(old: Option<&DisplayRecord>, new: &DisplayRecord) -> bool {
    match old {
        None => true,
        Some(old) => {
            old.state != new.state
                || old.current_rate != new.current_rate
                || old.max_rate != new.max_rate
        }
    }
}

// ---------------------------------------------------------------------------
// Control visibility
// ---------------------------------------------------------------------------

/// Controls a host UI may show for a fuel cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ControlId {
    Status,
    ChargeRate,
    FuelUsed,
    Byproducts,
    Enabled,
    NextMode,
    PreviousMode,
    Throttle,
    Threshold,
}

/// Controls worth showing for a cell with `mode_count` modes.
///
/// With two modes "previous" is the same as "next", so it only appears
/// from three modes up.
pub fn visible_controls(mode_count: usize) -> BTreeSet<ControlId> {
    let mut controls = BTreeSet::from([
        ControlId::Status,
        ControlId::ChargeRate,
        ControlId::FuelUsed,
        ControlId::Enabled,
        ControlId::Throttle,
        ControlId::Threshold,
    ]);
    if mode_count >= 2 {
        controls.insert(ControlId::NextMode);
    }
    if mode_count >= 3 {
        controls.insert(ControlId::PreviousMode);
    }
    controls
}

impl ModeSet {
    /// [`visible_controls`] plus byproducts when any mode has them.
    pub fn visible_controls(&self) -> BTreeSet<ControlId> {
        let mut controls = visible_controls(self.len());
        if self.has_byproducts() {
            controls.insert(ControlId::Byproducts);
        }
        controls
    }
}

// ---------------------------------------------------------------------------
// Text formatting
// ---------------------------------------------------------------------------

/// Format a number with at most two decimals, trailing zeros dropped.
pub fn format_amount(value: f64) -> String {
    let s = format!("{value:.2}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

/// Format a per-second rate in whichever of /s, /m, /h reads best.
pub fn format_rate(rate: f64) -> String {
    if rate <= 0.004444444 {
        format!("{}/h", format_amount(rate * 3600.0))
    } else if rate < 0.2666667 {
        format!("{}/m", format_amount(rate * 60.0))
    } else {
        format!("{}/s", format_amount(rate))
    }
}

fn write_flows(out: &mut String, flows: &[ResourceFlow], registry: &ResourceRegistry) {
    if flows.is_empty() {
        out.push_str("\n - None");
        return;
    }
    for flow in flows {
        let _ = write!(
            out,
            "\n - {}: {}",
            registry.name(flow.resource()),
            format_rate(flow.rate())
        );
    }
}

/// Text for the [`ControlId::FuelUsed`] and [`ControlId::Byproducts`] controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveFlowsText {
    pub fuel_used: String,
    pub byproducts: String,
}

/// One line per flow of the active mode, or a single `None` line.
pub fn active_flows_text(mode: &OperatingMode, registry: &ResourceRegistry) -> ActiveFlowsText {
    let lines = |flows: &[ResourceFlow]| {
        let mut out = String::new();
        write_flows(&mut out, flows, registry);
        out.split_off(1)
    };
    ActiveFlowsText {
        fuel_used: lines(mode.inputs()),
        byproducts: lines(mode.outputs()),
    }
}

/// Multi-line summary of every mode, for part info panels.
pub fn describe_modes(set: &ModeSet, registry: &ResourceRegistry) -> String {
    let mut out = format!("Modes: {}", set.len());
    for (index, mode) in set.modes().iter().enumerate() {
        let _ = write!(
            out,
            "\n\nMode: {index} - Max EC: {}/s\nFuels:",
            format_amount(mode.max_charge_rate())
        );
        write_flows(&mut out, mode.inputs(), registry);
        out.push_str("\nByproducts:");
        write_flows(&mut out, mode.outputs(), registry);
    }
    out
}
