//! A stateful fuel cell: the mode set, the active mode, the user's controls,
//! and the last state, wrapped around the pure [`engine::tick`].
//!
//! The device starts in [`OperatingState::Error`] and stays there until a
//! [`ModeSet`] is loaded. After that, every tick yields one of the five
//! operating states and `Error` is never seen again.

use crate::engine::{self, OperatingState, TickResult};
use crate::id::ResourceId;
use crate::mode::{self, ModeDirection, ModeError, ModeSet, OperatingMode};
use crate::params::EngineParameters;
use crate::rescale::{self, RescaleError, ScaleFactor};
use crate::resource::ResourceAvailability;
use crate::status::{self, DisplayRecord};
use crate::storage::StorageTank;
use tracing::{info, trace, warn};

#[derive(Debug, Clone)]
pub struct FuelCell {
    modes: Option<ModeSet>,
    mode_index: usize,
    pub params: EngineParameters,
    state: OperatingState,
    display: DisplayRecord,
    display_changed: bool,
    /// Product of every rescale factor applied to the current modes.
    scale: f64,
}

impl Default for FuelCell {
    fn default() -> Self {
        Self::new(EngineParameters::default())
    }
}

impl FuelCell {
    /// An unconfigured cell. Ticks report `Error` until [`configure`](Self::configure).
    pub fn new(params: EngineParameters) -> Self {
        Self {
            modes: None,
            mode_index: 0,
            params,
            state: OperatingState::Error,
            display: DisplayRecord::unconfigured(),
            display_changed: true,
            scale: 1.0,
        }
    }

    pub fn with_modes(modes: ModeSet, params: EngineParameters) -> Self {
        let mut cell = Self::new(params);
        cell.configure(modes);
        cell
    }

    /// Replace the mode set wholesale. The active index is kept if still valid.
    /// The new modes are taken as unscaled, so [`scale`](Self::scale) resets to 1.
    pub fn configure(&mut self, modes: ModeSet) {
        if self.mode_index >= modes.len() {
            self.mode_index = 0;
        }
        self.scale = 1.0;
        info!(modes = modes.len(), active = self.mode_index, "fuel cell configured");
        self.modes = Some(modes);
        if self.state == OperatingState::Error {
            self.state = OperatingState::Off;
        }
    }

    pub fn is_configured(&self) -> bool {
        self.modes.is_some()
    }

    pub fn modes(&self) -> Option<&ModeSet> {
        self.modes.as_ref()
    }

    pub fn mode_index(&self) -> usize {
        self.mode_index
    }

    pub fn active_mode(&self) -> Option<&OperatingMode> {
        self.modes.as_ref().and_then(|set| set.get(self.mode_index))
    }

    pub fn state(&self) -> OperatingState {
        self.state
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn display(&self) -> &DisplayRecord {
        &self.display
    }

    /// True if the last tick changed what [`display`](Self::display) shows.
    pub fn display_changed(&self) -> bool {
        self.display_changed
    }

    // -----------------------------------------------------------------------
    // Tick
    // -----------------------------------------------------------------------

    /// Run one fixed timestep. An auto-switch request is applied before
    /// returning, so the next tick runs in the new mode.
    pub fn tick<F>(&mut self, dt: f64, charge: ResourceAvailability, fuel_lookup: F) -> TickResult
    where
        F: Fn(ResourceId) -> ResourceAvailability,
    {
        let Some(mode) = self.active_mode() else {
            warn!("tick on an unconfigured fuel cell");
            return TickResult::idle(OperatingState::Error, dt, self.params.throttle);
        };

        let result = engine::tick(mode, &self.params, charge, fuel_lookup, dt);
        let record = status::project(&result, mode);

        if result.state != self.state {
            trace!(from = %self.state, to = %result.state, "fuel cell state changed");
        }
        self.state = result.state;
        self.display_changed = status::diff(Some(&self.display), &record);
        self.display = record;

        if let Some(direction) = result.switch_mode {
            self.step_mode(direction);
        }

        result
    }

    // -----------------------------------------------------------------------
    // Mode selection
    // -----------------------------------------------------------------------

    pub fn next_mode(&mut self) -> usize {
        self.step_mode(ModeDirection::Next)
    }

    pub fn previous_mode(&mut self) -> usize {
        self.step_mode(ModeDirection::Previous)
    }

    fn step_mode(&mut self, direction: ModeDirection) -> usize {
        let Some(set) = self.modes.as_ref() else {
            warn!(?direction, "mode change on an unconfigured fuel cell");
            return self.mode_index;
        };
        let next = mode::advance(set, self.mode_index, direction);
        if next != self.mode_index {
            info!(from = self.mode_index, to = next, ?direction, "fuel mode changed");
        }
        self.mode_index = next;
        next
    }

    /// Select a mode by index. Out-of-range requests leave the mode unchanged.
    pub fn set_mode(&mut self, index: usize) -> Result<usize, ModeError> {
        let Some(set) = self.modes.as_ref() else {
            return Err(ModeError::IndexOutOfRange { index, len: 0 });
        };
        match mode::set_index(set, index) {
            Ok(index) => {
                info!(from = self.mode_index, to = index, "fuel mode selected");
                self.mode_index = index;
                Ok(index)
            }
            Err(err) => {
                warn!(%err, "rejected fuel mode selection");
                Err(err)
            }
        }
    }

    // -----------------------------------------------------------------------
    // Rescale
    // -----------------------------------------------------------------------

    /// Rescale the cell's modes and the given tanks by `factor`.
    ///
    /// An unconfigured cell only scales the tanks and leaves
    /// [`scale`](Self::scale) at 1, since it has no rates to describe.
    pub fn rescale(&mut self, factor: f64, tanks: &mut [StorageTank]) -> Result<(), RescaleError> {
        let checked = ScaleFactor::new(factor)?;
        match self.modes.as_mut() {
            Some(set) => {
                if !(self.scale * checked.value()).is_finite() {
                    return Err(RescaleError::InvalidFactor(factor));
                }
                rescale::rescale(set, tanks, factor)?;
                self.scale *= factor;
            }
            None => rescale::rescale_tanks(tanks, checked)?,
        }
        Ok(())
    }

    /// Bring the modes to the cumulative `scale` by applying the ratio to
    /// the current one. Nothing changes if the ratio is rejected.
    pub(crate) fn restore_scale(&mut self, scale: f64) -> Result<(), RescaleError> {
        let Some(set) = self.modes.as_mut() else {
            warn!(scale, "restored scale ignored on an unconfigured fuel cell");
            return Ok(());
        };
        let ratio = scale / self.scale;
        if ratio != 1.0 {
            rescale::rescale(set, &mut [], ratio)?;
        }
        self.scale = scale;
        Ok(())
    }

    pub(crate) fn restore_fields(&mut self, mode_index: usize, params: EngineParameters) {
        self.params = params;
        self.mode_index = match self.modes.as_ref() {
            Some(set) if mode_index >= set.len() => {
                warn!(mode_index, modes = set.len(), "restored mode index out of range, using 0");
                0
            }
            _ => mode_index,
        };
    }
}
