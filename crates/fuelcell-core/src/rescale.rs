//! Geometric rescaling of a fuel cell's rates and attached storage.
//!
//! Throughput follows cross-sectional area, so a part scaled by a linear
//! factor `s` is rescaled by `s^2`; see [`ScaleFactor::from_linear`].
//! Throttle and threshold are ratios and are never touched.

use crate::mode::ModeSet;
use crate::storage::StorageTank;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum RescaleError {
    #[error("scale factor must be finite and positive, got {0}")]
    InvalidFactor(f64),
}

/// A validated multiplier applied to rates and capacities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactor(f64);

impl ScaleFactor {
    pub fn new(factor: f64) -> Result<Self, RescaleError> {
        if factor.is_finite() && factor > 0.0 {
            Ok(Self(factor))
        } else {
            Err(RescaleError::InvalidFactor(factor))
        }
    }

    /// Quadratic factor for a linear size change.
    pub fn from_linear(linear: f64) -> Result<Self, RescaleError> {
        Self::new(linear * linear)
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

/// Multiply every rate in `set`, and every tank's amount and capacity, by
/// `factor`. Nothing changes if `factor` is rejected, including when any
/// scaled value would overflow.
pub fn rescale(
    set: &mut ModeSet,
    tanks: &mut [StorageTank],
    factor: f64,
) -> Result<(), RescaleError> {
    let factor = ScaleFactor::new(factor)?;
    if !modes_stay_finite(set, factor) || !tanks_stay_finite(tanks, factor) {
        return Err(RescaleError::InvalidFactor(factor.value()));
    }
    debug!(factor = factor.value(), "rescaling fuel cell");
    scale_tanks(tanks, factor);

    let mode_count = set.len();
    for (index, mode) in set.modes_mut().iter_mut().enumerate() {
        let before = mode.max_charge_rate();
        mode.scale(factor.value());
        debug!(
            mode = index + 1,
            modes = mode_count,
            before,
            after = mode.max_charge_rate(),
            "scaled max charge rate"
        );
    }

    Ok(())
}

/// Scale tank amounts and capacities only.
pub fn rescale_tanks(tanks: &mut [StorageTank], factor: ScaleFactor) -> Result<(), RescaleError> {
    if !tanks_stay_finite(tanks, factor) {
        return Err(RescaleError::InvalidFactor(factor.value()));
    }
    scale_tanks(tanks, factor);
    Ok(())
}

fn scale_tanks(tanks: &mut [StorageTank], factor: ScaleFactor) {
    for tank in tanks.iter_mut() {
        debug!(
            resource = tank.resource.0,
            amount = tank.amount,
            capacity = tank.capacity,
            "unscaled tank"
        );
        tank.capacity *= factor.value();
        tank.amount *= factor.value();
        debug!(
            resource = tank.resource.0,
            amount = tank.amount,
            capacity = tank.capacity,
            "scaled tank"
        );
    }
}

fn modes_stay_finite(set: &ModeSet, factor: ScaleFactor) -> bool {
    let f = factor.value();
    set.modes().iter().all(|mode| {
        (mode.max_charge_rate() * f).is_finite()
            && mode
                .inputs()
                .iter()
                .chain(mode.outputs())
                .all(|flow| (flow.rate() * f).is_finite())
    })
}

fn tanks_stay_finite(tanks: &[StorageTank], factor: ScaleFactor) -> bool {
    let f = factor.value();
    tanks
        .iter()
        .all(|tank| (tank.amount * f).is_finite() && (tank.capacity * f).is_finite())
}
