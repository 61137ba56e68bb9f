use serde::{Deserialize, Serialize};

/// Increment used by the throttle and threshold step commands.
pub const THRESHOLD_STEP: f64 = 0.05;
/// Lowest value the step commands and setters allow.
pub const THRESHOLD_MIN: f64 = THRESHOLD_STEP;
/// Highest value the step commands and setters allow.
pub const THRESHOLD_MAX: f64 = 1.0;

/// User-facing controls read by the engine once per tick.
///
/// Fields are public so the host can mutate them directly; the setters and
/// step commands keep `throttle` and `threshold` inside
/// `[THRESHOLD_MIN, THRESHOLD_MAX]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineParameters {
    /// Fraction of the mode's rates actually commanded.
    pub throttle: f64,
    /// Fraction of charge capacity at or above which production stops.
    pub threshold: f64,
    pub enabled: bool,
    /// A completely empty charge buffer prevents production.
    pub needs_charge_to_start: bool,
    /// Ask the host to move to the next mode when fuel runs out.
    pub auto_switch_on_starvation: bool,
}

impl Default for EngineParameters {
    fn default() -> Self {
        Self {
            throttle: 1.0,
            threshold: 0.85,
            enabled: true,
            needs_charge_to_start: false,
            auto_switch_on_starvation: false,
        }
    }
}

impl EngineParameters {
    pub fn set_throttle(&mut self, value: f64) {
        self.throttle = clamp_step_range(value);
    }

    pub fn set_threshold(&mut self, value: f64) {
        self.threshold = clamp_step_range(value);
    }

    pub fn increase_throttle(&mut self) {
        self.set_throttle(self.throttle + THRESHOLD_STEP);
    }

    pub fn decrease_throttle(&mut self) {
        self.set_throttle(self.throttle - THRESHOLD_STEP);
    }

    pub fn increase_threshold(&mut self) {
        self.set_threshold(self.threshold + THRESHOLD_STEP);
    }

    pub fn decrease_threshold(&mut self) {
        self.set_threshold(self.threshold - THRESHOLD_STEP);
    }

    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    /// Throttle as the engine uses it: clamped to `[0, 1]`, NaN read as 0.
    pub(crate) fn effective_throttle(&self) -> f64 {
        unit_fraction(self.throttle)
    }

    /// Threshold as the engine uses it: clamped to `[0, 1]`, NaN read as 0.
    pub(crate) fn effective_threshold(&self) -> f64 {
        unit_fraction(self.threshold)
    }
}

fn clamp_step_range(value: f64) -> f64 {
    if value.is_nan() {
        return THRESHOLD_MIN;
    }
    value.clamp(THRESHOLD_MIN, THRESHOLD_MAX)
}

fn unit_fraction(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn defaults_match_a_fresh_part() {
        let p = EngineParameters::default();
        assert_eq!(p.throttle, 1.0);
        assert_eq!(p.threshold, 0.85);
        assert!(p.enabled);
        assert!(!p.needs_charge_to_start);
        assert!(!p.auto_switch_on_starvation);
    }

    #[test]
    fn throttle_steps_clamp_at_max() {
        let mut p = EngineParameters::default();
        p.increase_throttle();
        assert_eq!(p.throttle, THRESHOLD_MAX);
    }

    #[test]
    fn throttle_steps_clamp_at_min() {
        let mut p = EngineParameters::default();
        for _ in 0..40 {
            p.decrease_throttle();
        }
        assert!(approx(p.throttle, THRESHOLD_MIN));
    }

    #[test]
    fn threshold_steps_move_by_one_increment() {
        let mut p = EngineParameters::default();
        p.decrease_threshold();
        assert!(approx(p.threshold, 0.80));
        p.increase_threshold();
        p.increase_threshold();
        assert!(approx(p.threshold, 0.90));
    }

    #[test]
    fn setters_clamp_out_of_range_values() {
        let mut p = EngineParameters::default();
        p.set_throttle(3.0);
        assert_eq!(p.throttle, 1.0);
        p.set_threshold(-1.0);
        assert_eq!(p.threshold, THRESHOLD_MIN);
        p.set_threshold(f64::NAN);
        assert_eq!(p.threshold, THRESHOLD_MIN);
    }

    #[test]
    fn toggle_flips_enabled() {
        let mut p = EngineParameters::default();
        p.toggle();
        assert!(!p.enabled);
        p.toggle();
        assert!(p.enabled);
        p.disable();
        assert!(!p.enabled);
        p.enable();
        assert!(p.enabled);
    }

    #[test]
    fn effective_values_are_unit_clamped() {
        let p = EngineParameters {
            throttle: 1.5,
            threshold: f64::NAN,
            ..EngineParameters::default()
        };
        assert_eq!(p.effective_throttle(), 1.0);
        assert_eq!(p.effective_threshold(), 0.0);
    }
}
