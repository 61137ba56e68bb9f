//! Property-based tests for the fuel cell allocation engine.
//!
//! Uses proptest to generate random modes, buffers, and fuel levels, then
//! verify the tick and rescale invariants hold.

use fuelcell_core::engine::{OperatingState, tick};
use fuelcell_core::mode::{self, ModeDirection, ModeSet, OperatingMode, ResourceFlow};
use fuelcell_core::params::EngineParameters;
use fuelcell_core::rescale::rescale;
use fuelcell_core::resource::{ResourceAvailability, ResourceSnapshot};
use fuelcell_core::storage::StorageTank;
use fuelcell_core::test_utils::*;
use proptest::prelude::*;

// ===========================================================================
// Generators
// ===========================================================================

/// A hydrolox-style mode with random rates.
fn arb_mode() -> impl Strategy<Value = OperatingMode> {
    (0.0..100.0f64, 0.01..10.0f64, 0.0..10.0f64, 0.0..5.0f64).prop_map(
        |(max, h2_rate, o2_rate, water_rate)| {
            OperatingMode::new(
                max,
                vec![
                    ResourceFlow::new(hydrogen(), h2_rate),
                    ResourceFlow::new(oxygen(), o2_rate),
                ],
                vec![ResourceFlow::new(water(), water_rate)],
            )
        },
    )
}

fn arb_params() -> impl Strategy<Value = EngineParameters> {
    (0.0..=1.0f64, 0.0..=1.0f64).prop_map(|(throttle, threshold)| EngineParameters {
        throttle,
        threshold,
        ..EngineParameters::default()
    })
}

/// (amount, capacity) with amount <= capacity.
fn arb_buffer() -> impl Strategy<Value = ResourceAvailability> {
    (0.0..1000.0f64, 0.0..=1.0f64)
        .prop_map(|(capacity, fill)| ResourceAvailability::new(capacity * fill, capacity))
}

fn arb_fuel() -> impl Strategy<Value = ResourceSnapshot> {
    (0.0..100.0f64, 0.0..100.0f64).prop_map(|(h2, o2)| {
        ResourceSnapshot::new()
            .with(hydrogen(), ResourceAvailability::new(h2, 100.0))
            .with(oxygen(), ResourceAvailability::new(o2, 100.0))
    })
}

fn arb_dt() -> impl Strategy<Value = f64> {
    0.001..5.0f64
}

fn rel_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1e-300)
}

// ===========================================================================
// Properties
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    /// Deltas are non-negative and charge never exceeds the rated maximum.
    #[test]
    fn deltas_are_bounded(
        mode in arb_mode(),
        params in arb_params(),
        buffer in arb_buffer(),
        fuel in arb_fuel(),
        dt in arb_dt()
    ) {
        let result = tick(&mode, &params, buffer, |id| fuel.lookup(id), dt);

        prop_assert!(result.charge_delta >= 0.0);
        prop_assert!(result.charge_delta <= mode.max_charge_rate() * dt * (1.0 + 1e-12));
        for &(_, amount) in result.consumed.iter().chain(&result.produced) {
            prop_assert!(amount >= 0.0);
        }
        for &(resource, amount) in &result.consumed {
            prop_assert!(amount <= fuel.lookup(resource).amount * (1.0 + 1e-9) + 1e-12);
        }
        prop_assert!(result.duration >= 0.0 && result.duration <= dt);
    }

    /// A disabled cell is Off with nothing moved, whatever else is true.
    #[test]
    fn disabled_is_always_off(
        mode in arb_mode(),
        params in arb_params(),
        buffer in arb_buffer(),
        fuel in arb_fuel(),
        dt in arb_dt()
    ) {
        let params = EngineParameters { enabled: false, ..params };
        let result = tick(&mode, &params, buffer, |id| fuel.lookup(id), dt);

        prop_assert_eq!(result.state, OperatingState::Off);
        prop_assert_eq!(result.charge_delta, 0.0);
        prop_assert!(result.consumed.is_empty());
        prop_assert!(result.produced.is_empty());
    }

    /// An empty buffer stalls a cell that needs charge to start.
    #[test]
    fn empty_buffer_stalls(
        mode in arb_mode(),
        params in arb_params(),
        capacity in 0.0..1000.0f64,
        fuel in arb_fuel(),
        dt in arb_dt()
    ) {
        let params = EngineParameters { needs_charge_to_start: true, ..params };
        let buffer = ResourceAvailability::new(0.0, capacity);
        let result = tick(&mode, &params, buffer, |id| fuel.lookup(id), dt);
        prop_assert_eq!(result.state, OperatingState::Stalled);
    }

    /// At or above the threshold there is no demand.
    #[test]
    fn full_enough_buffer_has_no_demand(
        mode in arb_mode(),
        params in arb_params(),
        capacity in 0.0..1000.0f64,
        excess in 0.0..1.0f64,
        fuel in arb_fuel(),
        dt in arb_dt()
    ) {
        let amount = capacity * params.threshold + excess;
        let buffer = ResourceAvailability::new(amount, capacity);
        let result = tick(&mode, &params, buffer, |id| fuel.lookup(id), dt);
        prop_assert_eq!(result.state, OperatingState::NoDemand);
        prop_assert_eq!(result.charge_delta, 0.0);
    }

    /// One empty fuel with a positive rate starves the whole mode.
    #[test]
    fn empty_fuel_deprives(
        mode in arb_mode(),
        throttle in 0.05..=1.0f64,
        threshold in 0.05..=1.0f64,
        capacity in 1.0..1000.0f64,
        dt in arb_dt()
    ) {
        let params = EngineParameters { throttle, threshold, ..EngineParameters::default() };
        let fuel = ResourceSnapshot::new()
            .with(oxygen(), ResourceAvailability::new(100.0, 100.0));
        let buffer = ResourceAvailability::new(0.0, capacity);
        let result = tick(&mode, &params, buffer, |id| fuel.lookup(id), dt);

        prop_assert_eq!(result.state, OperatingState::FuelDeprived);
        prop_assert_eq!(result.charge_delta, 0.0);
        prop_assert!(result.consumed.is_empty());
    }

    /// Raising the throttle never lowers the charge produced.
    #[test]
    fn throttle_is_monotonic(
        mode in arb_mode(),
        low in 0.0..=1.0f64,
        high in 0.0..=1.0f64,
        threshold in 0.0..=1.0f64,
        buffer in arb_buffer(),
        fuel in arb_fuel(),
        dt in arb_dt()
    ) {
        let (low, high) = if low <= high { (low, high) } else { (high, low) };
        let at = |throttle: f64| {
            let params = EngineParameters { throttle, threshold, ..EngineParameters::default() };
            tick(&mode, &params, buffer, |id| fuel.lookup(id), dt).charge_delta
        };
        let (a, b) = (at(low), at(high));
        prop_assert!(a <= b * (1.0 + 1e-9) + 1e-12, "throttle {low} -> {a}, {high} -> {b}");
    }

    /// Two rescales equal one rescale by their product.
    #[test]
    fn rescale_composes(
        modes in proptest::collection::vec(arb_mode(), 1..4),
        a in 0.01..10.0f64,
        b in 0.01..10.0f64,
        amount in 0.0..100.0f64
    ) {
        let set = ModeSet::new(modes).unwrap();
        let tanks = vec![StorageTank::new(charge(), amount, 100.0)];

        let (mut twice, mut tanks_twice) = (set.clone(), tanks.clone());
        rescale(&mut twice, &mut tanks_twice, a).unwrap();
        rescale(&mut twice, &mut tanks_twice, b).unwrap();

        let (mut once, mut tanks_once) = (set, tanks);
        rescale(&mut once, &mut tanks_once, a * b).unwrap();

        for (x, y) in twice.modes().iter().zip(once.modes()) {
            prop_assert!(rel_eq(x.max_charge_rate(), y.max_charge_rate()));
            for (fx, fy) in x.inputs().iter().zip(y.inputs()).chain(x.outputs().iter().zip(y.outputs())) {
                prop_assert!(rel_eq(fx.rate(), fy.rate()));
            }
        }
        prop_assert!(rel_eq(tanks_twice[0].capacity, tanks_once[0].capacity));
        prop_assert!(rel_eq(tanks_twice[0].amount, tanks_once[0].amount));
    }

    /// Stepping through every mode returns to the start, either way.
    #[test]
    fn mode_wraparound(len in 1..8usize, start_seed in 0..8usize) {
        let set = ModeSet::new(vec![hydrogen_mode(10.0, 2.0); len]).unwrap();
        let start = start_seed % len;

        let mut forward = start;
        let mut backward = start;
        for _ in 0..len {
            forward = mode::advance(&set, forward, ModeDirection::Next);
            backward = mode::advance(&set, backward, ModeDirection::Previous);
        }
        prop_assert_eq!(forward, start);
        prop_assert_eq!(backward, start);

        let there = mode::advance(&set, start, ModeDirection::Next);
        prop_assert_eq!(mode::advance(&set, there, ModeDirection::Previous), start);
    }
}

// ===========================================================================
// Worked scenarios
// ===========================================================================

fn run_h2(amount: f64) -> fuelcell_core::engine::TickResult {
    let mode = hydrogen_mode(10.0, 2.0);
    let params = EngineParameters {
        throttle: 1.0,
        threshold: 0.9,
        ..EngineParameters::default()
    };
    let fuel = ResourceSnapshot::new().with(hydrogen(), ResourceAvailability::new(amount, 100.0));
    tick(
        &mode,
        &params,
        ResourceAvailability::new(0.0, 100.0),
        |id| fuel.lookup(id),
        1.0,
    )
}

#[test]
fn hydrogen_plenty() {
    let r = run_h2(50.0);
    assert_eq!(r.state, OperatingState::Nominal);
    assert!((r.charge_delta - 10.0).abs() < 1e-9);
    assert!((r.consumed_of(hydrogen()) - 2.0).abs() < 1e-9);
}

#[test]
fn hydrogen_scarce() {
    let r = run_h2(1.0);
    assert_eq!(r.state, OperatingState::Nominal);
    assert!((r.duration - 0.5).abs() < 1e-9);
    assert!((r.charge_delta - 5.0).abs() < 1e-9);
    assert!((r.consumed_of(hydrogen()) - 1.0).abs() < 1e-9);
}

#[test]
fn hydrogen_empty() {
    let r = run_h2(0.0);
    assert_eq!(r.state, OperatingState::FuelDeprived);
    assert_eq!(r.charge_delta, 0.0);
    assert!(r.consumed.is_empty());
}
