//! Headless fuel cell example: load, run under load, run dry, rescale.
//!
//! Loads a two-mode cell from `data/hydrolox_cell.toml`, attaches a battery
//! and fuel tanks, and drives it with a constant charge drain. Oxygen runs
//! out first, so the cell auto-switches to its hydrogen-only mode.
//!
//! Run with: `cargo run -p fuelcell-examples --example headless_fuel_cell`
//!
//! Set `RUST_LOG=fuelcell_core=debug` to see mode changes and rescale logs.

use fuelcell_core::device::FuelCell;
use fuelcell_core::id::ResourceId;
use fuelcell_core::registry::RegistryBuilder;
use fuelcell_core::rescale::ScaleFactor;
use fuelcell_core::status::{active_flows_text, describe_modes};
use fuelcell_core::storage::{StorageTank, TankSet};
use fuelcell_data::loader::{deserialize_file, register_resources, resolve_fuel_cell};
use fuelcell_data::schema::FuelCellData;
use std::path::Path;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DT: f64 = 0.5;
/// Charge drawn by the attached load, per second.
const LOAD: f64 = 3.0;

fn run(cell: &mut FuelCell, tanks: &mut TankSet, ec: ResourceId, ticks: usize) {
    for tick in 0..ticks {
        let snapshot = tanks.snapshot();
        let result = cell.tick(DT, tanks.availability(ec), |id| snapshot.lookup(id));
        let vented = tanks.apply(&result, ec);
        let _ = tanks.remove(ec, LOAD * DT);

        if cell.display_changed() || tick % 10 == 0 {
            println!(
                "  t={:>5.1}s  mode {}  {}  battery {:>5.1}  vented {:.2}",
                tick as f64 * DT,
                cell.mode_index(),
                cell.display(),
                tanks.amount(ec),
                vented
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/hydrolox_cell.toml");
    let data: FuelCellData = deserialize_file(&path)?;

    let mut builder = RegistryBuilder::new();
    register_resources(&data, &mut builder);
    let registry = builder.build();
    let loaded = resolve_fuel_cell(&data, &registry, &path)?;
    info!(file = %path.display(), "loaded fuel cell");

    println!("{}\n", describe_modes(&loaded.modes, &registry));

    let base_modes = loaded.modes.clone();
    let mut cell = FuelCell::with_modes(loaded.modes, loaded.params);
    let ec = registry.electric_charge();
    let mut tanks = TankSet::new(vec![
        StorageTank::empty(ec, 100.0),
        StorageTank::new(registry.resolve("Hydrogen")?, 60.0, 100.0),
        StorageTank::new(registry.resolve("Oxygen")?, 8.0, 100.0),
        StorageTank::empty(registry.resolve("Water")?, 2.0),
    ]);

    // --- Scenario 1: charge up, then burn through the oxygen ---

    println!("=== Scenario 1: hydrolox until oxygen runs out ===\n");
    run(&mut cell, &mut tanks, ec, 60);

    // --- Scenario 2: part doubled in size ---

    println!("\n=== Scenario 2: rescaled to twice the size ===\n");
    let factor = ScaleFactor::from_linear(2.0)?;
    cell.rescale(factor.value(), tanks.tanks_mut())?;
    run(&mut cell, &mut tanks, ec, 40);

    // --- Scenario 3: save and restore the user settings ---

    println!("\n=== Scenario 3: snapshot ===\n");
    cell.params.decrease_threshold();
    let bytes = cell.snapshot()?;
    let mut restored = FuelCell::with_modes(base_modes, Default::default());
    restored.restore(&bytes)?;
    println!(
        "  restored: mode {}, threshold {:.2}, scale {:.1}, {} bytes",
        restored.mode_index(),
        restored.params.threshold,
        restored.scale(),
        bytes.len()
    );
    if let Some(mode) = restored.active_mode() {
        let flows = active_flows_text(mode, &registry);
        println!("  max charge rate: {}/s", mode.max_charge_rate());
        println!("  fuel used:\n{}\n  byproducts:\n{}", flows.fuel_used, flows.byproducts);
    }

    Ok(())
}
