pub mod loader;
pub mod schema;

pub use loader::{DataLoadError, Format, LoadedFuelCell, load_fuel_cell, load_fuel_cell_str};
