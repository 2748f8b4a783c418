//! Data module - dataset schema and CSV loading

mod loader;
mod schema;

pub use loader::{DataError, Dataset};
pub use schema::{is_measurement_field, MEASUREMENT_FIELDS};
