// Adapters layer: concrete implementations for external systems (source files, Google APIs).

pub mod csv_source;
pub mod google;

pub use csv_source::CsvSource;
