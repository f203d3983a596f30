pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::google::{GoogleDrive, GoogleSheets};
pub use adapters::CsvSource;
pub use config::toml_config::TomlConfig;
pub use crate::core::{
    coordinator::Coordinator, engine::SplitEngine, worker::GroupWorker, AggregateReport,
    FailurePolicy, Outcome,
};
pub use utils::error::{Result, SplitError};
