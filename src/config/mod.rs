pub mod toml_config;

use crate::adapters::csv_source::{DEFAULT_DELIMITER, DEFAULT_ENCODING};
use crate::adapters::google::sheets::DEFAULT_SHEET_NAME;
use crate::adapters::google::{DEFAULT_DRIVE_ENDPOINT, DEFAULT_SHEETS_ENDPOINT};
use crate::core::worker::DEFAULT_TITLE_TEMPLATE;
use crate::core::{ConfigProvider, FailurePolicy};
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_delimiter, validate_encoding_label, validate_non_empty_string, validate_path,
    validate_title_template, validate_url, Validate,
};

pub const DEFAULT_SOURCE_PATH: &str = "./medridge-jobs.csv";
pub const DEFAULT_CREDENTIALS_PATH: &str = "./tmp/service-account.json";

/// Validation shared by every `ConfigProvider`.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_path("source_path", config.source_path())?;
    validate_path("credentials_path", config.credentials_path())?;
    validate_encoding_label("encoding", config.encoding())?;
    validate_delimiter("delimiter", config.delimiter())?;
    validate_title_template("title_template", config.title_template())?;
    validate_non_empty_string("sheet_name", config.sheet_name())?;
    validate_url("sheets_endpoint", config.sheets_endpoint())?;
    validate_url("drive_endpoint", config.drive_endpoint())?;
    Ok(())
}

#[cfg(feature = "cli")]
use clap::Parser;

/// Command line settings. Every flag defaults to the built-in constant, so a
/// bare invocation reads `./medridge-jobs.csv` with `./tmp/service-account.json`.
#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "sheet-splitter")]
#[command(about = "Split a CSV by its last column into one Google Sheet per group")]
pub struct CliConfig {
    #[arg(long, default_value = DEFAULT_SOURCE_PATH)]
    pub source_path: String,

    #[arg(long, default_value = DEFAULT_CREDENTIALS_PATH)]
    pub credentials_path: String,

    #[arg(long, default_value = DEFAULT_ENCODING)]
    pub encoding: String,

    #[arg(long, default_value_t = DEFAULT_DELIMITER)]
    pub delimiter: char,

    #[arg(long, default_value = DEFAULT_TITLE_TEMPLATE)]
    pub title_template: String,

    #[arg(long, default_value = DEFAULT_SHEET_NAME)]
    pub sheet_name: String,

    #[arg(long, value_enum, default_value_t = FailurePolicy::StopAtFirstFailure)]
    pub failure_policy: FailurePolicy,

    #[arg(long, default_value = DEFAULT_SHEETS_ENDPOINT)]
    pub sheets_endpoint: String,

    #[arg(long, default_value = DEFAULT_DRIVE_ENDPOINT)]
    pub drive_endpoint: String,

    /// Path to a TOML configuration file; replaces the flags above
    #[arg(short, long)]
    pub config: Option<String>,

    /// Read and group the source without calling Google
    #[arg(long)]
    pub dry_run: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn source_path(&self) -> &str {
        &self.source_path
    }

    fn credentials_path(&self) -> &str {
        &self.credentials_path
    }

    fn encoding(&self) -> &str {
        &self.encoding
    }

    fn delimiter(&self) -> char {
        self.delimiter
    }

    fn title_template(&self) -> &str {
        &self.title_template
    }

    fn sheet_name(&self) -> &str {
        &self.sheet_name
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    fn sheets_endpoint(&self) -> &str {
        &self.sheets_endpoint
    }

    fn drive_endpoint(&self) -> &str {
        &self.drive_endpoint
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
