use crate::adapters::csv_source::{DEFAULT_DELIMITER, DEFAULT_ENCODING};
use crate::adapters::google::sheets::DEFAULT_SHEET_NAME;
use crate::adapters::google::{DEFAULT_DRIVE_ENDPOINT, DEFAULT_SHEETS_ENDPOINT};
use crate::config::{validate_provider, DEFAULT_CREDENTIALS_PATH, DEFAULT_SOURCE_PATH};
use crate::core::worker::DEFAULT_TITLE_TEMPLATE;
use crate::core::{ConfigProvider, FailurePolicy};
use crate::utils::error::{Result, SplitError};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File-based settings. Every section and key is optional and falls back to
/// the same constants as the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub source: SourceConfig,
    pub credentials: CredentialsConfig,
    pub spreadsheet: SpreadsheetConfig,
    pub drive: DriveConfig,
    pub worker: WorkerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: String,
    pub encoding: String,
    pub delimiter: char,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_SOURCE_PATH.to_string(),
            encoding: DEFAULT_ENCODING.to_string(),
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub path: String,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: DEFAULT_CREDENTIALS_PATH.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpreadsheetConfig {
    pub title_template: String,
    pub sheet_name: String,
    pub endpoint: String,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            title_template: DEFAULT_TITLE_TEMPLATE.to_string(),
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
            endpoint: DEFAULT_SHEETS_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    pub endpoint: String,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DRIVE_ENDPOINT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    pub failure_policy: FailurePolicy,
}

impl TomlConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(SplitError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| SplitError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are left as is.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| SplitError::ConfigError {
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }
}

impl ConfigProvider for TomlConfig {
    fn source_path(&self) -> &str {
        &self.source.path
    }

    fn credentials_path(&self) -> &str {
        &self.credentials.path
    }

    fn encoding(&self) -> &str {
        &self.source.encoding
    }

    fn delimiter(&self) -> char {
        self.source.delimiter
    }

    fn title_template(&self) -> &str {
        &self.spreadsheet.title_template
    }

    fn sheet_name(&self) -> &str {
        &self.spreadsheet.sheet_name
    }

    fn failure_policy(&self) -> FailurePolicy {
        self.worker.failure_policy
    }

    fn sheets_endpoint(&self) -> &str {
        &self.spreadsheet.endpoint
    }

    fn drive_endpoint(&self) -> &str {
        &self.drive.endpoint
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
