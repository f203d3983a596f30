use thiserror::Error;

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Source is not valid {encoding} text")]
    DecodeError { encoding: String },

    #[error("Authentication failed: {message}")]
    AuthError { message: String },

    #[error("{service} returned {status}: {body}")]
    RemoteError {
        service: String,
        status: u16,
        body: String,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

/// Where an error came from, used by the binary to pick its message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Source,
    Auth,
    Remote,
    Config,
    Processing,
}

impl SplitError {
    pub fn auth(message: impl Into<String>) -> Self {
        SplitError::AuthError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SplitError::CsvError(_)
            | SplitError::IoError(_)
            | SplitError::DecodeError { .. }
            | SplitError::ValidationError { .. } => ErrorCategory::Source,
            SplitError::AuthError { .. } => ErrorCategory::Auth,
            SplitError::ApiError(_)
            | SplitError::SerializationError(_)
            | SplitError::RemoteError { .. } => ErrorCategory::Remote,
            SplitError::ConfigError { .. }
            | SplitError::ConfigValidationError { .. }
            | SplitError::InvalidConfigValueError { .. } => ErrorCategory::Config,
            SplitError::ProcessingError { .. } => ErrorCategory::Processing,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Source => format!("Could not read the source file: {}", self),
            ErrorCategory::Auth => format!("Could not sign in to Google: {}", self),
            ErrorCategory::Remote => format!("A Google API call failed: {}", self),
            ErrorCategory::Config => format!("The configuration is invalid: {}", self),
            ErrorCategory::Processing => format!("Processing stopped unexpectedly: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SplitError::DecodeError { .. } => {
                "Check that the source encoding matches the file (see --encoding)"
            }
            SplitError::CsvError(_) => "Make sure every row has the same number of columns",
            SplitError::IoError(_) => "Check that the file exists and is readable",
            SplitError::ValidationError { .. } => "The source file needs at least a header row",
            SplitError::AuthError { .. } => {
                "Check the service account key file and that the account is enabled"
            }
            SplitError::RemoteError { status: 403, .. } => {
                "Enable the Sheets and Drive APIs for the service account's project"
            }
            SplitError::RemoteError { .. } | SplitError::ApiError(_) => {
                "Check network access to the Google APIs"
            }
            SplitError::SerializationError(_) => "The API returned an unexpected response",
            SplitError::ConfigError { .. }
            | SplitError::ConfigValidationError { .. }
            | SplitError::InvalidConfigValueError { .. } => {
                "Fix the reported configuration value and run again"
            }
            SplitError::ProcessingError { .. } => "Run again with --verbose to see the failing step",
        }
    }
}

pub type Result<T> = std::result::Result<T, SplitError>;
