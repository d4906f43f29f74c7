use thiserror::Error;

#[derive(Error, Debug)]
pub enum StierError {
    #[error("API request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Not found: {what}")]
    NotFound { what: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    Validation,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 根據錯誤嚴重程度決定退出碼
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low | ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl StierError {
    pub fn validation(message: impl Into<String>) -> Self {
        StierError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            StierError::HttpError(_) | StierError::ApiError { .. } => ErrorCategory::Network,
            StierError::CsvError(_)
            | StierError::SerializationError(_)
            | StierError::ProcessingError { .. }
            | StierError::NotFound { .. } => ErrorCategory::Data,
            StierError::TomlError(_)
            | StierError::ConfigError { .. }
            | StierError::InvalidConfigValueError { .. }
            | StierError::MissingConfigError { .. } => ErrorCategory::Configuration,
            StierError::ValidationError { .. } => ErrorCategory::Validation,
            StierError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Validation => ErrorSeverity::Low,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StierError::HttpError(_) => "Check network connectivity and the source endpoint",
            StierError::ApiError { status, .. } if *status == 401 || *status == 403 => {
                "Check that source.api_key is set and has read access"
            }
            StierError::ApiError { .. } => "Retry later or verify the table name",
            StierError::CsvError(_)
            | StierError::SerializationError(_)
            | StierError::ProcessingError { .. } => {
                "Verify the input data is well-formed"
            }
            StierError::TomlError(_) => "Make sure the config file is valid TOML",
            StierError::ConfigError { .. }
            | StierError::InvalidConfigValueError { .. }
            | StierError::MissingConfigError { .. } => "Fix the configuration value and rerun",
            StierError::ValidationError { .. } => "Ratings must be within 0-5 and scores within 0-10",
            StierError::NotFound { .. } => "Check the product slug",
            StierError::IoError(_) => "Check file permissions and available disk space",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach the product source: {}", self),
            ErrorCategory::Data => format!("The data could not be processed: {}", self),
            ErrorCategory::Configuration => format!("The configuration is invalid: {}", self),
            ErrorCategory::Validation => format!("Rejected input: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, StierError>;
