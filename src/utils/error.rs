use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComposeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Io,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ComposeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ComposeError::IoError(_) => ErrorCategory::Io,
            _ => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ComposeError::IoError(_) => ErrorSeverity::Critical,
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ComposeError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            ComposeError::TomlError(_) => {
                "Make sure the configuration file is valid TOML".to_string()
            }
            ComposeError::MissingConfigError { field } => {
                format!("Provide a value for '{}'", field)
            }
            ComposeError::InvalidConfigValueError { field, .. }
            | ComposeError::ConfigValidationError { field, .. } => {
                format!("Fix the value of '{}' and run again", field)
            }
            ComposeError::ConfigError { .. } => {
                "Review the command line arguments and configuration file".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ComposeError::IoError(e) => format!("Could not write the manifest: {}", e),
            ComposeError::MissingConfigError { field } => {
                format!("'{}' is required but was not set", field)
            }
            ComposeError::InvalidConfigValueError {
                field,
                value,
                reason,
            } => format!("'{}' has an invalid value '{}': {}", field, value, reason),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ComposeError>;
