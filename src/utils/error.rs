use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Malformed record in {source_name} at row {row}: {message}")]
    RecordError {
        source_name: String,
        row: usize,
        message: String,
    },

    #[error("Zone definition error for '{zone}': {message}")]
    ZoneError { zone: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Processing,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl EvalError {
    pub fn processing(message: impl Into<String>) -> Self {
        EvalError::ProcessingError {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        EvalError::ValidationError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            EvalError::CsvError(_)
            | EvalError::RecordError { .. }
            | EvalError::ZoneError { .. } => ErrorCategory::Input,
            EvalError::ConfigValidationError { .. }
            | EvalError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            EvalError::SerializationError(_)
            | EvalError::ProcessingError { .. }
            | EvalError::ValidationError { .. } => ErrorCategory::Processing,
            EvalError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Processing => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            EvalError::CsvError(_) | EvalError::RecordError { .. } => {
                "Check that the file is ';'-separated with columns date, species, longitude, latitude"
            }
            EvalError::ZoneError { .. } => {
                "Check that every zone in the zone file has an FAOArea and at least three coordinates"
            }
            EvalError::IoError(_) => "Check that the path exists and is readable/writable",
            EvalError::SerializationError(_) => "Check that the JSON input is well formed",
            EvalError::ConfigValidationError { .. } | EvalError::InvalidConfigValueError { .. } => {
                "Fix the command line flags or the TOML configuration file"
            }
            EvalError::ProcessingError { .. } | EvalError::ValidationError { .. } => {
                "Re-run with --verbose for more details"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Could not read input data: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Processing => format!("Evaluation failed: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, EvalError>;
