use thiserror::Error;

#[derive(Error, Debug)]
pub enum CleanseError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Pattern compilation failed: {0}")]
    RegexError(#[from] regex::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Dictionary contains no usable entries")]
    EmptyDictionary,

    #[error("Required field '{field}' not found in {source_name}")]
    MissingRequiredField { field: String, source_name: String },

    #[error("Matched token '{token}' has no entry in the replacement table")]
    LookupInvariantViolation { token: String },

    #[error("Unsupported file type '{extension}' for {path}")]
    UnsupportedFileType { path: String, extension: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, CleanseError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Dictionary,
    Input,
    Output,
    Configuration,
    Internal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl CleanseError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            CleanseError::EmptyDictionary => ErrorCategory::Dictionary,
            CleanseError::MissingRequiredField { .. }
            | CleanseError::UnsupportedFileType { .. }
            | CleanseError::CsvError(_) => ErrorCategory::Input,
            CleanseError::ZipError(_)
            | CleanseError::IoError(_)
            | CleanseError::SerializationError(_) => ErrorCategory::Output,
            CleanseError::TomlError(_)
            | CleanseError::ConfigError { .. }
            | CleanseError::MissingConfigError { .. }
            | CleanseError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            CleanseError::RegexError(_)
            | CleanseError::LookupInvariantViolation { .. }
            | CleanseError::ProcessingError { .. } => ErrorCategory::Internal,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CleanseError::UnsupportedFileType { .. } => ErrorSeverity::Low,
            CleanseError::IoError(_) | CleanseError::ZipError(_) => ErrorSeverity::Medium,
            CleanseError::LookupInvariantViolation { .. } | CleanseError::RegexError(_) => {
                ErrorSeverity::Critical
            }
            _ => ErrorSeverity::High,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CleanseError::EmptyDictionary => {
                "Check that the dictionary has 'shorthand' and 'full_form' values, or allow pass-through mode"
            }
            CleanseError::MissingRequiredField { .. } => {
                "Make sure the input has the configured text column (see --text-column)"
            }
            CleanseError::UnsupportedFileType { .. } => "Provide a .csv or .txt input file",
            CleanseError::CsvError(_) => "Check the CSV file for malformed quoting or encoding",
            CleanseError::IoError(_) => "Check that the paths exist and are writable",
            CleanseError::ZipError(_) => "Check free disk space or disable the zip bundle",
            CleanseError::TomlError(_)
            | CleanseError::ConfigError { .. }
            | CleanseError::MissingConfigError { .. }
            | CleanseError::InvalidConfigValueError { .. } => {
                "Review the configuration file or command-line arguments"
            }
            CleanseError::SerializationError(_) => "Retry without the json output format",
            CleanseError::RegexError(_) | CleanseError::LookupInvariantViolation { .. } => {
                "This is a bug in the cleaning engine; please report it with the dictionary used"
            }
            CleanseError::ProcessingError { .. } => {
                "Retry with --workers 1, or rename inputs whose outputs would share a name"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            CleanseError::EmptyDictionary => {
                "The shorthand dictionary is empty after removing incomplete rows".to_string()
            }
            CleanseError::MissingRequiredField { field, source_name } => {
                format!("'{}' column not found in {}", field, source_name)
            }
            CleanseError::UnsupportedFileType { path, .. } => {
                format!("Unsupported file type: {}. Use .csv or .txt", path)
            }
            other => other.to_string(),
        }
    }

    /// 對應 CLI 結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}
