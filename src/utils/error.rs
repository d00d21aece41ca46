use thiserror::Error;

/// Errors raised while splitting a single record into fields.
///
/// Every variant keeps the values it was raised with so callers can inspect
/// them directly instead of parsing the message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unknown record type {record_type:?} encountered")]
    UnknownRecordType { record_type: String },

    #[error("No field separator found before {field:?} at {pointer}")]
    MissingSeparator { field: String, pointer: usize },

    #[error("Field {field:?} value {value:?} is not justified correctly")]
    Justification { field: String, value: String },
}

impl ParseError {
    /// Name of the field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            ParseError::UnknownRecordType { .. } => None,
            ParseError::MissingSeparator { field, .. } | ParseError::Justification { field, .. } => {
                Some(field.as_str())
            }
        }
    }
}

pub type ParseResult<T> = std::result::Result<T, ParseError>;

#[derive(Error, Debug)]
pub enum FwfError {
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: ParseError,
    },

    #[error("line {line}: input is not valid {encoding}")]
    Decode { line: usize, encoding: String },

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value {value:?} for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },
}

pub type Result<T> = std::result::Result<T, FwfError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Layout,
    Output,
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
    /// Process exit code the CLI reports for an error of this severity.
    pub fn exit_code(self) -> i32 {
        match self {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl FwfError {
    pub fn config(message: impl Into<String>) -> Self {
        FwfError::ConfigError {
            message: message.into(),
        }
    }

    pub fn processing(message: impl Into<String>) -> Self {
        FwfError::ProcessingError {
            message: message.into(),
        }
    }

    /// Line number of the offending input line, for record-level errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            FwfError::Parse { line, .. } | FwfError::Decode { line, .. } => Some(*line),
            _ => None,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            FwfError::Parse { .. } | FwfError::Decode { .. } => ErrorCategory::Input,
            FwfError::ConfigError { .. }
            | FwfError::ConfigValidationError { .. }
            | FwfError::InvalidConfigValueError { .. }
            | FwfError::MissingConfigError { .. } => ErrorCategory::Layout,
            FwfError::ZipError(_)
            | FwfError::CsvError(_)
            | FwfError::SerializationError(_)
            | FwfError::ProcessingError { .. } => ErrorCategory::Output,
            FwfError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Layout | ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            FwfError::Parse {
                source: ParseError::UnknownRecordType { .. },
                ..
            } => "Add the record type to [layout.types] or allow unknown types to be skipped".to_string(),
            FwfError::Parse {
                source: ParseError::MissingSeparator { .. },
                ..
            } => "Check the field lengths and field_separator in the layout".to_string(),
            FwfError::Parse {
                source: ParseError::Justification { field, .. },
                ..
            } => format!(
                "Check the justification of '{}' or list it in right_justified / skip_justified",
                field
            ),
            FwfError::Decode { .. } => {
                "Set parser.encoding to match the input file (e.g. \"latin-1\")".to_string()
            }
            FwfError::ConfigError { .. }
            | FwfError::ConfigValidationError { .. }
            | FwfError::InvalidConfigValueError { .. }
            | FwfError::MissingConfigError { .. } => {
                "Review the layout TOML file against the documented format".to_string()
            }
            FwfError::IoError(_) => "Check that the paths exist and are accessible".to_string(),
            _ => "Check the output settings and retry".to_string(),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Input => format!("Input file could not be parsed: {}", self),
            ErrorCategory::Layout => format!("Layout configuration is invalid: {}", self),
            ErrorCategory::Output => format!("Output could not be written: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_messages() {
        let err = ParseError::UnknownRecordType {
            record_type: "X".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown record type \"X\" encountered");

        let err = ParseError::MissingSeparator {
            field: "name".to_string(),
            pointer: 5,
        };
        assert_eq!(err.to_string(), "No field separator found before \"name\" at 5");

        let err = ParseError::Justification {
            field: "name".to_string(),
            value: " bob".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Field \"name\" value \" bob\" is not justified correctly"
        );
    }

    #[test]
    fn test_parse_error_keeps_arguments() {
        let err = ParseError::MissingSeparator {
            field: "amount".to_string(),
            pointer: 12,
        };
        assert_eq!(err.field(), Some("amount"));
        match err {
            ParseError::MissingSeparator { pointer, .. } => assert_eq!(pointer, 12),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(
            ParseError::UnknownRecordType {
                record_type: "Z".into()
            }
            .field(),
            None
        );
    }

    #[test]
    fn test_record_error_carries_line() {
        let err = FwfError::Parse {
            line: 7,
            source: ParseError::Justification {
                field: "id".to_string(),
                value: " 1".to_string(),
            },
        };
        assert_eq!(err.line(), Some(7));
        assert!(err.to_string().starts_with("line 7: "));
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Medium);
        assert!(err.recovery_suggestion().contains("'id'"));
    }

    #[test]
    fn test_classification() {
        let err = FwfError::config("bad layout");
        assert_eq!(err.category(), ErrorCategory::Layout);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.user_friendly_message().contains("bad layout"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: FwfError = io.into();
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert_eq!(err.line(), None);
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        assert_eq!(ErrorSeverity::Low.exit_code(), 0);
        assert_eq!(ErrorSeverity::Medium.exit_code(), 2);
        assert_eq!(ErrorSeverity::High.exit_code(), 1);
        assert_eq!(ErrorSeverity::Critical.exit_code(), 3);
    }
}
