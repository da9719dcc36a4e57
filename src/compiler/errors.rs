//! Compiler error types following the AERO_* error code convention
//!
//! Error codes:
//! - AERO_FILTER_UNKNOWN_ATTRIBUTE (REJECT)
//! - AERO_FILTER_TYPE_NOT_COMPARABLE (REJECT)
//! - AERO_FILTER_VALUE_CONVERSION (REJECT)
//! - AERO_FILTER_INVALID_PATH (REJECT)
//! - AERO_FILTER_LIMIT_EXCEEDED (REJECT)

use std::fmt;

/// Severity levels for compiler errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
        }
    }
}

/// Compiler-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompileErrorCode {
    /// Path segment not present on the current type
    AeroFilterUnknownAttribute,
    /// Operator needs an ordering or text type the attribute lacks
    AeroFilterTypeNotComparable,
    /// Literal cannot be converted to the attribute type
    AeroFilterValueConversion,
    /// Path does not end on a comparable attribute
    AeroFilterInvalidPath,
    /// Configured limit exceeded
    AeroFilterLimitExceeded,
}

impl CompileErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            CompileErrorCode::AeroFilterUnknownAttribute => "AERO_FILTER_UNKNOWN_ATTRIBUTE",
            CompileErrorCode::AeroFilterTypeNotComparable => "AERO_FILTER_TYPE_NOT_COMPARABLE",
            CompileErrorCode::AeroFilterValueConversion => "AERO_FILTER_VALUE_CONVERSION",
            CompileErrorCode::AeroFilterInvalidPath => "AERO_FILTER_INVALID_PATH",
            CompileErrorCode::AeroFilterLimitExceeded => "AERO_FILTER_LIMIT_EXCEEDED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for CompileErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Compiler error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct CompileError {
    /// Error code
    code: CompileErrorCode,
    /// Human-readable message
    message: String,
    /// Field path if applicable
    field: Option<String>,
    /// Owning or target type if applicable
    type_name: Option<String>,
}

impl CompileError {
    /// Create an unknown attribute error
    pub fn unknown_attribute(field: impl Into<String>, type_name: impl Into<String>) -> Self {
        let f = field.into();
        let t = type_name.into();
        Self {
            code: CompileErrorCode::AeroFilterUnknownAttribute,
            message: format!("Unable to locate attribute '{}' on type '{}'", f, t),
            field: Some(f),
            type_name: Some(t),
        }
    }

    /// Create a type not comparable error
    pub fn type_not_comparable(
        field: impl Into<String>,
        type_name: impl Into<String>,
        operator: impl fmt::Display,
    ) -> Self {
        let f = field.into();
        let t = type_name.into();
        Self {
            code: CompileErrorCode::AeroFilterTypeNotComparable,
            message: format!(
                "Operator {} cannot be applied to field '{}' of type '{}'",
                operator, f, t
            ),
            field: Some(f),
            type_name: Some(t),
        }
    }

    /// Create a type not comparable error for a case-insensitive operator
    pub fn text_required(
        field: impl Into<String>,
        type_name: impl Into<String>,
        operator: impl fmt::Display,
    ) -> Self {
        let f = field.into();
        let t = type_name.into();
        Self {
            code: CompileErrorCode::AeroFilterTypeNotComparable,
            message: format!(
                "Operator {} compares text case-insensitively; field '{}' has type '{}'",
                operator, f, t
            ),
            field: Some(f),
            type_name: Some(t),
        }
    }

    /// Create a value conversion error
    pub fn value_conversion(
        field: impl Into<String>,
        type_name: impl Into<String>,
        literal: impl fmt::Display,
    ) -> Self {
        let f = field.into();
        let t = type_name.into();
        Self {
            code: CompileErrorCode::AeroFilterValueConversion,
            message: format!("Cannot convert {} to '{}' for field '{}'", literal, t, f),
            field: Some(f),
            type_name: Some(t),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: CompileErrorCode::AeroFilterInvalidPath,
            message: format!("Field '{}': {}", f, reason.into()),
            field: Some(f),
            type_name: None,
        }
    }

    /// Create a limit exceeded error
    pub fn limit_exceeded(what: &str, actual: usize, max: usize) -> Self {
        Self {
            code: CompileErrorCode::AeroFilterLimitExceeded,
            message: format!("{} {} exceeds maximum {}", what, actual, max),
            field: None,
            type_name: None,
        }
    }

    /// Attach the field the error was raised for
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> CompileErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the field path if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }

    /// Returns the type name if applicable
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )
    }
}

impl std::error::Error for CompileError {}

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CompileErrorCode::AeroFilterUnknownAttribute.code(),
            "AERO_FILTER_UNKNOWN_ATTRIBUTE"
        );
        assert_eq!(
            CompileErrorCode::AeroFilterTypeNotComparable.code(),
            "AERO_FILTER_TYPE_NOT_COMPARABLE"
        );
        assert_eq!(
            CompileErrorCode::AeroFilterValueConversion.code(),
            "AERO_FILTER_VALUE_CONVERSION"
        );
        assert_eq!(CompileErrorCode::AeroFilterInvalidPath.code(), "AERO_FILTER_INVALID_PATH");
        assert_eq!(
            CompileErrorCode::AeroFilterLimitExceeded.code(),
            "AERO_FILTER_LIMIT_EXCEEDED"
        );
    }

    #[test]
    fn test_unknown_attribute_names_field_and_type() {
        let err = CompileError::unknown_attribute("invalidFieldName", "Employee");
        assert!(err.message().contains("invalidFieldName"));
        assert!(err.message().contains("Employee"));
        assert_eq!(err.type_name(), Some("Employee"));
    }

    #[test]
    fn test_value_conversion_names_literal() {
        let err = CompileError::value_conversion("serial", "uuid", "\"not-a-uuid\"");
        let display = err.to_string();
        assert!(display.starts_with("[REJECT] AERO_FILTER_VALUE_CONVERSION"));
        assert!(display.contains("not-a-uuid"));
        assert!(display.contains("serial"));
    }
}
