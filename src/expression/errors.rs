//! Expression error types following the AERO_* error code convention
//!
//! Error codes:
//! - AERO_FILTER_INVALID_OPERATOR (REJECT)
//! - AERO_FILTER_EMPTY_VALUES (REJECT)
//! - AERO_FILTER_INVALID_VALUE (REJECT)
//! - AERO_FILTER_UNKNOWN_OPERATOR (REJECT)
//! - AERO_FILTER_MALFORMED_DOCUMENT (REJECT)

use std::fmt;

/// Severity levels for expression errors
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

/// Expression-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpressionErrorCode {
    /// Operator arity does not match the constructor used
    AeroFilterInvalidOperator,
    /// List-valued expression built with no values
    AeroFilterEmptyValues,
    /// Operand is not a scalar (or a list of scalars)
    AeroFilterInvalidValue,
    /// Operator token not in the registry
    AeroFilterUnknownOperator,
    /// Filter document has an invalid structure
    AeroFilterMalformedDocument,
}

impl ExpressionErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ExpressionErrorCode::AeroFilterInvalidOperator => "AERO_FILTER_INVALID_OPERATOR",
            ExpressionErrorCode::AeroFilterEmptyValues => "AERO_FILTER_EMPTY_VALUES",
            ExpressionErrorCode::AeroFilterInvalidValue => "AERO_FILTER_INVALID_VALUE",
            ExpressionErrorCode::AeroFilterUnknownOperator => "AERO_FILTER_UNKNOWN_OPERATOR",
            ExpressionErrorCode::AeroFilterMalformedDocument => "AERO_FILTER_MALFORMED_DOCUMENT",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        Severity::Reject
    }
}

impl fmt::Display for ExpressionErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Expression error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct ExpressionError {
    /// Error code
    code: ExpressionErrorCode,
    /// Human-readable message
    message: String,
    /// Field name if applicable
    field: Option<String>,
}

impl ExpressionError {
    /// Create an invalid operator error
    pub fn invalid_operator(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: ExpressionErrorCode::AeroFilterInvalidOperator,
            message: format!("Field '{}': {}", f, reason.into()),
            field: Some(f),
        }
    }

    /// Create an empty values error
    pub fn empty_values(field: impl Into<String>, operator: impl fmt::Display) -> Self {
        let f = field.into();
        Self {
            code: ExpressionErrorCode::AeroFilterEmptyValues,
            message: format!("Field '{}': operator {} requires at least one value", f, operator),
            field: Some(f),
        }
    }

    /// Create an invalid value error
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        let f = field.into();
        Self {
            code: ExpressionErrorCode::AeroFilterInvalidValue,
            message: format!("Field '{}': {}", f, reason.into()),
            field: Some(f),
        }
    }

    /// Create an unknown operator error
    pub fn unknown_operator(token: impl Into<String>) -> Self {
        Self {
            code: ExpressionErrorCode::AeroFilterUnknownOperator,
            message: format!("Unknown operator '{}'", token.into()),
            field: None,
        }
    }

    /// Create a malformed document error
    pub fn malformed_document(reason: impl Into<String>) -> Self {
        Self {
            code: ExpressionErrorCode::AeroFilterMalformedDocument,
            message: reason.into(),
            field: None,
        }
    }

    /// Attach the field the error was raised for
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> ExpressionErrorCode {
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

    /// Returns the field name if applicable
    pub fn field(&self) -> Option<&str> {
        self.field.as_deref()
    }
}

impl fmt::Display for ExpressionError {
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

impl std::error::Error for ExpressionError {}

/// Result type for expression operations
pub type ExpressionResult<T> = Result<T, ExpressionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            ExpressionErrorCode::AeroFilterInvalidOperator.code(),
            "AERO_FILTER_INVALID_OPERATOR"
        );
        assert_eq!(
            ExpressionErrorCode::AeroFilterEmptyValues.code(),
            "AERO_FILTER_EMPTY_VALUES"
        );
        assert_eq!(
            ExpressionErrorCode::AeroFilterUnknownOperator.code(),
            "AERO_FILTER_UNKNOWN_OPERATOR"
        );
        assert_eq!(
            ExpressionErrorCode::AeroFilterMalformedDocument.code(),
            "AERO_FILTER_MALFORMED_DOCUMENT"
        );
    }

    #[test]
    fn test_error_display() {
        let err = ExpressionError::unknown_operator("$not_supported_operator");
        let display = format!("{}", err);
        assert!(display.contains("REJECT"));
        assert!(display.contains("AERO_FILTER_UNKNOWN_OPERATOR"));
        assert!(display.contains("$not_supported_operator"));
    }

    #[test]
    fn test_field_context() {
        let err = ExpressionError::empty_values("age", "$in");
        assert_eq!(err.field(), Some("age"));
        assert!(err.message().contains("$in"));

        let err = ExpressionError::unknown_operator("$x").with_field("age");
        assert_eq!(err.field(), Some("age"));
    }
}
