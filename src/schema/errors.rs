//! Schema error types following the AERO_* error code convention
//!
//! Error codes:
//! - AERO_SCHEMA_UNKNOWN_TYPE (REJECT)
//! - AERO_SCHEMA_DUPLICATE_TYPE (REJECT)
//! - AERO_SCHEMA_MALFORMED (FATAL when raised by the loader)

use std::fmt;

/// Severity levels for schema errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Client request rejected
    Reject,
    /// Startup must abort
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Schema-specific error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaErrorCode {
    /// Type name not registered
    AeroSchemaUnknownType,
    /// Type name registered twice
    AeroSchemaDuplicateType,
    /// Definition file unreadable or inconsistent
    AeroSchemaMalformed,
}

impl SchemaErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            SchemaErrorCode::AeroSchemaUnknownType => "AERO_SCHEMA_UNKNOWN_TYPE",
            SchemaErrorCode::AeroSchemaDuplicateType => "AERO_SCHEMA_DUPLICATE_TYPE",
            SchemaErrorCode::AeroSchemaMalformed => "AERO_SCHEMA_MALFORMED",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            SchemaErrorCode::AeroSchemaMalformed => Severity::Fatal,
            _ => Severity::Reject,
        }
    }
}

impl fmt::Display for SchemaErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Schema error type with full context
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaError {
    /// Error code
    code: SchemaErrorCode,
    /// Human-readable message
    message: String,
    /// Type name if applicable
    type_name: Option<String>,
}

impl SchemaError {
    /// Create an unknown type error
    pub fn unknown_type(type_name: impl Into<String>) -> Self {
        let t = type_name.into();
        Self {
            code: SchemaErrorCode::AeroSchemaUnknownType,
            message: format!("Type '{}' is not registered", t),
            type_name: Some(t),
        }
    }

    /// Create a duplicate type error
    pub fn duplicate_type(type_name: impl Into<String>) -> Self {
        let t = type_name.into();
        Self {
            code: SchemaErrorCode::AeroSchemaDuplicateType,
            message: format!("Type '{}' is defined more than once", t),
            type_name: Some(t),
        }
    }

    /// Create a malformed definition error
    pub fn malformed(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            code: SchemaErrorCode::AeroSchemaMalformed,
            message: format!("Malformed schema '{}': {}", source.into(), reason.into()),
            type_name: None,
        }
    }

    /// Attach the type the error was raised for
    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_name = Some(type_name.into());
        self
    }

    /// Returns the error code
    pub fn code(&self) -> SchemaErrorCode {
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

    /// Returns the type name if applicable
    pub fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }
}

impl fmt::Display for SchemaError {
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

impl std::error::Error for SchemaError {}

/// Result type for schema operations
pub type SchemaResult<T> = Result<T, SchemaError>;
