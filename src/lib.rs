//! aerofilter - Document-style filter expressions for schema-aware queries
//!
//! A filter travels through three shapes:
//!
//! 1. `Expression`: the in-memory tree built by callers
//! 2. `FilterDocument`: the nested map exchanged over the wire and stored
//! 3. `CompiledQuery`: a backend predicate with its joins, resolved
//!    against a `Schema`
//!
//! ```ignore
//! use aerofilter::{Expression, Operator, PredicateCompiler, SchemaLoader};
//!
//! let document = Expression::singular("department.city.name", Operator::Eq, "Cairo")?
//!     .and(Expression::list_valued("age", Operator::In, [30, 40])?)
//!     .build();
//!
//! let mut loader = SchemaLoader::new("schemas");
//! loader.load_all()?;
//! let registry = loader.into_registry()?;
//! let query = PredicateCompiler::default().compile_document(&document, registry.entity("Employee")?)?;
//! ```

pub mod compiler;
pub mod config;
pub mod document;
pub mod expression;
pub mod observability;
pub mod schema;

use thiserror::Error;

pub use compiler::{CompileError, CompiledPredicate, CompiledQuery, Explain, PredicateCompiler};
pub use config::{ConfigError, FilterConfig};
pub use document::FilterDocument;
pub use expression::{Expression, ExpressionError, HijrahDate, Operator, Temporal};
pub use schema::{EntitySchema, Schema, SchemaError, SchemaLoader, SchemaRegistry};

/// Result type spanning every subsystem
pub type FilterResult<T> = Result<T, FilterError>;

/// Any error raised while turning a filter into a query
#[derive(Debug, Clone, Error)]
pub enum FilterError {
    /// Malformed expression or document
    #[error("{0}")]
    Expression(#[from] ExpressionError),

    /// Invalid or unknown schema
    #[error("{0}")]
    Schema(#[from] SchemaError),

    /// Filter rejected by the compiler
    #[error("{0}")]
    Compile(#[from] CompileError),

    /// Invalid configuration
    #[error("{0}")]
    Config(#[from] ConfigError),
}

impl FilterError {
    /// Returns the `AERO_*` code of the underlying error
    pub fn code(&self) -> &'static str {
        match self {
            FilterError::Expression(e) => e.code().code(),
            FilterError::Schema(e) => e.code().code(),
            FilterError::Compile(e) => e.code().code(),
            FilterError::Config(e) => e.code(),
        }
    }

    /// True if the filter itself was at fault rather than the setup
    pub fn is_client_error(&self) -> bool {
        matches!(self, FilterError::Expression(_) | FilterError::Compile(_))
    }
}
