//! Predicate compiler subsystem for aerofilter
//!
//! Turns expression trees into backend predicates against a schema.
//!
//! # Design Principles
//!
//! - Generic over `Schema`; no persistence backend is linked in
//! - One `QueryContext` per call; compilers are stateless and shareable
//! - Joins are reused by association identity, first join type wins
//! - Collection traversal forces duplicate elimination
//! - Operands are coerced to the attribute's host type before use
//!
//! # Example
//!
//! ```ignore
//! let mut loader = SchemaLoader::new("schemas");
//! loader.load_all()?;
//! let registry = loader.into_registry()?;
//! let root = registry.entity("Employee")?;
//! let query = PredicateCompiler::default().compile_document(&document, root)?;
//! println!("{}", Explain(&query));
//! ```

mod coercion;
#[allow(clippy::module_inception)]
mod compiler;
mod context;
mod errors;
mod explain;
mod field_path;
mod predicate;

pub use coercion::{coerce, coerce_list, TypedValue};
pub use compiler::PredicateCompiler;
pub use context::{Join, JoinId, JoinSource, QueryContext};
pub use errors::{CompileError, CompileErrorCode, CompileResult, Severity};
pub use explain::{render_sql, Explain};
pub use field_path::{segment_count, split_first, JoinType, PathSegment};
pub use predicate::{AttributePath, Comparison, CompiledPredicate, CompiledQuery, Projection};
