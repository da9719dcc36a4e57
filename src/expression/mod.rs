//! Expression subsystem for aerofilter
//!
//! The in-memory filter tree that sits between filter documents and
//! compiled predicates.
//!
//! # Design Principles
//!
//! - Closed operator registry with a fixed arity per operator
//! - Leaves validate their arity when constructed
//! - Trees are immutable; `and` / `or` always allocate a new node
//! - No schema knowledge
//!
//! # Example
//!
//! ```ignore
//! let expr = Expression::singular("lastName", Operator::Eq, "ibrahim")?
//!     .and(Expression::or_of([
//!         Expression::list_valued("age", Operator::In, [10, 20])?,
//!         Expression::temporal("birthDate", Operator::Lt, &date)?,
//!     ]));
//! ```

mod ast;
mod errors;
mod operator;
mod temporal;

pub use ast::{Expression, ListExpression, SingularExpression};
pub use errors::{ExpressionError, ExpressionErrorCode, ExpressionResult};
pub use operator::Operator;
pub use temporal::{HijrahDate, Temporal, HIJRAH_MAX_YEAR, HIJRAH_MIN_YEAR};
