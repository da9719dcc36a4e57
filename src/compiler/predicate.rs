//! Compiled predicate tree
//!
//! Backend-neutral boolean predicate produced by the compiler. Leaves
//! reference attributes through their join source, so a host maps each
//! `JoinSource` onto its own join handles.

use std::fmt;

use super::coercion::TypedValue;
use super::context::{JoinSource, QueryContext};

/// Reference to a basic attribute, possibly inside embedded attributes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributePath {
    pub source: JoinSource,
    /// Embedded chain followed by the leaf attribute name
    pub segments: Vec<String>,
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)?;
        for segment in &self.segments {
            write!(f, ".{}", segment)?;
        }
        Ok(())
    }
}

/// Comparison operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl Comparison {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparison::Eq => "=",
            Comparison::Ne => "<>",
            Comparison::Gt => ">",
            Comparison::Gte => ">=",
            Comparison::Lt => "<",
            Comparison::Lte => "<=",
        }
    }
}

/// Backend predicate fragment
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledPredicate {
    /// Matches every row
    True,
    IsNull(AttributePath),
    IsNotNull(AttributePath),
    Compare {
        path: AttributePath,
        op: Comparison,
        value: TypedValue,
        /// Compare `lower(path)` against an already lower-cased value
        case_insensitive: bool,
    },
    Like {
        path: AttributePath,
        pattern: String,
        /// Match `lower(path)` against an already lower-cased pattern
        case_insensitive: bool,
        /// Attribute is not text and is matched through its string form
        cast_to_text: bool,
    },
    In {
        path: AttributePath,
        values: Vec<TypedValue>,
    },
    Not(Box<CompiledPredicate>),
    /// Empty conjunction is true
    And(Vec<CompiledPredicate>),
    /// Empty disjunction is false
    Or(Vec<CompiledPredicate>),
}

impl CompiledPredicate {
    /// Number of leaf predicates
    pub fn leaf_count(&self) -> usize {
        match self {
            CompiledPredicate::True => 0,
            CompiledPredicate::Not(inner) => inner.leaf_count(),
            CompiledPredicate::And(children) | CompiledPredicate::Or(children) => {
                children.iter().map(CompiledPredicate::leaf_count).sum()
            }
            _ => 1,
        }
    }
}

/// What the host query selects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    /// Root rows
    #[default]
    Rows,
    /// Number of matching root rows
    Count,
}

/// Compiled predicate with the joins it depends on
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    pub context: QueryContext,
    pub predicate: CompiledPredicate,
    pub projection: Projection,
}

impl CompiledQuery {
    /// Returns true if the host must eliminate duplicate rows
    pub fn is_distinct(&self) -> bool {
        self.context.is_distinct()
    }
}
