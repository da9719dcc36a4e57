//! Expression AST
//!
//! Schema-agnostic tree of filter nodes. Leaves validate their operator
//! arity at construction; compound nodes are built by `and` / `or` and
//! never mutate their operands.

use std::fmt;

use serde_json::Value;

use super::errors::{ExpressionError, ExpressionResult};
use super::operator::Operator;
use super::temporal::Temporal;
use crate::document::FilterDocument;

/// Leaf comparing a field against a single scalar
#[derive(Debug, Clone, PartialEq)]
pub struct SingularExpression {
    field: String,
    operator: Operator,
    value: Value,
}

impl SingularExpression {
    /// Field path (may carry join markers)
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Scalar operand; null only for `$eq` / `$ne`
    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Leaf comparing a field against a non-empty list of scalars
#[derive(Debug, Clone, PartialEq)]
pub struct ListExpression {
    field: String,
    operator: Operator,
    values: Vec<Value>,
}

impl ListExpression {
    /// Field path (may carry join markers)
    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Operand list, never empty
    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A filter expression node
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Singular(SingularExpression),
    List(ListExpression),
    And(Vec<Expression>),
    Or(Vec<Expression>),
}

impl Expression {
    /// Creates a single-valued leaf.
    ///
    /// Fails with `AERO_FILTER_INVALID_OPERATOR` for list or structural
    /// operators, and with `AERO_FILTER_INVALID_VALUE` when the operand
    /// is not a scalar or is null for an operator other than `$eq`/`$ne`.
    pub fn singular(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
    ) -> ExpressionResult<Self> {
        let field = field.into();
        let value = value.into();

        if operator.is_list() {
            return Err(ExpressionError::invalid_operator(
                field,
                format!("operator {} accepts a list of values", operator),
            ));
        }
        if operator.is_structural() {
            return Err(ExpressionError::invalid_operator(
                field,
                format!("operator {} is structural and cannot compare a value", operator),
            ));
        }
        if value.is_null() && !operator.accepts_null() {
            return Err(ExpressionError::invalid_value(
                field,
                format!("operator {} does not accept null", operator),
            ));
        }
        if !is_scalar(&value) {
            return Err(ExpressionError::invalid_value(
                field,
                format!("operator {} requires a scalar operand", operator),
            ));
        }

        Ok(Expression::Singular(SingularExpression {
            field,
            operator,
            value,
        }))
    }

    /// Creates a list-valued leaf.
    ///
    /// Fails with `AERO_FILTER_INVALID_OPERATOR` if the operator is not
    /// list-valued and with `AERO_FILTER_EMPTY_VALUES` on an empty list.
    pub fn list_valued<V: Into<Value>>(
        field: impl Into<String>,
        operator: Operator,
        values: impl IntoIterator<Item = V>,
    ) -> ExpressionResult<Self> {
        let field = field.into();
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();

        if !operator.is_list() {
            return Err(ExpressionError::invalid_operator(
                field,
                format!("operator {} doesn't accept a list of values", operator),
            ));
        }
        if values.is_empty() {
            return Err(ExpressionError::empty_values(field, operator));
        }
        if let Some(bad) = values.iter().find(|v| !is_scalar(v)) {
            return Err(ExpressionError::invalid_value(
                field,
                format!("list operand {} is not a scalar", bad),
            ));
        }

        Ok(Expression::List(ListExpression {
            field,
            operator,
            values,
        }))
    }

    /// Creates a leaf from a raw operand, choosing the arity from the operator.
    ///
    /// List operators require an array operand.
    pub fn of(field: impl Into<String>, operator: Operator, operand: Value) -> ExpressionResult<Self> {
        let field = field.into();
        if operator.is_list() {
            match operand {
                Value::Array(values) => Self::list_valued(field, operator, values),
                other => Err(ExpressionError::invalid_value(
                    field,
                    format!("operator {} expects an array operand, got {}", operator, other),
                )),
            }
        } else {
            Self::singular(field, operator, operand)
        }
    }

    /// Creates a single-valued leaf from a temporal operand
    pub fn temporal<T: Temporal>(
        field: impl Into<String>,
        operator: Operator,
        value: &T,
    ) -> ExpressionResult<Self> {
        Self::singular(field, operator, value.canonical_text())
    }

    /// Creates a list-valued leaf from temporal operands
    pub fn temporal_list<'a, T: Temporal + 'a>(
        field: impl Into<String>,
        operator: Operator,
        values: impl IntoIterator<Item = &'a T>,
    ) -> ExpressionResult<Self> {
        Self::list_valued(field, operator, values.into_iter().map(Temporal::canonical_text))
    }

    /// Builds an n-ary conjunction with every expression as a direct child
    pub fn and_of(expressions: impl IntoIterator<Item = Expression>) -> Self {
        Expression::And(expressions.into_iter().collect())
    }

    /// Builds an n-ary disjunction with every expression as a direct child
    pub fn or_of(expressions: impl IntoIterator<Item = Expression>) -> Self {
        Expression::Or(expressions.into_iter().collect())
    }

    /// Wraps `self` and `other` in a new conjunction.
    ///
    /// Compound operands are nested, not flattened.
    pub fn and(self, other: Expression) -> Self {
        Expression::And(vec![self, other])
    }

    /// Wraps `self` and `other` in a new disjunction.
    ///
    /// Compound operands are nested, not flattened.
    pub fn or(self, other: Expression) -> Self {
        Expression::Or(vec![self, other])
    }

    /// Encodes this expression as a filter document
    pub fn build(&self) -> FilterDocument {
        FilterDocument::encode(self)
    }

    /// Returns the field path of a leaf
    pub fn field(&self) -> Option<&str> {
        match self {
            Expression::Singular(s) => Some(s.field()),
            Expression::List(l) => Some(l.field()),
            Expression::And(_) | Expression::Or(_) => None,
        }
    }

    /// Returns the node operator; compound nodes report `$and` / `$or`
    pub fn operator(&self) -> Operator {
        match self {
            Expression::Singular(s) => s.operator(),
            Expression::List(l) => l.operator(),
            Expression::And(_) => Operator::And,
            Expression::Or(_) => Operator::Or,
        }
    }

    /// Returns the children of a compound node
    pub fn children(&self) -> &[Expression] {
        match self {
            Expression::And(children) | Expression::Or(children) => children,
            Expression::Singular(_) | Expression::List(_) => &[],
        }
    }

    /// Nesting depth; a leaf has depth 1
    pub fn depth(&self) -> usize {
        1 + self.children().iter().map(Expression::depth).max().unwrap_or(0)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Singular(s) => write!(f, "{} {} {}", s.field, s.operator, s.value),
            Expression::List(l) => {
                write!(f, "{} {} [", l.field, l.operator)?;
                for (i, v) in l.values.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", v)?;
                }
                f.write_str("]")
            }
            Expression::And(children) => write_compound(f, "AND", children),
            Expression::Or(children) => write_compound(f, "OR", children),
        }
    }
}

fn write_compound(f: &mut fmt::Formatter<'_>, joiner: &str, children: &[Expression]) -> fmt::Result {
    f.write_str("(")?;
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            write!(f, " {} ", joiner)?;
        }
        write!(f, "{}", child)?;
    }
    f.write_str(")")
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
