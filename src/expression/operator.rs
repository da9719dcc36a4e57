//! Operator registry
//!
//! The closed set of comparison, containment and structural operators.
//! Tokens are the wire names used inside filter documents (`$eq`, `$in`, ...).

use std::fmt;

use serde::{Deserialize, Serialize};

use super::errors::{ExpressionError, ExpressionResult};

/// Filter operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// `col = val`, or `col is null` when val is null
    #[serde(rename = "$eq")]
    Eq,
    /// `col <> val`, or `col is not null` when val is null
    #[serde(rename = "$ne")]
    Ne,
    /// `lower(col) = lower(val)`
    #[serde(rename = "$ieq")]
    Ieq,

    #[serde(rename = "$gt")]
    Gt,
    #[serde(rename = "$gte")]
    Gte,
    #[serde(rename = "$lt")]
    Lt,
    #[serde(rename = "$lte")]
    Lte,

    /// `col like 'val%'`
    #[serde(rename = "$start")]
    Start,
    /// `col like '%val'`
    #[serde(rename = "$end")]
    End,
    /// `col like '%val%'`
    #[serde(rename = "$contains")]
    Contains,
    #[serde(rename = "$istart")]
    Istart,
    #[serde(rename = "$iend")]
    Iend,
    #[serde(rename = "$icontains")]
    Icontains,

    /// `col in (v1, v2, ...)`
    #[serde(rename = "$in")]
    In,
    /// `col not in (v1, v2, ...)`
    #[serde(rename = "$nin")]
    Nin,

    #[serde(rename = "$and")]
    And,
    #[serde(rename = "$or")]
    Or,
}

impl Operator {
    /// Every registered operator, in declaration order
    pub const ALL: [Operator; 17] = [
        Operator::Eq,
        Operator::Ne,
        Operator::Ieq,
        Operator::Gt,
        Operator::Gte,
        Operator::Lt,
        Operator::Lte,
        Operator::Start,
        Operator::End,
        Operator::Contains,
        Operator::Istart,
        Operator::Iend,
        Operator::Icontains,
        Operator::In,
        Operator::Nin,
        Operator::And,
        Operator::Or,
    ];

    /// Returns the wire token
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Eq => "$eq",
            Operator::Ne => "$ne",
            Operator::Ieq => "$ieq",
            Operator::Gt => "$gt",
            Operator::Gte => "$gte",
            Operator::Lt => "$lt",
            Operator::Lte => "$lte",
            Operator::Start => "$start",
            Operator::End => "$end",
            Operator::Contains => "$contains",
            Operator::Istart => "$istart",
            Operator::Iend => "$iend",
            Operator::Icontains => "$icontains",
            Operator::In => "$in",
            Operator::Nin => "$nin",
            Operator::And => "$and",
            Operator::Or => "$or",
        }
    }

    /// Returns true if the operator takes a list of values
    pub fn is_list(&self) -> bool {
        matches!(self, Operator::In | Operator::Nin)
    }

    /// Returns true for `$and` / `$or`
    pub fn is_structural(&self) -> bool {
        matches!(self, Operator::And | Operator::Or)
    }

    /// Returns true if a null operand is meaningful (null tests)
    pub fn accepts_null(&self) -> bool {
        matches!(self, Operator::Eq | Operator::Ne)
    }

    /// Parses an operator token.
    ///
    /// Comparison tokens match exactly. Structural tokens are matched
    /// case-insensitively, as they are when used as document keys.
    pub fn parse(token: &str) -> ExpressionResult<Self> {
        if let Some(structural) = Self::parse_structural(token) {
            return Ok(structural);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|op| op.as_str() == token)
            .ok_or_else(|| ExpressionError::unknown_operator(token))
    }

    /// Recognizes `$and` / `$or` keys, ignoring ASCII case
    pub fn parse_structural(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case(Operator::And.as_str()) {
            Some(Operator::And)
        } else if key.eq_ignore_ascii_case(Operator::Or.as_str()) {
            Some(Operator::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
