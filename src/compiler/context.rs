//! Query builder context
//!
//! Call-scoped mutable state of one compilation: the joins created so far
//! and the duplicate-elimination flag. Joins are keyed by association
//! identity (source, owning type, attribute), never by path text, so two
//! spellings of one association share a join.

use std::collections::HashMap;
use std::fmt;

use super::field_path::JoinType;

/// Index of a join within its context
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct JoinId(pub usize);

impl fmt::Display for JoinId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // alias 0 is the root
        write!(f, "t{}", self.0 + 1)
    }
}

/// Row source an attribute is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum JoinSource {
    Root,
    Join(JoinId),
}

impl fmt::Display for JoinSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinSource::Root => f.write_str("t0"),
            JoinSource::Join(id) => write!(f, "{}", id),
        }
    }
}

/// One created join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Join {
    id: JoinId,
    source: JoinSource,
    owner_type: String,
    /// Association attribute, prefixed by any embedded attributes it sits in
    attribute_path: Vec<String>,
    target_type: String,
    join_type: JoinType,
}

impl Join {
    pub fn id(&self) -> JoinId {
        self.id
    }

    pub fn source(&self) -> JoinSource {
        self.source
    }

    /// Type owning the association attribute
    pub fn owner_type(&self) -> &str {
        &self.owner_type
    }

    pub fn attribute_path(&self) -> &[String] {
        &self.attribute_path
    }

    pub fn target_type(&self) -> &str {
        &self.target_type
    }

    pub fn join_type(&self) -> JoinType {
        self.join_type
    }
}

type AssociationKey = (JoinSource, String, Vec<String>);

/// Mutable builder state of one compilation
#[derive(Debug, Clone, PartialEq)]
pub struct QueryContext {
    root_type: String,
    primary_key: Option<String>,
    joins: Vec<Join>,
    index: HashMap<AssociationKey, JoinId>,
    distinct: bool,
}

impl QueryContext {
    /// Creates an empty context for a root type
    pub fn new(root_type: impl Into<String>, primary_key: Option<String>) -> Self {
        Self {
            root_type: root_type.into(),
            primary_key,
            joins: Vec::new(),
            index: HashMap::new(),
            distinct: false,
        }
    }

    /// Returns the join for an association, creating it on first use.
    ///
    /// The join type of the first request wins; later requests with other
    /// markers reuse the existing join. The flag is true if the join was
    /// created by this call.
    pub fn join(
        &mut self,
        source: JoinSource,
        owner_type: &str,
        attribute_path: Vec<String>,
        target_type: &str,
        join_type: JoinType,
    ) -> (JoinId, bool) {
        let key = (source, owner_type.to_string(), attribute_path);
        if let Some(&id) = self.index.get(&key) {
            return (id, false);
        }

        let id = JoinId(self.joins.len());
        self.joins.push(Join {
            id,
            source,
            owner_type: key.1.clone(),
            attribute_path: key.2.clone(),
            target_type: target_type.to_string(),
            join_type,
        });
        self.index.insert(key, id);
        (id, true)
    }

    /// Marks the query as needing duplicate elimination
    pub fn mark_distinct(&mut self) {
        self.distinct = true;
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn root_type(&self) -> &str {
        &self.root_type
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    /// Joins in creation order
    pub fn joins(&self) -> &[Join] {
        &self.joins
    }

    pub fn join_by_id(&self, id: JoinId) -> Option<&Join> {
        self.joins.get(id.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_join_reused_by_identity() {
        let mut ctx = QueryContext::new("Employee", Some("id".into()));
        let (a, created_a) =
            ctx.join(JoinSource::Root, "Employee", path(&["department"]), "Department", JoinType::Inner);
        let (b, created_b) =
            ctx.join(JoinSource::Root, "Employee", path(&["department"]), "Department", JoinType::Left);

        assert_eq!(a, b);
        assert!(created_a);
        assert!(!created_b);
        assert_eq!(ctx.joins().len(), 1);
        // first request wins
        assert_eq!(ctx.joins()[0].join_type(), JoinType::Inner);
    }

    #[test]
    fn test_same_attribute_from_different_sources() {
        let mut ctx = QueryContext::new("Employee", None);
        let (dept, _) =
            ctx.join(JoinSource::Root, "Employee", path(&["department"]), "Department", JoinType::Inner);
        let (city, _) = ctx.join(
            JoinSource::Join(dept),
            "Department",
            path(&["city"]),
            "City",
            JoinType::Inner,
        );

        assert_ne!(dept, city);
        assert_eq!(ctx.join_by_id(city).unwrap().source(), JoinSource::Join(dept));
        assert_eq!(format!("{}", JoinSource::Join(city)), "t2");
    }

    #[test]
    fn test_distinct_flag() {
        let mut ctx = QueryContext::new("Employee", None);
        assert!(!ctx.is_distinct());
        ctx.mark_distinct();
        assert!(ctx.is_distinct());
    }
}
