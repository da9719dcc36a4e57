//! Field-path parsing and join markers
//!
//! A path is `segment(.segment)*`. A non-terminal segment may request a
//! join type for the association it names:
//!
//! ```text
//! <department.name     left join
//! department?.name     left join
//! <department?.name    left join (markers are redundant, not an error)
//! >department.name     right join
//! department.name      inner join
//! ```
//!
//! Markers on the terminal segment are not recognized; the raw text is
//! looked up as an attribute name.

use std::fmt;

use super::errors::{CompileError, CompileResult};

/// Join semantics for one association segment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum JoinType {
    #[default]
    Inner,
    Left,
    Right,
}

impl JoinType {
    /// SQL keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinType::Inner => "INNER JOIN",
            JoinType::Left => "LEFT JOIN",
            JoinType::Right => "RIGHT JOIN",
        }
    }
}

impl fmt::Display for JoinType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// First segment of a path, markers removed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathSegment<'a> {
    /// Attribute name
    pub name: &'a str,
    /// Requested join type; always `Inner` for a terminal segment
    pub join_type: JoinType,
}

/// Splits `path` into its first segment and the remaining path.
///
/// Fails with `AERO_FILTER_INVALID_PATH` on an empty segment.
pub fn split_first(path: &str) -> CompileResult<(PathSegment<'_>, Option<&str>)> {
    let (head, rest) = match path.split_once('.') {
        Some((head, rest)) => (head, Some(rest)),
        None => (path, None),
    };

    let segment = match rest {
        Some(_) => parse_marked(head),
        None => PathSegment {
            name: head,
            join_type: JoinType::Inner,
        },
    };

    if segment.name.is_empty() || rest.is_some_and(str::is_empty) {
        return Err(CompileError::invalid_path(path, "empty path segment"));
    }
    Ok((segment, rest))
}

/// Number of segments in a path
pub fn segment_count(path: &str) -> usize {
    path.split('.').count()
}

fn parse_marked(raw: &str) -> PathSegment<'_> {
    let unprefixed = raw.trim_start_matches(&['<', '>'][..]);
    let prefix = &raw[..raw.len() - unprefixed.len()];
    let (name, optional) = match unprefixed.strip_suffix('?') {
        Some(name) => (name, true),
        None => (unprefixed, false),
    };

    let join_type = if prefix.contains('<') || optional {
        JoinType::Left
    } else if prefix.contains('>') {
        JoinType::Right
    } else {
        JoinType::Inner
    };

    PathSegment { name, join_type }
}
