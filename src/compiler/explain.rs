//! Query explanation
//!
//! Renders a compiled query as parameterized JPQL-style text. Used for
//! diagnostics and tests; hosts consume `CompiledQuery` directly.

use std::fmt::{self, Write};

use super::coercion::TypedValue;
use super::context::JoinSource;
use super::predicate::{AttributePath, CompiledPredicate, CompiledQuery, Projection};

/// Renders `query` and returns the text with its positional parameters
pub fn render_sql(query: &CompiledQuery) -> (String, Vec<TypedValue>) {
    let mut renderer = Renderer::default();
    // writing into a String cannot fail
    let _ = renderer.query(query);
    let params = renderer.params.into_iter().cloned().collect();
    (renderer.out, params)
}

/// Display adapter for a compiled query
pub struct Explain<'q>(pub &'q CompiledQuery);

impl fmt::Display for Explain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut renderer = Renderer::default();
        renderer.query(self.0)?;
        f.write_str(&renderer.out)
    }
}

#[derive(Default)]
struct Renderer<'q> {
    out: String,
    params: Vec<&'q TypedValue>,
}

impl<'q> Renderer<'q> {
    fn query(&mut self, query: &'q CompiledQuery) -> fmt::Result {
        let context = &query.context;
        let root = JoinSource::Root;

        match (query.projection, context.is_distinct(), context.primary_key()) {
            (Projection::Rows, true, _) => write!(self.out, "SELECT DISTINCT {}", root)?,
            (Projection::Rows, false, _) => write!(self.out, "SELECT {}", root)?,
            (Projection::Count, true, Some(pk)) => {
                write!(self.out, "SELECT COUNT(DISTINCT {}.{})", root, pk)?
            }
            (Projection::Count, _, _) => self.out.push_str("SELECT COUNT(*)"),
        }
        write!(self.out, " FROM {} {}", context.root_type(), root)?;

        for join in context.joins() {
            write!(
                self.out,
                " {} {}.{} {}",
                join.join_type(),
                join.source(),
                join.attribute_path().join("."),
                JoinSource::Join(join.id())
            )?;
        }

        if query.predicate != CompiledPredicate::True {
            self.out.push_str(" WHERE ");
            self.predicate(&query.predicate)?;
        }
        Ok(())
    }

    fn param(&mut self, value: &'q TypedValue) -> fmt::Result {
        self.params.push(value);
        write!(self.out, "?{}", self.params.len())
    }

    fn predicate(&mut self, predicate: &'q CompiledPredicate) -> fmt::Result {
        match predicate {
            CompiledPredicate::True => self.out.push_str("1 = 1"),
            CompiledPredicate::IsNull(path) => write!(self.out, "{} IS NULL", path)?,
            CompiledPredicate::IsNotNull(path) => write!(self.out, "{} IS NOT NULL", path)?,
            CompiledPredicate::Compare {
                path,
                op,
                value,
                case_insensitive,
            } => {
                if *case_insensitive {
                    write!(self.out, "lower({}) {} ", path, op.as_str())?;
                } else {
                    write!(self.out, "{} {} ", path, op.as_str())?;
                }
                self.param(value)?;
            }
            CompiledPredicate::Like {
                path,
                pattern,
                case_insensitive,
                cast_to_text,
            } => {
                let mut lhs = path.to_string();
                if *cast_to_text {
                    lhs = format!("CAST({} AS text)", lhs);
                }
                if *case_insensitive {
                    lhs = format!("lower({})", lhs);
                }
                write!(self.out, "{} LIKE '{}'", lhs, pattern.replace('\'', "''"))?;
            }
            CompiledPredicate::In { path, values } => self.membership(path, values, "IN")?,
            CompiledPredicate::Not(inner) => match inner.as_ref() {
                CompiledPredicate::In { path, values } => self.membership(path, values, "NOT IN")?,
                other => {
                    self.out.push_str("NOT (");
                    self.predicate(other)?;
                    self.out.push(')');
                }
            },
            CompiledPredicate::And(children) => self.compound(children, " AND ", "1 = 1")?,
            CompiledPredicate::Or(children) => self.compound(children, " OR ", "1 = 0")?,
        }
        Ok(())
    }

    fn membership(
        &mut self,
        path: &AttributePath,
        values: &'q [TypedValue],
        keyword: &str,
    ) -> fmt::Result {
        write!(self.out, "{} {} (", path, keyword)?;
        for (i, value) in values.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.param(value)?;
        }
        self.out.push(')');
        Ok(())
    }

    fn compound(&mut self, children: &'q [CompiledPredicate], separator: &str, empty: &str) -> fmt::Result {
        if children.is_empty() {
            self.out.push_str(empty);
            return Ok(());
        }
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                self.out.push_str(separator);
            }
            let nested = matches!(child, CompiledPredicate::And(_) | CompiledPredicate::Or(_));
            if nested {
                self.out.push('(');
            }
            self.predicate(child)?;
            if nested {
                self.out.push(')');
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{Comparison, JoinType, QueryContext};

    fn path(source: JoinSource, segments: &[&str]) -> AttributePath {
        AttributePath {
            source,
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_render_with_join() {
        let mut context = QueryContext::new("Employee", Some("id".into()));
        let (dept, _) = context.join(
            JoinSource::Root,
            "Employee",
            vec!["department".into()],
            "Department",
            JoinType::Left,
        );
        let query = CompiledQuery {
            context,
            predicate: CompiledPredicate::Compare {
                path: path(JoinSource::Join(dept), &["name"]),
                op: Comparison::Eq,
                value: TypedValue::Text("hr".into()),
                case_insensitive: false,
            },
            projection: Projection::Rows,
        };

        let (sql, params) = render_sql(&query);
        assert_eq!(
            sql,
            "SELECT t0 FROM Employee t0 LEFT JOIN t0.department t1 WHERE t1.name = ?1"
        );
        assert_eq!(params, vec![TypedValue::Text("hr".into())]);
        assert_eq!(Explain(&query).to_string(), sql);
    }

    #[test]
    fn test_render_compound_and_negation() {
        let age = path(JoinSource::Root, &["age"]);
        let query = CompiledQuery {
            context: QueryContext::new("Employee", None),
            predicate: CompiledPredicate::Or(vec![
                CompiledPredicate::IsNull(age.clone()),
                CompiledPredicate::And(vec![
                    CompiledPredicate::Not(Box::new(CompiledPredicate::In {
                        path: age.clone(),
                        values: vec![TypedValue::Int(1), TypedValue::Int(2)],
                    })),
                    CompiledPredicate::Like {
                        path: age,
                        pattern: "%3%".into(),
                        case_insensitive: false,
                        cast_to_text: true,
                    },
                ]),
            ]),
            projection: Projection::Rows,
        };

        let (sql, params) = render_sql(&query);
        assert_eq!(
            sql,
            "SELECT t0 FROM Employee t0 WHERE t0.age IS NULL OR \
             (t0.age NOT IN (?1, ?2) AND CAST(t0.age AS text) LIKE '%3%')"
        );
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_render_count() {
        let mut context = QueryContext::new("Employee", Some("id".into()));
        context.mark_distinct();
        let query = CompiledQuery {
            context,
            predicate: CompiledPredicate::True,
            projection: Projection::Count,
        };
        assert_eq!(
            render_sql(&query).0,
            "SELECT COUNT(DISTINCT t0.id) FROM Employee t0"
        );

        let query = CompiledQuery {
            context: QueryContext::new("Employee", None),
            predicate: CompiledPredicate::And(Vec::new()),
            projection: Projection::Count,
        };
        assert_eq!(render_sql(&query).0, "SELECT COUNT(*) FROM Employee t0 WHERE 1 = 1");
    }
}
