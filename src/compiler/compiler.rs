//! Predicate compiler
//!
//! Walks expressions against a schema and emits a `CompiledPredicate`.
//! Each leaf path is resolved one segment at a time:
//! - association with a remainder: get or create the join, continue on
//!   the target type (collections mark the query distinct)
//! - embedded with a remainder: continue on the sub-schema, same row
//! - basic attribute at the end: coerce the operand and map the operator
//!
//! Compilation is synchronous and performs no I/O. All mutable state lives
//! in the `QueryContext` of the call.

use std::sync::Arc;

use serde_json::Value;

use super::coercion::{coerce, coerce_list, TypedValue};
use super::context::{JoinSource, QueryContext};
use super::errors::{CompileError, CompileResult};
use super::field_path::{segment_count, split_first};
use super::predicate::{AttributePath, Comparison, CompiledPredicate, CompiledQuery, Projection};
use crate::config::FilterConfig;
use crate::document::FilterDocument;
use crate::expression::{Expression, Operator};
use crate::observability::{Event, Logger, MetricsRegistry};
use crate::schema::{AttributeKind, HostType, Schema};
use crate::FilterResult;

/// Raw operand of a leaf
#[derive(Debug, Clone, Copy)]
enum Operand<'e> {
    Single(&'e Value),
    List(&'e [Value]),
}

/// Compiles filter expressions into backend predicates
#[derive(Debug, Clone, Default)]
pub struct PredicateCompiler {
    config: FilterConfig,
    metrics: Option<Arc<MetricsRegistry>>,
}

impl PredicateCompiler {
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            metrics: None,
        }
    }

    /// Records counters into a shared registry
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Compiles an implicitly conjoined expression list against `root`.
    ///
    /// An empty list compiles to `True`; a single expression is returned
    /// unwrapped; several are combined with AND.
    pub fn compile<S: Schema>(&self, expressions: &[Expression], root: S) -> CompileResult<CompiledQuery> {
        self.compile_projection(expressions, root, Projection::Rows)
    }

    /// Compiles for a count projection
    pub fn compile_count<S: Schema>(&self, expressions: &[Expression], root: S) -> CompileResult<CompiledQuery> {
        self.compile_projection(expressions, root, Projection::Count)
    }

    /// Decodes a document and compiles it
    pub fn compile_document<S: Schema>(&self, document: &FilterDocument, root: S) -> FilterResult<CompiledQuery> {
        let expressions = document.expressions()?;
        if let Some(metrics) = &self.metrics {
            metrics.increment_documents_decoded();
        }
        if Logger::enabled(Event::FilterDecoded.severity()) {
            Logger::event(
                Event::FilterDecoded,
                &[
                    ("expressions", &expressions.len().to_string()),
                    ("root", root.type_name()),
                ],
            );
        }
        Ok(self.compile(&expressions, root)?)
    }

    fn compile_projection<S: Schema>(
        &self,
        expressions: &[Expression],
        root: S,
        projection: Projection,
    ) -> CompileResult<CompiledQuery> {
        let mut context = QueryContext::new(root.type_name(), root.primary_key().map(str::to_string));
        let predicate = self.compile_into(expressions, root, &mut context)?;
        Ok(CompiledQuery {
            context,
            predicate,
            projection,
        })
    }

    /// Compiles into a caller-owned context.
    ///
    /// Joins already present in `context` are reused.
    pub fn compile_into<S: Schema>(
        &self,
        expressions: &[Expression],
        root: S,
        context: &mut QueryContext,
    ) -> CompileResult<CompiledPredicate> {
        let root_type = root.type_name().to_string();
        self.log_begin(expressions, &root_type);

        let was_distinct = context.is_distinct();
        let mut walk = Walk {
            config: &self.config,
            context: &mut *context,
            joins_created: 0,
        };

        let result = walk.compile_all(expressions, &root);
        let joins_created = walk.joins_created;
        let distinct = context.is_distinct();

        match &result {
            Ok(_) => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_compilations();
                    metrics.add_joins(joins_created);
                    if distinct && !was_distinct {
                        metrics.increment_distinct_queries();
                    }
                }
                if Logger::enabled(Event::FilterCompileComplete.severity()) {
                    Logger::event(
                        Event::FilterCompileComplete,
                        &[
                            ("distinct", &distinct.to_string()),
                            ("joins", &context.joins().len().to_string()),
                            ("root", &root_type),
                        ],
                    );
                }
            }
            Err(err) => {
                if let Some(metrics) = &self.metrics {
                    metrics.increment_rejections();
                }
                Logger::event(
                    Event::FilterCompileRejected,
                    &[
                        ("code", err.code().code()),
                        ("field", err.field().unwrap_or("")),
                        ("message", err.message()),
                        ("root", &root_type),
                    ],
                );
            }
        }
        result
    }

    fn log_begin(&self, expressions: &[Expression], root_type: &str) {
        if self.config.log_expressions && Logger::enabled(Event::FilterDocument.severity()) {
            let document = Expression::and_of(expressions.iter().cloned()).build();
            Logger::event(
                Event::FilterDocument,
                &[("document", &document.to_string()), ("root", root_type)],
            );
        }
        if Logger::enabled(Event::FilterCompileBegin.severity()) {
            Logger::event(
                Event::FilterCompileBegin,
                &[("expressions", &expressions.len().to_string()), ("root", root_type)],
            );
        }
    }
}

/// State of one compile call
struct Walk<'c> {
    config: &'c FilterConfig,
    context: &'c mut QueryContext,
    joins_created: u64,
}

impl<'c> Walk<'c> {
    fn compile_all<S: Schema>(&mut self, expressions: &[Expression], root: &S) -> CompileResult<CompiledPredicate> {
        for expression in expressions {
            let nesting = expression.depth() - 1;
            if nesting > self.config.max_depth {
                return Err(CompileError::limit_exceeded("filter depth", nesting, self.config.max_depth));
            }
        }

        let mut predicates = expressions
            .iter()
            .map(|e| self.compile_node(e, root))
            .collect::<CompileResult<Vec<_>>>()?;

        Ok(match predicates.len() {
            0 => CompiledPredicate::True,
            1 => predicates.remove(0),
            _ => CompiledPredicate::And(predicates),
        })
    }

    fn compile_node<S: Schema>(&mut self, expression: &Expression, root: &S) -> CompileResult<CompiledPredicate> {
        match expression {
            Expression::Singular(s) => {
                self.compile_leaf(root, s.field(), s.operator(), Operand::Single(s.value()))
            }
            Expression::List(l) => {
                if l.values().len() > self.config.max_list_values {
                    return Err(CompileError::limit_exceeded(
                        "list size",
                        l.values().len(),
                        self.config.max_list_values,
                    )
                    .with_field(l.field()));
                }
                self.compile_leaf(root, l.field(), l.operator(), Operand::List(l.values()))
            }
            Expression::And(children) => Ok(CompiledPredicate::And(
                children
                    .iter()
                    .map(|c| self.compile_node(c, root))
                    .collect::<CompileResult<_>>()?,
            )),
            Expression::Or(children) => Ok(CompiledPredicate::Or(
                children
                    .iter()
                    .map(|c| self.compile_node(c, root))
                    .collect::<CompileResult<_>>()?,
            )),
        }
    }

    fn compile_leaf<S: Schema>(
        &mut self,
        root: &S,
        field: &str,
        operator: Operator,
        operand: Operand<'_>,
    ) -> CompileResult<CompiledPredicate> {
        let segments = segment_count(field);
        if segments > self.config.max_path_segments {
            return Err(CompileError::limit_exceeded(
                "path segments",
                segments,
                self.config.max_path_segments,
            )
            .with_field(field));
        }
        self.resolve(root, JoinSource::Root, &[], field, field, operator, operand)
    }

    /// Resolves `path` one segment at a time. `prefix` holds the embedded
    /// attributes walked since the last join.
    #[allow(clippy::too_many_arguments)]
    fn resolve<S: Schema>(
        &mut self,
        schema: &S,
        source: JoinSource,
        prefix: &[String],
        field: &str,
        path: &str,
        operator: Operator,
        operand: Operand<'_>,
    ) -> CompileResult<CompiledPredicate> {
        let (segment, rest) = split_first(path).map_err(|e| e.with_field(field))?;
        let attribute = schema
            .attribute(segment.name)
            .ok_or_else(|| CompileError::unknown_attribute(segment.name, schema.type_name()).with_field(field))?;

        let mut attribute_path = prefix.to_vec();
        attribute_path.push(attribute.name().to_string());

        match (attribute.kind(), rest) {
            (AttributeKind::Association { collection, .. }, Some(rest)) => {
                if *collection {
                    self.context.mark_distinct();
                }
                let target = schema.target_schema(attribute).ok_or_else(|| {
                    CompileError::invalid_path(
                        field,
                        format!("target type of '{}' is not available", attribute.name()),
                    )
                })?;
                let (id, created) = self.context.join(
                    source,
                    schema.type_name(),
                    attribute_path,
                    target.type_name(),
                    segment.join_type,
                );
                if created {
                    self.joins_created += 1;
                }
                self.resolve(&target, JoinSource::Join(id), &[], field, rest, operator, operand)
            }
            (AttributeKind::Embedded { .. }, Some(rest)) => {
                let embedded = schema.embedded_schema(attribute).ok_or_else(|| {
                    CompileError::invalid_path(
                        field,
                        format!("schema of embedded '{}' is not available", attribute.name()),
                    )
                })?;
                self.resolve(&embedded, source, &attribute_path, field, rest, operator, operand)
            }
            (AttributeKind::Basic(_), Some(_)) => Err(CompileError::invalid_path(
                field,
                format!("'{}' is a basic attribute and has no sub-attributes", attribute.name()),
            )),
            (AttributeKind::Basic(host_type), None) => {
                let path = AttributePath {
                    source,
                    segments: attribute_path,
                };
                terminal(path, host_type, field, operator, operand)
            }
            (AttributeKind::Association { collection: false, .. }, None) => {
                let path = AttributePath {
                    source,
                    segments: attribute_path,
                };
                match (operator, operand) {
                    (Operator::Eq, Operand::Single(Value::Null)) => Ok(CompiledPredicate::IsNull(path)),
                    (Operator::Ne, Operand::Single(Value::Null)) => Ok(CompiledPredicate::IsNotNull(path)),
                    _ => Err(CompileError::invalid_path(
                        field,
                        "a to-one association only supports null tests; name one of its attributes",
                    )),
                }
            }
            (AttributeKind::Association { collection: true, .. }, None) => Err(CompileError::invalid_path(
                field,
                "a collection cannot be compared; name one of its attributes",
            )),
            (AttributeKind::Embedded { .. }, None) => Err(CompileError::invalid_path(
                field,
                "an embedded attribute cannot be compared; name one of its attributes",
            )),
        }
    }
}

/// Maps an operator on a basic attribute to a predicate
fn terminal(
    path: AttributePath,
    host_type: &HostType,
    field: &str,
    operator: Operator,
    operand: Operand<'_>,
) -> CompileResult<CompiledPredicate> {
    let raw = match operand {
        Operand::List(values) => {
            let values = coerce_list(values, host_type, field)?;
            let membership = CompiledPredicate::In { path, values };
            return Ok(match operator {
                Operator::Nin => CompiledPredicate::Not(Box::new(membership)),
                _ => membership,
            });
        }
        Operand::Single(raw) => raw,
    };

    let value = coerce(raw, host_type, field)?;

    let predicate = match operator {
        Operator::Eq if value.is_null() => CompiledPredicate::IsNull(path),
        Operator::Ne if value.is_null() => CompiledPredicate::IsNotNull(path),
        Operator::Eq => compare(path, Comparison::Eq, value),
        Operator::Ne => compare(path, Comparison::Ne, value),
        Operator::Ieq => {
            if *host_type != HostType::Text {
                return Err(CompileError::text_required(field, host_type.type_name(), operator));
            }
            CompiledPredicate::Compare {
                path,
                op: Comparison::Eq,
                value: value.to_lowercase(),
                case_insensitive: true,
            }
        }
        Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
            if !host_type.is_comparable() {
                return Err(CompileError::type_not_comparable(field, host_type.type_name(), operator));
            }
            let op = match operator {
                Operator::Gt => Comparison::Gt,
                Operator::Gte => Comparison::Gte,
                Operator::Lt => Comparison::Lt,
                _ => Comparison::Lte,
            };
            compare(path, op, value)
        }
        Operator::Start
        | Operator::End
        | Operator::Contains
        | Operator::Istart
        | Operator::Iend
        | Operator::Icontains => {
            let case_insensitive = matches!(
                operator,
                Operator::Istart | Operator::Iend | Operator::Icontains
            );
            // the operand is matched as the caller wrote it; coercion only validates
            let written = match raw {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            let text = if case_insensitive {
                written.to_lowercase()
            } else {
                written
            };
            let pattern = match operator {
                Operator::Start | Operator::Istart => format!("{}%", text),
                Operator::End | Operator::Iend => format!("%{}", text),
                _ => format!("%{}%", text),
            };
            CompiledPredicate::Like {
                path,
                pattern,
                case_insensitive,
                cast_to_text: *host_type != HostType::Text,
            }
        }
        Operator::In | Operator::Nin | Operator::And | Operator::Or => {
            return Err(CompileError::invalid_path(
                field,
                format!("operator {} cannot compare a single value", operator),
            ))
        }
    };
    Ok(predicate)
}

fn compare(path: AttributePath, op: Comparison, value: TypedValue) -> CompiledPredicate {
    CompiledPredicate::Compare {
        path,
        op,
        value,
        case_insensitive: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{CompileErrorCode, JoinType};
    use crate::schema::{EntitySchema, SchemaRegistry};
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::build(vec![
            EntitySchema::entity("Employee")
                .with_primary_key("id")
                .basic("id", HostType::Long)
                .basic("lastName", HostType::Text)
                .basic("age", HostType::Int)
                .basic("type", HostType::Short)
                .basic("salary", HostType::Double)
                .basic("blob", HostType::Opaque("blob".into()))
                .embedded("name", "LingualString")
                .to_one("department", "Department")
                .to_many("tasks", "Task"),
            EntitySchema::entity("Department")
                .basic("name", HostType::Text)
                .to_one("city", "City"),
            EntitySchema::entity("City").basic("name", HostType::Text),
            EntitySchema::entity("Task").basic("name", HostType::Text),
            EntitySchema::embeddable("LingualString")
                .basic("ar", HostType::Text)
                .basic("en", HostType::Text),
        ])
        .unwrap()
    }

    fn leaf(field: &str, op: Operator, value: Value) -> Expression {
        Expression::of(field, op, value).unwrap()
    }

    fn compile(exprs: &[Expression]) -> CompileResult<CompiledQuery> {
        let registry = registry();
        let root = registry.entity("Employee").unwrap();
        PredicateCompiler::default().compile(exprs, root)
    }

    fn root_path(segments: &[&str]) -> AttributePath {
        AttributePath {
            source: JoinSource::Root,
            segments: segments.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_empty_list_is_true() {
        assert_eq!(compile(&[]).unwrap().predicate, CompiledPredicate::True);
    }

    #[test]
    fn test_single_expression_unwrapped() {
        let q = compile(&[leaf("lastName", Operator::Eq, json!("ibrahim"))]).unwrap();
        assert_eq!(
            q.predicate,
            CompiledPredicate::Compare {
                path: root_path(&["lastName"]),
                op: Comparison::Eq,
                value: TypedValue::Text("ibrahim".into()),
                case_insensitive: false,
            }
        );
    }

    #[test]
    fn test_several_expressions_anded() {
        let q = compile(&[
            leaf("lastName", Operator::Eq, Value::Null),
            leaf("age", Operator::Ne, Value::Null),
        ])
        .unwrap();
        assert_eq!(
            q.predicate,
            CompiledPredicate::And(vec![
                CompiledPredicate::IsNull(root_path(&["lastName"])),
                CompiledPredicate::IsNotNull(root_path(&["age"])),
            ])
        );
    }

    #[test]
    fn test_two_level_association() {
        let q = compile(&[leaf("department.city.name", Operator::Eq, json!("Cairo"))]).unwrap();
        let joins = q.context.joins();
        assert_eq!(joins.len(), 2);
        assert_eq!(joins[0].target_type(), "Department");
        assert_eq!(joins[1].target_type(), "City");
        assert!(joins.iter().all(|j| j.join_type() == JoinType::Inner));
        assert!(!q.is_distinct());
    }

    #[test]
    fn test_join_reused_across_leaves() {
        let q = compile(&[
            leaf("department.name", Operator::Eq, json!("hr")),
            leaf("<department.city.name", Operator::Eq, json!("Cairo")),
        ])
        .unwrap();
        assert_eq!(q.context.joins().len(), 2);
        assert_eq!(q.context.joins()[0].join_type(), JoinType::Inner);
    }

    #[test]
    fn test_collection_marks_distinct() {
        let q = compile(&[leaf("tasks.name", Operator::Eq, json!("a"))]).unwrap();
        assert!(q.is_distinct());
    }

    #[test]
    fn test_embedded_has_no_join() {
        let q = compile(&[leaf("name.en", Operator::Istart, json!("Ab"))]).unwrap();
        assert!(q.context.joins().is_empty());
        assert_eq!(
            q.predicate,
            CompiledPredicate::Like {
                path: root_path(&["name", "en"]),
                pattern: "ab%".into(),
                case_insensitive: true,
                cast_to_text: false,
            }
        );
    }

    #[test]
    fn test_unknown_attribute() {
        let err = compile(&[leaf("invalidFieldName", Operator::Eq, json!(1))]).unwrap_err();
        assert_eq!(err.code(), CompileErrorCode::AeroFilterUnknownAttribute);
        assert!(err.message().contains("invalidFieldName"));
        assert!(err.message().contains("Employee"));
    }

    #[test]
    fn test_ordering_on_opaque_rejected() {
        let err = compile(&[leaf("blob", Operator::Gt, json!(1))]).unwrap_err();
        assert_eq!(err.code(), CompileErrorCode::AeroFilterTypeNotComparable);
    }

    #[test]
    fn test_ieq_requires_text() {
        let err = compile(&[leaf("age", Operator::Ieq, json!(1))]).unwrap_err();
        assert_eq!(err.code(), CompileErrorCode::AeroFilterTypeNotComparable);
        assert!(err.message().contains("text"));
        assert!(err.message().contains("'age'"));
    }

    #[test]
    fn test_nin_is_negated_in() {
        let q = compile(&[leaf("type", Operator::Nin, json!([1, 2]))]).unwrap();
        assert_eq!(
            q.predicate,
            CompiledPredicate::Not(Box::new(CompiledPredicate::In {
                path: root_path(&["type"]),
                values: vec![TypedValue::Short(1), TypedValue::Short(2)],
            }))
        );
    }

    #[test]
    fn test_like_on_number_casts() {
        let q = compile(&[leaf("age", Operator::Contains, json!(3))]).unwrap();
        match q.predicate {
            CompiledPredicate::Like { pattern, cast_to_text, .. } => {
                assert_eq!(pattern, "%3%");
                assert!(cast_to_text);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_like_on_double_keeps_operand_text() {
        let cases = [
            (Operator::Contains, json!(3), "%3%"),
            (Operator::Start, json!("1"), "1%"),
            (Operator::End, json!(2.50), "%2.5"),
        ];
        for (op, operand, expected) in cases {
            let q = compile(&[leaf("salary", op, operand)]).unwrap();
            match q.predicate {
                CompiledPredicate::Like { pattern, cast_to_text, .. } => {
                    assert_eq!(pattern, expected);
                    assert!(cast_to_text);
                }
                other => panic!("unexpected {:?}", other),
            }
        }
    }

    #[test]
    fn test_like_keeps_leading_zeros() {
        let q = compile(&[leaf("age", Operator::Start, json!("04"))]).unwrap();
        assert!(matches!(q.predicate, CompiledPredicate::Like { ref pattern, .. } if pattern == "04%"));
    }

    #[test]
    fn test_like_still_validates_operand() {
        let err = compile(&[leaf("salary", Operator::Contains, json!("abc"))]).unwrap_err();
        assert_eq!(err.code(), CompileErrorCode::AeroFilterValueConversion);
    }

    #[test]
    fn test_invalid_paths() {
        for field in ["tasks", "name", "lastName.first"] {
            let err = compile(&[leaf(field, Operator::Eq, json!("x"))]).unwrap_err();
            assert_eq!(err.code(), CompileErrorCode::AeroFilterInvalidPath, "{}", field);
        }
        let q = compile(&[leaf("department", Operator::Eq, Value::Null)]).unwrap();
        assert!(matches!(q.predicate, CompiledPredicate::IsNull(_)));
    }

    #[test]
    fn test_limits() {
        let config = FilterConfig {
            max_depth: 1,
            max_list_values: 2,
            max_path_segments: 2,
            log_expressions: false,
        };
        let registry = registry();
        let root = registry.entity("Employee").unwrap();
        let compiler = PredicateCompiler::new(config);

        let deep = Expression::and_of([Expression::or_of([leaf("age", Operator::Eq, json!(1))])]);
        let long = leaf("age", Operator::In, json!([1, 2, 3]));
        let far = leaf("department.city.name", Operator::Eq, json!("x"));

        for expr in [deep, long, far] {
            let err = compiler.compile(&[expr], root).unwrap_err();
            assert_eq!(err.code(), CompileErrorCode::AeroFilterLimitExceeded);
        }
    }

    #[test]
    fn test_metrics_recorded() {
        let metrics = Arc::new(MetricsRegistry::new());
        let registry = registry();
        let root = registry.entity("Employee").unwrap();
        let compiler = PredicateCompiler::default().with_metrics(Arc::clone(&metrics));

        compiler
            .compile(&[leaf("tasks.name", Operator::Eq, json!("a"))], root)
            .unwrap();
        compiler
            .compile(&[leaf("nope", Operator::Eq, json!("a"))], root)
            .unwrap_err();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.compilations, 1);
        assert_eq!(snapshot.rejections, 1);
        assert_eq!(snapshot.joins_created, 1);
        assert_eq!(snapshot.distinct_queries, 1);
    }
}
