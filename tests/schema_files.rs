//! Schema File Tests
//!
//! Schema definitions loaded from a directory drive compilation:
//! - Files are read as JSON entity definitions
//! - Links between types are validated when the registry is built
//! - Saved schemas load back unchanged

mod common;

use std::fs;

use aerofilter::compiler::{render_sql, PredicateCompiler};
use aerofilter::schema::{SchemaErrorCode, SchemaLoader};
use aerofilter::{FilterConfig, FilterDocument};
use serde_json::json;
use tempfile::TempDir;

fn write(tmp: &TempDir, name: &str, value: serde_json::Value) {
    fs::write(tmp.path().join(name), value.to_string()).unwrap();
}

fn setup_schema_dir() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(
        &tmp,
        "employee.json",
        json!({
            "name": "Employee",
            "primary_key": "id",
            "attributes": [
                {"name": "id", "type": "long"},
                {"name": "name", "embedded": "LingualString"},
                {"name": "lang", "type": "enum", "constants": ["AR", "EN"]},
                {"name": "department", "association": "Department"},
                {"name": "tasks", "association": "Task", "collection": true}
            ]
        }),
    );
    write(
        &tmp,
        "department.json",
        json!({"name": "Department", "attributes": [{"name": "name", "type": "string"}]}),
    );
    write(
        &tmp,
        "task.json",
        json!({"name": "Task", "attributes": [{"name": "done", "type": "boolean"}]}),
    );
    write(
        &tmp,
        "lingual_string.json",
        json!({
            "name": "LingualString",
            "embeddable": true,
            "attributes": [{"name": "ar", "type": "text"}, {"name": "en", "type": "text"}]
        }),
    );
    fs::write(tmp.path().join("README.md"), "not a schema").unwrap();
    tmp
}

#[test]
fn test_loaded_schemas_compile_filters() {
    let tmp = setup_schema_dir();
    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();
    assert_eq!(loader.schemas().len(), 4);

    let registry = loader.into_registry().unwrap();
    let root = registry.entity("Employee").unwrap();
    let document = FilterDocument::from_value(json!({
        "name.ar": {"$icontains": "Ahmed"},
        "department?.name": "hr",
        "tasks.done": "true",
        "lang": 0
    }))
    .unwrap();

    let query = PredicateCompiler::default()
        .compile_document(&document, root)
        .unwrap();

    assert_eq!(
        render_sql(&query).0,
        "SELECT DISTINCT t0 FROM Employee t0 \
         LEFT JOIN t0.department t1 \
         INNER JOIN t0.tasks t2 \
         WHERE lower(t0.name.ar) LIKE '%ahmed%' AND t1.name = ?1 AND t2.done = ?2 AND t0.lang = ?3"
    );
}

#[test]
fn test_dangling_association_rejected() {
    let tmp = setup_schema_dir();
    fs::remove_file(tmp.path().join("department.json")).unwrap();

    let mut loader = SchemaLoader::new(tmp.path());
    loader.load_all().unwrap();
    let err = loader.into_registry().unwrap_err();

    assert_eq!(err.code(), SchemaErrorCode::AeroSchemaMalformed);
    assert_eq!(err.type_name(), Some("Employee"));
}

#[test]
fn test_invalid_definition_file_rejected() {
    let tmp = setup_schema_dir();
    write(
        &tmp,
        "broken.json",
        json!({"name": "Broken", "attributes": [{"name": "x"}]}),
    );

    let mut loader = SchemaLoader::new(tmp.path());
    let err = loader.load_all().unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::AeroSchemaMalformed);
}

#[test]
fn test_unknown_root_type() {
    let registry = common::employee_registry();
    let err = registry.entity("Manager").unwrap_err();
    assert_eq!(err.code(), SchemaErrorCode::AeroSchemaUnknownType);
}

#[test]
fn test_saved_schemas_load_back() {
    let tmp = TempDir::new().unwrap();
    let registry = common::employee_registry();

    let saver = SchemaLoader::new(tmp.path().join("schemas"));
    for name in registry.type_names() {
        let schema = registry.entity(name).unwrap();
        saver.save_schema(schema.entity()).unwrap();
    }

    let mut loader = SchemaLoader::new(tmp.path().join("schemas"));
    loader.load_all().unwrap();
    let reloaded = loader.into_registry().unwrap();

    assert_eq!(reloaded.len(), registry.len());
    for name in registry.type_names() {
        assert_eq!(
            reloaded.entity(name).unwrap().entity(),
            registry.entity(name).unwrap().entity()
        );
    }
}

#[test]
fn test_config_file_limits_apply() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("filter.json");
    fs::write(&path, r#"{"max_list_values": 2}"#).unwrap();

    let config = FilterConfig::load(&path).unwrap();
    assert_eq!(config.max_list_values, 2);
    assert_eq!(config.max_depth, 32);

    let registry = common::employee_registry();
    let root = registry.entity("Employee").unwrap();
    let document = FilterDocument::from_value(json!({"age": [1, 2, 3]})).unwrap();

    let err = PredicateCompiler::new(config)
        .compile_document(&document, root)
        .unwrap_err();
    assert_eq!(err.code(), "AERO_FILTER_LIMIT_EXCEEDED");
}
