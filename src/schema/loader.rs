//! Schema loader for loading entity definitions from disk at startup
//!
//! - One `EntityDef` per `*.json` file in the schema directory
//! - Files are read in file-name order
//! - A missing directory or a malformed file aborts startup (FATAL)

use std::fs;
use std::path::{Path, PathBuf};

use super::entity::EntitySchema;
use super::errors::{SchemaError, SchemaResult};
use super::registry::SchemaRegistry;
use super::types::EntityDef;
use crate::observability::{Event, Logger};

/// Reads entity definitions from a directory and builds a registry
pub struct SchemaLoader {
    /// Directory containing definition files
    schema_dir: PathBuf,
    /// Loaded schemas in load order
    schemas: Vec<EntitySchema>,
}

impl SchemaLoader {
    /// Creates a loader for the given schema directory
    pub fn new(schema_dir: impl Into<PathBuf>) -> Self {
        Self {
            schema_dir: schema_dir.into(),
            schemas: Vec::new(),
        }
    }

    /// Returns the schema directory path.
    pub fn schema_dir(&self) -> &Path {
        &self.schema_dir
    }

    /// Loads every definition file in the schema directory.
    pub fn load_all(&mut self) -> SchemaResult<()> {
        let dir = self.schema_dir.display().to_string();

        let entries = fs::read_dir(&self.schema_dir).map_err(|e| {
            SchemaError::malformed(&dir, format!("Failed to read schema directory: {}", e))
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                SchemaError::malformed(&dir, format!("Failed to read directory entry: {}", e))
            })?;
            let path = entry.path();

            // Skip non-JSON files
            if path.extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            paths.push(path);
        }
        paths.sort();

        for path in &paths {
            self.load_file(path)?;
        }

        Logger::event(
            Event::SchemasLoaded,
            &[
                ("count", &paths.len().to_string()),
                ("schema_dir", &dir),
            ],
        );
        Ok(())
    }

    /// Loads a single definition file.
    fn load_file(&mut self, path: &Path) -> SchemaResult<()> {
        let source = path.display().to_string();

        let content = fs::read_to_string(path)
            .map_err(|e| SchemaError::malformed(&source, format!("Failed to read file: {}", e)))?;

        let def: EntityDef = serde_json::from_str(&content)
            .map_err(|e| SchemaError::malformed(&source, format!("Invalid JSON: {}", e)))?;

        self.register(EntitySchema::from_def(&def)?);
        Ok(())
    }

    /// Registers a schema directly (for testing or programmatic creation).
    pub fn register(&mut self, schema: EntitySchema) {
        self.schemas.push(schema);
    }

    /// Returns the loaded schemas in load order.
    pub fn schemas(&self) -> &[EntitySchema] {
        &self.schemas
    }

    /// Validates links and builds the registry.
    pub fn into_registry(self) -> SchemaResult<SchemaRegistry> {
        SchemaRegistry::build(self.schemas)
    }

    /// Saves a schema definition as `<name>.json` in the schema directory.
    pub fn save_schema(&self, schema: &EntitySchema) -> SchemaResult<PathBuf> {
        let path = self.schema_dir.join(format!("{}.json", schema.name()));
        let source = path.display().to_string();

        if !self.schema_dir.exists() {
            fs::create_dir_all(&self.schema_dir).map_err(|e| {
                SchemaError::malformed(
                    self.schema_dir.display().to_string(),
                    format!("Failed to create schema directory: {}", e),
                )
            })?;
        }

        let content = serde_json::to_string_pretty(&schema.to_def())
            .map_err(|e| SchemaError::malformed(&source, format!("Failed to serialize schema: {}", e)))?;

        fs::write(&path, content)
            .map_err(|e| SchemaError::malformed(&source, format!("Failed to write file: {}", e)))?;

        Ok(path)
    }
}
