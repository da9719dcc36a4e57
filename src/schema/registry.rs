//! Schema registry
//!
//! Process-wide set of entity and embeddable schemas. Links are checked
//! once at build time; after that the registry is read-only and shared
//! across compilations without locking.

use std::collections::BTreeMap;

use super::entity::EntitySchema;
use super::errors::{SchemaError, SchemaResult};
use super::metadata::EntityRef;
use super::types::AttributeKind;

/// Validated, immutable set of schemas
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    types: BTreeMap<String, EntitySchema>,
}

impl SchemaRegistry {
    /// Builds a registry, rejecting duplicate names and dangling links.
    ///
    /// Association targets must be registered entities; embedded
    /// attributes must name registered embeddables.
    pub fn build(schemas: impl IntoIterator<Item = EntitySchema>) -> SchemaResult<Self> {
        let mut types = BTreeMap::new();
        for schema in schemas {
            if types.contains_key(schema.name()) {
                return Err(SchemaError::duplicate_type(schema.name()));
            }
            types.insert(schema.name().to_string(), schema);
        }

        let registry = Self { types };
        for schema in registry.types.values() {
            registry.check_links(schema)?;
        }
        Ok(registry)
    }

    fn check_links(&self, schema: &EntitySchema) -> SchemaResult<()> {
        for attribute in schema.attributes() {
            let (linked, want_embeddable) = match attribute.kind() {
                AttributeKind::Basic(_) => continue,
                AttributeKind::Embedded { schema } => (schema, true),
                AttributeKind::Association { target, .. } => (target, false),
            };

            let target = self.types.get(linked).ok_or_else(|| {
                SchemaError::malformed(
                    schema.name(),
                    format!("attribute '{}' refers to unknown type '{}'", attribute.name(), linked),
                )
                .with_type(schema.name())
            })?;

            if target.is_embeddable() != want_embeddable {
                let expected = if want_embeddable { "an embeddable" } else { "an entity" };
                return Err(SchemaError::malformed(
                    schema.name(),
                    format!(
                        "attribute '{}' expects {} but '{}' is not one",
                        attribute.name(),
                        expected,
                        linked
                    ),
                )
                .with_type(schema.name()));
            }
        }
        Ok(())
    }

    /// Returns a handle to a registered entity or embeddable
    pub fn entity(&self, name: &str) -> SchemaResult<EntityRef<'_>> {
        self.lookup(name).ok_or_else(|| SchemaError::unknown_type(name))
    }

    pub(super) fn lookup(&self, name: &str) -> Option<EntityRef<'_>> {
        self.types.get(name).map(|schema| EntityRef::new(self, schema))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.types.contains_key(name)
    }

    /// Registered type names in sorted order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{HostType, Schema, SchemaErrorCode};

    fn sample() -> Vec<EntitySchema> {
        vec![
            EntitySchema::entity("Department")
                .basic("name", HostType::Text)
                .to_one("city", "City")
                .embedded("label", "LingualString"),
            EntitySchema::entity("City").basic("name", HostType::Text),
            EntitySchema::embeddable("LingualString")
                .basic("ar", HostType::Text)
                .basic("en", HostType::Text),
        ]
    }

    #[test]
    fn test_build_and_navigate() {
        let registry = SchemaRegistry::build(sample()).unwrap();
        let department = registry.entity("Department").unwrap();

        let city_attr = department.attribute("city").unwrap();
        let city = department.target_schema(city_attr).unwrap();
        assert_eq!(city.type_name(), "City");

        let label_attr = department.attribute("label").unwrap();
        let label = department.embedded_schema(label_attr).unwrap();
        assert_eq!(label.type_name(), "LingualString");
        assert!(department.target_schema(label_attr).is_none());
    }

    #[test]
    fn test_unknown_type() {
        let registry = SchemaRegistry::build(sample()).unwrap();
        let err = registry.entity("Employee").unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AeroSchemaUnknownType);
    }

    #[test]
    fn test_duplicate_type() {
        let mut schemas = sample();
        schemas.push(EntitySchema::entity("City"));
        let err = SchemaRegistry::build(schemas).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AeroSchemaDuplicateType);
    }

    #[test]
    fn test_dangling_association() {
        let schemas = vec![EntitySchema::entity("Department").to_one("city", "City")];
        let err = SchemaRegistry::build(schemas).unwrap_err();
        assert_eq!(err.code(), SchemaErrorCode::AeroSchemaMalformed);
        assert!(err.message().contains("City"));
    }

    #[test]
    fn test_embedded_must_name_embeddable() {
        let schemas = vec![
            EntitySchema::entity("Department").embedded("city", "City"),
            EntitySchema::entity("City"),
        ];
        assert!(SchemaRegistry::build(schemas).is_err());
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<SchemaRegistry>();
    }
}
