//! Schema capability trait
//!
//! The compiler reads attribute metadata only through `Schema`, so any
//! host metadata source can drive it.

use super::entity::EntitySchema;
use super::registry::SchemaRegistry;
use super::types::{Attribute, AttributeKind};

/// Read-only attribute metadata of one type.
///
/// Implementations are cheap handles; the compiler copies them freely
/// while walking a path.
pub trait Schema: Sized {
    /// Type name used in error messages and join identities
    fn type_name(&self) -> &str;

    /// Looks up an attribute by name
    fn attribute(&self, name: &str) -> Option<&Attribute>;

    /// Schema of an association's target type
    fn target_schema(&self, attribute: &Attribute) -> Option<Self>;

    /// Sub-schema of an embedded attribute
    fn embedded_schema(&self, attribute: &Attribute) -> Option<Self>;

    /// Identifier attribute, if the type declares one
    fn primary_key(&self) -> Option<&str> {
        None
    }
}

/// Handle to a registered type
#[derive(Debug, Clone, Copy)]
pub struct EntityRef<'r> {
    registry: &'r SchemaRegistry,
    entity: &'r EntitySchema,
}

impl<'r> EntityRef<'r> {
    pub(super) fn new(registry: &'r SchemaRegistry, entity: &'r EntitySchema) -> Self {
        Self { registry, entity }
    }

    /// Returns the underlying schema
    pub fn entity(&self) -> &'r EntitySchema {
        self.entity
    }
}

impl<'r> Schema for EntityRef<'r> {
    fn type_name(&self) -> &str {
        self.entity.name()
    }

    fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.entity.attribute(name)
    }

    fn target_schema(&self, attribute: &Attribute) -> Option<Self> {
        match attribute.kind() {
            AttributeKind::Association { target, .. } => self.registry.lookup(target),
            _ => None,
        }
    }

    fn embedded_schema(&self, attribute: &Attribute) -> Option<Self> {
        match attribute.kind() {
            AttributeKind::Embedded { schema } => self.registry.lookup(schema),
            _ => None,
        }
    }

    fn primary_key(&self) -> Option<&str> {
        self.entity.primary_key()
    }
}
