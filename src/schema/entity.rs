//! Entity schemas
//!
//! Attribute metadata for one entity or embeddable type, with lookup by
//! attribute name.

use std::collections::HashMap;

use super::errors::{SchemaError, SchemaResult};
use super::types::{Attribute, AttributeDef, AttributeKind, EntityDef, HostType};

/// Attribute metadata of one type
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySchema {
    name: String,
    primary_key: Option<String>,
    embeddable: bool,
    attributes: Vec<Attribute>,
    index: HashMap<String, usize>,
}

impl EntitySchema {
    /// Creates an entity schema with no attributes
    pub fn entity(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            primary_key: None,
            embeddable: false,
            attributes: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Creates an embeddable schema with no attributes
    pub fn embeddable(name: impl Into<String>) -> Self {
        Self {
            embeddable: true,
            ..Self::entity(name)
        }
    }

    /// Builds a schema from its file definition
    pub fn from_def(def: &EntityDef) -> SchemaResult<Self> {
        let mut schema = if def.embeddable {
            Self::embeddable(&def.name)
        } else {
            Self::entity(&def.name)
        };
        schema.primary_key = def.primary_key.clone();

        for attribute_def in &def.attributes {
            let attribute = attribute_def
                .to_attribute()
                .map_err(|reason| SchemaError::malformed(&def.name, reason).with_type(&def.name))?;
            schema.push(attribute)?;
        }

        if let Some(pk) = &schema.primary_key {
            if schema.attribute(pk).and_then(Attribute::host_type).is_none() {
                return Err(SchemaError::malformed(
                    &def.name,
                    format!("primary key '{}' is not a basic attribute", pk),
                )
                .with_type(&def.name));
            }
        }

        Ok(schema)
    }

    /// Converts back into a file definition
    pub fn to_def(&self) -> EntityDef {
        EntityDef {
            name: self.name.clone(),
            primary_key: self.primary_key.clone(),
            embeddable: self.embeddable,
            attributes: self.attributes.iter().map(AttributeDef::from_attribute).collect(),
        }
    }

    /// Sets the identifier attribute
    pub fn with_primary_key(mut self, name: impl Into<String>) -> Self {
        self.primary_key = Some(name.into());
        self
    }

    /// Adds a basic attribute
    pub fn basic(self, name: impl Into<String>, host_type: HostType) -> Self {
        self.with(Attribute::new(name, AttributeKind::Basic(host_type)))
    }

    /// Adds an embedded attribute
    pub fn embedded(self, name: impl Into<String>, schema: impl Into<String>) -> Self {
        self.with(Attribute::new(
            name,
            AttributeKind::Embedded {
                schema: schema.into(),
            },
        ))
    }

    /// Adds a to-one association
    pub fn to_one(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.with(Attribute::new(
            name,
            AttributeKind::Association {
                target: target.into(),
                collection: false,
            },
        ))
    }

    /// Adds a to-many association
    pub fn to_many(self, name: impl Into<String>, target: impl Into<String>) -> Self {
        self.with(Attribute::new(
            name,
            AttributeKind::Association {
                target: target.into(),
                collection: true,
            },
        ))
    }

    /// Adds an attribute, replacing one with the same name
    pub fn with(mut self, attribute: Attribute) -> Self {
        match self.index.get(attribute.name()) {
            Some(&i) => self.attributes[i] = attribute,
            None => {
                self.index.insert(attribute.name().to_string(), self.attributes.len());
                self.attributes.push(attribute);
            }
        }
        self
    }

    fn push(&mut self, attribute: Attribute) -> SchemaResult<()> {
        if self.index.contains_key(attribute.name()) {
            return Err(SchemaError::malformed(
                &self.name,
                format!("attribute '{}' is declared twice", attribute.name()),
            )
            .with_type(&self.name));
        }
        self.index.insert(attribute.name().to_string(), self.attributes.len());
        self.attributes.push(attribute);
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_key(&self) -> Option<&str> {
        self.primary_key.as_deref()
    }

    pub fn is_embeddable(&self) -> bool {
        self.embeddable
    }

    /// Looks up an attribute by exact name
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.index.get(name).map(|&i| &self.attributes[i])
    }

    /// Attributes in declaration order
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }
}
