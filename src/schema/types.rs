//! Schema type definitions
//!
//! Host types a basic attribute can declare:
//! - text, bool
//! - byte, short, int, long, float, double
//! - uuid
//! - date, datetime, instant, offset_datetime, zoned_datetime, hijrah_date
//! - enum (with declared constants)
//!
//! Any other type name is kept as an opaque type: values pass through
//! unchanged and ordering operators are rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Target type of a basic attribute
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostType {
    Text,
    Bool,
    Byte,
    Short,
    Int,
    Long,
    Float,
    Double,
    Uuid,
    /// Calendar date without time
    Date,
    /// Local date-time without offset
    DateTime,
    /// UTC instant
    Instant,
    OffsetDateTime,
    ZonedDateTime,
    HijrahDate,
    /// Enumerated type; constants are in ordinal order
    Enum { name: String, constants: Vec<String> },
    /// Unrecognized type name
    Opaque(String),
}

impl HostType {
    /// Resolves a declared type name. Unknown names become `Opaque`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "text" | "string" => HostType::Text,
            "bool" | "boolean" => HostType::Bool,
            "byte" => HostType::Byte,
            "short" => HostType::Short,
            "int" | "integer" => HostType::Int,
            "long" => HostType::Long,
            "float" => HostType::Float,
            "double" => HostType::Double,
            "uuid" => HostType::Uuid,
            "date" => HostType::Date,
            "datetime" => HostType::DateTime,
            "instant" => HostType::Instant,
            "offset_datetime" => HostType::OffsetDateTime,
            "zoned_datetime" => HostType::ZonedDateTime,
            "hijrah_date" => HostType::HijrahDate,
            other => HostType::Opaque(other.to_string()),
        }
    }

    /// Creates an enum type
    pub fn enumeration<S: Into<String>>(name: impl Into<String>, constants: impl IntoIterator<Item = S>) -> Self {
        HostType::Enum {
            name: name.into(),
            constants: constants.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the type name for error messages
    pub fn type_name(&self) -> &str {
        match self {
            HostType::Text => "text",
            HostType::Bool => "bool",
            HostType::Byte => "byte",
            HostType::Short => "short",
            HostType::Int => "int",
            HostType::Long => "long",
            HostType::Float => "float",
            HostType::Double => "double",
            HostType::Uuid => "uuid",
            HostType::Date => "date",
            HostType::DateTime => "datetime",
            HostType::Instant => "instant",
            HostType::OffsetDateTime => "offset_datetime",
            HostType::ZonedDateTime => "zoned_datetime",
            HostType::HijrahDate => "hijrah_date",
            HostType::Enum { name, .. } => name,
            HostType::Opaque(name) => name,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            HostType::Byte
                | HostType::Short
                | HostType::Int
                | HostType::Long
                | HostType::Float
                | HostType::Double
        )
    }

    /// Returns true if ordering operators apply. Enums order by ordinal.
    pub fn is_comparable(&self) -> bool {
        !matches!(self, HostType::Opaque(_))
    }
}

impl fmt::Display for HostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// Shape of an attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeKind {
    /// Scalar column
    Basic(HostType),
    /// Same-row composite with its own sub-schema
    Embedded { schema: String },
    /// Reference to another entity
    Association { target: String, collection: bool },
}

/// Attribute metadata
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    name: String,
    kind: AttributeKind,
}

impl Attribute {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    pub fn is_association(&self) -> bool {
        matches!(self.kind, AttributeKind::Association { .. })
    }

    /// Returns true for to-many associations
    pub fn is_collection(&self) -> bool {
        matches!(self.kind, AttributeKind::Association { collection: true, .. })
    }

    pub fn is_embedded(&self) -> bool {
        matches!(self.kind, AttributeKind::Embedded { .. })
    }

    /// Host type of a basic attribute
    pub fn host_type(&self) -> Option<&HostType> {
        match &self.kind {
            AttributeKind::Basic(host_type) => Some(host_type),
            _ => None,
        }
    }
}

/// Attribute definition as stored in a schema file.
///
/// Exactly one of `type`, `embedded` and `association` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_name: Option<String>,
    /// Constants of an `enum` type, in ordinal order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub constants: Vec<String>,
    /// Name of the enum type; defaults to the attribute name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enum_name: Option<String>,
    /// Embeddable type name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedded: Option<String>,
    /// Target entity name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub association: Option<String>,
    /// True for to-many associations
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub collection: bool,
}

impl AttributeDef {
    /// Converts the definition into attribute metadata
    pub fn to_attribute(&self) -> Result<Attribute, String> {
        let kind = match (&self.type_name, &self.embedded, &self.association) {
            (Some(type_name), None, None) => {
                if self.collection {
                    return Err(format!("attribute '{}': only associations can be collections", self.name));
                }
                AttributeKind::Basic(self.host_type(type_name)?)
            }
            (None, Some(schema), None) => AttributeKind::Embedded {
                schema: schema.clone(),
            },
            (None, None, Some(target)) => AttributeKind::Association {
                target: target.clone(),
                collection: self.collection,
            },
            _ => {
                return Err(format!(
                    "attribute '{}' must declare exactly one of type, embedded or association",
                    self.name
                ))
            }
        };
        Ok(Attribute::new(self.name.clone(), kind))
    }

    fn host_type(&self, type_name: &str) -> Result<HostType, String> {
        if type_name != "enum" {
            return Ok(HostType::from_name(type_name));
        }
        if self.constants.is_empty() {
            return Err(format!("enum attribute '{}' declares no constants", self.name));
        }
        let name = self.enum_name.clone().unwrap_or_else(|| self.name.clone());
        Ok(HostType::enumeration(name, self.constants.iter().cloned()))
    }

    /// Builds a definition back from attribute metadata
    pub fn from_attribute(attribute: &Attribute) -> Self {
        let mut def = Self {
            name: attribute.name().to_string(),
            type_name: None,
            constants: Vec::new(),
            enum_name: None,
            embedded: None,
            association: None,
            collection: false,
        };
        match attribute.kind() {
            AttributeKind::Basic(HostType::Enum { name, constants }) => {
                def.type_name = Some("enum".into());
                def.enum_name = Some(name.clone());
                def.constants = constants.clone();
            }
            AttributeKind::Basic(host_type) => def.type_name = Some(host_type.type_name().to_string()),
            AttributeKind::Embedded { schema } => def.embedded = Some(schema.clone()),
            AttributeKind::Association { target, collection } => {
                def.association = Some(target.clone());
                def.collection = *collection;
            }
        }
        def
    }
}

/// Entity or embeddable definition as stored in a schema file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDef {
    /// Type name
    pub name: String,
    /// Identifier attribute, used for count projections
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<String>,
    /// True for same-row composite types
    #[serde(default)]
    pub embeddable: bool,
    /// Attributes in declaration order
    pub attributes: Vec<AttributeDef>,
}
