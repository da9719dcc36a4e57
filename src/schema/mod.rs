//! Schema subsystem for aerofilter
//!
//! Attribute metadata the predicate compiler resolves field paths against.
//!
//! # Design Principles
//!
//! - The compiler sees metadata only through the `Schema` trait
//! - Loaded once at startup, read-only afterwards
//! - Association and embedded links are validated before use
//! - No runtime introspection; every type is declared explicitly

mod entity;
mod errors;
mod loader;
mod metadata;
mod registry;
mod types;

pub use entity::EntitySchema;
pub use errors::{SchemaError, SchemaErrorCode, SchemaResult};
pub use loader::SchemaLoader;
pub use metadata::{EntityRef, Schema};
pub use registry::SchemaRegistry;
pub use types::{Attribute, AttributeDef, AttributeKind, EntityDef, HostType};
