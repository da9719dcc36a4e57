//! Shared schema fixture for integration tests

#![allow(dead_code)]

use aerofilter::schema::{EntitySchema, HostType, SchemaRegistry};

/// Employee / Department / City / Task model with an embedded
/// LingualString name
pub fn employee_registry() -> SchemaRegistry {
    SchemaRegistry::build(vec![
        EntitySchema::entity("Employee")
            .with_primary_key("id")
            .basic("id", HostType::Long)
            .basic("firstName", HostType::Text)
            .basic("lastName", HostType::Text)
            .embedded("name", "LingualString")
            .basic("birthDate", HostType::Date)
            .basic("hBirthDate", HostType::HijrahDate)
            .basic("age", HostType::Int)
            .basic("hireDate", HostType::Instant)
            .basic("type", HostType::Short)
            .basic("salary", HostType::Double)
            .basic("active", HostType::Bool)
            .basic("serial", HostType::Uuid)
            .basic("lang", HostType::enumeration("Lang", ["AR", "EN"]))
            .to_one("department", "Department")
            .to_many("tasks", "Task"),
        EntitySchema::entity("Department")
            .with_primary_key("id")
            .basic("id", HostType::Long)
            .basic("name", HostType::Text)
            .to_one("city", "City"),
        EntitySchema::entity("City")
            .basic("id", HostType::Long)
            .basic("name", HostType::Text),
        EntitySchema::entity("Task")
            .basic("id", HostType::Long)
            .basic("name", HostType::Text)
            .basic("status", HostType::enumeration("Status", ["OPEN", "DONE"])),
        EntitySchema::embeddable("LingualString")
            .basic("ar", HostType::Text)
            .basic("en", HostType::Text),
    ])
    .unwrap()
}
