//! # Test Utilities
//!
//! Fixtures shared by unit tests, integration tests, doc examples and benchmarks:
//! an in-memory entity repository, a metadata provider describing a small device
//! domain, and a builder for request documents.
//!
//! ## Fixture domain
//!
//! ```text
//! Device(name, comment?)            constructor parameters
//! ├── enabled, position, temperature?, params?, createdAt?, state, level?, label
//! ├── location?  -> Location(street, city?)   embedded value object
//! ├── owner      -> Owner                     many-to-one
//! └── channels   -> Channel                   one-to-many
//!
//! Owner(name)
//! └── devices    -> Device                    one-to-many, required
//! ```
//!
//! Every non-constructor property carries a CRUD annotation so the same domain can
//! be hydrated with or without [`AnnotationCrudReader`](crate::metadata::AnnotationCrudReader).
//! `createdAt` is annotated neither required nor writable.

use crate::document::{
    Attributes, Document, RelationshipObject, Relationships, ResourceIdentifier, ResourceObject,
};
use crate::hydrator::EntityRepository;
use crate::metadata::{
    AssociationKind, ConstructorParameter, EntityDescriptor, EnumCase, InMemoryMetadataProvider,
    PropertyDescriptor, TypeCapability,
};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Entity handed out by [`InMemoryRepository`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoredEntity {
    pub class_name: String,
    pub id: Uuid,
}

/// Repository keeping entities in a map keyed by class and identifier
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    entities: RwLock<HashMap<(String, Uuid), StoredEntity>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store an entity of `class_name` with a fresh identifier
    pub fn create(&self, class_name: &str) -> StoredEntity {
        self.insert(class_name, Uuid::new_v4())
    }

    pub fn insert(&self, class_name: &str, id: Uuid) -> StoredEntity {
        let entity = StoredEntity {
            class_name: class_name.to_string(),
            id,
        };
        self.entities
            .write()
            .insert((class_name.to_string(), id), entity.clone());
        entity
    }

    pub fn len(&self) -> usize {
        self.entities.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.read().is_empty()
    }
}

impl EntityRepository for InMemoryRepository {
    type Entity = StoredEntity;

    fn find(&self, class_name: &str, id: Uuid) -> Option<StoredEntity> {
        self.entities
            .read()
            .get(&(class_name.to_string(), id))
            .cloned()
    }
}

/// Metadata for the fixture device domain
pub fn fixture_metadata() -> InMemoryMetadataProvider {
    InMemoryMetadataProvider::new()
        .with_type(
            "DeviceState",
            TypeCapability::Enumeration {
                backed: true,
                cases: vec![
                    EnumCase::backed("Ready", "ready"),
                    EnumCase::backed("Lost", "lost"),
                ],
            },
        )
        .with_type(
            "Level",
            TypeCapability::Enumeration {
                backed: false,
                cases: vec![EnumCase::unit("LOW"), EnumCase::unit("HIGH")],
            },
        )
        .with_entity(
            EntityDescriptor::new("Owner")
                .with_property(
                    PropertyDescriptor::new("name")
                        .with_type("string", false)
                        .with_crud(true, true),
                )
                .with_property(
                    PropertyDescriptor::new("devices")
                        .with_association(AssociationKind::OneToMany, "Device")
                        .with_crud(true, true),
                ),
        )
        .with_entity(
            EntityDescriptor::new("Channel")
                .with_property(
                    PropertyDescriptor::new("name")
                        .with_type("string", false)
                        .with_crud(true, true),
                )
                .with_property(
                    PropertyDescriptor::new("device")
                        .with_association(AssociationKind::ManyToOne, "Device")
                        .with_crud(true, false),
                ),
        )
        .with_entity(
            EntityDescriptor::new("Location")
                .with_property(
                    PropertyDescriptor::new("street")
                        .with_type("string", false)
                        .with_crud(true, true),
                )
                .with_property(
                    PropertyDescriptor::new("city")
                        .with_type("string", true)
                        .with_crud(false, true),
                ),
        )
        .with_entity(device_descriptor())
}

fn device_descriptor() -> EntityDescriptor {
    EntityDescriptor::new("Device")
        .with_constructor(vec![
            ConstructorParameter::required("name"),
            ConstructorParameter::optional("comment"),
        ])
        .with_property(PropertyDescriptor::new("name").with_type("string", false))
        .with_property(PropertyDescriptor::new("comment").with_type("string", true))
        .with_property(
            PropertyDescriptor::new("enabled")
                .with_type("bool", false)
                .with_crud(false, true),
        )
        .with_property(
            PropertyDescriptor::new("position")
                .with_type("int", false)
                .with_crud(false, true),
        )
        .with_property(
            PropertyDescriptor::new("temperature")
                .with_var_annotation("float|null")
                .with_crud(false, true),
        )
        .with_property(
            PropertyDescriptor::new("params")
                .with_type("array", true)
                .with_crud(false, true),
        )
        .with_property(
            PropertyDescriptor::new("createdAt")
                .with_type("DateTimeInterface", true)
                .with_crud(false, false),
        )
        .with_property(
            PropertyDescriptor::new("state")
                .with_type("DeviceState", false)
                .with_crud(true, true),
        )
        .with_property(
            PropertyDescriptor::new("level")
                .with_type("Level", true)
                .with_crud(false, true),
        )
        .with_property(
            PropertyDescriptor::new("label")
                .with_var_annotation("string|int")
                .with_crud(false, true),
        )
        .with_property(
            PropertyDescriptor::new("location")
                .with_type("Location", true)
                .with_crud(false, true),
        )
        .with_property(
            PropertyDescriptor::new("owner")
                .with_association(AssociationKind::ManyToOne, "Owner")
                .with_crud(true, true),
        )
        .with_property(
            PropertyDescriptor::new("channels")
                .with_association(AssociationKind::OneToMany, "Channel")
                .with_crud(false, true),
        )
        .with_field_name("name")
        .with_field_name("createdAt")
        .with_field_name("internalCounter")
        .with_association_name("owner")
        .with_association_name("channels")
}

/// Builder for single-resource request documents
#[derive(Debug, Clone)]
pub struct DocumentBuilder {
    resource: ResourceObject,
    attributes: Attributes,
    relationships: Relationships,
    included: Option<Vec<ResourceObject>>,
}

impl DocumentBuilder {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource: ResourceObject::new(resource_type),
            attributes: Attributes::new(),
            relationships: Relationships::new(),
            included: None,
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.resource = self.resource.with_id(id);
        self
    }

    pub fn null_id(mut self) -> Self {
        self.resource = self.resource.with_null_id();
        self
    }

    pub fn attribute(mut self, key: impl Into<String>, value: Value) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// To-one linkage; `None` produces `"data": null`
    pub fn has_one(mut self, name: &str, resource_type: &str, id: Option<Uuid>) -> Self {
        let identifier = id.map(|id| ResourceIdentifier::new(resource_type, id.to_string()));
        self.relationships
            .insert(name, RelationshipObject::has_one(identifier));
        self
    }

    pub fn has_many(mut self, name: &str, resource_type: &str, ids: &[Uuid]) -> Self {
        let identifiers = ids
            .iter()
            .map(|id| ResourceIdentifier::new(resource_type, id.to_string()))
            .collect();
        self.relationships
            .insert(name, RelationshipObject::has_many(identifiers));
        self
    }

    pub fn included(mut self, resource: ResourceObject) -> Self {
        self.included.get_or_insert_with(Vec::new).push(resource);
        self
    }

    pub fn build(self) -> Document {
        let resource = self
            .resource
            .with_attributes(self.attributes)
            .with_relationships(self.relationships);

        let document = Document::new(resource);
        match self.included {
            Some(included) => document.with_included(included),
            None => document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repository_lookup_by_class_and_id() {
        let repository = InMemoryRepository::new();
        let owner = repository.create("Owner");

        assert_eq!(repository.find("Owner", owner.id), Some(owner.clone()));
        assert_eq!(repository.find("Channel", owner.id), None);
        assert_eq!(repository.len(), 1);
    }

    #[test]
    fn test_document_builder() {
        let owner = Uuid::new_v4();
        let document = DocumentBuilder::new("devices")
            .attribute("name", Value::from("Lamp"))
            .has_one("owner", "owners", Some(owner))
            .has_many("channels", "channels", &[])
            .build();

        let resource = document.resource().unwrap();
        assert!(!resource.has_id());
        assert!(resource.attributes().has("name"));
        assert!(resource.relationships().get("owner").unwrap().has_identifier());
        assert!(resource.relationships().get("channels").unwrap().is_has_many());
        assert!(!document.has_included());
    }
}
