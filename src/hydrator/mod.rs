//! # Hydrator
//!
//! Converts a JSON:API request document (plus, for updates, the existing entity)
//! into a [`HydratedRecord`] ready to construct or update a domain entity.
//!
//! ## Architecture
//!
//! ```text
//! hydrate(document, existing)
//! ├── EntityFieldMapper::map_entity(entity)      fresh FieldMapping per call
//! ├── document.resource()                        missing => single 422 at /data
//! ├── HydrationPass (owns the ErrorCollection)
//! │   ├── attributes      coercion, hooks, embedded objects, constructor walk
//! │   └── relationships   hooks, has-one / has-many repository lookups
//! ├── errors?                                    => JsonApiError::Multiple
//! ├── merge { entity, attributes.., relationships.. }
//! └── create only: identifier from the document or a fresh UUIDv4
//! ```
//!
//! Validation failures are accumulated across both passes and surfaced together.
//! Structural failures (missing resource, invalid identifier) fail fast with a single
//! error. Contract violations by the integrating application (unknown entity class,
//! wrong-shaped hook results) fail with [`JsonApiError::InvalidState`].
//!
//! ## Usage
//!
//! ```rust
//! use jsonapi_core::document::Document;
//! use jsonapi_core::hydrator::{EntityRepository, Hydrator, HydratorDefinition};
//! use jsonapi_core::metadata::{EntityDescriptor, InMemoryMetadataProvider, PropertyDescriptor};
//! use std::sync::Arc;
//! use uuid::Uuid;
//!
//! struct NoRelations;
//!
//! impl EntityRepository for NoRelations {
//!     type Entity = String;
//!
//!     fn find(&self, _class_name: &str, _id: Uuid) -> Option<String> {
//!         None
//!     }
//! }
//!
//! let metadata = InMemoryMetadataProvider::new().with_entity(
//!     EntityDescriptor::new("Device")
//!         .with_property(PropertyDescriptor::new("name").with_type("string", false)),
//! );
//! let hydrator = Hydrator::new(
//!     HydratorDefinition::new("Device", "devices").attribute("name"),
//!     Arc::new(metadata),
//!     Arc::new(NoRelations),
//! );
//!
//! let document: Document = r#"{"data": {"type": "devices", "attributes": {"name": "Lamp"}}}"#
//!     .parse()
//!     .unwrap();
//! let record = hydrator.hydrate(&document, None).unwrap();
//!
//! assert_eq!(record.entity_class(), Some("Device"));
//! assert_eq!(record.get("name").and_then(|v| v.as_str()), Some("Lamp"));
//! assert!(record.get("id").and_then(|v| v.as_uuid()).is_some());
//! ```

mod attributes;
pub mod definition;
pub mod hooks;
mod relationships;

pub use definition::HydratorDefinition;
pub use hooks::{AttributeHook, HookRegistry, RelationshipHook};

use crate::config::JsonApiConfig;
use crate::constants::{pointers, record_keys};
use crate::document::{Document, MissingMember, ResourceObject};
use crate::error::{ErrorCollection, ErrorObject, JsonApiError, Result};
use crate::logging::log_hydration_operation;
use crate::mapper::EntityFieldMapper;
use crate::metadata::{CrudReader, MetadataProvider};
use crate::translator::{DefaultTranslator, MessageKey, Translator};
use crate::utils::parse_identifier;
use crate::value::{HydratedRecord, HydratedValue};
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Lookup of related entities by class and identifier
pub trait EntityRepository: Send + Sync {
    type Entity: Clone;

    /// Find the entity of `class_name` with identifier `id`
    fn find(&self, class_name: &str, id: Uuid) -> Option<Self::Entity>;
}

/// Hydrates request documents into records for one entity class
pub struct Hydrator<R: EntityRepository> {
    definition: HydratorDefinition<R::Entity>,
    metadata: Arc<dyn MetadataProvider>,
    repository: Arc<R>,
    translator: Arc<dyn Translator>,
    crud_reader: Option<Arc<dyn CrudReader>>,
    identifier_key: String,
}

impl<R: EntityRepository> std::fmt::Debug for Hydrator<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hydrator")
            .field("entity", &self.definition.entity_name())
            .field("resource_type", &self.definition.resource_type())
            .field("identifier_key", &self.identifier_key)
            .field("crud_reader", &self.crud_reader.is_some())
            .finish()
    }
}

impl<R: EntityRepository> Hydrator<R> {
    pub fn new(
        definition: HydratorDefinition<R::Entity>,
        metadata: Arc<dyn MetadataProvider>,
        repository: Arc<R>,
    ) -> Self {
        let identifier_key = definition
            .identifier_key_override()
            .unwrap_or(record_keys::IDENTIFIER)
            .to_string();

        Self {
            definition,
            metadata,
            repository,
            translator: Arc::new(DefaultTranslator::new()),
            crud_reader: None,
            identifier_key,
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_crud_reader(mut self, crud_reader: Arc<dyn CrudReader>) -> Self {
        self.crud_reader = Some(crud_reader);
        self
    }

    /// Apply crate configuration; an identifier key set on the definition still wins
    pub fn with_config(mut self, config: &JsonApiConfig) -> Self {
        if self.definition.identifier_key_override().is_none() {
            self.identifier_key = config.identifier_key.clone();
        }
        self
    }

    pub fn definition(&self) -> &HydratorDefinition<R::Entity> {
        &self.definition
    }

    pub fn entity_name(&self) -> &str {
        self.definition.entity_name()
    }

    pub fn resource_type(&self) -> &str {
        self.definition.resource_type()
    }

    pub fn identifier_key(&self) -> &str {
        &self.identifier_key
    }

    /// Field mapper bound to this hydrator's metadata and naming
    pub fn mapper(&self) -> EntityFieldMapper<'_> {
        EntityFieldMapper::new(self.metadata.as_ref(), self.definition.naming())
            .with_crud_reader(self.crud_reader.as_deref())
    }

    /// Hydrate `document` into a record.
    ///
    /// Pass `existing` when updating an entity; without it the call is a create and
    /// the record receives an identifier under [`Hydrator::identifier_key`].
    pub fn hydrate(
        &self,
        document: &Document,
        existing: Option<&R::Entity>,
    ) -> Result<HydratedRecord<R::Entity>> {
        let entity_name = self.definition.entity_name();
        let operation = if existing.is_none() { "create" } else { "update" };

        let mapping = self.mapper().map_entity(entity_name).map_err(|error| {
            warn!(entity = %entity_name, error = %error, "Entity mapping failed");
            error
        })?;

        let Some(resource) = document.resource() else {
            log_hydration_operation(operation, entity_name, None, "rejected", Some("missing resource"));
            return Err(self.single_error(MessageKey::ResourceInvalid, pointers::DATA).into());
        };

        let mut pass = HydrationPass::new(self, existing);
        let attributes =
            pass.hydrate_attributes(entity_name, resource.attributes(), &mapping, None)?;
        let relationships =
            pass.hydrate_relationships(resource.relationships(), &mapping, document.included())?;

        let errors = pass.into_errors();
        if errors.has_errors() {
            debug!(
                entity = %entity_name,
                errors = errors.len(),
                pointers = ?errors.pointers(),
                "Hydration collected validation errors"
            );
            log_hydration_operation(
                operation,
                entity_name,
                Some(errors.len()),
                "invalid",
                None,
            );
            return Err(JsonApiError::Multiple(errors));
        }

        let mut record = HydratedRecord::for_entity(entity_name);
        record.extend(attributes);
        record.extend(relationships);

        if existing.is_none() {
            let identifier = self.resolve_identifier(resource)?;
            record.insert(self.identifier_key.clone(), HydratedValue::Identifier(identifier));
        }

        log_hydration_operation(operation, entity_name, Some(0), "hydrated", None);
        Ok(record)
    }

    /// Client-supplied identifier, or a fresh one when the document carries none
    fn resolve_identifier(&self, resource: &ResourceObject) -> Result<Uuid> {
        match resource.id() {
            Ok(Some(id)) => parse_identifier(&id).ok_or_else(|| {
                debug!(entity = %self.entity_name(), id = %id, "Rejecting invalid identifier");
                self.single_error(MessageKey::IdentifierInvalid, pointers::DATA_ID)
                    .into()
            }),
            Ok(None) => Err(self
                .single_error(MessageKey::IdentifierInvalid, pointers::DATA_ID)
                .into()),
            Err(MissingMember(_)) => Ok(Uuid::new_v4()),
        }
    }

    fn single_error(&self, key: MessageKey, pointer: &str) -> ErrorObject {
        ErrorObject::unprocessable(
            self.translator.heading(key),
            self.translator.message(key),
            pointer,
        )
        .with_type(key.identifier())
    }

    fn find_related(&self, class_name: &str, id: Option<&str>) -> Option<R::Entity> {
        let Some(identifier) = id.and_then(parse_identifier) else {
            debug!(class = %class_name, id = ?id, "Related identifier is not a valid UUID");
            return None;
        };

        let found = self.repository.find(class_name, identifier);
        if found.is_none() {
            debug!(class = %class_name, id = %identifier, "Related entity not found");
        }
        found
    }
}

/// State of one `hydrate()` call
struct HydrationPass<'h, R: EntityRepository> {
    hydrator: &'h Hydrator<R>,
    mapper: EntityFieldMapper<'h>,
    existing: Option<&'h R::Entity>,
    errors: ErrorCollection,
}

impl<'h, R: EntityRepository> HydrationPass<'h, R> {
    fn new(hydrator: &'h Hydrator<R>, existing: Option<&'h R::Entity>) -> Self {
        Self {
            hydrator,
            mapper: hydrator.mapper(),
            existing,
            errors: ErrorCollection::new(),
        }
    }

    fn creating(&self) -> bool {
        self.existing.is_none()
    }

    fn add_error(&mut self, key: MessageKey, pointer: String) {
        debug!(
            entity = %self.hydrator.entity_name(),
            pointer = %pointer,
            error = key.identifier(),
            "Recording validation error"
        );
        let error = self.hydrator.single_error(key, &pointer);
        self.errors.add(error);
    }

    fn into_errors(self) -> ErrorCollection {
        self.errors
    }
}
