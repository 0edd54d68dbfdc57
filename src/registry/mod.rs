//! # Hydrator Registry
//!
//! Routes incoming request documents to the hydrator registered for their
//! resource type.
//!
//! ## Architecture
//!
//! ```text
//! Document -> data.type -> HydratorRegistry (registration order) -> Hydrator -> HydratedRecord
//! ```
//!
//! ## Key Features
//!
//! - **Thread-safe**: hydrators are held behind a `parking_lot::RwLock` so the
//!   registry can be shared and extended after construction
//! - **Idempotent registration**: the first hydrator registered for a resource type
//!   keeps serving it
//! - **Structural errors**: documents nobody can hydrate fail with a single 422
//!
//! ## Usage
//!
//! ```rust
//! use jsonapi_core::hydrator::{Hydrator, HydratorDefinition};
//! use jsonapi_core::registry::HydratorRegistry;
//! use jsonapi_core::test_utils::{fixture_metadata, InMemoryRepository};
//! use std::sync::Arc;
//!
//! let metadata = Arc::new(fixture_metadata());
//! let repository = Arc::new(InMemoryRepository::new());
//!
//! let registry = HydratorRegistry::new();
//! registry.add(Hydrator::new(
//!     HydratorDefinition::new("Device", "devices").attribute("name"),
//!     metadata,
//!     repository,
//! ));
//!
//! let document = r#"{"data": {"type": "devices", "attributes": {"name": "Lamp"}}}"#
//!     .parse()
//!     .unwrap();
//! assert!(registry.find_hydrator(&document).is_some());
//! ```

use crate::constants::pointers;
use crate::document::Document;
use crate::error::{ErrorObject, Result};
use crate::hydrator::{EntityRepository, Hydrator};
use crate::logging::log_registry_operation;
use crate::translator::{DefaultTranslator, MessageKey, Translator};
use crate::value::HydratedRecord;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// Registry statistics
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryStats {
    pub total_hydrators: usize,
    pub resource_types: Vec<String>,
}

/// Hydrators keyed by the JSON:API resource type they accept
pub struct HydratorRegistry<R: EntityRepository> {
    hydrators: RwLock<Vec<Arc<Hydrator<R>>>>,
    translator: Arc<dyn Translator>,
}

impl<R: EntityRepository> Default for HydratorRegistry<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: EntityRepository> std::fmt::Debug for HydratorRegistry<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HydratorRegistry")
            .field("resource_types", &self.stats().resource_types)
            .finish()
    }
}

impl<R: EntityRepository> HydratorRegistry<R> {
    pub fn new() -> Self {
        Self {
            hydrators: RwLock::new(Vec::new()),
            translator: Arc::new(DefaultTranslator::new()),
        }
    }

    /// Translator used for the registry's own structural errors
    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    /// Register a hydrator.
    ///
    /// Returns `false` and leaves the registry untouched when a hydrator for the same
    /// resource type is already registered.
    pub fn add(&self, hydrator: Hydrator<R>) -> bool {
        self.add_shared(Arc::new(hydrator))
    }

    /// Register a hydrator that is also used elsewhere
    pub fn add_shared(&self, hydrator: Arc<Hydrator<R>>) -> bool {
        let mut hydrators = self.hydrators.write();

        if hydrators
            .iter()
            .any(|registered| registered.resource_type() == hydrator.resource_type())
        {
            debug!(
                resource_type = %hydrator.resource_type(),
                entity = %hydrator.entity_name(),
                "Hydrator already registered for resource type"
            );
            return false;
        }

        info!(
            resource_type = %hydrator.resource_type(),
            entity = %hydrator.entity_name(),
            "Registered hydrator"
        );
        log_registry_operation(
            "add",
            Some(hydrator.resource_type()),
            Some(hydrator.entity_name()),
            "registered",
            None,
        );

        hydrators.push(hydrator);
        true
    }

    /// Hydrator accepting the document's resource type, if any
    pub fn find_hydrator(&self, document: &Document) -> Option<Arc<Hydrator<R>>> {
        let resource = document.resource()?;

        let found = self
            .hydrators
            .read()
            .iter()
            .find(|hydrator| hydrator.resource_type() == resource.resource_type)
            .cloned();

        if found.is_none() {
            debug!(
                source = "hydrators-registry",
                document_type = %resource.resource_type,
                document_id = ?resource.id().ok().flatten(),
                "Hydrator for given document was not found"
            );
        }

        found
    }

    /// Find the matching hydrator and hydrate `document` with it
    pub fn hydrate(
        &self,
        document: &Document,
        existing: Option<&R::Entity>,
    ) -> Result<HydratedRecord<R::Entity>> {
        let Some(resource) = document.resource() else {
            log_registry_operation("hydrate", None, None, "rejected", Some("missing resource"));
            return Err(self.structural_error(pointers::DATA).into());
        };

        let Some(hydrator) = self.find_hydrator(document) else {
            log_registry_operation(
                "hydrate",
                Some(&resource.resource_type),
                None,
                "rejected",
                Some("no hydrator for resource type"),
            );
            return Err(self.structural_error(pointers::DATA_TYPE).into());
        };

        hydrator.hydrate(document, existing)
    }

    pub fn contains(&self, resource_type: &str) -> bool {
        self.hydrators
            .read()
            .iter()
            .any(|hydrator| hydrator.resource_type() == resource_type)
    }

    pub fn len(&self) -> usize {
        self.hydrators.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.hydrators.read().is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        let hydrators = self.hydrators.read();
        RegistryStats {
            total_hydrators: hydrators.len(),
            resource_types: hydrators
                .iter()
                .map(|hydrator| hydrator.resource_type().to_string())
                .collect(),
        }
    }

    fn structural_error(&self, pointer: &str) -> ErrorObject {
        ErrorObject::unprocessable(
            self.translator.heading(MessageKey::ResourceInvalid),
            self.translator.message(MessageKey::ResourceInvalid),
            pointer,
        )
        .with_type(MessageKey::ResourceInvalid.identifier())
    }
}
