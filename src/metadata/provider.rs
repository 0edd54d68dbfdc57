//! In-memory metadata registry.

use super::descriptor::EntityDescriptor;
use super::{MetadataProvider, TypeCapability};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Date-time type names known without registration
const BUILTIN_DATE_TIME_TYPES: [&str; 3] = ["DateTimeInterface", "DateTime", "DateTimeImmutable"];

/// Thread-safe registry of entity descriptors and type capabilities.
///
/// Registered entity classes report [`TypeCapability::Object`] unless a more specific
/// capability was registered for the same name.
#[derive(Debug, Default)]
pub struct InMemoryMetadataProvider {
    descriptors: RwLock<HashMap<String, Arc<EntityDescriptor>>>,
    capabilities: RwLock<HashMap<String, TypeCapability>>,
}

impl InMemoryMetadataProvider {
    pub fn new() -> Self {
        let provider = Self::default();
        {
            let mut capabilities = provider.capabilities.write();
            for name in BUILTIN_DATE_TIME_TYPES {
                capabilities.insert(name.to_string(), TypeCapability::DateTime);
            }
        }
        provider
    }

    /// Register (or replace) a class descriptor
    pub fn register(&self, descriptor: EntityDescriptor) {
        debug!(
            class = %descriptor.class_name,
            properties = descriptor.properties.len(),
            "Registering entity descriptor"
        );
        self.descriptors
            .write()
            .insert(descriptor.class_name.clone(), Arc::new(descriptor));
    }

    /// Register the capability of a non-entity type (enumerations, date-time classes, ...)
    pub fn register_type(&self, type_name: impl Into<String>, capability: TypeCapability) {
        self.capabilities.write().insert(type_name.into(), capability);
    }

    pub fn with_entity(self, descriptor: EntityDescriptor) -> Self {
        self.register(descriptor);
        self
    }

    pub fn with_type(self, type_name: impl Into<String>, capability: TypeCapability) -> Self {
        self.register_type(type_name, capability);
        self
    }

    pub fn len(&self) -> usize {
        self.descriptors.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.read().is_empty()
    }
}

impl MetadataProvider for InMemoryMetadataProvider {
    fn describe(&self, class_name: &str) -> Option<Arc<EntityDescriptor>> {
        self.descriptors.read().get(class_name).cloned()
    }

    fn capability(&self, type_name: &str) -> Option<TypeCapability> {
        if let Some(capability) = self.capabilities.read().get(type_name) {
            return Some(capability.clone());
        }
        self.descriptors
            .read()
            .contains_key(type_name)
            .then_some(TypeCapability::Object)
    }
}
