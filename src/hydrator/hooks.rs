//! Custom hydration hooks.
//!
//! Hooks replace the built-in coercion of a single field. Attribute hooks are keyed
//! by the entity field name, relationship hooks by the relationship's wire name.

use crate::document::{Attributes, RelationshipObject, ResourceObject};
use crate::error::{JsonApiError, Result};
use crate::value::HydratedValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Computes an attribute value from the wire attributes and the entity being updated
pub type AttributeHook<E> =
    Arc<dyn Fn(&Attributes, Option<&E>) -> Result<Option<HydratedValue<E>>> + Send + Sync>;

/// Computes a relationship value; `Ok(None)` falls back to repository lookup
pub type RelationshipHook<E> = Arc<
    dyn Fn(&RelationshipObject, Option<&[ResourceObject]>, Option<&E>) -> Result<Option<HydratedValue<E>>>
        + Send
        + Sync,
>;

pub struct HookRegistry<E> {
    attributes: HashMap<String, AttributeHook<E>>,
    relationships: HashMap<String, RelationshipHook<E>>,
}

impl<E> Default for HookRegistry<E> {
    fn default() -> Self {
        Self {
            attributes: HashMap::new(),
            relationships: HashMap::new(),
        }
    }
}

impl<E> Clone for HookRegistry<E> {
    fn clone(&self) -> Self {
        Self {
            attributes: self.attributes.clone(),
            relationships: self.relationships.clone(),
        }
    }
}

impl<E> fmt::Debug for HookRegistry<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut attributes: Vec<&String> = self.attributes.keys().collect();
        let mut relationships: Vec<&String> = self.relationships.keys().collect();
        attributes.sort();
        relationships.sort();

        f.debug_struct("HookRegistry")
            .field("attributes", &attributes)
            .field("relationships", &relationships)
            .finish()
    }
}

impl<E> HookRegistry<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_attribute<F>(&mut self, field_name: impl Into<String>, hook: F)
    where
        F: Fn(&Attributes, Option<&E>) -> Result<Option<HydratedValue<E>>> + Send + Sync + 'static,
    {
        self.attributes.insert(field_name.into(), Arc::new(hook));
    }

    pub fn register_relationship<F>(&mut self, mapped_name: impl Into<String>, hook: F)
    where
        F: Fn(&RelationshipObject, Option<&[ResourceObject]>, Option<&E>) -> Result<Option<HydratedValue<E>>>
            + Send
            + Sync
            + 'static,
    {
        self.relationships.insert(mapped_name.into(), Arc::new(hook));
    }

    pub fn has_attribute(&self, field_name: &str) -> bool {
        self.attributes.contains_key(field_name)
    }

    pub fn has_relationship(&self, mapped_name: &str) -> bool {
        self.relationships.contains_key(mapped_name)
    }

    /// Run the attribute hook for `field_name`; `None` when no hook is registered
    pub fn call_attribute(
        &self,
        field_name: &str,
        attributes: &Attributes,
        entity: Option<&E>,
    ) -> Option<Result<Option<HydratedValue<E>>>> {
        self.attributes
            .get(field_name)
            .map(|hook| hook(attributes, entity))
    }

    /// Run the relationship hook for `mapped_name`.
    ///
    /// Only entities, nested records and JSON arrays/objects are accepted; any other
    /// value is a contract violation of the hook and fails with `InvalidState`.
    pub fn call_relationship(
        &self,
        mapped_name: &str,
        relationship: &RelationshipObject,
        included: Option<&[ResourceObject]>,
        entity: Option<&E>,
    ) -> Result<Option<HydratedValue<E>>> {
        let Some(hook) = self.relationships.get(mapped_name) else {
            return Ok(None);
        };

        match hook(relationship, included, entity)? {
            None | Some(HydratedValue::Null) => Ok(None),
            Some(value) if value.is_relationship_shaped() => Ok(Some(value)),
            Some(value) => {
                warn!(
                    relationship = %mapped_name,
                    provided = value.kind_name(),
                    "Relationship hook returned a value of the wrong shape"
                );
                Err(JsonApiError::invalid_state(format!(
                    "Relationship have to be an array or entity instance, {} provided.",
                    value.kind_name()
                )))
            }
        }
    }
}
