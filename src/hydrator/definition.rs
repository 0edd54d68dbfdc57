//! Declarative description of one hydrator.

use super::hooks::HookRegistry;
use crate::document::{Attributes, RelationshipObject, ResourceObject};
use crate::error::Result;
use crate::mapper::FieldNaming;
use crate::value::HydratedValue;

/// Which entity a hydrator builds, from which resource type, and how wire keys
/// map onto entity fields.
///
/// Name maps are normalized while the definition is built; nothing is computed
/// lazily during hydration.
///
/// ```rust
/// use jsonapi_core::hydrator::HydratorDefinition;
/// use jsonapi_core::value::HydratedValue;
///
/// let definition: HydratorDefinition<()> = HydratorDefinition::new("Device", "devices")
///     .attribute("name")
///     .attribute_as("display-label", "label")
///     .composited_attribute("params")
///     .relationship("owner")
///     .attribute_hook("params", |attributes, _| {
///         Ok(attributes.get("params").cloned().map(HydratedValue::Json))
///     });
///
/// assert_eq!(definition.naming().attribute_key("label"), Some("display-label"));
/// assert!(definition.naming().is_composited("params"));
/// ```
#[derive(Debug, Clone)]
pub struct HydratorDefinition<E> {
    entity_name: String,
    resource_type: String,
    naming: FieldNaming,
    identifier_key: Option<String>,
    hooks: HookRegistry<E>,
}

impl<E> HydratorDefinition<E> {
    pub fn new(entity_name: impl Into<String>, resource_type: impl Into<String>) -> Self {
        Self {
            entity_name: entity_name.into(),
            resource_type: resource_type.into(),
            naming: FieldNaming::new(),
            identifier_key: None,
            hooks: HookRegistry::new(),
        }
    }

    /// Attribute with the same name on the wire and on the entity
    pub fn attribute(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.attribute_as(name.clone(), name)
    }

    /// Attribute read from `wire_key` into the entity field `field_name`
    pub fn attribute_as(mut self, wire_key: impl Into<String>, field_name: impl Into<String>) -> Self {
        self.naming = self.naming.with_attribute(field_name, wire_key);
        self
    }

    /// Attribute that a hook may produce even when the wire document lacks it
    pub fn composited_attribute(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.composited_attribute_as(name.clone(), name)
    }

    pub fn composited_attribute_as(
        mut self,
        wire_key: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        self.naming = self.naming.with_composited(field_name, wire_key);
        self
    }

    pub fn relationship(self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.relationship_as(name.clone(), name)
    }

    pub fn relationship_as(mut self, wire_key: impl Into<String>, field_name: impl Into<String>) -> Self {
        self.naming = self.naming.with_relationship(field_name, wire_key);
        self
    }

    /// Record key receiving the identifier on create, overriding the configured one
    pub fn identifier_key(mut self, key: impl Into<String>) -> Self {
        self.identifier_key = Some(key.into());
        self
    }

    /// Custom hydration for the entity field `field_name`
    pub fn attribute_hook<F>(mut self, field_name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&Attributes, Option<&E>) -> Result<Option<HydratedValue<E>>> + Send + Sync + 'static,
    {
        self.hooks.register_attribute(field_name, hook);
        self
    }

    /// Custom hydration for the relationship named `mapped_name` on the wire
    pub fn relationship_hook<F>(mut self, mapped_name: impl Into<String>, hook: F) -> Self
    where
        F: Fn(&RelationshipObject, Option<&[ResourceObject]>, Option<&E>) -> Result<Option<HydratedValue<E>>>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.register_relationship(mapped_name, hook);
        self
    }

    pub fn entity_name(&self) -> &str {
        &self.entity_name
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn naming(&self) -> &FieldNaming {
        &self.naming
    }

    pub fn identifier_key_override(&self) -> Option<&str> {
        self.identifier_key.as_deref()
    }

    pub fn hooks(&self) -> &HookRegistry<E> {
        &self.hooks
    }
}
