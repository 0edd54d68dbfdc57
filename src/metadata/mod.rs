//! # Entity Metadata
//!
//! Structural description of entity classes: declared properties and their types,
//! persistence field and association names, constructor parameters and CRUD
//! annotations. The field mapper reads entities exclusively through
//! [`MetadataProvider`], so it can be driven by any mapping technology (or by
//! hand-built descriptors in tests).
//!
//! ## Architecture
//!
//! ```text
//! MetadataProvider
//! ├── describe(class)    -> EntityDescriptor (properties, constructor, persistence names)
//! └── capability(type)   -> TypeCapability   (date-time, enumeration, array-access, object)
//!
//! CrudReader
//! └── read(property)     -> CrudFlags        (required, writable)
//! ```

pub mod crud;
pub mod descriptor;
pub mod provider;

pub use crud::{AnnotationCrudReader, CrudFlags, CrudReader};
pub use descriptor::{
    Association, AssociationKind, ConstructorParameter, EntityDescriptor, PropertyDescriptor,
    TypeRef,
};
pub use provider::InMemoryMetadataProvider;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// One case of an enumeration type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnumCase {
    pub name: String,
    /// Backing value; `None` for classic (unbacked) enumerations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

impl EnumCase {
    pub fn unit(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }

    pub fn backed(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }
}

/// What a class-typed member is able to hold
#[derive(Debug, Clone, PartialEq)]
pub enum TypeCapability {
    /// Implements the date-time capability
    DateTime,
    /// An enumeration; `backed` enumerations are matched by value, classic ones by case name
    Enumeration { backed: bool, cases: Vec<EnumCase> },
    /// Indexable / array-access container
    ArrayAccess,
    /// Any other class or interface (embedded value object or entity)
    Object,
}

/// Source of structural metadata for entity classes
pub trait MetadataProvider: Send + Sync {
    /// Describe a class; `None` when the class is unknown or cannot be loaded
    fn describe(&self, class_name: &str) -> Option<Arc<EntityDescriptor>>;

    /// Capability of a class or interface name; `None` when the name is not a known type
    fn capability(&self, type_name: &str) -> Option<TypeCapability>;

    /// Whether `type_name` names a known class or interface
    fn is_known_type(&self, type_name: &str) -> bool {
        self.capability(type_name).is_some()
    }
}
