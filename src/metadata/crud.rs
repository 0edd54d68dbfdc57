//! CRUD annotations: per-property required/writable flags.

use super::descriptor::PropertyDescriptor;

/// Required/writable flags of one property
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CrudFlags {
    /// Must be supplied when the entity is created
    pub required: bool,
    /// May be changed on an existing entity
    pub writable: bool,
}

impl CrudFlags {
    pub const fn new(required: bool, writable: bool) -> Self {
        Self { required, writable }
    }

    /// Flags used when no reader is configured
    pub const fn unrestricted() -> Self {
        Self::new(false, true)
    }

    /// Neither required nor writable: server managed
    pub const fn is_read_only(&self) -> bool {
        !self.required && !self.writable
    }
}

/// Reads CRUD flags for properties that are not constructor parameters
pub trait CrudReader: Send + Sync {
    fn read(&self, class_name: &str, property: &PropertyDescriptor) -> CrudFlags;
}

/// Reads the CRUD annotation attached to the property descriptor.
///
/// A property without an annotation is neither required nor writable.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnnotationCrudReader;

impl CrudReader for AnnotationCrudReader {
    fn read(&self, _class_name: &str, property: &PropertyDescriptor) -> CrudFlags {
        property.crud.unwrap_or_default()
    }
}
