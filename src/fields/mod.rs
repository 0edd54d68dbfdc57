//! # Field Model
//!
//! One [`Field`] describes how a single entity property is fed from a request
//! document: the wire key it is read from, the domain key it is written to, the
//! required/writable flags and the [`FieldKind`] that decides value coercion.
//!
//! ## Architecture
//!
//! ```text
//! FieldMapping (ordered, per entity class, per hydrate() call)
//! └── Field { mapped_name, field_name, required, writable, kind }
//!     └── FieldKind
//!         ├── Text / Number / Boolean / Array / DateTime / Enum / Mixed
//!         ├── SingleEntity(EntityTarget)   has-one relation or embedded value object
//!         └── Collection(EntityTarget)     has-many relation, never read as attribute
//! ```
//!
//! Value extraction is an exhaustive match over [`FieldKind`]; see
//! [`Field::get_value`] for the coercion rules.

mod coercion;

use crate::document::Attributes;
use crate::error::Result;
use crate::metadata::{CrudFlags, EnumCase};
use crate::value::HydratedValue;
use std::fmt;

/// Target of an entity-valued field
#[derive(Debug, Clone, PartialEq)]
pub struct EntityTarget {
    pub class_name: String,
    pub nullable: bool,
    /// `true` for persistence relations fed from `relationships`, `false` for
    /// embedded value objects fed from `attributes`
    pub relationship: bool,
}

impl EntityTarget {
    pub fn new(class_name: impl Into<String>, nullable: bool, relationship: bool) -> Self {
        Self {
            class_name: class_name.into(),
            nullable,
            relationship,
        }
    }
}

/// Field variants, each with its own coercion rule
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text {
        nullable: bool,
    },
    Number {
        decimal: bool,
        nullable: bool,
    },
    Boolean {
        nullable: bool,
    },
    Array {
        nullable: bool,
    },
    /// ISO-8601 value that must survive a parse/format round trip
    DateTime {
        nullable: bool,
    },
    Enum {
        type_class: String,
        backed: bool,
        cases: Vec<EnumCase>,
        nullable: bool,
    },
    /// Ambiguous or untyped declaration; any wire value is accepted as is
    Mixed {
        nullable: bool,
    },
    SingleEntity(EntityTarget),
    Collection(EntityTarget),
}

impl FieldKind {
    pub fn is_nullable(&self) -> bool {
        match self {
            FieldKind::Text { nullable }
            | FieldKind::Number { nullable, .. }
            | FieldKind::Boolean { nullable }
            | FieldKind::Array { nullable }
            | FieldKind::DateTime { nullable }
            | FieldKind::Enum { nullable, .. }
            | FieldKind::Mixed { nullable } => *nullable,
            FieldKind::SingleEntity(target) | FieldKind::Collection(target) => target.nullable,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::Text { .. } => "text",
            FieldKind::Number { decimal: true, .. } => "decimal",
            FieldKind::Number { decimal: false, .. } => "integer",
            FieldKind::Boolean { .. } => "boolean",
            FieldKind::Array { .. } => "array",
            FieldKind::DateTime { .. } => "datetime",
            FieldKind::Enum { .. } => "enum",
            FieldKind::Mixed { .. } => "mixed",
            FieldKind::SingleEntity(_) => "single_entity",
            FieldKind::Collection(_) => "collection",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A hydratable entity field
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    mapped_name: String,
    field_name: String,
    required: bool,
    writable: bool,
    kind: FieldKind,
}

impl Field {
    pub fn new(
        mapped_name: impl Into<String>,
        field_name: impl Into<String>,
        kind: FieldKind,
        flags: CrudFlags,
    ) -> Self {
        Self {
            mapped_name: mapped_name.into(),
            field_name: field_name.into(),
            required: flags.required,
            writable: flags.writable,
            kind,
        }
    }

    /// Key used in the wire document
    pub fn mapped_name(&self) -> &str {
        &self.mapped_name
    }

    /// Key used on the domain side
    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_writable(&self) -> bool {
        self.writable
    }

    pub fn is_nullable(&self) -> bool {
        self.kind.is_nullable()
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Entity target of single-entity and collection fields
    pub fn target(&self) -> Option<&EntityTarget> {
        match &self.kind {
            FieldKind::SingleEntity(target) | FieldKind::Collection(target) => Some(target),
            _ => None,
        }
    }

    /// Field is fed from the `relationships` member
    pub fn is_relationship(&self) -> bool {
        self.target().is_some_and(|target| target.relationship)
    }

    /// Single-entity field holding an embedded value object rather than a relation
    pub fn is_embedded(&self) -> bool {
        matches!(&self.kind, FieldKind::SingleEntity(target) if !target.relationship)
    }

    /// Whether the field may be written for this operation
    pub fn accepts_value(&self, creating: bool) -> bool {
        self.writable || (creating && self.required)
    }

    /// Read and coerce this field's value from an attributes object.
    ///
    /// `Ok(None)` means no usable value. Relationship-flagged single-entity fields and
    /// collection fields cannot be read as attributes and fail with
    /// [`JsonApiError::InvalidState`](crate::error::JsonApiError::InvalidState).
    pub fn get_value<E>(&self, attributes: &Attributes) -> Result<Option<HydratedValue<E>>> {
        coercion::extract(self, attributes.get(&self.mapped_name))
    }
}

/// Ordered fields of one entity class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMapping {
    fields: Vec<Field>,
}

impl FieldMapping {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Field> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn by_field_name(&self, field_name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.field_name == field_name)
    }

    pub fn by_mapped_name(&self, mapped_name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.mapped_name == mapped_name)
    }

    /// Whether `field_name` is the domain key of any mapped field
    pub fn contains_field(&self, field_name: &str) -> bool {
        self.by_field_name(field_name).is_some()
    }

    pub fn attributes(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_relationship())
    }

    pub fn relationships(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_relationship())
    }
}

impl<'a> IntoIterator for &'a FieldMapping {
    type Item = &'a Field;
    type IntoIter = std::slice::Iter<'a, Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn relation(name: &str) -> Field {
        Field::new(
            name,
            name,
            FieldKind::SingleEntity(EntityTarget::new("Owner", false, true)),
            CrudFlags::new(true, true),
        )
    }

    #[test]
    fn test_field_flags() {
        let field = Field::new(
            "display-name",
            "name",
            FieldKind::Text { nullable: true },
            CrudFlags::new(true, false),
        );

        assert_eq!(field.mapped_name(), "display-name");
        assert_eq!(field.field_name(), "name");
        assert!(field.is_required());
        assert!(!field.is_writable());
        assert!(field.is_nullable());
        assert!(!field.is_relationship());
        assert!(field.accepts_value(true));
        assert!(!field.accepts_value(false));
    }

    #[test]
    fn test_embedded_versus_relationship() {
        let embedded = Field::new(
            "address",
            "address",
            FieldKind::SingleEntity(EntityTarget::new("Address", true, false)),
            CrudFlags::unrestricted(),
        );

        assert!(embedded.is_embedded());
        assert!(!embedded.is_relationship());
        assert!(relation("owner").is_relationship());
        assert!(!relation("owner").is_embedded());
    }

    #[test]
    fn test_mapping_partitions_fields() {
        let mapping = FieldMapping::new(vec![
            Field::new(
                "name",
                "name",
                FieldKind::Text { nullable: false },
                CrudFlags::unrestricted(),
            ),
            relation("owner"),
        ]);

        assert_eq!(mapping.attributes().count(), 1);
        assert_eq!(mapping.relationships().count(), 1);
        assert!(mapping.contains_field("owner"));
        assert!(mapping.by_mapped_name("name").is_some());
        assert!(!mapping.contains_field("missing"));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(
            FieldKind::Number {
                decimal: true,
                nullable: false
            }
            .to_string(),
            "decimal"
        );
        assert_eq!(FieldKind::Mixed { nullable: true }.name(), "mixed");
    }
}
