//! # Entity Field Mapper
//!
//! Turns the structural metadata of an entity class into an ordered
//! [`FieldMapping`]. The mapper is pure: it reads through [`MetadataProvider`] and
//! an optional [`CrudReader`], holds no state between calls and never fails on a
//! field it does not understand. Such fields are skipped.
//!
//! ## Resolution order per candidate field
//!
//! 1. Declared property must exist (persistence-only names cannot be typed).
//! 2. Required/writable flags: constructor parameters first, then the CRUD reader,
//!    then the `(false, true)` default. Fields that are neither are dropped.
//! 3. Wire key: relationship names, then attribute names, then composited names.
//! 4. Kind: persistence association first, otherwise inference over the type union.
//!
//! ## Type inference
//!
//! The union (`string|int|null`) is split, trimmed and deduplicated. `null` only sets
//! nullability. More than one distinct recognized category is ambiguous and maps to
//! [`FieldKind::Mixed`]; no recognized category skips the field.

use crate::constants::type_names;
use crate::error::{JsonApiError, Result};
use crate::fields::{EntityTarget, Field, FieldKind, FieldMapping};
use crate::metadata::{
    Association, ConstructorParameter, CrudFlags, CrudReader, EntityDescriptor, MetadataProvider,
    PropertyDescriptor, TypeCapability,
};
use std::collections::HashMap;
use tracing::debug;

/// Entity field name => wire key maps of one hydrator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldNaming {
    relationships: HashMap<String, String>,
    attributes: HashMap<String, String>,
    composited: HashMap<String, String>,
}

impl FieldNaming {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, field_name: impl Into<String>, wire_key: impl Into<String>) -> Self {
        self.attributes.insert(field_name.into(), wire_key.into());
        self
    }

    pub fn with_composited(mut self, field_name: impl Into<String>, wire_key: impl Into<String>) -> Self {
        self.composited.insert(field_name.into(), wire_key.into());
        self
    }

    pub fn with_relationship(
        mut self,
        field_name: impl Into<String>,
        wire_key: impl Into<String>,
    ) -> Self {
        self.relationships.insert(field_name.into(), wire_key.into());
        self
    }

    pub fn relationship_key(&self, field_name: &str) -> Option<&str> {
        self.relationships.get(field_name).map(String::as_str)
    }

    pub fn attribute_key(&self, field_name: &str) -> Option<&str> {
        self.attributes.get(field_name).map(String::as_str)
    }

    pub fn composited_key(&self, field_name: &str) -> Option<&str> {
        self.composited.get(field_name).map(String::as_str)
    }

    /// Field value may be synthesized by a hook even when absent from the wire
    pub fn is_composited(&self, field_name: &str) -> bool {
        self.composited.contains_key(field_name)
    }

    /// Wire key of a field and whether it is fed from `relationships`
    pub fn resolve(&self, field_name: &str) -> Option<(&str, bool)> {
        if let Some(key) = self.relationship_key(field_name) {
            return Some((key, true));
        }
        self.attribute_key(field_name)
            .or_else(|| self.composited_key(field_name))
            .map(|key| (key, false))
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty() && self.attributes.is_empty() && self.composited.is_empty()
    }
}

/// Recognized member of a declared type union
#[derive(Debug, Clone, PartialEq, Eq)]
enum TypeCategory {
    Class(String),
    Text,
    Integer,
    Decimal,
    Array,
    Boolean,
    Mixed,
}

/// Result of scanning a type union
#[derive(Debug, Default)]
struct TypeScan {
    categories: Vec<TypeCategory>,
    nullable: bool,
}

/// Builds field mappings from entity metadata
pub struct EntityFieldMapper<'a> {
    metadata: &'a dyn MetadataProvider,
    crud_reader: Option<&'a dyn CrudReader>,
    naming: &'a FieldNaming,
}

impl<'a> EntityFieldMapper<'a> {
    pub fn new(metadata: &'a dyn MetadataProvider, naming: &'a FieldNaming) -> Self {
        Self {
            metadata,
            crud_reader: None,
            naming,
        }
    }

    pub fn with_crud_reader(mut self, crud_reader: Option<&'a dyn CrudReader>) -> Self {
        self.crud_reader = crud_reader;
        self
    }

    /// Map every hydratable field of `class_name`, in declaration order
    pub fn map_entity(&self, class_name: &str) -> Result<FieldMapping> {
        let descriptor = self.metadata.describe(class_name).ok_or_else(|| {
            debug!(entity = %class_name, "No metadata registered for entity");
            JsonApiError::invalid_state("Entity could not be parsed")
        })?;

        let fields: Vec<Field> = descriptor
            .candidate_field_names()
            .into_iter()
            .filter_map(|name| self.map_field(&descriptor, name))
            .collect();

        debug!(
            entity = %class_name,
            fields = fields.len(),
            "Entity field mapping resolved"
        );

        Ok(FieldMapping::new(fields))
    }

    fn map_field(&self, descriptor: &EntityDescriptor, field_name: &str) -> Option<Field> {
        let Some(property) = descriptor.property(field_name) else {
            debug!(
                entity = %descriptor.class_name,
                field = %field_name,
                "Skipping persistence field without declared property"
            );
            return None;
        };

        let flags = self.resolve_flags(descriptor, property);
        if flags.is_read_only() {
            debug!(
                entity = %descriptor.class_name,
                field = %field_name,
                "Skipping read-only field"
            );
            return None;
        }

        let Some((mapped_name, is_relationship)) = self.naming.resolve(field_name) else {
            debug!(
                entity = %descriptor.class_name,
                field = %field_name,
                "Skipping field not exposed to hydration"
            );
            return None;
        };

        let kind = match &property.association {
            Some(association) => self.association_kind(association, is_relationship),
            None => self.infer_kind(property, is_relationship),
        };

        match kind {
            Some(kind) => Some(Field::new(mapped_name, field_name, kind, flags)),
            None => {
                debug!(
                    entity = %descriptor.class_name,
                    field = %field_name,
                    "Skipping field with unmappable type"
                );
                None
            }
        }
    }

    fn resolve_flags(&self, descriptor: &EntityDescriptor, property: &PropertyDescriptor) -> CrudFlags {
        let parameter: Option<&ConstructorParameter> = descriptor
            .constructor_parameters()
            .iter()
            .find(|parameter| parameter.name == property.name);

        match (parameter, self.crud_reader) {
            (Some(parameter), _) => CrudFlags::new(!parameter.optional, parameter.optional),
            (None, Some(reader)) => reader.read(&descriptor.class_name, property),
            (None, None) => CrudFlags::unrestricted(),
        }
    }

    fn association_kind(&self, association: &Association, is_relationship: bool) -> Option<FieldKind> {
        if !self.metadata.is_known_type(&association.target_class) {
            return None;
        }

        Some(if association.kind.is_to_one() {
            FieldKind::SingleEntity(EntityTarget::new(
                &association.target_class,
                false,
                is_relationship,
            ))
        } else {
            FieldKind::Collection(EntityTarget::new(
                &association.target_class,
                true,
                is_relationship,
            ))
        })
    }

    fn infer_kind(&self, property: &PropertyDescriptor, is_relationship: bool) -> Option<FieldKind> {
        let union = property.type_union()?;
        let scan = self.scan_union(&union);
        let nullable = scan.nullable;

        match scan.categories.as_slice() {
            [] => None,
            [single] => Some(match single {
                TypeCategory::Class(class_name) => {
                    self.class_kind(class_name, nullable, is_relationship)
                }
                TypeCategory::Text => FieldKind::Text { nullable },
                TypeCategory::Integer => FieldKind::Number {
                    decimal: false,
                    nullable,
                },
                TypeCategory::Decimal => FieldKind::Number {
                    decimal: true,
                    nullable,
                },
                TypeCategory::Array => FieldKind::Array { nullable },
                TypeCategory::Boolean => FieldKind::Boolean { nullable },
                TypeCategory::Mixed => FieldKind::Mixed { nullable },
            }),
            _ => Some(FieldKind::Mixed { nullable }),
        }
    }

    fn class_kind(&self, class_name: &str, nullable: bool, is_relationship: bool) -> FieldKind {
        match self.metadata.capability(class_name) {
            Some(TypeCapability::DateTime) => FieldKind::DateTime { nullable },
            Some(TypeCapability::Enumeration { backed, cases }) => FieldKind::Enum {
                type_class: class_name.to_string(),
                backed,
                cases,
                nullable,
            },
            Some(TypeCapability::ArrayAccess) => FieldKind::Array { nullable },
            Some(TypeCapability::Object) | None => {
                FieldKind::SingleEntity(EntityTarget::new(class_name, nullable, is_relationship))
            }
        }
    }

    fn scan_union(&self, union: &str) -> TypeScan {
        let mut scan = TypeScan::default();

        for token in union.split(type_names::UNION_SEPARATOR) {
            let token = token.trim().trim_start_matches('\\');
            if token.is_empty() {
                continue;
            }

            let category = match token.to_ascii_lowercase().as_str() {
                type_names::NULL => {
                    scan.nullable = true;
                    continue;
                }
                type_names::STRING => TypeCategory::Text,
                type_names::INT => TypeCategory::Integer,
                type_names::FLOAT => TypeCategory::Decimal,
                type_names::ARRAY | type_names::MIXED_ARRAY => TypeCategory::Array,
                type_names::BOOL => TypeCategory::Boolean,
                type_names::MIXED => TypeCategory::Mixed,
                _ if self.metadata.is_known_type(token) => TypeCategory::Class(token.to_string()),
                _ => continue,
            };

            if !scan.categories.contains(&category) {
                scan.categories.push(category);
            }
        }

        scan
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        AnnotationCrudReader, AssociationKind, EnumCase, InMemoryMetadataProvider,
    };

    fn provider() -> InMemoryMetadataProvider {
        InMemoryMetadataProvider::new()
            .with_entity(EntityDescriptor::new("Owner"))
            .with_entity(
                EntityDescriptor::new("Address")
                    .with_property(PropertyDescriptor::new("city").with_type("string", false)),
            )
            .with_type(
                "Status",
                TypeCapability::Enumeration {
                    backed: true,
                    cases: vec![EnumCase::backed("On", "on")],
                },
            )
            .with_type("Settings", TypeCapability::ArrayAccess)
    }

    fn naming() -> FieldNaming {
        FieldNaming::new()
            .with_attribute("name", "name")
            .with_attribute("label", "label")
            .with_attribute("value", "value")
            .with_attribute("status", "status")
            .with_attribute("settings", "settings")
            .with_attribute("createdAt", "created-at")
            .with_attribute("address", "address")
            .with_composited("params", "params")
            .with_relationship("owner", "owner")
            .with_relationship("tags", "tags")
    }

    fn kind_of(mapping: &FieldMapping, field: &str) -> FieldKind {
        mapping.by_field_name(field).unwrap().kind().clone()
    }

    #[test]
    fn test_unknown_entity_fails() {
        let provider = provider();
        let naming = naming();
        let mapper = EntityFieldMapper::new(&provider, &naming);

        assert_eq!(
            mapper.map_entity("Missing"),
            Err(JsonApiError::InvalidState("Entity could not be parsed".to_string()))
        );
    }

    #[test]
    fn test_primitive_and_class_inference() {
        let provider = provider();
        provider.register(
            EntityDescriptor::new("Device")
                .with_property(PropertyDescriptor::new("name").with_type("string", false))
                .with_property(PropertyDescriptor::new("label").with_var_annotation("string|null"))
                .with_property(PropertyDescriptor::new("status").with_type("Status", false))
                .with_property(PropertyDescriptor::new("settings").with_type("Settings", true))
                .with_property(
                    PropertyDescriptor::new("createdAt").with_type("\\DateTimeImmutable", false),
                )
                .with_property(PropertyDescriptor::new("address").with_type("Address", true)),
        );
        let naming = naming();
        let mapping = EntityFieldMapper::new(&provider, &naming)
            .map_entity("Device")
            .unwrap();

        assert_eq!(kind_of(&mapping, "name"), FieldKind::Text { nullable: false });
        assert_eq!(kind_of(&mapping, "label"), FieldKind::Text { nullable: true });
        assert!(matches!(kind_of(&mapping, "status"), FieldKind::Enum { backed: true, .. }));
        assert_eq!(kind_of(&mapping, "settings"), FieldKind::Array { nullable: true });
        assert_eq!(
            kind_of(&mapping, "createdAt"),
            FieldKind::DateTime { nullable: false }
        );
        assert_eq!(mapping.by_field_name("createdAt").unwrap().mapped_name(), "created-at");
        assert!(mapping.by_field_name("address").unwrap().is_embedded());
    }

    #[test]
    fn test_ambiguous_union_is_mixed() {
        let provider = provider();
        provider.register(
            EntityDescriptor::new("Reading")
                .with_property(PropertyDescriptor::new("value").with_var_annotation("string|int")),
        );
        let naming = naming();
        let mapping = EntityFieldMapper::new(&provider, &naming)
            .map_entity("Reading")
            .unwrap();

        assert_eq!(kind_of(&mapping, "value"), FieldKind::Mixed { nullable: false });
    }

    #[test]
    fn test_duplicate_union_members_count_once() {
        let provider = provider();
        provider.register(
            EntityDescriptor::new("Reading").with_property(
                PropertyDescriptor::new("value")
                    .with_var_annotation("int")
                    .with_type("int", true)
                    .with_accessor_type("INT", false),
            ),
        );
        let naming = naming();
        let mapping = EntityFieldMapper::new(&provider, &naming)
            .map_entity("Reading")
            .unwrap();

        assert_eq!(
            kind_of(&mapping, "value"),
            FieldKind::Number {
                decimal: false,
                nullable: true
            }
        );
    }

    #[test]
    fn test_unrecognized_type_is_skipped() {
        let provider = provider();
        provider.register(
            EntityDescriptor::new("Reading")
                .with_property(PropertyDescriptor::new("value").with_var_annotation("resource"))
                .with_property(PropertyDescriptor::new("name")),
        );
        let naming = naming();
        let mapping = EntityFieldMapper::new(&provider, &naming)
            .map_entity("Reading")
            .unwrap();

        assert!(mapping.is_empty());
    }

    #[test]
    fn test_associations() {
        let provider = provider();
        provider.register(
            EntityDescriptor::new("Device")
                .with_property(
                    PropertyDescriptor::new("owner")
                        .with_association(AssociationKind::ManyToOne, "Owner"),
                )
                .with_property(
                    PropertyDescriptor::new("tags")
                        .with_association(AssociationKind::ManyToMany, "Owner"),
                )
                .with_property(
                    PropertyDescriptor::new("name")
                        .with_association(AssociationKind::OneToOne, "Unknown"),
                ),
        );
        let naming = naming();
        let mapping = EntityFieldMapper::new(&provider, &naming)
            .map_entity("Device")
            .unwrap();

        assert_eq!(
            kind_of(&mapping, "owner"),
            FieldKind::SingleEntity(EntityTarget::new("Owner", false, true))
        );
        assert_eq!(
            kind_of(&mapping, "tags"),
            FieldKind::Collection(EntityTarget::new("Owner", true, true))
        );
        assert!(!mapping.contains_field("name"));
    }

    #[test]
    fn test_constructor_parameters_drive_flags() {
        let provider = provider();
        provider.register(
            EntityDescriptor::new("Device")
                .with_property(PropertyDescriptor::new("name").with_type("string", false))
                .with_property(PropertyDescriptor::new("label").with_type("string", true))
                .with_property(PropertyDescriptor::new("value").with_type("float", false))
                .with_constructor(vec![
                    ConstructorParameter::required("name"),
                    ConstructorParameter::optional("label"),
                ]),
        );
        let naming = naming();
        let reader = AnnotationCrudReader;
        let mapping = EntityFieldMapper::new(&provider, &naming)
            .with_crud_reader(Some(&reader))
            .map_entity("Device")
            .unwrap();

        let name = mapping.by_field_name("name").unwrap();
        assert!(name.is_required() && !name.is_writable());
        let label = mapping.by_field_name("label").unwrap();
        assert!(!label.is_required() && label.is_writable());
        // unannotated and not a constructor parameter
        assert!(!mapping.contains_field("value"));
    }

    #[test]
    fn test_unexposed_and_declared_only_names() {
        let provider = provider();
        provider.register(
            EntityDescriptor::new("Device")
                .with_property(PropertyDescriptor::new("secret").with_type("string", false))
                .with_property(PropertyDescriptor::new("params").with_type("array", false))
                .with_field_name("name"),
        );
        let naming = naming();
        let mapping = EntityFieldMapper::new(&provider, &naming)
            .map_entity("Device")
            .unwrap();

        assert_eq!(mapping.len(), 1);
        assert_eq!(kind_of(&mapping, "params"), FieldKind::Array { nullable: false });
    }

    #[test]
    fn test_naming_resolution_order() {
        let naming = FieldNaming::new()
            .with_attribute("owner", "owner-attribute")
            .with_relationship("owner", "owner-relation")
            .with_composited("params", "parameters");

        assert_eq!(naming.resolve("owner"), Some(("owner-relation", true)));
        assert_eq!(naming.resolve("params"), Some(("parameters", false)));
        assert!(naming.is_composited("params"));
        assert_eq!(naming.resolve("missing"), None);
    }
}
