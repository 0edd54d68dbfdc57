//! Entity, property and constructor descriptors.

use super::crud::CrudFlags;
use crate::constants::type_names;

/// Persistence association kinds the field mapper understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssociationKind {
    OneToOne,
    ManyToOne,
    OneToMany,
    ManyToMany,
}

impl AssociationKind {
    /// Association resolves to at most one related entity
    pub fn is_to_one(self) -> bool {
        matches!(self, AssociationKind::OneToOne | AssociationKind::ManyToOne)
    }

    /// Association resolves to a collection of related entities
    pub fn is_to_many(self) -> bool {
        !self.is_to_one()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Association {
    pub kind: AssociationKind,
    pub target_class: String,
}

/// A single declared type with its nullability
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRef {
    pub name: String,
    pub nullable: bool,
}

impl TypeRef {
    pub fn new(name: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            nullable,
        }
    }

    /// Union form, e.g. `string|null`
    pub fn to_union(&self) -> String {
        if self.nullable {
            format!("{}{}{}", self.name, type_names::UNION_SEPARATOR, type_names::NULL)
        } else {
            self.name.clone()
        }
    }
}

/// A declared property of an entity class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyDescriptor {
    pub name: String,
    /// Documented type union (e.g. `string|int|null`), if any
    pub var_annotation: Option<String>,
    /// Native declared type
    pub declared_type: Option<TypeRef>,
    /// Return type of the property's accessor
    pub accessor_type: Option<TypeRef>,
    pub association: Option<Association>,
    pub crud: Option<CrudFlags>,
}

impl PropertyDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_var_annotation(mut self, annotation: impl Into<String>) -> Self {
        self.var_annotation = Some(annotation.into());
        self
    }

    pub fn with_type(mut self, name: impl Into<String>, nullable: bool) -> Self {
        self.declared_type = Some(TypeRef::new(name, nullable));
        self
    }

    pub fn with_accessor_type(mut self, name: impl Into<String>, nullable: bool) -> Self {
        self.accessor_type = Some(TypeRef::new(name, nullable));
        self
    }

    pub fn with_association(mut self, kind: AssociationKind, target_class: impl Into<String>) -> Self {
        self.association = Some(Association {
            kind,
            target_class: target_class.into(),
        });
        self
    }

    pub fn with_crud(mut self, required: bool, writable: bool) -> Self {
        self.crud = Some(CrudFlags::new(required, writable));
        self
    }

    /// Every type source of the property joined into one union string.
    ///
    /// The documented annotation comes first, followed by the declared type and the
    /// accessor return type, each with `|null` appended when nullable. `None` when the
    /// property carries no type information at all.
    pub fn type_union(&self) -> Option<String> {
        let mut union = self
            .var_annotation
            .as_ref()
            .map(|annotation| annotation.trim().to_string());

        for type_ref in [&self.declared_type, &self.accessor_type].into_iter().flatten() {
            union = Some(match union {
                Some(existing) => format!(
                    "{existing}{}{}",
                    type_names::UNION_SEPARATOR,
                    type_ref.to_union()
                ),
                None => type_ref.to_union(),
            });
        }

        union
    }
}

/// Constructor parameter of an entity class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructorParameter {
    pub name: String,
    pub optional: bool,
    pub variadic: bool,
}

impl ConstructorParameter {
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: false,
            variadic: false,
        }
    }

    pub fn optional(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
            variadic: false,
        }
    }

    pub fn variadic(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            optional: true,
            variadic: true,
        }
    }
}

/// Everything the field mapper needs to know about one class
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityDescriptor {
    pub class_name: String,
    /// Declared properties, in declaration order
    pub properties: Vec<PropertyDescriptor>,
    /// Scalar field names known to the persistence layer
    pub field_names: Vec<String>,
    /// Association names known to the persistence layer
    pub association_names: Vec<String>,
    /// Constructor parameters, in positional order; `None` without a constructor
    pub constructor: Option<Vec<ConstructorParameter>>,
}

impl EntityDescriptor {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            ..Self::default()
        }
    }

    pub fn with_property(mut self, property: PropertyDescriptor) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_field_name(mut self, name: impl Into<String>) -> Self {
        self.field_names.push(name.into());
        self
    }

    pub fn with_association_name(mut self, name: impl Into<String>) -> Self {
        self.association_names.push(name.into());
        self
    }

    pub fn with_constructor(mut self, parameters: Vec<ConstructorParameter>) -> Self {
        self.constructor = Some(parameters);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn constructor_parameters(&self) -> &[ConstructorParameter] {
        self.constructor.as_deref().unwrap_or_default()
    }

    /// Candidate field names: declared properties first, then persistence-only names,
    /// without duplicates
    pub fn candidate_field_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        let declared = self.properties.iter().map(|p| p.name.as_str());
        let persisted = self
            .field_names
            .iter()
            .chain(self.association_names.iter())
            .map(String::as_str);

        for name in declared.chain(persisted) {
            if !names.contains(&name) {
                names.push(name);
            }
        }
        names
    }
}
