//! # Hydrated Values
//!
//! Output of hydration: a record of domain-side keys to typed values, ready to be
//! used for constructing or updating an entity. `E` is the application's entity
//! type as returned by the related-entity repository.

use crate::constants::record_keys;
use chrono::{DateTime, FixedOffset};
use serde_json::Value;
use std::collections::HashMap;
use uuid::Uuid;

/// Selected case of an enumeration attribute
#[derive(Debug, Clone, PartialEq)]
pub struct EnumValue {
    pub type_class: String,
    pub case: String,
    /// Backing value for backed enumerations
    pub value: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HydratedValue<E> {
    Null,
    Bool(bool),
    Integer(i64),
    Decimal(f64),
    Text(String),
    /// Arrays and untyped values, kept as JSON
    Json(Value),
    DateTime(DateTime<FixedOffset>),
    Enum(EnumValue),
    Identifier(Uuid),
    /// Related entity resolved through the repository
    Entity(E),
    /// Related entities resolved through the repository
    Entities(Vec<E>),
    /// Nested record of an embedded value object
    Record(HydratedRecord<E>),
}

impl<E> HydratedValue<E> {
    /// Convert a raw wire value without any type coercion
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::Null => HydratedValue::Null,
            Value::Bool(b) => HydratedValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => HydratedValue::Integer(i),
                None => n
                    .as_f64()
                    .map_or(HydratedValue::Json(Value::Number(n)), HydratedValue::Decimal),
            },
            Value::String(s) => HydratedValue::Text(s),
            other => HydratedValue::Json(other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, HydratedValue::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            HydratedValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            HydratedValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            HydratedValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            HydratedValue::Decimal(f) => Some(*f),
            HydratedValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            HydratedValue::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<Uuid> {
        match self {
            HydratedValue::Identifier(id) => Some(*id),
            _ => None,
        }
    }

    pub fn as_entity(&self) -> Option<&E> {
        match self {
            HydratedValue::Entity(entity) => Some(entity),
            _ => None,
        }
    }

    pub fn as_entities(&self) -> Option<&[E]> {
        match self {
            HydratedValue::Entities(entities) => Some(entities),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&HydratedRecord<E>> {
        match self {
            HydratedValue::Record(record) => Some(record),
            _ => None,
        }
    }

    /// Values a relationship hook may return: entities, records, JSON arrays/objects
    pub fn is_relationship_shaped(&self) -> bool {
        match self {
            HydratedValue::Entity(_) | HydratedValue::Entities(_) | HydratedValue::Record(_) => {
                true
            }
            HydratedValue::Json(value) => value.is_array() || value.is_object(),
            _ => false,
        }
    }

    /// Short type name used in diagnostics
    pub fn kind_name(&self) -> &'static str {
        match self {
            HydratedValue::Null => "null",
            HydratedValue::Bool(_) => "boolean",
            HydratedValue::Integer(_) => "integer",
            HydratedValue::Decimal(_) => "double",
            HydratedValue::Text(_) => "string",
            HydratedValue::Json(Value::Array(_)) => "array",
            HydratedValue::Json(Value::Object(_)) => "object",
            HydratedValue::Json(_) => "json",
            HydratedValue::DateTime(_) => "datetime",
            HydratedValue::Enum(_) => "enum",
            HydratedValue::Identifier(_) => "uuid",
            HydratedValue::Entity(_) => "entity",
            HydratedValue::Entities(_) => "entities",
            HydratedValue::Record(_) => "record",
        }
    }
}

/// Key/value bag produced by hydration
#[derive(Debug, Clone, PartialEq)]
pub struct HydratedRecord<E> {
    values: HashMap<String, HydratedValue<E>>,
}

impl<E> Default for HydratedRecord<E> {
    fn default() -> Self {
        Self {
            values: HashMap::new(),
        }
    }
}

impl<E> HydratedRecord<E> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record tagged with the class it hydrates
    pub fn for_entity(class_name: impl Into<String>) -> Self {
        let mut record = Self::new();
        record.set_entity(class_name);
        record
    }

    pub fn insert(&mut self, key: impl Into<String>, value: HydratedValue<E>) {
        self.values.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&HydratedValue<E>> {
        self.values.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<HydratedValue<E>> {
        self.values.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.values.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &HydratedValue<E>)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.values.retain(|key, _| keep(key));
    }

    /// Move every entry of `other` into this record, overwriting existing keys
    pub fn extend(&mut self, other: HydratedRecord<E>) {
        self.values.extend(other.values);
    }

    /// Tag the record with its class identity
    pub fn set_entity(&mut self, class_name: impl Into<String>) {
        self.values.insert(
            record_keys::ENTITY.to_string(),
            HydratedValue::Text(class_name.into()),
        );
    }

    /// Class identity tag, if present
    pub fn entity_class(&self) -> Option<&str> {
        self.get(record_keys::ENTITY).and_then(HydratedValue::as_str)
    }

    pub fn into_inner(self) -> HashMap<String, HydratedValue<E>> {
        self.values
    }
}
