//! Resource objects, resource identifiers and the attributes member.

use super::relationship::Relationships;
use super::MissingMember;
use crate::utils::serde::deserialize_present;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `attributes` member of a resource object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(Map<String, Value>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the member exists, even if its value is `null`
    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// The member as a nested attributes object, if it is a JSON object
    pub fn get_object(&self, key: &str) -> Option<Attributes> {
        match self.0.get(key) {
            Some(Value::Object(map)) => Some(Attributes(map.clone())),
            _ => None,
        }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    pub fn into_map(self) -> Map<String, Value> {
        self.0
    }
}

impl From<Map<String, Value>> for Attributes {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl TryFrom<Value> for Attributes {
    type Error = Value;

    fn try_from(value: Value) -> std::result::Result<Self, Self::Error> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(other),
        }
    }
}

/// `{ "type": ..., "id": ... }` linkage inside a relationship
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(rename = "type")]
    pub resource_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: Some(id.into()),
        }
    }
}

/// Primary or included resource object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub resource_type: String,

    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    id: Option<Option<Value>>,

    #[serde(default)]
    pub attributes: Attributes,

    #[serde(default)]
    pub relationships: Relationships,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl ResourceObject {
    /// Resource without an `id` member
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            attributes: Attributes::default(),
            relationships: Relationships::default(),
            meta: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(Some(Value::String(id.into())));
        self
    }

    /// Explicit `"id": null`
    pub fn with_null_id(mut self) -> Self {
        self.id = Some(None);
        self
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn with_relationships(mut self, relationships: Relationships) -> Self {
        self.relationships = relationships;
        self
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    /// The resource id.
    ///
    /// Fails with [`MissingMember`] when the document carries no `id` member at all;
    /// returns `Ok(None)` for an explicit `null`. Non-string ids are stringified.
    pub fn id(&self) -> std::result::Result<Option<String>, MissingMember> {
        match &self.id {
            None => Err(MissingMember("id")),
            Some(None) | Some(Some(Value::Null)) => Ok(None),
            Some(Some(Value::String(id))) => Ok(Some(id.clone())),
            Some(Some(other)) => Ok(Some(other.to_string())),
        }
    }

    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_id_three_states() {
        let absent: ResourceObject = serde_json::from_value(json!({ "type": "devices" })).unwrap();
        let null: ResourceObject =
            serde_json::from_value(json!({ "type": "devices", "id": null })).unwrap();
        let set: ResourceObject =
            serde_json::from_value(json!({ "type": "devices", "id": "abc" })).unwrap();

        assert_eq!(absent.id(), Err(MissingMember("id")));
        assert!(!absent.has_id());
        assert_eq!(null.id(), Ok(None));
        assert!(null.has_id());
        assert_eq!(set.id(), Ok(Some("abc".to_string())));
    }

    #[test]
    fn test_numeric_id_is_stringified() {
        let resource: ResourceObject =
            serde_json::from_value(json!({ "type": "devices", "id": 15 })).unwrap();
        assert_eq!(resource.id(), Ok(Some("15".to_string())));
    }

    #[test]
    fn test_attributes_has_null_member() {
        let attributes = Attributes::try_from(json!({ "name": null, "nested": { "a": 1 } })).unwrap();

        assert!(attributes.has("name"));
        assert_eq!(attributes.get("name"), Some(&Value::Null));
        assert!(!attributes.has("other"));
        assert!(attributes.get_object("name").is_none());
        assert_eq!(attributes.get_object("nested").unwrap().get("a"), Some(&json!(1)));
    }

    #[test]
    fn test_absent_id_is_not_serialized() {
        let value = serde_json::to_value(ResourceObject::new("devices")).unwrap();
        assert!(value.get("id").is_none());

        let value = serde_json::to_value(ResourceObject::new("devices").with_null_id()).unwrap();
        assert_eq!(value["id"], Value::Null);
    }
}
