//! Relationship objects.

use super::resource::ResourceIdentifier;
use crate::utils::serde::deserialize_present;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Resource linkage: a single identifier or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationshipData {
    One(ResourceIdentifier),
    Many(Vec<ResourceIdentifier>),
}

/// A single entry of the `relationships` member
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RelationshipObject {
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    data: Option<Option<RelationshipData>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl RelationshipObject {
    /// To-one linkage; `None` encodes `"data": null`
    pub fn has_one(identifier: Option<ResourceIdentifier>) -> Self {
        Self {
            data: Some(identifier.map(RelationshipData::One)),
            ..Self::default()
        }
    }

    /// To-many linkage
    pub fn has_many(identifiers: Vec<ResourceIdentifier>) -> Self {
        Self {
            data: Some(Some(RelationshipData::Many(identifiers))),
            ..Self::default()
        }
    }

    /// `data` is a single identifier or `null`
    pub fn is_has_one(&self) -> bool {
        matches!(self.data, Some(None) | Some(Some(RelationshipData::One(_))))
    }

    /// `data` is a list of identifiers
    pub fn is_has_many(&self) -> bool {
        matches!(self.data, Some(Some(RelationshipData::Many(_))))
    }

    pub fn has_identifier(&self) -> bool {
        self.identifier().is_some()
    }

    pub fn identifier(&self) -> Option<&ResourceIdentifier> {
        match &self.data {
            Some(Some(RelationshipData::One(identifier))) => Some(identifier),
            _ => None,
        }
    }

    /// Identifiers of a to-many linkage; empty for anything else
    pub fn identifiers(&self) -> &[ResourceIdentifier] {
        match &self.data {
            Some(Some(RelationshipData::Many(identifiers))) => identifiers,
            _ => &[],
        }
    }
}

/// The `relationships` member of a resource object
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Relationships(BTreeMap<String, RelationshipObject>);

impl Relationships {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, relationship: RelationshipObject) -> Self {
        self.0.insert(name.into(), relationship);
        self
    }

    pub fn has(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&RelationshipObject> {
        self.0.get(name)
    }

    pub fn insert(&mut self, name: impl Into<String>, relationship: RelationshipObject) {
        self.0.insert(name.into(), relationship);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
