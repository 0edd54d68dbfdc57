//! # JSON:API Document Model
//!
//! Typed view of a request document as produced by `serde_json`. The hydrator only
//! needs the primary resource, its attributes and relationships, and the optional
//! `included` array, so that is all this model carries.
//!
//! ```rust
//! use jsonapi_core::document::Document;
//!
//! let document: Document = r#"{
//!     "data": {
//!         "type": "devices",
//!         "attributes": { "name": "Thermostat" },
//!         "relationships": {
//!             "owner": { "data": { "type": "owners", "id": "0b8a3d4e-5f21-4c6e-9a0b-7d1e2f3a4b5c" } }
//!         }
//!     }
//! }"#
//! .parse()
//! .unwrap();
//!
//! let resource = document.resource().unwrap();
//! assert_eq!(resource.resource_type, "devices");
//! assert!(resource.attributes().has("name"));
//! assert!(resource.relationships().get("owner").unwrap().is_has_one());
//! ```

pub mod relationship;
pub mod resource;

pub use relationship::{RelationshipData, RelationshipObject, Relationships};
pub use resource::{Attributes, ResourceIdentifier, ResourceObject};

use crate::error::{JsonApiError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;
use thiserror::Error;

/// A document member that was expected but not present at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Document member \"{0}\" is not present")]
pub struct MissingMember(pub &'static str);

/// Primary data: a single resource or a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
    Single(Box<ResourceObject>),
    Collection(Vec<ResourceObject>),
}

/// Top-level JSON:API document
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<PrimaryData>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub included: Option<Vec<ResourceObject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl Document {
    /// Document whose primary data is one resource
    pub fn new(resource: ResourceObject) -> Self {
        Self {
            data: Some(PrimaryData::Single(Box::new(resource))),
            included: None,
            meta: None,
        }
    }

    pub fn with_included(mut self, included: Vec<ResourceObject>) -> Self {
        self.included = Some(included);
        self
    }

    /// Read a document from an already parsed JSON value
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|e| JsonApiError::InvalidDocument(e.to_string()))
    }

    /// Primary data is a single resource object
    pub fn has_resource(&self) -> bool {
        matches!(self.data, Some(PrimaryData::Single(_)))
    }

    pub fn resource(&self) -> Option<&ResourceObject> {
        match &self.data {
            Some(PrimaryData::Single(resource)) => Some(resource.as_ref()),
            _ => None,
        }
    }

    pub fn has_included(&self) -> bool {
        self.included.is_some()
    }

    pub fn included(&self) -> Option<&[ResourceObject]> {
        self.included.as_deref()
    }
}

impl FromStr for Document {
    type Err = JsonApiError;

    fn from_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| JsonApiError::InvalidDocument(e.to_string()))
    }
}
