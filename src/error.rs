//! # Error Types
//!
//! Structured errors for document hydration.
//!
//! Three kinds of failure flow out of this crate:
//!
//! - **Structural** ([`JsonApiError::Single`]): the request document itself is unusable
//!   (no primary resource, invalid client-supplied identifier). Raised immediately.
//! - **Validation** ([`JsonApiError::Multiple`]): every missing required attribute or
//!   relationship found during one hydration call, collected in an [`ErrorCollection`].
//! - **Programmer** ([`JsonApiError::InvalidState`]): the integrating application broke a
//!   contract (unloadable entity class, wrong-shaped hook result). Never merged into the
//!   validation set and rendered as a generic server error.

use crate::constants::{http_status, pointers};
use crate::utils::serde::{deserialize_status_code, serialize_status_code};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::fmt;
use thiserror::Error;

/// Location of the offending member inside the request document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pointer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter: Option<String>,
}

impl ErrorSource {
    pub fn pointer(pointer: impl Into<String>) -> Self {
        Self {
            pointer: Some(pointer.into()),
            parameter: None,
        }
    }
}

/// A single JSON:API error object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorObject {
    /// HTTP status code, rendered as a string on the wire
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    pub status: u16,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ErrorSource>,

    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorObject {
    /// Create an error with a status code and title only
    pub fn new(status: u16, title: impl Into<String>) -> Self {
        Self {
            status,
            code: Some(status.to_string()),
            title: title.into(),
            detail: None,
            source: None,
            error_type: None,
        }
    }

    /// Create a 422 error pointing at a member of the request document
    pub fn unprocessable(
        title: impl Into<String>,
        detail: impl Into<String>,
        pointer: impl Into<String>,
    ) -> Self {
        Self::new(http_status::UNPROCESSABLE_ENTITY, title)
            .with_detail(detail)
            .with_pointer(pointer)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn with_pointer(mut self, pointer: impl Into<String>) -> Self {
        self.source = Some(ErrorSource::pointer(pointer));
        self
    }

    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    /// The JSON pointer of the offending member, if any
    pub fn pointer(&self) -> Option<&str> {
        self.source.as_ref().and_then(|s| s.pointer.as_deref())
    }
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.title, self.status)?;
        if let Some(pointer) = self.pointer() {
            write!(f, " at {pointer}")?;
        }
        Ok(())
    }
}

/// Ordered, append-only set of validation errors gathered during one hydration call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCollection {
    errors: Vec<ErrorObject>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, error: ErrorObject) {
        self.errors.push(error);
    }

    /// Append a 422 error at the given pointer
    pub fn add_unprocessable(
        &mut self,
        title: impl Into<String>,
        detail: impl Into<String>,
        pointer: impl Into<String>,
    ) {
        self.add(ErrorObject::unprocessable(title, detail, pointer));
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorObject> {
        self.errors.iter()
    }

    pub fn first(&self) -> Option<&ErrorObject> {
        self.errors.first()
    }

    pub fn into_vec(self) -> Vec<ErrorObject> {
        self.errors
    }

    /// All source pointers, in insertion order
    pub fn pointers(&self) -> Vec<&str> {
        self.errors.iter().filter_map(ErrorObject::pointer).collect()
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a ErrorObject;
    type IntoIter = std::slice::Iter<'a, ErrorObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl From<Vec<ErrorObject>> for ErrorCollection {
    fn from(errors: Vec<ErrorObject>) -> Self {
        Self { errors }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum JsonApiError {
    #[error("{0}")]
    Single(ErrorObject),
    #[error("JSON:API multiple errors ({} errors)", .0.len())]
    Multiple(ErrorCollection),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid document: {0}")]
    InvalidDocument(String),
}

impl JsonApiError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// HTTP status the surrounding layer should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            JsonApiError::Single(error) => error.status,
            JsonApiError::Multiple(errors) => errors
                .first()
                .map_or(http_status::UNPROCESSABLE_ENTITY, |e| e.status),
            JsonApiError::InvalidDocument(_) => http_status::BAD_REQUEST,
            JsonApiError::InvalidState(_) | JsonApiError::Configuration(_) => {
                http_status::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Whether the failure was caused by the client's document rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            JsonApiError::Single(_) | JsonApiError::Multiple(_) | JsonApiError::InvalidDocument(_)
        )
    }

    /// The error objects this failure renders as
    pub fn errors(&self) -> Vec<ErrorObject> {
        match self {
            JsonApiError::Single(error) => vec![error.clone()],
            JsonApiError::Multiple(errors) => errors.iter().cloned().collect(),
            JsonApiError::InvalidDocument(message) => vec![ErrorObject::new(
                http_status::BAD_REQUEST,
                "Invalid document",
            )
            .with_detail(message.clone())
            .with_pointer(pointers::ROOT)],
            JsonApiError::InvalidState(_) | JsonApiError::Configuration(_) => {
                vec![ErrorObject::new(http_status::INTERNAL_SERVER_ERROR, "Server error")
                    .with_detail("There was an server error, please try again later")]
            }
        }
    }

    /// Render as a top-level JSON:API error document
    pub fn to_document(&self) -> Value {
        json!({ "errors": self.errors() })
    }
}

impl From<ErrorObject> for JsonApiError {
    fn from(error: ErrorObject) -> Self {
        JsonApiError::Single(error)
    }
}

impl From<ErrorCollection> for JsonApiError {
    fn from(errors: ErrorCollection) -> Self {
        JsonApiError::Multiple(errors)
    }
}

impl From<serde_json::Error> for JsonApiError {
    fn from(error: serde_json::Error) -> Self {
        JsonApiError::InvalidDocument(error.to_string())
    }
}

impl From<config::ConfigError> for JsonApiError {
    fn from(error: config::ConfigError) -> Self {
        JsonApiError::Configuration(error.to_string())
    }
}

pub type Result<T> = std::result::Result<T, JsonApiError>;
