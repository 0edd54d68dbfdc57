//! # Resource Links
//!
//! URL conventions for resource and relationship links:
//!
//! ```text
//! self                  /{type}/{id}
//! relationship self     /{type}/{id}/relationships/{name}
//! relationship related  /{type}/{id}/{name}
//! ```
//!
//! Links are built with [`url::Url`], so path segments are percent-encoded and a
//! base carrying a host or a path prefix is kept. A relative base such as `/api`
//! yields relative links; an absolute base yields absolute links.
//!
//! ## Usage
//!
//! ```rust
//! use jsonapi_core::links::ResourceLinks;
//!
//! let links = ResourceLinks::new("/api")?;
//! assert_eq!(links.resource_self("devices", "42"), "/api/devices/42");
//! assert_eq!(
//!     links.relationship_self("devices", "42", "owner"),
//!     "/api/devices/42/relationships/owner"
//! );
//! assert_eq!(links.relationship_related("devices", "42", "owner"), "/api/devices/42/owner");
//! # Ok::<(), jsonapi_core::JsonApiError>(())
//! ```

use crate::constants::links;
use crate::document::ResourceObject;
use crate::error::{JsonApiError, Result};
use serde_json::{Map, Value};
use url::{ParseError, Position, Url};

/// Host used to resolve relative link targets; never rendered
const RELATIVE_BASE: &str = "http://localhost/";

const RELATIONSHIPS_SEGMENT: &str = "relationships";

/// A parsed link target remembering whether it was given as a bare path
#[derive(Debug, Clone)]
pub(crate) struct LinkTarget {
    url: Url,
    relative: bool,
}

impl LinkTarget {
    /// Parse an absolute URL or a path with an optional query
    pub(crate) fn parse(target: &str) -> Result<Self> {
        let (url, relative) = match Url::parse(target) {
            Ok(url) => (url, false),
            Err(ParseError::RelativeUrlWithoutBase) => {
                let url = Url::parse(RELATIVE_BASE)
                    .and_then(|base| base.join(target))
                    .map_err(|e| invalid_target(target, e))?;
                (url, true)
            }
            Err(e) => return Err(invalid_target(target, e)),
        };

        if url.cannot_be_a_base() {
            return Err(JsonApiError::Configuration(format!(
                "Link target '{target}' cannot carry a path"
            )));
        }

        Ok(Self { url, relative })
    }

    pub(crate) fn url(&self) -> &Url {
        &self.url
    }

    /// Render `url` in the same form the target was given in
    pub(crate) fn render(&self, url: &Url) -> String {
        if self.relative {
            url[Position::BeforePath..].to_string()
        } else {
            url.to_string()
        }
    }

    /// Copy of the target with `segments` appended to its path and no query
    fn join_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.url.clone();
        url.set_query(None);
        url.set_fragment(None);
        // parse() rejects cannot-be-a-base URLs, the only case where this fails
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}

fn invalid_target(target: &str, error: ParseError) -> JsonApiError {
    JsonApiError::Configuration(format!("Invalid link target '{target}': {error}"))
}

/// Builds resource and relationship links below a base URL or path
#[derive(Debug, Clone)]
pub struct ResourceLinks {
    base: LinkTarget,
}

impl ResourceLinks {
    /// Links below `base`, e.g. `""`, `/api` or `https://example.com/api`
    pub fn new(base: &str) -> Result<Self> {
        Ok(Self {
            base: LinkTarget::parse(base)?,
        })
    }

    /// `/{type}/{id}`
    pub fn resource_self(&self, resource_type: &str, id: &str) -> String {
        self.render(&[resource_type, id])
    }

    /// `/{type}/{id}/relationships/{name}`
    pub fn relationship_self(&self, resource_type: &str, id: &str, name: &str) -> String {
        self.render(&[resource_type, id, RELATIONSHIPS_SEGMENT, name])
    }

    /// `/{type}/{id}/{name}`
    pub fn relationship_related(&self, resource_type: &str, id: &str, name: &str) -> String {
        self.render(&[resource_type, id, name])
    }

    /// `{"self": ...}` for a resource carrying an id
    pub fn resource_links(&self, resource: &ResourceObject) -> Option<Value> {
        let id = resource.id().ok().flatten()?;
        let mut object = Map::new();
        object.insert(
            links::SELF.to_string(),
            Value::String(self.resource_self(&resource.resource_type, &id)),
        );
        Some(Value::Object(object))
    }

    /// `{"self": ..., "related": ...}` for one relationship of a resource
    pub fn relationship_links(&self, resource_type: &str, id: &str, name: &str) -> Value {
        let mut object = Map::new();
        object.insert(
            links::SELF.to_string(),
            Value::String(self.relationship_self(resource_type, id, name)),
        );
        object.insert(
            links::RELATED.to_string(),
            Value::String(self.relationship_related(resource_type, id, name)),
        );
        Value::Object(object)
    }

    fn render(&self, segments: &[&str]) -> String {
        self.base.render(&self.base.join_segments(segments))
    }
}

/// The `related` link for a relationship request URI.
///
/// `/devices/42/relationships/owner?x=1` becomes `/devices/42/owner?x=1`. Returns
/// `None` when the URI does not address a relationship or cannot be parsed.
pub fn related_from_relationship_uri(uri: &str) -> Option<String> {
    let target = LinkTarget::parse(uri).ok()?;
    let segments: Vec<&str> = target.url().path_segments()?.collect();
    let position = segments
        .iter()
        .position(|segment| *segment == RELATIONSHIPS_SEGMENT)?;
    if position == 0 || position + 1 >= segments.len() {
        return None;
    }

    let mut url = target.url().clone();
    let related: Vec<&str> = segments
        .iter()
        .enumerate()
        .filter(|(index, _)| *index != position)
        .map(|(_, segment)| *segment)
        .collect();
    url.set_path(&format!("/{}", related.join("/")));
    Some(target.render(&url))
}
