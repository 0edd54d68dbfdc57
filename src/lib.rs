#![allow(clippy::doc_markdown)] // Allow technical terms like JSON:API in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # JSON:API Core
//!
//! Request-side binding of JSON:API documents onto domain entities.
//!
//! ## Overview
//!
//! A client sends a JSON:API document to create or update a resource. This crate
//! turns that document into a [`HydratedRecord`](value::HydratedRecord): a map of
//! domain field names to typed values (text, numbers, date-times, enumeration cases,
//! related entities, nested value objects) that the application uses to construct or
//! update its entity. Every validation failure found along the way is collected and
//! reported together as JSON:API error objects with JSON pointers into the request.
//!
//! ## Architecture
//!
//! ```text
//! Document ──► HydratorRegistry ──► Hydrator ──► HydratedRecord
//!                                      │
//!                                      ├── EntityFieldMapper  (MetadataProvider, CrudReader)
//!                                      │   └── FieldMapping of typed Fields
//!                                      ├── attribute pass     (coercion, hooks, embedded objects)
//!                                      ├── relationship pass  (hooks, EntityRepository lookups)
//!                                      └── ErrorCollection    (422 errors with pointers)
//! ```
//!
//! ## Module Organization
//!
//! - [`document`] - Typed request document model
//! - [`metadata`] - Entity descriptors, type capabilities and CRUD flags
//! - [`fields`] - Field model and per-kind value coercion
//! - [`mapper`] - Entity class => field mapping
//! - [`hydrator`] - Document => record hydration
//! - [`registry`] - Resource type => hydrator routing
//! - [`error`] - JSON:API error objects and the crate error type
//! - [`links`] - Resource and relationship link conventions
//! - [`pagination`] - Page parameters, links and document meta
//! - [`config`] - Crate configuration
//! - [`logging`] - Structured logging setup
//!
//! ## Quick Start
//!
//! ```rust
//! use jsonapi_core::hydrator::{Hydrator, HydratorDefinition};
//! use jsonapi_core::test_utils::{fixture_metadata, InMemoryRepository};
//! use jsonapi_core::Document;
//! use std::sync::Arc;
//!
//! let repository = Arc::new(InMemoryRepository::new());
//! let owner = repository.create("Owner");
//!
//! let hydrator = Hydrator::new(
//!     HydratorDefinition::new("Device", "devices")
//!         .attribute("name")
//!         .attribute("state")
//!         .relationship("owner"),
//!     Arc::new(fixture_metadata()),
//!     repository,
//! );
//!
//! let document: Document = format!(
//!     r#"{{"data": {{
//!         "type": "devices",
//!         "attributes": {{"name": "Thermostat", "state": "ready"}},
//!         "relationships": {{"owner": {{"data": {{"type": "owners", "id": "{}"}}}}}}
//!     }}}}"#,
//!     owner.id
//! )
//! .parse()
//! .unwrap();
//!
//! let record = hydrator.hydrate(&document, None).unwrap();
//! assert_eq!(record.get("owner").and_then(|v| v.as_entity()), Some(&owner));
//! ```

pub mod config;
pub mod constants;
pub mod document;
pub mod error;
pub mod fields;
pub mod hydrator;
pub mod links;
pub mod logging;
pub mod mapper;
pub mod metadata;
pub mod pagination;
pub mod registry;
#[doc(hidden)]
pub mod test_utils;
pub mod translator;
pub mod utils;
pub mod value;

pub use config::JsonApiConfig;
pub use document::Document;
pub use error::{ErrorCollection, ErrorObject, JsonApiError, Result};
pub use fields::{Field, FieldKind, FieldMapping};
pub use hydrator::{EntityRepository, Hydrator, HydratorDefinition};
pub use mapper::EntityFieldMapper;
pub use metadata::{InMemoryMetadataProvider, MetadataProvider};
pub use registry::HydratorRegistry;
pub use value::{HydratedRecord, HydratedValue};
