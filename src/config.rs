//! # Configuration
//!
//! Crate-wide settings: the record key receiving identifiers, top-level document
//! meta (author, copyright) and pagination limits.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use jsonapi_core::config::JsonApiConfig;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Defaults overridden by JSONAPI_* environment variables
//! let config = JsonApiConfig::from_env()?;
//!
//! // Optional file layered with JSONAPI__* environment variables
//! let config = JsonApiConfig::load("config/jsonapi.toml")?;
//! assert!(config.pagination.max_limit >= config.pagination.default_limit);
//! # Ok(())
//! # }
//! ```

use crate::constants::record_keys;
use crate::error::{JsonApiError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// Default document author
pub const DEFAULT_AUTHOR: &str = "JSON:API";

/// One author or a list of them
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    One(String),
    Many(Vec<String>),
}

impl Default for Authors {
    fn default() -> Self {
        Authors::One(DEFAULT_AUTHOR.to_string())
    }
}

impl Authors {
    /// Parse a comma separated list; a single entry stays a single author
    pub fn parse(value: &str) -> Self {
        let mut names: Vec<String> = value
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        match names.len() {
            0 => Authors::default(),
            1 => Authors::One(names.remove(0)),
            _ => Authors::Many(names),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaConfig {
    pub author: Authors,
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: 20,
            max_limit: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonApiConfig {
    /// Record key receiving the identifier on create
    pub identifier_key: String,
    pub meta: MetaConfig,
    pub pagination: PaginationConfig,
}

impl Default for JsonApiConfig {
    fn default() -> Self {
        Self {
            identifier_key: record_keys::IDENTIFIER.to_string(),
            meta: MetaConfig::default(),
            pagination: PaginationConfig::default(),
        }
    }
}

impl JsonApiConfig {
    /// Defaults overridden by `JSONAPI_IDENTIFIER_KEY`, `JSONAPI_META_AUTHOR`
    /// (comma separated), `JSONAPI_META_COPYRIGHT` and `JSONAPI_PAGINATION_DEFAULT_LIMIT`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`JsonApiConfig::from_env`] with a custom variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(identifier_key) = lookup("JSONAPI_IDENTIFIER_KEY") {
            config.identifier_key = identifier_key;
        }

        if let Some(author) = lookup("JSONAPI_META_AUTHOR") {
            config.meta.author = Authors::parse(&author);
        }

        if let Some(copyright) = lookup("JSONAPI_META_COPYRIGHT") {
            config.meta.copyright = Some(copyright);
        }

        if let Some(limit) = lookup("JSONAPI_PAGINATION_DEFAULT_LIMIT") {
            config.pagination.default_limit = limit.parse().map_err(|e| {
                JsonApiError::Configuration(format!("Invalid pagination default limit: {e}"))
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Load an optional file (format from its extension) layered with
    /// `JSONAPI__*` environment variables, e.g. `JSONAPI__PAGINATION__MAX_LIMIT`
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "Loading JSON:API configuration");

        let settings = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("JSONAPI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: JsonApiConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.identifier_key.trim().is_empty() {
            return Err(JsonApiError::Configuration(
                "identifier_key must not be empty".to_string(),
            ));
        }

        if self.pagination.default_limit == 0 || self.pagination.max_limit == 0 {
            return Err(JsonApiError::Configuration(
                "pagination limits must be greater than zero".to_string(),
            ));
        }

        if self.pagination.default_limit > self.pagination.max_limit {
            return Err(JsonApiError::Configuration(format!(
                "pagination default_limit ({}) exceeds max_limit ({})",
                self.pagination.default_limit, self.pagination.max_limit
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = JsonApiConfig::default();
        assert_eq!(config.identifier_key, "id");
        assert_eq!(config.meta.author, Authors::One("JSON:API".to_string()));
        assert_eq!(config.pagination.default_limit, 20);
        assert_eq!(config.pagination.max_limit, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_overrides() {
        let config = JsonApiConfig::from_lookup(lookup(&[
            ("JSONAPI_IDENTIFIER_KEY", "uuid"),
            ("JSONAPI_META_AUTHOR", "Alice, Bob"),
            ("JSONAPI_META_COPYRIGHT", "ACME"),
        ]))
        .unwrap();

        assert_eq!(config.identifier_key, "uuid");
        assert_eq!(
            config.meta.author,
            Authors::Many(vec!["Alice".to_string(), "Bob".to_string()])
        );
        assert_eq!(config.meta.copyright.as_deref(), Some("ACME"));
    }

    #[test]
    fn test_invalid_limit_is_configuration_error() {
        let result = JsonApiConfig::from_lookup(lookup(&[("JSONAPI_PAGINATION_DEFAULT_LIMIT", "lots")]));
        assert!(matches!(result, Err(JsonApiError::Configuration(_))));

        let result = JsonApiConfig::from_lookup(lookup(&[("JSONAPI_PAGINATION_DEFAULT_LIMIT", "500")]));
        assert!(matches!(result, Err(JsonApiError::Configuration(message)) if message.contains("exceeds")));
    }

    #[test]
    fn test_empty_identifier_key_rejected() {
        let config = JsonApiConfig {
            identifier_key: "  ".to_string(),
            ..JsonApiConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_authors_deserialize_from_string_or_list() {
        let one: Authors = serde_json::from_str(r#""Alice""#).unwrap();
        let many: Authors = serde_json::from_str(r#"["Alice", "Bob"]"#).unwrap();
        assert_eq!(one, Authors::One("Alice".to_string()));
        assert_eq!(many.clone(), Authors::parse("Alice,Bob"));
        assert_eq!(Authors::parse(" "), Authors::default());
    }
}
