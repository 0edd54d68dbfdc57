//! # Message Translation
//!
//! The hydrator never hard-codes user-facing error text. Titles and details are
//! looked up through a [`Translator`] using fixed message keys, so applications can
//! plug in their own localization.

use std::collections::HashMap;

/// Messages the hydrator can emit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    ResourceInvalid,
    IdentifierInvalid,
    MissingRequiredAttribute,
    MissingRequiredRelation,
}

impl MessageKey {
    pub const ALL: [MessageKey; 4] = [
        MessageKey::ResourceInvalid,
        MessageKey::IdentifierInvalid,
        MessageKey::MissingRequiredAttribute,
        MessageKey::MissingRequiredRelation,
    ];

    /// Stable identifier of the message
    pub fn identifier(self) -> &'static str {
        match self {
            MessageKey::ResourceInvalid => "resourceInvalid",
            MessageKey::IdentifierInvalid => "identifierInvalid",
            MessageKey::MissingRequiredAttribute => "missingRequiredAttribute",
            MessageKey::MissingRequiredRelation => "missingRequiredRelation",
        }
    }

    /// Lookup key for the error title
    pub fn heading_key(self) -> String {
        format!("jsonApi.hydrator.{}.heading", self.identifier())
    }

    /// Lookup key for the error detail
    pub fn message_key(self) -> String {
        format!("jsonApi.hydrator.{}.message", self.identifier())
    }
}

/// Opaque source of localized strings
pub trait Translator: Send + Sync {
    /// Return the localized text for `key`; unknown keys should come back unchanged
    fn translate(&self, key: &str) -> String;

    fn heading(&self, key: MessageKey) -> String {
        self.translate(&key.heading_key())
    }

    fn message(&self, key: MessageKey) -> String {
        self.translate(&key.message_key())
    }
}

/// English messages with optional per-key overrides
#[derive(Debug, Clone, Default)]
pub struct DefaultTranslator {
    overrides: HashMap<String, String>,
}

impl DefaultTranslator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the text for one lookup key
    pub fn with_message(mut self, key: impl Into<String>, text: impl Into<String>) -> Self {
        self.overrides.insert(key.into(), text.into());
        self
    }

    fn builtin(key: &str) -> Option<&'static str> {
        let text = match key {
            "jsonApi.hydrator.resourceInvalid.heading" => "Invalid resource",
            "jsonApi.hydrator.resourceInvalid.message" => {
                "Provided document does not contain a valid resource object"
            }
            "jsonApi.hydrator.identifierInvalid.heading" => "Invalid identifier",
            "jsonApi.hydrator.identifierInvalid.message" => {
                "Provided resource identifier is not a valid UUID"
            }
            "jsonApi.hydrator.missingRequiredAttribute.heading" => "Missing required attribute",
            "jsonApi.hydrator.missingRequiredAttribute.message" => {
                "Required attribute is missing or has an invalid value"
            }
            "jsonApi.hydrator.missingRequiredRelation.heading" => "Missing required relation",
            "jsonApi.hydrator.missingRequiredRelation.message" => {
                "Required relation is missing or points to an unknown resource"
            }
            _ => return None,
        };
        Some(text)
    }
}

impl Translator for DefaultTranslator {
    fn translate(&self, key: &str) -> String {
        if let Some(text) = self.overrides.get(key) {
            return text.clone();
        }
        Self::builtin(key).map_or_else(|| key.to_string(), str::to_string)
    }
}
