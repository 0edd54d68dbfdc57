//! Shared helpers.

pub mod serde;

use uuid::Uuid;

/// Parse a client-supplied identifier as a hyphenated 128-bit UUID.
///
/// Only the canonical `8-4-4-4-12` form is accepted; braced, URN and
/// unhyphenated spellings are treated as invalid.
pub fn parse_identifier(value: &str) -> Option<Uuid> {
    if value.len() != 36 {
        return None;
    }

    let hyphens_in_place = value
        .char_indices()
        .all(|(i, c)| matches!(i, 8 | 13 | 18 | 23) == (c == '-'));
    if !hyphens_in_place {
        return None;
    }

    Uuid::parse_str(value).ok()
}
