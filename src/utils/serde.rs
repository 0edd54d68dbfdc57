/*!
 * Serde utilities for common serialization/deserialization patterns.
 *
 * These helpers cover the places where the JSON:API wire format is looser
 * than Rust types: status codes that may arrive as numbers or strings, and
 * members whose absence means something different from an explicit `null`.
 */

use serde::{Deserialize, Deserializer, Serializer};

/// Deserialize an HTTP status code represented as a number or a numeric string.
///
/// JSON:API mandates string status codes, but error documents produced by other
/// tools frequently carry plain numbers:
///
/// ```json
/// { "status": "422" }
/// { "status": 422 }
/// ```
pub fn deserialize_status_code<'de, D>(deserializer: D) -> std::result::Result<u16, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Number(n) => n
            .as_u64()
            .and_then(|n| u16::try_from(n).ok())
            .ok_or_else(|| D::Error::custom(format!("Invalid status code: {n}"))),
        serde_json::Value::String(s) => s
            .trim()
            .parse::<u16>()
            .map_err(|_| D::Error::custom(format!("Cannot parse '{s}' as status code"))),
        other => Err(D::Error::custom(format!(
            "Expected status code, found: {other}"
        ))),
    }
}

/// Serialize an HTTP status code as a string, as JSON:API requires
pub fn serialize_status_code<S>(status: &u16, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_str(status)
}

/// Deserialize a member that distinguishes "absent" from "present but null".
///
/// Use together with `#[serde(default)]`:
///
/// - member absent → `None` (via `Default`)
/// - `"member": null` → `Some(None)`
/// - `"member": value` → `Some(Some(value))`
///
/// ```rust
/// use serde::Deserialize;
/// use jsonapi_core::utils::serde::deserialize_present;
///
/// #[derive(Deserialize)]
/// struct Resource {
///     #[serde(default, deserialize_with = "deserialize_present")]
///     id: Option<Option<String>>,
/// }
///
/// let absent: Resource = serde_json::from_str("{}").unwrap();
/// assert_eq!(absent.id, None);
/// let null: Resource = serde_json::from_str(r#"{"id": null}"#).unwrap();
/// assert_eq!(null.id, Some(None));
/// ```
pub fn deserialize_present<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}
