//! Per-kind value coercion.
//!
//! Scalars follow loose conversion rules (`true` reads as `"1"` for text and `1`
//! for numbers, numeric strings read as numbers). Values that cannot be coerced
//! come back as `None`, never as a guess.

use super::{Field, FieldKind};
use crate::constants::{record_keys, DATE_TIME_FORMAT};
use crate::error::{JsonApiError, Result};
use crate::metadata::EnumCase;
use crate::value::{EnumValue, HydratedValue};
use chrono::DateTime;
use serde_json::{Map, Value};

pub(super) fn extract<E>(field: &Field, raw: Option<&Value>) -> Result<Option<HydratedValue<E>>> {
    let value = raw.filter(|v| !v.is_null());

    let hydrated = match field.kind() {
        FieldKind::Text { nullable } => value.and_then(scalar_to_text).and_then(|text| {
            if *nullable && text.is_empty() {
                None
            } else {
                Some(HydratedValue::Text(text))
            }
        }),
        FieldKind::Number { decimal, .. } => value.and_then(|v| scalar_to_number(v, *decimal)),
        FieldKind::Boolean { nullable } => match value {
            Some(v) => Some(HydratedValue::Bool(is_truthy(v))),
            None if *nullable => None,
            None => Some(HydratedValue::Bool(false)),
        },
        FieldKind::Array { nullable } => match value {
            Some(v @ (Value::Array(_) | Value::Object(_))) => Some(HydratedValue::Json(v.clone())),
            Some(scalar) => Some(HydratedValue::Json(Value::Array(vec![scalar.clone()]))),
            None if *nullable => Some(HydratedValue::Json(Value::Array(Vec::new()))),
            None => None,
        },
        FieldKind::DateTime { .. } => value.and_then(parse_date_time),
        FieldKind::Enum {
            type_class,
            backed,
            cases,
            ..
        } => value
            .and_then(|v| match_enum_case(cases, *backed, v))
            .map(|case| {
                HydratedValue::Enum(EnumValue {
                    type_class: type_class.clone(),
                    case: case.name.clone(),
                    value: case.value.clone(),
                })
            }),
        FieldKind::Mixed { .. } => value.cloned().map(HydratedValue::Json),
        FieldKind::SingleEntity(target) => {
            if target.relationship {
                return Err(JsonApiError::invalid_state(format!(
                    "Single entity field '{}' could not be mapped as attribute.",
                    field.mapped_name()
                )));
            }
            match value {
                Some(Value::Object(map)) if !map.is_empty() => {
                    let mut tagged: Map<String, Value> = map.clone();
                    tagged.insert(
                        record_keys::ENTITY.to_string(),
                        Value::String(target.class_name.clone()),
                    );
                    Some(HydratedValue::Json(Value::Object(tagged)))
                }
                Some(Value::Object(_)) if !target.nullable => {
                    Some(HydratedValue::Json(Value::Object(Map::new())))
                }
                _ => None,
            }
        }
        FieldKind::Collection(_) => {
            return Err(JsonApiError::invalid_state(format!(
                "Collection field '{}' could not be mapped as attribute.",
                field.mapped_name()
            )));
        }
    };

    Ok(hydrated)
}

fn scalar_to_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        _ => None,
    }
}

fn scalar_to_number<E>(value: &Value, decimal: bool) -> Option<HydratedValue<E>> {
    let number = match value {
        Value::Number(n) => n.as_f64()?,
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };

    if !number.is_finite() {
        return None;
    }

    if decimal {
        Some(HydratedValue::Decimal(number))
    } else if let Some(integer) = value.as_i64() {
        Some(HydratedValue::Integer(integer))
    } else {
        Some(HydratedValue::Integer(number.trunc() as i64))
    }
}

/// Loose truthiness: `false`, `0`, `""`, `"0"` and `[]` are false
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn parse_date_time<E>(value: &Value) -> Option<HydratedValue<E>> {
    let text = value.as_str()?;
    let parsed = DateTime::parse_from_str(text, DATE_TIME_FORMAT).ok()?;

    (parsed.format(DATE_TIME_FORMAT).to_string() == text).then_some(HydratedValue::DateTime(parsed))
}

fn match_enum_case<'a>(cases: &'a [EnumCase], backed: bool, value: &Value) -> Option<&'a EnumCase> {
    if backed {
        cases
            .iter()
            .find(|case| case.value.as_ref().is_some_and(|backing| backing == value))
    } else {
        let name = value.as_str()?;
        cases.iter().find(|case| case.name == name)
    }
}

#[cfg(test)]
mod tests {
    use crate::document::Attributes;
    use crate::error::JsonApiError;
    use crate::fields::{EntityTarget, Field, FieldKind};
    use crate::metadata::{CrudFlags, EnumCase};
    use crate::value::HydratedValue;
    use serde_json::json;

    type Hv = HydratedValue<()>;

    fn field(kind: FieldKind) -> Field {
        Field::new("value", "value", kind, CrudFlags::unrestricted())
    }

    fn read(kind: FieldKind, value: serde_json::Value) -> Option<Hv> {
        let attributes = Attributes::try_from(json!({ "value": value })).unwrap();
        field(kind).get_value(&attributes).unwrap()
    }

    #[test]
    fn test_text_coercion() {
        let text = FieldKind::Text { nullable: false };
        assert_eq!(read(text.clone(), json!("abc")), Some(Hv::Text("abc".into())));
        assert_eq!(read(text.clone(), json!(12)), Some(Hv::Text("12".into())));
        assert_eq!(read(text.clone(), json!(true)), Some(Hv::Text("1".into())));
        assert_eq!(read(text.clone(), json!("")), Some(Hv::Text(String::new())));
        assert_eq!(read(text, json!([1])), None);
        assert_eq!(read(FieldKind::Text { nullable: true }, json!("")), None);
    }

    #[test]
    fn test_number_coercion() {
        let integer = FieldKind::Number {
            decimal: false,
            nullable: false,
        };
        let decimal = FieldKind::Number {
            decimal: true,
            nullable: false,
        };
        assert_eq!(read(integer.clone(), json!(7)), Some(Hv::Integer(7)));
        assert_eq!(read(integer.clone(), json!("42")), Some(Hv::Integer(42)));
        assert_eq!(read(integer.clone(), json!(3.9)), Some(Hv::Integer(3)));
        assert_eq!(read(integer.clone(), json!("abc")), None);
        assert_eq!(read(integer, json!(null)), None);
        assert_eq!(read(decimal.clone(), json!(2)), Some(Hv::Decimal(2.0)));
        assert_eq!(read(decimal, json!("1.5")), Some(Hv::Decimal(1.5)));
    }

    #[test]
    fn test_boolean_coercion() {
        let strict = FieldKind::Boolean { nullable: false };
        assert_eq!(read(strict.clone(), json!(true)), Some(Hv::Bool(true)));
        assert_eq!(read(strict.clone(), json!("0")), Some(Hv::Bool(false)));
        assert_eq!(read(strict.clone(), json!(1)), Some(Hv::Bool(true)));
        assert_eq!(read(strict, json!(null)), Some(Hv::Bool(false)));
        assert_eq!(read(FieldKind::Boolean { nullable: true }, json!(null)), None);
    }

    #[test]
    fn test_array_coercion() {
        let array = FieldKind::Array { nullable: false };
        assert_eq!(read(array.clone(), json!([1, 2])), Some(Hv::Json(json!([1, 2]))));
        assert_eq!(
            read(array.clone(), json!({ "a": 1 })),
            Some(Hv::Json(json!({ "a": 1 })))
        );
        assert_eq!(read(array.clone(), json!("x")), Some(Hv::Json(json!(["x"]))));
        assert_eq!(read(array, json!(null)), None);
        assert_eq!(
            read(FieldKind::Array { nullable: true }, json!(null)),
            Some(Hv::Json(json!([])))
        );
    }

    #[test]
    fn test_date_time_round_trip() {
        let kind = FieldKind::DateTime { nullable: true };
        let value = read(kind.clone(), json!("2024-01-31T12:00:00+02:00")).unwrap();
        match value {
            HydratedValue::DateTime(parsed) => {
                assert_eq!(parsed.to_rfc3339(), "2024-01-31T12:00:00+02:00");
            }
            other => panic!("unexpected value: {other:?}"),
        }

        assert_eq!(read(kind.clone(), json!("2024-01-31")), None);
        assert_eq!(read(kind.clone(), json!("2024-01-31T12:00:00.000+02:00")), None);
        assert_eq!(read(kind, json!(1706702400)), None);
    }

    #[test]
    fn test_enum_coercion() {
        let backed = FieldKind::Enum {
            type_class: "Status".into(),
            backed: true,
            cases: vec![EnumCase::backed("Active", "active"), EnumCase::backed("Off", "off")],
            nullable: false,
        };
        match read(backed.clone(), json!("off")) {
            Some(HydratedValue::Enum(value)) => {
                assert_eq!(value.case, "Off");
                assert_eq!(value.type_class, "Status");
            }
            other => panic!("unexpected value: {other:?}"),
        }
        assert_eq!(read(backed, json!("unknown")), None);

        let classic = FieldKind::Enum {
            type_class: "Mode".into(),
            backed: false,
            cases: vec![EnumCase::unit("Auto")],
            nullable: false,
        };
        assert!(read(classic.clone(), json!("Auto")).is_some());
        assert_eq!(read(classic, json!("auto")), None);
    }

    #[test]
    fn test_mixed_passthrough() {
        let mixed = FieldKind::Mixed { nullable: true };
        assert_eq!(read(mixed.clone(), json!({ "a": [1] })), Some(Hv::Json(json!({ "a": [1] }))));
        assert_eq!(read(mixed, json!(null)), None);
    }

    #[test]
    fn test_embedded_entity_is_tagged() {
        let embedded = FieldKind::SingleEntity(EntityTarget::new("Address", true, false));
        assert_eq!(
            read(embedded.clone(), json!({ "city": "Prague" })),
            Some(Hv::Json(json!({ "city": "Prague", "entity": "Address" })))
        );
        assert_eq!(read(embedded, json!({})), None);
    }

    #[test]
    fn test_relation_fields_reject_attribute_reads() {
        let attributes = Attributes::new();
        let relation = field(FieldKind::SingleEntity(EntityTarget::new("Owner", false, true)));
        let collection = field(FieldKind::Collection(EntityTarget::new("Tag", true, true)));

        assert!(matches!(
            relation.get_value::<()>(&attributes),
            Err(JsonApiError::InvalidState(_))
        ));
        assert!(matches!(
            collection.get_value::<()>(&attributes),
            Err(JsonApiError::InvalidState(message)) if message.contains("Collection field 'value'")
        ));
    }
}
