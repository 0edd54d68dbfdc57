use chrono::{FixedOffset, TimeZone};
use proptest::prelude::*;

/// Strategy for primitive type tokens as they appear in declared type unions
pub fn primitive_token_strategy() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec!["string", "int", "float", "bool", "array", "mixed"])
}

/// Strategy for date-times with whole-second precision and a minute-aligned offset
pub fn date_time_strategy() -> impl Strategy<Value = chrono::DateTime<FixedOffset>> {
    (0i64..4_102_444_800, -720i32..=840).prop_map(|(seconds, offset_minutes)| {
        let offset = FixedOffset::east_opt(offset_minutes * 60)
            .unwrap_or_else(|| FixedOffset::east_opt(0).unwrap());
        offset.timestamp_opt(seconds, 0).unwrap()
    })
}

/// Strategy for strings that are never valid UUIDs
pub fn non_uuid_strategy() -> impl Strategy<Value = String> {
    "[g-z][a-z0-9-]{0,40}"
}

/// Strategy for (total, limit) pagination inputs
pub fn pagination_strategy() -> impl Strategy<Value = (u64, u64)> {
    (0u64..10_000, 1u64..500)
}
