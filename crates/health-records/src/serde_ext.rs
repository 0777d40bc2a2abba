//! Field-level serde helpers shared by the record shapes.

use crate::date::{format_for_backend, parse_backend_date};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Treat `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lenient timestamp: unparseable or null values become `None`.
pub(crate) fn backend_date<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_backend_date))
}

pub(crate) fn to_backend_date<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(date) => serializer.serialize_str(&format_for_backend(date)),
        None => serializer.serialize_none(),
    }
}

/// For tri-state update fields; the outer `None` is skipped by the caller.
pub(crate) fn to_backend_date_patch<S>(
    value: &Option<Option<DateTime<Utc>>>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    to_backend_date(&value.flatten(), serializer)
}
