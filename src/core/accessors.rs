//! Typed access to the well-known fields of an [`Event`]
//!
//! Each accessor looks the field up under the key the event's
//! [`FieldKeysSpec`](super::field_keys::FieldKeysSpec) names, resolves it
//! the way a consumer would (lazy and filtered values included) and coerces
//! it into one canonical type. Formatters can rely on never receiving a
//! value they cannot convert.

use super::error::FacadeError;
use super::event::Event;
use super::value::Value;
use chrono::{DateTime, Utc};
use std::error::Error as StdError;
use std::sync::Arc;

fn resolved(event: &Event, key: &str) -> Option<Value> {
    event
        .get(key)?
        .resolve_for(event)
        .filter(|value| !value.is_null())
}

/// String, then display-able, then named, then the generic rendering
fn text_of(value: Value) -> String {
    match value {
        Value::String(s) => s,
        Value::Display(d) => d.to_string(),
        Value::Named(n) => n.name().to_owned(),
        other => other.to_string(),
    }
}

/// The message of `event`, if any
pub fn message_of(event: &Event) -> Option<String> {
    resolved(event, event.field_keys_spec().message()).map(text_of)
}

/// The name of the logger that emitted `event`, if recorded
pub fn logger_of(event: &Event) -> Option<String> {
    resolved(event, event.field_keys_spec().logger()).map(text_of)
}

/// The error attached to `event`.
///
/// Anything stored under the error key that is not an error itself is
/// wrapped into one carrying its rendering.
pub fn error_of(event: &Event) -> Option<Arc<dyn StdError + Send + Sync>> {
    match resolved(event, event.field_keys_spec().error())? {
        Value::Error(err) => Some(err),
        other => Some(Arc::new(FacadeError::other(text_of(other)))),
    }
}

/// The timestamp of `event`.
///
/// Accepts a timestamp, an RFC 3339 string or an integer of milliseconds
/// since the Unix epoch. Other values yield `None`.
pub fn timestamp_of(event: &Event) -> Option<DateTime<Utc>> {
    match resolved(event, event.field_keys_spec().timestamp())? {
        Value::Timestamp(ts) => Some(ts),
        Value::String(s) => DateTime::parse_from_rfc3339(&s)
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Value::Display(d) => DateTime::parse_from_rfc3339(&d.to_string())
            .ok()
            .map(|ts| ts.with_timezone(&Utc)),
        Value::Int(millis) => DateTime::from_timestamp_millis(millis),
        Value::UInt(millis) => DateTime::from_timestamp_millis(i64::try_from(millis).ok()?),
        _ => None,
    }
}
