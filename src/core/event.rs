//! Immutable log events
//!
//! An [`Event`] couples a [`Level`], a call depth and a [`Fields`] payload.
//! Level and call depth never change once the event exists; every `with*`
//! call yields a new event carrying the same level and depth.

use super::error::Result;
use super::field_keys::FieldKeysSpec;
use super::fields::Fields;
use super::filtered::FilterContext;
use super::lazy::LazyFormat;
use super::level::Level;
use super::provider::Provider;
use super::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::any::Any;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// Opaque per-event context, e.g. a request scope handed through by the caller
pub type EventContext = Arc<dyn Any + Send + Sync>;

#[derive(Clone)]
pub struct Event {
    level: Level,
    call_depth: usize,
    fields: Fields,
    context: Option<EventContext>,
    keys: Arc<dyn FieldKeysSpec>,
}

impl Event {
    /// New event without fields; well-known keys come from `provider`
    pub fn new<P: Provider + ?Sized>(provider: &P, level: Level, call_depth: usize) -> Self {
        Self::from_keys_spec(provider.field_keys_spec(), level, call_depth)
    }

    pub fn from_keys_spec(keys: Arc<dyn FieldKeysSpec>, level: Level, call_depth: usize) -> Self {
        Self {
            level,
            call_depth,
            fields: Fields::empty(),
            context: None,
            keys,
        }
    }

    fn derive(&self, fields: Fields) -> Self {
        Self {
            level: self.level,
            call_depth: self.call_depth,
            fields,
            context: self.context.clone(),
            keys: Arc::clone(&self.keys),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    /// Stack frames to skip when reporting the source location
    pub fn call_depth(&self) -> usize {
        self.call_depth
    }

    pub fn context(&self) -> Option<&EventContext> {
        self.context.as_ref()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn field_keys_spec(&self) -> &Arc<dyn FieldKeysSpec> {
        &self.keys
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// See [`Fields::for_each`]
    pub fn for_each<E, F>(&self, consumer: F) -> std::result::Result<(), E>
    where
        F: FnMut(&str, &Value) -> std::result::Result<(), E>,
    {
        self.fields.for_each(consumer)
    }

    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Event {
        self.derive(self.fields.with(key, value))
    }

    #[must_use]
    pub fn withf(&self, key: impl Into<String>, format: LazyFormat) -> Event {
        self.derive(self.fields.withf(key, format))
    }

    /// Attach `err` under the provider's error key
    #[must_use]
    pub fn with_error<E>(&self, err: E) -> Event
    where
        E: StdError + Send + Sync + 'static,
    {
        self.with(self.keys.error().to_owned(), Value::error(err))
    }

    #[must_use]
    pub fn with_all<I, K, V>(&self, entries: I) -> Event
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.derive(self.fields.with_all(entries))
    }

    #[must_use]
    pub fn with_fields(&self, fields: &Fields) -> Event {
        self.derive(self.fields.with_fields(fields))
    }

    #[must_use]
    pub fn without<I>(&self, keys: I) -> Event
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.derive(self.fields.without(keys))
    }

    #[must_use]
    pub fn with_context(&self, context: EventContext) -> Event {
        let mut event = self.clone();
        event.context = Some(context);
        event
    }

    /// Same event, `add` frames deeper
    #[must_use]
    pub fn with_call_depth(&self, add: usize) -> Event {
        let mut event = self.clone();
        event.call_depth = self.call_depth.saturating_add(add);
        event
    }

    /// Serialize to a JSON object of the rendered fields plus the level
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl FilterContext for Event {
    fn level(&self) -> Level {
        self.level
    }

    fn field(&self, key: &str) -> Option<Value> {
        self.fields.get(key).cloned()
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("level", &self.level)
            .field("call_depth", &self.call_depth)
            .field("fields", &self.fields)
            .field("has_context", &self.context.is_some())
            .finish()
    }
}

impl Serialize for Event {
    /// Fields are rendered the way a consumer sees them: lazies resolved,
    /// filtered values decided against this event, excluded entries dropped
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("level", &self.level)?;
        self.fields.for_each(|key, value| match value.resolve_for(self) {
            Some(rendered) if key != "level" => map.serialize_entry(key, &rendered),
            _ => Ok(()),
        })?;
        map.end()
    }
}
