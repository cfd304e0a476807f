//! Loggers
//!
//! [`CoreLogger`] is what a provider implements: a level check plus a sink
//! for finished events. [`Logger`] is the handle application code holds; it
//! carries its own [`Fields`] and turns calls like `info("...")` into events.

use super::consumer::Consumer;
use super::error::Result;
use super::event::Event;
use super::field_keys::FieldKeysSpec;
use super::fields::Fields;
use super::lazy::LazyFormat;
use super::level::Level;
use super::metrics::LoggerMetrics;
use super::value::Value;
use chrono::Utc;
use parking_lot::RwLock;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

pub trait CoreLogger: Send + Sync {
    fn name(&self) -> &str;

    fn is_level_enabled(&self, level: Level) -> bool;

    /// Emit `event`. `skip_frames` is added to the event's call depth to
    /// account for the frames between the caller and this method.
    fn log(&self, event: &Event, skip_frames: usize);

    fn field_keys_spec(&self) -> Arc<dyn FieldKeysSpec>;

    /// Called by callers that checked the level themselves and skipped
    /// building an event at a disabled `level`
    fn record_filtered(&self, _level: Level) {}

    fn new_event(&self, level: Level) -> Event {
        Event::from_keys_spec(self.field_keys_spec(), level, 0)
    }
}

fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// A [`CoreLogger`] that hands events to a list of consumers
///
/// Level, consumers and metrics are shared handles so every logger of one
/// provider sees level changes and consumer additions immediately.
pub struct ConsumingLogger {
    name: String,
    level: Arc<RwLock<Level>>,
    consumers: Arc<RwLock<Vec<Box<dyn Consumer>>>>,
    metrics: Arc<LoggerMetrics>,
    keys: Arc<dyn FieldKeysSpec>,
}

impl ConsumingLogger {
    pub fn new(
        name: impl Into<String>,
        level: Arc<RwLock<Level>>,
        consumers: Arc<RwLock<Vec<Box<dyn Consumer>>>>,
        metrics: Arc<LoggerMetrics>,
        keys: Arc<dyn FieldKeysSpec>,
    ) -> Self {
        Self {
            name: name.into(),
            level,
            consumers,
            metrics,
            keys,
        }
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Logger and timestamp entries are filled in unless the caller set them
    fn complete(&self, event: &Event, skip_frames: usize) -> Event {
        let mut event = event.with_call_depth(skip_frames);
        if !event.fields().contains_key(self.keys.logger()) {
            event = event.with(self.keys.logger().to_owned(), self.name.as_str());
        }
        if !event.fields().contains_key(self.keys.timestamp()) {
            event = event.with(self.keys.timestamp().to_owned(), Utc::now());
        }
        event
    }

    /// Deliver to every consumer; one failing or panicking consumer does not
    /// keep the event from the others
    fn dispatch(&self, event: &Event) {
        let mut consumers = self.consumers.write();
        let mut has_error = false;

        for consumer in consumers.iter_mut() {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                consumer.consume(event)
            }));

            match result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    eprintln!("[LOGGER ERROR] Consumer '{}' failed: {}", consumer.name(), e);
                    has_error = true;
                }
                Err(panic_info) => {
                    eprintln!(
                        "[LOGGER CRITICAL] Consumer '{}' panicked: {}. \
                         Other consumers continue to function.",
                        consumer.name(),
                        panic_message(panic_info.as_ref())
                    );
                    has_error = true;
                }
            }
        }

        if has_error {
            self.metrics.record_failed();
        } else {
            self.metrics.record_dispatched();
        }
    }

    /// Flush every consumer, reporting the first failure
    pub fn flush(&self) -> Result<()> {
        flush_consumers(&self.consumers)
    }
}

/// Flush all consumers even if some fail; the first error is returned
pub(crate) fn flush_consumers(consumers: &RwLock<Vec<Box<dyn Consumer>>>) -> Result<()> {
    let mut consumers = consumers.write();
    let mut first_error = None;

    for consumer in consumers.iter_mut() {
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| consumer.flush()));
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Consumer '{}' flush failed: {}", consumer.name(), e);
                first_error.get_or_insert(e);
            }
            Err(panic_info) => {
                eprintln!(
                    "[LOGGER CRITICAL] Consumer '{}' panicked during flush: {}. \
                     Other consumers continue to function.",
                    consumer.name(),
                    panic_message(panic_info.as_ref())
                );
            }
        }
    }

    first_error.map_or(Ok(()), Err)
}

impl CoreLogger for ConsumingLogger {
    fn name(&self) -> &str {
        &self.name
    }

    fn is_level_enabled(&self, level: Level) -> bool {
        level >= *self.level.read()
    }

    fn log(&self, event: &Event, skip_frames: usize) {
        if !self.is_level_enabled(event.level()) {
            self.record_filtered(event.level());
            return;
        }
        let event = self.complete(event, skip_frames);
        self.dispatch(&event);
    }

    fn field_keys_spec(&self) -> Arc<dyn FieldKeysSpec> {
        Arc::clone(&self.keys)
    }

    fn record_filtered(&self, _level: Level) {
        self.metrics.record_filtered();
    }
}

impl fmt::Debug for ConsumingLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConsumingLogger")
            .field("name", &self.name)
            .field("level", &*self.level.read())
            .field("consumers", &self.consumers.read().len())
            .finish()
    }
}

/// Handle used by application code
///
/// Cheap to clone. `with*` calls return a new handle whose fields are added
/// to every event it emits; the original handle is unchanged.
///
/// # Example
///
/// ```
/// use rust_logger_facade::prelude::*;
///
/// let recorder = RecordingConsumer::new();
/// let provider = DefaultProvider::builder()
///     .level(Level::Debug)
///     .consumer(recorder.clone())
///     .build();
///
/// let logger = provider.logger("http").with("request_id", 42);
/// logger.info("started");
/// logger.trace("not emitted");
///
/// let events = recorder.events();
/// assert_eq!(events.len(), 1);
/// assert_eq!(events[0].get("request_id"), Some(&Value::from(42)));
/// ```
#[derive(Clone)]
pub struct Logger {
    core: Arc<dyn CoreLogger>,
    fields: Fields,
}

impl Logger {
    pub fn new(core: Arc<dyn CoreLogger>) -> Self {
        Self {
            core,
            fields: Fields::empty(),
        }
    }

    pub fn name(&self) -> &str {
        self.core.name()
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn core(&self) -> &Arc<dyn CoreLogger> {
        &self.core
    }

    #[inline]
    pub fn is_level_enabled(&self, level: Level) -> bool {
        self.core.is_level_enabled(level)
    }

    /// Count a statement skipped at a disabled `level`. The logging macros
    /// call this when they skip formatting.
    #[inline]
    pub fn record_filtered(&self, level: Level) {
        self.core.record_filtered(level);
    }

    fn derive(&self, fields: Fields) -> Self {
        Self {
            core: Arc::clone(&self.core),
            fields,
        }
    }

    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Logger {
        self.derive(self.fields.with(key, value))
    }

    #[must_use]
    pub fn withf(&self, key: impl Into<String>, format: LazyFormat) -> Logger {
        self.derive(self.fields.withf(key, format))
    }

    #[must_use]
    pub fn with_error<E>(&self, err: E) -> Logger
    where
        E: StdError + Send + Sync + 'static,
    {
        let key = self.core.field_keys_spec().error().to_owned();
        self.derive(self.fields.with(key, Value::error(err)))
    }

    #[must_use]
    pub fn with_all<I, K, V>(&self, entries: I) -> Logger
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.derive(self.fields.with_all(entries))
    }

    #[must_use]
    pub fn without<I>(&self, keys: I) -> Logger
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        self.derive(self.fields.without(keys))
    }

    /// A fresh event at `level` carrying this handle's fields
    pub fn new_event(&self, level: Level) -> Event {
        self.core.new_event(level).with_fields(&self.fields)
    }

    /// Emit `message` at `level`. Does nothing when the level is disabled.
    pub fn log(&self, level: Level, message: impl Into<Value>) {
        if !self.is_level_enabled(level) {
            self.record_filtered(level);
            return;
        }
        let key = self.core.field_keys_spec().message().to_owned();
        let event = self.new_event(level).with(key, message);
        self.core.log(&event, 1);
    }

    /// Emit a caller-built event; this handle's fields sit beneath the
    /// event's own
    pub fn log_event(&self, event: &Event) {
        if !self.is_level_enabled(event.level()) {
            self.record_filtered(event.level());
            return;
        }
        let mut merged = self
            .new_event(event.level())
            .with_call_depth(event.call_depth())
            .with_fields(event.fields());
        if let Some(context) = event.context() {
            merged = merged.with_context(Arc::clone(context));
        }
        self.core.log(&merged, 1);
    }

    #[inline]
    pub fn trace(&self, message: impl Into<Value>) {
        self.log(Level::Trace, message);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<Value>) {
        self.log(Level::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<Value>) {
        self.log(Level::Info, message);
    }

    #[inline]
    pub fn warn(&self, message: impl Into<Value>) {
        self.log(Level::Warn, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<Value>) {
        self.log(Level::Error, message);
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<Value>) {
        self.log(Level::Fatal, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name())
            .field("fields", &self.fields)
            .finish()
    }
}
