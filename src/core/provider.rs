//! Providers hand out loggers
//!
//! A [`Provider`] owns everything its loggers share: the enabled level, the
//! consumers, the well-known field keys and the metrics.

use super::consumer::Consumer;
use super::error::Result;
use super::field_keys::{DefaultFieldKeysSpec, FieldKeysSpec};
use super::level::Level;
use super::logger::{flush_consumers, ConsumingLogger, Logger};
use super::logger_cache::LoggerCache;
use super::metrics::LoggerMetrics;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Name of the logger returned by [`Provider::root_logger`]
pub const ROOT_LOGGER_NAME: &str = "ROOT";

pub trait Provider: Send + Sync {
    fn name(&self) -> &str;

    /// The logger for `name`; repeated calls yield loggers sharing one core
    fn logger(&self, name: &str) -> Logger;

    fn root_logger(&self) -> Logger {
        self.logger(ROOT_LOGGER_NAME)
    }

    /// Every level this provider understands, lowest first
    fn all_levels(&self) -> &[Level] {
        &Level::ALL
    }

    fn field_keys_spec(&self) -> Arc<dyn FieldKeysSpec>;
}

type SharedConsumers = Arc<RwLock<Vec<Box<dyn Consumer>>>>;

/// Provider backed by cached [`ConsumingLogger`]s
pub struct DefaultProvider {
    name: String,
    level: Arc<RwLock<Level>>,
    consumers: SharedConsumers,
    metrics: Arc<LoggerMetrics>,
    keys: Arc<dyn FieldKeysSpec>,
    cache: LoggerCache<Arc<ConsumingLogger>>,
}

impl DefaultProvider {
    fn new(
        name: String,
        level: Level,
        consumers: Vec<Box<dyn Consumer>>,
        keys: Arc<dyn FieldKeysSpec>,
    ) -> Self {
        let level = Arc::new(RwLock::new(level));
        let consumers: SharedConsumers = Arc::new(RwLock::new(consumers));
        let metrics = Arc::new(LoggerMetrics::new());

        let cache = {
            let level = Arc::clone(&level);
            let consumers = Arc::clone(&consumers);
            let metrics = Arc::clone(&metrics);
            let keys = Arc::clone(&keys);
            LoggerCache::new(move |logger_name: &str| {
                Arc::new(ConsumingLogger::new(
                    logger_name,
                    Arc::clone(&level),
                    Arc::clone(&consumers),
                    Arc::clone(&metrics),
                    Arc::clone(&keys),
                ))
            })
        };

        Self {
            name,
            level,
            consumers,
            metrics,
            keys,
            cache,
        }
    }

    #[must_use]
    pub fn builder() -> ProviderBuilder {
        ProviderBuilder::new()
    }

    pub fn level(&self) -> Level {
        *self.level.read()
    }

    /// Change the enabled level of every logger, including ones already
    /// handed out
    pub fn set_level(&self, level: Level) {
        *self.level.write() = level;
    }

    pub fn add_consumer<C: Consumer + 'static>(&self, consumer: C) {
        self.consumers.write().push(Box::new(consumer));
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Names of every logger handed out so far
    pub fn logger_names(&self) -> Vec<String> {
        self.cache.names()
    }

    pub fn flush(&self) -> Result<()> {
        flush_consumers(&self.consumers)
    }
}

impl Provider for DefaultProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn logger(&self, name: &str) -> Logger {
        Logger::new(self.cache.get(name))
    }

    fn field_keys_spec(&self) -> Arc<dyn FieldKeysSpec> {
        Arc::clone(&self.keys)
    }
}

impl Default for DefaultProvider {
    fn default() -> Self {
        ProviderBuilder::new().build()
    }
}

impl fmt::Debug for DefaultProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultProvider")
            .field("name", &self.name)
            .field("level", &self.level())
            .field("consumers", &self.consumers.read().len())
            .field("keys", &self.keys)
            .field("loggers", &self.cache)
            .finish()
    }
}

impl Drop for DefaultProvider {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for [`DefaultProvider`]
///
/// # Example
/// ```
/// use rust_logger_facade::prelude::*;
/// use std::sync::Arc;
///
/// let provider = DefaultProvider::builder()
///     .name("service")
///     .level(Level::Warn)
///     .field_keys_spec(Arc::new(DefaultFieldKeysSpec::new().with_message("msg")))
///     .consumer(RecordingConsumer::new())
///     .build();
///
/// assert_eq!(provider.name(), "service");
/// assert_eq!(provider.field_keys_spec().message(), "msg");
/// ```
pub struct ProviderBuilder {
    name: String,
    level: Level,
    keys: Arc<dyn FieldKeysSpec>,
    consumers: Vec<Box<dyn Consumer>>,
}

impl ProviderBuilder {
    pub fn new() -> Self {
        Self {
            name: "default".to_string(),
            level: Level::default(),
            keys: Arc::new(DefaultFieldKeysSpec::default()),
            consumers: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Lowest enabled level, `Info` unless set
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn field_keys_spec(mut self, keys: Arc<dyn FieldKeysSpec>) -> Self {
        self.keys = keys;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn consumer<C: Consumer + 'static>(mut self, consumer: C) -> Self {
        self.consumers.push(Box::new(consumer));
        self
    }

    pub fn build(self) -> DefaultProvider {
        DefaultProvider::new(self.name, self.level, self.consumers, self.keys)
    }
}

impl Default for ProviderBuilder {
    fn default() -> Self {
        Self::new()
    }
}
