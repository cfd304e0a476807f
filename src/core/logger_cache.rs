//! Name-keyed cache of loggers
//!
//! Lookups take the read lock; only a miss takes the write lock, and the
//! entry API makes sure two racing misses still share one instance.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::fmt;

pub struct LoggerCache<T: Clone> {
    loggers: RwLock<HashMap<String, T>>,
    factory: Box<dyn Fn(&str) -> T + Send + Sync>,
}

impl<T: Clone> LoggerCache<T> {
    pub fn new<F>(factory: F) -> Self
    where
        F: Fn(&str) -> T + Send + Sync + 'static,
    {
        Self {
            loggers: RwLock::new(HashMap::new()),
            factory: Box::new(factory),
        }
    }

    /// The logger for `name`, created by the factory on first use
    pub fn get(&self, name: &str) -> T {
        if let Some(logger) = self.loggers.read().get(name) {
            return logger.clone();
        }

        let mut loggers = self.loggers.write();
        loggers
            .entry(name.to_owned())
            .or_insert_with(|| (self.factory)(name))
            .clone()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.loggers.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    /// Sorted names of every cached logger
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.loggers.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl<T: Clone> fmt::Debug for LoggerCache<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerCache")
            .field("names", &self.names())
            .finish()
    }
}
