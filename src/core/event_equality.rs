//! Comparison of whole [`Event`]s

use super::error::Result;
use super::event::Event;
use super::fields_equality::compare_fields;
use super::value_equality::{ValueEquality, ValueEqualityFacade};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

/// Decides whether two [`Event`]s are equal.
///
/// Unlike [`FieldsEquality`](super::fields_equality::FieldsEquality), a
/// missing event is not the same as an empty one: two `None`s are equal,
/// exactly one `None` is not.
pub trait EventEquality: Send + Sync {
    fn are_events_equal(&self, left: Option<&Event>, right: Option<&Event>) -> Result<bool>;

    /// Same comparison, but the given keys are removed from both sides first
    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn EventEquality>;
}

/// Level, call depth, then fields
pub struct DefaultEventEquality {
    compare_level: bool,
    compare_call_depth: bool,
    value_equality: Arc<dyn ValueEquality>,
}

impl DefaultEventEquality {
    pub fn new(value_equality: Arc<dyn ValueEquality>) -> Self {
        Self {
            compare_level: true,
            compare_call_depth: true,
            value_equality,
        }
    }

    #[must_use]
    pub fn compare_level(mut self, enabled: bool) -> Self {
        self.compare_level = enabled;
        self
    }

    #[must_use]
    pub fn compare_call_depth(mut self, enabled: bool) -> Self {
        self.compare_call_depth = enabled;
        self
    }
}

impl Default for DefaultEventEquality {
    fn default() -> Self {
        Self::new(Arc::new(ValueEqualityFacade::of_default()))
    }
}

impl EventEquality for DefaultEventEquality {
    fn are_events_equal(&self, left: Option<&Event>, right: Option<&Event>) -> Result<bool> {
        let (left, right) = match (left, right) {
            (None, None) => return Ok(true),
            (Some(l), Some(r)) => (l, r),
            _ => return Ok(false),
        };

        if self.compare_level && left.level() != right.level() {
            return Ok(false);
        }
        if self.compare_call_depth && left.call_depth() != right.call_depth() {
            return Ok(false);
        }

        compare_fields(self.value_equality.as_ref(), left.fields(), right.fields())
    }

    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn EventEquality> {
        Arc::new(IgnoringKeysEventEquality::new(self, keys))
    }
}

/// Strips a set of keys from both events before delegating to `parent`
pub struct IgnoringKeysEventEquality {
    parent: Arc<dyn EventEquality>,
    keys: BTreeSet<String>,
}

impl IgnoringKeysEventEquality {
    pub fn new(parent: Arc<dyn EventEquality>, keys: &[&str]) -> Self {
        Self {
            parent,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn ignored_keys(&self) -> &BTreeSet<String> {
        &self.keys
    }
}

impl EventEquality for IgnoringKeysEventEquality {
    fn are_events_equal(&self, left: Option<&Event>, right: Option<&Event>) -> Result<bool> {
        let left = left.map(|e| e.without(&self.keys));
        let right = right.map(|e| e.without(&self.keys));
        self.parent.are_events_equal(left.as_ref(), right.as_ref())
    }

    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn EventEquality> {
        let mut merged = self.keys.clone();
        merged.extend(keys.iter().map(|k| k.to_string()));
        Arc::new(IgnoringKeysEventEquality {
            parent: Arc::clone(&self.parent),
            keys: merged,
        })
    }
}

/// Adapts a closure into an [`EventEquality`]
pub struct EventEqualityFunc<F> {
    f: F,
}

impl<F> EventEqualityFunc<F>
where
    F: Fn(Option<&Event>, Option<&Event>) -> Result<bool> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventEquality for EventEqualityFunc<F>
where
    F: Fn(Option<&Event>, Option<&Event>) -> Result<bool> + Send + Sync + 'static,
{
    fn are_events_equal(&self, left: Option<&Event>, right: Option<&Event>) -> Result<bool> {
        (self.f)(left, right)
    }

    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn EventEquality> {
        Arc::new(IgnoringKeysEventEquality::new(self, keys))
    }
}

pub struct EventEqualityFacade {
    provider: Box<dyn Fn() -> Arc<dyn EventEquality> + Send + Sync>,
}

impl EventEqualityFacade {
    pub fn new<P>(provider: P) -> Self
    where
        P: Fn() -> Arc<dyn EventEquality> + Send + Sync + 'static,
    {
        Self {
            provider: Box::new(provider),
        }
    }

    pub fn of_default() -> Self {
        Self::new(default_event_equality)
    }
}

impl EventEquality for EventEqualityFacade {
    fn are_events_equal(&self, left: Option<&Event>, right: Option<&Event>) -> Result<bool> {
        (self.provider)().are_events_equal(left, right)
    }

    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn EventEquality> {
        Arc::new(IgnoringKeysEventEquality::new(self, keys))
    }
}

static DEFAULT_EVENT_EQUALITY: LazyLock<RwLock<Arc<dyn EventEquality>>> =
    LazyLock::new(|| RwLock::new(Arc::new(DefaultEventEquality::default())));

pub fn default_event_equality() -> Arc<dyn EventEquality> {
    Arc::clone(&DEFAULT_EVENT_EQUALITY.read())
}

/// Replace the process-wide default, returning the previous one
pub fn set_default_event_equality(equality: Arc<dyn EventEquality>) -> Arc<dyn EventEquality> {
    std::mem::replace(&mut *DEFAULT_EVENT_EQUALITY.write(), equality)
}

/// Compare two events with the process-wide default
pub fn are_events_equal<'a>(
    left: impl Into<Option<&'a Event>>,
    right: impl Into<Option<&'a Event>>,
) -> Result<bool> {
    default_event_equality().are_events_equal(left.into(), right.into())
}
