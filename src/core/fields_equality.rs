//! Comparison of whole [`Fields`] collections

use super::error::{FacadeError, Result};
use super::fields::Fields;
use super::value_equality::{ValueEquality, ValueEqualityFacade};
use parking_lot::RwLock;
use std::collections::BTreeSet;
use std::sync::{Arc, LazyLock};

/// Decides whether two [`Fields`] are equal.
///
/// `None` stands for "no fields at all". Implementations in this crate treat
/// it like [`Fields::empty`]; two `None`s are always equal.
pub trait FieldsEquality: Send + Sync {
    fn are_fields_equal(&self, left: Option<&Fields>, right: Option<&Fields>) -> Result<bool>;

    /// Same comparison, but the given keys are removed from both sides first
    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn FieldsEquality>;
}

enum Mismatch {
    Different,
    Failed(FacadeError),
}

/// Entry-by-entry comparison shared by the fields and event strategies
pub(crate) fn compare_fields(
    value_equality: &dyn ValueEquality,
    left: &Fields,
    right: &Fields,
) -> Result<bool> {
    if left.len() != right.len() {
        return Ok(false);
    }

    let walk = left.for_each(|key, left_value| {
        let Some(right_value) = right.get(key) else {
            return Err(Mismatch::Different);
        };
        match value_equality.are_values_equal(key, left_value, right_value) {
            Ok(true) => Ok(()),
            Ok(false) => Err(Mismatch::Different),
            Err(err) => Err(Mismatch::Failed(err)),
        }
    });

    match walk {
        Ok(()) => Ok(true),
        Err(Mismatch::Different) => Ok(false),
        Err(Mismatch::Failed(err)) => Err(err),
    }
}

/// Same cardinality, and every key of the left side present on the right
/// with an equal value
pub struct DefaultFieldsEquality {
    value_equality: Arc<dyn ValueEquality>,
}

impl DefaultFieldsEquality {
    pub fn new(value_equality: Arc<dyn ValueEquality>) -> Self {
        Self { value_equality }
    }
}

impl Default for DefaultFieldsEquality {
    /// Compares values with whatever the process-wide default is at call time
    fn default() -> Self {
        Self::new(Arc::new(ValueEqualityFacade::of_default()))
    }
}

impl FieldsEquality for DefaultFieldsEquality {
    fn are_fields_equal(&self, left: Option<&Fields>, right: Option<&Fields>) -> Result<bool> {
        if left.is_none() && right.is_none() {
            return Ok(true);
        }
        let empty = Fields::empty();
        compare_fields(
            self.value_equality.as_ref(),
            left.unwrap_or(&empty),
            right.unwrap_or(&empty),
        )
    }

    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn FieldsEquality> {
        Arc::new(IgnoringKeysFieldsEquality::new(self, keys))
    }
}

/// Strips a set of keys from both sides before delegating to `parent`
pub struct IgnoringKeysFieldsEquality {
    parent: Arc<dyn FieldsEquality>,
    keys: BTreeSet<String>,
}

impl IgnoringKeysFieldsEquality {
    pub fn new(parent: Arc<dyn FieldsEquality>, keys: &[&str]) -> Self {
        Self {
            parent,
            keys: keys.iter().map(|k| k.to_string()).collect(),
        }
    }

    pub fn ignored_keys(&self) -> &BTreeSet<String> {
        &self.keys
    }
}

impl FieldsEquality for IgnoringKeysFieldsEquality {
    fn are_fields_equal(&self, left: Option<&Fields>, right: Option<&Fields>) -> Result<bool> {
        let left = left.map(|f| f.without(&self.keys));
        let right = right.map(|f| f.without(&self.keys));
        self.parent.are_fields_equal(left.as_ref(), right.as_ref())
    }

    /// Merges into a single decorator instead of nesting
    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn FieldsEquality> {
        let mut merged = self.keys.clone();
        merged.extend(keys.iter().map(|k| k.to_string()));
        Arc::new(IgnoringKeysFieldsEquality {
            parent: Arc::clone(&self.parent),
            keys: merged,
        })
    }
}

/// Adapts a closure into a [`FieldsEquality`]
pub struct FieldsEqualityFunc<F> {
    f: F,
}

impl<F> FieldsEqualityFunc<F>
where
    F: Fn(Option<&Fields>, Option<&Fields>) -> Result<bool> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> FieldsEquality for FieldsEqualityFunc<F>
where
    F: Fn(Option<&Fields>, Option<&Fields>) -> Result<bool> + Send + Sync + 'static,
{
    fn are_fields_equal(&self, left: Option<&Fields>, right: Option<&Fields>) -> Result<bool> {
        (self.f)(left, right)
    }

    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn FieldsEquality> {
        Arc::new(IgnoringKeysFieldsEquality::new(self, keys))
    }
}

/// Resolves the real strategy on every call, see
/// [`ValueEqualityFacade`](super::value_equality::ValueEqualityFacade)
pub struct FieldsEqualityFacade {
    provider: Box<dyn Fn() -> Arc<dyn FieldsEquality> + Send + Sync>,
}

impl FieldsEqualityFacade {
    pub fn new<P>(provider: P) -> Self
    where
        P: Fn() -> Arc<dyn FieldsEquality> + Send + Sync + 'static,
    {
        Self {
            provider: Box::new(provider),
        }
    }

    pub fn of_default() -> Self {
        Self::new(default_fields_equality)
    }
}

impl FieldsEquality for FieldsEqualityFacade {
    fn are_fields_equal(&self, left: Option<&Fields>, right: Option<&Fields>) -> Result<bool> {
        (self.provider)().are_fields_equal(left, right)
    }

    fn with_ignoring_keys(self: Arc<Self>, keys: &[&str]) -> Arc<dyn FieldsEquality> {
        Arc::new(IgnoringKeysFieldsEquality::new(self, keys))
    }
}

static DEFAULT_FIELDS_EQUALITY: LazyLock<RwLock<Arc<dyn FieldsEquality>>> =
    LazyLock::new(|| RwLock::new(Arc::new(DefaultFieldsEquality::default())));

/// The process-wide default fields comparison
pub fn default_fields_equality() -> Arc<dyn FieldsEquality> {
    Arc::clone(&DEFAULT_FIELDS_EQUALITY.read())
}

/// Replace the process-wide default, returning the previous one
pub fn set_default_fields_equality(equality: Arc<dyn FieldsEquality>) -> Arc<dyn FieldsEquality> {
    std::mem::replace(&mut *DEFAULT_FIELDS_EQUALITY.write(), equality)
}

/// Compare two [`Fields`] with the process-wide default
///
/// ```
/// use rust_logger_facade::core::{are_fields_equal, Fields};
///
/// let left = Fields::empty().with("a", 1).with("b", 2);
/// let right = Fields::empty().with("b", 2).with("a", 1);
/// assert!(are_fields_equal(&left, &right).unwrap());
/// assert!(!are_fields_equal(&left, &right.with("b", 3)).unwrap());
/// ```
pub fn are_fields_equal<'a>(
    left: impl Into<Option<&'a Fields>>,
    right: impl Into<Option<&'a Fields>>,
) -> Result<bool> {
    default_fields_equality().are_fields_equal(left.into(), right.into())
}
