//! Comparison of individual field values

use super::error::Result;
use super::value::{same_object, Value};
use parking_lot::RwLock;
use std::sync::{Arc, LazyLock};

/// Decides whether two values stored under the same key are equal
pub trait ValueEquality: Send + Sync {
    /// `Err` means the values could not be compared; callers must treat it as
    /// "not equal" and stop.
    fn are_values_equal(&self, key: &str, left: &Value, right: &Value) -> Result<bool>;
}

/// Lazy-aware deep equality.
///
/// 1. lazy values on either side are resolved first
/// 2. callables are equal only to the very same callable
/// 3. everything else is compared structurally
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultValueEquality;

impl ValueEquality for DefaultValueEquality {
    fn are_values_equal(&self, _key: &str, left: &Value, right: &Value) -> Result<bool> {
        let left = left.resolve();
        let right = right.resolve();

        if let Value::Func(l) = left.as_ref() {
            return Ok(matches!(right.as_ref(), Value::Func(r) if same_object(l, r)));
        }

        Ok(left == right)
    }
}

/// Adapts a closure into a [`ValueEquality`]
pub struct ValueEqualityFunc<F> {
    f: F,
}

impl<F> ValueEqualityFunc<F>
where
    F: Fn(&str, &Value, &Value) -> Result<bool> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> ValueEquality for ValueEqualityFunc<F>
where
    F: Fn(&str, &Value, &Value) -> Result<bool> + Send + Sync,
{
    fn are_values_equal(&self, key: &str, left: &Value, right: &Value) -> Result<bool> {
        (self.f)(key, left, right)
    }
}

/// Resolves the real strategy on every call.
///
/// Holding a facade instead of the strategy itself means later calls to
/// [`set_default_value_equality`] are observed.
pub struct ValueEqualityFacade {
    provider: Box<dyn Fn() -> Arc<dyn ValueEquality> + Send + Sync>,
}

impl ValueEqualityFacade {
    pub fn new<P>(provider: P) -> Self
    where
        P: Fn() -> Arc<dyn ValueEquality> + Send + Sync + 'static,
    {
        Self {
            provider: Box::new(provider),
        }
    }

    /// Facade over the process-wide default
    pub fn of_default() -> Self {
        Self::new(default_value_equality)
    }
}

impl ValueEquality for ValueEqualityFacade {
    fn are_values_equal(&self, key: &str, left: &Value, right: &Value) -> Result<bool> {
        (self.provider)().are_values_equal(key, left, right)
    }
}

static DEFAULT_VALUE_EQUALITY: LazyLock<RwLock<Arc<dyn ValueEquality>>> =
    LazyLock::new(|| RwLock::new(Arc::new(DefaultValueEquality)));

/// The process-wide default value comparison
pub fn default_value_equality() -> Arc<dyn ValueEquality> {
    Arc::clone(&DEFAULT_VALUE_EQUALITY.read())
}

/// Replace the process-wide default, returning the previous one so test
/// harnesses can restore it
pub fn set_default_value_equality(equality: Arc<dyn ValueEquality>) -> Arc<dyn ValueEquality> {
    std::mem::replace(&mut *DEFAULT_VALUE_EQUALITY.write(), equality)
}

/// Compare two values with the process-wide default
pub fn are_values_equal(key: &str, left: &Value, right: &Value) -> Result<bool> {
    default_value_equality().are_values_equal(key, left, right)
}
