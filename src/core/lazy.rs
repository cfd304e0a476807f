//! Lazily resolved values
//!
//! Anything expensive to compute can be attached as a [`Lazy`] value. The
//! facade never resolves it on its own; only consumers (or equality checks)
//! call [`Lazy::get`], so disabled log levels pay nothing for it.

use super::value::Value;
use std::fmt;
use std::sync::Arc;

/// Capability of a value that is computed on demand
pub trait Lazy: Send + Sync {
    fn get(&self) -> Value;
}

/// A [`Lazy`] backed by a closure
pub struct LazyFunc<F> {
    f: F,
}

impl<F> LazyFunc<F>
where
    F: Fn() -> Value + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Lazy for LazyFunc<F>
where
    F: Fn() -> Value + Send + Sync,
{
    fn get(&self) -> Value {
        (self.f)()
    }
}

type Render = dyn Fn(&mut fmt::Formatter<'_>) -> fmt::Result + Send + Sync;

/// Deferred formatting operation
///
/// Built by [`lazy_format!`](crate::lazy_format); the format string and its
/// arguments are only rendered when the value is displayed or resolved.
#[derive(Clone)]
pub struct LazyFormat {
    render: Arc<Render>,
}

impl LazyFormat {
    pub fn new<F>(render: F) -> Self
    where
        F: Fn(&mut fmt::Formatter<'_>) -> fmt::Result + Send + Sync + 'static,
    {
        Self {
            render: Arc::new(render),
        }
    }
}

impl fmt::Display for LazyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.render)(f)
    }
}

impl fmt::Debug for LazyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LazyFormat({:p})", Arc::as_ptr(&self.render))
    }
}

impl Lazy for LazyFormat {
    fn get(&self) -> Value {
        Value::String(self.to_string())
    }
}

impl From<LazyFormat> for Value {
    fn from(format: LazyFormat) -> Self {
        Value::Lazy(Arc::new(format))
    }
}
