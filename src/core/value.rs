//! Field values
//!
//! A [`Value`] is whatever a caller attaches to a key. Besides plain data it
//! carries a few capabilities that consumers check for:
//! - [`Value::Lazy`]: resolved only when consumed
//! - [`Value::Filtered`]: resolved against a [`FilterContext`] (level, siblings)
//! - [`Value::Exclude`]: the entry should be dropped silently
//! - [`Value::Func`]: an opaque callable, compared by identity only

use super::filtered::{FilterContext, Filtered};
use super::lazy::{Lazy, LazyFunc};
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// An opaque callable stored as a field value
pub type Func = Arc<dyn Fn() -> Value + Send + Sync>;

/// Something that has a name, e.g. a logger stored under the logger key
pub trait Named: Send + Sync {
    fn name(&self) -> &str;
}

/// Value type for structured fields
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    String(String),
    Timestamp(DateTime<Utc>),
    Duration(Duration),
    Error(Arc<dyn StdError + Send + Sync>),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
    Func(Func),
    Lazy(Arc<dyn Lazy>),
    Filtered(Arc<dyn Filtered>),
    Exclude,
    Display(Arc<dyn fmt::Display + Send + Sync>),
    Named(Arc<dyn Named>),
}

/// Whether two `Arc`s point at the same allocation, ignoring vtables
#[inline]
pub(crate) fn same_object<T: ?Sized>(left: &Arc<T>, right: &Arc<T>) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(left), Arc::as_ptr(right))
}

impl Value {
    /// A value produced by `f` each time it is consumed
    pub fn lazy<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Value::Lazy(Arc::new(LazyFunc::new(f)))
    }

    /// Wrap a callable; it is never invoked by the facade itself
    pub fn func<F>(f: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        Value::Func(Arc::new(f))
    }

    pub fn error<E>(err: E) -> Self
    where
        E: StdError + Send + Sync + 'static,
    {
        Value::Error(Arc::new(err))
    }

    pub fn display<D>(value: D) -> Self
    where
        D: fmt::Display + Send + Sync + 'static,
    {
        Value::Display(Arc::new(value))
    }

    pub fn filtered<F>(filtered: F) -> Self
    where
        F: Filtered + 'static,
    {
        Value::Filtered(Arc::new(filtered))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_exclude(&self) -> bool {
        matches!(self, Value::Exclude)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            Value::UInt(u) => i64::try_from(*u).ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            Value::UInt(u) => Some(*u as f64),
            _ => None,
        }
    }

    /// Resolve a lazy value once; anything else is returned as is
    pub fn resolve(&self) -> Cow<'_, Value> {
        match self {
            Value::Lazy(lazy) => Cow::Owned(lazy.get()),
            other => Cow::Borrowed(other),
        }
    }

    /// Resolve this value the way a consumer would render it for `ctx`.
    ///
    /// Returns `None` when the entry should not be rendered: it is
    /// [`Value::Exclude`], or a filtered value rejected by the context, or a
    /// lazy value that resolved to `Exclude`.
    pub fn resolve_for(&self, ctx: &dyn FilterContext) -> Option<Value> {
        let value = match self {
            Value::Exclude => return None,
            Value::Filtered(filtered) => filtered.filter(ctx)?,
            Value::Lazy(lazy) => lazy.get(),
            other => return Some(other.clone()),
        };
        match value {
            Value::Exclude => None,
            Value::Lazy(lazy) => Some(lazy.get()).filter(|v| !v.is_exclude()),
            other => Some(other),
        }
    }
}

impl PartialEq for Value {
    /// Deep structural equality. Callables, lazy and filtered values only
    /// equal themselves. NaN equals NaN, so equality stays reflexive.
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::UInt(a), Value::UInt(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b || (a.is_nan() && b.is_nan()),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Timestamp(a), Value::Timestamp(b)) => a == b,
            (Value::Duration(a), Value::Duration(b)) => a == b,
            (Value::Error(a), Value::Error(b)) => same_object(a, b) || a.to_string() == b.to_string(),
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Func(a), Value::Func(b)) => same_object(a, b),
            (Value::Lazy(a), Value::Lazy(b)) => same_object(a, b),
            (Value::Filtered(a), Value::Filtered(b)) => same_object(a, b),
            (Value::Exclude, Value::Exclude) => true,
            (Value::Display(a), Value::Display(b)) => {
                same_object(a, b) || a.to_string() == b.to_string()
            }
            (Value::Named(a), Value::Named(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Int(i) => write!(f, "{}", i),
            Value::UInt(u) => write!(f, "{}", u),
            Value::Float(fl) => write!(f, "{}", fl),
            Value::String(s) => write!(f, "{}", s),
            Value::Timestamp(t) => write!(f, "{}", t.to_rfc3339()),
            Value::Duration(d) => write!(f, "{:?}", d),
            Value::Error(e) => write!(f, "{}", e),
            Value::List(items) => {
                write!(f, "[")?;
                for (idx, item) in items.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                write!(f, "]")
            }
            Value::Map(map) => {
                write!(f, "{{")?;
                for (idx, (key, item)) in map.iter().enumerate() {
                    if idx > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}: {}", key, item)?;
                }
                write!(f, "}}")
            }
            Value::Func(_) => write!(f, "<func>"),
            Value::Lazy(lazy) => write!(f, "{}", lazy.get()),
            Value::Filtered(_) => write!(f, "<filtered>"),
            Value::Exclude => write!(f, "<excluded>"),
            Value::Display(d) => write!(f, "{}", d),
            Value::Named(n) => write!(f, "{}", n.name()),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({:?})", b),
            Value::Int(i) => write!(f, "Int({:?})", i),
            Value::UInt(u) => write!(f, "UInt({:?})", u),
            Value::Float(fl) => write!(f, "Float({:?})", fl),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Timestamp(t) => write!(f, "Timestamp({:?})", t),
            Value::Duration(d) => write!(f, "Duration({:?})", d),
            Value::Error(e) => write!(f, "Error({:?})", e),
            Value::List(items) => f.debug_tuple("List").field(items).finish(),
            Value::Map(map) => f.debug_tuple("Map").field(map).finish(),
            Value::Func(func) => write!(f, "Func({:p})", Arc::as_ptr(func)),
            Value::Lazy(lazy) => write!(f, "Lazy({:p})", Arc::as_ptr(lazy)),
            Value::Filtered(filtered) => write!(f, "Filtered({:p})", Arc::as_ptr(filtered)),
            Value::Exclude => write!(f, "Exclude"),
            Value::Display(d) => write!(f, "Display({:?})", d.to_string()),
            Value::Named(n) => write!(f, "Named({:?})", n.name()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null | Value::Exclude | Value::Filtered(_) => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::UInt(u) => serializer.serialize_u64(*u),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Timestamp(t) => t.serialize(serializer),
            Value::Duration(d) => serializer.collect_str(&format_args!("{:?}", d)),
            Value::Error(e) => serializer.collect_str(e),
            Value::List(items) => serializer.collect_seq(items),
            Value::Map(map) => serializer.collect_map(map),
            Value::Func(_) => serializer.serialize_str("<func>"),
            Value::Lazy(lazy) => lazy.get().serialize(serializer),
            Value::Display(d) => serializer.collect_str(d),
            Value::Named(n) => serializer.serialize_str(n.name()),
        }
    }
}

macro_rules! impl_from_signed {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Int(v as i64)
            }
        })*
    };
}

macro_rules! impl_from_unsigned {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::UInt(v as u64)
            }
        })*
    };
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f as f64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(t: DateTime<Utc>) -> Self {
        Value::Timestamp(t)
    }
}

impl From<Duration> for Value {
    fn from(d: Duration) -> Self {
        Value::Duration(d)
    }
}

impl From<Arc<dyn StdError + Send + Sync>> for Value {
    fn from(e: Arc<dyn StdError + Send + Sync>) -> Self {
        Value::Error(e)
    }
}

impl From<Arc<dyn Named>> for Value {
    fn from(n: Arc<dyn Named>) -> Self {
        Value::Named(n)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Value::Map(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
