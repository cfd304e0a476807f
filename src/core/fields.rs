//! Immutable structured fields
//!
//! [`Fields`] is a persistent key/value collection. Every `with*`/`without`
//! call returns a new instance and leaves the receiver untouched, so a
//! `Fields` can be shared freely across threads.
//!
//! Internally one of five representations is used:
//! - empty: no entries, no allocation
//! - single: one key/value pair, the common `with` case
//! - lineage: a `target` layered in front of a `parent`; the target wins for
//!   duplicate keys. `with` is amortised O(1), `get`/`for_each` are
//!   O(depth)
//! - map: a sorted map, used as a base layer by `with_all`
//! - without: a wrapped instance with some keys filtered out
//!
//! Lineage and without layers are nested at most [`MAX_DEPTH`] deep; a
//! layer that would go deeper is flattened into a map instead, which keeps
//! reads, iteration and drops from recursing without bound.
//!
//! # Example
//!
//! ```
//! use rust_logger_facade::core::{Fields, Value};
//!
//! let base = Fields::empty().with("service", "api").with("attempt", 1);
//! let retried = base.with("attempt", 2);
//!
//! assert_eq!(base.get("attempt"), Some(&Value::from(1)));
//! assert_eq!(retried.get("attempt"), Some(&Value::from(2)));
//! assert_eq!(retried.len(), 2);
//! assert_eq!(retried.without(["service"]).len(), 1);
//! ```

use super::error::Result;
use super::lazy::LazyFormat;
use super::value::Value;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::convert::Infallible;
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Nesting limit for lineage and without layers
pub const MAX_DEPTH: usize = 64;

/// A single key/value pair
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub key: String,
    pub value: Value,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Persistent, immutable collection of structured fields
#[derive(Clone, Default)]
pub struct Fields {
    repr: Repr,
}

#[derive(Clone, Default)]
enum Repr {
    #[default]
    Empty,
    Single(Arc<Field>),
    Lineage(Arc<Lineage>),
    Map(Arc<BTreeMap<String, Value>>),
    Without(Arc<Without>),
}

struct Lineage {
    target: Fields,
    parent: Fields,
    depth: usize,
    len: OnceLock<usize>,
}

struct Without {
    fields: Fields,
    excluded: BTreeSet<String>,
    depth: usize,
    len: OnceLock<usize>,
}

impl Fields {
    /// The canonical instance without any entries
    pub const fn empty() -> Self {
        Self { repr: Repr::Empty }
    }

    /// Fields holding exactly one entry
    pub fn single(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            repr: Repr::Single(Arc::new(Field::new(key, value))),
        }
    }

    /// Map-backed fields; later duplicates of a key replace earlier ones
    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let map: BTreeMap<String, Value> = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        map.into()
    }

    /// Layer `target` in front of `parent`, skipping the wrapper when one
    /// side contributes nothing
    fn lineage(target: Fields, parent: Fields) -> Fields {
        if parent.is_effectively_empty() {
            return target;
        }
        if target.is_effectively_empty() {
            return parent;
        }
        let depth = 1 + target.depth().max(parent.depth());
        if depth > MAX_DEPTH {
            let mut map = parent.to_map();
            map.extend(target.to_map());
            return map.into();
        }
        Fields {
            repr: Repr::Lineage(Arc::new(Lineage {
                target,
                parent,
                depth,
                len: OnceLock::new(),
            })),
        }
    }

    fn depth(&self) -> usize {
        match &self.repr {
            Repr::Empty | Repr::Single(_) | Repr::Map(_) => 0,
            Repr::Lineage(lineage) => lineage.depth,
            Repr::Without(without) => without.depth,
        }
    }

    fn is_effectively_empty(&self) -> bool {
        match &self.repr {
            Repr::Empty => true,
            Repr::Map(map) => map.is_empty(),
            _ => false,
        }
    }

    /// Number of live keys, after shadowing and exclusions
    pub fn len(&self) -> usize {
        match &self.repr {
            Repr::Empty => 0,
            Repr::Single(_) => 1,
            Repr::Map(map) => map.len(),
            Repr::Lineage(lineage) => *lineage.len.get_or_init(|| self.count()),
            Repr::Without(without) => *without.len.get_or_init(|| self.count()),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.is_effectively_empty() || self.len() == 0
    }

    fn count(&self) -> usize {
        let mut n = 0;
        let _ = self.visit::<Infallible>(&mut |_: &str, _: &Value| {
            n += 1;
            Ok(())
        });
        n
    }

    /// Value stored under `key`, if present
    ///
    /// A present key holding [`Value::Null`] yields `Some(&Value::Null)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match &self.repr {
            Repr::Empty => None,
            Repr::Single(field) => (field.key == key).then_some(&field.value),
            Repr::Map(map) => map.get(key),
            Repr::Lineage(lineage) => lineage
                .target
                .get(key)
                .or_else(|| lineage.parent.get(key)),
            Repr::Without(without) => {
                if without.excluded.contains(key) {
                    None
                } else {
                    without.fields.get(key)
                }
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Visit every live entry exactly once.
    ///
    /// Newer layers are visited before older ones. The first error returned by
    /// `consumer` stops the walk and is returned as is.
    pub fn for_each<E, F>(&self, mut consumer: F) -> std::result::Result<(), E>
    where
        F: FnMut(&str, &Value) -> std::result::Result<(), E>,
    {
        self.visit(&mut consumer)
    }

    fn visit<E>(
        &self,
        consumer: &mut dyn FnMut(&str, &Value) -> std::result::Result<(), E>,
    ) -> std::result::Result<(), E> {
        match &self.repr {
            Repr::Empty => Ok(()),
            Repr::Single(field) => consumer(&field.key, &field.value),
            Repr::Map(map) => {
                for (key, value) in map.iter() {
                    consumer(key, value)?;
                }
                Ok(())
            }
            Repr::Lineage(lineage) => {
                let mut seen = HashSet::new();
                lineage.target.visit(&mut |key: &str, value: &Value| {
                    seen.insert(key.to_owned());
                    consumer(key, value)
                })?;
                lineage.parent.visit(&mut |key: &str, value: &Value| {
                    if seen.contains(key) {
                        Ok(())
                    } else {
                        consumer(key, value)
                    }
                })
            }
            Repr::Without(without) => without.fields.visit(&mut |key: &str, value: &Value| {
                if without.excluded.contains(key) {
                    Ok(())
                } else {
                    consumer(key, value)
                }
            }),
        }
    }

    /// New fields where `key` maps to `value`, shadowing any older entry
    #[must_use]
    pub fn with(&self, key: impl Into<String>, value: impl Into<Value>) -> Fields {
        Fields::lineage(Fields::single(key, value), self.clone())
    }

    /// Like [`with`](Self::with), but the value is a deferred format that is
    /// only rendered when consumed
    ///
    /// ```
    /// use rust_logger_facade::core::Fields;
    /// use rust_logger_facade::lazy_format;
    ///
    /// let fields = Fields::empty().withf("summary", lazy_format!("{} of {}", 3, 5));
    /// assert_eq!(fields.get("summary").unwrap().resolve().as_str(), Some("3 of 5"));
    /// ```
    #[must_use]
    pub fn withf(&self, key: impl Into<String>, format: LazyFormat) -> Fields {
        self.with(key, format)
    }

    /// Bulk merge; the new entries shadow existing ones
    #[must_use]
    pub fn with_all<I, K, V>(&self, entries: I) -> Fields
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        Fields::lineage(Fields::from_map(entries), self.clone())
    }

    /// Layer a whole other `Fields` in front of this one
    #[must_use]
    pub fn with_fields(&self, other: &Fields) -> Fields {
        Fields::lineage(other.clone(), self.clone())
    }

    /// New fields that omit the given keys.
    ///
    /// The exclusion applies to everything below this point; entries added
    /// afterwards with `with` are visible again.
    #[must_use]
    pub fn without<I>(&self, keys: I) -> Fields
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let mut excluded: BTreeSet<String> = keys.into_iter().map(Into::into).collect();
        if excluded.is_empty() || self.is_effectively_empty() {
            return self.clone();
        }
        let fields = match &self.repr {
            Repr::Without(inner) => {
                excluded.extend(inner.excluded.iter().cloned());
                inner.fields.clone()
            }
            _ => self.clone(),
        };
        let depth = 1 + fields.depth();
        if depth > MAX_DEPTH {
            let mut map = fields.to_map();
            map.retain(|key, _| !excluded.contains(key));
            return map.into();
        }
        Fields {
            repr: Repr::Without(Arc::new(Without {
                fields,
                excluded,
                depth,
                len: OnceLock::new(),
            })),
        }
    }

    /// Live keys in visiting order
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        let _ = self.visit::<Infallible>(&mut |key: &str, _: &Value| {
            keys.push(key.to_owned());
            Ok(())
        });
        keys
    }

    /// Live entries in visiting order
    pub fn to_vec(&self) -> Vec<Field> {
        let mut entries = Vec::new();
        let _ = self.visit::<Infallible>(&mut |key: &str, value: &Value| {
            entries.push(Field::new(key, value.clone()));
            Ok(())
        });
        entries
    }

    /// Live entries ordered by key
    pub fn sorted(&self) -> Vec<Field> {
        let mut entries = self.to_vec();
        entries.sort_by(|a, b| a.key.cmp(&b.key));
        entries
    }

    /// Live entries ordered by a caller supplied key comparison
    pub fn sorted_by<F>(&self, mut compare: F) -> Vec<Field>
    where
        F: FnMut(&str, &str) -> std::cmp::Ordering,
    {
        let mut entries = self.to_vec();
        entries.sort_by(|a, b| compare(&a.key, &b.key));
        entries
    }

    pub fn to_map(&self) -> BTreeMap<String, Value> {
        self.to_vec()
            .into_iter()
            .map(|field| (field.key, field.value))
            .collect()
    }

    /// Serialize to a JSON object; lazy values are resolved, excluded and
    /// filtered values are left out
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<BTreeMap<String, Value>> for Fields {
    fn from(map: BTreeMap<String, Value>) -> Self {
        if map.is_empty() {
            Fields::empty()
        } else {
            Fields {
                repr: Repr::Map(Arc::new(map)),
            }
        }
    }
}

impl From<Field> for Fields {
    fn from(field: Field) -> Self {
        Fields {
            repr: Repr::Single(Arc::new(field)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for Fields
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Fields::from_map(iter)
    }
}

impl fmt::Debug for Fields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let entries = self.sorted();
        f.debug_map()
            .entries(entries.iter().map(|field| (&field.key, &field.value)))
            .finish()
    }
}

impl fmt::Display for Fields {
    /// `key=value` pairs ordered by key
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, field) in self.sorted().iter().enumerate() {
            if idx > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}={}", field.key, field.value)?;
        }
        Ok(())
    }
}

impl Serialize for Fields {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        self.for_each(|key, value| match value.resolve().as_ref() {
            Value::Exclude | Value::Filtered(_) => Ok(()),
            resolved => map.serialize_entry(key, resolved),
        })?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> Fields {
        Fields::empty().with("a", 1).with("b", 2).with("c", 3)
    }

    #[test]
    fn test_empty() {
        let fields = Fields::empty();
        assert_eq!(fields.len(), 0);
        assert!(fields.is_empty());
        assert!(fields.get("a").is_none());
        let visited: std::result::Result<(), ()> = fields.for_each(|_, _| Err(()));
        assert!(visited.is_ok());
    }

    #[test]
    fn test_with_and_get() {
        let fields = abc();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields.get("a"), Some(&Value::from(1)));
        assert_eq!(fields.get("c"), Some(&Value::from(3)));
        assert!(fields.get("d").is_none());
    }

    #[test]
    fn test_receiver_is_not_altered() {
        let base = abc();
        let _derived = base.with("d", 4).without(["a"]);
        assert_eq!(base.len(), 3);
        assert!(base.contains_key("a"));
        assert!(!base.contains_key("d"));
    }

    #[test]
    fn test_null_value_is_present() {
        let fields = Fields::empty().with("nothing", Value::Null);
        assert_eq!(fields.get("nothing"), Some(&Value::Null));
        assert_eq!(fields.len(), 1);
    }

    #[test]
    fn test_shadowing() {
        let fields = abc().with("b", 22);
        assert_eq!(fields.get("b"), Some(&Value::from(22)));
        assert_eq!(fields.len(), 3);

        let mut seen = Vec::new();
        fields
            .for_each::<Infallible, _>(|key, value| {
                seen.push((key.to_owned(), value.clone()));
                Ok(())
            })
            .unwrap();
        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], ("b".to_owned(), Value::from(22)));
        assert!(!seen.contains(&("b".to_owned(), Value::from(2))));
    }

    #[test]
    fn test_for_each_order_newest_first() {
        assert_eq!(abc().keys(), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_for_each_stops_on_error() {
        let mut visited = 0;
        let result = abc().for_each(|key, _| {
            visited += 1;
            if key == "b" {
                Err("stop")
            } else {
                Ok(())
            }
        });
        assert_eq!(result, Err("stop"));
        assert_eq!(visited, 2);
    }

    #[test]
    fn test_with_all() {
        let fields = Fields::empty()
            .with("a", 1)
            .with_all([("a", 10), ("b", 20)]);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("a"), Some(&Value::from(10)));
        assert_eq!(fields.get("b"), Some(&Value::from(20)));
    }

    #[test]
    fn test_with_all_empty_collapses() {
        let base = abc();
        let merged = base.with_all(Vec::<(String, Value)>::new());
        assert_eq!(merged.len(), 3);
        assert!(matches!(merged.repr, Repr::Lineage(_)));
        assert!(matches!(
            Fields::empty().with_all(Vec::<(String, Value)>::new()).repr,
            Repr::Empty
        ));
    }

    #[test]
    fn test_single_collapses_over_empty() {
        let fields = Fields::empty().with("a", 1);
        assert!(matches!(fields.repr, Repr::Single(_)));
    }

    #[test]
    fn test_without() {
        let fields = abc().without(["a"]);
        assert_eq!(fields.len(), 2);
        assert!(fields.get("a").is_none());
        assert!(!fields.keys().contains(&"a".to_string()));
    }

    #[test]
    fn test_without_is_idempotent() {
        let once = abc().without(["a", "c"]);
        let twice = once.without(["a", "c"]);
        assert_eq!(once.sorted(), twice.sorted());
        assert_eq!(twice.len(), 1);
    }

    #[test]
    fn test_without_merges_exclusions() {
        let fields = abc().without(["a"]).without(["b"]);
        match &fields.repr {
            Repr::Without(w) => {
                assert_eq!(w.excluded.len(), 2);
                assert!(matches!(w.fields.repr, Repr::Lineage(_)));
            }
            _ => panic!("expected without wrapper"),
        }
        assert_eq!(fields.keys(), vec!["c"]);
    }

    #[test]
    fn test_readding_after_without() {
        let fields = abc().without(["a"]).with("a", 100);
        assert_eq!(fields.get("a"), Some(&Value::from(100)));
        assert_eq!(fields.len(), 3);
    }

    #[test]
    fn test_without_shadowed_parent_stays_hidden() {
        let fields = abc().with("a", 11).without(["a"]);
        assert!(fields.get("a").is_none());
        assert_eq!(fields.len(), 2);
    }

    #[test]
    fn test_with_fields() {
        let base = abc();
        let overlay = Fields::empty().with("c", 33).with("d", 4);
        let merged = base.with_fields(&overlay);
        assert_eq!(merged.len(), 4);
        assert_eq!(merged.get("c"), Some(&Value::from(33)));
        assert_eq!(merged.get("a"), Some(&Value::from(1)));
    }

    #[test]
    fn test_withf_is_lazy() {
        let fields = Fields::empty().withf("msg", crate::lazy_format!("{}+{}", 1, 2));
        let value = fields.get("msg").unwrap();
        assert!(matches!(value, Value::Lazy(_)));
        assert_eq!(value.resolve().as_str(), Some("1+2"));
    }

    #[test]
    fn test_sorted_and_display() {
        let fields = abc();
        let keys: Vec<_> = fields.sorted().into_iter().map(|f| f.key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(fields.to_string(), "a=1 b=2 c=3");

        let reversed: Vec<_> = fields
            .sorted_by(|a, b| b.cmp(a))
            .into_iter()
            .map(|f| f.key)
            .collect();
        assert_eq!(reversed, vec!["c", "b", "a"]);
    }

    #[test]
    fn test_collect_and_to_map() {
        let fields: Fields = vec![("x", 1), ("y", 2)].into_iter().collect();
        let map = fields.to_map();
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("y"), Some(&Value::from(2)));
    }

    #[test]
    fn test_to_json() {
        let fields = Fields::empty()
            .with("a", 1)
            .with("skip", Value::Exclude)
            .with("lazy", Value::lazy(|| Value::from("resolved")));
        let json: serde_json::Value = serde_json::from_str(&fields.to_json().unwrap()).unwrap();
        assert_eq!(json["a"], 1);
        assert_eq!(json["lazy"], "resolved");
        assert!(json.get("skip").is_none());
    }

    #[test]
    fn test_to_json_skips_lazy_exclude() {
        let fields = Fields::empty()
            .with("a", 1)
            .with("hidden", Value::lazy(|| Value::Exclude));
        let json: serde_json::Value = serde_json::from_str(&fields.to_json().unwrap()).unwrap();
        assert_eq!(json["a"], 1);
        assert!(json.get("hidden").is_none());
    }

    #[test]
    fn test_long_chain_same_key() {
        let mut fields = Fields::empty().with("service", "api");
        for i in 0..100_000 {
            fields = fields.with("counter", i);
        }
        assert!(fields.depth() <= MAX_DEPTH);
        assert_eq!(fields.len(), 2);
        assert_eq!(fields.get("counter"), Some(&Value::from(99_999)));
        assert_eq!(fields.get("service"), Some(&Value::from("api")));
        assert!(fields.get("missing").is_none());

        let mut visited = 0;
        fields
            .for_each::<Infallible, _>(|_, _| {
                visited += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(visited, 2);
        drop(fields);
    }

    #[test]
    fn test_long_chain_distinct_keys() {
        let fields = (0..5_000).fold(Fields::empty(), |f, i| f.with(format!("k{}", i), i));
        assert!(fields.depth() <= MAX_DEPTH);
        assert_eq!(fields.len(), 5_000);
        assert_eq!(fields.get("k0"), Some(&Value::from(0)));
        assert_eq!(fields.get("k4999"), Some(&Value::from(4_999)));
    }

    #[test]
    fn test_long_alternating_with_without() {
        let mut fields = Fields::empty().with("keep", true);
        for i in 0..20_000 {
            fields = fields.with("tmp", i).without(["tmp"]);
        }
        assert!(fields.depth() <= MAX_DEPTH);
        assert_eq!(fields.len(), 1);
        assert!(fields.get("tmp").is_none());

        let readded = fields.with("tmp", 7);
        assert_eq!(readded.get("tmp"), Some(&Value::from(7)));
        assert_eq!(readded.len(), 2);
    }

    #[test]
    fn test_shared_across_threads() {
        let fields = abc();
        std::thread::scope(|scope| {
            for i in 0..4 {
                let fields = fields.clone();
                scope.spawn(move || {
                    let derived = fields.with("thread", i);
                    assert_eq!(derived.len(), 4);
                    assert_eq!(derived.get("thread"), Some(&Value::from(i)));
                });
            }
        });
        assert_eq!(fields.len(), 3);
    }
}
