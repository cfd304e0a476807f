//! Values that are only rendered under certain conditions

use super::level::Level;
use super::value::Value;

/// What a [`Filtered`] value can see when it decides whether to show up
pub trait FilterContext {
    /// Level of the event being rendered
    fn level(&self) -> Level;

    /// Sibling field lookup
    fn field(&self, key: &str) -> Option<Value>;
}

/// Capability of a value that may be suppressed depending on context
pub trait Filtered: Send + Sync {
    /// Returns the value to render, or `None` if it should be left out
    fn filter(&self, ctx: &dyn FilterContext) -> Option<Value>;
}

/// A [`Filtered`] backed by a closure
pub struct FilteredFunc<F> {
    f: F,
}

impl<F> FilteredFunc<F>
where
    F: Fn(&dyn FilterContext) -> Option<Value> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Filtered for FilteredFunc<F>
where
    F: Fn(&dyn FilterContext) -> Option<Value> + Send + Sync,
{
    fn filter(&self, ctx: &dyn FilterContext) -> Option<Value> {
        (self.f)(ctx)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Bound {
    Minimal,
    Maximal,
}

/// Shows `value` only while the event level stays within a bound
pub struct LevelFiltered {
    level: Level,
    bound: Bound,
    value: Value,
}

impl Filtered for LevelFiltered {
    fn filter(&self, ctx: &dyn FilterContext) -> Option<Value> {
        let accepted = match self.bound {
            Bound::Minimal => ctx.level() >= self.level,
            Bound::Maximal => ctx.level() <= self.level,
        };
        accepted.then(|| self.value.clone())
    }
}

/// `value` is rendered only for events at `level` or more severe
pub fn require_minimal_level(level: Level, value: impl Into<Value>) -> Value {
    Value::filtered(LevelFiltered {
        level,
        bound: Bound::Minimal,
        value: value.into(),
    })
}

/// `value` is rendered only for events at `level` or less severe
///
/// Handy for details that only make sense while debugging.
pub fn require_maximal_level(level: Level, value: impl Into<Value>) -> Value {
    Value::filtered(LevelFiltered {
        level,
        bound: Bound::Maximal,
        value: value.into(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Ctx {
        level: Level,
        user: Option<Value>,
    }

    impl FilterContext for Ctx {
        fn level(&self) -> Level {
            self.level
        }

        fn field(&self, key: &str) -> Option<Value> {
            if key == "user" {
                self.user.clone()
            } else {
                None
            }
        }
    }

    fn apply(value: &Value, ctx: &Ctx) -> Option<Value> {
        match value {
            Value::Filtered(f) => f.filter(ctx),
            other => Some(other.clone()),
        }
    }

    #[test]
    fn test_maximal_level() {
        let v = require_maximal_level(Level::Debug, "internals");
        let debug = Ctx { level: Level::Debug, user: None };
        let info = Ctx { level: Level::Info, user: None };
        assert_eq!(apply(&v, &debug), Some(Value::from("internals")));
        assert_eq!(apply(&v, &info), None);
    }

    #[test]
    fn test_minimal_level() {
        let v = require_minimal_level(Level::Error, "stack");
        let warn = Ctx { level: Level::Warn, user: None };
        let fatal = Ctx { level: Level::Fatal, user: None };
        assert_eq!(apply(&v, &warn), None);
        assert_eq!(apply(&v, &fatal), Some(Value::from("stack")));
    }

    #[test]
    fn test_filtered_func_sees_siblings() {
        let v = Value::filtered(FilteredFunc::new(|ctx: &dyn FilterContext| {
            ctx.field("user").map(|user| Value::from(format!("hello {}", user)))
        }));
        let with_user = Ctx {
            level: Level::Info,
            user: Some(Value::from("alice")),
        };
        let without_user = Ctx { level: Level::Info, user: None };
        assert_eq!(apply(&v, &with_user), Some(Value::from("hello alice")));
        assert_eq!(apply(&v, &without_user), None);
    }
}
