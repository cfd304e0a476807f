//! # Rust Logger Facade
//!
//! A structured logging facade: immutable fields, events and the equality
//! machinery to compare them, with pluggable providers and consumers behind
//! it.
//!
//! ## Features
//!
//! - **Immutable Fields**: every `with` returns a new collection; the old one
//!   is shared, never copied
//! - **Deferred Values**: lazy and level-filtered values resolved only when
//!   an event is consumed
//! - **Configurable Equality**: value, fields and event comparison
//!   strategies with process-wide defaults
//! - **Thread Safe**: everything can be shared across threads
//!
//! ```
//! use rust_logger_facade::prelude::*;
//!
//! let provider = DefaultProvider::builder().consumer(RecordingConsumer::new()).build();
//! let left = Event::new(&provider, Level::Error, 3).with("a", 1).with("b", 2);
//! let right = Event::new(&provider, Level::Error, 3).with("b", 2).with("a", 1);
//! assert!(are_events_equal(&left, &right).unwrap());
//! ```

pub mod consumers;
pub mod core;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "console")]
    pub use crate::consumers::ConsoleConsumer;
    pub use crate::consumers::JsonConsumer;
    pub use crate::core::{
        are_events_equal, are_fields_equal, are_values_equal, Consumer, CoreLogger,
        DefaultFieldKeysSpec, DefaultProvider, Event, EventEquality, FacadeError, Field,
        FieldKeysSpec, Fields, FieldsEquality, FnConsumer, Level, LazyFormat, Logger,
        LoggerMetrics, Provider, ProviderBuilder, RecordingConsumer, Result, Value,
        ValueEquality,
    };
}

#[cfg(feature = "console")]
pub use crate::consumers::ConsoleConsumer;
pub use crate::consumers::JsonConsumer;
pub use crate::core::{
    are_events_equal, are_fields_equal, are_values_equal, Consumer, CoreLogger,
    DefaultFieldKeysSpec, DefaultProvider, Event, EventEquality, FacadeError, Field,
    FieldKeysSpec, Fields, FieldsEquality, FnConsumer, Level, LazyFormat, Logger, LoggerMetrics,
    Provider, ProviderBuilder, RecordingConsumer, Result, Value, ValueEquality,
};
