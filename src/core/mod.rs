//! Core facade types and traits

pub mod accessors;
pub mod consumer;
pub mod error;
pub mod event;
pub mod event_equality;
pub mod field_keys;
pub mod fields;
pub mod fields_equality;
pub mod filtered;
pub mod lazy;
pub mod level;
pub mod logger;
pub mod logger_cache;
pub mod metrics;
pub mod provider;
pub mod value;
pub mod value_equality;

pub use accessors::{error_of, logger_of, message_of, timestamp_of};
pub use consumer::{Consumer, FnConsumer, RecordingConsumer};
pub use error::{FacadeError, Result};
pub use event::{Event, EventContext};
pub use event_equality::{
    are_events_equal, default_event_equality, set_default_event_equality, DefaultEventEquality,
    EventEquality, EventEqualityFacade, EventEqualityFunc, IgnoringKeysEventEquality,
};
pub use field_keys::{DefaultFieldKeysSpec, FieldKeysSpec};
pub use fields::{Field, Fields};
pub use fields_equality::{
    are_fields_equal, default_fields_equality, set_default_fields_equality, DefaultFieldsEquality,
    FieldsEquality, FieldsEqualityFacade, FieldsEqualityFunc, IgnoringKeysFieldsEquality,
};
pub use filtered::{
    require_maximal_level, require_minimal_level, FilterContext, Filtered, FilteredFunc,
    LevelFiltered,
};
pub use lazy::{Lazy, LazyFormat, LazyFunc};
pub use level::Level;
pub use logger::{ConsumingLogger, CoreLogger, Logger};
pub use logger_cache::LoggerCache;
pub use metrics::LoggerMetrics;
pub use provider::{DefaultProvider, Provider, ProviderBuilder, ROOT_LOGGER_NAME};
pub use value::{Func, Named, Value};
pub use value_equality::{
    are_values_equal, default_value_equality, set_default_value_equality, DefaultValueEquality,
    ValueEquality, ValueEqualityFacade, ValueEqualityFunc,
};
