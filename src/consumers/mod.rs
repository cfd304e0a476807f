//! Consumer implementations

#[cfg(feature = "console")]
pub mod console;
pub mod json;

#[cfg(feature = "console")]
pub use console::ConsoleConsumer;
pub use json::JsonConsumer;

pub use crate::core::{Consumer, FnConsumer, RecordingConsumer};
