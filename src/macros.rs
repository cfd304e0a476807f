//! Logging macros
//!
//! The level macros check the level before formatting, so a disabled
//! `debug!` costs one level comparison and nothing else.
//!
//! # Examples
//!
//! ```
//! use rust_logger_facade::prelude::*;
//! use rust_logger_facade::{info, lazy_format};
//!
//! let provider = DefaultProvider::default();
//! let logger = provider.logger("server");
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // Formatted only if a consumer reads the field
//! let logger = logger.withf("peer", lazy_format!("{}:{}", "10.0.0.1", port));
//! ```

/// Deferred `format!`
///
/// Expands to a [`LazyFormat`](crate::core::lazy::LazyFormat) that owns its
/// arguments and renders them each time the value is read. Nothing is
/// formatted at the call site.
///
/// ```
/// use rust_logger_facade::core::Fields;
/// use rust_logger_facade::lazy_format;
///
/// let fields = Fields::empty().withf("sum", lazy_format!("{}+{}", 1, 2));
/// assert_eq!(fields.get("sum").unwrap().resolve().to_string(), "1+2");
/// ```
#[macro_export]
macro_rules! lazy_format {
    ($($arg:tt)+) => {
        $crate::core::lazy::LazyFormat::new(move |f| ::std::write!(f, $($arg)+))
    };
}

/// Log a formatted message at the given level
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let logger = DefaultProvider::default().root_logger();
/// use rust_logger_facade::log;
/// log!(logger, Level::Info, "Simple message");
/// log!(logger, Level::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level = $level;
        if logger.is_level_enabled(level) {
            logger.log(level, ::std::format!($($arg)+));
        } else {
            logger.record_filtered(level);
        }
    }};
}

/// Log a trace-level message
///
/// ```
/// # use rust_logger_facade::prelude::*;
/// # let provider = DefaultProvider::builder().level(Level::Trace).build();
/// # let logger = provider.root_logger();
/// use rust_logger_facade::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Trace, $($arg)+)
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Warn, $($arg)+)
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Error, $($arg)+)
    };
}

/// Log a fatal-level message. Does not abort the process.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::Fatal, $($arg)+)
    };
}
