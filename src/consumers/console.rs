//! Console consumer

use crate::core::accessors::{logger_of, message_of, timestamp_of};
use crate::core::{Consumer, Event, Level, Result};
use colored::Colorize;

const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn color_code(level: Level) -> colored::Color {
    use colored::Color::*;
    match level {
        Level::Trace => BrightBlack,
        Level::Debug => Blue,
        Level::Info => Green,
        Level::Warn => Yellow,
        Level::Error => Red,
        Level::Fatal => BrightRed,
    }
}

/// Writes one line per event to stdout, or stderr for `Error` and `Fatal`
pub struct ConsoleConsumer {
    use_colors: bool,
    timestamp_format: String,
}

impl ConsoleConsumer {
    pub fn new() -> Self {
        Self {
            use_colors: true,
            timestamp_format: DEFAULT_TIMESTAMP_FORMAT.to_string(),
        }
    }

    pub fn with_colors(use_colors: bool) -> Self {
        Self {
            use_colors,
            ..Self::new()
        }
    }

    /// strftime-compatible format for the timestamp column
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// `[timestamp] [LEVEL] logger - message key=value ...`
    ///
    /// Well-known fields get their own column; everything else follows
    /// sorted by key. Excluded and rejected filtered values are left out.
    pub fn render(&self, event: &Event) -> String {
        let keys = event.field_keys_spec();

        let level_str = if self.use_colors {
            format!("{:5}", event.level().to_str())
                .color(color_code(event.level()))
                .to_string()
        } else {
            format!("{:5}", event.level().to_str())
        };

        let timestamp_str = timestamp_of(event)
            .map(|ts| ts.format(&self.timestamp_format).to_string())
            .unwrap_or_default();

        let mut line = format!(
            "[{}] [{}] {} - {}",
            timestamp_str,
            level_str,
            logger_of(event).unwrap_or_default(),
            message_of(event).unwrap_or_default()
        );

        let rest = event.without([keys.message(), keys.logger(), keys.timestamp()]);
        for field in rest.fields().sorted() {
            if let Some(value) = field.value.resolve_for(event) {
                line.push_str(&format!(" {}={}", field.key, value));
            }
        }

        line
    }
}

impl Default for ConsoleConsumer {
    fn default() -> Self {
        Self::new()
    }
}

impl Consumer for ConsoleConsumer {
    fn consume(&mut self, event: &Event) -> Result<()> {
        let output = self.render(event);
        match event.level() {
            Level::Error | Level::Fatal => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
