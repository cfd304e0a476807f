//! JSON lines consumer

use crate::core::{Consumer, Event, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

/// Appends each event as a single-line JSON object (JSONL)
///
/// Fields are written the way [`Event`] serializes them: lazy values
/// resolved, filtered values decided against the event, excluded entries
/// dropped.
pub struct JsonConsumer {
    writer: BufWriter<File>,
    pretty: bool,
}

impl JsonConsumer {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path, false)
    }

    /// Multi-line output, handy when reading logs by hand
    pub fn new_pretty<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open(path, true)
    }

    fn open<P: AsRef<Path>>(path: P, pretty: bool) -> Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            pretty,
        })
    }
}

impl Consumer for JsonConsumer {
    fn consume(&mut self, event: &Event) -> Result<()> {
        let json = if self.pretty {
            serde_json::to_string_pretty(event)?
        } else {
            event.to_json()?
        };
        writeln!(self.writer, "{}", json)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DefaultFieldKeysSpec, Level, Value};
    use std::fs;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn event(level: Level) -> Event {
        Event::from_keys_spec(Arc::new(DefaultFieldKeysSpec::default()), level, 0)
    }

    #[test]
    fn test_json_consumer() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test.jsonl");

        let mut consumer = JsonConsumer::new(&log_path)?;
        let e = event(Level::Info)
            .with("message", "User logged in")
            .with("user_id", 123)
            .with("password", Value::Exclude);
        consumer.consume(&e)?;
        consumer.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let parsed: serde_json::Value = serde_json::from_str(content.trim())?;
        assert_eq!(parsed["message"], "User logged in");
        assert_eq!(parsed["user_id"], 123);
        assert_eq!(parsed["level"], "Info");
        assert!(parsed.get("password").is_none());
        Ok(())
    }

    #[test]
    fn test_json_consumer_multiple_events() -> Result<()> {
        let dir = tempdir()?;
        let log_path = dir.path().join("test_multiple.jsonl");

        let mut consumer = JsonConsumer::new(&log_path)?;
        for i in 0..5 {
            consumer.consume(&event(Level::Debug).with("iteration", i))?;
        }
        consumer.flush()?;

        let content = fs::read_to_string(&log_path)?;
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 5);
        for (i, line) in lines.into_iter().enumerate() {
            let parsed: serde_json::Value = serde_json::from_str(line)?;
            assert_eq!(parsed["iteration"], i);
        }
        Ok(())
    }
}
