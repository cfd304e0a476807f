//! Consumer trait for event destinations
//!
//! Formatting and writing are left to consumers. The facade only hands them
//! finished events.

use super::error::Result;
use super::event::Event;
use parking_lot::Mutex;
use std::sync::Arc;

pub trait Consumer: Send + Sync {
    fn consume(&mut self, event: &Event) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

/// Adapts a closure into a [`Consumer`]
pub struct FnConsumer<F> {
    name: String,
    f: F,
}

impl<F> FnConsumer<F>
where
    F: FnMut(&Event) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }
}

impl<F> Consumer for FnConsumer<F>
where
    F: FnMut(&Event) -> Result<()> + Send + Sync,
{
    fn consume(&mut self, event: &Event) -> Result<()> {
        (self.f)(event)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Keeps every event it receives, for assertions in tests
///
/// Clones share the same storage, so one clone can be handed to a provider
/// while another inspects what arrived.
#[derive(Clone, Default)]
pub struct RecordingConsumer {
    events: Arc<Mutex<Vec<Event>>>,
}

impl RecordingConsumer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything recorded so far
    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl Consumer for RecordingConsumer {
    fn consume(&mut self, event: &Event) -> Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::FacadeError;
    use crate::core::field_keys::DefaultFieldKeysSpec;
    use crate::core::level::Level;

    fn event() -> Event {
        Event::from_keys_spec(Arc::new(DefaultFieldKeysSpec::default()), Level::Info, 0)
    }

    #[test]
    fn test_fn_consumer() {
        let mut seen = 0;
        {
            let mut consumer = FnConsumer::new("counter", |_: &Event| {
                seen += 1;
                Ok(())
            });
            assert_eq!(consumer.name(), "counter");
            consumer.consume(&event()).unwrap();
            consumer.consume(&event()).unwrap();
            assert!(consumer.flush().is_ok());
        }
        assert_eq!(seen, 2);
    }

    #[test]
    fn test_fn_consumer_error() {
        let mut consumer = FnConsumer::new("broken", |_: &Event| {
            Err(FacadeError::consumer("broken", "closed"))
        });
        assert!(consumer.consume(&event()).is_err());
    }

    #[test]
    fn test_recording_consumer_shares_storage() {
        let recorder = RecordingConsumer::new();
        let mut handle = recorder.clone();
        handle.consume(&event().with("a", 1)).unwrap();
        assert_eq!(recorder.len(), 1);
        assert_eq!(recorder.events()[0].get("a"), Some(&1.into()));
        recorder.clear();
        assert!(handle.is_empty());
    }
}
