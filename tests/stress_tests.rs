//! Stress tests for concurrent use
//!
//! These tests verify:
//! - Every enabled event reaches the consumers under concurrent logging
//! - A panicking consumer never costs the others an event
//! - Shared Fields chains stay consistent across threads
//! - Level changes while threads are logging are observed

use rust_logger_facade::core::{message_of, FacadeError};
use rust_logger_facade::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
fn test_concurrent_logging_delivers_everything() {
    let recorder = RecordingConsumer::new();
    let provider = Arc::new(
        DefaultProvider::builder()
            .level(Level::Info)
            .consumer(recorder.clone())
            .build(),
    );

    let mut handles = vec![];
    for thread_id in 0..8 {
        let provider = Arc::clone(&provider);
        handles.push(thread::spawn(move || {
            let logger = provider.logger(&format!("worker-{}", thread_id % 3));
            for i in 0..100 {
                match i % 3 {
                    0 => logger.debug(format!("T{} Debug {}", thread_id, i)),
                    1 => logger.warn(format!("T{} Warn {}", thread_id, i)),
                    _ => logger.error(format!("T{} Error {}", thread_id, i)),
                }
            }
        }));
    }

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    // 66 of every 100 are warn or error, the other 34 are debug
    let expected = 8 * 66;
    assert_eq!(recorder.len(), expected);
    assert_eq!(provider.metrics().dispatched_count(), expected as u64);
    assert_eq!(provider.metrics().filtered_count(), 8 * 34);
    assert_eq!(provider.logger_names().len(), 3);
}

#[test]
fn test_panicking_consumer_under_load() {
    let recorder = RecordingConsumer::new();
    let seen = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&seen);

    let provider = Arc::new(
        DefaultProvider::builder()
            .consumer(FnConsumer::new("flaky", move |event: &Event| {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                if n % 10 == 0 {
                    panic!("flaky consumer hit {}", n);
                }
                if n % 10 == 5 {
                    return Err(FacadeError::consumer("flaky", format!("rejected {:?}", message_of(event))));
                }
                Ok(())
            }))
            .consumer(recorder.clone())
            .build(),
    );

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let provider = Arc::clone(&provider);
            thread::spawn(move || {
                let logger = provider.logger("load").with("thread", t);
                for i in 0..50 {
                    logger.info(format!("event {}", i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    assert_eq!(recorder.len(), 200);
    assert_eq!(seen.load(Ordering::SeqCst), 200);
    assert_eq!(provider.metrics().failed_count(), 40);
    assert_eq!(provider.metrics().dispatched_count(), 160);
}

#[test]
fn test_shared_chain_across_threads() {
    let base = (0..64).fold(Fields::empty(), |f, i| f.with(format!("k{}", i), i));
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let base = base.clone();
            thread::spawn(move || {
                let mine = base.with("k0", -1).without([format!("k{}", t + 1)]);
                assert_eq!(mine.len(), 63);
                assert_eq!(mine.get("k0"), Some(&Value::from(-1)));
                assert!(are_fields_equal(&base, &base.clone()).unwrap());
                mine
            })
        })
        .collect();

    let results: Vec<Fields> = handles
        .into_iter()
        .map(|h| h.join().expect("Thread panicked"))
        .collect();
    assert!(!are_fields_equal(&results[0], &results[1]).unwrap());
    assert_eq!(base.len(), 64);
}

#[test]
fn test_level_change_while_logging() {
    let recorder = RecordingConsumer::new();
    let provider = Arc::new(
        DefaultProvider::builder()
            .level(Level::Error)
            .consumer(recorder.clone())
            .build(),
    );

    let logger = provider.logger("switch");
    for _ in 0..10 {
        logger.info("hidden");
    }

    let setter = {
        let provider = Arc::clone(&provider);
        thread::spawn(move || provider.set_level(Level::Trace))
    };
    setter.join().expect("Thread panicked");

    for _ in 0..10 {
        logger.info("shown");
    }

    assert_eq!(recorder.len(), 10);
    assert_eq!(provider.metrics().filtered_count(), 10);
    assert!(recorder
        .events()
        .iter()
        .all(|e| e.get("message") == Some(&Value::from("shown"))));
}
