//! Swapping the process-wide equality defaults
//!
//! Kept in its own test binary: the defaults are global, and other tests
//! rely on the stock behavior.

use rust_logger_facade::core::event_equality::EventEqualityFacade;
use rust_logger_facade::core::fields_equality::{DefaultFieldsEquality, FieldsEqualityFacade};
use rust_logger_facade::core::value_equality::{ValueEqualityFacade, ValueEqualityFunc};
use rust_logger_facade::core::{
    set_default_event_equality, set_default_fields_equality, set_default_value_equality,
    EventEqualityFunc, FieldsEqualityFunc,
};
use rust_logger_facade::prelude::*;
use std::sync::Arc;

#[test]
fn test_defaults_swap_and_restore() {
    let provider = DefaultProvider::default();
    let left = Fields::empty().with("name", "Alice");
    let right = Fields::empty().with("name", "ALICE");

    // Built before the swap; must observe it anyway
    let value_facade = ValueEqualityFacade::of_default();
    let fields_facade = FieldsEqualityFacade::of_default();
    let event_facade = EventEqualityFacade::of_default();
    let stock_fields = DefaultFieldsEquality::default();

    assert!(!are_fields_equal(&left, &right).unwrap());

    let case_insensitive = ValueEqualityFunc::new(|_: &str, l: &Value, r: &Value| {
        Ok(match (l.as_str(), r.as_str()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => l == r,
        })
    });
    let previous_value = set_default_value_equality(Arc::new(case_insensitive));

    assert!(value_facade
        .are_values_equal("name", &Value::from("x"), &Value::from("X"))
        .unwrap());
    assert!(are_fields_equal(&left, &right).unwrap());
    assert!(stock_fields.are_fields_equal(Some(&left), Some(&right)).unwrap());
    assert!(fields_facade.are_fields_equal(Some(&left), Some(&right)).unwrap());

    let never = FieldsEqualityFunc::new(|_: Option<&Fields>, _: Option<&Fields>| Ok(false));
    let previous_fields = set_default_fields_equality(Arc::new(never));
    assert!(!fields_facade.are_fields_equal(Some(&left), Some(&left)).unwrap());
    set_default_fields_equality(previous_fields);

    let by_level = EventEqualityFunc::new(|l: Option<&Event>, r: Option<&Event>| {
        Ok(l.map(Event::level) == r.map(Event::level))
    });
    let previous_events = set_default_event_equality(Arc::new(by_level));
    let a = Event::new(&provider, Level::Warn, 0).with("x", 1);
    let b = Event::new(&provider, Level::Warn, 5);
    assert!(event_facade.are_events_equal(Some(&a), Some(&b)).unwrap());
    assert!(are_events_equal(&a, &b).unwrap());
    set_default_event_equality(previous_events);
    assert!(!are_events_equal(&a, &b).unwrap());

    set_default_value_equality(previous_value);
    assert!(!are_fields_equal(&left, &right).unwrap());
}
