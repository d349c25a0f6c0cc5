//! Sample data fixtures for testing.
//!
//! This module provides ready-made test data for other crates to use.
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // log-events = { path = "../log-events", features = ["test-fixtures"] }
//!
//! use log_events::fixtures;
//!
//! let raw = fixtures::sample_events_json();
//! let collection = fixtures::sample_collection();
//! ```

use crate::{Event, EventCollection};

/// Raw text of the sample event file.
///
/// Contains 8 events from three detectors:
/// - 3 battery events (one with a falsy power source, one with an epoch timestamp)
/// - 3 application events (one with an argument list)
/// - 2 usb events (one with a null description)
pub fn sample_events_json() -> &'static str {
    include_str!("../tests/fixtures/sample_events.json")
}

/// Returns the sample events parsed into a collection.
pub fn sample_collection() -> EventCollection {
    EventCollection::parse(sample_events_json()).expect("Failed to parse sample_events.json")
}

/// Returns a specific event by ID from the sample events.
pub fn get_event(id: &str) -> Option<Event> {
    sample_collection().find(id).cloned()
}

/// Returns the first usb attach event from samples.
pub fn usb_added_event() -> Event {
    get_event("2e8a4ca3-9d5b-4f1c-83a2-af7e5d4b6c03").expect("USB event should exist in fixtures")
}
