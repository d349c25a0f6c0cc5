//! Shared event types and parsing for the event log viewer.
//!
//! This crate contains pure data structures with no viewer logic.
//! It is a dependency for all other crates in the workspace.

pub mod content;
pub mod event;
pub mod timestamp;

#[cfg(any(test, feature = "test-fixtures"))]
pub mod fixtures;

// Re-export timestamp types
pub use timestamp::{EventTimestamp, ParseTimestampError};

// Re-export content types
pub use content::{ContentMap, ContentValue};

// Re-export event types
pub use event::{CollectionError, DetectedEvent, Event, EventCollection, EventId};
