//! Event Types
//!
//! Records produced by the event detectors, one per detected occurrence.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashSet;
use std::fmt;

use crate::content::ContentMap;
use crate::timestamp::EventTimestamp;

/// Unique identifier of an event within a collection.
///
/// Files may carry ids as strings or numbers; both are held as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EventId(String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

struct EventIdVisitor;

impl<'de> Visitor<'de> for EventIdVisitor {
    type Value = EventId;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a string or numeric event id")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(EventId(v.to_string()))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(EventId(v.to_string()))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(EventId(v.to_string()))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        Ok(EventId(v.to_string()))
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(EventIdVisitor)
    }
}

/// Classification and payload attached to an event by a detector.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedEvent {
    /// Short classification string, e.g. `battery_event`
    #[serde(rename = "type")]
    pub event_type: String,
    /// Arbitrarily nested payload
    pub content: ContentMap,
}

/// A single record of an event log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: EventTimestamp,
    pub detected_event: DetectedEvent,
}

impl Event {
    /// Create a new event with required fields.
    pub fn new(
        id: impl Into<String>,
        timestamp: EventTimestamp,
        event_type: impl Into<String>,
        content: ContentMap,
    ) -> Self {
        Self {
            id: EventId::new(id),
            timestamp,
            detected_event: DetectedEvent {
                event_type: event_type.into(),
                content,
            },
        }
    }

    /// Shorthand for `detected_event.event_type`.
    pub fn event_type(&self) -> &str {
        &self.detected_event.event_type
    }

    /// Shorthand for `detected_event.content`.
    pub fn content(&self) -> &ContentMap {
        &self.detected_event.content
    }
}

/// Errors that can occur while reading an event collection.
#[derive(Debug)]
pub enum CollectionError {
    /// Malformed JSON, or records that are not event-shaped
    Json(serde_json::Error),
    /// Two records share the same id
    DuplicateId(EventId),
}

impl fmt::Display for CollectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionError::Json(e) => write!(f, "JSON error: {}", e),
            CollectionError::DuplicateId(id) => write!(f, "duplicate event id: '{}'", id),
        }
    }
}

impl std::error::Error for CollectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CollectionError::Json(e) => Some(e),
            CollectionError::DuplicateId(_) => None,
        }
    }
}

impl From<serde_json::Error> for CollectionError {
    fn from(e: serde_json::Error) -> Self {
        CollectionError::Json(e)
    }
}

/// Ordered sequence of events as read from one file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventCollection {
    events: Vec<Event>,
}

impl EventCollection {
    /// Parses a JSON array of events.
    ///
    /// Parsing is all-or-nothing: any malformed record or duplicate id fails
    /// the whole collection.
    pub fn parse(raw: &str) -> Result<Self, CollectionError> {
        let events: Vec<Event> = serde_json::from_str(raw)?;
        Self::from_events(events)
    }

    /// Wraps already-built events, rejecting duplicate ids.
    pub fn from_events(events: Vec<Event>) -> Result<Self, CollectionError> {
        {
            let mut seen = HashSet::with_capacity(events.len());
            for event in &events {
                if !seen.insert(&event.id) {
                    return Err(CollectionError::DuplicateId(event.id.clone()));
                }
            }
        }
        Ok(Self { events })
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Distinct event types in first-seen order.
    pub fn distinct_types(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.events
            .iter()
            .map(Event::event_type)
            .filter(|t| seen.insert(*t))
            .collect()
    }

    /// Events of the given type, in collection order.
    pub fn of_type<'a>(&'a self, event_type: &'a str) -> impl Iterator<Item = &'a Event> + 'a {
        self.events
            .iter()
            .filter(move |e| e.event_type() == event_type)
    }

    pub fn find(&self, id: &str) -> Option<&Event> {
        self.events.iter().find(|e| e.id.as_str() == id)
    }

    /// Serializes the collection back to a JSON array.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.events)
    }
}

impl<'a> IntoIterator for &'a EventCollection {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::ContentValue;

    const LOGIN: &str = r#"[{"id":"a","timestamp":"2024-01-01T00:00:00Z","detected_event":{"type":"login","content":{"user":"bob","meta":{"ip":"1.2.3.4"}}}}]"#;

    #[test]
    fn test_parse_single_event() {
        let collection = EventCollection::parse(LOGIN).unwrap();
        assert_eq!(collection.len(), 1);

        let event = &collection.events()[0];
        assert_eq!(event.id.as_str(), "a");
        assert_eq!(event.event_type(), "login");
        assert_eq!(event.timestamp.timestamp_millis(), 1_704_067_200_000);
        assert_eq!(
            event.content().get("user"),
            Some(&ContentValue::Text("bob".into()))
        );
        assert!(event.content().get("meta").unwrap().as_nested().is_some());
    }

    #[test]
    fn test_numeric_ids_are_held_as_text() {
        let raw = r#"[{"id":17,"timestamp":0,"detected_event":{"type":"t","content":{}}}]"#;
        let collection = EventCollection::parse(raw).unwrap();
        assert_eq!(collection.events()[0].id.as_str(), "17");
        assert!(collection.find("17").is_some());
    }

    #[test]
    fn test_malformed_json_fails() {
        let err = EventCollection::parse("[{").unwrap_err();
        assert!(matches!(err, CollectionError::Json(_)));
    }

    #[test]
    fn test_non_array_fails() {
        let raw = r#"{"id":"a","timestamp":0,"detected_event":{"type":"t","content":{}}}"#;
        assert!(matches!(
            EventCollection::parse(raw),
            Err(CollectionError::Json(_))
        ));
    }

    #[test]
    fn test_missing_field_fails() {
        let raw = r#"[{"id":"a","timestamp":0}]"#;
        let err = EventCollection::parse(raw).unwrap_err();
        assert!(err.to_string().contains("detected_event"));
    }

    #[test]
    fn test_duplicate_ids_fail() {
        let raw = r#"[
            {"id":"a","timestamp":0,"detected_event":{"type":"t","content":{}}},
            {"id":"a","timestamp":1,"detected_event":{"type":"t","content":{}}}
        ]"#;
        match EventCollection::parse(raw) {
            Err(CollectionError::DuplicateId(id)) => assert_eq!(id.as_str(), "a"),
            other => panic!("expected duplicate id error, got {:?}", other),
        }
    }

    #[test]
    fn test_distinct_types_first_seen_order() {
        let raw = r#"[
            {"id":1,"timestamp":0,"detected_event":{"type":"usb_event","content":{}}},
            {"id":2,"timestamp":0,"detected_event":{"type":"battery_event","content":{}}},
            {"id":3,"timestamp":0,"detected_event":{"type":"usb_event","content":{}}},
            {"id":4,"timestamp":0,"detected_event":{"type":"application_event","content":{}}}
        ]"#;
        let collection = EventCollection::parse(raw).unwrap();
        assert_eq!(
            collection.distinct_types(),
            vec!["usb_event", "battery_event", "application_event"]
        );

        let usb: Vec<&str> = collection.of_type("usb_event").map(|e| e.id.as_str()).collect();
        assert_eq!(usb, vec!["1", "3"]);
    }

    #[test]
    fn test_empty_array() {
        let collection = EventCollection::parse("[]").unwrap();
        assert!(collection.is_empty());
        assert!(collection.distinct_types().is_empty());
    }

    #[test]
    fn test_to_json_parses_back() {
        let collection = EventCollection::parse(LOGIN).unwrap();
        let json = collection.to_json().unwrap();
        assert_eq!(EventCollection::parse(&json).unwrap(), collection);
    }
}
