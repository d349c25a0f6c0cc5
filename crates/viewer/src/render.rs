//! Rendered list model.
//!
//! Rendering turns a sequence of events into display-ready items: a header
//! with the formatted timestamp and cleaned type label, and a details tree
//! built from the event content. The model carries no expand/collapse state;
//! that lives in [`crate::display::DisplayState`].

use log_events::{ContentMap, ContentValue, Event, EventId};
use serde::Serialize;

use crate::config::DisplayZone;
use crate::format::{clean_label, format_in_zone};

/// Body of a details row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum DetailBody {
    /// Textual form of a scalar value
    Text(String),
    /// Nested rows, one level deeper
    Group(Vec<DetailNode>),
}

/// One labelled row of an item's details panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailNode {
    /// Cleaned key
    pub label: String,
    /// Nesting depth; top-level rows are at depth 0
    pub depth: usize,
    pub body: DetailBody,
}

impl DetailNode {
    /// Nested rows if this node is a group.
    pub fn children(&self) -> Option<&[DetailNode]> {
        match &self.body {
            DetailBody::Group(children) => Some(children),
            DetailBody::Text(_) => None,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match &self.body {
            DetailBody::Text(text) => Some(text),
            DetailBody::Group(_) => None,
        }
    }
}

/// Builds the details rows for a content mapping. Falsy values are skipped.
pub fn render_details(content: &ContentMap, depth: usize) -> Vec<DetailNode> {
    content
        .truthy_entries()
        .map(|(key, value)| {
            let body = match value {
                ContentValue::Nested(nested) => DetailBody::Group(render_details(nested, depth + 1)),
                scalar => DetailBody::Text(scalar.scalar_text().unwrap_or_default()),
            };
            DetailNode {
                label: clean_label(key),
                depth,
                body,
            }
        })
        .collect()
}

/// A single rendered event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedItem {
    /// Anchor of the item, the event id
    pub id: EventId,
    /// Formatted timestamp
    pub timestamp: String,
    /// Raw event type
    pub event_type: String,
    /// Cleaned event type shown in the header
    pub type_label: String,
    /// Rows of the details panel
    pub details: Vec<DetailNode>,
}

impl RenderedItem {
    pub fn from_event(event: &Event, zone: DisplayZone) -> Self {
        Self {
            id: event.id.clone(),
            timestamp: format_in_zone(&event.timestamp, zone),
            event_type: event.event_type().to_string(),
            type_label: clean_label(event.event_type()),
            details: render_details(event.content(), 0),
        }
    }
}

/// The visible list together with its two counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderedList {
    pub items: Vec<RenderedItem>,
    /// Size of the whole loaded collection
    pub total: usize,
}

impl RenderedList {
    /// Renders the given events, in order.
    pub fn render<'a>(
        events: impl IntoIterator<Item = &'a Event>,
        total: usize,
        zone: DisplayZone,
    ) -> Self {
        Self {
            items: events
                .into_iter()
                .map(|e| RenderedItem::from_event(e, zone))
                .collect(),
            total,
        }
    }

    /// Number of rendered items.
    pub fn shown(&self) -> usize {
        self.items.len()
    }

    pub fn position(&self, id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.id.as_str() == id)
    }

    pub fn get(&self, id: &str) -> Option<&RenderedItem> {
        self.position(id).map(|i| &self.items[i])
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(|item| item.id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use log_events::{fixtures, EventCollection};

    const LOGIN: &str = r#"[{"id":"a","timestamp":"2024-01-01T00:00:00Z","detected_event":{"type":"login","content":{"user":"bob","meta":{"ip":"1.2.3.4"}}}}]"#;

    #[test]
    fn test_render_login_event() {
        let collection = EventCollection::parse(LOGIN).unwrap();
        let list = RenderedList::render(&collection, collection.len(), DisplayZone::Utc);

        assert_eq!(list.shown(), 1);
        assert_eq!(list.total, 1);

        let item = &list.items[0];
        assert_eq!(item.id.as_str(), "a");
        assert_eq!(item.type_label, "Login");
        assert_eq!(item.timestamp, "2024-01-01, 00:00:00.000");

        assert_eq!(item.details.len(), 2);
        assert_eq!(item.details[0].label, "User");
        assert_eq!(item.details[0].text(), Some("bob"));

        let meta = &item.details[1];
        assert_eq!(meta.label, "Meta");
        let children = meta.children().unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].label, "Ip");
        assert_eq!(children[0].depth, 1);
        assert_eq!(children[0].text(), Some("1.2.3.4"));
    }

    #[test]
    fn test_falsy_values_are_skipped() {
        let collection = fixtures::sample_collection();
        let event = collection.find("3f9b5db4-ae6c-4a2d-94b3-b08f6e5c7d04").unwrap();
        let item = RenderedItem::from_event(event, DisplayZone::Utc);

        let charge = item.details[0].children().unwrap();
        let labels: Vec<&str> = charge.iter().map(|n| n.label.as_str()).collect();
        // charging = false and power_source = "" are dropped
        assert_eq!(labels, vec!["Percent"]);
        assert_eq!(charge[0].text(), Some("80"));
    }

    #[test]
    fn test_arrays_render_as_index_groups() {
        let collection = fixtures::sample_collection();
        let event = collection.find("6c2e80e7-d19f-4d50-87e6-e3bc9b8fa007").unwrap();
        let item = RenderedItem::from_event(event, DisplayZone::Utc);

        let started = item.details[0].children().unwrap();
        let args = started.iter().find(|n| n.label == "Args").unwrap();
        let entries = args.children().unwrap();
        assert_eq!(entries[0].label, "0");
        assert_eq!(entries[0].text(), Some("--new-window"));
        assert_eq!(entries[1].depth, 2);
    }

    #[test]
    fn test_empty_nested_mapping_renders_empty_group() {
        let raw = r#"[{"id":1,"timestamp":0,"detected_event":{"type":"t","content":{"extra":{}}}}]"#;
        let collection = EventCollection::parse(raw).unwrap();
        let item = RenderedItem::from_event(&collection.events()[0], DisplayZone::Utc);

        assert_eq!(item.details.len(), 1);
        assert_eq!(item.details[0].children(), Some(&[][..]));
    }

    #[test]
    fn test_lookup_by_id() {
        let collection = fixtures::sample_collection();
        let list = RenderedList::render(&collection, collection.len(), DisplayZone::Utc);

        assert_eq!(list.position("2e8a4ca3-9d5b-4f1c-83a2-af7e5d4b6c03"), Some(2));
        assert!(list.get("missing").is_none());
        assert_eq!(list.ids().count(), 8);
    }
}
