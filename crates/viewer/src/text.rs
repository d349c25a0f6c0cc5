//! Plain-text output of the rendered list, for terminals.

use std::fmt::Write;

use crate::display::DisplayState;
use crate::render::{DetailNode, RenderedList};

const INDENT: &str = "    ";

/// Renders the list as indented text. Collapsed items print only their
/// header line.
pub fn list_text(list: &RenderedList, display: &DisplayState) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Showing {} of {} events", list.shown(), list.total);

    for (i, item) in list.items.iter().enumerate() {
        let state = display.get(i).unwrap_or_default();
        let marker = if state.is_expanded() { '-' } else { '+' };
        let _ = writeln!(
            out,
            "[{}] {}  {}  ({})",
            marker, item.timestamp, item.type_label, item.id
        );
        if state.is_expanded() {
            write_details(&mut out, &item.details);
        }
    }
    out
}

fn write_details(out: &mut String, nodes: &[DetailNode]) {
    for node in nodes {
        let indent = INDENT.repeat(node.depth + 1);
        match node.text() {
            Some(text) => {
                let _ = writeln!(out, "{}{}: {}", indent, node.label, text);
            }
            None => {
                let _ = writeln!(out, "{}{}", indent, node.label);
                write_details(out, node.children().unwrap_or_default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DisplayZone;
    use log_events::EventCollection;

    const LOGIN: &str = r#"[{"id":"a","timestamp":"2024-01-01T00:00:00Z","detected_event":{"type":"login","content":{"user":"bob","meta":{"ip":"1.2.3.4"}}}}]"#;

    #[test]
    fn test_collapsed_text() {
        let collection = EventCollection::parse(LOGIN).unwrap();
        let list = RenderedList::render(&collection, 1, DisplayZone::Utc);
        let text = list_text(&list, &DisplayState::collapsed(1));

        assert_eq!(
            text,
            "Showing 1 of 1 events\n[+] 2024-01-01, 00:00:00.000  Login  (a)\n"
        );
    }

    #[test]
    fn test_expanded_text() {
        let collection = EventCollection::parse(LOGIN).unwrap();
        let list = RenderedList::render(&collection, 1, DisplayZone::Utc);
        let mut display = DisplayState::collapsed(1);
        display.toggle(0);

        let text = list_text(&list, &display);
        assert_eq!(
            text,
            "Showing 1 of 1 events\n\
             [-] 2024-01-01, 00:00:00.000  Login  (a)\n    \
             User: bob\n    \
             Meta\n        \
             Ip: 1.2.3.4\n"
        );
    }
}
