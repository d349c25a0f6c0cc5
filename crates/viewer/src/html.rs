//! HTML output of the rendered list.
//!
//! Produces the fragments the page swaps into its list container and type
//! selection control. Collapsed panels carry the `hidden` attribute.

use std::fmt::Write;

use crate::display::{DisplayState, ItemState};
use crate::filter::{FilterOption, FilterSelection};
use crate::render::{DetailBody, DetailNode, RenderedItem, RenderedList};

/// Escapes text for use in element content and quoted attribute values.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Renders every item of the list.
pub fn list_html(list: &RenderedList, display: &DisplayState, indent_px: u32) -> String {
    let mut out = String::new();
    for (i, item) in list.items.iter().enumerate() {
        let state = display.get(i).unwrap_or_default();
        write_item(&mut out, item, state, indent_px);
    }
    out
}

/// Renders a single item in the given state.
pub fn item_html(item: &RenderedItem, state: ItemState, indent_px: u32) -> String {
    let mut out = String::new();
    write_item(&mut out, item, state, indent_px);
    out
}

/// Renders the `<option>` elements of the type selection control.
pub fn options_html(options: &[FilterOption], selection: &FilterSelection) -> String {
    let mut out = String::new();
    for option in options {
        let selected = if option.value == selection.value() {
            " selected"
        } else {
            ""
        };
        let _ = write!(
            out,
            r#"<option value="{}"{}>{}</option>"#,
            escape_html(&option.value),
            selected,
            escape_html(&option.label)
        );
    }
    out
}

fn write_item(out: &mut String, item: &RenderedItem, state: ItemState, indent_px: u32) {
    let id = escape_html(item.id.as_str());
    let hidden = if state.is_expanded() { "" } else { " hidden" };

    let _ = write!(
        out,
        r#"<div class="listItem" id="{id}" data-state="{state}"><div class="itemHeader" data-toggle="{id}"><p class="timestamp">{}</p><p>{}</p></div><div class="details" style="margin-left: {indent_px}px"{hidden}>"#,
        escape_html(&item.timestamp),
        escape_html(&item.type_label),
    );
    write_details(out, &item.details, indent_px);
    out.push_str("</div></div>");
}

fn write_details(out: &mut String, nodes: &[DetailNode], indent_px: u32) {
    for node in nodes {
        out.push_str("<div>");
        let _ = write!(
            out,
            r#"<div class="detailKeyValue"><p class="detailKey">{}</p><p>{}</p></div>"#,
            escape_html(&node.label),
            node.text().map(escape_html).unwrap_or_default()
        );
        if let DetailBody::Group(children) = &node.body {
            let _ = write!(out, r#"<div style="margin-left: {indent_px}px">"#);
            write_details(out, children, indent_px);
            out.push_str("</div>");
        }
        out.push_str("</div>");
    }
}
