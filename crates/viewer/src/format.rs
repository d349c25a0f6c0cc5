//! Text formatting for labels and timestamps.

use chrono::{Local, TimeZone, Utc};
use log_events::EventTimestamp;
use std::fmt::Display;

use crate::config::DisplayZone;

/// Layout of a rendered timestamp: `YYYY-MM-DD, HH:MM:SS.mmm`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d, %H:%M:%S%.3f";

/// Turns a raw key or type name into a display label.
///
/// Every underscore becomes a space, then only the first character is
/// uppercased.
///
/// ```
/// assert_eq!(viewer::clean_label("detected_event_type"), "Detected event type");
/// ```
pub fn clean_label(raw: &str) -> String {
    let spaced = raw.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Formats an instant in the given zone.
pub fn format_timestamp<Tz>(timestamp: &EventTimestamp, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    timestamp.in_zone(zone).format(TIMESTAMP_FORMAT).to_string()
}

/// Formats an instant in the configured display zone.
pub fn format_in_zone(timestamp: &EventTimestamp, zone: DisplayZone) -> String {
    match zone {
        DisplayZone::Local => format_timestamp(timestamp, &Local),
        DisplayZone::Utc => format_timestamp(timestamp, &Utc),
    }
}
