//! Type filter state.
//!
//! Holds the distinct event types of the loaded collection and the current
//! selection. The option list is rebuilt from scratch on every load.

use log_events::{Event, EventCollection};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Option value of the catch-all entry.
pub const ANY: &str = "any";

/// What the filter currently lets through.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterSelection {
    /// Every event
    #[default]
    Any,
    /// Only events of one type
    Type(String),
}

impl FilterSelection {
    /// Interprets a selected option value. `"any"` is the catch-all.
    pub fn from_value(value: &str) -> Self {
        if value == ANY {
            FilterSelection::Any
        } else {
            FilterSelection::Type(value.to_string())
        }
    }

    /// Value of the option this selection corresponds to.
    pub fn value(&self) -> &str {
        match self {
            FilterSelection::Any => ANY,
            FilterSelection::Type(t) => t,
        }
    }

    pub fn matches(&self, event: &Event) -> bool {
        match self {
            FilterSelection::Any => true,
            FilterSelection::Type(t) => event.event_type() == t,
        }
    }
}

impl fmt::Display for FilterSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.value())
    }
}

/// One entry of the type selection control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOption {
    /// Value sent back when the option is selected
    pub value: String,
    /// Text shown to the user
    pub label: String,
}

/// Distinct types of the current collection plus the active selection.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeFilter {
    options: Vec<FilterOption>,
    selection: FilterSelection,
}

impl TypeFilter {
    /// An option list holding only the catch-all entry.
    pub fn empty(any_label: &str) -> Self {
        Self {
            options: vec![FilterOption {
                value: ANY.to_string(),
                label: any_label.to_string(),
            }],
            selection: FilterSelection::Any,
        }
    }

    /// Builds the option list for a collection: the catch-all entry first,
    /// then each distinct type in first-seen order. Selection resets to any.
    pub fn from_collection(collection: &EventCollection, any_label: &str) -> Self {
        let mut filter = Self::empty(any_label);
        filter
            .options
            .extend(collection.distinct_types().into_iter().map(|t| FilterOption {
                value: t.to_string(),
                label: t.to_string(),
            }));
        filter
    }

    pub fn options(&self) -> &[FilterOption] {
        &self.options
    }

    /// Distinct types, without the catch-all entry.
    pub fn types(&self) -> impl Iterator<Item = &str> {
        self.options.iter().skip(1).map(|o| o.value.as_str())
    }

    pub fn selection(&self) -> &FilterSelection {
        &self.selection
    }

    /// Changes the selection. Unknown types are accepted.
    pub fn select(&mut self, selection: FilterSelection) {
        self.selection = selection;
    }
}
