//! Per-item expand/collapse state.
//!
//! Kept next to the rendered list rather than inside it, indexed by item
//! position. A fresh render always starts with every item collapsed.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Visibility of one item's details panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemState {
    #[default]
    Collapsed,
    Expanded,
}

impl ItemState {
    /// The state after a click on the item header.
    pub fn toggled(self) -> Self {
        match self {
            ItemState::Collapsed => ItemState::Expanded,
            ItemState::Expanded => ItemState::Collapsed,
        }
    }

    pub fn is_expanded(self) -> bool {
        matches!(self, ItemState::Expanded)
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemState::Collapsed => write!(f, "collapsed"),
            ItemState::Expanded => write!(f, "expanded"),
        }
    }
}

/// States of all rendered items, aligned with the rendered list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayState {
    states: Vec<ItemState>,
}

impl DisplayState {
    /// All `len` items collapsed.
    pub fn collapsed(len: usize) -> Self {
        Self {
            states: vec![ItemState::Collapsed; len],
        }
    }

    pub fn get(&self, index: usize) -> Option<ItemState> {
        self.states.get(index).copied()
    }

    /// Flips one item and returns its new state.
    pub fn toggle(&mut self, index: usize) -> Option<ItemState> {
        let state = self.states.get_mut(index)?;
        *state = state.toggled();
        Some(*state)
    }

    /// Sets every item to the same state.
    pub fn set_all(&mut self, state: ItemState) {
        self.states.iter_mut().for_each(|s| *s = state);
    }

    pub fn expanded_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_expanded()).count()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}
