//! Event viewer: load, filter and render event logs.
//!
//! The viewer is a single context object holding the currently loaded event
//! collection. It is constructed once, mutated by loads, and read by filter
//! and render operations.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐   raw JSON text    ┌─────────────┐   list + counters
//! │ drop / CLI │ ─────────────────▶ │ EventViewer │ ─────────────────▶ html / text
//! └────────────┘                    └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`config`]: Viewer settings loaded from TOML
//! - [`filter`]: Distinct types and the active selection
//! - [`render`]: Rendered list model built from events
//! - [`display`]: Per-item expand/collapse state
//! - [`format`]: Label cleaning and timestamp formatting
//! - [`load`]: Load tickets for asynchronous loads
//! - [`html`], [`text`]: Output forms

pub mod config;
pub mod display;
pub mod filter;
pub mod format;
pub mod html;
pub mod load;
pub mod render;
pub mod text;

// Re-export config types
pub use config::{
    default_config_toml, ConfigError, DisplayConfig, DisplayZone, FilterConfig, ViewerConfig,
};

// Re-export state types
pub use display::{DisplayState, ItemState};
pub use filter::{FilterOption, FilterSelection, TypeFilter, ANY};
pub use load::{LoadGuard, LoadTicket};
pub use render::{DetailBody, DetailNode, RenderedItem, RenderedList};

// Re-export formatting helpers
pub use format::{clean_label, format_in_zone, format_timestamp};

use log_events::{CollectionError, EventCollection};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur in viewer operations.
#[derive(Debug, Error)]
pub enum ViewerError {
    /// The loaded text is not a valid event collection
    #[error("failed to parse events: {0}")]
    Parse(#[from] CollectionError),
    /// A newer load started before this one finished
    #[error("load {ticket} superseded by load {current}")]
    StaleLoad { ticket: u64, current: u64 },
    /// No rendered item has this id
    #[error("no rendered item with id '{0}'")]
    UnknownItem(String),
}

/// The event viewer context.
///
/// Holds the loaded collection, the type filter, the rendered list and the
/// per-item display state. Every render rebuilds the list and collapses all
/// items.
#[derive(Debug)]
pub struct EventViewer {
    /// Configuration settings
    config: ViewerConfig,
    /// Currently loaded events
    collection: EventCollection,
    /// Distinct types and active selection
    type_filter: TypeFilter,
    /// Current rendered list
    view: RenderedList,
    /// Expand/collapse state, aligned with `view.items`
    display: DisplayState,
    /// Sequencing of asynchronous loads
    loads: LoadGuard,
}

impl EventViewer {
    /// Creates an empty viewer with the given configuration.
    pub fn new(config: ViewerConfig) -> Self {
        let type_filter = TypeFilter::empty(&config.filter.any_label);
        Self {
            config,
            collection: EventCollection::default(),
            type_filter,
            view: RenderedList::default(),
            display: DisplayState::default(),
            loads: LoadGuard::new(),
        }
    }

    /// Creates a viewer with default configuration.
    pub fn with_defaults() -> Self {
        Self::new(ViewerConfig::default())
    }

    /// Loads a collection from raw file text.
    ///
    /// Replaces the stored collection, rebuilds the filter options, resets the
    /// selection to any and renders everything. On error nothing changes.
    pub fn load(&mut self, raw: &str) -> Result<(), ViewerError> {
        let ticket = self.begin_load();
        self.finish_load(ticket, raw)
    }

    /// Starts an asynchronous load. Any ticket issued earlier becomes stale.
    pub fn begin_load(&mut self) -> LoadTicket {
        let ticket = self.loads.begin();
        debug!("Load {} started", ticket.generation());
        ticket
    }

    /// Completes a load started with [`Self::begin_load`].
    ///
    /// Fails with [`ViewerError::StaleLoad`] if a newer load has started since,
    /// leaving the state untouched.
    pub fn finish_load(&mut self, ticket: LoadTicket, raw: &str) -> Result<(), ViewerError> {
        if !self.loads.is_current(ticket) {
            warn!(
                "Discarding load {}: load {} started after it",
                ticket.generation(),
                self.loads.generation()
            );
            return Err(ViewerError::StaleLoad {
                ticket: ticket.generation(),
                current: self.loads.generation(),
            });
        }

        let collection = EventCollection::parse(raw).map_err(|e| {
            warn!("Rejected event file: {}", e);
            e
        })?;

        self.type_filter =
            TypeFilter::from_collection(&collection, &self.config.filter.any_label);
        self.collection = collection;
        info!(
            "Loaded {} events of {} types",
            self.collection.len(),
            self.type_filter.types().count()
        );

        self.render_selection();
        Ok(())
    }

    /// Restricts the rendered list to one type, or to everything for `"any"`.
    ///
    /// Unknown types render an empty list.
    pub fn filter(&mut self, value: &str) {
        self.type_filter.select(FilterSelection::from_value(value));
        self.render_selection();
        debug!(
            "Filter '{}' shows {} of {} events",
            value,
            self.view.shown(),
            self.view.total
        );
    }

    /// Flips the details panel of one rendered item.
    pub fn toggle(&mut self, id: &str) -> Result<ItemState, ViewerError> {
        let state = self
            .view
            .position(id)
            .and_then(|i| self.display.toggle(i))
            .ok_or_else(|| ViewerError::UnknownItem(id.to_string()))?;
        debug!("Item {} is now {}", id, state);
        Ok(state)
    }

    /// Sets every rendered item to the same state.
    pub fn set_all(&mut self, state: ItemState) {
        self.display.set_all(state);
    }

    /// Rebuilds the rendered list from the events matching the selection,
    /// collapsing every item.
    fn render_selection(&mut self) {
        let selection = self.type_filter.selection();
        let view = RenderedList::render(
            self.collection.iter().filter(|e| selection.matches(e)),
            self.collection.len(),
            self.config.display.time_zone,
        );
        self.display = DisplayState::collapsed(view.shown());
        self.view = view;
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn collection(&self) -> &EventCollection {
        &self.collection
    }

    pub fn view(&self) -> &RenderedList {
        &self.view
    }

    pub fn display(&self) -> &DisplayState {
        &self.display
    }

    pub fn type_filter(&self) -> &TypeFilter {
        &self.type_filter
    }

    pub fn filter_options(&self) -> &[FilterOption] {
        self.type_filter.options()
    }

    pub fn selection(&self) -> &FilterSelection {
        self.type_filter.selection()
    }

    /// Size of the loaded collection.
    pub fn total_count(&self) -> usize {
        self.view.total
    }

    /// Number of currently rendered items.
    pub fn shown_count(&self) -> usize {
        self.view.shown()
    }

    /// State of the rendered item with this id.
    pub fn item_state(&self, id: &str) -> Option<ItemState> {
        self.view.position(id).and_then(|i| self.display.get(i))
    }

    /// The rendered list as an HTML fragment.
    pub fn list_html(&self) -> String {
        html::list_html(&self.view, &self.display, self.config.display.indent_px)
    }

    /// One rendered item as an HTML fragment.
    pub fn item_html(&self, id: &str) -> Option<String> {
        let index = self.view.position(id)?;
        let state = self.display.get(index).unwrap_or_default();
        Some(html::item_html(
            &self.view.items[index],
            state,
            self.config.display.indent_px,
        ))
    }

    /// The type selection options as HTML.
    pub fn options_html(&self) -> String {
        html::options_html(self.type_filter.options(), self.type_filter.selection())
    }

    /// The rendered list as plain text.
    pub fn list_text(&self) -> String {
        text::list_text(&self.view, &self.display)
    }
}

impl Default for EventViewer {
    fn default() -> Self {
        Self::with_defaults()
    }
}
