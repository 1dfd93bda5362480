//! Typeahead hooks and menu state.
//!
//! A typeahead is configured with `TypeaheadOptions` and driven by a
//! `TypeaheadHooks` implementation. `TypeaheadMenu` is the toolkit-free menu
//! state an input surface can use to run lookups, move the highlight and
//! select items.
//!
//! ## Lookup Pipeline
//!
//! ```text
//! query ─► source ─► matcher (filter) ─► sorter ─► truncate(items) ─► highlighter
//! ```

use std::sync::Arc;

// =============================================================================
// Options / Hooks
// =============================================================================

/// Typeahead configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeaheadOptions {
    /// Selector of the element the menu is attached to.
    pub parent_element: String,
    /// Maximum number of items shown.
    pub items: usize,
    /// Run lookups for an empty query.
    pub help_on_empty_strings: bool,
    /// Hide the menu while the query is empty.
    pub hide_on_empty: bool,
    /// Keep the typed text instead of replacing it with the highlighted item.
    pub natural_search: bool,
    /// Do not let advance keys commit the highlighted item.
    pub stop_advance: bool,
    /// Key codes that commit the highlighted item.
    pub advance_key_codes: Vec<u32>,
}

impl Default for TypeaheadOptions {
    fn default() -> Self {
        Self {
            parent_element: String::new(),
            items: 8,
            help_on_empty_strings: false,
            hide_on_empty: false,
            natural_search: false,
            stop_advance: false,
            advance_key_codes: Vec::new(),
        }
    }
}

/// Callbacks that drive a typeahead.
pub trait TypeaheadHooks: Send + Sync {
    /// Candidates for `query`.
    fn source(&self, query: &str) -> Vec<String>;

    /// Markup for one candidate.
    fn highlighter(&self, item: &str) -> String;

    fn matcher(&self, _item: &str) -> bool {
        true
    }

    fn sorter(&self, items: Vec<String>) -> Vec<String> {
        items
    }

    /// Handle a selected item. Returns the new input value.
    fn updater(&self, item: &str) -> String;

    /// The highlight moved.
    fn on_move(&self) {}

    /// The user pressed Esc.
    fn on_escape(&self) {}
}

// =============================================================================
// Menu
// =============================================================================

/// Menu state for one typeahead.
pub struct TypeaheadMenu {
    options: TypeaheadOptions,
    hooks: Arc<dyn TypeaheadHooks>,
    items: Vec<String>,
    active_index: usize,
    shown: bool,
}

impl TypeaheadMenu {
    pub fn new(options: TypeaheadOptions, hooks: Arc<dyn TypeaheadHooks>) -> Self {
        Self {
            options,
            hooks,
            items: Vec::new(),
            active_index: 0,
            shown: false,
        }
    }

    pub fn options(&self) -> &TypeaheadOptions {
        &self.options
    }

    /// Run the lookup pipeline for `query` and show or hide the menu.
    pub fn lookup(&mut self, query: &str) -> &[String] {
        self.items.clear();
        self.active_index = 0;
        self.shown = false;

        if query.is_empty() && !self.options.help_on_empty_strings {
            return &self.items;
        }

        let candidates: Vec<String> = self
            .hooks
            .source(query)
            .into_iter()
            .filter(|item| self.hooks.matcher(item))
            .collect();
        let mut items = self.hooks.sorter(candidates);
        items.truncate(self.options.items);
        self.items = items;

        let hidden_for_empty = query.is_empty() && self.options.hide_on_empty;
        self.shown = !self.items.is_empty() && !hidden_for_empty;
        &self.items
    }

    /// Rendered markup for every shown item.
    pub fn render(&self) -> Vec<String> {
        self.items
            .iter()
            .map(|item| self.hooks.highlighter(item))
            .collect()
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }

    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn active_item(&self) -> Option<&str> {
        self.items.get(self.active_index).map(String::as_str)
    }

    /// Move the highlight down, wrapping to the top.
    pub fn move_next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.active_index = (self.active_index + 1) % self.items.len();
        self.hooks.on_move();
    }

    /// Move the highlight up, wrapping to the bottom.
    pub fn move_prev(&mut self) {
        if self.items.is_empty() {
            return;
        }
        self.active_index = self
            .active_index
            .checked_sub(1)
            .unwrap_or(self.items.len() - 1);
        self.hooks.on_move();
    }

    /// Select the highlighted item and hide the menu.
    ///
    /// Returns the updater's new input value, or `None` when nothing is shown.
    pub fn select(&mut self) -> Option<String> {
        if !self.shown {
            return None;
        }
        let item = self.items.get(self.active_index)?.clone();
        self.shown = false;
        Some(self.hooks.updater(&item))
    }

    /// Check if `key_code` commits the highlighted item.
    pub fn is_advance_key(&self, key_code: u32) -> bool {
        !self.options.stop_advance && self.options.advance_key_codes.contains(&key_code)
    }

    /// Hide the menu and notify the hooks.
    pub fn escape(&mut self) {
        self.shown = false;
        self.hooks.on_escape();
    }
}

// =============================================================================
// Tests
// =============================================================================
