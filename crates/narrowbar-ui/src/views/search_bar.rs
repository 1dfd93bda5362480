//! Search bar controller.
//!
//! Translates input events on the search box into narrow/search actions and
//! keeps the close button and focus ring in sync with the box.
//!
//! ## Event Wiring
//!
//! | Element | Event | Effect |
//! |---------|-------|--------|
//! | form | compositionend | mark input method active |
//! | form | keydown | refresh button; swallow Enter while focused |
//! | form | keyup | clear input method flag, or submit on Enter |
//! | query box | focus | enable button |
//! | query box | blur | recheck button after a delay (unless a pill took focus) |
//! | searchbox | focusout | close search chrome (pills only) |
//!
//! ## Input Methods
//!
//! Confirming an IME composition with Enter fires `compositionend` and then
//! the Enter key-up. The key-up after a composition clears the flag instead
//! of submitting, and `narrow_or_search_for_term` refuses to narrow while the
//! flag is set.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use narrowbar_core::{ElementSelectors, SearchBarConfig, SearchBarError};
use tokio::runtime::Handle;

use crate::collaborators::{NarrowOptions, SearchCollaborators, SuggestionDescriptor};
use crate::model::{SearchPhase, SearchState};
use crate::surface::{
    ElementId, EventHandler, EventKind, EventOutcome, EventTarget, InputSurface, Key, Page,
    StyledContainer, ToggleButton, UiEvent,
};
use crate::templates::{render_template, SEARCH_LIST_ITEM};
use crate::typeahead::{TypeaheadHooks, TypeaheadOptions};

/// Trigger tag passed to the narrow activator.
pub const SEARCH_TRIGGER: &str = "search";

/// Box shadow applied to the searchbox while search is open.
pub const FOCUS_RING: &str = "inset 0px 0px 0px 2px hsl(204, 20%, 74%)";

/// Backspace advances the typeahead (commits the highlighted pill text).
const BACKSPACE_KEY_CODE: u32 = 8;

// =============================================================================
// Elements
// =============================================================================

/// Page elements the controller binds to.
struct SearchBarElements {
    query_box: Arc<dyn InputSurface>,
    form: Arc<dyn EventTarget>,
    searchbox: Arc<dyn StyledContainer>,
    close_button: Arc<dyn ToggleButton>,
}

impl SearchBarElements {
    fn resolve(page: &dyn Page, selectors: &ElementSelectors) -> Result<Self, SearchBarError> {
        let missing = |selector: &str| SearchBarError::MissingElement {
            selector: selector.to_string(),
        };

        Ok(Self {
            query_box: page
                .input(&selectors.query_box)
                .ok_or_else(|| missing(&selectors.query_box))?,
            form: page
                .event_target(&selectors.form)
                .ok_or_else(|| missing(&selectors.form))?,
            searchbox: page
                .container(&selectors.searchbox)
                .ok_or_else(|| missing(&selectors.searchbox))?,
            close_button: page
                .button(&selectors.close_button)
                .ok_or_else(|| missing(&selectors.close_button))?,
        })
    }
}

// =============================================================================
// SearchBar (Public API)
// =============================================================================

/// Search bar controller.
///
/// Event handlers and the typeahead hold weak references, so dropping the
/// `SearchBar` detaches all behavior and cancels any pending recheck.
pub struct SearchBar {
    inner: Arc<Inner>,
}

impl SearchBar {
    /// Bind to the page's search elements and install all behavior.
    ///
    /// Must run inside a tokio runtime; deferred rechecks are spawned on it.
    pub fn initialize(
        config: SearchBarConfig,
        page: &dyn Page,
        collaborators: SearchCollaborators,
    ) -> Result<Self, SearchBarError> {
        let runtime = Handle::try_current().map_err(|_| SearchBarError::NoRuntime)?;
        let elements = SearchBarElements::resolve(page, &config.selectors)?;

        let inner = Arc::new(Inner {
            config,
            elements,
            collaborators,
            runtime,
            state: Mutex::new(SearchState::default()),
        });
        inner.install_typeahead();
        inner.register_handlers();

        tracing::info!(
            "Search bar initialized (pills: {})",
            inner.config.search_pills_enabled
        );
        Ok(Self { inner })
    }

    /// Narrow to `search_string` (or the current pills) and return the box value.
    pub fn narrow_or_search_for_term(&self, search_string: &str) -> String {
        self.inner.narrow_or_search_for_term(search_string)
    }

    /// Enable the close button if the box is focused, non-empty, or narrowed.
    pub fn update_button_visibility(&self) {
        self.inner.update_button_visibility();
    }

    /// Like `update_button_visibility`, with focus supplied by the caller.
    pub fn update_buttons_with_focus(&self, focused: bool) {
        self.inner.update_buttons_with_focus(focused);
    }

    /// Open the search chrome and start a lookup.
    pub fn initiate_search(&self) {
        self.inner.initiate_search();
    }

    /// Empty and blur the box and disable the close button.
    pub fn clear_search_form(&self) {
        self.inner.clear_search_form();
    }

    /// Treat the box as focused ahead of the focus event.
    pub fn focus_search(&self) {
        self.inner.focus_search();
    }

    pub fn phase(&self) -> SearchPhase {
        self.inner.state.lock().phase
    }

    /// Check if the next key-up will be swallowed as an IME confirmation.
    pub fn is_using_input_method(&self) -> bool {
        self.inner.state.lock().is_using_input_method
    }

    pub fn has_pending_recheck(&self) -> bool {
        self.inner.state.lock().pending_recheck.is_some()
    }

    /// Cancel deferred work. Handlers stay attached.
    pub fn dispose(&self) {
        self.inner.state.lock().cancel_recheck();
    }
}

impl Drop for SearchBar {
    fn drop(&mut self) {
        self.dispose();
    }
}

// =============================================================================
// Inner (Shared State)
// =============================================================================

struct Inner {
    config: SearchBarConfig,
    elements: SearchBarElements,
    collaborators: SearchCollaborators,
    runtime: Handle,
    /// Never held across calls into surfaces or collaborators; both may
    /// dispatch events back into the controller.
    state: Mutex<SearchState>,
}

impl Inner {
    fn pills_enabled(&self) -> bool {
        self.config.search_pills_enabled
    }

    // -------------------------------------------------------------------------
    // Setup
    // -------------------------------------------------------------------------

    fn install_typeahead(self: &Arc<Self>) {
        let pills = self.pills_enabled();
        let options = TypeaheadOptions {
            parent_element: self.config.selectors.typeahead_parent.clone(),
            items: self.collaborators.suggestions.max_num_of_search_results(),
            help_on_empty_strings: true,
            // With pills the box is empty even when pills are present.
            hide_on_empty: pills,
            natural_search: true,
            stop_advance: pills,
            advance_key_codes: vec![BACKSPACE_KEY_CODE],
        };
        let hooks = Arc::new(SearchTypeahead {
            inner: Arc::downgrade(self),
        });
        self.elements.query_box.install_typeahead(options, hooks);
    }

    fn register_handlers(self: &Arc<Self>) {
        let form = &self.elements.form;
        form.listen(
            EventKind::CompositionEnd,
            bind(self, |inner, _| {
                inner.on_composition_end();
                EventOutcome::Continue
            }),
        );
        form.listen(
            EventKind::KeyDown,
            bind(self, |inner, event| match event {
                UiEvent::KeyDown(key) => inner.on_key_down(key),
                _ => EventOutcome::Continue,
            }),
        );
        form.listen(
            EventKind::KeyUp,
            bind(self, |inner, event| {
                if let UiEvent::KeyUp(key) = event {
                    inner.on_key_up(key);
                }
                EventOutcome::Continue
            }),
        );

        let query_box = &self.elements.query_box;
        query_box.listen(
            EventKind::Focus,
            bind(self, |inner, _| {
                inner.on_focus();
                EventOutcome::Continue
            }),
        );
        query_box.listen(
            EventKind::Blur,
            bind(self, |inner, event| {
                if let UiEvent::Blur { related_target } = event {
                    inner.on_blur(related_target.as_ref());
                }
                EventOutcome::Continue
            }),
        );

        if self.pills_enabled() {
            self.elements.searchbox.listen(
                EventKind::FocusOut,
                bind(self, |inner, _| {
                    inner.on_searchbox_focus_out();
                    EventOutcome::Continue
                }),
            );
        }
    }

    // -------------------------------------------------------------------------
    // Operations
    // -------------------------------------------------------------------------

    fn narrow_or_search_for_term(&self, search_string: &str) -> String {
        let query_box = &self.elements.query_box;
        if self.state.lock().is_using_input_method {
            // The Enter that confirmed a composition also reaches the
            // typeahead updater; it must not submit.
            tracing::debug!("Input method active, not narrowing");
            return query_box.value();
        }

        // With pills the selected suggestion was already appended, so the
        // pill string covers it.
        let query = if self.pills_enabled() {
            self.collaborators.pills.search_string_for_current_filter()
        } else {
            search_string.to_string()
        };

        let operators = self.collaborators.parser.parse(&query);
        tracing::debug!("Narrowing to {} operator(s) from {:?}", operators.len(), query);
        self.collaborators
            .narrow
            .activate(&operators, &NarrowOptions::trigger(SEARCH_TRIGGER));
        self.state.lock().transition(SearchPhase::Submitted);

        // Narrowing fills the box with the new operators; leave them there.
        if !self.pills_enabled() {
            query_box.blur();
        }
        query_box.value()
    }

    fn update_buttons_with_focus(&self, focused: bool) {
        if focused
            || !self.elements.query_box.value().is_empty()
            || self.collaborators.narrow_state.active()
        {
            self.elements.close_button.set_disabled(false);
        }
    }

    fn update_button_visibility(&self) {
        self.update_buttons_with_focus(self.elements.query_box.is_focused());
    }

    fn initiate_search(&self) {
        self.collaborators
            .header
            .open_search_bar_and_close_narrow_description();
        self.elements.searchbox.set_box_shadow(Some(FOCUS_RING));

        let query_box = &self.elements.query_box;
        query_box.typeahead_lookup_and_select();
        if self.pills_enabled() {
            query_box.focus();
            query_box.place_caret_at_end();
        }
    }

    fn clear_search_form(&self) {
        let query_box = &self.elements.query_box;
        query_box.set_value("");
        query_box.blur();
        self.elements.close_button.set_disabled(true);
        self.state.lock().transition(SearchPhase::Idle);
    }

    fn focus_search(&self) {
        // Not focused yet, but about to be.
        self.update_buttons_with_focus(true);
    }

    // -------------------------------------------------------------------------
    // Event Handlers
    // -------------------------------------------------------------------------

    fn on_composition_end(&self) {
        tracing::debug!("Composition ended, suppressing next key-up");
        self.state.lock().is_using_input_method = true;
    }

    fn on_key_down(&self, key: &Key) -> EventOutcome {
        self.update_button_visibility();
        if key.is_enter() && self.elements.query_box.is_focused() {
            // The typeahead handles Enter; the key-up does any searching.
            return EventOutcome::PreventDefault;
        }
        EventOutcome::Continue
    }

    fn on_key_up(&self, key: &Key) {
        {
            let mut state = self.state.lock();
            if state.is_using_input_method {
                state.is_using_input_method = false;
                return;
            }
        }

        let query_box = &self.elements.query_box;
        if key.is_enter() && query_box.is_focused() {
            // Enter with focus still in the box means the typeahead was not
            // used; search by whatever was typed.
            self.narrow_or_search_for_term(&query_box.value());
            query_box.blur();
            self.update_buttons_with_focus(false);
        }
    }

    fn on_focus(&self) {
        self.focus_search();
        let mut state = self.state.lock();
        if state.phase == SearchPhase::Idle {
            state.transition(SearchPhase::Focused);
        }
    }

    fn on_blur(self: &Arc<Self>, related_target: Option<&ElementId>) {
        if self.pills_enabled() {
            if let Some(target) = related_target {
                if self.collaborators.pills.is_pill(target) {
                    // Focus moved to a pill inside the box; still searching.
                    return;
                }
            }
        }
        // Selecting a typeahead item blurs the box just before the
        // selection lands, so look again once it has.
        self.schedule_recheck();
    }

    fn on_searchbox_focus_out(&self) {
        self.collaborators
            .header
            .close_search_bar_and_open_narrow_description();
        self.elements.searchbox.set_box_shadow(None);
    }

    // -------------------------------------------------------------------------
    // Deferred Recheck
    // -------------------------------------------------------------------------

    fn schedule_recheck(self: &Arc<Self>) {
        let weak = Arc::downgrade(self);
        let delay = self.config.blur_recheck_delay();

        // The task only locks after its sleep, so spawning under the lock
        // keeps the handle stored before the task can clear it.
        let mut state = self.state.lock();
        state.cancel_recheck();
        state.recheck_generation += 1;
        let generation = state.recheck_generation;
        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade() {
                inner.finish_recheck(generation);
            }
        });
        state.pending_recheck = Some(task.abort_handle());
    }

    fn finish_recheck(&self, generation: u64) {
        {
            let mut state = self.state.lock();
            if state.recheck_generation != generation {
                return;
            }
            state.pending_recheck = None;
        }
        self.update_button_visibility();

        let query_box = &self.elements.query_box;
        if !query_box.is_focused() {
            let phase = if query_box.value().is_empty() {
                SearchPhase::Idle
            } else {
                SearchPhase::Focused
            };
            self.state.lock().transition(phase);
        }
    }

    // -------------------------------------------------------------------------
    // Typeahead
    // -------------------------------------------------------------------------

    fn typeahead_source(&self, query: &str) -> Vec<String> {
        let base_query = if self.pills_enabled() {
            self.collaborators.pills.search_string_for_current_filter()
        } else {
            String::new()
        };

        let suggestions = self
            .collaborators
            .suggestions
            .get_suggestions(&base_query, query);

        let mut state = self.state.lock();
        state.suggestion_map.replace(suggestions.lookup_table);
        state.transition(SearchPhase::Suggesting);
        suggestions.strings
    }

    fn typeahead_highlighter(&self, item: &str) -> String {
        let descriptor = self.state.lock().suggestion_map.get(item).cloned();
        let descriptor = descriptor.unwrap_or_else(|| {
            tracing::debug!("No suggestion descriptor for {:?}", item);
            SuggestionDescriptor::default()
        });

        render_template(SEARCH_LIST_ITEM, &descriptor).unwrap_or_else(|e| {
            tracing::warn!("Failed to render suggestion {:?}: {}", item, e);
            String::new()
        })
    }

    fn typeahead_updater(&self, search_string: &str) -> String {
        if self.pills_enabled() {
            self.collaborators.pills.append_search_string(search_string);
            return self.elements.query_box.value();
        }
        self.narrow_or_search_for_term(search_string)
    }
}

/// Wrap a handler so it only runs while the controller is alive.
fn bind(
    inner: &Arc<Inner>,
    f: impl Fn(&Arc<Inner>, &UiEvent) -> EventOutcome + Send + Sync + 'static,
) -> EventHandler {
    let weak = Arc::downgrade(inner);
    Arc::new(move |event: &UiEvent| match weak.upgrade() {
        Some(inner) => f(&inner, event),
        None => EventOutcome::Continue,
    })
}

// =============================================================================
// Typeahead Hooks
// =============================================================================

/// Typeahead hooks backed by the controller.
struct SearchTypeahead {
    inner: Weak<Inner>,
}

impl TypeaheadHooks for SearchTypeahead {
    fn source(&self, query: &str) -> Vec<String> {
        self.inner
            .upgrade()
            .map(|inner| inner.typeahead_source(query))
            .unwrap_or_default()
    }

    fn highlighter(&self, item: &str) -> String {
        self.inner
            .upgrade()
            .map(|inner| inner.typeahead_highlighter(item))
            .unwrap_or_default()
    }

    // Ranking belongs to the suggestion source.
    fn matcher(&self, _item: &str) -> bool {
        true
    }

    fn sorter(&self, items: Vec<String>) -> Vec<String> {
        items
    }

    fn updater(&self, item: &str) -> String {
        self.inner
            .upgrade()
            .map(|inner| inner.typeahead_updater(item))
            .unwrap_or_default()
    }

    fn on_move(&self) {
        if let Some(inner) = self.inner.upgrade() {
            if inner.pills_enabled() {
                inner.elements.query_box.place_caret_at_end();
            }
        }
    }

    fn on_escape(&self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.collaborators.header.exit_search();
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
