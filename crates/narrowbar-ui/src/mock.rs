//! In-memory page surfaces for tests.
//!
//! Every fake dispatches events synchronously to its handlers, the way a
//! browser runs handlers for a programmatic `focus()` or `blur()`.

use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use narrowbar_core::ElementSelectors;

use crate::surface::{
    ElementId, EventHandler, EventKind, EventOutcome, EventTarget, InputSurface, Page,
    StyledContainer, ToggleButton, UiEvent,
};
use crate::typeahead::{TypeaheadHooks, TypeaheadMenu, TypeaheadOptions};

// =============================================================================
// Listeners
// =============================================================================

/// Handler list shared by all fakes.
#[derive(Default)]
pub struct Listeners {
    handlers: Mutex<Vec<(EventKind, EventHandler)>>,
}

impl Listeners {
    pub fn add(&self, kind: EventKind, handler: EventHandler) {
        self.handlers.lock().push((kind, handler));
    }

    /// Run every handler for the event's kind. Handlers run without the
    /// list locked so they may register more handlers or dispatch again.
    pub fn dispatch(&self, event: &UiEvent) -> EventOutcome {
        let kind = event.kind();
        let matching: Vec<EventHandler> = self
            .handlers
            .lock()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, h)| h.clone())
            .collect();

        let mut outcome = EventOutcome::Continue;
        for handler in matching {
            if handler(event) == EventOutcome::PreventDefault {
                outcome = EventOutcome::PreventDefault;
            }
        }
        outcome
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.handlers.lock().iter().filter(|(k, _)| *k == kind).count()
    }
}

// =============================================================================
// Fake Input
// =============================================================================

#[derive(Default)]
pub struct FakeInput {
    pub listeners: Listeners,
    value: Mutex<String>,
    focused: Mutex<bool>,
    caret_moves: Mutex<usize>,
    typeahead: Mutex<Option<TypeaheadMenu>>,
    lookups: Mutex<usize>,
}

impl FakeInput {
    pub fn dispatch(&self, event: UiEvent) -> EventOutcome {
        self.listeners.dispatch(&event)
    }

    /// Set the value as if typed, without events.
    pub fn type_text(&self, text: &str) {
        *self.value.lock() = text.to_string();
    }

    /// Move focus away to `target`.
    pub fn blur_to(&self, target: Option<ElementId>) {
        *self.focused.lock() = false;
        self.dispatch(UiEvent::Blur {
            related_target: target,
        });
    }

    pub fn caret_moves(&self) -> usize {
        *self.caret_moves.lock()
    }

    pub fn lookups(&self) -> usize {
        *self.lookups.lock()
    }

    pub fn typeahead_options(&self) -> Option<TypeaheadOptions> {
        self.typeahead.lock().as_ref().map(|m| m.options().clone())
    }

    /// Run `f` against the installed typeahead menu.
    ///
    /// The menu lock is held while `f` runs; hooks must not reach back into
    /// the typeahead.
    pub fn with_typeahead<R>(&self, f: impl FnOnce(&mut TypeaheadMenu) -> R) -> Option<R> {
        self.typeahead.lock().as_mut().map(f)
    }
}

impl EventTarget for FakeInput {
    fn listen(&self, kind: EventKind, handler: EventHandler) {
        self.listeners.add(kind, handler);
    }
}

impl InputSurface for FakeInput {
    fn value(&self) -> String {
        self.value.lock().clone()
    }

    fn set_value(&self, value: &str) {
        *self.value.lock() = value.to_string();
    }

    fn focus(&self) {
        *self.focused.lock() = true;
        self.dispatch(UiEvent::Focus);
    }

    fn blur(&self) {
        self.blur_to(None);
    }

    fn is_focused(&self) -> bool {
        *self.focused.lock()
    }

    fn place_caret_at_end(&self) {
        *self.caret_moves.lock() += 1;
    }

    fn install_typeahead(&self, options: TypeaheadOptions, hooks: Arc<dyn TypeaheadHooks>) {
        *self.typeahead.lock() = Some(TypeaheadMenu::new(options, hooks));
    }

    fn typeahead_lookup_and_select(&self) {
        *self.lookups.lock() += 1;
        let query = self.value();
        let selected = self.with_typeahead(|menu| {
            menu.lookup(&query);
            menu.select()
        });
        if let Some(Some(value)) = selected {
            self.set_value(&value);
        }
    }
}

// =============================================================================
// Fake Target / Container / Button
// =============================================================================

#[derive(Default)]
pub struct FakeTarget {
    pub listeners: Listeners,
}

impl FakeTarget {
    pub fn dispatch(&self, event: UiEvent) -> EventOutcome {
        self.listeners.dispatch(&event)
    }
}

impl EventTarget for FakeTarget {
    fn listen(&self, kind: EventKind, handler: EventHandler) {
        self.listeners.add(kind, handler);
    }
}

#[derive(Default)]
pub struct FakeContainer {
    pub listeners: Listeners,
    box_shadow: Mutex<Option<String>>,
}

impl FakeContainer {
    pub fn dispatch(&self, event: UiEvent) -> EventOutcome {
        self.listeners.dispatch(&event)
    }

    pub fn box_shadow(&self) -> Option<String> {
        self.box_shadow.lock().clone()
    }
}

impl EventTarget for FakeContainer {
    fn listen(&self, kind: EventKind, handler: EventHandler) {
        self.listeners.add(kind, handler);
    }
}

impl StyledContainer for FakeContainer {
    fn set_box_shadow(&self, shadow: Option<&str>) {
        *self.box_shadow.lock() = shadow.map(str::to_string);
    }
}

pub struct FakeButton {
    disabled: Mutex<bool>,
}

impl FakeButton {
    pub fn new(disabled: bool) -> Self {
        Self {
            disabled: Mutex::new(disabled),
        }
    }
}

impl ToggleButton for FakeButton {
    fn set_disabled(&self, disabled: bool) {
        *self.disabled.lock() = disabled;
    }

    fn is_disabled(&self) -> bool {
        *self.disabled.lock()
    }
}

// =============================================================================
// Fake Page
// =============================================================================

/// A page holding one of each fake under the default selectors.
pub struct FakePage {
    pub query_box: Arc<FakeInput>,
    pub form: Arc<FakeTarget>,
    pub searchbox: Arc<FakeContainer>,
    pub close_button: Arc<FakeButton>,
    selectors: HashMap<&'static str, String>,
    missing: HashSet<String>,
}

impl FakePage {
    pub fn new() -> Self {
        let defaults = ElementSelectors::default();
        Self {
            query_box: Arc::new(FakeInput::default()),
            form: Arc::new(FakeTarget::default()),
            searchbox: Arc::new(FakeContainer::default()),
            close_button: Arc::new(FakeButton::new(true)),
            selectors: HashMap::from([
                ("query_box", defaults.query_box),
                ("form", defaults.form),
                ("searchbox", defaults.searchbox),
                ("close_button", defaults.close_button),
            ]),
            missing: HashSet::new(),
        }
    }

    /// Make lookups for `selector` fail.
    pub fn without(mut self, selector: &str) -> Self {
        self.missing.insert(selector.to_string());
        self
    }

    fn has(&self, role: &str, selector: &str) -> bool {
        !self.missing.contains(selector)
            && self.selectors.get(role).map(String::as_str) == Some(selector)
    }
}

impl Page for FakePage {
    fn input(&self, selector: &str) -> Option<Arc<dyn InputSurface>> {
        let input: Arc<dyn InputSurface> = self.query_box.clone();
        self.has("query_box", selector).then_some(input)
    }

    fn event_target(&self, selector: &str) -> Option<Arc<dyn EventTarget>> {
        let form: Arc<dyn EventTarget> = self.form.clone();
        self.has("form", selector).then_some(form)
    }

    fn container(&self, selector: &str) -> Option<Arc<dyn StyledContainer>> {
        let searchbox: Arc<dyn StyledContainer> = self.searchbox.clone();
        self.has("searchbox", selector).then_some(searchbox)
    }

    fn button(&self, selector: &str) -> Option<Arc<dyn ToggleButton>> {
        let button: Arc<dyn ToggleButton> = self.close_button.clone();
        self.has("close_button", selector).then_some(button)
    }
}
