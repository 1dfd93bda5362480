//! Page surface abstractions.
//!
//! The controller never touches a concrete toolkit. It binds to elements
//! through these traits, which a browser binding, a native toolkit, or a
//! test double can implement.
//!
//! ## Capability Sets
//!
//! | Trait | Capabilities |
//! |-------|--------------|
//! | `EventTarget` | listen |
//! | `InputSurface` | value, set_value, focus, blur, is_focused, caret, typeahead |
//! | `StyledContainer` | listen, set_box_shadow |
//! | `ToggleButton` | set_disabled, is_disabled |
//! | `Page` | resolve the above by selector |

use parking_lot::Mutex;
use std::sync::Arc;

use crate::typeahead::{TypeaheadHooks, TypeaheadOptions};

// =============================================================================
// Events
// =============================================================================

/// Identifier of a page element, used for blur related targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ElementId(pub String);

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// A key as reported by key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    Enter,
    Escape,
    Backspace,
    Char(char),
    Other(String),
}

impl Key {
    pub fn is_enter(&self) -> bool {
        matches!(self, Key::Enter)
    }
}

/// Events delivered to registered handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    /// The element gained focus.
    Focus,
    /// The element lost focus. `related_target` is the element receiving focus.
    Blur { related_target: Option<ElementId> },
    /// Focus left the element or one of its descendants.
    FocusOut,
    KeyDown(Key),
    KeyUp(Key),
    /// An input method finished composing text.
    CompositionEnd,
}

/// Event kinds handlers subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Focus,
    Blur,
    FocusOut,
    KeyDown,
    KeyUp,
    CompositionEnd,
}

impl UiEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            UiEvent::Focus => EventKind::Focus,
            UiEvent::Blur { .. } => EventKind::Blur,
            UiEvent::FocusOut => EventKind::FocusOut,
            UiEvent::KeyDown(_) => EventKind::KeyDown,
            UiEvent::KeyUp(_) => EventKind::KeyUp,
            UiEvent::CompositionEnd => EventKind::CompositionEnd,
        }
    }
}

/// What a handler asks the surface to do with the event's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EventOutcome {
    #[default]
    Continue,
    PreventDefault,
}

/// A registered event handler.
pub type EventHandler = Arc<dyn Fn(&UiEvent) -> EventOutcome + Send + Sync>;

// =============================================================================
// Surface Traits
// =============================================================================

/// Anything handlers can be attached to.
pub trait EventTarget: Send + Sync {
    /// Register a handler for one event kind. Handlers stay registered for
    /// the lifetime of the element.
    fn listen(&self, kind: EventKind, handler: EventHandler);
}

/// A text (or content-editable) input.
pub trait InputSurface: EventTarget {
    fn value(&self) -> String;

    fn set_value(&self, value: &str);

    /// Focus the input. Implementations dispatch `UiEvent::Focus`.
    fn focus(&self);

    /// Blur the input. Implementations dispatch `UiEvent::Blur`.
    fn blur(&self);

    fn is_focused(&self) -> bool;

    fn place_caret_at_end(&self);

    /// Attach typeahead behavior driven by `hooks`.
    fn install_typeahead(&self, options: TypeaheadOptions, hooks: Arc<dyn TypeaheadHooks>);

    /// Run a typeahead lookup for the current value and select the active item.
    fn typeahead_lookup_and_select(&self);
}

/// A container whose decoration the controller adjusts.
pub trait StyledContainer: EventTarget {
    /// Set or clear (`None`) the container's box shadow.
    fn set_box_shadow(&self, shadow: Option<&str>);
}

/// A button that can be enabled and disabled.
pub trait ToggleButton: Send + Sync {
    fn set_disabled(&self, disabled: bool);

    fn is_disabled(&self) -> bool;
}

/// Element lookup by selector.
pub trait Page {
    fn input(&self, selector: &str) -> Option<Arc<dyn InputSurface>>;

    fn event_target(&self, selector: &str) -> Option<Arc<dyn EventTarget>>;

    fn container(&self, selector: &str) -> Option<Arc<dyn StyledContainer>>;

    fn button(&self, selector: &str) -> Option<Arc<dyn ToggleButton>>;
}

// =============================================================================
// Element
// =============================================================================

/// A headless container element that collects rendered markup.
///
/// Widgets append to an `Arc<Element>` the caller keeps; the caller decides
/// when and where the markup is flushed to a real page.
#[derive(Debug)]
pub struct Element {
    tag: String,
    children: Mutex<Vec<String>>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Arc<Self> {
        Arc::new(Self {
            tag: tag.into(),
            children: Mutex::new(Vec::new()),
        })
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Append a child given as markup.
    pub fn append_html(&self, html: impl Into<String>) {
        self.children.lock().push(html.into());
    }

    /// Markup of all children, in order.
    pub fn inner_html(&self) -> String {
        self.children.lock().concat()
    }

    /// Full markup including this element's own tag.
    pub fn outer_html(&self) -> String {
        format!("<{tag}>{}</{tag}>", self.inner_html(), tag = self.tag)
    }

    pub fn child_count(&self) -> usize {
        self.children.lock().len()
    }
}
