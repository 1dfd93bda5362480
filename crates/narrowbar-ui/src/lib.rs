//! Search bar and topic list for a chat client.
//!
//! This crate provides the headless UI layer:
//! - SearchBar, the controller behind the message search box
//! - TopicListBuilder for per-stream recent topic lists
//! - Page surface and collaborator traits the controller binds to
//! - Typeahead menu state and embedded markup templates

pub mod collaborators;
pub mod model;
pub mod narrow_url;
pub mod snapshot;
pub mod surface;
pub mod templates;
pub mod typeahead;
pub mod views;

#[cfg(test)]
mod mock;

// Re-export commonly used types
pub use collaborators::{
    FilterParser, NarrowActivator, NarrowOptions, NarrowState, QueryParser, SearchCollaborators,
    SearchHeader, SearchPillStore, SuggestionDescriptor, SuggestionSource, Suggestions,
};
pub use model::{SearchPhase, SearchState, SuggestionMap};
pub use snapshot::Snapshot;
pub use surface::{
    Element, ElementId, EventHandler, EventKind, EventOutcome, EventTarget, InputSurface, Key,
    Page, StyledContainer, ToggleButton, UiEvent,
};
pub use typeahead::{TypeaheadHooks, TypeaheadMenu, TypeaheadOptions};
pub use views::{
    SearchBar, TopicListBuilder, TopicListItem, TopicListStores, TopicListWidget, FOCUS_RING,
    SEARCH_TRIGGER,
};
