//! Subsystems the search bar delegates to.
//!
//! Parsing, narrowing, pill bookkeeping and suggestion ranking all live
//! outside the controller. Each is a trait so the controller can be driven
//! against real subsystems or mocks.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use narrowbar_core::{Filter, Operator};

use crate::surface::ElementId;

// =============================================================================
// Types
// =============================================================================

/// Options passed along with a narrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NarrowOptions {
    /// What initiated the narrow, e.g. `"search"`.
    pub trigger: String,
}

impl NarrowOptions {
    pub fn trigger(trigger: impl Into<String>) -> Self {
        Self {
            trigger: trigger.into(),
        }
    }
}

/// Rendering data for one suggestion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestionDescriptor {
    /// Pre-rendered, trusted HTML.
    pub description_html: String,
}

impl SuggestionDescriptor {
    pub fn new(description_html: impl Into<String>) -> Self {
        Self {
            description_html: description_html.into(),
        }
    }
}

/// Result of a suggestion lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Suggestions {
    /// Candidate search strings, best first.
    pub strings: Vec<String>,
    /// Rendering data for each candidate.
    pub lookup_table: HashMap<String, SuggestionDescriptor>,
}

// =============================================================================
// Traits
// =============================================================================

/// Turns a query string into operators.
#[cfg_attr(test, mockall::automock)]
pub trait FilterParser: Send + Sync {
    fn parse(&self, query: &str) -> Vec<Operator>;
}

/// Changes the visible message view.
#[cfg_attr(test, mockall::automock)]
pub trait NarrowActivator: Send + Sync {
    fn activate(&self, operators: &[Operator], options: &NarrowOptions);
}

/// Reports whether the view is currently narrowed.
#[cfg_attr(test, mockall::automock)]
pub trait NarrowState: Send + Sync {
    fn active(&self) -> bool;
}

/// The ordered set of active search pills.
#[cfg_attr(test, mockall::automock)]
pub trait SearchPillStore: Send + Sync {
    /// Serialize the current pills into a query string.
    fn search_string_for_current_filter(&self) -> String;

    /// Append pills parsed from `search_string`.
    fn append_search_string(&self, search_string: &str);

    /// Check if `element` is one of the rendered pills.
    fn is_pill(&self, element: &ElementId) -> bool;
}

/// Ranked search suggestions.
#[cfg_attr(test, mockall::automock)]
pub trait SuggestionSource: Send + Sync {
    fn get_suggestions(&self, base_query: &str, query: &str) -> Suggestions;

    /// Upper bound on the number of suggestions shown.
    fn max_num_of_search_results(&self) -> usize;
}

/// Message view header chrome around the search bar.
#[cfg_attr(test, mockall::automock)]
pub trait SearchHeader: Send + Sync {
    fn open_search_bar_and_close_narrow_description(&self);

    fn close_search_bar_and_open_narrow_description(&self);

    /// Leave search mode (Esc).
    fn exit_search(&self);
}

/// Parser backed by the core query tokenizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParser;

impl FilterParser for QueryParser {
    fn parse(&self, query: &str) -> Vec<Operator> {
        Filter::parse(query)
    }
}

// =============================================================================
// Bundle
// =============================================================================

/// All collaborators a search bar needs.
#[derive(Clone)]
pub struct SearchCollaborators {
    pub parser: Arc<dyn FilterParser>,
    pub narrow: Arc<dyn NarrowActivator>,
    pub narrow_state: Arc<dyn NarrowState>,
    pub pills: Arc<dyn SearchPillStore>,
    pub suggestions: Arc<dyn SuggestionSource>,
    pub header: Arc<dyn SearchHeader>,
}
