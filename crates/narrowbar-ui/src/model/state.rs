//! Search bar state model.
//!
//! These types are toolkit-independent. The controller keeps one
//! `SearchState` behind a lock and exposes snapshots of it.

use std::collections::HashMap;

use tokio::task::AbortHandle;

use crate::collaborators::SuggestionDescriptor;

// =============================================================================
// Search Phase
// =============================================================================

/// Interaction phase of the search bar.
///
/// ```text
/// Idle ⇄ Focused ⇄ Suggesting ─► Submitted
///   ▲                               │
///   └────────── clear / blur ◄──────┘
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SearchPhase {
    /// Nothing typed, not focused.
    #[default]
    Idle,
    /// The box has focus or holds text.
    Focused,
    /// A typeahead lookup populated the suggestion map.
    Suggesting,
    /// A narrow was activated from the box.
    Submitted,
}

// =============================================================================
// Suggestion Map
// =============================================================================

/// Suggestion descriptors from the most recent typeahead lookup.
#[derive(Debug, Default)]
pub struct SuggestionMap {
    entries: HashMap<String, SuggestionDescriptor>,
}

impl SuggestionMap {
    /// Replace the map with a new lookup's table.
    pub fn replace(&mut self, entries: HashMap<String, SuggestionDescriptor>) {
        self.entries = entries;
    }

    pub fn get(&self, search_string: &str) -> Option<&SuggestionDescriptor> {
        self.entries.get(search_string)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

// =============================================================================
// Search State
// =============================================================================

/// Mutable controller state.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Current phase.
    pub phase: SearchPhase,

    /// Set when an input method finishes composing; the next key-up is
    /// the Enter that confirmed the composition and must not submit.
    pub is_using_input_method: bool,

    /// Descriptors for the current typeahead lookup.
    pub suggestion_map: SuggestionMap,

    /// Pending post-blur button recheck.
    pub pending_recheck: Option<AbortHandle>,

    /// Bumped for every scheduled recheck; a finishing task only clears
    /// `pending_recheck` if its generation is still current.
    pub recheck_generation: u64,
}

impl SearchState {
    /// Abort the pending recheck, if any.
    pub fn cancel_recheck(&mut self) {
        if let Some(handle) = self.pending_recheck.take() {
            handle.abort();
        }
    }

    /// Move to `phase`, logging the transition.
    pub fn transition(&mut self, phase: SearchPhase) {
        if self.phase != phase {
            tracing::debug!("Search phase {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state() {
        let state = SearchState::default();
        assert_eq!(state.phase, SearchPhase::Idle);
        assert!(!state.is_using_input_method);
        assert!(state.suggestion_map.is_empty());
        assert!(state.pending_recheck.is_none());
    }

    #[test]
    fn test_suggestion_map_replace_discards_previous() {
        let mut map = SuggestionMap::default();
        map.replace(HashMap::from([(
            "stream:devel".to_string(),
            SuggestionDescriptor::new("Stream <strong>devel</strong>"),
        )]));
        assert_eq!(map.len(), 1);

        map.replace(HashMap::from([(
            "is:starred".to_string(),
            SuggestionDescriptor::new("Starred messages"),
        )]));
        assert!(map.get("stream:devel").is_none());
        assert_eq!(
            map.get("is:starred").map(|d| d.description_html.as_str()),
            Some("Starred messages")
        );

        map.clear();
        assert!(map.is_empty());
    }

    #[test]
    fn test_transition() {
        let mut state = SearchState::default();
        state.transition(SearchPhase::Suggesting);
        assert_eq!(state.phase, SearchPhase::Suggesting);
        state.transition(SearchPhase::Submitted);
        assert_eq!(state.phase, SearchPhase::Submitted);
    }

    #[tokio::test]
    async fn test_cancel_recheck_aborts_task() {
        let task = tokio::spawn(std::future::pending::<()>());
        let mut state = SearchState {
            pending_recheck: Some(task.abort_handle()),
            ..Default::default()
        };

        state.cancel_recheck();
        assert!(state.pending_recheck.is_none());
        assert!(task.await.unwrap_err().is_cancelled());
    }
}
