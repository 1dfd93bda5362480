//! State model for the search bar.
//!
//! This module contains the phase machine and data structures that back the
//! controller. All types are toolkit-independent for testability.

mod state;

pub use state::{SearchPhase, SearchState, SuggestionMap};
