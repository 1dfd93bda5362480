//! Views for narrowbar.
//!
//! Views bind to page surfaces and render through the embedded templates.

mod search_bar;
mod topic_list;

pub use search_bar::{SearchBar, FOCUS_RING, SEARCH_TRIGGER};
pub use topic_list::{TopicListBuilder, TopicListItem, TopicListStores, TopicListWidget};
