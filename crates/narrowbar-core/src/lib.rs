//! Core types for narrowbar.
//!
//! This crate contains the data structures shared by the UI crate:
//! - Search operators and the query tokenizer
//! - Stream and topic types, plus the stores the topic list reads from
//! - Configuration types
//! - Error types

mod config;
mod error;
mod operator;
mod topic;

pub use config::{
    config_dir, config_path, AppConfig, ElementSelectors, SearchBarConfig, TopicListConfig,
};
pub use error::{ConfigError, SearchBarError, TemplateError, TopicListError};
pub use operator::{Filter, Operator, SEARCH_OPERATOR};
pub use topic::{
    Stream, StreamDirectory, StreamId, StreamStore, TopicEntry, TopicHistory, TopicRecency,
    TopicStore, UnreadCounts, UnreadStore,
};
