//! Error types for narrowbar.

use thiserror::Error;

use crate::topic::StreamId;

/// Search bar setup errors.
///
/// These are fatal preconditions: a controller that fails to initialize
/// is never usable.
#[derive(Debug, Error)]
pub enum SearchBarError {
    /// A page element the controller needs is not present.
    #[error("Missing page element '{selector}'")]
    MissingElement { selector: String },

    /// No tokio runtime to schedule deferred work on.
    #[error("No async runtime available for deferred callbacks")]
    NoRuntime,
}

/// Topic list build errors.
#[derive(Debug, Error)]
pub enum TopicListError {
    /// The stream store has no stream with this id.
    #[error("Unknown stream id {0}")]
    UnknownStream(StreamId),

    /// Rendering a topic entry failed.
    #[error("Render error: {0}")]
    Template(#[from] TemplateError),
}

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// No embedded template with this name.
    #[error("Template '{0}' not found")]
    NotFound(String),

    /// The template engine rejected the template or its context.
    #[error("Failed to render '{name}': {message}")]
    Render { name: String, message: String },
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// No config directory found.
    #[error("Config directory not found")]
    NoConfigDir,

    /// IO error.
    #[error("IO error: {0}")]
    Io(String),

    /// Parse error.
    #[error("Parse error: {0}")]
    Parse(String),
}
