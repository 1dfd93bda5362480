//! Markup templates.
//!
//! Templates are embedded at compile time and rendered with HTML
//! auto-escaping. Values marked `|safe` in a template are trusted markup.

use std::sync::LazyLock;

use include_dir::{include_dir, Dir};
use minijinja::{AutoEscape, Environment, ErrorKind};
use narrowbar_core::TemplateError;

static TEMPLATE_DIR: Dir<'static> = include_dir!("$CARGO_MANIFEST_DIR/templates");

pub const SEARCH_LIST_ITEM: &str = "search_list_item.html";
pub const TOPIC_LIST_ITEM: &str = "topic_list_item.html";
pub const SHOW_MORE_TOPICS: &str = "show_more_topics.html";

static ENV: LazyLock<Environment<'static>> = LazyLock::new(|| {
    let mut env = Environment::new();
    env.set_auto_escape_callback(|name| {
        if name.ends_with(".html") {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });

    for file in TEMPLATE_DIR.files() {
        let Some(name) = file.path().to_str() else {
            continue;
        };
        let Some(contents) = file.contents_utf8() else {
            tracing::warn!("Skipping non-UTF-8 template {}", name);
            continue;
        };
        if let Err(e) = env.add_template(name, contents) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }

    env
});

/// Render an embedded template.
pub fn render_template<T: serde::Serialize>(name: &str, ctx: T) -> Result<String, TemplateError> {
    let tpl = ENV.get_template(name).map_err(|e| match e.kind() {
        ErrorKind::TemplateNotFound => TemplateError::NotFound(name.to_string()),
        _ => TemplateError::Render {
            name: name.to_string(),
            message: e.to_string(),
        },
    })?;

    tpl.render(ctx).map_err(|e| TemplateError::Render {
        name: name.to_string(),
        message: e.to_string(),
    })
}
