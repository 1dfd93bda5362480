//! Topic list widget.
//!
//! A read-only snapshot of a stream's most recently active topics, rendered
//! into a parent element the caller owns. To refresh, build a new widget.

use serde::Serialize;
use std::sync::Arc;

use narrowbar_core::{StreamId, StreamStore, TopicEntry, TopicListError, TopicStore, UnreadStore};

use crate::narrow_url::by_stream_topic_url;
use crate::surface::Element;
use crate::templates::{render_template, SHOW_MORE_TOPICS, TOPIC_LIST_ITEM};

// =============================================================================
// Builder
// =============================================================================

/// Stores the topic list reads from.
#[derive(Clone)]
pub struct TopicListStores {
    pub topics: Arc<dyn TopicStore>,
    pub streams: Arc<dyn StreamStore>,
    pub unread: Arc<dyn UnreadStore>,
}

/// Builds topic list widgets.
pub struct TopicListBuilder {
    stores: TopicListStores,
}

/// Template context for one topic row.
#[derive(Serialize)]
struct TopicItemContext<'a> {
    topic_name: &'a str,
    url: &'a str,
    unread: u32,
    is_zero: bool,
    is_active: bool,
}

impl TopicListBuilder {
    pub fn new(stores: TopicListStores) -> Self {
        Self { stores }
    }

    /// Render the `max_topics` most recent topics of `stream_id` into `parent`.
    ///
    /// `active_topic` is matched exactly (case-sensitive) and only flags the
    /// row; it never changes the order or pulls in an older topic.
    pub fn build_widget(
        &self,
        parent: &Arc<Element>,
        stream_id: StreamId,
        active_topic: Option<&str>,
        max_topics: usize,
    ) -> Result<TopicListWidget, TopicListError> {
        let stream = self
            .stores
            .streams
            .get_stream(stream_id)
            .ok_or(TopicListError::UnknownStream(stream_id))?;

        let mut topics = self.stores.topics.recent_topics(stream_id);
        topics.sort_by(|a, b| b.max_message_id.cmp(&a.max_message_id));
        let truncated = topics.len() > max_topics;
        topics.truncate(max_topics);

        let mut items = Vec::with_capacity(topics.len());
        let mut dom = format!(r#"<ul class="topic-list" data-stream-id="{}">"#, stream_id);

        for topic in topics {
            let unread_count = self
                .stores
                .unread
                .num_unread_for_topic(stream_id, &topic.topic_name);
            let is_active = active_topic == Some(topic.topic_name.as_str());
            let url = by_stream_topic_url(&stream, &topic.topic_name);

            dom.push_str(&render_template(
                TOPIC_LIST_ITEM,
                TopicItemContext {
                    topic_name: &topic.topic_name,
                    url: &url,
                    unread: unread_count,
                    is_zero: unread_count == 0,
                    is_active,
                },
            )?);

            items.push(TopicListItem {
                entry: TopicEntry {
                    topic_name: topic.topic_name,
                    stream_id,
                    max_message_id: topic.max_message_id,
                    unread_count,
                },
                is_active,
                url,
            });
        }

        if truncated {
            dom.push_str(&render_template(SHOW_MORE_TOPICS, minijinja::context! {})?);
        }
        dom.push_str("</ul>");

        parent.append_html(dom.clone());
        tracing::debug!(
            "Built topic list for stream {} ({} topics, truncated: {})",
            stream_id,
            items.len(),
            truncated
        );

        Ok(TopicListWidget {
            parent: Arc::clone(parent),
            stream_id,
            active_topic: active_topic.map(str::to_string),
            items,
            truncated,
            dom,
        })
    }
}

// =============================================================================
// Widget
// =============================================================================

/// One rendered topic row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicListItem {
    pub entry: TopicEntry,
    /// Whether this is the topic currently narrowed to.
    pub is_active: bool,
    pub url: String,
}

/// A built topic list. Immutable.
#[derive(Debug)]
pub struct TopicListWidget {
    parent: Arc<Element>,
    stream_id: StreamId,
    active_topic: Option<String>,
    items: Vec<TopicListItem>,
    truncated: bool,
    dom: String,
}

impl TopicListWidget {
    /// The element the list was appended to (same handle the caller passed).
    pub fn get_parent(&self) -> &Arc<Element> {
        &self.parent
    }

    pub fn get_stream_id(&self) -> StreamId {
        self.stream_id
    }

    /// Rendered markup of the list.
    pub fn get_dom(&self) -> &str {
        &self.dom
    }

    pub fn active_topic(&self) -> Option<&str> {
        self.active_topic.as_deref()
    }

    /// Rows, most recent first.
    pub fn entries(&self) -> &[TopicListItem] {
        &self.items
    }

    pub fn num_items(&self) -> usize {
        self.items.len()
    }

    /// Check if older topics were left out.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

// =============================================================================
// Tests
// =============================================================================
