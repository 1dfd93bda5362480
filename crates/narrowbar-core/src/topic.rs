//! Streams, topics and the stores the topic list reads from.
//!
//! The stores are traits so a client can back them with whatever it syncs
//! from the server. In-memory implementations are provided for embedding
//! and tests.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

// =============================================================================
// Identifiers
// =============================================================================

/// Stream identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StreamId(pub u64);

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for StreamId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Stream metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stream {
    pub stream_id: StreamId,
    pub name: String,
}

impl Stream {
    pub fn new(stream_id: impl Into<StreamId>, name: impl Into<String>) -> Self {
        Self {
            stream_id: stream_id.into(),
            name: name.into(),
        }
    }
}

/// A topic and the id of its most recent message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicRecency {
    pub topic_name: String,
    pub max_message_id: u64,
}

/// A topic as shown in a topic list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicEntry {
    pub topic_name: String,
    pub stream_id: StreamId,
    pub max_message_id: u64,
    pub unread_count: u32,
}

// =============================================================================
// Store Traits
// =============================================================================

/// Topic enumeration per stream.
pub trait TopicStore: Send + Sync {
    /// Unmuted topics of a stream, most recent first.
    fn recent_topics(&self, stream_id: StreamId) -> Vec<TopicRecency>;
}

/// Stream metadata lookup.
pub trait StreamStore: Send + Sync {
    fn get_stream(&self, stream_id: StreamId) -> Option<Stream>;
}

/// Unread counts per topic.
pub trait UnreadStore: Send + Sync {
    fn num_unread_for_topic(&self, stream_id: StreamId, topic_name: &str) -> u32;
}

// =============================================================================
// Topic History
// =============================================================================

#[derive(Debug)]
struct TopicRecord {
    /// Display name, taken from the most recent message.
    display_name: String,
    max_message_id: u64,
}

/// In-memory topic store fed by incoming messages.
///
/// Topic identity is case-insensitive; the list shows the capitalization of
/// the most recent message.
#[derive(Debug, Default)]
pub struct TopicHistory {
    /// stream_id -> folded topic name -> record.
    streams: RwLock<HashMap<StreamId, HashMap<String, TopicRecord>>>,

    /// (stream_id, folded topic name) pairs hidden from `recent_topics`.
    muted: RwLock<HashSet<(StreamId, String)>>,
}

impl TopicHistory {
    /// Create an empty history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message in a topic.
    pub fn add_message(&self, stream_id: StreamId, topic_name: &str, message_id: u64) {
        let mut streams = self.streams.write();
        let topics = streams.entry(stream_id).or_default();
        let record = topics
            .entry(fold(topic_name))
            .or_insert_with(|| TopicRecord {
                display_name: topic_name.to_string(),
                max_message_id: message_id,
            });

        if message_id >= record.max_message_id {
            record.max_message_id = message_id;
            record.display_name = topic_name.to_string();
        }
    }

    /// Forget all recorded messages. Mutes are kept.
    pub fn reset(&self) {
        self.streams.write().clear();
    }

    pub fn mute_topic(&self, stream_id: StreamId, topic_name: &str) {
        self.muted.write().insert((stream_id, fold(topic_name)));
    }

    pub fn unmute_topic(&self, stream_id: StreamId, topic_name: &str) {
        self.muted.write().remove(&(stream_id, fold(topic_name)));
    }

    pub fn is_topic_muted(&self, stream_id: StreamId, topic_name: &str) -> bool {
        self.muted.read().contains(&(stream_id, fold(topic_name)))
    }
}

impl TopicStore for TopicHistory {
    fn recent_topics(&self, stream_id: StreamId) -> Vec<TopicRecency> {
        let streams = self.streams.read();
        let Some(topics) = streams.get(&stream_id) else {
            return Vec::new();
        };
        let muted = self.muted.read();

        let mut recent: Vec<TopicRecency> = topics
            .iter()
            .filter(|(key, _)| !muted.contains(&(stream_id, (*key).clone())))
            .map(|(_, record)| TopicRecency {
                topic_name: record.display_name.clone(),
                max_message_id: record.max_message_id,
            })
            .collect();

        recent.sort_by(|a, b| b.max_message_id.cmp(&a.max_message_id));
        recent
    }
}

fn fold(topic_name: &str) -> String {
    topic_name.to_lowercase()
}

// =============================================================================
// Stream Directory / Unread Counts
// =============================================================================

/// In-memory stream store.
#[derive(Debug, Default)]
pub struct StreamDirectory {
    streams: RwLock<HashMap<StreamId, Stream>>,
}

impl StreamDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a stream.
    pub fn insert(&self, stream: Stream) {
        self.streams.write().insert(stream.stream_id, stream);
    }
}

impl StreamStore for StreamDirectory {
    fn get_stream(&self, stream_id: StreamId) -> Option<Stream> {
        self.streams.read().get(&stream_id).cloned()
    }
}

/// In-memory unread store.
#[derive(Debug, Default)]
pub struct UnreadCounts {
    counts: RwLock<HashMap<(StreamId, String), u32>>,
}

impl UnreadCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the unread count for a topic. Zero removes the entry.
    pub fn set(&self, stream_id: StreamId, topic_name: &str, count: u32) {
        let key = (stream_id, fold(topic_name));
        if count == 0 {
            self.counts.write().remove(&key);
        } else {
            self.counts.write().insert(key, count);
        }
    }
}

impl UnreadStore for UnreadCounts {
    fn num_unread_for_topic(&self, stream_id: StreamId, topic_name: &str) -> u32 {
        self.counts
            .read()
            .get(&(stream_id, fold(topic_name)))
            .copied()
            .unwrap_or(0)
    }
}

// =============================================================================
// Tests
// =============================================================================
