//! Store snapshots loaded from JSON.
//!
//! A snapshot is a point-in-time dump of what a client has synced: streams,
//! the messages seen per topic, unread counts and muted topics.
//!
//! ```json
//! {
//!   "streams": [{ "stream_id": 555, "name": "devel" }],
//!   "messages": [{ "stream_id": 555, "topic": "coding", "id": 400 }],
//!   "unread": [{ "stream_id": 555, "topic": "coding", "count": 1 }],
//!   "muted_topics": []
//! }
//! ```

use serde::Deserialize;
use std::sync::Arc;

use narrowbar_core::{Stream, StreamDirectory, StreamId, TopicHistory, UnreadCounts};

use crate::views::TopicListStores;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub streams: Vec<Stream>,
    #[serde(default)]
    pub messages: Vec<SnapshotMessage>,
    #[serde(default)]
    pub unread: Vec<SnapshotUnread>,
    #[serde(default)]
    pub muted_topics: Vec<SnapshotTopic>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotMessage {
    pub stream_id: StreamId,
    pub topic: String,
    pub id: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotUnread {
    pub stream_id: StreamId,
    pub topic: String,
    pub count: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotTopic {
    pub stream_id: StreamId,
    pub topic: String,
}

impl Snapshot {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Populate in-memory stores from the snapshot.
    pub fn into_stores(self) -> TopicListStores {
        let streams = Arc::new(StreamDirectory::new());
        for stream in self.streams {
            streams.insert(stream);
        }

        let history = Arc::new(TopicHistory::new());
        for message in &self.messages {
            history.add_message(message.stream_id, &message.topic, message.id);
        }
        for muted in &self.muted_topics {
            history.mute_topic(muted.stream_id, &muted.topic);
        }

        let unread = Arc::new(UnreadCounts::new());
        for entry in &self.unread {
            unread.set(entry.stream_id, &entry.topic, entry.count);
        }

        tracing::debug!(
            "Loaded snapshot: {} messages, {} unread entries",
            self.messages.len(),
            self.unread.len()
        );

        TopicListStores {
            topics: history,
            streams,
            unread,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use narrowbar_core::{StreamStore, TopicStore, UnreadStore};

    const SNAPSHOT: &str = r#"{
        "streams": [{ "stream_id": 555, "name": "devel" }],
        "messages": [
            { "stream_id": 555, "topic": "coding", "id": 400 },
            { "stream_id": 555, "topic": "lunch", "id": 410 },
            { "stream_id": 555, "topic": "Coding", "id": 420 }
        ],
        "unread": [{ "stream_id": 555, "topic": "coding", "count": 3 }],
        "muted_topics": [{ "stream_id": 555, "topic": "lunch" }]
    }"#;

    #[test]
    fn test_into_stores() {
        let stores = Snapshot::from_json(SNAPSHOT).unwrap().into_stores();

        assert_eq!(
            stores.streams.get_stream(StreamId(555)),
            Some(Stream::new(555, "devel"))
        );
        let topics = stores.topics.recent_topics(StreamId(555));
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0].topic_name, "Coding");
        assert_eq!(topics[0].max_message_id, 420);
        assert_eq!(stores.unread.num_unread_for_topic(StreamId(555), "coding"), 3);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let snapshot = Snapshot::from_json("{}").unwrap();
        assert!(snapshot.streams.is_empty());
        assert!(snapshot.messages.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(Snapshot::from_json("{").is_err());
    }
}
