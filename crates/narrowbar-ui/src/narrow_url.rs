//! Narrow URLs for hash-based navigation.
//!
//! Hash components use URI component encoding, then escape `.` and replace
//! `%` with `.` so the result survives browsers that decode the fragment.

use narrowbar_core::Stream;

/// Encode one hash component.
pub fn encode_hash_component(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z'
            | b'a'..=b'z'
            | b'0'..=b'9'
            | b'-'
            | b'_'
            | b'!'
            | b'~'
            | b'*'
            | b'\''
            | b'('
            | b')' => out.push(byte as char),
            _ => out.push_str(&format!(".{:02X}", byte)),
        }
    }
    out
}

/// Stream slug: `<id>-<name>` with spaces as dashes.
pub fn encode_stream_slug(stream: &Stream) -> String {
    let slug = format!("{}-{}", stream.stream_id, stream.name.replace(' ', "-"));
    encode_hash_component(&slug)
}

/// URL of the narrow to one topic of a stream.
pub fn by_stream_topic_url(stream: &Stream, topic_name: &str) -> String {
    format!(
        "#narrow/stream/{}/topic/{}",
        encode_stream_slug(stream),
        encode_hash_component(topic_name)
    )
}
