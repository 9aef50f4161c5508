//! Wire codec for the text/event-stream frame format
//!
//! One frame per event: optional `id:`, `event:` and `retry:` lines, one
//! `data:` line per payload newline, and a blank line terminating the frame.
//! Decoding is the client-side inverse and exists for round-trip tests.

use serde::Serialize;

use crate::error::StreamResult;

/// A single encoded unit of transmission on an event stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Event type; `None` means the client's default message handler
    pub event_type: Option<String>,
    /// Monotonic per-stream sequence value for client bookkeeping
    pub id: Option<String>,
    /// Reconnection delay hint in milliseconds
    pub retry: Option<u64>,
    /// Payload text; compact JSON for all streams in this crate
    pub data: String,
}

impl Frame {
    /// Create a frame carrying raw payload text with the default event type
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event_type: None,
            id: None,
            retry: None,
            data: data.into(),
        }
    }

    /// Create a typed frame from a serializable payload
    ///
    /// Serialization is compact, so the payload never carries embedded
    /// newlines and always occupies a single `data:` line.
    pub fn json<T: Serialize>(event_type: &str, payload: &T) -> StreamResult<Self> {
        Ok(Self {
            event_type: Some(event_type.to_string()),
            id: None,
            retry: None,
            data: serde_json::to_string(payload)?,
        })
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_retry(mut self, millis: u64) -> Self {
        self.retry = Some(millis);
        self
    }

    /// Encode the frame into its wire representation
    pub fn encode(&self) -> String {
        let mut out = String::new();

        if let Some(id) = &self.id {
            out.push_str(&format!("id: {}\n", id));
        }
        if let Some(event) = &self.event_type {
            out.push_str(&format!("event: {}\n", event));
        }
        if let Some(retry) = self.retry {
            out.push_str(&format!("retry: {}\n", retry));
        }
        for line in self.data.split('\n') {
            out.push_str(&format!("data: {}\n", line));
        }
        out.push('\n');

        out
    }

    /// Decode a single wire frame back into a `Frame`
    ///
    /// Multiple `data:` lines are rejoined with `\n`. Comment lines and
    /// unknown fields are ignored per the event stream grammar. Returns
    /// `None` when the input carries no fields at all (e.g. a pure comment).
    pub fn decode(raw: &str) -> Option<Frame> {
        let mut event_type = None;
        let mut id = None;
        let mut retry = None;
        let mut data_lines: Vec<&str> = Vec::new();
        let mut saw_field = false;

        for line in raw.lines() {
            if line.is_empty() || line.starts_with(':') {
                continue;
            }
            let (field, value) = match line.split_once(':') {
                Some((field, value)) => (field, value.strip_prefix(' ').unwrap_or(value)),
                None => (line, ""),
            };
            match field {
                "event" => event_type = Some(value.to_string()),
                "id" => id = Some(value.to_string()),
                "retry" => retry = value.parse().ok(),
                "data" => data_lines.push(value),
                _ => continue,
            }
            saw_field = true;
        }

        if !saw_field {
            return None;
        }

        Some(Frame {
            event_type,
            id,
            retry,
            data: data_lines.join("\n"),
        })
    }
}

/// Encode a comment line, ignored by clients but useful for keep-alive
pub fn encode_comment(text: &str) -> String {
    format!(": {}\n\n", text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_field_order() {
        let frame = Frame::new("{\"count\":1}")
            .with_id("1")
            .with_retry(3000);
        let frame = Frame {
            event_type: Some("update".to_string()),
            ..frame
        };

        assert_eq!(
            frame.encode(),
            "id: 1\nevent: update\nretry: 3000\ndata: {\"count\":1}\n\n"
        );
    }

    #[test]
    fn test_encode_omits_absent_fields() {
        let frame = Frame::new("hello");
        assert_eq!(frame.encode(), "data: hello\n\n");
    }

    #[test]
    fn test_encode_splits_multiline_payload() {
        let frame = Frame::new("line1\nline2");
        assert_eq!(frame.encode(), "data: line1\ndata: line2\n\n");
    }

    #[test]
    fn test_json_frame_is_single_line() {
        let payload = serde_json::json!({"a": 1, "b": "two"});
        let frame = Frame::json("update", &payload).unwrap();
        assert!(!frame.data.contains('\n'));
        assert_eq!(frame.event_type.as_deref(), Some("update"));
    }

    #[test]
    fn test_comment_encoding() {
        assert_eq!(encode_comment("keep-alive"), ": keep-alive\n\n");
    }

    #[test]
    fn test_decode_round_trip() {
        let original = Frame::json("log", &serde_json::json!({"line": 3}))
            .unwrap()
            .with_id("3");
        let decoded = Frame::decode(&original.encode()).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn test_decode_round_trip_multiline() {
        let original = Frame::new("first\nsecond\nthird");
        let decoded = Frame::decode(&original.encode()).unwrap();
        assert_eq!(decoded.data, "first\nsecond\nthird");
    }

    #[test]
    fn test_decode_ignores_comments() {
        assert!(Frame::decode(": heartbeat\n\n").is_none());

        let decoded = Frame::decode(": note\ndata: payload\n\n").unwrap();
        assert_eq!(decoded.data, "payload");
    }
}
