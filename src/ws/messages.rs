//! WebSocket message types sent back to clients.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::RelayError;

/// Server → client frame.
///
/// Serialized with a `type` discriminator:
/// `{"type":"ECHO","content":…,"timestamp":"…"}` or
/// `{"type":"ERROR","message":"…"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutboundFrame {
    /// The client's own message, returned after it was stored.
    Echo {
        /// Parsed inbound message, unchanged.
        content: serde_json::Value,
        /// Receipt time, ISO-8601 UTC with millisecond precision.
        #[serde(serialize_with = "serialize_millis")]
        timestamp: DateTime<Utc>,
    },
    /// The inbound message could not be parsed or stored.
    Error {
        /// Client-facing description of the failure.
        message: String,
    },
}

impl OutboundFrame {
    /// Builds an `ECHO` frame.
    #[must_use]
    pub fn echo(content: serde_json::Value, timestamp: DateTime<Utc>) -> Self {
        Self::Echo { content, timestamp }
    }

    /// Builds an `ERROR` frame from a relay error's client message.
    #[must_use]
    pub fn error(err: &RelayError) -> Self {
        Self::Error {
            message: err.client_message().to_string(),
        }
    }

    /// Encodes the frame as JSON text.
    ///
    /// Falls back to a fixed `ERROR` frame if encoding fails, so a frame
    /// is always produced.
    #[must_use]
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|err| {
            tracing::error!(error = %err, "failed to encode outbound frame");
            r#"{"type":"ERROR","message":"Internal error"}"#.to_string()
        })
    }
}

fn serialize_millis<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    #[test]
    fn echo_frame_shape() {
        let Some(ts) = Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).single() else {
            unreachable!("valid timestamp");
        };
        let frame = OutboundFrame::echo(json!({"foo": 1}), ts);
        let Ok(value) = serde_json::from_str::<serde_json::Value>(&frame.to_json()) else {
            unreachable!("echo frame must be valid JSON");
        };
        assert_eq!(
            value,
            json!({
                "type": "ECHO",
                "content": {"foo": 1},
                "timestamp": "2026-10-16T09:30:00.000Z"
            })
        );
    }

    #[test]
    fn error_frame_shape() {
        let err = RelayError::PersistenceError("down".to_string());
        let frame = OutboundFrame::error(&err);
        assert_eq!(
            frame.to_json(),
            r#"{"type":"ERROR","message":"Failed to store message"}"#
        );
    }

    #[test]
    fn echo_frame_parses_back() {
        let ts = Utc::now();
        let frame = OutboundFrame::echo(json!([1, "two", null]), ts);
        let parsed: Result<OutboundFrame, _> = serde_json::from_str(&frame.to_json());
        let Ok(OutboundFrame::Echo { content, timestamp }) = parsed else {
            unreachable!("echo frame must parse back");
        };
        assert_eq!(content, json!([1, "two", null]));
        assert_eq!(timestamp.timestamp_millis(), ts.timestamp_millis());
    }
}
