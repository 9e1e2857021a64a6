use agora_core::DialogueTurn;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message delivered to room subscribers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoomEvent {
    Turn {
        speaker: String,
        content: String,
        sequence_index: usize,
        timestamp: DateTime<Utc>,
    },
    Summary {
        content: String,
        timestamp: DateTime<Utc>,
    },
    Error {
        message: String,
    },
}

impl RoomEvent {
    #[must_use]
    pub fn summary(content: impl Into<String>) -> Self {
        Self::Summary {
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

impl From<&DialogueTurn> for RoomEvent {
    fn from(turn: &DialogueTurn) -> Self {
        Self::Turn {
            speaker: turn.speaker.clone(),
            content: turn.content.clone(),
            sequence_index: turn.sequence_index,
            timestamp: turn.timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_turn_event_wire_shape() {
        let turn = DialogueTurn::new("Lincoln".to_string(), "Persevere.".to_string(), 2);
        let value = serde_json::to_value(RoomEvent::from(&turn)).expect("event serializes");

        assert_eq!(value["type"], "turn");
        assert_eq!(value["speaker"], "Lincoln");
        assert_eq!(value["content"], "Persevere.");
        assert_eq!(value["sequence_index"], 2);
        assert!(value["timestamp"].is_string());
    }

    #[test]
    #[expect(clippy::expect_used, reason = "Test failure should panic with context")]
    fn test_summary_and_error_tags() {
        let summary = serde_json::to_value(RoomEvent::summary("## Conclusion")).expect("serializes");
        assert_eq!(summary["type"], "summary");
        assert_eq!(summary["content"], "## Conclusion");

        let error = serde_json::to_value(RoomEvent::error("quota exceeded")).expect("serializes");
        assert_eq!(error["type"], "error");
        assert_eq!(error["message"], "quota exceeded");
    }
}
