//! Typed payloads for the session actor's message protocol.

use super::model::{ExperienceLevel, MessageRole, SessionContext};
use crate::error::{MentorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of a session `init` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitSessionRequest {
    pub user_id: String,
    pub experience_level: ExperienceLevel,
    pub target_areas: Vec<String>,
}

/// Payload of a session `update` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSessionRequest {
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_level: Option<ExperienceLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_areas: Option<Vec<String>>,
}

/// Payload of a session `end` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndSessionRequest {
    pub session_id: String,
}

/// Payload of a session `persist` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistMessageRequest {
    pub session_id: String,
    pub role: MessageRole,
    pub content: String,
}

/// Reply payload for `init`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInitialized {
    pub session_id: String,
    /// Context-tailored welcome message
    pub message: String,
    pub context: SessionContext,
}

/// Reply payload for `update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUpdated {
    pub session_id: String,
    pub context: SessionContext,
}

/// Reply payload for `end`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEnded {
    pub session_id: String,
    pub end_time: chrono::DateTime<chrono::Utc>,
}

/// Reply payload for `persist`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePersisted {
    pub session_id: String,
    pub message_count: usize,
}

/// The session actor's closed message set.
#[derive(Debug, Clone)]
pub enum SessionOp {
    Init(InitSessionRequest),
    Update(UpdateSessionRequest),
    End(EndSessionRequest),
    Persist(PersistMessageRequest),
}

impl SessionOp {
    /// Parses a raw envelope type + payload into a typed operation.
    ///
    /// An unknown type or a payload missing required fields is a
    /// `Validation` error.
    pub fn parse(msg_type: &str, payload: Value) -> Result<Self> {
        let parsed = match msg_type {
            "init" => SessionOp::Init(decode(payload)?),
            "update" => SessionOp::Update(decode(payload)?),
            "end" => SessionOp::End(decode(payload)?),
            "persist" => SessionOp::Persist(decode(payload)?),
            other => {
                return Err(MentorError::validation(format!(
                    "unknown session message type: {}",
                    other
                )));
            }
        };
        Ok(parsed)
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| MentorError::validation(format!("invalid session payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_init() {
        let op = SessionOp::parse(
            "init",
            json!({
                "userId": "u1",
                "experienceLevel": "beginner",
                "targetAreas": ["arrays"]
            }),
        )
        .unwrap();
        match op {
            SessionOp::Init(req) => {
                assert_eq!(req.user_id, "u1");
                assert_eq!(req.experience_level, ExperienceLevel::Beginner);
            }
            other => panic!("unexpected op: {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_is_validation_error() {
        let err = SessionOp::parse("init", json!({"userId": "u1"})).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_unknown_type_is_validation_error() {
        let err = SessionOp::parse("defragment", json!({})).unwrap_err();
        assert!(err.is_validation());
    }
}
