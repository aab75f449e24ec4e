//! Message envelope and actor role types.
//!
//! Every request and response crossing an actor boundary uses the same
//! envelope: `{ id, type, payload }`. A response always carries the id of
//! the request that triggered it — this shared id is the sole correlation
//! mechanism between callers and actors.

use crate::error::MentorError;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// The wire type tag used for error replies.
pub const ERROR_TYPE: &str = "error";

/// The message envelope exchanged between the dispatcher and actors.
///
/// Invariant: a reply's `id` equals the id of the request it answers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Correlation id shared between a request and its reply
    pub id: Uuid,
    /// Message type tag (e.g. "init", "evaluate", "error")
    #[serde(rename = "type")]
    pub msg_type: String,
    /// Type-specific payload
    #[serde(default)]
    pub payload: Value,
}

impl Message {
    /// Creates a new request message with a freshly generated id.
    pub fn request(msg_type: impl Into<String>, payload: Value) -> Self {
        Self {
            id: Uuid::new_v4(),
            msg_type: msg_type.into(),
            payload,
        }
    }

    /// Creates a successful reply to `request`, inheriting its id.
    pub fn reply_to(request: &Message, msg_type: impl Into<String>, payload: Value) -> Self {
        Self {
            id: request.id,
            msg_type: msg_type.into(),
            payload,
        }
    }

    /// Creates an error reply to `request`, inheriting its id.
    ///
    /// The payload carries the human-readable message, the typed error, and
    /// the original request for diagnosis.
    pub fn error_reply(request: &Message, error: &MentorError) -> Self {
        let payload = ErrorPayload {
            error: error.to_string(),
            kind: error.clone(),
            original_message: request.clone(),
        };
        Self {
            id: request.id,
            msg_type: ERROR_TYPE.to_string(),
            // ErrorPayload serialization cannot fail: all fields are plain data
            payload: serde_json::to_value(payload).unwrap_or(Value::Null),
        }
    }

    /// Returns true if this message is an error reply.
    pub fn is_error(&self) -> bool {
        self.msg_type == ERROR_TYPE
    }

    /// Extracts the typed error from an error reply.
    ///
    /// Falls back to `Internal` when the payload does not parse (a foreign
    /// or hand-built error reply).
    pub fn to_error(&self) -> MentorError {
        match serde_json::from_value::<ErrorPayload>(self.payload.clone()) {
            Ok(p) => p.kind,
            Err(_) => MentorError::internal(format!(
                "malformed error reply for message {}",
                self.id
            )),
        }
    }
}

/// Payload of an error-typed reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    /// Human-readable error text, suitable for direct display
    pub error: String,
    /// The typed error this reply carries
    pub kind: MentorError,
    /// The request that triggered the error
    pub original_message: Message,
}

/// The fixed set of actor roles.
///
/// Each role owns exactly one long-lived actor instance for the life of the
/// dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActorRole {
    Session,
    Problem,
    Evaluation,
    Hint,
    StudyPlan,
    History,
}

impl ActorRole {
    /// All roles, in dispatcher startup order.
    pub const ALL: [ActorRole; 6] = [
        ActorRole::Session,
        ActorRole::Problem,
        ActorRole::Evaluation,
        ActorRole::Hint,
        ActorRole::StudyPlan,
        ActorRole::History,
    ];

    /// The role's wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActorRole::Session => "session",
            ActorRole::Problem => "problem",
            ActorRole::Evaluation => "evaluation",
            ActorRole::Hint => "hint",
            ActorRole::StudyPlan => "study-plan",
            ActorRole::History => "history",
        }
    }
}

impl fmt::Display for ActorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActorRole {
    type Err = MentorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(ActorRole::Session),
            "problem" => Ok(ActorRole::Problem),
            "evaluation" => Ok(ActorRole::Evaluation),
            "hint" => Ok(ActorRole::Hint),
            "study-plan" => Ok(ActorRole::StudyPlan),
            "history" => Ok(ActorRole::History),
            other => Err(MentorError::validation(format!(
                "unknown actor role: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_reply_inherits_request_id() {
        let request = Message::request("init", json!({"userId": "u1"}));
        let reply = Message::reply_to(&request, "session_initialized", json!({}));
        assert_eq!(reply.id, request.id);
    }

    #[test]
    fn test_error_reply_round_trip() {
        let request = Message::request("update", json!({}));
        let err = MentorError::not_found("session", "missing");
        let reply = Message::error_reply(&request, &err);

        assert!(reply.is_error());
        assert_eq!(reply.id, request.id);
        assert_eq!(reply.to_error(), err);
    }

    #[test]
    fn test_envelope_wire_shape() {
        let request = Message::request("evaluate", json!({"code": "fn main() {}"}));
        let wire = serde_json::to_value(&request).unwrap();
        assert_eq!(wire["type"], "evaluate");
        assert!(wire["id"].is_string());
        assert_eq!(wire["payload"]["code"], "fn main() {}");
    }

    #[test]
    fn test_role_wire_names() {
        assert_eq!(ActorRole::StudyPlan.to_string(), "study-plan");
        assert_eq!("study-plan".parse::<ActorRole>().unwrap(), ActorRole::StudyPlan);
        assert!("nonsense".parse::<ActorRole>().is_err());

        let json = serde_json::to_string(&ActorRole::StudyPlan).unwrap();
        assert_eq!(json, "\"study-plan\"");
    }
}
