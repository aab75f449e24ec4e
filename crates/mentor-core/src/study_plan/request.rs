//! Typed payloads for the study-plan actor's message protocol.

use crate::error::{MentorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload shared by `analyze`, `generate`, and `update`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateStudyPlanRequest {
    pub user_id: String,
    /// When present, only evaluations from these sessions are considered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_ids: Option<Vec<String>>,
}

/// The study-plan actor's closed message set.
#[derive(Debug, Clone)]
pub enum StudyPlanOp {
    Analyze(GenerateStudyPlanRequest),
    Generate(GenerateStudyPlanRequest),
    Update(GenerateStudyPlanRequest),
}

impl StudyPlanOp {
    /// Parses a raw envelope type + payload into a typed operation.
    pub fn parse(msg_type: &str, payload: Value) -> Result<Self> {
        let parsed = match msg_type {
            "analyze" => StudyPlanOp::Analyze(decode(payload)?),
            "generate" => StudyPlanOp::Generate(decode(payload)?),
            "update" => StudyPlanOp::Update(decode(payload)?),
            other => {
                return Err(MentorError::validation(format!(
                    "unknown study-plan message type: {}",
                    other
                )));
            }
        };
        Ok(parsed)
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| MentorError::validation(format!("invalid study-plan payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_session_scope_is_optional() {
        let op = StudyPlanOp::parse("generate", json!({"userId": "u1"})).unwrap();
        match op {
            StudyPlanOp::Generate(req) => assert!(req.session_ids.is_none()),
            other => panic!("unexpected op: {:?}", other),
        }
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(StudyPlanOp::parse("refresh", json!({"userId": "u1"})).is_err());
    }
}
