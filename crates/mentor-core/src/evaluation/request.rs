//! Typed payloads for the evaluation actor's message protocol.

use crate::error::{MentorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload shared by `evaluate`, `feedback`, and `improve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateCodeRequest {
    pub code: String,
    pub language: String,
    pub problem_id: String,
    pub user_id: String,
    pub session_id: String,
}

/// Reply payload for `feedback`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResult {
    pub problem_id: String,
    pub overall_score: f64,
    pub feedback: String,
    pub suggestions: Vec<String>,
}

/// One prioritized improvement step.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementAction {
    /// 1 = most urgent, 5 = least
    pub priority: u8,
    /// The facet the action targets (e.g. "time complexity")
    pub area: String,
    pub action: String,
}

/// Reply payload for `improve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImprovementResult {
    pub problem_id: String,
    pub actions: Vec<ImprovementAction>,
}

/// The evaluation actor's closed message set.
#[derive(Debug, Clone)]
pub enum EvaluationOp {
    Evaluate(EvaluateCodeRequest),
    Feedback(EvaluateCodeRequest),
    Improve(EvaluateCodeRequest),
}

impl EvaluationOp {
    /// Parses a raw envelope type + payload into a typed operation.
    pub fn parse(msg_type: &str, payload: Value) -> Result<Self> {
        let parsed = match msg_type {
            "evaluate" => EvaluationOp::Evaluate(decode(payload)?),
            "feedback" => EvaluationOp::Feedback(decode(payload)?),
            "improve" => EvaluationOp::Improve(decode(payload)?),
            other => {
                return Err(MentorError::validation(format!(
                    "unknown evaluation message type: {}",
                    other
                )));
            }
        };
        Ok(parsed)
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| MentorError::validation(format!("invalid evaluation payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_evaluate() {
        let op = EvaluationOp::parse(
            "evaluate",
            json!({
                "code": "def solve(): pass",
                "language": "python",
                "problemId": "two-sum",
                "userId": "u1",
                "sessionId": "s1"
            }),
        )
        .unwrap();
        assert!(matches!(op, EvaluationOp::Evaluate(_)));
    }

    #[test]
    fn test_missing_code_rejected() {
        let err = EvaluationOp::parse(
            "evaluate",
            json!({"language": "python", "problemId": "p", "userId": "u", "sessionId": "s"}),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
