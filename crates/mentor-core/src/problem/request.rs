//! Typed payloads for the problem actor's message protocol.

use super::model::{CodingProblem, Difficulty};
use crate::error::{MentorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of a problem `request` (select one problem for a learner).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestProblemRequest {
    pub user_id: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
}

/// Payload of a problem `provide` (fetch a specific problem by id).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvideProblemRequest {
    pub problem_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Payload of a problem `suggest` (offer up to three candidates).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestProblemsRequest {
    pub user_id: String,
    pub session_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
}

/// Payload of a problem `filter` (all matches, unselected).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterProblemsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
}

/// Reply payload for `suggest`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemSuggestions {
    pub problems: Vec<CodingProblem>,
}

/// Reply payload for `filter`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemList {
    pub problems: Vec<CodingProblem>,
}

/// The problem actor's closed message set.
#[derive(Debug, Clone)]
pub enum ProblemOp {
    Request(RequestProblemRequest),
    Provide(ProvideProblemRequest),
    Suggest(SuggestProblemsRequest),
    Filter(FilterProblemsRequest),
}

impl ProblemOp {
    /// Parses a raw envelope type + payload into a typed operation.
    pub fn parse(msg_type: &str, payload: Value) -> Result<Self> {
        let parsed = match msg_type {
            "request" => ProblemOp::Request(decode(payload)?),
            "provide" => ProblemOp::Provide(decode(payload)?),
            "suggest" => ProblemOp::Suggest(decode(payload)?),
            "filter" => ProblemOp::Filter(decode(payload)?),
            other => {
                return Err(MentorError::validation(format!(
                    "unknown problem message type: {}",
                    other
                )));
            }
        };
        Ok(parsed)
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| MentorError::validation(format!("invalid problem payload: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_request_with_filters() {
        let op = ProblemOp::parse(
            "request",
            json!({
                "userId": "u1",
                "sessionId": "s1",
                "difficulty": "easy",
                "category": ["arrays"]
            }),
        )
        .unwrap();
        match op {
            ProblemOp::Request(req) => {
                assert_eq!(req.difficulty, Some(Difficulty::Easy));
                assert_eq!(req.category.as_deref(), Some(&["arrays".to_string()][..]));
            }
            other => panic!("unexpected op: {:?}", other),
        }
    }

    #[test]
    fn test_filters_are_optional() {
        let op = ProblemOp::parse("request", json!({"userId": "u1", "sessionId": "s1"})).unwrap();
        match op {
            ProblemOp::Request(req) => {
                assert!(req.difficulty.is_none());
                assert!(req.category.is_none());
            }
            other => panic!("unexpected op: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_difficulty_rejected() {
        let err = ProblemOp::parse(
            "filter",
            json!({"difficulty": "impossible"}),
        )
        .unwrap_err();
        assert!(err.is_validation());
    }
}
