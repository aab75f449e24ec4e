//! Typed payloads for the hint actor's message protocol.

use crate::error::{MentorError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of a hint `request` (escalating, analysis-driven).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestHintRequest {
    pub code: String,
    pub language: String,
    pub problem_id: String,
    pub user_id: String,
    pub session_id: String,
    /// How many hints this session has already received for the problem
    pub hints_provided: u8,
    /// Problem difficulty level, 1-5
    pub difficulty_level: u8,
}

impl RequestHintRequest {
    /// The escalation formula: `min(difficultyLevel + hintsProvided, 5)`.
    pub fn escalated_level(&self) -> u8 {
        self.difficulty_level.saturating_add(self.hints_provided).min(5).max(1)
    }
}

/// Payload of a hint `provide` (direct, caller-chosen level).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvideHintRequest {
    pub problem_id: String,
    pub session_id: String,
    /// Requested explicitness, 1-5
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_concept: Option<String>,
}

/// The hint actor's closed message set.
#[derive(Debug, Clone)]
pub enum HintOp {
    Request(RequestHintRequest),
    Provide(ProvideHintRequest),
}

impl HintOp {
    /// Parses a raw envelope type + payload into a typed operation.
    pub fn parse(msg_type: &str, payload: Value) -> Result<Self> {
        let parsed = match msg_type {
            "request" => HintOp::Request(decode(payload)?),
            "provide" => HintOp::Provide(decode(payload)?),
            other => {
                return Err(MentorError::validation(format!(
                    "unknown hint message type: {}",
                    other
                )));
            }
        };
        Ok(parsed)
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| MentorError::validation(format!("invalid hint payload: {}", e)))
}
