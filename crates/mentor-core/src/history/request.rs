//! Typed payloads for the history actor's message protocol.

use super::model::SessionHistory;
use crate::error::{MentorError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An inclusive time window filter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant <= self.end
    }
}

/// Payload of a history `fetch` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchHistoryRequest {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_range: Option<TimeRange>,
}

/// Payload of a history `save` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveHistoryRequest {
    pub user_id: String,
    pub session_id: String,
}

/// Payload of a history `analyze` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeHistoryRequest {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

/// Reply payload for `fetch`: one record when a session was named, the
/// filtered list otherwise.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HistoryRecords {
    Single(SessionHistory),
    Many(Vec<SessionHistory>),
}

impl HistoryRecords {
    /// Flattens either shape into a list.
    pub fn into_vec(self) -> Vec<SessionHistory> {
        match self {
            HistoryRecords::Single(record) => vec![record],
            HistoryRecords::Many(records) => records,
        }
    }
}

/// Reply payload for `save`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistorySaved {
    pub session_id: String,
    pub problems_attempted: usize,
}

/// The history actor's closed message set.
#[derive(Debug, Clone)]
pub enum HistoryOp {
    Fetch(FetchHistoryRequest),
    Save(SaveHistoryRequest),
    Analyze(AnalyzeHistoryRequest),
}

impl HistoryOp {
    /// Parses a raw envelope type + payload into a typed operation.
    pub fn parse(msg_type: &str, payload: Value) -> Result<Self> {
        let parsed = match msg_type {
            "fetch" => HistoryOp::Fetch(decode(payload)?),
            "save" => HistoryOp::Save(decode(payload)?),
            "analyze" => HistoryOp::Analyze(decode(payload)?),
            other => {
                return Err(MentorError::validation(format!(
                    "unknown history message type: {}",
                    other
                )));
            }
        };
        Ok(parsed)
    }
}

fn decode<T: serde::de::DeserializeOwned>(payload: Value) -> Result<T> {
    serde_json::from_value(payload)
        .map_err(|e| MentorError::validation(format!("invalid history payload: {}", e)))
}
