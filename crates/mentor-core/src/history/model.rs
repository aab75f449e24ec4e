//! Session history domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One attempted problem inside a session rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemAttempt {
    pub problem_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub overall_score: f64,
    pub evaluated_at: DateTime<Utc>,
}

/// Per-session rollup of problems attempted and their evaluations.
///
/// Keyed by the session id, so re-saving a session replaces its rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionHistory {
    /// Equals the session id
    pub id: String,
    pub session_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub problems_attempted: Vec<ProblemAttempt>,
    /// Mean overall score across the session's evaluations, 0 when none
    pub average_score: f64,
}

/// Direction of a user's score progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Trend {
    Improving,
    Declining,
    Steady,
}

/// Reply payload for history `analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryAnalysis {
    pub user_id: String,
    pub trend: Trend,
    pub top_strengths: Vec<String>,
    pub top_weaknesses: Vec<String>,
    pub sessions_analyzed: usize,
}
