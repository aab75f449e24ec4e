//! Study plan domain models.
//!
//! A study plan is an aggregate over a user's evaluations. It is always
//! regenerated from scratch — never incrementally patched — and persisted
//! with the user's id so the newest plan overwrites the previous one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Per-category performance rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryMetric {
    pub category: String,
    /// Mean overall score across the category's evaluations, 0-100
    pub average_score: f64,
    pub attempts: usize,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
}

/// One prioritized recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// 1 = most urgent, 5 = least
    pub priority: u8,
    pub category: String,
    pub action: String,
}

/// A time-boxed milestone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub title: String,
    pub description: String,
    pub target_date: DateTime<Utc>,
    pub categories: Vec<String>,
}

/// The persisted study plan, one per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlan {
    /// Equals the user id, so a regenerated plan overwrites the prior one
    pub id: String,
    pub user_id: String,
    pub metrics: Vec<CategoryMetric>,
    pub recommendations: Vec<Recommendation>,
    pub milestones: Vec<Milestone>,
    pub generated_at: DateTime<Utc>,
}

/// Reply payload for `analyze` — the metrics without a persisted plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanAnalysis {
    pub user_id: String,
    pub metrics: Vec<CategoryMetric>,
    /// Categories averaging at or above the strength threshold
    pub strengths: Vec<String>,
    /// Categories averaging below the weakness threshold
    pub weaknesses: Vec<String>,
    pub evaluations_analyzed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_wire_shape() {
        let plan = StudyPlan {
            id: "u1".to_string(),
            user_id: "u1".to_string(),
            metrics: vec![],
            recommendations: vec![Recommendation {
                priority: 1,
                category: "arrays".to_string(),
                action: "Practice two-pointer scans".to_string(),
            }],
            milestones: vec![],
            generated_at: Utc::now(),
        };
        let wire = serde_json::to_value(&plan).unwrap();
        assert_eq!(wire["userId"], "u1");
        assert_eq!(wire["recommendations"][0]["priority"], 1);
        assert!(wire["generatedAt"].is_string());
    }
}
