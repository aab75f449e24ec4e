//! Code evaluation domain models.
//!
//! An evaluation is a derived scoring record: written once per evaluate
//! request, never mutated afterwards, and cross-referenced by
//! (userId, problemId, code).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Estimated complexity versus the problem's expected complexity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplexityAssessment {
    /// Complexity the analysis estimated from the submission (e.g. "O(n^2)")
    pub actual: String,
    /// Complexity the problem expects (e.g. "O(n)")
    pub expected: String,
    /// 0-100, full marks when actual meets or beats expected
    pub score: f64,
}

/// Which edge cases the submission appears to handle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeCaseCoverage {
    pub covered: Vec<String>,
    pub missed: Vec<String>,
    /// 0-100, share of the checked edge-case classes covered
    pub score: f64,
}

/// Code quality facets, each 0-100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeQualityScores {
    pub readability: f64,
    pub maintainability: f64,
    pub best_practices: f64,
}

impl CodeQualityScores {
    /// Unweighted mean of the three facets.
    pub fn average(&self) -> f64 {
        (self.readability + self.maintainability + self.best_practices) / 3.0
    }
}

/// The persisted scoring record for one code submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeEvaluation {
    pub id: String,
    pub user_id: String,
    pub problem_id: String,
    pub session_id: String,
    /// The evaluated submission, verbatim (reuse key together with user and
    /// problem)
    pub code: String,
    pub language: String,
    /// 0-100
    pub correctness: f64,
    pub time_complexity: ComplexityAssessment,
    pub space_complexity: ComplexityAssessment,
    pub edge_cases: EdgeCaseCoverage,
    pub code_quality: CodeQualityScores,
    /// Weighted combination of the sub-scores, 0-100
    pub overall_score: f64,
    pub feedback: String,
    pub suggestions: Vec<String>,
    pub evaluated_at: DateTime<Utc>,
}

impl CodeEvaluation {
    /// Generates the record id for a fresh evaluation.
    pub fn generate_id() -> String {
        Uuid::new_v4().to_string()
    }

    /// True when this record evaluates the same submission.
    pub fn matches_submission(&self, user_id: &str, problem_id: &str, code: &str) -> bool {
        self.user_id == user_id && self.problem_id == problem_id && self.code == code
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_average() {
        let quality = CodeQualityScores {
            readability: 90.0,
            maintainability: 60.0,
            best_practices: 30.0,
        };
        assert!((quality.average() - 60.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_matches_submission_is_exact() {
        let eval = CodeEvaluation {
            id: "e-1".to_string(),
            user_id: "u1".to_string(),
            problem_id: "two-sum".to_string(),
            session_id: "s1".to_string(),
            code: "fn main() {}".to_string(),
            language: "rust".to_string(),
            correctness: 80.0,
            time_complexity: ComplexityAssessment {
                actual: "O(n)".to_string(),
                expected: "O(n)".to_string(),
                score: 100.0,
            },
            space_complexity: ComplexityAssessment {
                actual: "O(1)".to_string(),
                expected: "O(n)".to_string(),
                score: 100.0,
            },
            edge_cases: EdgeCaseCoverage {
                covered: vec![],
                missed: vec![],
                score: 50.0,
            },
            code_quality: CodeQualityScores {
                readability: 70.0,
                maintainability: 70.0,
                best_practices: 70.0,
            },
            overall_score: 75.0,
            feedback: String::new(),
            suggestions: vec![],
            evaluated_at: Utc::now(),
        };
        assert!(eval.matches_submission("u1", "two-sum", "fn main() {}"));
        assert!(!eval.matches_submission("u1", "two-sum", "fn main() { }"));
    }
}
