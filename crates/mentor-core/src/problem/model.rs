//! Coding problem domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Problem difficulty rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Numeric level used by the hint escalation formula (1-3).
    pub fn level(&self) -> u8 {
        match self {
            Difficulty::Easy => 1,
            Difficulty::Medium => 2,
            Difficulty::Hard => 3,
        }
    }
}

/// A worked example attached to a problem statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemExample {
    pub input: String,
    pub output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A catalog entry the problem actor can serve to learners.
///
/// Catalog entries come from the built-in seed or are synthesized on demand
/// when no stored problem matches a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingProblem {
    pub id: String,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    /// Category tags (e.g. "arrays", "dynamic-programming")
    pub category: Vec<String>,
    #[serde(default)]
    pub examples: Vec<ProblemExample>,
    pub expected_time_complexity: String,
    pub expected_space_complexity: String,
    #[serde(default)]
    pub constraints: Vec<String>,
    /// True for problems synthesized because the catalog had no match
    #[serde(default)]
    pub generated: bool,
}

impl CodingProblem {
    /// True when the problem matches an optional difficulty and optional
    /// category filter (any shared tag counts as a category match).
    pub fn matches(&self, difficulty: Option<Difficulty>, categories: Option<&[String]>) -> bool {
        if let Some(wanted) = difficulty {
            if self.difficulty != wanted {
                return false;
            }
        }
        match categories {
            Some(tags) if !tags.is_empty() => tags
                .iter()
                .any(|tag| self.category.iter().any(|c| c.eq_ignore_ascii_case(tag))),
            _ => true,
        }
    }
}

/// One served-problem event, tracked per (problem, user, session).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemUsage {
    pub id: String,
    pub problem_id: String,
    pub user_id: String,
    pub session_id: String,
    pub used_at: DateTime<Utc>,
}

impl ProblemUsage {
    pub fn new(
        problem_id: impl Into<String>,
        user_id: impl Into<String>,
        session_id: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            problem_id: problem_id.into(),
            user_id: user_id.into(),
            session_id: session_id.into(),
            used_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(difficulty: Difficulty, tags: &[&str]) -> CodingProblem {
        CodingProblem {
            id: "p-1".to_string(),
            title: "Test".to_string(),
            description: String::new(),
            difficulty,
            category: tags.iter().map(|t| t.to_string()).collect(),
            examples: vec![],
            expected_time_complexity: "O(n)".to_string(),
            expected_space_complexity: "O(1)".to_string(),
            constraints: vec![],
            generated: false,
        }
    }

    #[test]
    fn test_matches_difficulty() {
        let p = problem(Difficulty::Easy, &["arrays"]);
        assert!(p.matches(Some(Difficulty::Easy), None));
        assert!(!p.matches(Some(Difficulty::Hard), None));
    }

    #[test]
    fn test_matches_any_category_tag() {
        let p = problem(Difficulty::Medium, &["arrays", "sorting"]);
        assert!(p.matches(None, Some(&["Sorting".to_string()])));
        assert!(!p.matches(None, Some(&["graphs".to_string()])));
    }

    #[test]
    fn test_empty_category_filter_matches_all() {
        let p = problem(Difficulty::Medium, &["arrays"]);
        assert!(p.matches(None, Some(&[])));
        assert!(p.matches(None, None));
    }

    #[test]
    fn test_difficulty_levels() {
        assert_eq!(Difficulty::Easy.level(), 1);
        assert_eq!(Difficulty::Hard.level(), 3);
    }
}
