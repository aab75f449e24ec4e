//! Hint domain models.
//!
//! Every hint request appends one new hint record; prior hints are never
//! mutated. The stored records double as the non-repetition memory for a
//! (session, problem) pair.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The hint categories, in selection priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HintCategory {
    /// The submission appears to lack the problem's core concept
    MissingConcept,
    /// The approach works but is asymptotically worse than expected
    Inefficiency,
    /// An edge-case class is unhandled
    MissingEdgeCase,
    /// Control flow looks wrong (e.g. suspicious comparisons)
    LogicalError,
    /// Nothing specific detected; nudge forward generically
    Generic,
}

impl HintCategory {
    /// Categories in the order the selector tries them.
    pub const PRIORITY: [HintCategory; 5] = [
        HintCategory::MissingConcept,
        HintCategory::Inefficiency,
        HintCategory::MissingEdgeCase,
        HintCategory::LogicalError,
        HintCategory::Generic,
    ];
}

/// A hint served to a learner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hint {
    pub id: String,
    pub session_id: String,
    pub problem_id: String,
    pub text: String,
    /// Explicitness, 1 (gentle nudge) to 5 (spells it out)
    pub level: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related_concept: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Hint {
    pub fn new(
        session_id: impl Into<String>,
        problem_id: impl Into<String>,
        text: impl Into<String>,
        level: u8,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.into(),
            problem_id: problem_id.into(),
            text: text.into(),
            level: level.clamp(1, 5),
            related_concept: None,
            code_snippet: None,
            created_at: Utc::now(),
        }
    }

    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.related_concept = Some(concept.into());
        self
    }

    pub fn with_snippet(mut self, snippet: impl Into<String>) -> Self {
        self.code_snippet = Some(snippet.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_is_clamped() {
        assert_eq!(Hint::new("s1", "p1", "try a map", 9).level, 5);
        assert_eq!(Hint::new("s1", "p1", "try a map", 0).level, 1);
    }

    #[test]
    fn test_priority_starts_with_missing_concept() {
        assert_eq!(HintCategory::PRIORITY[0], HintCategory::MissingConcept);
        assert_eq!(HintCategory::PRIORITY[4], HintCategory::Generic);
    }

    #[test]
    fn test_builder_helpers() {
        let hint = Hint::new("s1", "p1", "use two pointers", 2)
            .with_concept("two-pointers")
            .with_snippet("let mut lo = 0;");
        assert_eq!(hint.related_concept.as_deref(), Some("two-pointers"));
        assert!(hint.code_snippet.is_some());
    }
}
