//! The hint role actor.
//!
//! Owns the `hints` collection. Hint explicitness escalates with
//! `min(difficultyLevel + hintsProvided, 5)`; the category is chosen by a
//! fixed priority (missing concept, inefficiency, missing edge case,
//! logical error, generic); and a text already served for a
//! (session, problem) pair is never served again — the stored hints are the
//! non-repetition memory.

use crate::analysis::{self, CodeProfile};
use crate::runtime::{Reply, RoleActor};
use async_trait::async_trait;
use mentor_core::error::{MentorError, Result};
use mentor_core::hint::{Hint, HintCategory, HintOp, ProvideHintRequest, RequestHintRequest};
use mentor_core::message::{ActorRole, Message};
use mentor_core::problem::CodingProblem;
use mentor_core::store::{Store, StoreExt, collections};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

pub struct HintActor {
    store: Arc<dyn Store>,
}

impl HintActor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Hints already served for this (session, problem) pair.
    async fn served_texts(&self, session_id: &str, problem_id: &str) -> Result<HashSet<String>> {
        let hints: Vec<Hint> = self.store.entities(collections::HINTS).await?;
        Ok(hints
            .into_iter()
            .filter(|h| h.session_id == session_id && h.problem_id == problem_id)
            .map(|h| h.text)
            .collect())
    }

    /// True when the submission shows no evidence of the technique the
    /// category tag names. Tags without a lexical marker return false.
    fn concept_missing(tag: &str, code_lower: &str, profile: &CodeProfile) -> bool {
        let has = |needles: &[&str]| needles.iter().any(|n| code_lower.contains(n));
        match tag {
            "hash-tables" => !profile.uses_hash_structure,
            "sorting" => !profile.uses_sort,
            "two-pointers" => !(has(&["left"]) && has(&["right"]) || has(&["lo"]) && has(&["hi"])),
            "stacks" => !(has(&["push", "append"]) && has(&["pop"])),
            "dynamic-programming" => !has(&["dp", "memo", "cache"]),
            "binary-search" | "divide-and-conquer" => !has(&["mid"]),
            "sliding-window" => !(has(&["window"]) || has(&["left"]) && has(&["right"])),
            "linked-lists" => !has(&["next"]),
            "graphs" | "topological-sort" => !has(&["visited", "graph", "adj"]),
            _ => false,
        }
    }

    /// Picks the hint category for this submission, in priority order.
    fn select_category(
        problem: &CodingProblem,
        code_lower: &str,
        profile: &CodeProfile,
    ) -> (HintCategory, Option<String>) {
        if let Some(tag) = problem
            .category
            .iter()
            .find(|tag| Self::concept_missing(tag, code_lower, profile))
        {
            return (HintCategory::MissingConcept, Some(tag.clone()));
        }

        let actual = analysis::estimate_time_complexity(profile);
        if analysis::complexity_rank(&actual) >
            analysis::complexity_rank(&problem.expected_time_complexity)
        {
            return (HintCategory::Inefficiency, None);
        }

        let (_, missed) = analysis::edge_case_classes(profile);
        if let Some(first_missed) = missed.into_iter().next() {
            return (HintCategory::MissingEdgeCase, Some(first_missed));
        }

        if profile.suspicious_conditions > 0 {
            return (HintCategory::LogicalError, None);
        }

        (HintCategory::Generic, None)
    }

    /// The text ladder for a category: index 0 is the gentlest nudge,
    /// index 4 spells the approach out.
    fn ladder(category: HintCategory, problem: &CodingProblem, concept: &str) -> Vec<String> {
        match category {
            HintCategory::MissingConcept => vec![
                format!("Think about which technique makes {} problems tractable.", concept),
                format!(
                    "\"{}\" is built around {} — your current approach doesn't seem to use it.",
                    problem.title, concept
                ),
                format!("Introduce {} so you stop re-scanning the input.", concept),
                format!(
                    "Restructure around {}: set up the supporting structure first, then solve \
                     in a single pass.",
                    concept
                ),
                format!(
                    "Concretely: build a {} over the input, then answer each step with one \
                     lookup instead of a nested scan.",
                    concept
                ),
            ],
            HintCategory::Inefficiency => vec![
                "Your solution works on the happy path — now think about how it scales.".to_string(),
                format!(
                    "The expected running time here is {}; count how often you touch each \
                     element.",
                    problem.expected_time_complexity
                ),
                "A nested scan over the same input usually signals the slow approach.".to_string(),
                format!(
                    "Replace the inner scan with a constant-time structure to reach {}.",
                    problem.expected_time_complexity
                ),
                format!(
                    "Step by step: do one pass, remembering what you've seen so each element \
                     is processed once — that's what {} demands.",
                    problem.expected_time_complexity
                ),
            ],
            HintCategory::MissingEdgeCase => vec![
                "What happens to your solution at the boundaries of the input?".to_string(),
                format!("Specifically: what does your code do for {}?", concept),
                format!("Add an explicit early check for {} before the main logic.", concept),
                format!(
                    "Guard the top of the function: handle {} and return the documented value \
                     for it.",
                    concept
                ),
                format!(
                    "Spelled out: the very first statements should detect {} and return \
                     immediately — only then run the main algorithm.",
                    concept
                ),
            ],
            HintCategory::LogicalError => vec![
                "Re-read your conditionals carefully — one of them doesn't do what it says.".to_string(),
                "Check each comparison: is anything assigning where it should compare?".to_string(),
                "Walk through the first loop iteration by hand and watch the condition values.".to_string(),
                "One of your branch conditions always (or never) fires — trace which one.".to_string(),
                "Spelled out: look at the condition with an `=` — it needs to be a comparison, \
                 and the loop needs a reachable exit."
                    .to_string(),
            ],
            HintCategory::Generic => vec![
                format!("Re-read the problem statement of \"{}\" and restate it in your own words.", problem.title),
                "Write out the expected result for the first example before coding further.".to_string(),
                format!(
                    "Focus on the expected complexity ({}) — it narrows which techniques apply.",
                    problem.expected_time_complexity
                ),
                "Solve a tiny input (2-3 elements) on paper, then generalize the steps.".to_string(),
                "Spelled out: write the brute force first, verify it on the examples, then \
                 optimize the slowest part."
                    .to_string(),
            ],
        }
    }

    /// A worked snippet, only for the most explicit hint levels.
    fn snippet(category: HintCategory, level: u8) -> Option<String> {
        if level < 4 {
            return None;
        }
        match category {
            HintCategory::MissingConcept | HintCategory::Inefficiency => Some(
                "seen = {}\nfor i, x in enumerate(items):\n    if complement(x) in seen:\n        return seen[complement(x)], i\n    seen[x] = i"
                    .to_string(),
            ),
            HintCategory::MissingEdgeCase => {
                Some("if not items:\n    return None".to_string())
            }
            _ => None,
        }
    }

    /// Picks the first ladder text at or above `level` not yet served;
    /// falls back through the other categories and finally to a numbered
    /// nudge so a fresh text always exists.
    fn select_text(
        level: u8,
        category: HintCategory,
        concept: &str,
        problem: &CodingProblem,
        served: &HashSet<String>,
    ) -> String {
        let start = usize::from(level.clamp(1, 5)) - 1;

        let preferred = Self::ladder(category, problem, concept);
        for text in preferred.iter().skip(start).chain(preferred.iter().take(start)) {
            if !served.contains(text) {
                return text.clone();
            }
        }

        for other in HintCategory::PRIORITY {
            if other == category {
                continue;
            }
            let ladder = Self::ladder(other, problem, concept);
            for text in ladder.iter().skip(start).chain(ladder.iter().take(start)) {
                if !served.contains(text) {
                    return text.clone();
                }
            }
        }

        // Every canned text used up; number the nudge to keep it fresh.
        format!(
            "Keep iterating on \"{}\" — review your last attempt once more (hint #{}).",
            problem.title,
            served.len() + 1
        )
    }

    async fn request(&self, request: RequestHintRequest) -> Result<Reply> {
        if !(1..=5).contains(&request.difficulty_level) {
            return Err(MentorError::validation(
                "difficultyLevel must be between 1 and 5",
            ));
        }

        let problem: CodingProblem = self
            .store
            .get_entity(collections::PROBLEMS, &request.problem_id)
            .await?
            .ok_or_else(|| MentorError::not_found("problem", &request.problem_id))?;

        let level = request.escalated_level();
        let profile = analysis::profile(&request.code, &request.language);
        let code_lower = request.code.to_ascii_lowercase();
        let (category, concept) = Self::select_category(&problem, &code_lower, &profile);
        let concept_name = concept.unwrap_or_else(|| {
            problem.category.first().cloned().unwrap_or_else(|| "the core idea".to_string())
        });

        let served = self
            .served_texts(&request.session_id, &request.problem_id)
            .await?;
        let text = Self::select_text(level, category, &concept_name, &problem, &served);
        debug!(
            problem_id = %request.problem_id,
            ?category,
            level,
            "hint selected"
        );

        let mut hint = Hint::new(&request.session_id, &request.problem_id, text, level)
            .with_concept(concept_name);
        if let Some(snippet) = Self::snippet(category, level) {
            hint = hint.with_snippet(snippet);
        }

        let stored = self.store.put_entity(collections::HINTS, &hint).await?;
        Reply::of("hint_provided", &stored)
    }

    async fn provide(&self, request: ProvideHintRequest) -> Result<Reply> {
        if !(1..=5).contains(&request.level) {
            return Err(MentorError::validation("level must be between 1 and 5"));
        }

        let problem: CodingProblem = self
            .store
            .get_entity(collections::PROBLEMS, &request.problem_id)
            .await?
            .ok_or_else(|| MentorError::not_found("problem", &request.problem_id))?;

        let concept = request
            .related_concept
            .clone()
            .or_else(|| problem.category.first().cloned())
            .unwrap_or_else(|| "the core idea".to_string());

        let served = self
            .served_texts(&request.session_id, &request.problem_id)
            .await?;
        let text = Self::select_text(
            request.level,
            HintCategory::MissingConcept,
            &concept,
            &problem,
            &served,
        );

        let hint = Hint::new(&request.session_id, &request.problem_id, text, request.level)
            .with_concept(concept);
        let stored = self.store.put_entity(collections::HINTS, &hint).await?;
        Reply::of("hint_provided", &stored)
    }
}

#[async_trait]
impl RoleActor for HintActor {
    fn role(&self) -> ActorRole {
        ActorRole::Hint
    }

    async fn handle(&self, message: &Message) -> Result<Reply> {
        match HintOp::parse(&message.msg_type, message.payload.clone())? {
            HintOp::Request(request) => self.request(request).await,
            HintOp::Provide(request) => self.provide(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_core::problem::seed_catalog;
    use mentor_infrastructure::MemoryStore;
    use serde_json::json;

    async fn actor_with_catalog() -> HintActor {
        let store = Arc::new(MemoryStore::new());
        for problem in seed_catalog() {
            store.put_entity(collections::PROBLEMS, &problem).await.unwrap();
        }
        HintActor::new(store)
    }

    fn hint_message(hints_provided: u8) -> Message {
        Message::request(
            "request",
            json!({
                "code": "for i in range(len(nums)):\n    for j in range(len(nums)):\n        pass",
                "language": "python",
                "problemId": "two-sum",
                "userId": "u1",
                "sessionId": "s1",
                "hintsProvided": hints_provided,
                "difficultyLevel": 1
            }),
        )
    }

    async fn request_hint(actor: &HintActor, hints_provided: u8) -> Hint {
        let reply = actor.handle(&hint_message(hints_provided)).await.unwrap();
        serde_json::from_value(reply.payload).unwrap()
    }

    #[tokio::test]
    async fn test_levels_are_non_decreasing() {
        let actor = actor_with_catalog().await;
        let first = request_hint(&actor, 0).await;
        let second = request_hint(&actor, 1).await;
        assert!(second.level >= first.level);
    }

    #[tokio::test]
    async fn test_hints_are_never_repeated() {
        let actor = actor_with_catalog().await;
        let mut seen = HashSet::new();
        for provided in 0..8 {
            let hint = request_hint(&actor, provided).await;
            assert!(seen.insert(hint.text.clone()), "repeated hint: {}", hint.text);
        }
    }

    #[tokio::test]
    async fn test_missing_concept_takes_priority() {
        // nested scan with no hash structure on a hash-table problem
        let actor = actor_with_catalog().await;
        let hint = request_hint(&actor, 0).await;
        assert_eq!(hint.related_concept.as_deref(), Some("hash-tables"));
    }

    #[tokio::test]
    async fn test_each_hint_is_appended() {
        let actor = actor_with_catalog().await;
        request_hint(&actor, 0).await;
        request_hint(&actor, 1).await;

        let stored: Vec<Hint> = actor.store.entities(collections::HINTS).await.unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_invalid_difficulty_rejected() {
        let actor = actor_with_catalog().await;
        let message = Message::request(
            "request",
            json!({
                "code": "",
                "language": "python",
                "problemId": "two-sum",
                "userId": "u1",
                "sessionId": "s1",
                "hintsProvided": 0,
                "difficultyLevel": 9
            }),
        );
        assert!(actor.handle(&message).await.unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_provide_returns_requested_level() {
        let actor = actor_with_catalog().await;
        let message = Message::request(
            "provide",
            json!({
                "problemId": "two-sum",
                "sessionId": "s1",
                "level": 4,
                "relatedConcept": "hash-tables"
            }),
        );
        let reply = actor.handle(&message).await.unwrap();
        let hint: Hint = serde_json::from_value(reply.payload).unwrap();
        assert_eq!(hint.level, 4);
        assert_eq!(hint.related_concept.as_deref(), Some("hash-tables"));
    }

    #[tokio::test]
    async fn test_unknown_problem_is_not_found() {
        let actor = actor_with_catalog().await;
        let message = Message::request(
            "provide",
            json!({"problemId": "ghost", "sessionId": "s1", "level": 1}),
        );
        assert!(actor.handle(&message).await.unwrap_err().is_not_found());
    }
}
