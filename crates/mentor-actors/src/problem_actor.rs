//! The problem role actor.
//!
//! Owns the `problems` and `problem_usage` collections. The catalog is
//! seeded on the first read that finds it empty; a request nothing in the
//! catalog matches is answered with a synthesized problem rather than an
//! error — that fallback is policy, not a failure path.

use crate::runtime::{Reply, RoleActor};
use async_trait::async_trait;
use mentor_core::error::{MentorError, Result};
use mentor_core::message::{ActorRole, Message};
use mentor_core::problem::{
    CodingProblem, Difficulty, FilterProblemsRequest, ProblemList, ProblemOp, ProblemSuggestions,
    ProblemUsage, ProvideProblemRequest, RequestProblemRequest, SuggestProblemsRequest,
    seed_catalog,
};
use mentor_core::store::{Store, StoreExt, collections};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// How many candidates `suggest` returns at most.
const SUGGESTION_LIMIT: usize = 3;

pub struct ProblemActor {
    store: Arc<dyn Store>,
    /// Injectable random source so tests can pin selection
    rng: Mutex<StdRng>,
}

impl ProblemActor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates an actor with a deterministic random source.
    pub fn with_seed(store: Arc<dyn Store>, seed: u64) -> Self {
        Self {
            store,
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Loads the catalog, seeding the built-in problems when it is empty.
    async fn catalog(&self) -> Result<Vec<CodingProblem>> {
        let stored: Vec<CodingProblem> = self.store.entities(collections::PROBLEMS).await?;
        if !stored.is_empty() {
            return Ok(stored);
        }

        info!("problem catalog empty, seeding built-in problems");
        let seeded = seed_catalog();
        for problem in &seeded {
            self.store.put_entity(collections::PROBLEMS, problem).await?;
        }
        Ok(seeded)
    }

    fn filter_catalog(
        catalog: Vec<CodingProblem>,
        difficulty: Option<Difficulty>,
        category: Option<&Vec<String>>,
    ) -> Vec<CodingProblem> {
        catalog
            .into_iter()
            .filter(|p| p.matches(difficulty, category.map(|c| c.as_slice())))
            .collect()
    }

    /// Builds (and persists) a generic problem for a request the catalog
    /// cannot satisfy, so later lookups by id still resolve.
    async fn synthesize(
        &self,
        difficulty: Option<Difficulty>,
        category: Option<Vec<String>>,
    ) -> Result<CodingProblem> {
        let difficulty = difficulty.unwrap_or(Difficulty::Medium);
        let category = category
            .filter(|tags| !tags.is_empty())
            .unwrap_or_else(|| vec!["general".to_string()]);
        let topic = category.join(", ");

        let problem = CodingProblem {
            id: uuid::Uuid::new_v4().to_string(),
            title: format!("Practice exercise: {}", topic),
            description: format!(
                "Write a function that solves a typical {} task of your choice and walk \
                 through its behavior on at least two inputs, including one edge case.",
                topic
            ),
            difficulty,
            category,
            examples: Vec::new(),
            expected_time_complexity: "O(n)".to_string(),
            expected_space_complexity: "O(n)".to_string(),
            constraints: Vec::new(),
            generated: true,
        };

        let stored = self.store.put_entity(collections::PROBLEMS, &problem).await?;
        debug!(problem_id = %stored.id, "synthesized problem persisted");
        Ok(stored)
    }

    async fn track_usage(&self, problem_id: &str, user_id: &str, session_id: &str) -> Result<()> {
        let usage = ProblemUsage::new(problem_id, user_id, session_id);
        self.store
            .put_entity(collections::PROBLEM_USAGE, &usage)
            .await?;
        Ok(())
    }

    async fn request(&self, request: RequestProblemRequest) -> Result<Reply> {
        let catalog = self.catalog().await?;
        let matches =
            Self::filter_catalog(catalog, request.difficulty, request.category.as_ref());

        let problem = if matches.is_empty() {
            self.synthesize(request.difficulty, request.category).await?
        } else {
            let index = {
                let mut rng = self.rng.lock().await;
                rng.gen_range(0..matches.len())
            };
            matches
                .into_iter()
                .nth(index)
                .ok_or_else(|| MentorError::internal("selection index out of range"))?
        };

        self.track_usage(&problem.id, &request.user_id, &request.session_id)
            .await?;
        Reply::of("problem_provided", &problem)
    }

    async fn provide(&self, request: ProvideProblemRequest) -> Result<Reply> {
        // Make sure the seed exists even when `provide` is the first call.
        self.catalog().await?;

        let problem: CodingProblem = self
            .store
            .get_entity(collections::PROBLEMS, &request.problem_id)
            .await?
            .ok_or_else(|| MentorError::not_found("problem", &request.problem_id))?;

        if let (Some(user_id), Some(session_id)) = (&request.user_id, &request.session_id) {
            self.track_usage(&problem.id, user_id, session_id).await?;
        }
        Reply::of("problem_provided", &problem)
    }

    async fn suggest(&self, request: SuggestProblemsRequest) -> Result<Reply> {
        let catalog = self.catalog().await?;
        let mut matches =
            Self::filter_catalog(catalog, request.difficulty, request.category.as_ref());

        {
            let mut rng = self.rng.lock().await;
            matches.shuffle(&mut *rng);
        }
        matches.truncate(SUGGESTION_LIMIT);

        Reply::of("problem_suggestions", &ProblemSuggestions { problems: matches })
    }

    async fn filter(&self, request: FilterProblemsRequest) -> Result<Reply> {
        let catalog = self.catalog().await?;
        let matches =
            Self::filter_catalog(catalog, request.difficulty, request.category.as_ref());
        Reply::of("problem_list", &ProblemList { problems: matches })
    }
}

#[async_trait]
impl RoleActor for ProblemActor {
    fn role(&self) -> ActorRole {
        ActorRole::Problem
    }

    async fn handle(&self, message: &Message) -> Result<Reply> {
        match ProblemOp::parse(&message.msg_type, message.payload.clone())? {
            ProblemOp::Request(request) => self.request(request).await,
            ProblemOp::Provide(request) => self.provide(request).await,
            ProblemOp::Suggest(request) => self.suggest(request).await,
            ProblemOp::Filter(request) => self.filter(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_infrastructure::MemoryStore;
    use serde_json::json;

    fn actor() -> ProblemActor {
        ProblemActor::with_seed(Arc::new(MemoryStore::new()), 7)
    }

    #[tokio::test]
    async fn test_request_seeds_catalog_and_matches_difficulty() {
        let actor = actor();
        let message = Message::request(
            "request",
            json!({"userId": "u1", "sessionId": "s1", "difficulty": "easy"}),
        );
        let reply = actor.handle(&message).await.unwrap();
        let problem: CodingProblem = serde_json::from_value(reply.payload).unwrap();
        assert_eq!(problem.difficulty, Difficulty::Easy);
        assert!(!problem.generated);

        // catalog was seeded into the store
        let stored: Vec<CodingProblem> =
            actor.store.entities(collections::PROBLEMS).await.unwrap();
        assert!(!stored.is_empty());
    }

    #[tokio::test]
    async fn test_request_tracks_usage() {
        let actor = actor();
        let message = Message::request("request", json!({"userId": "u1", "sessionId": "s1"}));
        actor.handle(&message).await.unwrap();

        let usage: Vec<ProblemUsage> =
            actor.store.entities(collections::PROBLEM_USAGE).await.unwrap();
        assert_eq!(usage.len(), 1);
        assert_eq!(usage[0].user_id, "u1");
        assert_eq!(usage[0].session_id, "s1");
    }

    #[tokio::test]
    async fn test_no_match_synthesizes_instead_of_failing() {
        let actor = actor();
        let message = Message::request(
            "request",
            json!({
                "userId": "u1",
                "sessionId": "s1",
                "category": ["quantum-annealing"]
            }),
        );
        let reply = actor.handle(&message).await.unwrap();
        let problem: CodingProblem = serde_json::from_value(reply.payload).unwrap();
        assert!(problem.generated);
        assert_eq!(problem.category, vec!["quantum-annealing".to_string()]);

        // the synthesized problem is persisted, so provide-by-id resolves
        let by_id: Option<CodingProblem> = actor
            .store
            .get_entity(collections::PROBLEMS, &problem.id)
            .await
            .unwrap();
        assert!(by_id.is_some());
    }

    #[tokio::test]
    async fn test_provide_unknown_id_is_not_found() {
        let actor = actor();
        let message = Message::request("provide", json!({"problemId": "ghost"}));
        let err = actor.handle(&message).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_suggest_caps_at_three() {
        let actor = actor();
        let message = Message::request("suggest", json!({"userId": "u1", "sessionId": "s1"}));
        let reply = actor.handle(&message).await.unwrap();
        let suggestions: ProblemSuggestions = serde_json::from_value(reply.payload).unwrap();
        assert!(suggestions.problems.len() <= 3);
        assert!(!suggestions.problems.is_empty());
    }

    #[tokio::test]
    async fn test_filter_returns_all_matches_without_usage() {
        let actor = actor();
        let message = Message::request("filter", json!({"difficulty": "easy"}));
        let reply = actor.handle(&message).await.unwrap();
        let list: ProblemList = serde_json::from_value(reply.payload).unwrap();
        assert!(list.problems.iter().all(|p| p.difficulty == Difficulty::Easy));
        assert!(list.problems.len() > 1);

        let usage: Vec<ProblemUsage> =
            actor.store.entities(collections::PROBLEM_USAGE).await.unwrap();
        assert!(usage.is_empty());
    }
}
