//! The study-plan role actor.
//!
//! Owns the `study_plans` collection. A plan is an aggregate over the
//! user's evaluations: bucketed per problem category, scored, and turned
//! into prioritized recommendations and time-boxed milestones. Plans are
//! regenerated whole and overwrite the user's previous plan.

use crate::runtime::{Reply, RoleActor};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use mentor_core::error::{MentorError, Result};
use mentor_core::evaluation::CodeEvaluation;
use mentor_core::message::{ActorRole, Message};
use mentor_core::problem::CodingProblem;
use mentor_core::store::{Store, StoreExt, collections};
use mentor_core::study_plan::{
    CategoryMetric, GenerateStudyPlanRequest, Milestone, PlanAnalysis, Recommendation, StudyPlan,
    StudyPlanOp,
};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// A category averaging at or above this counts as a strength.
const STRENGTH_THRESHOLD: f64 = 75.0;
/// A category averaging below this counts as a weakness.
const WEAKNESS_THRESHOLD: f64 = 50.0;
/// At most this many recommendations per plan.
const MAX_RECOMMENDATIONS: usize = 5;
/// At most this many milestones per plan.
const MAX_MILESTONES: usize = 3;

pub struct StudyPlanActor {
    store: Arc<dyn Store>,
}

impl StudyPlanActor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Evaluations for the user, optionally scoped to specific sessions.
    async fn evaluations_for(
        &self,
        request: &GenerateStudyPlanRequest,
    ) -> Result<Vec<CodeEvaluation>> {
        let all: Vec<CodeEvaluation> = self.store.entities(collections::EVALUATIONS).await?;
        Ok(all
            .into_iter()
            .filter(|e| e.user_id == request.user_id)
            .filter(|e| match &request.session_ids {
                Some(sessions) => sessions.contains(&e.session_id),
                None => true,
            })
            .collect())
    }

    /// Maps each evaluation onto its problem's categories ("general" when
    /// the problem is no longer resolvable) and rolls up per category.
    async fn metrics(&self, evaluations: &[CodeEvaluation]) -> Result<Vec<CategoryMetric>> {
        let problems: Vec<CodingProblem> = self.store.entities(collections::PROBLEMS).await?;

        // BTreeMap keeps metric ordering stable across runs.
        let mut buckets: BTreeMap<String, Vec<&CodeEvaluation>> = BTreeMap::new();
        for evaluation in evaluations {
            let categories = problems
                .iter()
                .find(|p| p.id == evaluation.problem_id)
                .map(|p| p.category.clone())
                .unwrap_or_else(|| vec!["general".to_string()]);
            for category in categories {
                buckets.entry(category).or_default().push(evaluation);
            }
        }

        let metrics = buckets
            .into_iter()
            .map(|(category, bucket)| {
                let attempts = bucket.len();
                let mean = |f: fn(&CodeEvaluation) -> f64| {
                    bucket.iter().map(|e| f(e)).sum::<f64>() / attempts.max(1) as f64
                };

                let facets = [
                    ("correctness", mean(|e| e.correctness)),
                    ("time complexity", mean(|e| e.time_complexity.score)),
                    ("space complexity", mean(|e| e.space_complexity.score)),
                    ("edge cases", mean(|e| e.edge_cases.score)),
                    ("code quality", mean(|e| e.code_quality.average())),
                ];
                let strengths = facets
                    .iter()
                    .filter(|(_, score)| *score >= STRENGTH_THRESHOLD)
                    .map(|(name, _)| name.to_string())
                    .collect();
                let weaknesses = facets
                    .iter()
                    .filter(|(_, score)| *score < WEAKNESS_THRESHOLD)
                    .map(|(name, _)| name.to_string())
                    .collect();

                CategoryMetric {
                    category,
                    average_score: mean(|e| e.overall_score),
                    attempts,
                    strengths,
                    weaknesses,
                }
            })
            .collect();
        Ok(metrics)
    }

    fn recommendations(metrics: &[CategoryMetric]) -> Vec<Recommendation> {
        // Weakest categories first; they get the most urgent priorities.
        let mut ranked: Vec<&CategoryMetric> = metrics.iter().collect();
        ranked.sort_by(|a, b| {
            a.average_score
                .partial_cmp(&b.average_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        ranked
            .into_iter()
            .take(MAX_RECOMMENDATIONS)
            .enumerate()
            .map(|(index, metric)| {
                let action = match metric.weaknesses.first() {
                    Some(facet) => format!(
                        "Drill {} problems with a focus on {}.",
                        metric.category, facet
                    ),
                    None if metric.average_score < STRENGTH_THRESHOLD => format!(
                        "Increase difficulty gradually in {} to push past {:.0}.",
                        metric.category, metric.average_score
                    ),
                    None => format!(
                        "Keep {} sharp with an occasional timed exercise.",
                        metric.category
                    ),
                };
                Recommendation {
                    priority: (index as u8 + 1).min(5),
                    category: metric.category.clone(),
                    action,
                }
            })
            .collect()
    }

    fn milestones(metrics: &[CategoryMetric]) -> Vec<Milestone> {
        let mut ranked: Vec<&CategoryMetric> = metrics.iter().collect();
        ranked.sort_by(|a, b| {
            a.average_score
                .partial_cmp(&b.average_score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let now = Utc::now();
        ranked
            .into_iter()
            .take(MAX_MILESTONES)
            .enumerate()
            .map(|(index, metric)| Milestone {
                title: format!("Lift {} above {:.0}", metric.category, STRENGTH_THRESHOLD),
                description: format!(
                    "Currently averaging {:.0} over {} attempt(s); solve three more {} \
                     problems and re-run the plan.",
                    metric.average_score, metric.attempts, metric.category
                ),
                target_date: now + Duration::days(7 * (index as i64 + 1)),
                categories: vec![metric.category.clone()],
            })
            .collect()
    }

    async fn build_plan(&self, request: &GenerateStudyPlanRequest) -> Result<StudyPlan> {
        let evaluations = self.evaluations_for(request).await?;
        let metrics = self.metrics(&evaluations).await?;

        Ok(StudyPlan {
            id: request.user_id.clone(),
            user_id: request.user_id.clone(),
            recommendations: Self::recommendations(&metrics),
            milestones: Self::milestones(&metrics),
            metrics,
            generated_at: Utc::now(),
        })
    }

    async fn persist_plan(&self, plan: &StudyPlan) -> Result<StudyPlan> {
        let stored = self.store.put_entity(collections::STUDY_PLANS, plan).await?;
        info!(user_id = %stored.user_id, metrics = stored.metrics.len(), "study plan persisted");
        Ok(stored)
    }

    async fn analyze(&self, request: GenerateStudyPlanRequest) -> Result<Reply> {
        let evaluations = self.evaluations_for(&request).await?;
        let metrics = self.metrics(&evaluations).await?;

        let strengths = metrics
            .iter()
            .filter(|m| m.average_score >= STRENGTH_THRESHOLD)
            .map(|m| m.category.clone())
            .collect();
        let weaknesses = metrics
            .iter()
            .filter(|m| m.average_score < WEAKNESS_THRESHOLD)
            .map(|m| m.category.clone())
            .collect();

        Reply::of(
            "plan_analysis",
            &PlanAnalysis {
                user_id: request.user_id,
                metrics,
                strengths,
                weaknesses,
                evaluations_analyzed: evaluations.len(),
            },
        )
    }

    async fn generate(&self, request: GenerateStudyPlanRequest) -> Result<Reply> {
        let plan = self.build_plan(&request).await?;
        let stored = self.persist_plan(&plan).await?;
        Reply::of("study_plan", &stored)
    }

    async fn update(&self, request: GenerateStudyPlanRequest) -> Result<Reply> {
        // `update` refreshes an existing plan; it never creates the first one.
        let existing: Option<StudyPlan> = self
            .store
            .get_entity(collections::STUDY_PLANS, &request.user_id)
            .await?;
        if existing.is_none() {
            return Err(MentorError::not_found("study plan", &request.user_id));
        }

        let plan = self.build_plan(&request).await?;
        let stored = self.persist_plan(&plan).await?;
        Reply::of("study_plan", &stored)
    }
}

#[async_trait]
impl RoleActor for StudyPlanActor {
    fn role(&self) -> ActorRole {
        ActorRole::StudyPlan
    }

    async fn handle(&self, message: &Message) -> Result<Reply> {
        match StudyPlanOp::parse(&message.msg_type, message.payload.clone())? {
            StudyPlanOp::Analyze(request) => self.analyze(request).await,
            StudyPlanOp::Generate(request) => self.generate(request).await,
            StudyPlanOp::Update(request) => self.update(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_core::evaluation::{CodeQualityScores, ComplexityAssessment, EdgeCaseCoverage};
    use mentor_core::problem::seed_catalog;
    use mentor_infrastructure::MemoryStore;
    use serde_json::json;

    fn evaluation(user: &str, session: &str, problem: &str, score: f64) -> CodeEvaluation {
        CodeEvaluation {
            id: uuid::Uuid::new_v4().to_string(),
            user_id: user.to_string(),
            problem_id: problem.to_string(),
            session_id: session.to_string(),
            code: format!("code-{}", score),
            language: "python".to_string(),
            correctness: score,
            time_complexity: ComplexityAssessment {
                actual: "O(n)".to_string(),
                expected: "O(n)".to_string(),
                score,
            },
            space_complexity: ComplexityAssessment {
                actual: "O(1)".to_string(),
                expected: "O(n)".to_string(),
                score,
            },
            edge_cases: EdgeCaseCoverage {
                covered: vec![],
                missed: vec![],
                score,
            },
            code_quality: CodeQualityScores {
                readability: score,
                maintainability: score,
                best_practices: score,
            },
            overall_score: score,
            feedback: String::new(),
            suggestions: vec![],
            evaluated_at: Utc::now(),
        }
    }

    async fn seeded_actor() -> StudyPlanActor {
        let store = Arc::new(MemoryStore::new());
        for problem in seed_catalog() {
            store.put_entity(collections::PROBLEMS, &problem).await.unwrap();
        }
        StudyPlanActor::new(store)
    }

    #[tokio::test]
    async fn test_generate_buckets_by_problem_category() {
        let actor = seeded_actor().await;
        // two-sum is tagged arrays + hash-tables
        actor
            .store
            .put_entity(collections::EVALUATIONS, &evaluation("u1", "s1", "two-sum", 40.0))
            .await
            .unwrap();

        let reply = actor
            .handle(&Message::request("generate", json!({"userId": "u1"})))
            .await
            .unwrap();
        let plan: StudyPlan = serde_json::from_value(reply.payload).unwrap();

        let categories: Vec<&str> = plan.metrics.iter().map(|m| m.category.as_str()).collect();
        assert!(categories.contains(&"arrays"));
        assert!(categories.contains(&"hash-tables"));
        assert!(!plan.recommendations.is_empty());
        assert_eq!(plan.recommendations[0].priority, 1);
    }

    #[tokio::test]
    async fn test_generate_overwrites_previous_plan() {
        let actor = seeded_actor().await;
        actor
            .store
            .put_entity(collections::EVALUATIONS, &evaluation("u1", "s1", "two-sum", 55.0))
            .await
            .unwrap();

        for _ in 0..2 {
            actor
                .handle(&Message::request("generate", json!({"userId": "u1"})))
                .await
                .unwrap();
        }

        let plans: Vec<StudyPlan> = actor.store.entities(collections::STUDY_PLANS).await.unwrap();
        assert_eq!(plans.len(), 1);
        assert_eq!(plans[0].id, "u1");
    }

    #[tokio::test]
    async fn test_session_scope_filters_evaluations() {
        let actor = seeded_actor().await;
        actor
            .store
            .put_entity(collections::EVALUATIONS, &evaluation("u1", "s1", "two-sum", 90.0))
            .await
            .unwrap();
        actor
            .store
            .put_entity(collections::EVALUATIONS, &evaluation("u1", "s2", "two-sum", 10.0))
            .await
            .unwrap();

        let reply = actor
            .handle(&Message::request(
                "analyze",
                json!({"userId": "u1", "sessionIds": ["s1"]}),
            ))
            .await
            .unwrap();
        let analysis: PlanAnalysis = serde_json::from_value(reply.payload).unwrap();
        assert_eq!(analysis.evaluations_analyzed, 1);
        assert!(analysis.strengths.contains(&"arrays".to_string()));
    }

    #[tokio::test]
    async fn test_update_without_plan_is_not_found() {
        let actor = seeded_actor().await;
        let err = actor
            .handle(&Message::request("update", json!({"userId": "nobody"})))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_milestones_are_time_boxed_and_ordered() {
        let actor = seeded_actor().await;
        actor
            .store
            .put_entity(collections::EVALUATIONS, &evaluation("u1", "s1", "two-sum", 30.0))
            .await
            .unwrap();
        actor
            .store
            .put_entity(
                collections::EVALUATIONS,
                &evaluation("u1", "s1", "merge-intervals", 45.0),
            )
            .await
            .unwrap();

        let reply = actor
            .handle(&Message::request("generate", json!({"userId": "u1"})))
            .await
            .unwrap();
        let plan: StudyPlan = serde_json::from_value(reply.payload).unwrap();

        assert!(!plan.milestones.is_empty());
        assert!(plan.milestones.len() <= MAX_MILESTONES);
        for pair in plan.milestones.windows(2) {
            assert!(pair[0].target_date < pair[1].target_date);
        }
        for milestone in &plan.milestones {
            assert!(milestone.target_date > plan.generated_at);
        }
    }
}
