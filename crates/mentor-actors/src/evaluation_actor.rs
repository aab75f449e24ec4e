//! The evaluation role actor.
//!
//! Owns the `evaluations` collection. Every `evaluate` produces one
//! immutable scoring record; `feedback` and `improve` reuse a prior record
//! for the same (user, problem, code) submission when one exists, and fall
//! back to computing a fresh one otherwise.

use crate::analysis;
use crate::runtime::{Reply, RoleActor};
use async_trait::async_trait;
use chrono::Utc;
use mentor_core::error::{MentorError, Result};
use mentor_core::evaluation::{
    CodeEvaluation, CodeQualityScores, ComplexityAssessment, EdgeCaseCoverage,
    EvaluateCodeRequest, EvaluationOp, FeedbackResult, ImprovementAction, ImprovementResult,
};
use mentor_core::message::{ActorRole, Message};
use mentor_core::problem::CodingProblem;
use mentor_core::store::{Store, StoreExt, collections};
use std::sync::Arc;
use tracing::{debug, info};

/// Weights combining the sub-scores into the overall score.
const WEIGHT_CORRECTNESS: f64 = 0.35;
const WEIGHT_TIME: f64 = 0.15;
const WEIGHT_SPACE: f64 = 0.10;
const WEIGHT_EDGE_CASES: f64 = 0.15;
const WEIGHT_QUALITY: f64 = 0.25;

pub struct EvaluationActor {
    store: Arc<dyn Store>,
}

impl EvaluationActor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Finds a stored evaluation for the exact same submission.
    async fn find_existing(&self, request: &EvaluateCodeRequest) -> Result<Option<CodeEvaluation>> {
        let evaluations: Vec<CodeEvaluation> =
            self.store.entities(collections::EVALUATIONS).await?;
        Ok(evaluations.into_iter().find(|e| {
            e.matches_submission(&request.user_id, &request.problem_id, &request.code)
        }))
    }

    /// Computes and persists a fresh evaluation record.
    async fn evaluate(&self, request: &EvaluateCodeRequest) -> Result<CodeEvaluation> {
        if request.code.trim().is_empty() {
            return Err(MentorError::validation("code must not be empty"));
        }

        let problem: CodingProblem = self
            .store
            .get_entity(collections::PROBLEMS, &request.problem_id)
            .await?
            .ok_or_else(|| MentorError::not_found("problem", &request.problem_id))?;

        let profile = analysis::profile(&request.code, &request.language);

        let actual_time = analysis::estimate_time_complexity(&profile);
        let actual_space = analysis::estimate_space_complexity(&profile);
        let time_complexity = ComplexityAssessment {
            score: analysis::complexity_score(&actual_time, &problem.expected_time_complexity),
            actual: actual_time,
            expected: problem.expected_time_complexity.clone(),
        };
        let space_complexity = ComplexityAssessment {
            score: analysis::complexity_score(&actual_space, &problem.expected_space_complexity),
            actual: actual_space,
            expected: problem.expected_space_complexity.clone(),
        };

        let (covered, missed) = analysis::edge_case_classes(&profile);
        let edge_cases = EdgeCaseCoverage {
            score: covered.len() as f64 / (covered.len() + missed.len()).max(1) as f64 * 100.0,
            covered,
            missed,
        };

        let code_quality = CodeQualityScores {
            readability: analysis::readability_score(&profile),
            maintainability: analysis::maintainability_score(&profile),
            best_practices: analysis::best_practices_score(&profile),
        };
        let correctness = analysis::correctness_score(&profile, &request.code);

        let overall_score = (correctness * WEIGHT_CORRECTNESS
            + time_complexity.score * WEIGHT_TIME
            + space_complexity.score * WEIGHT_SPACE
            + edge_cases.score * WEIGHT_EDGE_CASES
            + code_quality.average() * WEIGHT_QUALITY)
            .clamp(0.0, 100.0);

        let suggestions = Self::suggestions(&time_complexity, &edge_cases, &code_quality);
        let feedback = Self::feedback_text(&problem, correctness, overall_score, &suggestions);

        let evaluation = CodeEvaluation {
            id: CodeEvaluation::generate_id(),
            user_id: request.user_id.clone(),
            problem_id: request.problem_id.clone(),
            session_id: request.session_id.clone(),
            code: request.code.clone(),
            language: request.language.clone(),
            correctness,
            time_complexity,
            space_complexity,
            edge_cases,
            code_quality,
            overall_score,
            feedback,
            suggestions,
            evaluated_at: Utc::now(),
        };

        let stored = self
            .store
            .put_entity(collections::EVALUATIONS, &evaluation)
            .await?;
        info!(
            evaluation_id = %stored.id,
            problem_id = %stored.problem_id,
            overall_score = stored.overall_score,
            "evaluation persisted"
        );
        Ok(stored)
    }

    fn suggestions(
        time: &ComplexityAssessment,
        edge_cases: &EdgeCaseCoverage,
        quality: &CodeQualityScores,
    ) -> Vec<String> {
        let mut out = Vec::new();
        if time.score < 100.0 {
            out.push(format!(
                "Aim for {} time — the current approach looks like {}.",
                time.expected, time.actual
            ));
        }
        for missed in &edge_cases.missed {
            out.push(format!("Add handling for {}.", missed));
        }
        if quality.readability < 70.0 {
            out.push("Break up long lines and add a comment where the intent is non-obvious.".to_string());
        }
        if quality.best_practices < 70.0 {
            out.push("Replace magic numbers and single-letter names with named values.".to_string());
        }
        out
    }

    fn feedback_text(
        problem: &CodingProblem,
        correctness: f64,
        overall: f64,
        suggestions: &[String],
    ) -> String {
        let opening = if overall >= 85.0 {
            format!("Strong solution to \"{}\".", problem.title)
        } else if overall >= 60.0 {
            format!("Solid attempt at \"{}\" with room to tighten up.", problem.title)
        } else {
            format!("\"{}\" needs another pass.", problem.title)
        };

        let mut text = format!(
            "{} Overall score {:.0}/100 (correctness {:.0}).",
            opening, overall, correctness
        );
        if let Some(first) = suggestions.first() {
            text.push(' ');
            text.push_str("Priority: ");
            text.push_str(first);
        }
        text
    }

    /// Evaluation to report on: a stored match when available, a fresh one
    /// otherwise.
    async fn existing_or_fresh(&self, request: &EvaluateCodeRequest) -> Result<CodeEvaluation> {
        if let Some(existing) = self.find_existing(request).await? {
            debug!(evaluation_id = %existing.id, "reusing stored evaluation");
            return Ok(existing);
        }
        self.evaluate(request).await
    }

    fn improvement_actions(evaluation: &CodeEvaluation) -> Vec<ImprovementAction> {
        // Order areas by weighted deficit: the biggest gap gets priority 1.
        let mut deficits = vec![
            (
                "correctness",
                (100.0 - evaluation.correctness) * WEIGHT_CORRECTNESS,
                "Re-check the core algorithm against the problem's examples.".to_string(),
            ),
            (
                "time complexity",
                (100.0 - evaluation.time_complexity.score) * WEIGHT_TIME,
                format!(
                    "Bring the running time from {} down to {}.",
                    evaluation.time_complexity.actual, evaluation.time_complexity.expected
                ),
            ),
            (
                "space complexity",
                (100.0 - evaluation.space_complexity.score) * WEIGHT_SPACE,
                format!(
                    "Reduce auxiliary memory toward {}.",
                    evaluation.space_complexity.expected
                ),
            ),
            (
                "edge cases",
                (100.0 - evaluation.edge_cases.score) * WEIGHT_EDGE_CASES,
                match evaluation.edge_cases.missed.first() {
                    Some(missed) => format!("Start with {}.", missed),
                    None => "Edge-case coverage looks complete.".to_string(),
                },
            ),
            (
                "code quality",
                (100.0 - evaluation.code_quality.average()) * WEIGHT_QUALITY,
                "Tidy naming, comments, and line length.".to_string(),
            ),
        ];
        deficits.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        deficits
            .into_iter()
            .filter(|(_, deficit, _)| *deficit > 0.0)
            .enumerate()
            .map(|(index, (area, _, action))| ImprovementAction {
                priority: (index as u8 + 1).min(5),
                area: area.to_string(),
                action,
            })
            .collect()
    }
}

#[async_trait]
impl RoleActor for EvaluationActor {
    fn role(&self) -> ActorRole {
        ActorRole::Evaluation
    }

    async fn handle(&self, message: &Message) -> Result<Reply> {
        match EvaluationOp::parse(&message.msg_type, message.payload.clone())? {
            EvaluationOp::Evaluate(request) => {
                let evaluation = self.evaluate(&request).await?;
                Reply::of("evaluation_result", &evaluation)
            }
            EvaluationOp::Feedback(request) => {
                let evaluation = self.existing_or_fresh(&request).await?;
                Reply::of(
                    "feedback_result",
                    &FeedbackResult {
                        problem_id: evaluation.problem_id.clone(),
                        overall_score: evaluation.overall_score,
                        feedback: evaluation.feedback.clone(),
                        suggestions: evaluation.suggestions.clone(),
                    },
                )
            }
            EvaluationOp::Improve(request) => {
                let evaluation = self.existing_or_fresh(&request).await?;
                Reply::of(
                    "improvement_result",
                    &ImprovementResult {
                        problem_id: evaluation.problem_id.clone(),
                        actions: Self::improvement_actions(&evaluation),
                    },
                )
            }
        }
    }
}
