//! The history role actor.
//!
//! Owns the `session_history` collection: rolls a session's attempted
//! problems and evaluations up into one record per session, serves filtered
//! queries (most recent first), and derives the user's score trend.

use crate::runtime::{Reply, RoleActor};
use async_trait::async_trait;
use mentor_core::error::{MentorError, Result};
use mentor_core::evaluation::CodeEvaluation;
use mentor_core::history::{
    AnalyzeHistoryRequest, FetchHistoryRequest, HistoryAnalysis, HistoryOp, HistoryRecords,
    HistorySaved, ProblemAttempt, SaveHistoryRequest, SessionHistory, Trend,
};
use mentor_core::message::{ActorRole, Message};
use mentor_core::problem::CodingProblem;
use mentor_core::session::SessionRecord;
use mentor_core::store::{Store, StoreExt, collections};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

/// Score swing (first half vs. second half) below which the trend is
/// reported as steady.
const TREND_TOLERANCE: f64 = 5.0;
/// Categories averaging at or above this count as strengths in analysis.
const STRENGTH_THRESHOLD: f64 = 70.0;

pub struct HistoryActor {
    store: Arc<dyn Store>,
}

impl HistoryActor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    async fn save(&self, request: SaveHistoryRequest) -> Result<Reply> {
        let session: SessionRecord = self
            .store
            .get_entity(collections::SESSIONS, &request.session_id)
            .await?
            .ok_or_else(|| MentorError::not_found("session", &request.session_id))?;

        if session.context.user_id != request.user_id {
            return Err(MentorError::validation(format!(
                "session {} does not belong to user {}",
                request.session_id, request.user_id
            )));
        }

        let evaluations: Vec<CodeEvaluation> =
            self.store.entities(collections::EVALUATIONS).await?;
        let problems: Vec<CodingProblem> = self.store.entities(collections::PROBLEMS).await?;

        let mut attempts: Vec<ProblemAttempt> = evaluations
            .into_iter()
            .filter(|e| e.session_id == request.session_id)
            .map(|e| ProblemAttempt {
                title: problems
                    .iter()
                    .find(|p| p.id == e.problem_id)
                    .map(|p| p.title.clone()),
                problem_id: e.problem_id,
                overall_score: e.overall_score,
                evaluated_at: e.evaluated_at,
            })
            .collect();
        attempts.sort_by_key(|a| a.evaluated_at);

        let average_score = if attempts.is_empty() {
            0.0
        } else {
            attempts.iter().map(|a| a.overall_score).sum::<f64>() / attempts.len() as f64
        };

        let history = SessionHistory {
            id: session.id.clone(),
            session_id: session.id.clone(),
            user_id: session.context.user_id.clone(),
            start_time: session.context.session_start_time,
            end_time: session.end_time,
            problems_attempted: attempts,
            average_score,
        };

        let stored = self
            .store
            .put_entity::<SessionHistory>(collections::SESSION_HISTORY, &history)
            .await?;
        info!(
            session_id = %stored.session_id,
            attempts = stored.problems_attempted.len(),
            "session history saved"
        );

        Reply::of(
            "history_saved",
            &HistorySaved {
                session_id: stored.session_id,
                problems_attempted: stored.problems_attempted.len(),
            },
        )
    }

    /// The user's stored rollups, most recent first.
    async fn records_for(&self, user_id: &str) -> Result<Vec<SessionHistory>> {
        let mut records: Vec<SessionHistory> = self
            .store
            .entities::<SessionHistory>(collections::SESSION_HISTORY)
            .await?
            .into_iter()
            .filter(|r| r.user_id == user_id)
            .collect();
        records.sort_by(|a, b| b.start_time.cmp(&a.start_time));
        Ok(records)
    }

    async fn fetch(&self, request: FetchHistoryRequest) -> Result<Reply> {
        let mut records = self.records_for(&request.user_id).await?;

        if let Some(range) = &request.time_range {
            records.retain(|r| range.contains(r.start_time));
        }

        let result = match &request.session_id {
            Some(session_id) => {
                let record = records
                    .into_iter()
                    .find(|r| &r.session_id == session_id)
                    .ok_or_else(|| MentorError::not_found("session history", session_id))?;
                HistoryRecords::Single(record)
            }
            None => HistoryRecords::Many(records),
        };
        Reply::of("history", &result)
    }

    async fn analyze(&self, request: AnalyzeHistoryRequest) -> Result<Reply> {
        let mut records = self.records_for(&request.user_id).await?;
        if let Some(session_id) = &request.session_id {
            records.retain(|r| &r.session_id == session_id);
        }
        let sessions_analyzed = records.len();

        // Chronological attempt sequence across the analyzed sessions.
        let mut attempts: Vec<ProblemAttempt> = records
            .iter()
            .flat_map(|r| r.problems_attempted.iter().cloned())
            .collect();
        attempts.sort_by_key(|a| a.evaluated_at);

        let trend = Self::trend(&attempts);
        let (top_strengths, top_weaknesses) = self.category_extremes(&attempts).await?;

        Reply::of(
            "history_analysis",
            &HistoryAnalysis {
                user_id: request.user_id,
                trend,
                top_strengths,
                top_weaknesses,
                sessions_analyzed,
            },
        )
    }

    /// Compares the first half of the chronological score sequence with the
    /// second half.
    fn trend(attempts: &[ProblemAttempt]) -> Trend {
        if attempts.len() < 2 {
            return Trend::Steady;
        }
        let mid = attempts.len() / 2;
        let mean = |slice: &[ProblemAttempt]| {
            slice.iter().map(|a| a.overall_score).sum::<f64>() / slice.len().max(1) as f64
        };
        let delta = mean(&attempts[mid..]) - mean(&attempts[..mid]);
        if delta > TREND_TOLERANCE {
            Trend::Improving
        } else if delta < -TREND_TOLERANCE {
            Trend::Declining
        } else {
            Trend::Steady
        }
    }

    /// Top-scoring and bottom-scoring categories across the attempts.
    async fn category_extremes(
        &self,
        attempts: &[ProblemAttempt],
    ) -> Result<(Vec<String>, Vec<String>)> {
        let problems: Vec<CodingProblem> = self.store.entities(collections::PROBLEMS).await?;

        let mut buckets: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        for attempt in attempts {
            let categories = problems
                .iter()
                .find(|p| p.id == attempt.problem_id)
                .map(|p| p.category.clone())
                .unwrap_or_else(|| vec!["general".to_string()]);
            for category in categories {
                buckets.entry(category).or_default().push(attempt.overall_score);
            }
        }

        let mut averaged: Vec<(String, f64)> = buckets
            .into_iter()
            .map(|(category, scores)| {
                let avg = scores.iter().sum::<f64>() / scores.len().max(1) as f64;
                (category, avg)
            })
            .collect();
        averaged.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let strengths = averaged
            .iter()
            .filter(|(_, avg)| *avg >= STRENGTH_THRESHOLD)
            .take(3)
            .map(|(category, _)| category.clone())
            .collect();
        let weaknesses = averaged
            .iter()
            .rev()
            .filter(|(_, avg)| *avg < STRENGTH_THRESHOLD)
            .take(3)
            .map(|(category, _)| category.clone())
            .collect();
        Ok((strengths, weaknesses))
    }
}

#[async_trait]
impl RoleActor for HistoryActor {
    fn role(&self) -> ActorRole {
        ActorRole::History
    }

    async fn handle(&self, message: &Message) -> Result<Reply> {
        match HistoryOp::parse(&message.msg_type, message.payload.clone())? {
            HistoryOp::Fetch(request) => self.fetch(request).await,
            HistoryOp::Save(request) => self.save(request).await,
            HistoryOp::Analyze(request) => self.analyze(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use mentor_core::session::{ExperienceLevel, SessionContext};
    use mentor_infrastructure::MemoryStore;
    use serde_json::json;

    fn actor() -> HistoryActor {
        HistoryActor::new(Arc::new(MemoryStore::new()))
    }

    async fn store_session(actor: &HistoryActor, user: &str, session_id: &str, offset_mins: i64) {
        let mut context = SessionContext::new(user, ExperienceLevel::Beginner, vec![]);
        context.session_start_time = Utc::now() - Duration::minutes(offset_mins);
        let mut record = SessionRecord::new(context);
        record.id = session_id.to_string();
        actor
            .store
            .put_entity(collections::SESSIONS, &record)
            .await
            .unwrap();
    }

    async fn save(actor: &HistoryActor, user: &str, session_id: &str) {
        let message = Message::request(
            "save",
            json!({"userId": user, "sessionId": session_id}),
        );
        actor.handle(&message).await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_filters_by_user_and_sorts_descending() {
        let actor = actor();
        store_session(&actor, "u1", "s-old", 60).await;
        store_session(&actor, "u1", "s-new", 5).await;
        store_session(&actor, "u2", "s-other", 30).await;

        save(&actor, "u1", "s-old").await;
        save(&actor, "u1", "s-new").await;
        save(&actor, "u2", "s-other").await;

        let reply = actor
            .handle(&Message::request("fetch", json!({"userId": "u1"})))
            .await
            .unwrap();
        let records: HistoryRecords = serde_json::from_value(reply.payload).unwrap();
        let records = records.into_vec();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].session_id, "s-new");
        assert_eq!(records[1].session_id, "s-old");
    }

    #[tokio::test]
    async fn test_fetch_by_session_returns_single() {
        let actor = actor();
        store_session(&actor, "u1", "s1", 10).await;
        save(&actor, "u1", "s1").await;

        let reply = actor
            .handle(&Message::request(
                "fetch",
                json!({"userId": "u1", "sessionId": "s1"}),
            ))
            .await
            .unwrap();
        let records: HistoryRecords = serde_json::from_value(reply.payload).unwrap();
        assert!(matches!(records, HistoryRecords::Single(_)));
    }

    #[tokio::test]
    async fn test_fetch_unknown_session_is_not_found() {
        let actor = actor();
        let err = actor
            .handle(&Message::request(
                "fetch",
                json!({"userId": "u1", "sessionId": "ghost"}),
            ))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_save_rejects_foreign_session() {
        let actor = actor();
        store_session(&actor, "u1", "s1", 10).await;

        let message = Message::request("save", json!({"userId": "u2", "sessionId": "s1"}));
        let err = actor.handle(&message).await.unwrap_err();
        assert!(err.is_validation());
    }

    #[tokio::test]
    async fn test_resave_overwrites_rollup() {
        let actor = actor();
        store_session(&actor, "u1", "s1", 10).await;
        save(&actor, "u1", "s1").await;
        save(&actor, "u1", "s1").await;

        let records: Vec<SessionHistory> = actor
            .store
            .entities(collections::SESSION_HISTORY)
            .await
            .unwrap();
        assert_eq!(records.len(), 1);
    }

    #[tokio::test]
    async fn test_trend_improving() {
        let now = Utc::now();
        let attempt = |score: f64, mins_ago: i64| ProblemAttempt {
            problem_id: "p".to_string(),
            title: None,
            overall_score: score,
            evaluated_at: now - Duration::minutes(mins_ago),
        };
        let attempts = vec![
            attempt(40.0, 40),
            attempt(45.0, 30),
            attempt(70.0, 20),
            attempt(80.0, 10),
        ];
        assert_eq!(HistoryActor::trend(&attempts), Trend::Improving);

        let declining: Vec<ProblemAttempt> = vec![
            attempt(80.0, 40),
            attempt(75.0, 30),
            attempt(40.0, 20),
            attempt(35.0, 10),
        ];
        assert_eq!(HistoryActor::trend(&declining), Trend::Declining);

        assert_eq!(HistoryActor::trend(&[]), Trend::Steady);
    }

    #[tokio::test]
    async fn test_time_range_filter() {
        let actor = actor();
        store_session(&actor, "u1", "s-recent", 10).await;
        store_session(&actor, "u1", "s-ancient", 60 * 24 * 30).await;
        save(&actor, "u1", "s-recent").await;
        save(&actor, "u1", "s-ancient").await;

        let start = Utc::now() - Duration::days(1);
        let end = Utc::now() + Duration::days(1);
        let reply = actor
            .handle(&Message::request(
                "fetch",
                json!({
                    "userId": "u1",
                    "timeRange": {"start": start.to_rfc3339(), "end": end.to_rfc3339()}
                }),
            ))
            .await
            .unwrap();
        let records: HistoryRecords = serde_json::from_value(reply.payload).unwrap();
        let records = records.into_vec();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].session_id, "s-recent");
    }
}
