//! The session role actor.
//!
//! Owns the `sessions` collection: creates session records, keeps their
//! learner context fresh, marks them inactive on end (never deletes), and
//! appends persisted conversation messages.

use crate::runtime::{Reply, RoleActor};
use async_trait::async_trait;
use chrono::Utc;
use mentor_core::error::{MentorError, Result};
use mentor_core::message::{ActorRole, Message};
use mentor_core::session::{
    EndSessionRequest, ExperienceLevel, InitSessionRequest, MessagePersisted,
    PersistMessageRequest, SessionContext, SessionEnded, SessionInitialized, SessionOp,
    SessionRecord, SessionUpdated, UpdateSessionRequest,
};
use mentor_core::store::{Store, StoreExt, collections};
use std::sync::Arc;
use tracing::info;

pub struct SessionActor {
    store: Arc<dyn Store>,
}

impl SessionActor {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Composes the welcome message for a fresh session.
    ///
    /// Each experience level gets its own register; the target areas are
    /// echoed back so the learner sees the session understood them.
    fn welcome_message(context: &SessionContext) -> String {
        let areas = if context.target_areas.is_empty() {
            "general problem solving".to_string()
        } else {
            context.target_areas.join(", ")
        };
        match context.experience_level {
            ExperienceLevel::Beginner => format!(
                "Welcome! We'll build up the foundational concepts behind {} step by step — \
                 expect plenty of guidance along the way.",
                areas
            ),
            ExperienceLevel::Intermediate => format!(
                "Welcome back! We'll strengthen your core patterns in {} and push into the \
                 trickier variations.",
                areas
            ),
            ExperienceLevel::Advanced => format!(
                "Welcome! We'll focus on advanced optimization and edge-case rigor in {} — \
                 hints will stay minimal unless you ask.",
                areas
            ),
        }
    }

    async fn load(&self, session_id: &str) -> Result<SessionRecord> {
        self.store
            .get_entity::<SessionRecord>(collections::SESSIONS, session_id)
            .await?
            .ok_or_else(|| MentorError::not_found("session", session_id))
    }

    async fn init(&self, request: InitSessionRequest) -> Result<Reply> {
        if request.user_id.trim().is_empty() {
            return Err(MentorError::validation("userId must not be empty"));
        }

        let context = SessionContext::new(
            request.user_id,
            request.experience_level,
            request.target_areas,
        );
        let record = SessionRecord::new(context);
        let message = Self::welcome_message(&record.context);

        let stored = self
            .store
            .put_entity(collections::SESSIONS, &record)
            .await?;
        info!(session_id = %stored.id, user_id = %stored.context.user_id, "session initialized");

        Reply::of(
            "session_initialized",
            &SessionInitialized {
                session_id: stored.id,
                message,
                context: stored.context,
            },
        )
    }

    async fn update(&self, request: UpdateSessionRequest) -> Result<Reply> {
        let mut record = self.load(&request.session_id).await?;
        if let Some(level) = request.experience_level {
            record.context.experience_level = level;
        }
        if let Some(areas) = request.target_areas {
            record.context.target_areas = areas;
        }
        record.context.last_active = Utc::now();

        let stored = self
            .store
            .put_entity(collections::SESSIONS, &record)
            .await?;
        Reply::of(
            "session_updated",
            &SessionUpdated {
                session_id: stored.id,
                context: stored.context,
            },
        )
    }

    async fn end(&self, request: EndSessionRequest) -> Result<Reply> {
        let mut record = self.load(&request.session_id).await?;
        let end_time = Utc::now();
        record.active = false;
        record.end_time = Some(end_time);
        record.context.last_active = end_time;

        self.store
            .put_entity(collections::SESSIONS, &record)
            .await?;
        info!(session_id = %record.id, "session ended");

        Reply::of(
            "session_ended",
            &SessionEnded {
                session_id: record.id,
                end_time,
            },
        )
    }

    async fn persist(&self, request: PersistMessageRequest) -> Result<Reply> {
        if request.content.trim().is_empty() {
            return Err(MentorError::validation("content must not be empty"));
        }
        let mut record = self.load(&request.session_id).await?;
        record.push_message(request.role, request.content);

        let stored = self
            .store
            .put_entity::<SessionRecord>(collections::SESSIONS, &record)
            .await?;
        Reply::of(
            "message_persisted",
            &MessagePersisted {
                session_id: stored.id,
                message_count: stored.messages.len(),
            },
        )
    }
}

#[async_trait]
impl RoleActor for SessionActor {
    fn role(&self) -> ActorRole {
        ActorRole::Session
    }

    async fn handle(&self, message: &Message) -> Result<Reply> {
        match SessionOp::parse(&message.msg_type, message.payload.clone())? {
            SessionOp::Init(request) => self.init(request).await,
            SessionOp::Update(request) => self.update(request).await,
            SessionOp::End(request) => self.end(request).await,
            SessionOp::Persist(request) => self.persist(request).await,
        }
    }
}
