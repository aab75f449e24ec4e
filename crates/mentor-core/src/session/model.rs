//! Session domain models.
//!
//! A session ties a learner to a tutoring conversation: who they are, what
//! they want to practice, and the message history accumulated along the way.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Self-reported experience level of a learner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ExperienceLevel {
    Beginner,
    Intermediate,
    Advanced,
}

/// The mutable learner context carried by a session.
///
/// Created on `init`, mutated by `update` and `persist`, and kept (marked
/// inactive, not deleted) after `end`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionContext {
    /// The learner this session belongs to
    pub user_id: String,
    /// Self-reported experience level
    pub experience_level: ExperienceLevel,
    /// Topic areas the learner wants to practice (e.g. "arrays")
    pub target_areas: Vec<String>,
    /// When the session was opened
    pub session_start_time: DateTime<Utc>,
    /// Last time any session operation touched this context
    pub last_active: DateTime<Utc>,
}

impl SessionContext {
    /// Creates a fresh context stamped with the current time.
    pub fn new(
        user_id: impl Into<String>,
        experience_level: ExperienceLevel,
        target_areas: Vec<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            user_id: user_id.into(),
            experience_level,
            target_areas,
            session_start_time: now,
            last_active: now,
        }
    }
}

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MessageRole {
    /// Message from the learner.
    User,
    /// Message from the tutoring side.
    Assistant,
    /// System-generated message.
    System,
}

/// A single message persisted into a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationEntry {
    /// The role of the message sender
    pub role: MessageRole,
    /// The content of the message
    pub content: String,
    /// When the message was persisted
    pub timestamp: DateTime<Utc>,
}

/// The stored session entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    /// Unique session identifier (UUID format)
    pub id: String,
    /// Learner context
    pub context: SessionContext,
    /// False once the session has been ended
    pub active: bool,
    /// Set when the session ends; the record itself is never deleted
    pub end_time: Option<DateTime<Utc>>,
    /// Persisted conversation history
    #[serde(default)]
    pub messages: Vec<ConversationEntry>,
}

impl SessionRecord {
    /// Creates an active session record with a generated id.
    pub fn new(context: SessionContext) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            context,
            active: true,
            end_time: None,
            messages: Vec::new(),
        }
    }

    /// Appends a message to the session's history and bumps `lastActive`.
    pub fn push_message(&mut self, role: MessageRole, content: impl Into<String>) {
        let now = Utc::now();
        self.messages.push(ConversationEntry {
            role,
            content: content.into(),
            timestamp: now,
        });
        self.context.last_active = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_record_is_active() {
        let record = SessionRecord::new(SessionContext::new(
            "u1",
            ExperienceLevel::Beginner,
            vec!["arrays".to_string()],
        ));
        assert!(record.active);
        assert!(record.end_time.is_none());
        assert!(!record.id.is_empty());
    }

    #[test]
    fn test_push_message_bumps_last_active() {
        let mut record = SessionRecord::new(SessionContext::new(
            "u1",
            ExperienceLevel::Advanced,
            vec![],
        ));
        let before = record.context.last_active;
        record.push_message(MessageRole::User, "hello");
        assert_eq!(record.messages.len(), 1);
        assert!(record.context.last_active >= before);
    }

    #[test]
    fn test_camel_case_wire_shape() {
        let record = SessionRecord::new(SessionContext::new(
            "u1",
            ExperienceLevel::Intermediate,
            vec!["graphs".to_string()],
        ));
        let wire = serde_json::to_value(&record).unwrap();
        assert_eq!(wire["context"]["userId"], "u1");
        assert_eq!(wire["context"]["experienceLevel"], "intermediate");
        assert!(wire["context"]["sessionStartTime"].is_string());
    }
}
