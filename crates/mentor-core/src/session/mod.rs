//! Session domain module.
//!
//! Contains the session domain models and the typed request/reply payloads
//! for the session actor's message protocol.
//!
//! # Module Structure
//!
//! - `model`: Core session domain models (`SessionRecord`, `SessionContext`)
//! - `request`: Typed payloads and the `SessionOp` protocol

mod model;
mod request;

// Re-export public API
pub use model::{
    ConversationEntry, ExperienceLevel, MessageRole, SessionContext, SessionRecord,
};
pub use request::{
    EndSessionRequest, InitSessionRequest, MessagePersisted, PersistMessageRequest,
    SessionEnded, SessionInitialized, SessionOp, SessionUpdated, UpdateSessionRequest,
};
