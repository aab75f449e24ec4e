//! Core domain layer for MENTOR.
//!
//! This crate holds everything the rest of the workspace agrees on: the
//! message envelope and actor roles, the error taxonomy, the persistent
//! store contract, the configuration types, and the domain models plus
//! typed message protocols for each of the six actor roles.
//!
//! It deliberately contains no runtime: mailboxes live in `mentor-actors`,
//! store backends in `mentor-infrastructure`, and the dispatcher in
//! `mentor-application`.

pub mod config;
pub mod error;
pub mod evaluation;
pub mod hint;
pub mod history;
pub mod message;
pub mod problem;
pub mod session;
pub mod store;
pub mod study_plan;

// Re-export the types nearly every consumer needs
pub use config::{DispatcherConfig, MentorConfig, StorageBackend, StorageConfig};
pub use error::{MentorError, Result};
pub use message::{ActorRole, ErrorPayload, Message, ERROR_TYPE};
pub use store::{Store, StoreExt, collections, ensure_item_id};
