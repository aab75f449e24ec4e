//! Actor runtime and the six role actors for MENTOR.
//!
//! `runtime` provides the mailbox loop every actor runs in; the `*_actor`
//! modules implement the role behaviors over the shared store; `analysis`
//! holds the static code heuristics the evaluation and hint actors share.

pub mod analysis;
pub mod evaluation_actor;
pub mod hint_actor;
pub mod history_actor;
pub mod problem_actor;
pub mod runtime;
pub mod session_actor;
pub mod study_plan_actor;

pub use evaluation_actor::EvaluationActor;
pub use hint_actor::HintActor;
pub use history_actor::HistoryActor;
pub use problem_actor::ProblemActor;
pub use runtime::{Inbound, Reply, RoleActor, spawn_actor};
pub use session_actor::SessionActor;
pub use study_plan_actor::StudyPlanActor;

use mentor_core::message::ActorRole;
use mentor_core::store::Store;
use std::sync::Arc;

/// Builds the actor serving `role` over the given store.
///
/// The dispatcher uses this both at startup and when respawning a faulted
/// actor — a replacement is always a fresh instance.
pub fn role_actor(role: ActorRole, store: Arc<dyn Store>) -> Arc<dyn RoleActor> {
    match role {
        ActorRole::Session => Arc::new(SessionActor::new(store)),
        ActorRole::Problem => Arc::new(ProblemActor::new(store)),
        ActorRole::Evaluation => Arc::new(EvaluationActor::new(store)),
        ActorRole::Hint => Arc::new(HintActor::new(store)),
        ActorRole::StudyPlan => Arc::new(StudyPlanActor::new(store)),
        ActorRole::History => Arc::new(HistoryActor::new(store)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentor_infrastructure::MemoryStore;

    #[test]
    fn test_factory_covers_every_role() {
        let store: Arc<dyn mentor_core::store::Store> = Arc::new(MemoryStore::new());
        for role in ActorRole::ALL {
            let actor = role_actor(role, store.clone());
            assert_eq!(actor.role(), role);
        }
    }
}
