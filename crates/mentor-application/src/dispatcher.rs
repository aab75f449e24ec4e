//! The dispatcher: one supervised actor per role, correlation by message
//! id, timeouts, and respawn on fault.
//!
//! The dispatcher holds no domain state — only routing bookkeeping. It is
//! constructed explicitly and passed by handle; there is deliberately no
//! process-wide singleton.
//!
//! # Correlation
//!
//! `send` registers a oneshot waiter under the request id, forwards the
//! request to the role's mailbox, and waits up to the configured timeout.
//! All actor replies funnel into a single router task that resolves the
//! matching waiter; a reply whose id has no waiter (late arrival after a
//! timeout, or a stale in-flight result from a replaced actor) is dropped.
//!
//! # Supervision
//!
//! Each role has a supervisor task owning the actor's join handle. When the
//! actor task ends while the dispatcher is live — an injected fault or a
//! panic inside a handler — the supervisor spawns a fresh actor for the
//! role and swaps the mailbox sender. Requests in flight to the dead
//! instance are not resent; their callers observe a timeout.

use mentor_actors::runtime::{Inbound, spawn_actor};
use mentor_actors::role_actor;
use mentor_core::config::DispatcherConfig;
use mentor_core::error::{MentorError, Result};
use mentor_core::message::{ActorRole, Message};
use mentor_core::store::Store;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use mentor_core::evaluation::{
    CodeEvaluation, EvaluateCodeRequest, FeedbackResult, ImprovementResult,
};
use mentor_core::hint::{Hint, ProvideHintRequest, RequestHintRequest};
use mentor_core::history::{
    AnalyzeHistoryRequest, FetchHistoryRequest, HistoryAnalysis, HistoryRecords, HistorySaved,
    SaveHistoryRequest,
};
use mentor_core::problem::{
    CodingProblem, FilterProblemsRequest, ProblemList, ProblemSuggestions, RequestProblemRequest,
    SuggestProblemsRequest,
};
use mentor_core::session::{
    EndSessionRequest, InitSessionRequest, MessagePersisted, PersistMessageRequest, SessionEnded,
    SessionInitialized, SessionUpdated, UpdateSessionRequest,
};
use mentor_core::study_plan::{GenerateStudyPlanRequest, PlanAnalysis, StudyPlan};

/// Waiters keyed by request id.
type PendingMap = Arc<Mutex<HashMap<Uuid, oneshot::Sender<Message>>>>;

/// The mailbox sender for one role, swapped on respawn.
type MailboxSlot = Arc<RwLock<mpsc::Sender<Inbound>>>;

/// Routes typed requests to the six role actors and correlates their
/// replies back to callers.
pub struct Dispatcher {
    config: DispatcherConfig,
    store: Arc<dyn Store>,
    mailboxes: HashMap<ActorRole, MailboxSlot>,
    pending: PendingMap,
    cancel: CancellationToken,
    /// Router and supervisor handles; the tasks exit on cancellation
    #[allow(dead_code)]
    tasks: Vec<JoinHandle<()>>,
}

impl Dispatcher {
    /// Creates a dispatcher with one eagerly-started actor per role.
    pub fn new(store: Arc<dyn Store>, config: DispatcherConfig) -> Self {
        let pending: PendingMap = Arc::new(Mutex::new(HashMap::new()));
        let cancel = CancellationToken::new();
        let (reply_tx, reply_rx) = mpsc::channel::<Message>(config.mailbox_capacity.max(16));

        let mut tasks = Vec::new();
        tasks.push(Self::spawn_router(reply_rx, pending.clone(), cancel.clone()));

        let mut mailboxes = HashMap::new();
        for role in ActorRole::ALL {
            let actor = role_actor(role, store.clone());
            let (tx, handle) = spawn_actor(actor, config.mailbox_capacity, reply_tx.clone());
            let slot: MailboxSlot = Arc::new(RwLock::new(tx));
            tasks.push(Self::spawn_supervisor(
                role,
                store.clone(),
                reply_tx.clone(),
                slot.clone(),
                handle,
                config.mailbox_capacity,
                cancel.clone(),
            ));
            mailboxes.insert(role, slot);
        }
        info!(roles = ActorRole::ALL.len(), "dispatcher started");

        Self {
            config,
            store,
            mailboxes,
            pending,
            cancel,
            tasks,
        }
    }

    /// Convenience constructor over an in-memory store with defaults.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(mentor_infrastructure::MemoryStore::new()),
            DispatcherConfig::default(),
        )
    }

    /// The store this dispatcher's actors operate on.
    pub fn store(&self) -> Arc<dyn Store> {
        self.store.clone()
    }

    /// Resolves replies to their waiters; unmatched replies are dropped.
    fn spawn_router(
        mut replies: mpsc::Receiver<Message>,
        pending: PendingMap,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    maybe = replies.recv() => {
                        let Some(reply) = maybe else { break };
                        let waiter = pending.lock().await.remove(&reply.id);
                        match waiter {
                            Some(tx) => {
                                // A dropped receiver means the caller gave up
                                // (timeout); discard, matching the contract.
                                let _ = tx.send(reply);
                            }
                            None => {
                                debug!(id = %reply.id, "dropping reply with no pending waiter");
                            }
                        }
                    }
                }
            }
        })
    }

    /// Watches one actor task and replaces it when it dies.
    fn spawn_supervisor(
        role: ActorRole,
        store: Arc<dyn Store>,
        reply_tx: mpsc::Sender<Message>,
        slot: MailboxSlot,
        mut handle: JoinHandle<()>,
        mailbox_capacity: usize,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        handle.abort();
                        return;
                    }
                    joined = &mut handle => {
                        if cancel.is_cancelled() {
                            return;
                        }
                        match joined {
                            Ok(()) => warn!(%role, "actor task ended, respawning"),
                            Err(e) if e.is_panic() => {
                                error!(%role, "actor task panicked, respawning");
                            }
                            Err(_) => return, // aborted from outside
                        }

                        let actor = role_actor(role, store.clone());
                        let (tx, new_handle) =
                            spawn_actor(actor, mailbox_capacity, reply_tx.clone());
                        *slot.write().await = tx;
                        handle = new_handle;
                        info!(%role, "actor respawned");
                    }
                }
            }
        })
    }

    fn mailbox_slot(&self, role: ActorRole) -> Result<&MailboxSlot> {
        self.mailboxes
            .get(&role)
            .ok_or_else(|| MentorError::internal(format!("no actor registered for role {}", role)))
    }

    /// Sends a raw message to a role and awaits its correlated reply.
    ///
    /// Assigns the message id when it is nil. On timeout the waiter is
    /// removed; whatever the actor eventually produces is discarded. An
    /// error-typed reply is surfaced as the typed error it carries.
    pub async fn send(&self, role: ActorRole, mut message: Message) -> Result<Message> {
        if message.id.is_nil() {
            message.id = Uuid::new_v4();
        }
        let id = message.id;

        let (waiter_tx, waiter_rx) = oneshot::channel();
        self.pending.lock().await.insert(id, waiter_tx);

        let mailbox = self.mailbox_slot(role)?.read().await.clone();
        if mailbox.send(Inbound::Request(message)).await.is_err() {
            self.pending.lock().await.remove(&id);
            return Err(MentorError::actor_fault(format!(
                "{} actor is unavailable",
                role
            )));
        }

        match timeout(self.config.request_timeout(), waiter_rx).await {
            Ok(Ok(reply)) => {
                debug_assert_eq!(reply.id, id);
                if reply.is_error() {
                    Err(reply.to_error())
                } else {
                    Ok(reply)
                }
            }
            Ok(Err(_)) => {
                // The waiter was dropped without a reply: dispatcher is
                // shutting down.
                self.pending.lock().await.remove(&id);
                Err(MentorError::actor_fault(format!(
                    "dispatcher stopped while waiting on {} actor",
                    role
                )))
            }
            Err(_) => {
                self.pending.lock().await.remove(&id);
                warn!(%role, %id, "request timed out");
                Err(MentorError::timeout(format!(
                    "no response from the {} actor within {} seconds",
                    role, self.config.request_timeout_secs
                )))
            }
        }
    }

    /// Failure injection: makes the role's current actor instance die as if
    /// its execution unit faulted. The supervisor will respawn it.
    pub async fn inject_fault(&self, role: ActorRole) -> Result<()> {
        let mailbox = self.mailbox_slot(role)?.read().await.clone();
        mailbox
            .send(Inbound::Fault)
            .await
            .map_err(|_| MentorError::actor_fault(format!("{} actor is unavailable", role)))
    }

    /// Stops the router and all supervisors; no respawn happens afterwards.
    pub fn shutdown(&self) {
        self.cancel.cancel();
        info!("dispatcher shut down");
    }

    /// Builds the request, sends it, and decodes the typed reply payload.
    async fn call<Req, Resp>(&self, role: ActorRole, msg_type: &str, request: &Req) -> Result<Resp>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let payload = serde_json::to_value(request)?;
        let reply = self.send(role, Message::request(msg_type, payload)).await?;
        serde_json::from_value(reply.payload).map_err(|e| {
            MentorError::internal(format!("unexpected {} reply shape: {}", msg_type, e))
        })
    }

    // ============================================================================
    // Typed operation catalog
    // ============================================================================

    /// Initializes a tutoring session.
    pub async fn init_session(&self, request: InitSessionRequest) -> Result<SessionInitialized> {
        self.call(ActorRole::Session, "init", &request).await
    }

    /// Updates a session's learner context.
    pub async fn update_session(&self, request: UpdateSessionRequest) -> Result<SessionUpdated> {
        self.call(ActorRole::Session, "update", &request).await
    }

    /// Ends a session (the record is kept, marked inactive).
    pub async fn end_session(&self, request: EndSessionRequest) -> Result<SessionEnded> {
        self.call(ActorRole::Session, "end", &request).await
    }

    /// Appends a conversation message to a session.
    pub async fn persist_message(
        &self,
        request: PersistMessageRequest,
    ) -> Result<MessagePersisted> {
        self.call(ActorRole::Session, "persist", &request).await
    }

    /// Selects a problem for the learner (seeding or synthesizing as
    /// needed).
    pub async fn request_problem(&self, request: RequestProblemRequest) -> Result<CodingProblem> {
        self.call(ActorRole::Problem, "request", &request).await
    }

    /// Offers up to three candidate problems.
    pub async fn suggest_problems(
        &self,
        request: SuggestProblemsRequest,
    ) -> Result<ProblemSuggestions> {
        self.call(ActorRole::Problem, "suggest", &request).await
    }

    /// Lists every catalog problem matching the filters.
    pub async fn filter_problems(&self, request: FilterProblemsRequest) -> Result<ProblemList> {
        self.call(ActorRole::Problem, "filter", &request).await
    }

    /// Scores a code submission and persists the evaluation.
    pub async fn evaluate_code(&self, request: EvaluateCodeRequest) -> Result<CodeEvaluation> {
        self.call(ActorRole::Evaluation, "evaluate", &request).await
    }

    /// Feedback for a submission, reusing a stored evaluation when one
    /// matches.
    pub async fn request_feedback(&self, request: EvaluateCodeRequest) -> Result<FeedbackResult> {
        self.call(ActorRole::Evaluation, "feedback", &request).await
    }

    /// Prioritized improvement actions for a submission.
    pub async fn request_improvements(
        &self,
        request: EvaluateCodeRequest,
    ) -> Result<ImprovementResult> {
        self.call(ActorRole::Evaluation, "improve", &request).await
    }

    /// Requests an escalating hint for the learner's current attempt.
    pub async fn request_hint(&self, request: RequestHintRequest) -> Result<Hint> {
        self.call(ActorRole::Hint, "request", &request).await
    }

    /// Requests a hint at an explicit level and concept.
    pub async fn provide_hint(&self, request: ProvideHintRequest) -> Result<Hint> {
        self.call(ActorRole::Hint, "provide", &request).await
    }

    /// Analyzes the user's evaluations without persisting a plan.
    pub async fn analyze_progress(
        &self,
        request: GenerateStudyPlanRequest,
    ) -> Result<PlanAnalysis> {
        self.call(ActorRole::StudyPlan, "analyze", &request).await
    }

    /// Generates and persists the user's study plan (overwriting the prior
    /// one).
    pub async fn generate_study_plan(
        &self,
        request: GenerateStudyPlanRequest,
    ) -> Result<StudyPlan> {
        self.call(ActorRole::StudyPlan, "generate", &request).await
    }

    /// Rolls the session's attempts up into the history collection.
    pub async fn save_history(&self, request: SaveHistoryRequest) -> Result<HistorySaved> {
        self.call(ActorRole::History, "save", &request).await
    }

    /// Fetches stored history: one record when a session is named, the
    /// filtered list otherwise.
    pub async fn fetch_history(&self, request: FetchHistoryRequest) -> Result<HistoryRecords> {
        self.call(ActorRole::History, "fetch", &request).await
    }

    /// Derives the user's score trend and strength/weakness areas.
    pub async fn analyze_history(
        &self,
        request: AnalyzeHistoryRequest,
    ) -> Result<HistoryAnalysis> {
        self.call(ActorRole::History, "analyze", &request).await
    }
}

impl Drop for Dispatcher {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
