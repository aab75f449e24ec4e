//! The actor runtime: one task per role, fed by a bounded mailbox.
//!
//! Each actor processes its mailbox strictly sequentially — no two messages
//! to the same actor ever run concurrently, even though handlers await the
//! store. For every request the runtime emits exactly one reply carrying the
//! request's id: the handler's result on success, an error reply otherwise.
//! Application errors never terminate the loop; only a fault signal (or a
//! handler panic, which ends the task the same way) does, and recovering
//! from that is the dispatcher's job.

use async_trait::async_trait;
use mentor_core::error::{MentorError, Result};
use mentor_core::message::{ActorRole, Message};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// A role handler's successful result: the reply type tag plus payload.
#[derive(Debug, Clone)]
pub struct Reply {
    pub msg_type: String,
    pub payload: Value,
}

impl Reply {
    pub fn new(msg_type: impl Into<String>, payload: Value) -> Self {
        Self {
            msg_type: msg_type.into(),
            payload,
        }
    }

    /// Serializes a typed payload into a reply.
    pub fn of<T: Serialize>(msg_type: impl Into<String>, payload: &T) -> Result<Self> {
        Ok(Self::new(msg_type, serde_json::to_value(payload)?))
    }
}

/// The behavior contract every role actor implements.
///
/// Handlers are `&self`: an actor keeps no mutable in-memory state between
/// messages — all entity state lives in the store.
#[async_trait]
pub trait RoleActor: Send + Sync + 'static {
    /// The role this actor serves.
    fn role(&self) -> ActorRole;

    /// Handles one request and produces the reply payload.
    ///
    /// Returning `Err` yields an error reply to the caller; it does not end
    /// the actor.
    async fn handle(&self, message: &Message) -> Result<Reply>;
}

/// What can arrive in an actor's mailbox.
#[derive(Debug)]
pub enum Inbound {
    /// A correlated request to process
    Request(Message),
    /// Simulates a runtime-level fault: the actor task ends immediately,
    /// abandoning everything still queued
    Fault,
}

/// Spawns an actor task and returns its mailbox sender plus join handle.
///
/// Replies (success and error alike) flow to `replies`; the dispatcher's
/// router matches them back to waiting callers by id.
pub fn spawn_actor(
    actor: Arc<dyn RoleActor>,
    mailbox_capacity: usize,
    replies: mpsc::Sender<Message>,
) -> (mpsc::Sender<Inbound>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::channel::<Inbound>(mailbox_capacity);
    let role = actor.role();

    let handle = tokio::spawn(async move {
        debug!(%role, "actor started");
        while let Some(inbound) = rx.recv().await {
            let request = match inbound {
                Inbound::Request(request) => request,
                Inbound::Fault => {
                    warn!(%role, "fault signal received, actor task ending");
                    return;
                }
            };

            let reply = process(actor.as_ref(), &request).await;
            if replies.send(reply).await.is_err() {
                // Router gone; nobody can receive replies anymore.
                debug!(%role, "reply channel closed, actor task ending");
                return;
            }
        }
        debug!(%role, "mailbox closed, actor task ending");
    });

    (tx, handle)
}

/// Runs one request through the actor, wrapping the outcome into a reply
/// that shares the request's id.
async fn process(actor: &dyn RoleActor, request: &Message) -> Message {
    // Malformed envelope: rejected before role dispatch.
    if request.msg_type.trim().is_empty() {
        let err = MentorError::validation("message has no type");
        return Message::error_reply(request, &err);
    }

    match actor.handle(request).await {
        Ok(reply) => Message::reply_to(request, reply.msg_type, reply.payload),
        Err(err) => {
            debug!(role = %actor.role(), %err, "handler returned error");
            Message::error_reply(request, &err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Echoes the payload back, or fails when asked to.
    struct EchoActor;

    #[async_trait]
    impl RoleActor for EchoActor {
        fn role(&self) -> ActorRole {
            ActorRole::Session
        }

        async fn handle(&self, message: &Message) -> Result<Reply> {
            match message.msg_type.as_str() {
                "fail" => Err(MentorError::validation("asked to fail")),
                _ => Ok(Reply::new("echo", message.payload.clone())),
            }
        }
    }

    fn spawn_echo() -> (mpsc::Sender<Inbound>, mpsc::Receiver<Message>, JoinHandle<()>) {
        let (reply_tx, reply_rx) = mpsc::channel(8);
        let (tx, handle) = spawn_actor(Arc::new(EchoActor), 8, reply_tx);
        (tx, reply_rx, handle)
    }

    #[tokio::test]
    async fn test_reply_shares_request_id() {
        let (tx, mut replies, _handle) = spawn_echo();
        let request = Message::request("ping", json!({"n": 1}));
        let id = request.id;

        tx.send(Inbound::Request(request)).await.unwrap();
        let reply = replies.recv().await.unwrap();
        assert_eq!(reply.id, id);
        assert_eq!(reply.msg_type, "echo");
        assert_eq!(reply.payload["n"], 1);
    }

    #[tokio::test]
    async fn test_handler_error_becomes_error_reply() {
        let (tx, mut replies, _handle) = spawn_echo();
        let request = Message::request("fail", json!({}));
        tx.send(Inbound::Request(request)).await.unwrap();

        let reply = replies.recv().await.unwrap();
        assert!(reply.is_error());
        assert!(reply.to_error().is_validation());
    }

    #[tokio::test]
    async fn test_missing_type_rejected_before_dispatch() {
        let (tx, mut replies, _handle) = spawn_echo();
        let request = Message {
            id: uuid::Uuid::new_v4(),
            msg_type: String::new(),
            payload: json!({}),
        };
        tx.send(Inbound::Request(request)).await.unwrap();

        let reply = replies.recv().await.unwrap();
        assert!(reply.is_error());
        assert!(reply.to_error().is_validation());
    }

    #[tokio::test]
    async fn test_errors_do_not_kill_the_loop() {
        let (tx, mut replies, _handle) = spawn_echo();
        tx.send(Inbound::Request(Message::request("fail", json!({}))))
            .await
            .unwrap();
        tx.send(Inbound::Request(Message::request("ping", json!({}))))
            .await
            .unwrap();

        assert!(replies.recv().await.unwrap().is_error());
        assert_eq!(replies.recv().await.unwrap().msg_type, "echo");
    }

    #[tokio::test]
    async fn test_fault_ends_the_task() {
        let (tx, _replies, handle) = spawn_echo();
        tx.send(Inbound::Fault).await.unwrap();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_fifo_processing_order() {
        let (tx, mut replies, _handle) = spawn_echo();
        for n in 0..5 {
            tx.send(Inbound::Request(Message::request("ping", json!({"n": n}))))
                .await
                .unwrap();
        }
        for n in 0..5 {
            let reply = replies.recv().await.unwrap();
            assert_eq!(reply.payload["n"], n);
        }
    }
}
