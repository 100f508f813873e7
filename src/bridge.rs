// ABOUTME: Single-threaded bridge worker plus the Send+Sync handle callers use.
// ABOUTME: Commands, activity results, and surface changes all travel one mpsc channel.

use crate::commands::{Command, CommandReply};
use crate::event::ActivityResult;
use crate::router::CommandRouter;
use crate::traits::{ChatSurface, CrispSdk};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tracing::debug;

/// Handle-side failures. Command-level failures are `CommandReply::Error`;
/// these only cover the bridge itself being unreachable.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The worker task has stopped; no further commands can be delivered
    #[error("Bridge worker is gone")]
    WorkerGone,

    /// The reply sender was dropped before an outcome was produced:
    /// either the bridge tore down with the command pending, or a later
    /// openCrispChat displaced this caller's slot
    #[error("Reply channel closed before an outcome arrived")]
    ReplyDropped,
}

enum BridgeMessage {
    Invoke {
        command: Command,
        reply: oneshot::Sender<CommandReply>,
    },
    ActivityResult {
        result: ActivityResult,
        handled: oneshot::Sender<bool>,
    },
    AttachSurface(Arc<dyn ChatSurface>),
    DetachSurface,
    Shutdown,
}

/// Cloneable `Send + Sync` handle to a bridge worker.
///
/// The worker task owns all mutable state (the router, the lifecycle
/// slot, the surface slot); the handle just serializes messages onto its
/// channel, so callers on any task interleave in program order. The
/// worker stops when `shutdown` is called or every handle clone is
/// dropped; either way any parked openCrispChat caller sees its reply
/// channel close.
#[derive(Clone)]
pub struct BridgeHandle {
    tx: mpsc::Sender<BridgeMessage>,
}

impl BridgeHandle {
    /// Spawn a bridge worker driving the given SDK
    pub fn spawn(sdk: Arc<dyn CrispSdk>) -> Self {
        let (tx, rx) = mpsc::channel(32);
        tokio::spawn(run_worker(rx, sdk));
        Self { tx }
    }

    /// Fire a command and get a receiver for its reply.
    ///
    /// The two-step shape exists for `openCrispChat`, whose reply only
    /// arrives when the chat window closes; other commands resolve
    /// immediately and `call` is the convenient form.
    pub async fn invoke(&self, command: Command) -> Result<ReplyReceiver, BridgeError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(BridgeMessage::Invoke {
                command,
                reply: reply_tx,
            })
            .await
            .map_err(|_| BridgeError::WorkerGone)?;
        Ok(ReplyReceiver { rx: reply_rx })
    }

    /// Invoke a command and await its reply in one step
    pub async fn call(&self, command: Command) -> Result<CommandReply, BridgeError> {
        self.invoke(command).await?.recv().await
    }

    /// Deliver an inbound lifecycle event.
    ///
    /// Returns whether the bridge consumed it; `false` means the result
    /// belongs to some other listener in the host's chain.
    pub async fn activity_result(&self, result: ActivityResult) -> Result<bool, BridgeError> {
        let (handled_tx, handled_rx) = oneshot::channel();
        self.tx
            .send(BridgeMessage::ActivityResult {
                result,
                handled: handled_tx,
            })
            .await
            .map_err(|_| BridgeError::WorkerGone)?;
        handled_rx.await.map_err(|_| BridgeError::WorkerGone)
    }

    /// Attach a host surface able to launch the chat in correlated mode
    pub async fn attach_surface(&self, surface: Arc<dyn ChatSurface>) -> Result<(), BridgeError> {
        self.tx
            .send(BridgeMessage::AttachSurface(surface))
            .await
            .map_err(|_| BridgeError::WorkerGone)
    }

    /// Detach the current host surface; a parked caller stays parked
    pub async fn detach_surface(&self) -> Result<(), BridgeError> {
        self.tx
            .send(BridgeMessage::DetachSurface)
            .await
            .map_err(|_| BridgeError::WorkerGone)
    }

    /// Stop the worker. Any parked caller's reply channel closes.
    pub async fn shutdown(&self) -> Result<(), BridgeError> {
        self.tx
            .send(BridgeMessage::Shutdown)
            .await
            .map_err(|_| BridgeError::WorkerGone)
    }
}

/// Receiver for one command's reply. `Send`, so the caller can park it
/// anywhere while the chat window is open.
pub struct ReplyReceiver {
    rx: oneshot::Receiver<CommandReply>,
}

impl ReplyReceiver {
    /// Await the reply. `ReplyDropped` means no outcome will ever come:
    /// the bridge tore down or this caller was displaced.
    pub async fn recv(self) -> Result<CommandReply, BridgeError> {
        self.rx.await.map_err(|_| BridgeError::ReplyDropped)
    }

    /// Check for a reply without blocking
    pub fn try_recv(&mut self) -> Option<CommandReply> {
        self.rx.try_recv().ok()
    }
}

async fn run_worker(mut rx: mpsc::Receiver<BridgeMessage>, sdk: Arc<dyn CrispSdk>) {
    let mut router = CommandRouter::new(sdk);

    while let Some(message) = rx.recv().await {
        match message {
            BridgeMessage::Invoke { command, reply } => {
                router.dispatch(command, reply).await;
            }
            BridgeMessage::ActivityResult { result, handled } => {
                let consumed = router.handle_activity_result(result);
                let _ = handled.send(consumed);
            }
            BridgeMessage::AttachSurface(surface) => router.attach_surface(surface),
            BridgeMessage::DetachSurface => router.detach_surface(),
            BridgeMessage::Shutdown => break,
        }
    }

    router.teardown();
    debug!("Bridge worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn test_bridge_handle_is_send_sync() {
        assert_send::<BridgeHandle>();
        assert_sync::<BridgeHandle>();
    }

    #[test]
    fn test_reply_receiver_is_send() {
        assert_send::<ReplyReceiver>();
    }
}
