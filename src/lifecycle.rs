// ABOUTME: Lifecycle correlator parking the openCrispChat caller until the
// ABOUTME: host reports the chat closed, plus the attach/detach surface slot.

use crate::commands::CommandReply;
use crate::event::{ActivityResult, ChatClosed, CHAT_REQUEST_CODE};
use crate::traits::{ChatSurface, CrispSdk};
use anyhow::Result;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Correlates a chat launch with the activity result that ends it.
///
/// At most one `openCrispChat` caller waits for the chat to close at a
/// time. The correlator parks that caller's reply sender, asks the host
/// surface (when attached) to launch the chat under `CHAT_REQUEST_CODE`,
/// and resolves the parked sender when a matching result arrives. Lives
/// on the bridge worker task, so no locking.
pub struct LifecycleCorrelator {
    pending: Option<oneshot::Sender<CommandReply>>,
    surface: Option<Arc<dyn ChatSurface>>,
}

impl LifecycleCorrelator {
    pub fn new() -> Self {
        Self {
            pending: None,
            surface: None,
        }
    }

    /// Store the host surface for correlated launches
    pub fn attach_surface(&mut self, surface: Arc<dyn ChatSurface>) {
        info!("Host surface attached");
        self.surface = Some(surface);
    }

    /// Forget the host surface. A parked caller stays parked.
    pub fn detach_surface(&mut self) {
        info!("Host surface detached");
        self.surface = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Park the caller's reply sender until the chat closes.
    ///
    /// Re-entry while another caller is parked replaces the slot; the
    /// displaced sender is dropped so its receiver sees a closed channel
    /// instead of waiting forever.
    pub fn park(&mut self, reply: oneshot::Sender<CommandReply>) {
        if self.pending.replace(reply).is_some() {
            warn!("openCrispChat re-entered while a close was pending; displacing the earlier caller");
        }
    }

    /// Launch the chat UI, correlated through the surface when attached
    pub async fn launch(&self, sdk: &dyn CrispSdk) -> Result<()> {
        match &self.surface {
            Some(surface) => {
                debug!(
                    request_code = CHAT_REQUEST_CODE,
                    "Launching chat via host surface"
                );
                surface.open_chat(CHAT_REQUEST_CODE).await
            }
            None => {
                warn!("No host surface attached; launching detached, no close event will follow");
                sdk.open_chat_detached().await
            }
        }
    }

    /// Feed an activity result through the correlator.
    ///
    /// Returns whether the event belonged to the chat flow. A matching
    /// event resolves the parked caller with the close outcome; a
    /// matching event with nobody parked is consumed without effect.
    pub fn handle_activity_result(&mut self, result: ActivityResult) -> bool {
        if !result.is_chat_result() {
            debug!(
                request_code = result.request_code,
                "Ignoring unrelated activity result"
            );
            return false;
        }

        let closed = ChatClosed::from_result_code(result.result_code);
        match self.pending.take() {
            Some(sender) => {
                info!(
                    result_code = closed.result_code,
                    reason = closed.reason.as_str(),
                    "Chat closed; resolving waiting caller"
                );
                if sender.send(CommandReply::value(closed.to_value())).is_err() {
                    debug!("Waiting caller went away before the chat closed");
                }
            }
            None => {
                debug!("Chat close event arrived with no waiting caller");
            }
        }
        true
    }

    /// Drop any parked caller so its receiver observes a closed channel
    pub fn teardown(&mut self) {
        if self.pending.take().is_some() {
            warn!("Shutting down with a chat close still pending");
        }
        self.surface = None;
    }
}

impl Default for LifecycleCorrelator {
    fn default() -> Self {
        Self::new()
    }
}
