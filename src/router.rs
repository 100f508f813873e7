// ABOUTME: Command router mapping command names to handlers and normalizing outcomes.
// ABOUTME: Validates arguments per command before any SDK call; failures never escape.

use crate::commands::{Command, CommandReply, ErrorCode};
use crate::config::CrispConfig;
use crate::event::ActivityResult;
use crate::lifecycle::LifecycleCorrelator;
use crate::session::apply_session_config;
use crate::traits::{ChatSurface, CrispSdk};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Single entry point for commands.
///
/// Owns the SDK handle and the lifecycle correlator; lives on the bridge
/// worker task, so dispatch runs strictly in program order. Every
/// command carries a reply sender. All commands resolve it synchronously
/// except `openCrispChat`, which parks it with the correlator until the
/// chat window closes.
pub struct CommandRouter {
    sdk: Arc<dyn CrispSdk>,
    lifecycle: LifecycleCorrelator,
}

impl CommandRouter {
    pub fn new(sdk: Arc<dyn CrispSdk>) -> Self {
        Self {
            sdk,
            lifecycle: LifecycleCorrelator::new(),
        }
    }

    /// Route a command to its handler and deliver the reply.
    ///
    /// Argument validation happens before any SDK call; any SDK failure
    /// is converted to the handler's designated error code at this
    /// boundary. Nothing is retried and nothing propagates.
    pub async fn dispatch(&mut self, command: Command, reply: oneshot::Sender<CommandReply>) {
        info!(command = %command.name, "Handling command");

        if command.name == "openCrispChat" {
            self.open_chat(&command, reply).await;
            return;
        }

        let outcome = match command.name.as_str() {
            "resetCrispChatSession" => self.reset_session().await,
            "setSessionString" => self.set_session_string(&command).await,
            "setSessionInt" => self.set_session_int(&command).await,
            "getSessionIdentifier" => self.session_identifier().await,
            "setSessionSegments" => self.set_session_segments(&command).await,
            unknown => {
                warn!(command = unknown, "Unrecognized command");
                CommandReply::error(
                    ErrorCode::NotImplemented,
                    format!("Command '{}' is not implemented", unknown),
                )
            }
        };

        resolve(reply, outcome);
    }

    /// Feed an inbound activity result through the correlator
    pub fn handle_activity_result(&mut self, result: ActivityResult) -> bool {
        self.lifecycle.handle_activity_result(result)
    }

    pub fn attach_surface(&mut self, surface: Arc<dyn ChatSurface>) {
        self.lifecycle.attach_surface(surface);
    }

    pub fn detach_surface(&mut self) {
        self.lifecycle.detach_surface();
    }

    /// Drop any parked caller; called when the worker stops
    pub fn teardown(&mut self) {
        self.lifecycle.teardown();
    }

    /// Open the chat window.
    ///
    /// Translates the config bag, runs the fatal initialization calls,
    /// applies the optional fields best-effort, launches the UI, and
    /// parks the reply with the correlator. Only translation,
    /// initialization, and launch failures resolve the caller here;
    /// otherwise the reply waits for the close event.
    async fn open_chat(&mut self, command: &Command, reply: oneshot::Sender<CommandReply>) {
        let Some(bag) = command.arguments.as_ref() else {
            resolve(
                reply,
                invalid_args("openCrispChat", "configuration bag is required"),
            );
            return;
        };

        let config = match CrispConfig::from_bag(bag) {
            Ok(config) => config,
            Err(e) => {
                resolve(reply, crisp_error(e));
                return;
            }
        };

        let outcomes = match apply_session_config(self.sdk.as_ref(), &config).await {
            Ok(outcomes) => outcomes,
            Err(e) => {
                resolve(reply, crisp_error(e));
                return;
            }
        };
        debug!(
            applied = outcomes.iter().filter(|o| o.is_applied()).count(),
            attempted = outcomes.len(),
            "Session configuration applied"
        );

        if let Err(e) = self.lifecycle.launch(self.sdk.as_ref()).await {
            resolve(reply, crisp_error(e));
            return;
        }

        self.lifecycle.park(reply);
    }

    async fn reset_session(&self) -> CommandReply {
        match self.sdk.reset_chat_session().await {
            Ok(()) => CommandReply::ok(),
            Err(e) => CommandReply::error_with_details(
                ErrorCode::ResetError,
                "Failed to reset session",
                e.to_string(),
            ),
        }
    }

    async fn set_session_string(&self, command: &Command) -> CommandReply {
        let (Some(key), Some(value)) = (command.str_arg("key"), command.str_arg("value")) else {
            return invalid_args("setSessionString", "key and value must be strings");
        };

        match self.sdk.set_session_string(key, value).await {
            Ok(()) => CommandReply::ok(),
            Err(e) => CommandReply::error_with_details(
                ErrorCode::SessionStringError,
                "Failed to set session string",
                e.to_string(),
            ),
        }
    }

    async fn set_session_int(&self, command: &Command) -> CommandReply {
        let (Some(key), Some(value)) = (command.str_arg("key"), command.int_arg("value")) else {
            return invalid_args(
                "setSessionInt",
                "key must be a string and value an integer",
            );
        };

        match self.sdk.set_session_int(key, value).await {
            Ok(()) => CommandReply::ok(),
            Err(e) => CommandReply::error_with_details(
                ErrorCode::SessionIntError,
                "Failed to set session int",
                e.to_string(),
            ),
        }
    }

    async fn session_identifier(&self) -> CommandReply {
        match self.sdk.session_identifier().await {
            Ok(Some(id)) => CommandReply::value(Value::String(id)),
            Ok(None) => CommandReply::error(ErrorCode::NoSession, "No active session found"),
            Err(e) => CommandReply::error_with_details(
                ErrorCode::SessionIdError,
                "Failed to get session identifier",
                e.to_string(),
            ),
        }
    }

    async fn set_session_segments(&self, command: &Command) -> CommandReply {
        let (Some(segments), Some(overwrite)) =
            (command.str_list_arg("segments"), command.bool_arg("overwrite"))
        else {
            return invalid_args(
                "setSessionSegments",
                "segments must be a list of strings and overwrite a bool",
            );
        };

        match self.sdk.set_session_segments(&segments, overwrite).await {
            Ok(()) => CommandReply::ok(),
            Err(e) => CommandReply::error_with_details(
                ErrorCode::SessionSegmentsError,
                "Failed to set session segments",
                e.to_string(),
            ),
        }
    }
}

fn invalid_args(command: &str, detail: &str) -> CommandReply {
    CommandReply::error_with_details(
        ErrorCode::InvalidArgs,
        format!("Invalid arguments for {}", command),
        detail,
    )
}

fn crisp_error(e: anyhow::Error) -> CommandReply {
    CommandReply::error_with_details(
        ErrorCode::CrispError,
        "Failed to open Crisp Chat",
        e.to_string(),
    )
}

fn resolve(reply: oneshot::Sender<CommandReply>, outcome: CommandReply) {
    if reply.send(outcome).is_err() {
        debug!("Caller went away before the reply was delivered");
    }
}
