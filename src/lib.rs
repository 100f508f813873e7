// ABOUTME: Command bridge for embedding Crisp chat behind a trait-based SDK boundary.
// ABOUTME: Routes named JSON commands and correlates the async chat-closed event.

pub mod commands;
pub mod config;
pub mod event;
pub mod traits;

pub mod lifecycle;
pub mod router;
pub mod session;

pub mod bridge;

pub mod backends;
pub mod testing;

pub use bridge::{BridgeError, BridgeHandle, ReplyReceiver};
pub use commands::{Command, CommandReply, ErrorCode};
pub use config::CrispConfig;
pub use event::{
    ActivityResult, ChatClosed, CloseReason, CHAT_REQUEST_CODE, RESULT_CANCELED, RESULT_OK,
};
pub use traits::{ChatSurface, CrispSdk};
