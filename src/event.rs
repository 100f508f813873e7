// ABOUTME: Lifecycle event types linking the external chat UI back to the bridge.
// ABOUTME: ActivityResult (inbound), ChatClosed (outcome), CloseReason, and result codes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Reserved correlation code identifying the bridge's own chat launch.
/// Activity results carrying any other code belong to someone else.
pub const CHAT_REQUEST_CODE: i32 = 1001;

/// Host-platform canonical "completed normally" result code
pub const RESULT_OK: i32 = -1;

/// Host-platform canonical "canceled by the user" result code
pub const RESULT_CANCELED: i32 = 0;

/// An inbound lifecycle event from the host UI layer: some launched
/// surface finished and reported a result code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityResult {
    pub request_code: i32,
    pub result_code: i32,
}

impl ActivityResult {
    pub fn new(request_code: i32, result_code: i32) -> Self {
        Self {
            request_code,
            result_code,
        }
    }

    /// True if this result belongs to the bridge's chat launch
    pub fn is_chat_result(&self) -> bool {
        self.request_code == CHAT_REQUEST_CODE
    }
}

/// Why the chat window closed, derived from the raw result code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CloseReason {
    NormalExit,
    UserCanceled,
    Unknown,
}

impl CloseReason {
    /// Map a raw result code to a close reason
    pub fn from_result_code(code: i32) -> Self {
        match code {
            RESULT_OK => Self::NormalExit,
            RESULT_CANCELED => Self::UserCanceled,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NormalExit => "normal_exit",
            Self::UserCanceled => "user_canceled",
            Self::Unknown => "unknown",
        }
    }
}

/// The completion outcome delivered to the caller that opened the chat.
/// Closing the window is always a success, whatever the reason.
/// `to_value` is the only serialization; the wire payload uses camelCase
/// field names and carries a fixed `status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChatClosed {
    pub result_code: i32,
    pub reason: CloseReason,
}

impl ChatClosed {
    /// Build the outcome for a raw result code
    pub fn from_result_code(result_code: i32) -> Self {
        Self {
            result_code,
            reason: CloseReason::from_result_code(result_code),
        }
    }

    /// Wire payload: `{"status": "closed", "resultCode": ..., "reason": ...}`
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "status": "closed",
            "resultCode": self.result_code,
            "reason": self.reason.as_str(),
        })
    }
}
