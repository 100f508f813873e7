// ABOUTME: Command and reply types for the bridge's request/response surface.
// ABOUTME: Defines Command (name + JSON argument bag), CommandReply, and ErrorCode.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A named request entering the bridge from the host caller.
///
/// One command per invocation; the argument bag is an untyped JSON
/// mapping that each handler validates against its own contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Command {
    /// The command name (e.g. "openCrispChat")
    pub name: String,
    /// Arguments as sent by the caller, absent for no-arg commands
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Value>,
}

impl Command {
    /// Create a command with no arguments
    pub fn bare(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: None,
        }
    }

    /// Create a command carrying an argument bag
    pub fn with_args(name: impl Into<String>, arguments: Value) -> Self {
        Self {
            name: name.into(),
            arguments: Some(arguments),
        }
    }

    /// Get a string argument by key, if present and a string
    pub fn str_arg(&self, key: &str) -> Option<&str> {
        self.arguments.as_ref()?.get(key)?.as_str()
    }

    /// Get an integer argument by key, if present and a JSON integer
    pub fn int_arg(&self, key: &str) -> Option<i64> {
        self.arguments.as_ref()?.get(key)?.as_i64()
    }

    /// Get a bool argument by key, if present and a JSON bool
    pub fn bool_arg(&self, key: &str) -> Option<bool> {
        self.arguments.as_ref()?.get(key)?.as_bool()
    }

    /// Get a list-of-strings argument by key.
    ///
    /// Returns None if the key is absent, not an array, or any element
    /// is not a string — handlers treat all three as malformed.
    pub fn str_list_arg(&self, key: &str) -> Option<Vec<String>> {
        self.arguments
            .as_ref()?
            .get(key)?
            .as_array()?
            .iter()
            .map(|v| v.as_str().map(str::to_string))
            .collect()
    }
}

/// Typed error codes reported to the caller, with wire-stable names
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Malformed or missing required arguments
    InvalidArgs,
    /// Crisp SDK initialization or launch failure during openCrispChat
    CrispError,
    /// Session reset failed
    ResetError,
    /// Setting a session string failed
    SessionStringError,
    /// Setting a session int failed
    SessionIntError,
    /// Querying the session identifier failed
    SessionIdError,
    /// No active session exists - a legitimate empty state, not a crash
    NoSession,
    /// Setting session segments failed
    SessionSegmentsError,
    /// Unrecognized command name
    NotImplemented,
}

impl ErrorCode {
    /// Wire name of the code (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidArgs => "INVALID_ARGS",
            Self::CrispError => "CRISP_ERROR",
            Self::ResetError => "RESET_ERROR",
            Self::SessionStringError => "SESSION_STRING_ERROR",
            Self::SessionIntError => "SESSION_INT_ERROR",
            Self::SessionIdError => "SESSION_ID_ERROR",
            Self::NoSession => "NO_SESSION",
            Self::SessionSegmentsError => "SESSION_SEGMENTS_ERROR",
            Self::NotImplemented => "NOT_IMPLEMENTED",
        }
    }
}

/// Normalized outcome of a command, delivered to the caller exactly once
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CommandReply {
    /// Command succeeded, optionally carrying a result value
    Success {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<Value>,
    },
    /// Command failed with a typed code and human-readable message
    Error {
        code: ErrorCode,
        message: String,
        /// Underlying failure detail (e.g. the SDK error message)
        #[serde(default, skip_serializing_if = "Option::is_none")]
        details: Option<String>,
    },
}

impl CommandReply {
    /// Success with no value
    pub fn ok() -> Self {
        Self::Success { value: None }
    }

    /// Success carrying a value
    pub fn value(value: Value) -> Self {
        Self::Success { value: Some(value) }
    }

    /// Error with a code and message, no detail
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Error carrying the underlying failure's message as detail
    pub fn error_with_details(
        code: ErrorCode,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self::Error {
            code,
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Returns true if this is a success reply
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Get the error code if this is an error reply
    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Self::Error { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Get the success value if this is a success reply with one
    pub fn success_value(&self) -> Option<&Value> {
        match self {
            Self::Success { value } => value.as_ref(),
            _ => None,
        }
    }
}
