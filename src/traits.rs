// ABOUTME: Trait boundary to the external Crisp chat subsystem and the host UI surface.
// ABOUTME: The bridge core only ever talks to these; real SDK glue and mocks both implement them.

use crate::config::CompanyConfig;
use anyhow::Result;
use async_trait::async_trait;

/// The external Crisp chat SDK.
///
/// Methods mirror the SDK surface the bridge drives. Setters that
/// validate their input (email, avatar, phone) report acceptance as
/// `Ok(false)` rather than an error: the value was refused, the SDK is
/// fine. `Err` from any method means the call itself failed.
#[async_trait]
pub trait CrispSdk: Send + Sync {
    /// Initialize the SDK for a website, optionally with a user token.
    /// Must succeed before anything else is applied.
    async fn configure(&self, website_id: &str, token_id: Option<&str>) -> Result<()>;

    /// Enable or disable chat push notifications
    async fn enable_notifications(&self, enabled: bool) -> Result<()>;

    /// Attach a user token to the session
    async fn set_token_id(&self, token_id: &str) -> Result<()>;

    /// Apply a single session segment
    async fn set_session_segment(&self, segment: &str) -> Result<()>;

    /// Set the visitor's display name
    async fn set_user_nickname(&self, nickname: &str) -> Result<()>;

    /// Set the visitor's email; `Ok(false)` if the SDK refused it
    async fn set_user_email(&self, email: &str) -> Result<bool>;

    /// Set the visitor's avatar URL; `Ok(false)` if the SDK refused it
    async fn set_user_avatar(&self, url: &str) -> Result<bool>;

    /// Set the visitor's phone number; `Ok(false)` if the SDK refused it
    async fn set_user_phone(&self, phone: &str) -> Result<bool>;

    /// Attach company details to the visitor profile
    async fn set_user_company(&self, company: &CompanyConfig) -> Result<()>;

    /// Set an arbitrary string value on the session
    async fn set_session_string(&self, key: &str, value: &str) -> Result<()>;

    /// Set an arbitrary integer value on the session
    async fn set_session_int(&self, key: &str, value: i64) -> Result<()>;

    /// Replace or extend the session's segment list
    async fn set_session_segments(&self, segments: &[String], overwrite: bool) -> Result<()>;

    /// Drop the current chat session and its local state
    async fn reset_chat_session(&self) -> Result<()>;

    /// Identifier of the active session, or None if no session exists
    async fn session_identifier(&self) -> Result<Option<String>>;

    /// Launch the chat UI standalone, with no host surface to report
    /// back through. No completion event will ever follow this launch.
    async fn open_chat_detached(&self) -> Result<()>;
}

/// A host surface (window, activity) currently attached to the bridge,
/// able to launch the chat UI in result-correlated mode: when the chat
/// closes, the host delivers an activity result carrying `request_code`
/// back to the bridge.
#[async_trait]
pub trait ChatSurface: Send + Sync {
    async fn open_chat(&self, request_code: i32) -> Result<()>;
}
