// ABOUTME: Scripted in-memory Crisp SDK for tests and the demo binary.
// ABOUTME: Records every call and can be told to fail or reject specific operations.

use crate::config::CompanyConfig;
use crate::traits::{ChatSurface, CrispSdk};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Mutex;

/// In-memory Crisp SDK double.
///
/// Every call is recorded as a readable string so tests can assert on
/// exactly what the bridge did, in what order. Builder methods script
/// failures (the call errors) and rejections (the setter returns
/// false) per operation.
pub struct MockCrisp {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    calls: Vec<String>,
    session_id: Option<String>,
    fail_configure: Option<String>,
    fail_notifications: Option<String>,
    fail_reset: Option<String>,
    fail_session_string: Option<String>,
    fail_session_int: Option<String>,
    fail_session_segments: Option<String>,
    fail_session_identifier: Option<String>,
    fail_detached_launch: Option<String>,
    reject_email: bool,
    reject_avatar: bool,
    reject_phone: bool,
}

impl MockCrisp {
    /// A mock that accepts everything and has no active session
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState::default()),
        }
    }

    /// Pretend an active session with the given identifier exists
    pub fn with_session(self, id: &str) -> Self {
        self.state().session_id = Some(id.to_string());
        self
    }

    /// Make `configure` fail with the given message
    pub fn fail_configure(self, message: &str) -> Self {
        self.state().fail_configure = Some(message.to_string());
        self
    }

    /// Make `enable_notifications` fail with the given message
    pub fn fail_notifications(self, message: &str) -> Self {
        self.state().fail_notifications = Some(message.to_string());
        self
    }

    /// Make `reset_chat_session` fail with the given message
    pub fn fail_reset(self, message: &str) -> Self {
        self.state().fail_reset = Some(message.to_string());
        self
    }

    /// Make `set_session_string` fail with the given message
    pub fn fail_session_string(self, message: &str) -> Self {
        self.state().fail_session_string = Some(message.to_string());
        self
    }

    /// Make `set_session_int` fail with the given message
    pub fn fail_session_int(self, message: &str) -> Self {
        self.state().fail_session_int = Some(message.to_string());
        self
    }

    /// Make `set_session_segments` fail with the given message
    pub fn fail_session_segments(self, message: &str) -> Self {
        self.state().fail_session_segments = Some(message.to_string());
        self
    }

    /// Make `session_identifier` fail with the given message
    pub fn fail_session_identifier(self, message: &str) -> Self {
        self.state().fail_session_identifier = Some(message.to_string());
        self
    }

    /// Make `open_chat_detached` fail with the given message
    pub fn fail_detached_launch(self, message: &str) -> Self {
        self.state().fail_detached_launch = Some(message.to_string());
        self
    }

    /// Refuse the visitor email (setter returns false)
    pub fn reject_email(self) -> Self {
        self.state().reject_email = true;
        self
    }

    /// Refuse the avatar URL (setter returns false)
    pub fn reject_avatar(self) -> Self {
        self.state().reject_avatar = true;
        self
    }

    /// Refuse the phone number (setter returns false)
    pub fn reject_phone(self) -> Self {
        self.state().reject_phone = true;
        self
    }

    /// Snapshot of the recorded call log
    pub fn calls(&self) -> Vec<String> {
        self.state().calls.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn track(&self, call: String) {
        self.state().calls.push(call);
    }
}

impl Default for MockCrisp {
    fn default() -> Self {
        Self::new()
    }
}

fn scripted(failure: &Option<String>) -> Result<()> {
    match failure {
        Some(message) => Err(anyhow!("{}", message)),
        None => Ok(()),
    }
}

#[async_trait]
impl CrispSdk for MockCrisp {
    async fn configure(&self, website_id: &str, token_id: Option<&str>) -> Result<()> {
        match token_id {
            Some(token) => self.track(format!("configure({}, {})", website_id, token)),
            None => self.track(format!("configure({})", website_id)),
        }
        scripted(&self.state().fail_configure)
    }

    async fn enable_notifications(&self, enabled: bool) -> Result<()> {
        self.track(format!("enable_notifications({})", enabled));
        scripted(&self.state().fail_notifications)
    }

    async fn set_token_id(&self, token_id: &str) -> Result<()> {
        self.track(format!("set_token_id({})", token_id));
        Ok(())
    }

    async fn set_session_segment(&self, segment: &str) -> Result<()> {
        self.track(format!("set_session_segment({})", segment));
        Ok(())
    }

    async fn set_user_nickname(&self, nickname: &str) -> Result<()> {
        self.track(format!("set_user_nickname({})", nickname));
        Ok(())
    }

    async fn set_user_email(&self, email: &str) -> Result<bool> {
        self.track(format!("set_user_email({})", email));
        Ok(!self.state().reject_email)
    }

    async fn set_user_avatar(&self, url: &str) -> Result<bool> {
        self.track(format!("set_user_avatar({})", url));
        Ok(!self.state().reject_avatar)
    }

    async fn set_user_phone(&self, phone: &str) -> Result<bool> {
        self.track(format!("set_user_phone({})", phone));
        Ok(!self.state().reject_phone)
    }

    async fn set_user_company(&self, company: &CompanyConfig) -> Result<()> {
        self.track(format!(
            "set_user_company({})",
            company.name.as_deref().unwrap_or("")
        ));
        Ok(())
    }

    async fn set_session_string(&self, key: &str, value: &str) -> Result<()> {
        self.track(format!("set_session_string({}, {})", key, value));
        scripted(&self.state().fail_session_string)
    }

    async fn set_session_int(&self, key: &str, value: i64) -> Result<()> {
        self.track(format!("set_session_int({}, {})", key, value));
        scripted(&self.state().fail_session_int)
    }

    async fn set_session_segments(&self, segments: &[String], overwrite: bool) -> Result<()> {
        self.track(format!(
            "set_session_segments([{}], overwrite={})",
            segments.join(", "),
            overwrite
        ));
        scripted(&self.state().fail_session_segments)
    }

    async fn reset_chat_session(&self) -> Result<()> {
        self.track("reset_chat_session".to_string());
        scripted(&self.state().fail_reset)
    }

    async fn session_identifier(&self) -> Result<Option<String>> {
        self.track("session_identifier".to_string());
        scripted(&self.state().fail_session_identifier)?;
        Ok(self.state().session_id.clone())
    }

    async fn open_chat_detached(&self) -> Result<()> {
        self.track("open_chat_detached".to_string());
        scripted(&self.state().fail_detached_launch)
    }
}

/// Host surface double recording correlated launch requests
pub struct MockSurface {
    state: Mutex<SurfaceState>,
}

#[derive(Default)]
struct SurfaceState {
    launches: Vec<i32>,
    fail_launch: Option<String>,
}

impl MockSurface {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(SurfaceState::default()),
        }
    }

    /// Make `open_chat` fail with the given message
    pub fn fail_launch(self, message: &str) -> Self {
        self.state().fail_launch = Some(message.to_string());
        self
    }

    /// Request codes of every correlated launch requested so far
    pub fn launches(&self) -> Vec<i32> {
        self.state().launches.clone()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SurfaceState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for MockSurface {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatSurface for MockSurface {
    async fn open_chat(&self, request_code: i32) -> Result<()> {
        self.state().launches.push(request_code);
        scripted(&self.state().fail_launch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_records_calls_in_order() {
        let mock = MockCrisp::new();
        mock.configure("site-1", None).await.unwrap();
        mock.set_session_string("plan", "pro").await.unwrap();
        assert_eq!(
            mock.calls(),
            vec!["configure(site-1)", "set_session_string(plan, pro)"]
        );
    }

    #[tokio::test]
    async fn test_scripted_failure_and_rejection() {
        let mock = MockCrisp::new().fail_reset("boom").reject_phone();
        let err = mock.reset_chat_session().await.unwrap_err();
        assert_eq!(err.to_string(), "boom");
        assert!(!mock.set_user_phone("+1555").await.unwrap());
    }

    #[tokio::test]
    async fn test_session_identifier_scripting() {
        let mock = MockCrisp::new();
        assert_eq!(mock.session_identifier().await.unwrap(), None);

        let mock = MockCrisp::new().with_session("session_abc");
        assert_eq!(
            mock.session_identifier().await.unwrap().as_deref(),
            Some("session_abc")
        );
    }

    #[tokio::test]
    async fn test_surface_records_launches() {
        let surface = MockSurface::new();
        surface.open_chat(1001).await.unwrap();
        assert_eq!(surface.launches(), vec![1001]);
    }
}
