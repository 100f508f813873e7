// ABOUTME: Test harness shared by the integration tests and the demo binary.
// ABOUTME: Spawns a bridge over the mock SDK and offers argument-bag builders.

use crate::backends::mock::{MockCrisp, MockSurface};
use crate::bridge::BridgeHandle;
use crate::event::{ActivityResult, CHAT_REQUEST_CODE};
use serde_json::{json, Value};
use std::sync::Arc;

/// A running bridge over the scripted mock SDK, with the mock handles
/// kept around so tests can assert on recorded calls.
pub struct BridgeFixture {
    pub handle: BridgeHandle,
    pub sdk: Arc<MockCrisp>,
    pub surface: Arc<MockSurface>,
}

impl BridgeFixture {
    /// Bridge with a default mock SDK and an attached surface
    pub async fn new() -> Self {
        Self::with_sdk(MockCrisp::new()).await
    }

    /// Bridge over a scripted mock, surface attached
    pub async fn with_sdk(sdk: MockCrisp) -> Self {
        Self::with_surface(sdk, MockSurface::new()).await
    }

    /// Bridge with both boundaries scripted: the SDK and the host surface
    pub async fn with_surface(sdk: MockCrisp, surface: MockSurface) -> Self {
        let sdk = Arc::new(sdk);
        let surface = Arc::new(surface);
        let handle = BridgeHandle::spawn(sdk.clone());
        handle
            .attach_surface(surface.clone())
            .await
            .expect("worker alive");
        Self {
            handle,
            sdk,
            surface,
        }
    }

    /// Bridge over a scripted mock with no surface attached. The
    /// `surface` field exists but the bridge does not know about it.
    pub async fn detached(sdk: MockCrisp) -> Self {
        let sdk = Arc::new(sdk);
        let handle = BridgeHandle::spawn(sdk.clone());
        Self {
            handle,
            sdk,
            surface: Arc::new(MockSurface::new()),
        }
    }

    /// Simulate the host reporting that the chat window closed
    pub async fn close_chat(&self, result_code: i32) -> bool {
        self.handle
            .activity_result(ActivityResult::new(CHAT_REQUEST_CODE, result_code))
            .await
            .expect("worker alive")
    }
}

/// Minimal valid openCrispChat argument bag
pub fn minimal_chat_args() -> Value {
    json!({"websiteId": "site-1234"})
}

/// Argument bag exercising every config field
pub fn full_chat_args() -> Value {
    json!({
        "websiteId": "site-1234",
        "tokenId": "tok-5678",
        "enableNotifications": true,
        "sessionSegment": "support",
        "segments": ["vip", "beta"],
        "user": {
            "nickName": "Harper",
            "email": "harper@example.com",
            "avatar": "https://example.com/a.png",
            "phone": "+15551234567",
            "company": {
                "name": "Example Co",
                "url": "https://example.com",
                "employment": {"title": "Engineer", "role": "Platform"},
                "geolocation": {"city": "Lyon", "country": "FR"},
            },
        },
    })
}
