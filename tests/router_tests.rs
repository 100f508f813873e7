// ABOUTME: Command contract tests driven through a running bridge.
// ABOUTME: Covers argument validation, error code mapping, and the unknown-command path.

use crisp_bridge::backends::mock::MockCrisp;
use crisp_bridge::testing::BridgeFixture;
use crisp_bridge::{Command, CommandReply, ErrorCode};
use serde_json::json;

#[tokio::test]
async fn test_unrecognized_command_returns_not_implemented() {
    let fixture = BridgeFixture::new().await;
    let reply = fixture
        .handle
        .call(Command::bare("openIntercomChat"))
        .await
        .unwrap();

    assert_eq!(reply.error_code(), Some(ErrorCode::NotImplemented));
    assert!(fixture.sdk.calls().is_empty());
}

#[tokio::test]
async fn test_missing_arguments_fail_before_any_sdk_call() {
    let fixture = BridgeFixture::new().await;

    for command in [
        Command::bare("setSessionString"),
        Command::bare("setSessionInt"),
        Command::bare("setSessionSegments"),
        Command::with_args("setSessionString", json!({"key": "plan"})),
        Command::with_args("setSessionSegments", json!({"segments": ["a"]})),
    ] {
        let reply = fixture.handle.call(command).await.unwrap();
        assert_eq!(reply.error_code(), Some(ErrorCode::InvalidArgs));
    }

    assert!(fixture.sdk.calls().is_empty());
}

#[tokio::test]
async fn test_set_session_string_succeeds() {
    let fixture = BridgeFixture::new().await;
    let reply = fixture
        .handle
        .call(Command::with_args(
            "setSessionString",
            json!({"key": "plan", "value": "pro"}),
        ))
        .await
        .unwrap();

    assert_eq!(reply, CommandReply::ok());
    assert_eq!(fixture.sdk.calls(), vec!["set_session_string(plan, pro)"]);
}

#[tokio::test]
async fn test_set_session_int_rejects_string_value() {
    let fixture = BridgeFixture::new().await;
    let reply = fixture
        .handle
        .call(Command::with_args(
            "setSessionInt",
            json!({"key": "age", "value": "thirty"}),
        ))
        .await
        .unwrap();

    assert_eq!(reply.error_code(), Some(ErrorCode::InvalidArgs));
    assert!(fixture.sdk.calls().is_empty());

    let reply = fixture
        .handle
        .call(Command::with_args(
            "setSessionInt",
            json!({"key": "age", "value": 30}),
        ))
        .await
        .unwrap();
    assert!(reply.is_success());
}

#[tokio::test]
async fn test_set_session_int_failure_maps_to_session_int_error() {
    let fixture = BridgeFixture::with_sdk(MockCrisp::new().fail_session_int("value overflow")).await;
    let reply = fixture
        .handle
        .call(Command::with_args(
            "setSessionInt",
            json!({"key": "age", "value": 30}),
        ))
        .await
        .unwrap();

    match reply {
        CommandReply::Error { code, details, .. } => {
            assert_eq!(code, ErrorCode::SessionIntError);
            assert_eq!(details.as_deref(), Some("value overflow"));
        }
        other => panic!("expected SESSION_INT_ERROR, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_session_identifier_with_no_session() {
    let fixture = BridgeFixture::new().await;
    let reply = fixture
        .handle
        .call(Command::bare("getSessionIdentifier"))
        .await
        .unwrap();

    match reply {
        CommandReply::Error { code, message, .. } => {
            assert_eq!(code, ErrorCode::NoSession);
            assert_eq!(message, "No active session found");
        }
        other => panic!("expected NO_SESSION, got {:?}", other),
    }
}

#[tokio::test]
async fn test_get_session_identifier_returns_active_id() {
    let fixture = BridgeFixture::with_sdk(MockCrisp::new().with_session("session_abc")).await;
    let reply = fixture
        .handle
        .call(Command::bare("getSessionIdentifier"))
        .await
        .unwrap();

    assert_eq!(reply.success_value(), Some(&json!("session_abc")));
}

#[tokio::test]
async fn test_sdk_failure_during_identifier_query_maps_to_session_id_error() {
    let fixture =
        BridgeFixture::with_sdk(MockCrisp::new().fail_session_identifier("sdk crashed")).await;
    let reply = fixture
        .handle
        .call(Command::bare("getSessionIdentifier"))
        .await
        .unwrap();

    assert_eq!(reply.error_code(), Some(ErrorCode::SessionIdError));
}

#[tokio::test]
async fn test_reset_failure_maps_to_reset_error_with_details() {
    let fixture = BridgeFixture::with_sdk(MockCrisp::new().fail_reset("storage busy")).await;
    let reply = fixture
        .handle
        .call(Command::bare("resetCrispChatSession"))
        .await
        .unwrap();

    match reply {
        CommandReply::Error { code, details, .. } => {
            assert_eq!(code, ErrorCode::ResetError);
            assert_eq!(details.as_deref(), Some("storage busy"));
        }
        other => panic!("expected RESET_ERROR, got {:?}", other),
    }
}

#[tokio::test]
async fn test_set_session_segments_passes_overwrite_through() {
    let fixture = BridgeFixture::new().await;
    let reply = fixture
        .handle
        .call(Command::with_args(
            "setSessionSegments",
            json!({"segments": ["vip", "beta"], "overwrite": false}),
        ))
        .await
        .unwrap();

    assert!(reply.is_success());
    assert_eq!(
        fixture.sdk.calls(),
        vec!["set_session_segments([vip, beta], overwrite=false)"]
    );
}

#[tokio::test]
async fn test_set_session_segments_failure_maps_to_segments_error() {
    let fixture =
        BridgeFixture::with_sdk(MockCrisp::new().fail_session_segments("quota exceeded")).await;
    let reply = fixture
        .handle
        .call(Command::with_args(
            "setSessionSegments",
            json!({"segments": ["vip"], "overwrite": true}),
        ))
        .await
        .unwrap();

    assert_eq!(reply.error_code(), Some(ErrorCode::SessionSegmentsError));
}
