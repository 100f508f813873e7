// ABOUTME: Applies a CrispConfig to the SDK session, field by field, best-effort.
// ABOUTME: Initialization failures abort; individual field failures become diagnostics.

use crate::config::CrispConfig;
use crate::traits::CrispSdk;
use anyhow::{Context, Result};

/// How a single optional field fared during application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldStatus {
    /// The SDK accepted the value
    Applied,
    /// The SDK refused the value (e.g. malformed email or phone)
    Rejected,
    /// The SDK call itself failed
    Failed(String),
}

/// Per-field record of what the configurator did
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldOutcome {
    pub field: &'static str,
    pub status: FieldStatus,
}

impl FieldOutcome {
    pub fn is_applied(&self) -> bool {
        self.status == FieldStatus::Applied
    }
}

/// Apply a session configuration to the SDK.
///
/// The initialization calls (configure, notification setup) are fatal:
/// their failure is returned as `Err` and nothing further is applied.
/// Every optional field present in the config is then attempted in
/// order; a rejected or failed field is recorded and the remaining
/// fields are still applied. Partial application is a valid outcome.
pub async fn apply_session_config(
    sdk: &dyn CrispSdk,
    config: &CrispConfig,
) -> Result<Vec<FieldOutcome>> {
    sdk.configure(&config.website_id, config.token_id.as_deref())
        .await
        .context("Crisp configure failed")?;
    sdk.enable_notifications(config.enable_notifications)
        .await
        .context("Crisp notification setup failed")?;

    let mut outcomes = Vec::new();

    if let Some(token) = &config.token_id {
        record(&mut outcomes, "token_id", unit(sdk.set_token_id(token).await));
    }
    if let Some(segment) = &config.session_segment {
        record(
            &mut outcomes,
            "session_segment",
            unit(sdk.set_session_segment(segment).await),
        );
    }

    if let Some(user) = &config.user {
        if let Some(nickname) = &user.nick_name {
            record(
                &mut outcomes,
                "user.nickname",
                unit(sdk.set_user_nickname(nickname).await),
            );
        }
        if let Some(email) = &user.email {
            record(
                &mut outcomes,
                "user.email",
                accepted(sdk.set_user_email(email).await),
            );
        }
        if let Some(avatar) = &user.avatar {
            record(
                &mut outcomes,
                "user.avatar",
                accepted(sdk.set_user_avatar(avatar).await),
            );
        }
        if let Some(phone) = &user.phone {
            record(
                &mut outcomes,
                "user.phone",
                accepted(sdk.set_user_phone(phone).await),
            );
        }
        if let Some(company) = &user.company {
            record(
                &mut outcomes,
                "user.company",
                unit(sdk.set_user_company(company).await),
            );
        }
    }

    if let Some(segments) = &config.segments {
        if !segments.is_empty() {
            record(
                &mut outcomes,
                "segments",
                unit(sdk.set_session_segments(segments, true).await),
            );
        }
    }

    Ok(outcomes)
}

fn unit(result: Result<()>) -> FieldStatus {
    match result {
        Ok(()) => FieldStatus::Applied,
        Err(e) => FieldStatus::Failed(e.to_string()),
    }
}

fn accepted(result: Result<bool>) -> FieldStatus {
    match result {
        Ok(true) => FieldStatus::Applied,
        Ok(false) => FieldStatus::Rejected,
        Err(e) => FieldStatus::Failed(e.to_string()),
    }
}

fn record(outcomes: &mut Vec<FieldOutcome>, field: &'static str, status: FieldStatus) {
    match &status {
        FieldStatus::Applied => tracing::debug!(field, "Session field applied"),
        FieldStatus::Rejected => tracing::warn!(field, "Session field rejected by the SDK"),
        FieldStatus::Failed(error) => {
            tracing::warn!(field, error = %error, "Session field application failed")
        }
    }
    outcomes.push(FieldOutcome { field, status });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backends::mock::MockCrisp;
    use crate::config::UserConfig;
    use serde_json::json;
    use std::sync::Arc;

    fn full_config() -> CrispConfig {
        CrispConfig::from_bag(&json!({
            "websiteId": "site-1234",
            "tokenId": "tok-5678",
            "sessionSegment": "support",
            "segments": ["vip", "beta"],
            "user": {
                "nickName": "Harper",
                "email": "harper@example.com",
                "avatar": "https://example.com/a.png",
                "phone": "+15551234567",
            },
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_applies_all_present_fields_in_order() {
        let sdk = Arc::new(MockCrisp::new());
        let outcomes = apply_session_config(sdk.as_ref(), &full_config())
            .await
            .unwrap();

        let fields: Vec<&str> = outcomes.iter().map(|o| o.field).collect();
        assert_eq!(
            fields,
            vec![
                "token_id",
                "session_segment",
                "user.nickname",
                "user.email",
                "user.avatar",
                "user.phone",
                "segments",
            ]
        );
        assert!(outcomes.iter().all(FieldOutcome::is_applied));

        let calls = sdk.calls();
        assert_eq!(calls[0], "configure(site-1234, tok-5678)");
        assert_eq!(calls[1], "enable_notifications(true)");
    }

    #[tokio::test]
    async fn test_rejected_email_does_not_stop_later_fields() {
        let sdk = Arc::new(MockCrisp::new().reject_email());
        let outcomes = apply_session_config(sdk.as_ref(), &full_config())
            .await
            .unwrap();

        let email = outcomes.iter().find(|o| o.field == "user.email").unwrap();
        assert_eq!(email.status, FieldStatus::Rejected);

        // Everything after the rejected field was still attempted
        assert!(outcomes.iter().any(|o| o.field == "user.phone" && o.is_applied()));
        assert!(outcomes.iter().any(|o| o.field == "segments" && o.is_applied()));
    }

    #[tokio::test]
    async fn test_rejected_avatar_and_phone_are_recorded_individually() {
        let sdk = Arc::new(MockCrisp::new().reject_avatar().reject_phone());
        let outcomes = apply_session_config(sdk.as_ref(), &full_config())
            .await
            .unwrap();

        let avatar = outcomes.iter().find(|o| o.field == "user.avatar").unwrap();
        assert_eq!(avatar.status, FieldStatus::Rejected);
        let phone = outcomes.iter().find(|o| o.field == "user.phone").unwrap();
        assert_eq!(phone.status, FieldStatus::Rejected);

        // The email before and the segments after were still applied.
        assert!(outcomes.iter().any(|o| o.field == "user.email" && o.is_applied()));
        assert!(outcomes.iter().any(|o| o.field == "segments" && o.is_applied()));
    }

    #[tokio::test]
    async fn test_configure_failure_is_fatal() {
        let sdk = Arc::new(MockCrisp::new().fail_configure("website unreachable"));
        let err = apply_session_config(sdk.as_ref(), &full_config())
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Crisp configure failed"));

        // Nothing past the failing call was attempted
        assert_eq!(sdk.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_segments_list_is_skipped() {
        let sdk = Arc::new(MockCrisp::new());
        let config = CrispConfig {
            website_id: "site-1234".to_string(),
            segments: Some(vec![]),
            user: Some(UserConfig::default()),
            ..Default::default()
        };
        let outcomes = apply_session_config(sdk.as_ref(), &config).await.unwrap();
        assert!(outcomes.is_empty());
        assert!(!sdk.calls().iter().any(|c| c.starts_with("set_session_segments")));
    }
}
