// ABOUTME: Typed Crisp session configuration translated from the caller's argument bag.
// ABOUTME: Accepts camelCase wire keys (and snake_case TOML aliases) via serde.

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;

/// Typed configuration applied to the Crisp session before the chat UI
/// is launched. Produced once per openCrispChat call, never persisted.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrispConfig {
    /// Crisp website identifier (required)
    #[serde(alias = "website_id")]
    pub website_id: String,
    /// Optional user token for session continuity across devices
    #[serde(default, alias = "token_id", skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(default = "default_enable_notifications", alias = "enable_notifications")]
    pub enable_notifications: bool,
    /// Single segment applied to the session
    #[serde(default, alias = "session_segment", skip_serializing_if = "Option::is_none")]
    pub session_segment: Option<String>,
    /// Bulk segments, applied with overwrite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub segments: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<UserConfig>,
}

/// Visitor identity fields, all optional and applied best-effort
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    #[serde(default, alias = "nick_name", skip_serializing_if = "Option::is_none")]
    pub nick_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Avatar URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<CompanyConfig>,
}

/// Company attached to the visitor profile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment: Option<EmploymentConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub geolocation: Option<GeolocationConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmploymentConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

fn default_enable_notifications() -> bool {
    true
}

impl Default for CrispConfig {
    fn default() -> Self {
        Self {
            website_id: String::new(),
            token_id: None,
            enable_notifications: default_enable_notifications(),
            session_segment: None,
            segments: None,
            user: None,
        }
    }
}

// Custom Debug impl to redact the user token
impl std::fmt::Debug for CrispConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrispConfig")
            .field("website_id", &self.website_id)
            .field("token_id", &self.token_id.as_ref().map(|_| "[REDACTED]"))
            .field("enable_notifications", &self.enable_notifications)
            .field("session_segment", &self.session_segment)
            .field("segments", &self.segments)
            .field("user", &self.user)
            .finish()
    }
}

impl CrispConfig {
    /// Translate the caller's untyped argument bag into a typed config
    pub fn from_bag(bag: &Value) -> Result<Self> {
        let config: Self = serde_json::from_value(bag.clone())
            .context("Failed to parse chat configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Check required fields beyond what deserialization enforces
    pub fn validate(&self) -> Result<()> {
        if self.website_id.trim().is_empty() {
            bail!("websiteId must not be empty");
        }
        Ok(())
    }

    /// Load a seed config from a TOML file with environment overrides.
    ///
    /// Used by the demo binary; the bridge itself only sees per-call
    /// bags. `CRISP_WEBSITE_ID` and `CRISP_TOKEN_ID` override the file.
    pub fn load_seed(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(p) if p.exists() => {
                let content = std::fs::read_to_string(p)
                    .with_context(|| format!("Failed to read {}", p.display()))?;
                toml::from_str::<Self>(&content)
                    .with_context(|| format!("Failed to parse {}", p.display()))?
            }
            _ => Self::default(),
        };

        if let Ok(val) = std::env::var("CRISP_WEBSITE_ID") {
            config.website_id = val;
        }
        if let Ok(val) = std::env::var("CRISP_TOKEN_ID") {
            config.token_id = Some(val);
        }

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_bag_full_wire_shape() {
        let bag = json!({
            "websiteId": "site-1234",
            "tokenId": "tok-5678",
            "enableNotifications": false,
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
                    "description": "Widgets",
                    "employment": {"title": "Engineer", "role": "Platform"},
                    "geolocation": {"city": "Lyon", "country": "FR"},
                },
            },
        });

        let config = CrispConfig::from_bag(&bag).unwrap();
        assert_eq!(config.website_id, "site-1234");
        assert_eq!(config.token_id.as_deref(), Some("tok-5678"));
        assert!(!config.enable_notifications);
        assert_eq!(config.session_segment.as_deref(), Some("support"));
        assert_eq!(
            config.segments,
            Some(vec!["vip".to_string(), "beta".to_string()])
        );

        let user = config.user.unwrap();
        assert_eq!(user.nick_name.as_deref(), Some("Harper"));
        let company = user.company.unwrap();
        assert_eq!(company.employment.unwrap().title.as_deref(), Some("Engineer"));
        assert_eq!(company.geolocation.unwrap().country.as_deref(), Some("FR"));
    }

    #[test]
    fn test_from_bag_minimal_defaults() {
        let config = CrispConfig::from_bag(&json!({"websiteId": "site-1234"})).unwrap();
        assert!(config.enable_notifications);
        assert!(config.token_id.is_none());
        assert!(config.user.is_none());
        assert!(config.segments.is_none());
    }

    #[test]
    fn test_from_bag_missing_website_id_fails() {
        let err = CrispConfig::from_bag(&json!({"tokenId": "tok"})).unwrap_err();
        assert!(err.to_string().contains("Failed to parse chat configuration"));
    }

    #[test]
    fn test_from_bag_blank_website_id_fails() {
        let err = CrispConfig::from_bag(&json!({"websiteId": "   "})).unwrap_err();
        assert!(err.to_string().contains("websiteId"));
    }

    #[test]
    fn test_snake_case_aliases_for_toml() {
        let config: CrispConfig = toml::from_str(
            r#"
website_id = "site-1234"
token_id = "tok-5678"
enable_notifications = false
session_segment = "support"

[user]
nick_name = "Harper"
email = "harper@example.com"
"#,
        )
        .unwrap();
        assert_eq!(config.website_id, "site-1234");
        assert_eq!(config.token_id.as_deref(), Some("tok-5678"));
        assert!(!config.enable_notifications);
        assert_eq!(
            config.user.unwrap().nick_name.as_deref(),
            Some("Harper")
        );
    }

    #[test]
    fn test_debug_redacts_token() {
        let config = CrispConfig {
            website_id: "site-1234".to_string(),
            token_id: Some("tok-secret".to_string()),
            ..Default::default()
        };
        let dump = format!("{:?}", config);
        assert!(dump.contains("[REDACTED]"));
        assert!(!dump.contains("tok-secret"));
    }
}
