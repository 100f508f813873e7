// ABOUTME: Seed-config loading tests for the demo binary path: TOML file
// ABOUTME: parsing plus CRISP_WEBSITE_ID / CRISP_TOKEN_ID environment overrides.

use crisp_bridge::CrispConfig;
use serial_test::serial;
use std::io::Write;

fn clear_env() {
    std::env::remove_var("CRISP_WEBSITE_ID");
    std::env::remove_var("CRISP_TOKEN_ID");
}

#[test]
#[serial]
fn test_seed_loads_from_toml_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
website_id = "site-from-file"
token_id = "tok-from-file"
enable_notifications = false

[user]
nick_name = "Harper"
"#
    )
    .unwrap();

    let config = CrispConfig::load_seed(Some(file.path())).unwrap();
    assert_eq!(config.website_id, "site-from-file");
    assert_eq!(config.token_id.as_deref(), Some("tok-from-file"));
    assert!(!config.enable_notifications);
    assert_eq!(config.user.unwrap().nick_name.as_deref(), Some("Harper"));
}

#[test]
#[serial]
fn test_env_overrides_beat_the_file() {
    clear_env();
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, r#"website_id = "site-from-file""#).unwrap();

    std::env::set_var("CRISP_WEBSITE_ID", "site-from-env");
    std::env::set_var("CRISP_TOKEN_ID", "tok-from-env");

    let config = CrispConfig::load_seed(Some(file.path()));
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.website_id, "site-from-env");
    assert_eq!(config.token_id.as_deref(), Some("tok-from-env"));
}

#[test]
#[serial]
fn test_env_alone_is_enough_without_a_file() {
    clear_env();
    std::env::set_var("CRISP_WEBSITE_ID", "site-from-env");

    let config = CrispConfig::load_seed(None);
    clear_env();

    assert_eq!(config.unwrap().website_id, "site-from-env");
}

#[test]
#[serial]
fn test_missing_website_id_fails_validation() {
    clear_env();
    assert!(CrispConfig::load_seed(None).is_err());
}
