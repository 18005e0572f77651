//! Unit tests for environment overrides and credential loading.
//!
//! These tests mutate process-global env vars and run serially.

use pr_approve_bot::config::{GlobalConfig, SlackTransport};

const ALL_VARS: &[&str] = &[
    "SLACK_BOT_TOKEN",
    "SLACK_APP_TOKEN",
    "SLACK_SIGNING_SECRET",
    "SLACK_USER_TOKEN",
    "GITHUB_TOKEN",
    "PORT",
    "OWNER_USER_ID",
    "ALLOWED_CHANNEL_ID",
];

fn clear_env() {
    for var in ALL_VARS {
        std::env::remove_var(var);
    }
}

#[tokio::test]
#[serial_test::serial]
async fn socket_mode_loads_required_tokens_from_env() {
    clear_env();
    std::env::set_var("SLACK_BOT_TOKEN", "xoxb-test");
    std::env::set_var("SLACK_APP_TOKEN", "xapp-test");
    std::env::set_var("GITHUB_TOKEN", "ghp-test");

    let mut config = GlobalConfig::default();
    let result = config.load_credentials().await;
    clear_env();

    assert!(result.is_ok(), "credentials load: {result:?}");
    assert_eq!(config.slack.bot_token, "xoxb-test");
    assert_eq!(config.slack.app_token, "xapp-test");
    assert_eq!(config.github.token, "ghp-test");
    assert!(config.slack.user_token.is_none());
    assert!(config.slack.signing_secret.is_empty());
}

#[tokio::test]
#[serial_test::serial]
async fn optional_user_token_is_picked_up() {
    clear_env();
    std::env::set_var("SLACK_BOT_TOKEN", "xoxb-test");
    std::env::set_var("SLACK_APP_TOKEN", "xapp-test");
    std::env::set_var("GITHUB_TOKEN", "ghp-test");
    std::env::set_var("SLACK_USER_TOKEN", "xoxp-owner");

    let mut config = GlobalConfig::default();
    let result = config.load_credentials().await;
    clear_env();

    assert!(result.is_ok());
    assert_eq!(config.slack.user_token.as_deref(), Some("xoxp-owner"));
}

#[tokio::test]
#[serial_test::serial]
async fn missing_github_token_names_the_variable() {
    clear_env();
    std::env::set_var("SLACK_BOT_TOKEN", "xoxb-test");
    std::env::set_var("SLACK_APP_TOKEN", "xapp-test");

    let mut config = GlobalConfig::default();
    let err = config
        .load_credentials()
        .await
        .expect_err("missing token must fail");
    clear_env();

    assert!(err.to_string().contains("GITHUB_TOKEN"), "{err}");
}

#[tokio::test]
#[serial_test::serial]
async fn empty_env_var_counts_as_missing() {
    clear_env();
    std::env::set_var("SLACK_BOT_TOKEN", "");
    std::env::set_var("SLACK_APP_TOKEN", "xapp-test");
    std::env::set_var("GITHUB_TOKEN", "ghp-test");

    let mut config = GlobalConfig::default();
    let result = config.load_credentials().await;
    clear_env();

    let err = result.expect_err("empty token must fail");
    assert!(err.to_string().contains("SLACK_BOT_TOKEN"), "{err}");
}

#[tokio::test]
#[serial_test::serial]
async fn http_mode_requires_signing_secret_not_app_token() {
    clear_env();
    std::env::set_var("SLACK_BOT_TOKEN", "xoxb-test");
    std::env::set_var("GITHUB_TOKEN", "ghp-test");
    std::env::set_var("SLACK_SIGNING_SECRET", "shh");

    let mut config = GlobalConfig::default();
    config.slack.transport = SlackTransport::Http;
    let result = config.load_credentials().await;
    clear_env();

    assert!(result.is_ok(), "credentials load: {result:?}");
    assert_eq!(config.slack.signing_secret, "shh");
    assert!(config.slack.app_token.is_empty());
}

#[tokio::test]
#[serial_test::serial]
async fn http_mode_without_signing_secret_fails() {
    clear_env();
    std::env::set_var("SLACK_BOT_TOKEN", "xoxb-test");
    std::env::set_var("GITHUB_TOKEN", "ghp-test");

    let mut config = GlobalConfig::default();
    config.slack.transport = SlackTransport::Http;
    let result = config.load_credentials().await;
    clear_env();

    let err = result.expect_err("missing secret must fail");
    assert!(err.to_string().contains("SLACK_SIGNING_SECRET"), "{err}");
}

#[test]
#[serial_test::serial]
fn env_overrides_replace_toml_values() {
    clear_env();
    std::env::set_var("PORT", "9090");
    std::env::set_var("OWNER_USER_ID", "UENV");
    std::env::set_var("ALLOWED_CHANNEL_ID", "CENV");

    let mut config = GlobalConfig::from_toml_str(
        r#"
http_port = 8080

[slack]
owner_user_id = "UFILE"
"#,
    )
    .expect("config parses");
    let result = config.apply_env_overrides();
    clear_env();

    assert!(result.is_ok());
    assert_eq!(config.http_port, 9090);
    assert_eq!(config.slack.owner_user_id.as_deref(), Some("UENV"));
    assert_eq!(config.slack.allowed_channel_id.as_deref(), Some("CENV"));
}

#[test]
#[serial_test::serial]
fn blank_overrides_are_ignored() {
    clear_env();
    std::env::set_var("OWNER_USER_ID", "  ");

    let mut config = GlobalConfig::default();
    config.slack.owner_user_id = Some("UFILE".into());
    let result = config.apply_env_overrides();
    clear_env();

    assert!(result.is_ok());
    assert_eq!(config.slack.owner_user_id.as_deref(), Some("UFILE"));
}

#[test]
#[serial_test::serial]
fn invalid_port_is_config_error() {
    clear_env();
    std::env::set_var("PORT", "not-a-port");

    let mut config = GlobalConfig::default();
    let result = config.apply_env_overrides();
    clear_env();

    let err = result.expect_err("bad port must fail");
    assert!(err.to_string().starts_with("config:"), "{err}");
}
