//! Config tests.

use crate::config::BotConfig;
use serial_test::serial;
use std::env;
use std::time::Duration;

const VARS: &[&str] = &[
    "DISCORD_TOKEN",
    "BOT_TOKEN",
    "LOG_FILE",
    "ROUTES_FILE",
    "WEBHOOK_API_URL",
    "ADMIN_USER_IDS",
    "COMMAND_PREFIX",
    "DEFAULT_MODEL",
    "CACHE_EVICT_INTERVAL_SECS",
    "TRANSFORM_ENDPOINT",
    "TRANSFORM_TIMEOUT_MS",
    "HEARTBEAT_INTERVAL_SECS",
    "HEARTBEAT_TIMEOUT_MS",
    "TRANSFORM_ORIGIN",
    "TEMPERATURE",
];

fn clear_env() {
    for var in VARS {
        env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_load_config_with_defaults() {
    clear_env();
    env::set_var("DISCORD_TOKEN", "test_token");

    let config = BotConfig::load(None).unwrap();

    assert_eq!(config.discord_token(), "test_token");
    assert_eq!(config.log_file(), "logs/relay-bot.log");
    assert_eq!(config.routes_file(), "data/routes.json");
    assert_eq!(config.webhook_api_url(), "https://discord.com/api/v10");
    assert_eq!(config.relay.command_prefix, "!");
    assert_eq!(config.relay.default_model, "T5-mihm-gc");
    assert!(config.relay.admin_user_ids.is_empty());
    assert_eq!(config.relay.cache_evict_interval, Duration::from_secs(300));
    assert_eq!(config.rpc.endpoint, "tcp://127.0.0.1:5556");
    assert_eq!(config.rpc.request_timeout, Duration::from_millis(30_000));
    assert!((config.rpc.sampling.temperature - 2.8).abs() < f32::EPSILON);
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_load_config_with_custom_values() {
    clear_env();
    env::set_var("DISCORD_TOKEN", "custom_token");
    env::set_var("ROUTES_FILE", "/tmp/routes.json");
    env::set_var("ADMIN_USER_IDS", "1, 2 3");
    env::set_var("COMMAND_PREFIX", "?");
    env::set_var("CACHE_EVICT_INTERVAL_SECS", "30");
    env::set_var("TEMPERATURE", "9");

    let config = BotConfig::load(None).unwrap();

    assert_eq!(config.routes_file(), "/tmp/routes.json");
    assert_eq!(config.relay.admin_user_ids, vec![1, 2, 3]);
    assert!(config.relay.is_admin(2));
    assert!(!config.relay.is_admin(4));
    assert_eq!(config.relay.command_prefix, "?");
    assert_eq!(config.relay.cache_evict_interval, Duration::from_secs(30));
    assert!((config.rpc.sampling.temperature - 3.0).abs() < f32::EPSILON);
    clear_env();
}

#[test]
#[serial]
fn test_token_argument_overrides_env() {
    clear_env();
    env::set_var("DISCORD_TOKEN", "env_token");

    let config = BotConfig::load(Some("cli_token".to_string())).unwrap();

    assert_eq!(config.discord_token(), "cli_token");
    clear_env();
}

#[test]
#[serial]
fn test_missing_token_is_an_error() {
    clear_env();
    assert!(BotConfig::load(None).is_err());
}

#[test]
#[serial]
fn test_invalid_admin_ids_rejected() {
    clear_env();
    env::set_var("DISCORD_TOKEN", "t");
    env::set_var("ADMIN_USER_IDS", "12,abc");
    assert!(BotConfig::load(None).is_err());
    clear_env();
}

#[test]
#[serial]
fn test_validate_rejects_bad_api_url() {
    clear_env();
    env::set_var("DISCORD_TOKEN", "t");
    env::set_var("WEBHOOK_API_URL", "not a url");

    let config = BotConfig::load(None).unwrap();

    assert!(config.validate().is_err());
    clear_env();
}
