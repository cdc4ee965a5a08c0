//! Application configuration.
//!
//! `AppConfig` is the top-level `config.toml`. Only the bot token is
//! required; everything else has a default. The token is wrapped in
//! [`secrecy::SecretString`] so it never appears in Debug output or logs.

use secrecy::SecretString;
use serde::Deserialize;

/// Top-level configuration, loaded once at startup.
///
/// Startup configuration is load-or-die: the loader in the infra crate
/// returns an error for a missing or malformed file instead of falling
/// back to defaults (a bot with no token cannot do anything useful).
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Bot API token.
    pub token: SecretString,

    /// Base URL of the Bot API server.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// SQLite database URL for the durable key-value store.
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Long-poll timeout for the update loop, in seconds.
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Export spans via OpenTelemetry (stdout exporter).
    #[serde(default)]
    pub otel: bool,
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_database_url() -> String {
    "sqlite://stickergate.db?mode=rwc".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    50
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn test_minimal_config_applies_defaults() {
        let config: AppConfig = toml::from_str(r#"token = "123:abc""#).unwrap();
        assert_eq!(config.token.expose_secret(), "123:abc");
        assert_eq!(config.api_base, "https://api.telegram.org");
        assert_eq!(config.database_url, "sqlite://stickergate.db?mode=rwc");
        assert_eq!(config.poll_timeout_secs, 50);
        assert!(!config.otel);
    }

    #[test]
    fn test_full_config_overrides_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
token = "123:abc"
api_base = "http://localhost:8081"
database_url = "sqlite:///tmp/gate.db?mode=rwc"
poll_timeout_secs = 10
otel = true
"#,
        )
        .unwrap();
        assert_eq!(config.api_base, "http://localhost:8081");
        assert_eq!(config.poll_timeout_secs, 10);
        assert!(config.otel);
    }

    #[test]
    fn test_missing_token_is_an_error() {
        assert!(toml::from_str::<AppConfig>("otel = true").is_err());
    }

    #[test]
    fn test_token_redacted_in_debug() {
        let config: AppConfig = toml::from_str(r#"token = "123:abc""#).unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("123:abc"));
    }
}
