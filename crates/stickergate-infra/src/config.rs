//! Startup configuration loader.
//!
//! Reads `config.toml` and deserializes it into [`AppConfig`]. Unlike the
//! rest of the adapter layer, configuration errors do not degrade: a bot
//! with no readable token cannot do anything useful, so the error is
//! returned for `main` to turn into a nonzero exit.

use stickergate_types::config::AppConfig;
use stickergate_types::error::ConfigError;

use std::path::Path;

/// Load configuration from `path`. Missing file, unreadable file, and
/// malformed TOML are all fatal.
pub async fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

    toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(
            &config_path,
            r#"
token = "123:abc"
poll_timeout_secs = 10
"#,
        )
        .await
        .unwrap();

        let config = load_config(&config_path).await.unwrap();
        assert_eq!(config.poll_timeout_secs, 10);
        assert_eq!(config.api_base, "https://api.telegram.org");
    }

    #[tokio::test]
    async fn load_config_missing_file_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let err = load_config(&tmp.path().join("config.toml")).await.unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[tokio::test]
    async fn load_config_invalid_toml_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "this is not { valid toml !!!")
            .await
            .unwrap();

        let err = load_config(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[tokio::test]
    async fn load_config_missing_token_is_fatal() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        tokio::fs::write(&config_path, "otel = true").await.unwrap();

        let err = load_config(&config_path).await.unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
