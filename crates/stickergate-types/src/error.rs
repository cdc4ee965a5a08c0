use thiserror::Error;

/// Errors from the durable key-value store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store connection error: {0}")]
    Connection(String),

    #[error("store query error: {0}")]
    Query(String),
}

/// Errors from the chat platform adapter.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The HTTP request itself failed (network, timeout, TLS).
    #[error("transport error: {0}")]
    Transport(String),

    /// The platform answered with `ok: false`.
    #[error("api error {code}: {description}")]
    Api { code: i64, description: String },

    /// The response body could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),
}

/// Errors loading startup configuration. Fatal -- the process exits.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            code: 403,
            description: "bot was kicked".to_string(),
        };
        assert_eq!(err.to_string(), "api error 403: bot was kicked");
    }

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Query("no such table".to_string());
        assert!(err.to_string().contains("no such table"));
    }
}
