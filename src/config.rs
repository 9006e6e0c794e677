//! Application configuration loaded from environment variables.
//!
//! - `KRAKEN_WEBSOCKET_URL`: public stream (default `wss://ws.kraken.com/`)
//! - `KRAKEN_PRIVATE_WEBSOCKET_URL`: authenticated stream (default `wss://ws-auth.kraken.com/`)
//! - `KRAKEN_REST_URL`: REST base used for the token exchange (default `https://api.kraken.com`)
//! - `KRAKEN_API_KEY` / `KRAKEN_API_SECRET`: optional, but both or neither
//! - `KRAKEN_KEEPALIVE_SECS`: ping interval in seconds (default 10)
//! - `KRAKEN_VERBOSE`: `1`, `true` or `yes` logs every raw frame

use std::time::Duration;

use zeroize::Zeroizing;

use crate::FeedError;

/// Default public WebSocket endpoint.
const DEFAULT_WEBSOCKET_URL: &str = "wss://ws.kraken.com/";

/// Default authenticated WebSocket endpoint.
const DEFAULT_PRIVATE_WEBSOCKET_URL: &str = "wss://ws-auth.kraken.com/";

/// Default REST API base.
const DEFAULT_REST_URL: &str = "https://api.kraken.com";

/// Default keep-alive ping interval.
const DEFAULT_KEEPALIVE: Duration = Duration::from_secs(10);

/// Top-level application configuration.
#[derive(Debug)]
pub struct AppConfig {
    pub kraken: KrakenConfig,
}

/// Kraken-specific configuration values.
pub struct KrakenConfig {
    pub websocket_url: String,
    pub private_websocket_url: String,
    pub rest_url: String,
    pub api_key: Option<String>,
    pub api_secret: Option<Zeroizing<String>>,
    pub keepalive_interval: Duration,
    pub verbose: bool,
}

impl std::fmt::Debug for KrakenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KrakenConfig")
            .field("websocket_url", &self.websocket_url)
            .field("private_websocket_url", &self.private_websocket_url)
            .field("rest_url", &self.rest_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("api_secret", &self.api_secret.as_ref().map(|_| "[REDACTED]"))
            .field("keepalive_interval", &self.keepalive_interval)
            .field("verbose", &self.verbose)
            .finish()
    }
}

impl KrakenConfig {
    /// Returns the key and secret if both are configured.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => Some((key.as_str(), secret.as_str())),
            _ => None,
        }
    }

    /// Session settings for the public stream.
    pub fn public_session(&self) -> SessionConfig {
        SessionConfig {
            url: self.websocket_url.clone(),
            keepalive_interval: self.keepalive_interval,
            verbose: self.verbose,
        }
    }

    /// Session settings for the authenticated stream.
    pub fn private_session(&self) -> SessionConfig {
        SessionConfig {
            url: self.private_websocket_url.clone(),
            ..self.public_session()
        }
    }
}

/// Settings passed explicitly to a [`Session`](crate::websocket::Session).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub url: String,
    pub keepalive_interval: Duration,
    /// Log every raw frame sent and received at `debug` level.
    pub verbose: bool,
}

impl SessionConfig {
    /// Settings for `url` with the default keep-alive and quiet logging.
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            keepalive_interval: DEFAULT_KEEPALIVE,
            verbose: false,
        }
    }
}

/// Loads the application configuration from environment variables.
///
/// # Errors
///
/// Returns [`FeedError::Config`] if only one of the two credential
/// variables is set, or if `KRAKEN_KEEPALIVE_SECS` is not a positive
/// integer.
pub fn fetch_config() -> crate::Result<AppConfig> {
    let websocket_url = non_empty_var("KRAKEN_WEBSOCKET_URL")
        .unwrap_or_else(|| DEFAULT_WEBSOCKET_URL.to_string());
    let private_websocket_url = non_empty_var("KRAKEN_PRIVATE_WEBSOCKET_URL")
        .unwrap_or_else(|| DEFAULT_PRIVATE_WEBSOCKET_URL.to_string());
    let rest_url =
        non_empty_var("KRAKEN_REST_URL").unwrap_or_else(|| DEFAULT_REST_URL.to_string());

    let api_key = non_empty_var("KRAKEN_API_KEY");
    let api_secret = non_empty_var("KRAKEN_API_SECRET").map(Zeroizing::new);

    match (&api_key, &api_secret) {
        (Some(_), None) => {
            return Err(FeedError::Config(
                "KRAKEN_API_KEY is set but KRAKEN_API_SECRET is missing".to_string(),
            ));
        }
        (None, Some(_)) => {
            return Err(FeedError::Config(
                "KRAKEN_API_SECRET is set but KRAKEN_API_KEY is missing".to_string(),
            ));
        }
        _ => {}
    }

    let keepalive_interval = match non_empty_var("KRAKEN_KEEPALIVE_SECS") {
        Some(raw) => match raw.parse::<u64>() {
            Ok(secs) if secs > 0 => Duration::from_secs(secs),
            _ => {
                return Err(FeedError::Config(format!(
                    "KRAKEN_KEEPALIVE_SECS must be a positive integer, got `{raw}`"
                )));
            }
        },
        None => DEFAULT_KEEPALIVE,
    };

    let verbose = non_empty_var("KRAKEN_VERBOSE")
        .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes"));

    Ok(AppConfig {
        kraken: KrakenConfig {
            websocket_url,
            private_websocket_url,
            rest_url,
            api_key,
            api_secret,
            keepalive_interval,
            verbose,
        },
    })
}

/// Returns the value of an environment variable if it exists and is non-empty.
fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    /// Serializes tests that mutate the process environment.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    const ALL_VARS: [&str; 7] = [
        "KRAKEN_WEBSOCKET_URL",
        "KRAKEN_PRIVATE_WEBSOCKET_URL",
        "KRAKEN_REST_URL",
        "KRAKEN_API_KEY",
        "KRAKEN_API_SECRET",
        "KRAKEN_KEEPALIVE_SECS",
        "KRAKEN_VERBOSE",
    ];

    /// Clears every config variable, applies `vars`, runs `f`, then
    /// restores the originals.
    fn with_env<F: FnOnce()>(vars: &[(&str, &str)], f: F) {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());

        let originals: Vec<(&str, Option<String>)> = ALL_VARS
            .iter()
            .map(|k| (*k, std::env::var(k).ok()))
            .collect();

        // SAFETY: every test touching these variables holds ENV_LOCK.
        unsafe {
            for k in ALL_VARS {
                std::env::remove_var(k);
            }
            for (k, v) in vars {
                std::env::set_var(k, v);
            }
        }

        f();

        for (k, original) in originals {
            // SAFETY: restoring original values under the same lock.
            unsafe {
                match original {
                    Some(val) => std::env::set_var(k, val),
                    None => std::env::remove_var(k),
                }
            }
        }
    }

    #[test]
    fn defaults_without_env_vars() {
        with_env(&[], || {
            let config = fetch_config().unwrap();
            assert_eq!(config.kraken.websocket_url, DEFAULT_WEBSOCKET_URL);
            assert_eq!(
                config.kraken.private_websocket_url,
                DEFAULT_PRIVATE_WEBSOCKET_URL
            );
            assert_eq!(config.kraken.rest_url, DEFAULT_REST_URL);
            assert_eq!(config.kraken.keepalive_interval, DEFAULT_KEEPALIVE);
            assert!(!config.kraken.verbose);
            assert!(config.kraken.credentials().is_none());
        });
    }

    #[test]
    fn loads_credentials_from_env() {
        with_env(
            &[
                ("KRAKEN_API_KEY", "test-key"),
                ("KRAKEN_API_SECRET", "test-secret"),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(
                    config.kraken.credentials(),
                    Some(("test-key", "test-secret"))
                );
            },
        );
    }

    #[test]
    fn custom_urls_and_keepalive() {
        with_env(
            &[
                ("KRAKEN_WEBSOCKET_URL", "wss://custom.example.com"),
                ("KRAKEN_KEEPALIVE_SECS", "30"),
                ("KRAKEN_VERBOSE", "true"),
            ],
            || {
                let config = fetch_config().unwrap();
                let session = config.kraken.public_session();
                assert_eq!(session.url, "wss://custom.example.com");
                assert_eq!(session.keepalive_interval, Duration::from_secs(30));
                assert!(session.verbose);
                assert_eq!(
                    config.kraken.private_session().url,
                    DEFAULT_PRIVATE_WEBSOCKET_URL
                );
            },
        );
    }

    #[test]
    fn debug_output_hides_credentials() {
        with_env(
            &[
                ("KRAKEN_API_KEY", "test-key"),
                ("KRAKEN_API_SECRET", "test-secret"),
            ],
            || {
                let rendered = format!("{:?}", fetch_config().unwrap());
                assert!(!rendered.contains("test-key"));
                assert!(!rendered.contains("test-secret"));
            },
        );
    }

    #[test]
    fn rejects_key_without_secret() {
        with_env(&[("KRAKEN_API_KEY", "key-only")], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("KRAKEN_API_SECRET is missing"));
        });
    }

    #[test]
    fn rejects_secret_without_key() {
        with_env(&[("KRAKEN_API_SECRET", "secret-only")], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("KRAKEN_API_KEY is missing"));
        });
    }

    #[test]
    fn rejects_zero_keepalive() {
        with_env(&[("KRAKEN_KEEPALIVE_SECS", "0")], || {
            let err = fetch_config().unwrap_err();
            assert!(err.to_string().contains("KRAKEN_KEEPALIVE_SECS"));
        });
    }

    #[test]
    fn empty_values_treated_as_absent() {
        with_env(
            &[
                ("KRAKEN_API_KEY", ""),
                ("KRAKEN_API_SECRET", ""),
                ("KRAKEN_WEBSOCKET_URL", ""),
            ],
            || {
                let config = fetch_config().unwrap();
                assert_eq!(config.kraken.websocket_url, DEFAULT_WEBSOCKET_URL);
                assert!(config.kraken.api_key.is_none());
                assert!(config.kraken.api_secret.is_none());
            },
        );
    }
}
