//! Kraken REST API authentication and WebSocket token retrieval.
//!
//! The private stream (`ws-auth.kraken.com`) only accepts subscriptions
//! carrying a token obtained via the
//! [`GetWebSocketsToken`](https://docs.kraken.com/api/docs/rest-api/get-websockets-token)
//! REST endpoint. The token must be used within 15 minutes of creation.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::prelude::*;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::{Digest, Sha256, Sha512};
use tracing::info;

use crate::{FeedError, Result};

/// Tracks the last nonce issued so every call returns a strictly
/// increasing value even when the wall-clock hasn't advanced.
///
/// Uses nanosecond resolution in a `u64`, which overflows around year 2554.
static LAST_NONCE: AtomicU64 = AtomicU64::new(0);

const URL_PATH: &str = "/0/private/GetWebSocketsToken";

/// A short-lived token for the private WebSocket stream.
#[derive(Clone, Deserialize)]
pub struct WebSocketToken {
    pub token: String,
    /// Seconds until the token expires if unused.
    pub expires: i64,
}

impl std::fmt::Debug for WebSocketToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WebSocketToken")
            .field("token", &"[REDACTED]")
            .field("expires", &self.expires)
            .finish()
    }
}

/// Envelope of every Kraken REST response.
#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    #[serde(default)]
    error: Vec<String>,
    result: Option<T>,
}

impl<T> ApiResponse<T> {
    fn into_result(self) -> Result<T> {
        if !self.error.is_empty() {
            return Err(FeedError::Api(self.error.join(", ")));
        }
        self.result
            .ok_or_else(|| FeedError::Api("missing result in GetWebSocketsToken response".into()))
    }
}

/// Fetches a short-lived WebSocket authentication token from the Kraken REST API.
///
/// `rest_url` is the API base, e.g. `https://api.kraken.com`.
///
/// # Errors
///
/// Returns [`FeedError::Auth`] if the secret is not valid base64,
/// [`FeedError::Http`] if the request fails or returns a non-success
/// status, and [`FeedError::Api`] if the exchange reports an error.
pub async fn get_websocket_token(
    rest_url: &str,
    api_key: &str,
    api_secret: &str,
) -> Result<WebSocketToken> {
    let nonce = next_nonce();
    let post_data = format!("nonce={nonce}");
    let signature = sign(api_secret, URL_PATH, nonce, &post_data)?;
    let url = format!("{}{URL_PATH}", rest_url.trim_end_matches('/'));

    let client = reqwest::Client::new();
    let response = client
        .post(&url)
        .header("API-Key", api_key)
        .header("API-Sign", &signature)
        .header("Content-Type", "application/x-www-form-urlencoded")
        .body(post_data)
        .send()
        .await?;

    let response = response.error_for_status()?;
    let body: ApiResponse<WebSocketToken> = response.json().await?;
    let token = body.into_result()?;

    info!(expires = token.expires, "Obtained WebSocket authentication token");
    Ok(token)
}

/// Returns a strictly monotonically-increasing nonce with nanosecond resolution.
///
/// Uses the wall-clock as the baseline but guarantees that successive calls
/// always return a value larger than the previous one, even when the clock
/// resolution is too coarse or the clock jumps backwards.
fn next_nonce() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos() as u64;

    let mut prev = LAST_NONCE.load(Ordering::Relaxed);
    loop {
        let nonce = now.max(prev + 1);
        match LAST_NONCE.compare_exchange_weak(prev, nonce, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return nonce,
            Err(actual) => prev = actual,
        }
    }
}

/// Computes the `API-Sign` header value.
///
/// Algorithm: `Base64(HMAC-SHA512(Base64Decode(secret), path + SHA256(nonce + post_data)))`
fn sign(api_secret: &str, path: &str, nonce: u64, post_data: &str) -> Result<String> {
    let secret = BASE64_STANDARD
        .decode(api_secret)
        .map_err(|e| FeedError::Auth(format!("invalid base64 api_secret: {e}")))?;

    let mut sha256 = Sha256::new();
    sha256.update(format!("{nonce}{post_data}").as_bytes());
    let sha256_digest = sha256.finalize();

    let mut hmac_input = Vec::from(path.as_bytes());
    hmac_input.extend_from_slice(&sha256_digest);

    let mut mac = Hmac::<Sha512>::new_from_slice(&secret)
        .map_err(|e| FeedError::Auth(format!("invalid HMAC key: {e}")))?;
    mac.update(&hmac_input);
    let result = mac.finalize().into_bytes();

    Ok(BASE64_STANDARD.encode(result))
}
