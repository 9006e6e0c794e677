mod common;

use std::time::Duration;

use base64::prelude::*;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};
use tokio::time::timeout;

use krakenfeed::FeedError;
use krakenfeed::auth::get_websocket_token;

use common::mock_rest;

const WAIT: Duration = Duration::from_secs(5);

const TOKEN_PATH: &str = "/0/private/GetWebSocketsToken";

/// 32 zero bytes, base64-encoded.
const SECRET: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA=";

fn expected_signature(body: &str) -> String {
    let nonce = body.strip_prefix("nonce=").unwrap();

    let mut sha256 = Sha256::new();
    sha256.update(format!("{nonce}{body}").as_bytes());
    let mut message = TOKEN_PATH.as_bytes().to_vec();
    message.extend_from_slice(&sha256.finalize());

    let key = BASE64_STANDARD.decode(SECRET).unwrap();
    let mut mac = Hmac::<Sha512>::new_from_slice(&key).unwrap();
    mac.update(&message);
    BASE64_STANDARD.encode(mac.finalize().into_bytes())
}

#[tokio::test]
async fn token_request_is_signed_post() {
    let (url, request) = mock_rest(
        "200 OK",
        r#"{"error":[],"result":{"token":"abc","expires":900}}"#,
    )
    .await;

    let token = get_websocket_token(&url, "my-key", SECRET).await.unwrap();
    assert_eq!(token.token, "abc");
    assert_eq!(token.expires, 900);

    let request = timeout(WAIT, request).await.unwrap().unwrap();
    assert_eq!(request.request_line, format!("POST {TOKEN_PATH} HTTP/1.1"));
    assert_eq!(request.header("API-Key"), Some("my-key"));
    assert_eq!(
        request.header("Content-Type"),
        Some("application/x-www-form-urlencoded")
    );

    let nonce = request.body.strip_prefix("nonce=").unwrap();
    assert!(nonce.parse::<u64>().is_ok(), "bad body {:?}", request.body);
    assert_eq!(
        request.header("API-Sign"),
        Some(expected_signature(&request.body).as_str())
    );
}

#[tokio::test]
async fn trailing_slash_in_base_url_is_ignored() {
    let (url, request) = mock_rest(
        "200 OK",
        r#"{"error":[],"result":{"token":"abc","expires":900}}"#,
    )
    .await;

    get_websocket_token(&format!("{url}/"), "my-key", SECRET)
        .await
        .unwrap();

    let request = timeout(WAIT, request).await.unwrap().unwrap();
    assert_eq!(request.request_line, format!("POST {TOKEN_PATH} HTTP/1.1"));
}

#[tokio::test]
async fn server_error_status_is_http_error() {
    let (url, _request) = mock_rest("500 Internal Server Error", "{}").await;

    let err = get_websocket_token(&url, "my-key", SECRET).await.unwrap_err();
    match err {
        FeedError::Http(e) => {
            assert_eq!(e.status().map(|s| s.as_u16()), Some(500));
        }
        other => panic!("expected http error, got {other:?}"),
    }
}

#[tokio::test]
async fn error_list_is_api_error() {
    let (url, _request) = mock_rest("200 OK", r#"{"error":["EAPI:Invalid key"]}"#).await;

    let err = get_websocket_token(&url, "my-key", SECRET).await.unwrap_err();
    assert!(
        matches!(err, FeedError::Api(ref message) if message == "EAPI:Invalid key"),
        "{err:?}"
    );
}

#[tokio::test]
async fn invalid_secret_fails_before_sending() {
    let err = get_websocket_token("http://127.0.0.1:9", "my-key", "not base64!")
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Auth(_)), "{err:?}");
}
