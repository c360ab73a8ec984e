//! OAuth 1.0a request signing (HMAC-SHA1), as required by the X v2
//! "create post" endpoint in user context.
//!
//! Only the oauth_* parameters are signed: the v2 endpoint takes a JSON
//! body, which is not part of the signature base string.

use std::time::{SystemTime, UNIX_EPOCH};

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use mealday_shared::NotifyError;
use rand::RngCore;
use sha1::Sha1;

use crate::credentials::Credentials;

type HmacSha1 = Hmac<Sha1>;

const SIGNATURE_METHOD: &str = "HMAC-SHA1";
const OAUTH_VERSION: &str = "1.0";

/// RFC 3986 percent-encoding; only unreserved characters pass through.
pub fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// `METHOD&url&params`, each part percent-encoded, params sorted.
pub fn signature_base_string(method: &str, url: &str, params: &[(&str, &str)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let joined = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_ascii_uppercase(),
        percent_encode(url),
        percent_encode(&joined)
    )
}

/// Base64 HMAC-SHA1 of `base_string`, keyed by both secrets.
pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> Result<String, NotifyError> {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac =
        HmacSha1::new_from_slice(key.as_bytes()).map_err(|e| NotifyError::Signing(e.to_string()))?;
    mac.update(base_string.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// Random 32-character hex nonce.
pub fn generate_nonce() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Seconds since the Unix epoch.
pub fn timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

/// Build the `Authorization: OAuth ...` header value for one request.
pub fn authorization_header(
    method: &str,
    url: &str,
    credentials: &Credentials,
    nonce: &str,
    timestamp: u64,
) -> Result<String, NotifyError> {
    let timestamp = timestamp.to_string();
    let mut params = vec![
        ("oauth_consumer_key", credentials.api_key.as_str()),
        ("oauth_nonce", nonce),
        ("oauth_signature_method", SIGNATURE_METHOD),
        ("oauth_timestamp", timestamp.as_str()),
        ("oauth_token", credentials.access_token.as_str()),
        ("oauth_version", OAUTH_VERSION),
    ];

    let base = signature_base_string(method, url, &params);
    let signature = sign(
        &base,
        &credentials.api_key_secret,
        &credentials.access_token_secret,
    )?;
    params.push(("oauth_signature", signature.as_str()));
    params.sort();

    let fields = params
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    Ok(format!("OAuth {fields}"))
}
