use axum::http::{HeaderMap, StatusCode};
use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

use quintris_common::api::HEADER_AUTH;

use crate::session_cache::SessionCache;

/// Fresh random salt, base64 encoded
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::STANDARD.encode(bytes)
}

/// Salted SHA-256 digest, base64 encoded
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    general_purpose::STANDARD.encode(hasher.finalize())
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    let candidate = hash_password(password, salt);
    candidate.as_bytes().ct_eq(expected_hash.as_bytes()).into()
}

/// Extract and verify the bearer session token, yielding the user id
pub async fn authenticate_request(
    session_cache: &SessionCache,
    headers: &HeaderMap,
) -> Result<i64, StatusCode> {
    let session_token = bearer_token(headers).ok_or(StatusCode::UNAUTHORIZED)?;

    session_cache
        .verify_session(session_token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

/// Like [`authenticate_request`] but for endpoints that also serve
/// anonymous callers
pub async fn optional_identity(session_cache: &SessionCache, headers: &HeaderMap) -> Option<i64> {
    authenticate_request(session_cache, headers).await.ok()
}

pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(HEADER_AUTH)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
}
