use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::RwLock;
use uuid::Uuid;

const SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
struct SessionToken {
    user_id: i64,
    expires_at: SystemTime,
}

/// In-memory bearer sessions. Tokens are opaque uuids handed out at
/// sign-up/sign-in and dropped at sign-out; expired entries are swept
/// periodically in the background.
#[derive(Clone)]
pub struct SessionCache {
    sessions: Arc<RwLock<HashMap<String, SessionToken>>>,
}

impl SessionCache {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub async fn create_session(&self, user_id: i64) -> String {
        let token_id = Uuid::new_v4().to_string();
        let mut sessions = self.sessions.write().await;
        sessions.insert(
            token_id.clone(),
            SessionToken {
                user_id,
                expires_at: SystemTime::now() + SESSION_TTL,
            },
        );
        token_id
    }

    pub async fn verify_session(&self, token_id: &str) -> Result<i64, String> {
        let sessions = self.sessions.read().await;
        let session = sessions.get(token_id).ok_or("Invalid session".to_string())?;

        if SystemTime::now() > session.expires_at {
            return Err("Session expired".to_string());
        }

        Ok(session.user_id)
    }

    pub async fn revoke_session(&self, token_id: &str) {
        let mut sessions = self.sessions.write().await;
        sessions.remove(token_id);
    }

    pub async fn cleanup_expired(&self) {
        let mut sessions = self.sessions.write().await;
        let now = SystemTime::now();

        sessions.retain(|_, session| session.expires_at > now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn insert_expired(cache: &SessionCache, user_id: i64) -> String {
        let token_id = Uuid::new_v4().to_string();
        let mut sessions = cache.sessions.write().await;
        sessions.insert(
            token_id.clone(),
            SessionToken {
                user_id,
                expires_at: SystemTime::now() - Duration::from_secs(1),
            },
        );
        token_id
    }

    #[tokio::test]
    async fn test_create_and_verify_session() {
        let cache = SessionCache::new();
        let token = cache.create_session(123).await;

        assert_eq!(cache.verify_session(&token).await, Ok(123));
    }

    #[tokio::test]
    async fn test_invalid_session() {
        let cache = SessionCache::new();
        assert!(cache.verify_session("invalid-token").await.is_err());
    }

    #[tokio::test]
    async fn test_revoke_session() {
        let cache = SessionCache::new();
        let token = cache.create_session(123).await;

        assert!(cache.verify_session(&token).await.is_ok());

        cache.revoke_session(&token).await;

        assert!(cache.verify_session(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected() {
        let cache = SessionCache::new();
        let token = insert_expired(&cache, 123).await;

        assert!(cache.verify_session(&token).await.is_err());
    }

    #[tokio::test]
    async fn test_cleanup_drops_only_expired_sessions() {
        let cache = SessionCache::new();
        let valid_token = cache.create_session(123).await;
        let expired_token = insert_expired(&cache, 456).await;

        cache.cleanup_expired().await;

        assert_eq!(cache.sessions.read().await.len(), 1);
        assert!(cache.verify_session(&valid_token).await.is_ok());
        assert!(cache.verify_session(&expired_token).await.is_err());
    }
}
