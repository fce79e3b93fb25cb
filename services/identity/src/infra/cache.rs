use chrono::{Duration, Utc};
use deadpool_redis::Pool;
use deadpool_redis::redis::AsyncCommands;
use serde_json::Value;
use uuid::Uuid;

use crate::crypto::generate_session_token;
use crate::domain::repository::{AttemptCounterStore, SessionStore};
use crate::domain::types::{Attempts, Session};
use crate::error::IdentityError;

fn session_key(session_id: &str) -> String {
    format!("session:{session_id}")
}

// ── Cache-backed session store ───────────────────────────────────────────────

#[derive(Clone)]
pub struct RedisSessionStore {
    pub pool: Pool,
    pub ttl_secs: i64,
}

impl SessionStore for RedisSessionStore {
    async fn create(&self, user_id: Uuid, payload: Value) -> Result<Session, IdentityError> {
        let now = Utc::now();
        let session = Session {
            id: generate_session_token(),
            user_id,
            payload,
            created_at: now,
            expires_at: now + Duration::seconds(self.ttl_secs),
        };
        let serialized = serde_json::to_string(&session)
            .map_err(|e| IdentityError::Internal(e.into()))?;

        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| IdentityError::Internal(e.into()))?;
        let (): () = conn
            .set_ex(session_key(&session.id), serialized, self.ttl_secs as u64)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| IdentityError::Internal(e.into()))?;
        Ok(session)
    }

    async fn destroy(&self, session_id: &str) -> Result<(), IdentityError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| IdentityError::Internal(e.into()))?;
        let (): () = conn
            .del(session_key(session_id))
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| IdentityError::Internal(e.into()))?;
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Session>, IdentityError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| IdentityError::Internal(e.into()))?;
        let value: Option<String> = conn
            .get(session_key(session_id))
            .await
            .map_err(|e| IdentityError::Internal(e.into()))?;
        match value {
            // The key TTL enforces expiry; a hit is always live.
            Some(serialized) => {
                let session = serde_json::from_str(&serialized)
                    .map_err(|e| IdentityError::Internal(anyhow::anyhow!("decode session: {e}")))?;
                Ok(Some(session))
            }
            None => Ok(None),
        }
    }
}

// ── Attempt counters ─────────────────────────────────────────────────────────

/// Redis-backed attempt counters. INCR is the atomic read-modify-write the
/// limiter relies on; the window is the key's TTL, set on first increment.
#[derive(Clone)]
pub struct RedisCounterStore {
    pub pool: Pool,
}

impl AttemptCounterStore for RedisCounterStore {
    async fn increment(&self, key: &str, window_secs: u64) -> Result<Attempts, IdentityError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|e| IdentityError::Internal(e.into()))?;
        let count: u64 = conn
            .incr(key, 1u64)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| IdentityError::Internal(e.into()))?;
        if count == 1 {
            let (): () = conn
                .expire(key, window_secs as i64)
                .await
                .map_err(|e: deadpool_redis::redis::RedisError| {
                    IdentityError::Internal(e.into())
                })?;
        }
        let ttl: i64 = conn
            .ttl(key)
            .await
            .map_err(|e: deadpool_redis::redis::RedisError| IdentityError::Internal(e.into()))?;
        Ok(Attempts {
            count,
            retry_secs: ttl.max(0) as u64,
        })
    }
}
