use sea_orm::DatabaseConnection;
use serde_json::Value;
use uuid::Uuid;

use crate::cookie::CookiePolicy;
use crate::crypto::Argon2Hasher;
use crate::domain::email::EmailRule;
use crate::domain::repository::SessionStore;
use crate::domain::types::Session;
use crate::error::IdentityError;
use crate::infra::cache::RedisSessionStore;
use crate::infra::db::{DbSessionStore, DbUserStore};
use crate::infra::mailer::HttpMailer;
use crate::rate_limit::RateLimiter;

/// Session backend selected once at startup from the deployment profile:
/// durable rows in one mode, the cache in the other. Request handling only
/// ever sees this enum.
#[derive(Clone)]
pub enum SessionBackend {
    Db(DbSessionStore),
    Redis(RedisSessionStore),
}

impl SessionStore for SessionBackend {
    async fn create(&self, user_id: Uuid, payload: Value) -> Result<Session, IdentityError> {
        match self {
            Self::Db(store) => store.create(user_id, payload).await,
            Self::Redis(store) => store.create(user_id, payload).await,
        }
    }

    async fn destroy(&self, session_id: &str) -> Result<(), IdentityError> {
        match self {
            Self::Db(store) => store.destroy(session_id).await,
            Self::Redis(store) => store.destroy(session_id).await,
        }
    }

    async fn load(&self, session_id: &str) -> Result<Option<Session>, IdentityError> {
        match self {
            Self::Db(store) => store.load(session_id).await,
            Self::Redis(store) => store.load(session_id).await,
        }
    }
}

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub sessions: SessionBackend,
    pub limiter: RateLimiter,
    pub mailer: HttpMailer,
    pub hasher: Argon2Hasher,
    pub email_rule: EmailRule,
    pub cookie: CookiePolicy,
}

impl AppState {
    pub fn user_store(&self) -> DbUserStore {
        DbUserStore {
            db: self.db.clone(),
        }
    }
}
