#![allow(async_fn_in_trait)]

use serde_json::Value;
use uuid::Uuid;

use crate::domain::types::{Attempts, CodePurpose, Role, Session, UserAccount};
use crate::error::IdentityError;

/// Store of user accounts, keyed by canonical email.
///
/// Field updates are idempotent overwrites; a lookup miss is `Ok(None)`,
/// never an error.
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, IdentityError>;

    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<UserAccount, IdentityError>;

    /// Overwrite the account's code slot and stamp the issuance time.
    async fn set_code(&self, email: &str, code: &str) -> Result<(), IdentityError>;

    /// `None` when the account does not exist or has no stored code.
    async fn get_code(&self, email: &str) -> Result<Option<String>, IdentityError>;

    async fn set_password(&self, email: &str, password_hash: &str) -> Result<(), IdentityError>;

    async fn mark_verified(&self, email: &str) -> Result<(), IdentityError>;
}

/// Authority over server-side sessions. Expiry is fixed at creation; only
/// a fresh login re-issues.
pub trait SessionStore: Send + Sync {
    async fn create(&self, user_id: Uuid, payload: Value) -> Result<Session, IdentityError>;

    async fn destroy(&self, session_id: &str) -> Result<(), IdentityError>;

    /// `None` when the session is missing or past its expiry.
    async fn load(&self, session_id: &str) -> Result<Option<Session>, IdentityError>;
}

/// External messaging collaborator that delivers one-time codes.
pub trait CodeMailer: Send + Sync {
    /// Errors with `IdentityError::DeliveryFailed` when the relay does not
    /// confirm delivery.
    async fn send_code(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), IdentityError>;
}

/// Counter store backing the rate limiter. `increment` must be an atomic
/// read-modify-write so concurrent attempts from one key are not undercounted.
pub trait AttemptCounterStore: Send + Sync {
    /// Bump the counter for `key`, starting a window of `window_secs` on
    /// first use, and report the running count plus seconds left in the window.
    async fn increment(&self, key: &str, window_secs: u64) -> Result<Attempts, IdentityError>;
}
