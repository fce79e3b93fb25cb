use serde_json::json;

use crate::crypto::PasswordHasher;
use crate::domain::email::EmailRule;
use crate::domain::repository::{SessionStore, UserStore};
use crate::domain::types::Session;
use crate::error::IdentityError;

pub struct LoginInput {
    pub raw_email: String,
    pub password: String,
    /// Session id from the request's cookie, if any; destroyed on success
    /// so every login gets a fresh identifier.
    pub previous_session_id: Option<String>,
}

#[derive(Debug)]
pub struct LoginOutput {
    pub session: Session,
}

pub struct LoginUseCase<S, H, K>
where
    S: UserStore,
    H: PasswordHasher,
    K: SessionStore,
{
    pub users: S,
    pub hasher: H,
    pub sessions: K,
    pub email_rule: EmailRule,
}

impl<S, H, K> LoginUseCase<S, H, K>
where
    S: UserStore,
    H: PasswordHasher,
    K: SessionStore,
{
    pub async fn execute(&self, input: LoginInput) -> Result<LoginOutput, IdentityError> {
        let email = self.email_rule.canonicalize(&input.raw_email);

        // Unknown address and wrong password collapse into one variant so
        // the response never reveals which field was wrong.
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::InvalidCredentials)?;

        if !self.hasher.verify(&input.password, &user.password_hash)? {
            return Err(IdentityError::InvalidCredentials);
        }

        // The verified flag is not consulted here; unverified accounts can
        // log in (legacy behavior, kept deliberately).
        if let Some(previous) = &input.previous_session_id {
            self.sessions.destroy(previous).await?;
        }
        let session = self
            .sessions
            .create(user.id, json!({ "role": user.role.as_str() }))
            .await?;

        Ok(LoginOutput { session })
    }
}
