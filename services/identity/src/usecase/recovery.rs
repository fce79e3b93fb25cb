use crate::crypto::{PasswordHasher, generate_code};
use crate::domain::email::EmailRule;
use crate::domain::repository::{CodeMailer, UserStore};
use crate::domain::types::CodePurpose;
use crate::error::IdentityError;

use super::verification::{RequestCodeInput, RequestCodeOutput};

// ── RequestReset ─────────────────────────────────────────────────────────────

pub struct RequestResetUseCase<S, M>
where
    S: UserStore,
    M: CodeMailer,
{
    pub store: S,
    pub mailer: M,
    pub email_rule: EmailRule,
}

impl<S, M> RequestResetUseCase<S, M>
where
    S: UserStore,
    M: CodeMailer,
{
    pub async fn execute(
        &self,
        input: RequestCodeInput,
    ) -> Result<RequestCodeOutput, IdentityError> {
        let real_input = EmailRule::normalize(&input.raw_email);
        let email = self.email_rule.canonicalize(&input.raw_email);

        // Reset is available to any existing account, verified or not.
        self.store
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::NotFound)?;

        // Overwrites the single code slot, clobbering any pending
        // verification code for this account.
        let code = generate_code();
        self.store.set_code(&email, &code).await?;

        self.mailer
            .send_code(&email, &code, CodePurpose::PasswordReset)
            .await?;

        Ok(RequestCodeOutput { email, real_input })
    }
}

// ── ConfirmReset ─────────────────────────────────────────────────────────────

pub struct ConfirmResetInput {
    pub raw_email: String,
    pub submitted_code: String,
    pub new_password: String,
}

pub struct ConfirmResetUseCase<S, H>
where
    S: UserStore,
    H: PasswordHasher,
{
    pub store: S,
    pub hasher: H,
    pub email_rule: EmailRule,
}

impl<S, H> ConfirmResetUseCase<S, H>
where
    S: UserStore,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: ConfirmResetInput) -> Result<(), IdentityError> {
        let email = self.email_rule.canonicalize(&input.raw_email);

        let stored = self
            .store
            .get_code(&email)
            .await?
            .ok_or(IdentityError::NotFound)?;

        if stored != input.submitted_code {
            return Err(IdentityError::CodeMismatch);
        }

        // The verified flag is untouched; recovery only rotates the hash.
        let password_hash = self.hasher.hash(&input.new_password)?;
        self.store.set_password(&email, &password_hash).await
    }
}
