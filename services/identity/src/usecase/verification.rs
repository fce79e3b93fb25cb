use crate::crypto::generate_code;
use crate::domain::email::EmailRule;
use crate::domain::repository::{CodeMailer, UserStore};
use crate::domain::types::CodePurpose;
use crate::error::IdentityError;

pub struct RequestCodeInput {
    pub raw_email: String,
}

#[derive(Debug)]
pub struct RequestCodeOutput {
    pub email: String,
    pub real_input: String,
}

// ── RequestVerificationCode ──────────────────────────────────────────────────

pub struct RequestVerificationCodeUseCase<S, M>
where
    S: UserStore,
    M: CodeMailer,
{
    pub store: S,
    pub mailer: M,
    pub email_rule: EmailRule,
}

impl<S, M> RequestVerificationCodeUseCase<S, M>
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

        // 1. The account must exist and still be unverified.
        let account = self
            .store
            .find_by_email(&email)
            .await?
            .ok_or(IdentityError::NotFound)?;
        if account.verified {
            return Err(IdentityError::AlreadyVerified);
        }

        // 2. Store the code before dispatch: if the mail relay fails the
        //    code stays valid for a resend, nothing is rolled back.
        let code = generate_code();
        self.store.set_code(&email, &code).await?;

        self.mailer
            .send_code(&email, &code, CodePurpose::Verification)
            .await?;

        Ok(RequestCodeOutput { email, real_input })
    }
}

// ── ConfirmCode ──────────────────────────────────────────────────────────────

pub struct ConfirmCodeInput {
    pub raw_email: String,
    pub submitted_code: String,
}

pub struct ConfirmCodeUseCase<S>
where
    S: UserStore,
{
    pub store: S,
    pub email_rule: EmailRule,
}

impl<S> ConfirmCodeUseCase<S>
where
    S: UserStore,
{
    pub async fn execute(&self, input: ConfirmCodeInput) -> Result<(), IdentityError> {
        let email = self.email_rule.canonicalize(&input.raw_email);

        let stored = self
            .store
            .get_code(&email)
            .await?
            .ok_or(IdentityError::NotFound)?;

        // Exact string equality; the code slot is left in place after a
        // match — re-issuance for a verified account is stopped by the
        // issuance guard, not by clearing the slot.
        if stored != input.submitted_code {
            return Err(IdentityError::CodeMismatch);
        }

        self.store.mark_verified(&email).await
    }
}
