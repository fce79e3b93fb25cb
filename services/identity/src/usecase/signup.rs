use crate::crypto::PasswordHasher;
use crate::domain::email::EmailRule;
use crate::domain::repository::UserStore;
use crate::domain::types::Role;
use crate::error::IdentityError;

pub struct SignupInput {
    pub name: String,
    pub raw_email: String,
    pub password: String,
}

#[derive(Debug)]
pub struct SignupOutput {
    /// Canonical institutional address the account was created under.
    pub email: String,
    /// Lowercased raw input, echoed back by the legacy API.
    pub real_input: String,
}

pub struct SignupUseCase<S, H>
where
    S: UserStore,
    H: PasswordHasher,
{
    pub store: S,
    pub hasher: H,
    pub email_rule: EmailRule,
}

impl<S, H> SignupUseCase<S, H>
where
    S: UserStore,
    H: PasswordHasher,
{
    pub async fn execute(&self, input: SignupInput) -> Result<SignupOutput, IdentityError> {
        let real_input = EmailRule::normalize(&input.raw_email);
        let email = self.email_rule.canonicalize(&input.raw_email);

        // 1. Duplicate check: a verified account wins the address outright;
        //    an unverified one is told to finish verification instead.
        if let Some(existing) = self.store.find_by_email(&email).await? {
            return if existing.verified {
                Err(IdentityError::AlreadyExists)
            } else {
                Err(IdentityError::PendingVerification)
            };
        }

        // 2. Hash and create the unverified account.
        let password_hash = self.hasher.hash(&input.password)?;
        self.store
            .create(&input.name, &email, &password_hash, Role::Alumno)
            .await?;

        Ok(SignupOutput { email, real_input })
    }
}
