use serde_json::json;

use crate::domain::repository::CodeMailer;
use crate::domain::types::CodePurpose;
use crate::error::IdentityError;

impl CodePurpose {
    /// Mail template name understood by the relay.
    pub fn plantilla(self) -> &'static str {
        match self {
            Self::Verification => "correo_verificacion",
            Self::PasswordReset => "correo_recuperar_contrasena",
        }
    }
}

/// Code delivery through the portal's mail relay. The relay renders the
/// template and talks SMTP; this service only confirms the handoff.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    base_url: String,
}

impl HttpMailer {
    pub fn new(base_url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
        }
    }
}

impl CodeMailer for HttpMailer {
    async fn send_code(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), IdentityError> {
        let response = self
            .client
            .post(format!("{}/send", self.base_url))
            .json(&json!({
                "email": email,
                "codigo": code,
                "plantilla": purpose.plantilla(),
            }))
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "mail relay unreachable");
                IdentityError::DeliveryFailed
            })?;

        if !response.status().is_success() {
            tracing::warn!(status = %response.status(), "mail relay rejected send");
            return Err(IdentityError::DeliveryFailed);
        }
        Ok(())
    }
}
