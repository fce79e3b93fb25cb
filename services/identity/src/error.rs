use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};

/// Identity service domain error variants.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("account already exists")]
    AlreadyExists,
    #[error("account exists but is unverified")]
    PendingVerification,
    #[error("account not found")]
    NotFound,
    #[error("account already verified")]
    AlreadyVerified,
    #[error("code mismatch")]
    CodeMismatch,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("code delivery failed")]
    DeliveryFailed,
    #[error("rate limited")]
    RateLimited { retry_secs: u64 },
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl IdentityError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AlreadyExists => "ALREADY_EXISTS",
            Self::PendingVerification => "PENDING_VERIFICATION",
            Self::NotFound => "NOT_FOUND",
            Self::AlreadyVerified => "ALREADY_VERIFIED",
            Self::CodeMismatch => "CODE_MISMATCH",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::DeliveryFailed => "DELIVERY_FAILED",
            Self::RateLimited { .. } => "RATE_LIMITED",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// User-facing message, localized to match the legacy portal contract.
    pub fn client_message(&self) -> &'static str {
        match self {
            Self::AlreadyExists => "Usuario ya existe",
            Self::PendingVerification => "Usuario ya existe, ¡falta validación!",
            Self::NotFound => "El usuario no existe",
            Self::AlreadyVerified => "Ya se ha verificado",
            Self::CodeMismatch => "Código incorrecto",
            Self::InvalidCredentials => "Email o contraseña incorrectos",
            Self::DeliveryFailed => "No se pudo enviar el correo, vuelve a intentarlo",
            Self::RateLimited { .. } => "Bloqueado",
            Self::Internal(_) => "Algo fue mal, vuelve a intentarlo más tarde!",
        }
    }
}

impl IntoResponse for IdentityError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::AlreadyExists
            | Self::PendingVerification
            | Self::NotFound
            | Self::AlreadyVerified
            | Self::CodeMismatch => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::DeliveryFailed => StatusCode::BAD_GATEWAY,
            Self::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        // Log 500s only — tower-http TraceLayer already records method/uri/status
        // for all requests; 4xx are expected client errors. Internal errors need
        // the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        let body = serde_json::json!({
            "message": self.client_message(),
        });
        let mut response = (status, axum::Json(body)).into_response();
        if let Self::RateLimited { retry_secs } = self {
            response.headers_mut().insert(
                header::RETRY_AFTER,
                HeaderValue::from_str(&retry_secs.to_string()).unwrap(),
            );
        }
        response
    }
}
