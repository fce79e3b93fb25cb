use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role, persisted as a lowercase string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Alumno,
    Docente,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Alumno => "alumno",
            Self::Docente => "docente",
        }
    }

    /// Parse a persisted role string. Unknown values fall back to `Alumno`.
    pub fn parse(value: &str) -> Self {
        match value {
            "docente" => Self::Docente,
            _ => Self::Alumno,
        }
    }
}

/// Portal user account as seen by the workflows.
#[derive(Debug, Clone)]
pub struct UserAccount {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub verified: bool,
    /// Single code slot shared by verification and reset issuance.
    pub code: Option<String>,
    pub code_issued_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// Server-side session bound to an authenticated user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: Uuid,
    pub payload: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Utc::now()
    }
}

/// What a one-time code was issued for; selects the mail template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodePurpose {
    Verification,
    PasswordReset,
}

/// Result of one atomic counter bump in the rate limiter's store.
#[derive(Debug, Clone, Copy)]
pub struct Attempts {
    pub count: u64,
    /// Seconds until the counter's window expires.
    pub retry_secs: u64,
}

/// One-time code length in characters.
pub const CODE_LEN: usize = 8;

/// Opaque session token length in characters.
pub const SESSION_TOKEN_LEN: usize = 64;

/// Session time-to-live in the production profile (one week).
pub const SESSION_TTL_PRODUCTION_SECS: i64 = 604_800;

/// Session time-to-live in the development profile (4 hours).
pub const SESSION_TTL_DEVELOPMENT_SECS: i64 = 14_400;
