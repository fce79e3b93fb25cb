use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{Duration, Utc};
use serde_json::Value;
use uuid::Uuid;

use aula_identity::crypto::generate_session_token;
use aula_identity::domain::repository::{CodeMailer, SessionStore, UserStore};
use aula_identity::domain::types::{CodePurpose, Role, Session, UserAccount};
use aula_identity::error::IdentityError;

// ── MockUserStore ────────────────────────────────────────────────────────────

pub struct MockUserStore {
    pub accounts: Arc<Mutex<Vec<UserAccount>>>,
}

impl MockUserStore {
    pub fn new(accounts: Vec<UserAccount>) -> Self {
        Self {
            accounts: Arc::new(Mutex::new(accounts)),
        }
    }

    pub fn empty() -> Self {
        Self::new(vec![])
    }

    /// Shared handle to the account list for post-execution inspection.
    pub fn accounts_handle(&self) -> Arc<Mutex<Vec<UserAccount>>> {
        Arc::clone(&self.accounts)
    }
}

impl UserStore for MockUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, IdentityError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .cloned())
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: Role,
    ) -> Result<UserAccount, IdentityError> {
        let account = UserAccount {
            id: Uuid::now_v7(),
            username: username.to_owned(),
            email: email.to_owned(),
            password_hash: password_hash.to_owned(),
            role,
            verified: false,
            code: None,
            code_issued_at: None,
            created_at: Utc::now(),
        };
        self.accounts.lock().unwrap().push(account.clone());
        Ok(account)
    }

    async fn set_code(&self, email: &str, code: &str) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.email == email) {
            account.code = Some(code.to_owned());
            account.code_issued_at = Some(Utc::now());
        }
        Ok(())
    }

    async fn get_code(&self, email: &str) -> Result<Option<String>, IdentityError> {
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.email == email)
            .and_then(|a| a.code.clone()))
    }

    async fn set_password(&self, email: &str, password_hash: &str) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.email == email) {
            account.password_hash = password_hash.to_owned();
        }
        Ok(())
    }

    async fn mark_verified(&self, email: &str) -> Result<(), IdentityError> {
        let mut accounts = self.accounts.lock().unwrap();
        if let Some(account) = accounts.iter_mut().find(|a| a.email == email) {
            account.verified = true;
        }
        Ok(())
    }
}

// ── MockSessionStore ─────────────────────────────────────────────────────────

pub struct MockSessionStore {
    pub sessions: Arc<Mutex<HashMap<String, Session>>>,
    pub ttl_secs: i64,
}

impl MockSessionStore {
    pub fn new() -> Self {
        Self {
            sessions: Arc::new(Mutex::new(HashMap::new())),
            ttl_secs: 3600,
        }
    }

    pub fn sessions_handle(&self) -> Arc<Mutex<HashMap<String, Session>>> {
        Arc::clone(&self.sessions)
    }
}

impl SessionStore for MockSessionStore {
    async fn create(&self, user_id: Uuid, payload: Value) -> Result<Session, IdentityError> {
        let now = Utc::now();
        let session = Session {
            id: generate_session_token(),
            user_id,
            payload,
            created_at: now,
            expires_at: now + Duration::seconds(self.ttl_secs),
        };
        self.sessions
            .lock()
            .unwrap()
            .insert(session.id.clone(), session.clone());
        Ok(session)
    }

    async fn destroy(&self, session_id: &str) -> Result<(), IdentityError> {
        self.sessions.lock().unwrap().remove(session_id);
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Session>, IdentityError> {
        Ok(self
            .sessions
            .lock()
            .unwrap()
            .get(session_id)
            .filter(|s| !s.is_expired())
            .cloned())
    }
}

// ── MockMailer ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct SentCode {
    pub email: String,
    pub code: String,
    pub purpose: CodePurpose,
}

pub struct MockMailer {
    pub sent: Arc<Mutex<Vec<SentCode>>>,
    pub fail: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: false,
        }
    }

    /// A mailer whose relay never confirms delivery.
    pub fn failing() -> Self {
        Self {
            sent: Arc::new(Mutex::new(vec![])),
            fail: true,
        }
    }

    pub fn sent_handle(&self) -> Arc<Mutex<Vec<SentCode>>> {
        Arc::clone(&self.sent)
    }
}

impl CodeMailer for MockMailer {
    async fn send_code(
        &self,
        email: &str,
        code: &str,
        purpose: CodePurpose,
    ) -> Result<(), IdentityError> {
        if self.fail {
            return Err(IdentityError::DeliveryFailed);
        }
        self.sent.lock().unwrap().push(SentCode {
            email: email.to_owned(),
            code: code.to_owned(),
            purpose,
        });
        Ok(())
    }
}

// ── Test fixture helpers ─────────────────────────────────────────────────────

pub fn test_account(email: &str, password_hash: &str, verified: bool) -> UserAccount {
    UserAccount {
        id: Uuid::parse_str("00000000-0000-0000-0000-000000000001").unwrap(),
        username: "Ana".to_owned(),
        email: email.to_owned(),
        password_hash: password_hash.to_owned(),
        role: Role::Alumno,
        verified,
        code: None,
        code_issued_at: None,
        created_at: Utc::now(),
    }
}

pub fn account_with_code(email: &str, code: &str) -> UserAccount {
    let mut account = test_account(email, "unused-hash", false);
    account.code = Some(code.to_owned());
    account.code_issued_at = Some(Utc::now());
    account
}
