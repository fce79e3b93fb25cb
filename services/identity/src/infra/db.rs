use anyhow::Context as _;
use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    sea_query::Expr,
};
use serde_json::Value;
use uuid::Uuid;

use aula_identity_schema::{sessions, users};

use crate::crypto::generate_session_token;
use crate::domain::repository::{SessionStore, UserStore};
use crate::domain::types::{Role, Session, UserAccount};
use crate::error::IdentityError;

// ── User store ───────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserStore {
    pub db: DatabaseConnection,
}

impl UserStore for DbUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserAccount>, IdentityError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find user by email")?;
        Ok(model.map(account_from_model))
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
        users::ActiveModel {
            id: Set(account.id),
            username: Set(account.username.clone()),
            email: Set(account.email.clone()),
            password: Set(account.password_hash.clone()),
            role: Set(account.role.as_str().to_owned()),
            verified: Set(false),
            code: Set(None),
            code_issued_at: Set(None),
            created_at: Set(account.created_at),
        }
        .insert(&self.db)
        .await
        .context("create user")?;
        Ok(account)
    }

    async fn set_code(&self, email: &str, code: &str) -> Result<(), IdentityError> {
        users::Entity::update_many()
            .col_expr(users::Column::Code, Expr::value(Some(code.to_owned())))
            .col_expr(
                users::Column::CodeIssuedAt,
                Expr::value(Some(Utc::now())),
            )
            .filter(users::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .context("set code")?;
        Ok(())
    }

    async fn get_code(&self, email: &str) -> Result<Option<String>, IdentityError> {
        let model = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("get code")?;
        Ok(model.and_then(|m| m.code))
    }

    async fn set_password(&self, email: &str, password_hash: &str) -> Result<(), IdentityError> {
        users::Entity::update_many()
            .col_expr(
                users::Column::Password,
                Expr::value(password_hash.to_owned()),
            )
            .filter(users::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .context("set password")?;
        Ok(())
    }

    async fn mark_verified(&self, email: &str) -> Result<(), IdentityError> {
        users::Entity::update_many()
            .col_expr(users::Column::Verified, Expr::value(true))
            .filter(users::Column::Email.eq(email))
            .exec(&self.db)
            .await
            .context("mark verified")?;
        Ok(())
    }
}

fn account_from_model(model: users::Model) -> UserAccount {
    UserAccount {
        id: model.id,
        username: model.username,
        email: model.email,
        password_hash: model.password,
        role: Role::parse(&model.role),
        verified: model.verified,
        code: model.code,
        code_issued_at: model.code_issued_at,
        created_at: model.created_at,
    }
}

// ── Durable session store ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSessionStore {
    pub db: DatabaseConnection,
    pub ttl_secs: i64,
}

impl SessionStore for DbSessionStore {
    async fn create(&self, user_id: Uuid, payload: Value) -> Result<Session, IdentityError> {
        let now = Utc::now();
        let session = Session {
            id: generate_session_token(),
            user_id,
            payload,
            created_at: now,
            expires_at: now + Duration::seconds(self.ttl_secs),
        };
        sessions::ActiveModel {
            id: Set(session.id.clone()),
            user_id: Set(session.user_id),
            payload: Set(session.payload.clone()),
            created_at: Set(session.created_at),
            expires_at: Set(session.expires_at),
        }
        .insert(&self.db)
        .await
        .context("create session")?;
        Ok(session)
    }

    async fn destroy(&self, session_id: &str) -> Result<(), IdentityError> {
        sessions::Entity::delete_by_id(session_id.to_owned())
            .exec(&self.db)
            .await
            .context("destroy session")?;
        Ok(())
    }

    async fn load(&self, session_id: &str) -> Result<Option<Session>, IdentityError> {
        let model = sessions::Entity::find_by_id(session_id.to_owned())
            .one(&self.db)
            .await
            .context("load session")?;
        let session = model.map(session_from_model);
        // An expired row is treated as absent; cleanup is left to the
        // expiry index + periodic sweeps, not the read path.
        Ok(session.filter(|s| !s.is_expired()))
    }
}

fn session_from_model(model: sessions::Model) -> Session {
    Session {
        id: model.id,
        user_id: model.user_id,
        payload: model.payload,
        created_at: model.created_at,
        expires_at: model.expires_at,
    }
}
