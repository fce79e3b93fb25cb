use serde_json::json;
use uuid::Uuid;

use aula_identity::crypto::{Argon2Hasher, PasswordHasher as _};
use aula_identity::domain::email::EmailRule;
use aula_identity::domain::repository::SessionStore;
use aula_identity::domain::types::SESSION_TOKEN_LEN;
use aula_identity::error::IdentityError;
use aula_identity::usecase::login::{LoginInput, LoginUseCase};

use crate::helpers::{MockSessionStore, MockUserStore, test_account};

fn login_usecase(
    store: MockUserStore,
    sessions: MockSessionStore,
) -> LoginUseCase<MockUserStore, Argon2Hasher, MockSessionStore> {
    LoginUseCase {
        users: store,
        hasher: Argon2Hasher,
        sessions,
        email_rule: EmailRule::default(),
    }
}

#[tokio::test]
async fn should_create_session_for_correct_credentials() {
    let hash = Argon2Hasher.hash("p1").unwrap();
    let account = test_account("ana.perez@alumnos.upm.es", &hash, true);
    let user_id = account.id;

    let sessions = MockSessionStore::new();
    let sessions_handle = sessions.sessions_handle();
    let uc = login_usecase(MockUserStore::new(vec![account]), sessions);

    let out = uc
        .execute(LoginInput {
            raw_email: "Ana.Perez".to_owned(),
            password: "p1".to_owned(),
            previous_session_id: None,
        })
        .await
        .unwrap();

    assert_eq!(out.session.user_id, user_id);
    assert_eq!(out.session.id.len(), SESSION_TOKEN_LEN);
    assert!(out.session.expires_at > out.session.created_at);

    let sessions = sessions_handle.lock().unwrap();
    assert!(sessions.contains_key(&out.session.id), "session persisted");
}

#[tokio::test]
async fn unverified_account_can_still_log_in() {
    // Login does not consult the verified flag; this pins the legacy
    // behavior rather than assuming a stricter gate.
    let hash = Argon2Hasher.hash("p1").unwrap();
    let account = test_account("ana.perez@alumnos.upm.es", &hash, false);

    let uc = login_usecase(MockUserStore::new(vec![account]), MockSessionStore::new());
    let result = uc
        .execute(LoginInput {
            raw_email: "ana.perez".to_owned(),
            password: "p1".to_owned(),
            previous_session_id: None,
        })
        .await;

    assert!(result.is_ok(), "unverified login must succeed: {result:?}");
}

#[tokio::test]
async fn wrong_password_and_unknown_user_are_indistinguishable() {
    let hash = Argon2Hasher.hash("p1").unwrap();
    let account = test_account("ana.perez@alumnos.upm.es", &hash, true);
    let uc = login_usecase(MockUserStore::new(vec![account]), MockSessionStore::new());

    let wrong_password = uc
        .execute(LoginInput {
            raw_email: "ana.perez".to_owned(),
            password: "nope".to_owned(),
            previous_session_id: None,
        })
        .await;
    let unknown_user = uc
        .execute(LoginInput {
            raw_email: "nadie".to_owned(),
            password: "p1".to_owned(),
            previous_session_id: None,
        })
        .await;

    assert!(matches!(
        wrong_password,
        Err(IdentityError::InvalidCredentials)
    ));
    assert!(matches!(
        unknown_user,
        Err(IdentityError::InvalidCredentials)
    ));
}

#[tokio::test]
async fn login_regenerates_the_session_identifier() {
    let hash = Argon2Hasher.hash("p1").unwrap();
    let account = test_account("ana.perez@alumnos.upm.es", &hash, true);

    let sessions = MockSessionStore::new();
    let sessions_handle = sessions.sessions_handle();
    let previous = sessions.create(account.id, json!({})).await.unwrap();

    let uc = login_usecase(MockUserStore::new(vec![account]), sessions);
    let out = uc
        .execute(LoginInput {
            raw_email: "ana.perez".to_owned(),
            password: "p1".to_owned(),
            previous_session_id: Some(previous.id.clone()),
        })
        .await
        .unwrap();

    assert_ne!(out.session.id, previous.id, "fresh id on every login");
    let sessions = sessions_handle.lock().unwrap();
    assert!(
        !sessions.contains_key(&previous.id),
        "old session destroyed"
    );
    assert!(sessions.contains_key(&out.session.id));
}

#[tokio::test]
async fn sessions_for_the_same_user_can_coexist() {
    let store = MockSessionStore::new();
    let user_id = Uuid::now_v7();

    let first = store.create(user_id, json!({})).await.unwrap();
    let second = store.create(user_id, json!({})).await.unwrap();

    assert_ne!(first.id, second.id);
    assert!(store.load(&first.id).await.unwrap().is_some());
    assert!(store.load(&second.id).await.unwrap().is_some());
}

#[tokio::test]
async fn destroyed_session_no_longer_loads() {
    let store = MockSessionStore::new();
    let session = store.create(Uuid::now_v7(), json!({})).await.unwrap();

    assert!(store.load(&session.id).await.unwrap().is_some());
    store.destroy(&session.id).await.unwrap();
    assert!(store.load(&session.id).await.unwrap().is_none());
}

#[tokio::test]
async fn expired_session_is_absent_on_load() {
    let store = MockSessionStore {
        sessions: std::sync::Arc::new(std::sync::Mutex::new(std::collections::HashMap::new())),
        ttl_secs: -1,
    };
    let session = store.create(Uuid::now_v7(), json!({})).await.unwrap();
    assert!(store.load(&session.id).await.unwrap().is_none());
}
