use aula_identity::domain::email::EmailRule;
use aula_identity::domain::types::{CODE_LEN, CodePurpose};
use aula_identity::error::IdentityError;
use aula_identity::usecase::verification::{
    ConfirmCodeInput, ConfirmCodeUseCase, RequestCodeInput, RequestVerificationCodeUseCase,
};

use crate::helpers::{MockMailer, MockUserStore, account_with_code, test_account};

// ── Code issuance ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_store_and_dispatch_code_for_unverified_account() {
    let store = MockUserStore::new(vec![test_account("ana.perez@alumnos.upm.es", "hash", false)]);
    let accounts = store.accounts_handle();
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();

    let uc = RequestVerificationCodeUseCase {
        store,
        mailer,
        email_rule: EmailRule::default(),
    };
    let out = uc
        .execute(RequestCodeInput {
            raw_email: "Ana.Perez".to_owned(),
        })
        .await
        .unwrap();

    assert_eq!(out.email, "ana.perez@alumnos.upm.es");
    assert_eq!(out.real_input, "ana.perez");

    let accounts = accounts.lock().unwrap();
    let code = accounts[0].code.as_deref().expect("code stored");
    assert_eq!(code.len(), CODE_LEN);
    assert!(accounts[0].code_issued_at.is_some(), "issuance timestamped");

    let sent = sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].email, "ana.perez@alumnos.upm.es");
    assert_eq!(sent[0].code, code);
    assert_eq!(sent[0].purpose, CodePurpose::Verification);
}

#[tokio::test]
async fn should_return_not_found_for_unknown_account() {
    let uc = RequestVerificationCodeUseCase {
        store: MockUserStore::empty(),
        mailer: MockMailer::new(),
        email_rule: EmailRule::default(),
    };
    let result = uc
        .execute(RequestCodeInput {
            raw_email: "nadie".to_owned(),
        })
        .await;
    assert!(matches!(result, Err(IdentityError::NotFound)));
}

#[tokio::test]
async fn should_refuse_issuance_for_verified_account() {
    let store = MockUserStore::new(vec![test_account("ana.perez@alumnos.upm.es", "hash", true)]);
    let accounts = store.accounts_handle();
    let mailer = MockMailer::new();
    let sent = mailer.sent_handle();

    let uc = RequestVerificationCodeUseCase {
        store,
        mailer,
        email_rule: EmailRule::default(),
    };
    let result = uc
        .execute(RequestCodeInput {
            raw_email: "ana.perez".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::AlreadyVerified)));
    assert!(accounts.lock().unwrap()[0].code.is_none(), "no code stored");
    assert!(sent.lock().unwrap().is_empty(), "nothing dispatched");
}

#[tokio::test]
async fn should_keep_stored_code_when_dispatch_fails() {
    let store = MockUserStore::new(vec![test_account("ana.perez@alumnos.upm.es", "hash", false)]);
    let accounts = store.accounts_handle();

    let uc = RequestVerificationCodeUseCase {
        store,
        mailer: MockMailer::failing(),
        email_rule: EmailRule::default(),
    };
    let result = uc
        .execute(RequestCodeInput {
            raw_email: "ana.perez".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::DeliveryFailed)));
    // No rollback: the code stays usable for a later resend.
    assert!(accounts.lock().unwrap()[0].code.is_some());
}

#[tokio::test]
async fn reissuing_overwrites_the_previous_code() {
    let store = MockUserStore::new(vec![account_with_code(
        "ana.perez@alumnos.upm.es",
        "OLDCODE1",
    )]);
    let accounts = store.accounts_handle();

    let uc = RequestVerificationCodeUseCase {
        store,
        mailer: MockMailer::new(),
        email_rule: EmailRule::default(),
    };
    uc.execute(RequestCodeInput {
        raw_email: "ana.perez".to_owned(),
    })
    .await
    .unwrap();

    let accounts = accounts.lock().unwrap();
    assert_ne!(accounts[0].code.as_deref(), Some("OLDCODE1"));
}

// ── Code confirmation ────────────────────────────────────────────────────────

#[tokio::test]
async fn should_flip_verified_on_exact_code_match() {
    let store = MockUserStore::new(vec![account_with_code(
        "ana.perez@alumnos.upm.es",
        "AB12CD34",
    )]);
    let accounts = store.accounts_handle();

    let uc = ConfirmCodeUseCase {
        store,
        email_rule: EmailRule::default(),
    };
    uc.execute(ConfirmCodeInput {
        raw_email: "Ana.Perez".to_owned(),
        submitted_code: "AB12CD34".to_owned(),
    })
    .await
    .unwrap();

    assert!(accounts.lock().unwrap()[0].verified);
}

#[tokio::test]
async fn should_reject_mismatched_code_and_leave_state_unchanged() {
    let store = MockUserStore::new(vec![account_with_code(
        "ana.perez@alumnos.upm.es",
        "AB12CD34",
    )]);
    let accounts = store.accounts_handle();

    let uc = ConfirmCodeUseCase {
        store,
        email_rule: EmailRule::default(),
    };
    let result = uc
        .execute(ConfirmCodeInput {
            raw_email: "ana.perez".to_owned(),
            submitted_code: "WRONGCODE".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::CodeMismatch)));
    let accounts = accounts.lock().unwrap();
    assert!(!accounts[0].verified, "verified flag untouched");
    assert_eq!(accounts[0].code.as_deref(), Some("AB12CD34"));
}

#[tokio::test]
async fn should_return_not_found_when_no_code_is_stored() {
    let store = MockUserStore::new(vec![test_account("ana.perez@alumnos.upm.es", "hash", false)]);

    let uc = ConfirmCodeUseCase {
        store,
        email_rule: EmailRule::default(),
    };
    let result = uc
        .execute(ConfirmCodeInput {
            raw_email: "ana.perez".to_owned(),
            submitted_code: "AB12CD34".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::NotFound)));
}

#[tokio::test]
async fn confirmation_is_case_sensitive() {
    let store = MockUserStore::new(vec![account_with_code(
        "ana.perez@alumnos.upm.es",
        "AB12CD34",
    )]);

    let uc = ConfirmCodeUseCase {
        store,
        email_rule: EmailRule::default(),
    };
    let result = uc
        .execute(ConfirmCodeInput {
            raw_email: "ana.perez".to_owned(),
            submitted_code: "ab12cd34".to_owned(),
        })
        .await;

    assert!(matches!(result, Err(IdentityError::CodeMismatch)));
}
