use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::IdentityError;
use crate::rate_limit::GuardedEndpoint;
use crate::state::AppState;
use crate::usecase::verification::{
    ConfirmCodeInput, ConfirmCodeUseCase, RequestCodeInput, RequestVerificationCodeUseCase,
};

use super::client_ip;

#[derive(Deserialize)]
pub struct EmailRequest {
    pub email: String,
}

pub async fn request_verification_code(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<EmailRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    state
        .limiter
        .guard(GuardedEndpoint::VerificationRequest, &client_ip(&headers))
        .await?;

    let usecase = RequestVerificationCodeUseCase {
        store: state.user_store(),
        mailer: state.mailer.clone(),
        email_rule: state.email_rule.clone(),
    };
    let out = usecase
        .execute(RequestCodeInput {
            raw_email: body.email,
        })
        .await?;

    Ok(Json(json!({
        "message": "succesfully sent email",
        "email": out.email,
        "realInput": out.real_input,
    })))
}

#[derive(Deserialize)]
pub struct ConfirmCodeRequest {
    pub email: String,
    pub codigo: String,
}

pub async fn confirm_code(
    State(state): State<AppState>,
    Json(body): Json<ConfirmCodeRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = ConfirmCodeUseCase {
        store: state.user_store(),
        email_rule: state.email_rule.clone(),
    };
    usecase
        .execute(ConfirmCodeInput {
            raw_email: body.email,
            submitted_code: body.codigo,
        })
        .await?;

    Ok(Json(json!({ "message": "mail validated" })))
}
