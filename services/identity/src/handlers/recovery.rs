use axum::{Json, extract::State, http::HeaderMap, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::IdentityError;
use crate::rate_limit::GuardedEndpoint;
use crate::state::AppState;
use crate::usecase::recovery::{ConfirmResetInput, ConfirmResetUseCase, RequestResetUseCase};
use crate::usecase::verification::RequestCodeInput;

use super::client_ip;
use super::verification::EmailRequest;

pub async fn request_reset(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<EmailRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    state
        .limiter
        .guard(GuardedEndpoint::ResetRequest, &client_ip(&headers))
        .await?;

    let usecase = RequestResetUseCase {
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
pub struct ConfirmResetRequest {
    pub email: String,
    pub codigo: String,
    pub password: String,
}

pub async fn confirm_reset(
    State(state): State<AppState>,
    Json(body): Json<ConfirmResetRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = ConfirmResetUseCase {
        store: state.user_store(),
        hasher: state.hasher.clone(),
        email_rule: state.email_rule.clone(),
    };
    usecase
        .execute(ConfirmResetInput {
            raw_email: body.email,
            submitted_code: body.codigo,
            new_password: body.password,
        })
        .await?;

    Ok(Json(json!({ "message": "contrasena cambiada" })))
}
