use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use serde_json::json;

use crate::error::IdentityError;
use crate::state::AppState;
use crate::usecase::signup::{SignupInput, SignupUseCase};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    let usecase = SignupUseCase {
        store: state.user_store(),
        hasher: state.hasher.clone(),
        email_rule: state.email_rule.clone(),
    };
    let out = usecase
        .execute(SignupInput {
            name: body.name,
            raw_email: body.email,
            password: body.password,
        })
        .await?;

    // The legacy contract echoes the raw (lowercased) input, not the
    // canonical address.
    Ok((
        StatusCode::OK,
        Json(json!({
            "message": "Signup successful",
            "email": out.real_input,
        })),
    ))
}
