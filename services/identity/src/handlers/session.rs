use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Redirect},
};
use axum_extra::extract::CookieJar;
use serde::Deserialize;
use serde_json::json;

use crate::cookie::{AULA_SESSION, clear_session_cookie, set_session_cookie};
use crate::domain::repository::SessionStore as _;
use crate::error::IdentityError;
use crate::rate_limit::GuardedEndpoint;
use crate::state::AppState;
use crate::usecase::login::{LoginInput, LoginUseCase};

use super::client_ip;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    jar: CookieJar,
    Json(body): Json<LoginRequest>,
) -> Result<impl IntoResponse, IdentityError> {
    state
        .limiter
        .guard(GuardedEndpoint::Login, &client_ip(&headers))
        .await?;

    let previous_session_id = jar.get(AULA_SESSION).map(|c| c.value().to_owned());

    let usecase = LoginUseCase {
        users: state.user_store(),
        hasher: state.hasher.clone(),
        sessions: state.sessions.clone(),
        email_rule: state.email_rule.clone(),
    };
    let out = usecase
        .execute(LoginInput {
            raw_email: body.email,
            password: body.password,
            previous_session_id,
        })
        .await?;

    let jar = set_session_cookie(jar, out.session.id, &state.cookie);
    Ok((
        StatusCode::OK,
        jar,
        Json(json!({ "message": "Login successful" })),
    ))
}

pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<impl IntoResponse, IdentityError> {
    if let Some(cookie) = jar.get(AULA_SESSION) {
        state.sessions.destroy(cookie.value()).await?;
    }
    let jar = clear_session_cookie(jar, &state.cookie);
    Ok((jar, Redirect::to("/login")))
}
