use crate::auth::{LoginForm, SignupForm};
use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::{clear_token_cookie, token_cookie, AuthUser};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde_json::json;
use std::sync::Arc;
use usergate_common::models::account::PublicAccount;
use usergate_db::AccountRepo;

/// POST /auth/signup
#[tracing::instrument(skip(state, payload))]
pub async fn signup(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SignupForm>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(form) = payload?;
    let user = state.auth.signup(form).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({"message": "Signup success", "user": user})),
    ))
}

/// POST /auth/login
#[tracing::instrument(skip(state, payload))]
pub async fn login(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<LoginForm>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(form) = payload?;
    let outcome = state.auth.login(form).await?;
    tracing::info!(account_id = %outcome.account_id, "Login succeeded");

    let cookie = token_cookie(&outcome.token, state.config.auth.cookie_secure);
    Ok((
        [(header::SET_COOKIE, cookie)],
        Json(json!({
            "message": "Login success",
            "token": outcome.token,
            "user": outcome.user,
        })),
    ))
}

/// POST /auth/logout
pub async fn logout(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    (
        [(
            header::SET_COOKIE,
            clear_token_cookie(state.config.auth.cookie_secure),
        )],
        Json(json!({"message": "Logged out"})),
    )
}

/// GET /auth/me
#[tracing::instrument(skip(state))]
pub async fn me(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
) -> Result<Json<PublicAccount>, ApiError> {
    let account = AccountRepo::get_by_id(&state.pool, auth.account_id)
        .await
        .map_err(ApiError::from_store)?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(account.into()))
}
