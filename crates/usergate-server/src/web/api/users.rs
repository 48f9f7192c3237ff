use crate::error::ApiError;
use crate::state::AppState;
use crate::web::api::middleware::AuthUser;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{HeaderName, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use usergate_common::models::account::PublicAccount;
use usergate_common::validation::{parse_email, require, FieldError};
use usergate_db::{is_unique_violation, AccountChanges, AccountRepo};
use uuid::Uuid;

const DEFAULT_PAGE_SIZE: i64 = 50;
const MAX_PAGE_SIZE: i64 = 200;

/// Total number of accounts, sent alongside every listing
pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");

#[derive(Debug, Deserialize)]
pub struct ListUsersQuery {
    pub search: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

fn parse_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::InvalidId)
}

/// Check a partial update without touching the store. The new password, if
/// any, is returned separately so it is only hashed for an existing account.
fn validate_update(req: &UpdateUserRequest) -> Result<(AccountChanges, Option<&str>), ApiError> {
    let mut changes = AccountChanges::default();
    if let Some(name) = req.name.as_deref() {
        if name.trim().is_empty() {
            return Err(FieldError::Empty("name").into());
        }
        changes.name = Some(name.trim().to_string());
    }
    if let Some(email) = req.email.as_deref() {
        changes.email = Some(parse_email(email)?);
    }
    let password = match req.password.as_deref() {
        None => None,
        Some(p) if p.trim().is_empty() => return Err(FieldError::Empty("password").into()),
        Some(p) => Some(p),
    };
    if changes.is_empty() && password.is_none() {
        return Err(ApiError::Validation(
            "At least one of name, email or password is required".to_string(),
        ));
    }
    Ok((changes, password))
}

/// GET /users
#[tracing::instrument(skip(state, _auth))]
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    query: Result<Query<ListUsersQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(query) = query?;
    let limit = query
        .limit
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE);
    let offset = query.offset.unwrap_or(0).max(0);

    let rows = AccountRepo::list(&state.pool, query.search.as_deref(), limit, offset)
        .await
        .map_err(ApiError::from_store)?;
    let total = AccountRepo::count(&state.pool)
        .await
        .map_err(ApiError::from_store)?;

    let users: Vec<PublicAccount> = rows.into_iter().map(Into::into).collect();
    Ok(([(TOTAL_COUNT_HEADER, total.to_string())], Json(users)))
}

/// POST /users
#[tracing::instrument(skip(state, _auth, payload))]
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let name = require("name", req.name.as_deref())?;
    let email = parse_email(require("email", req.email.as_deref())?)?;
    let password = match req.password.as_deref() {
        None => None,
        Some(p) if p.trim().is_empty() => return Err(FieldError::Empty("password").into()),
        Some(p) => Some(p),
    };

    let account = state
        .auth
        .create_account(name.trim(), &email, password)
        .await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /users/{id}
#[tracing::instrument(skip(state, _auth))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<PublicAccount>, ApiError> {
    let id = parse_id(&id)?;
    let account = AccountRepo::get_by_id(&state.pool, id)
        .await
        .map_err(ApiError::from_store)?
        .ok_or(ApiError::NotFound("User not found"))?;
    Ok(Json(account.into()))
}

/// PUT /users/{id}
#[tracing::instrument(skip(state, _auth, payload))]
pub async fn update_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<PublicAccount>, ApiError> {
    let id = parse_id(&id)?;
    let Json(req) = payload?;
    let (mut changes, new_password) = validate_update(&req)?;

    if AccountRepo::get_by_id(&state.pool, id)
        .await
        .map_err(ApiError::from_store)?
        .is_none()
    {
        return Err(ApiError::NotFound("User not found"));
    }
    if let Some(password) = new_password {
        changes.password_hash = Some(state.auth.hash_password(password).await?);
    }

    let account = AccountRepo::update(&state.pool, id, &changes)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                ApiError::DuplicateIdentity
            } else {
                ApiError::from_store(e)
            }
        })?
        .ok_or(ApiError::NotFound("User not found"))?;

    tracing::info!(account_id = %id, "Account updated");
    Ok(Json(account.into()))
}

/// DELETE /users/{id}
#[tracing::instrument(skip(state, _auth))]
pub async fn delete_user(
    State(state): State<Arc<AppState>>,
    _auth: AuthUser,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_id(&id)?;
    let deleted = AccountRepo::delete(&state.pool, id)
        .await
        .map_err(ApiError::from_store)?;
    if !deleted {
        return Err(ApiError::NotFound("User not found"));
    }

    tracing::info!(account_id = %id, "Account deleted");
    Ok(Json(json!({"message": "Deleted"})))
}
