//! API error type and its JSON rendering.

use crate::auth::{AuthError, TokenError};
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use usergate_common::validation::FieldError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("Invalid ID format")]
    InvalidId,
    #[error("Email already exists")]
    DuplicateIdentity,
    #[error("{0}")]
    NotFound(&'static str),
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Authentication required")]
    Unauthenticated,
    #[error("Token expired")]
    TokenExpired,
    #[error("Token signature is invalid")]
    TokenInvalidSignature,
    #[error("Token is malformed")]
    TokenMalformed,
    #[error("Service unavailable")]
    Unavailable,
    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidId | ApiError::InvalidCredentials => {
                StatusCode::BAD_REQUEST
            }
            ApiError::DuplicateIdentity => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthenticated
            | ApiError::TokenExpired
            | ApiError::TokenInvalidSignature
            | ApiError::TokenMalformed => StatusCode::UNAUTHORIZED,
            ApiError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidId => "INVALID_ID",
            ApiError::DuplicateIdentity => "DUPLICATE_IDENTITY",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::InvalidCredentials => "INVALID_CREDENTIALS",
            ApiError::Unauthenticated => "UNAUTHENTICATED",
            ApiError::TokenExpired => "TOKEN_EXPIRED",
            ApiError::TokenInvalidSignature => "TOKEN_INVALID_SIGNATURE",
            ApiError::TokenMalformed => "TOKEN_MALFORMED",
            ApiError::Unavailable => "SERVICE_UNAVAILABLE",
            ApiError::Internal => "INTERNAL_ERROR",
        }
    }

    /// Map a failed store call, logging the cause
    pub fn from_store(err: anyhow::Error) -> Self {
        AuthError::from_store(err).into()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({
            "error": self.to_string(),
            "code": self.code(),
        });
        (self.status_code(), Json(body)).into_response()
    }
}

impl From<FieldError> for ApiError {
    fn from(err: FieldError) -> Self {
        ApiError::Validation(err.to_string())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => ApiError::TokenExpired,
            TokenError::InvalidSignature => ApiError::TokenInvalidSignature,
            TokenError::Malformed => ApiError::TokenMalformed,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Validation(e) => e.into(),
            AuthError::DuplicateIdentity => ApiError::DuplicateIdentity,
            AuthError::NotFound => ApiError::NotFound("User not found"),
            AuthError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthError::Unavailable(e) => {
                tracing::error!("Database unavailable: {:#}", e);
                ApiError::Unavailable
            }
            AuthError::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                ApiError::Internal
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(err: ApiError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let (status, body) = body_json(ApiError::DuplicateIdentity).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "Email already exists");
        assert_eq!(body["code"], "DUPLICATE_IDENTITY");
    }

    #[tokio::test]
    async fn test_validation_message_passes_through() {
        let (status, body) = body_json(FieldError::Missing("email").into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "email is required");
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_internal_hides_cause() {
        let err: ApiError =
            AuthError::Internal(anyhow::anyhow!("connection string postgres://secret")).into();
        let (status, body) = body_json(err).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Internal server error");
        assert!(!body.to_string().contains("secret"));
    }

    #[test]
    fn test_token_errors_are_distinct_401s() {
        let codes: Vec<(StatusCode, &str)> = [
            TokenError::Expired,
            TokenError::InvalidSignature,
            TokenError::Malformed,
        ]
        .into_iter()
        .map(|e| {
            let api: ApiError = e.into();
            (api.status_code(), api.code())
        })
        .collect();
        assert_eq!(
            codes,
            vec![
                (StatusCode::UNAUTHORIZED, "TOKEN_EXPIRED"),
                (StatusCode::UNAUTHORIZED, "TOKEN_INVALID_SIGNATURE"),
                (StatusCode::UNAUTHORIZED, "TOKEN_MALFORMED"),
            ]
        );
    }

    #[test]
    fn test_auth_error_mapping() {
        let cases: Vec<(AuthError, StatusCode)> = vec![
            (AuthError::DuplicateIdentity, StatusCode::CONFLICT),
            (AuthError::NotFound, StatusCode::NOT_FOUND),
            (AuthError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (
                AuthError::Unavailable(sqlx::Error::PoolTimedOut.into()),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status_code(), status);
        }
    }

    #[test]
    fn test_store_error_mapping() {
        let err = ApiError::from_store(sqlx::Error::PoolClosed.into());
        assert!(matches!(err, ApiError::Unavailable));
        let err = ApiError::from_store(anyhow::anyhow!("bad row"));
        assert!(matches!(err, ApiError::Internal));
    }

    #[test]
    fn test_invalid_id_message() {
        assert_eq!(ApiError::InvalidId.to_string(), "Invalid ID format");
        assert_eq!(ApiError::InvalidId.status_code(), StatusCode::BAD_REQUEST);
    }
}
