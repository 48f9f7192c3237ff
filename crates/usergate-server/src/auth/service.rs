use crate::auth::password::CredentialHasher;
use crate::auth::token::TokenIssuer;
use serde::Deserialize;
use sqlx::PgPool;
use std::sync::Arc;
use thiserror::Error;
use usergate_common::models::account::{LoginUser, PublicAccount};
use usergate_common::validation::{normalize_email, parse_email, require, FieldError};
use usergate_db::{is_unavailable, is_unique_violation, AccountRepo};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] FieldError),
    #[error("Email already exists")]
    DuplicateIdentity,
    #[error("User not found")]
    NotFound,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Service unavailable")]
    Unavailable(#[source] anyhow::Error),
    #[error("Internal error")]
    Internal(#[source] anyhow::Error),
}

impl AuthError {
    /// Classify a store failure as transport trouble or a plain internal error
    pub fn from_store(err: anyhow::Error) -> Self {
        if is_unavailable(&err) {
            Self::Unavailable(err)
        } else {
            Self::Internal(err)
        }
    }
}

/// Successful login: the session token and the identity it was issued for
#[derive(Debug)]
pub struct LoginOutcome {
    pub token: String,
    pub account_id: Uuid,
    pub user: LoginUser,
}

/// Signup and login orchestration over the credential store.
#[derive(Clone)]
pub struct AuthService {
    pool: PgPool,
    hasher: CredentialHasher,
    tokens: Arc<TokenIssuer>,
}

impl AuthService {
    pub fn new(pool: PgPool, hasher: CredentialHasher, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            pool,
            hasher,
            tokens,
        }
    }

    /// Register a new account with a password credential.
    pub async fn signup(&self, form: SignupForm) -> Result<PublicAccount, AuthError> {
        let name = require("name", form.name.as_deref())?;
        let email = require("email", form.email.as_deref())?;
        let password = require("password", form.password.as_deref())?;
        let email = parse_email(email)?;

        self.create_account(name.trim(), &email, Some(password)).await
    }

    /// Create an account, optionally with a password. Used by signup and by
    /// the dashboard's create form.
    pub async fn create_account(
        &self,
        name: &str,
        email: &str,
        password: Option<&str>,
    ) -> Result<PublicAccount, AuthError> {
        if AccountRepo::get_by_email(&self.pool, email)
            .await
            .map_err(AuthError::from_store)?
            .is_some()
        {
            return Err(AuthError::DuplicateIdentity);
        }

        let password_hash = match password {
            Some(p) => Some(self.hash_password(p).await?),
            None => None,
        };

        let row = AccountRepo::create(
            &self.pool,
            Uuid::new_v4(),
            name,
            email,
            password_hash.as_deref(),
        )
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AuthError::DuplicateIdentity
            } else {
                AuthError::from_store(e)
            }
        })?;

        tracing::info!(account_id = %row.account_id, "Account created");
        Ok(row.into())
    }

    /// Verify credentials and mint a session token.
    pub async fn login(&self, form: LoginForm) -> Result<LoginOutcome, AuthError> {
        let email = require("email", form.email.as_deref())?;
        let password = require("password", form.password.as_deref())?;
        let email = normalize_email(email);

        let account = AccountRepo::get_by_email(&self.pool, &email)
            .await
            .map_err(AuthError::from_store)?
            .ok_or(AuthError::NotFound)?;

        let Some(hash) = account.password_hash.clone() else {
            return Err(AuthError::InvalidCredentials);
        };
        if !self.verify_password(password, hash).await? {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue(account.account_id)
            .map_err(AuthError::Internal)?;

        Ok(LoginOutcome {
            token,
            account_id: account.account_id,
            user: LoginUser {
                name: account.name,
                email: account.email,
            },
        })
    }

    /// Hash a password on the blocking pool
    pub async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AuthError::Internal(e.into()))?
            .map_err(AuthError::Internal)
    }

    async fn verify_password(&self, password: &str, hash: String) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AuthError::Internal(e.into()))?
            .map_err(AuthError::Internal)
    }
}
