use anyhow::{Context, Result};
use jsonwebtoken::{errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use usergate_common::models::auth::Claims;
use uuid::Uuid;

/// Session token lifetime: 24 hours
pub const TOKEN_TTL_SECS: i64 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token expired")]
    Expired,
    #[error("Token signature is invalid")]
    InvalidSignature,
    #[error("Token is malformed")]
    Malformed,
}

/// Issues and validates HS256 session tokens carrying the account id.
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenIssuer {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Issue a token for `account_id` valid for [`TOKEN_TTL_SECS`] from now
    pub fn issue(&self, account_id: Uuid) -> Result<String> {
        self.issue_at(account_id, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if it were created at `issued_at` (unix seconds)
    pub fn issue_at(&self, account_id: Uuid, issued_at: i64) -> Result<String> {
        let claims = Claims {
            sub: account_id.to_string(),
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .context("Failed to create session token")
    }

    /// Validate a token and return the account id it was issued for
    pub fn validate(&self, token: &str) -> Result<Uuid, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            })?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::Malformed)
    }
}
