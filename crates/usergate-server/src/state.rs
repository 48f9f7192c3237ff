use crate::auth::{AuthService, CredentialHasher, TokenIssuer};
use crate::config::ServerConfig;
use sqlx::PgPool;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<ServerConfig>,
    pub tokens: Arc<TokenIssuer>,
    pub auth: AuthService,
}

impl AppState {
    /// Create the state once at startup. Fails on invalid password cost.
    pub fn new(pool: PgPool, config: ServerConfig) -> anyhow::Result<Self> {
        let hasher = CredentialHasher::new(&config.auth.password_cost)?;
        let tokens = Arc::new(TokenIssuer::new(&config.auth.token_secret));
        let auth = AuthService::new(pool.clone(), hasher, tokens.clone());
        Ok(Self {
            pool,
            config: Arc::new(config),
            tokens,
            auth,
        })
    }
}
