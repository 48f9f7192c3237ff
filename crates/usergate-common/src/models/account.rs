use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account as exposed to clients. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Minimal profile returned alongside a login token
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginUser {
    pub name: String,
    pub email: String,
}

impl From<&PublicAccount> for LoginUser {
    fn from(account: &PublicAccount) -> Self {
        Self {
            name: account.name.clone(),
            email: account.email.clone(),
        }
    }
}
