use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use usergate_common::models::account::PublicAccount;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AccountRow {
    pub account_id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AccountRow> for PublicAccount {
    fn from(row: AccountRow) -> Self {
        Self {
            id: row.account_id,
            name: row.name,
            email: row.email,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Partial update. `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct AccountChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
}

impl AccountChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.email.is_none() && self.password_hash.is_none()
    }
}

const ACCOUNT_COLUMNS: &str = "account_id, name, email, password_hash, created_at, updated_at";

/// Escape LIKE metacharacters so user input matches literally
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// Account persistence. Callers pass emails already normalized.
pub struct AccountRepo;

impl AccountRepo {
    /// Insert a new account. Fails with a unique violation (see
    /// [`crate::is_unique_violation`]) when the email is taken.
    pub async fn create(
        pool: &PgPool,
        account_id: Uuid,
        name: &str,
        email: &str,
        password_hash: Option<&str>,
    ) -> Result<AccountRow> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "INSERT INTO account (account_id, name, email, password_hash) VALUES ($1, $2, $3, $4) RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(account_id)
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .fetch_one(pool)
        .await
        .context("Failed to create account")?;
        Ok(row)
    }

    pub async fn get_by_email(pool: &PgPool, email: &str) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(pool)
        .await
        .context("Failed to get account by email")?;
        Ok(row)
    }

    pub async fn get_by_id(pool: &PgPool, account_id: Uuid) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM account WHERE account_id = $1"
        ))
        .bind(account_id)
        .fetch_optional(pool)
        .await
        .context("Failed to get account by id")?;
        Ok(row)
    }

    /// Apply a partial update. Returns `None` when the account does not exist.
    pub async fn update(
        pool: &PgPool,
        account_id: Uuid,
        changes: &AccountChanges,
    ) -> Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(&format!(
            r#"UPDATE account SET
                name = COALESCE($2, name),
                email = COALESCE($3, email),
                password_hash = COALESCE($4, password_hash),
                updated_at = NOW()
            WHERE account_id = $1
            RETURNING {ACCOUNT_COLUMNS}"#
        ))
        .bind(account_id)
        .bind(changes.name.as_deref())
        .bind(changes.email.as_deref())
        .bind(changes.password_hash.as_deref())
        .fetch_optional(pool)
        .await
        .context("Failed to update account")?;
        Ok(row)
    }

    /// Delete an account. Returns `false` when nothing was deleted.
    pub async fn delete(pool: &PgPool, account_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM account WHERE account_id = $1")
            .bind(account_id)
            .execute(pool)
            .await
            .context("Failed to delete account")?;
        Ok(result.rows_affected() > 0)
    }

    /// List accounts newest first, optionally filtered by a case-insensitive
    /// substring of the name.
    pub async fn list(
        pool: &PgPool,
        search: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AccountRow>> {
        let pattern = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);
        let rows = sqlx::query_as::<_, AccountRow>(&format!(
            r#"SELECT {ACCOUNT_COLUMNS} FROM account
            WHERE ($1::TEXT IS NULL OR name ILIKE $1)
            ORDER BY created_at DESC, account_id
            LIMIT $2 OFFSET $3"#
        ))
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(pool)
        .await
        .context("Failed to list accounts")?;
        Ok(rows)
    }

    pub async fn count(pool: &PgPool) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM account")
            .fetch_one(pool)
            .await
            .context("Failed to count accounts")?;
        Ok(count)
    }
}
