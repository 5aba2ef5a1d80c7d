//! Account repository: user balances and profile

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool, Row};
use uuid::Uuid;

use super::AccountStore;
use crate::models::UserProfile;

/// Account repository for database operations
#[derive(Clone)]
pub struct AccountRepository {
    pool: PgPool,
}

impl AccountRepository {
    /// Create a new account repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Subtract `amount` from the user's balance and return the new balance.
    ///
    /// Runs on the caller's connection so it can share a transaction with the
    /// rental deletion. The balance has no lower bound.
    pub async fn debit(conn: &mut PgConnection, user_id: Uuid, amount: Decimal) -> Result<Decimal> {
        let balance: Option<Decimal> = sqlx::query_scalar(
            r#"
            UPDATE users
            SET balance = balance - $1, updated_at = NOW()
            WHERE id = $2
            RETURNING balance
            "#,
        )
        .bind(amount)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

        balance.ok_or_else(|| anyhow::anyhow!("User {} not found", user_id))
    }
}

#[async_trait]
impl AccountStore for AccountRepository {
    async fn balance(&self, user_id: Uuid) -> Result<Option<Decimal>> {
        let balance = sqlx::query_scalar("SELECT balance FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(balance)
    }

    async fn profile(&self, user_id: Uuid) -> Result<Option<UserProfile>> {
        let row = sqlx::query(
            r#"
            SELECT id, email, balance, is_active
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| UserProfile {
            id: row.get("id"),
            email: row.get("email"),
            balance: row.get("balance"),
            is_active: row.get("is_active"),
        }))
    }
}
