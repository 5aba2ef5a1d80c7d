//! Rental repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgPool, Row};
use tracing::debug;
use uuid::Uuid;

use super::{AccountRepository, ChargeFn, RentalStore};
use crate::models::{MovieSummary, Settlement};

/// Rental repository for database operations
#[derive(Clone)]
pub struct RentalRepository {
    pool: PgPool,
}

impl RentalRepository {
    /// Create a new rental repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RentalStore for RentalRepository {
    async fn open(&self, user_id: Uuid, movie_id: i32, started_on: NaiveDate) -> Result<bool> {
        // The unique (user_id, movie_id) index makes this a single atomic check-and-insert
        let result = sqlx::query(
            r#"
            INSERT INTO rentals (user_id, movie_id, started_on)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, movie_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .bind(started_on)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn close(
        &self,
        user_id: Uuid,
        movie_id: i32,
        charge: ChargeFn<'_>,
    ) -> Result<Option<Settlement>> {
        let mut tx = self.pool.begin().await?;

        let started_on: Option<NaiveDate> = sqlx::query_scalar(
            r#"
            DELETE FROM rentals
            WHERE user_id = $1 AND movie_id = $2
            RETURNING started_on
            "#,
        )
        .bind(user_id)
        .bind(movie_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(started_on) = started_on else {
            tx.rollback().await?;
            return Ok(None);
        };

        let amount = charge(started_on);
        let balance = AccountRepository::debit(&mut tx, user_id, amount).await?;

        tx.commit().await?;
        debug!(%user_id, movie_id, %amount, "Rental closed");

        Ok(Some(Settlement {
            started_on,
            charge: amount,
            balance,
        }))
    }

    async fn list_active(&self, user_id: Uuid) -> Result<Vec<MovieSummary>> {
        let rows = sqlx::query(
            r#"
            SELECT m.id, m.title
            FROM rentals r
            JOIN movies m ON m.id = r.movie_id
            WHERE r.user_id = $1
            ORDER BY r.id
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| MovieSummary {
                id: row.get("id"),
                title: row.get("title"),
            })
            .collect())
    }
}
