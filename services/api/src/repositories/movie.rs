//! Movie repository for database operations

use anyhow::Result;
use async_trait::async_trait;
use sqlx::{PgPool, Row, postgres::PgRow};

use super::MovieStore;
use crate::models::{Movie, MovieFilter};

/// Movie repository for database operations
#[derive(Clone)]
pub struct MovieRepository {
    pool: PgPool,
}

impl MovieRepository {
    /// Create a new movie repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn movie_from_row(row: &PgRow) -> Movie {
    Movie {
        id: row.get("id"),
        title: row.get("title"),
        year: row.get("year"),
        genre: row.get("genre"),
    }
}

#[async_trait]
impl MovieStore for MovieRepository {
    async fn list(&self, filter: &MovieFilter) -> Result<Vec<Movie>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, year, genre
            FROM movies
            WHERE ($1::VARCHAR IS NULL OR genre = $1)
              AND ($2::INTEGER IS NULL OR year = $2)
            ORDER BY id
            "#,
        )
        .bind(filter.genre.as_deref())
        .bind(filter.year)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(movie_from_row).collect())
    }

    async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let row = sqlx::query(
            r#"
            SELECT id, title, year, genre
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(movie_from_row))
    }
}
