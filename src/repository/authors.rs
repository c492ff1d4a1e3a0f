//! Author queries on the PostgreSQL store

use chrono::Utc;
use sqlx::{Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::contains_pattern;
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorFilter},
};

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List authors in creation order, optionally filtered by name
    pub async fn search(&self, filter: &AuthorFilter) -> AppResult<Vec<Author>> {
        let mut query = QueryBuilder::<Postgres>::new("SELECT id, name, created_at FROM authors");

        if let Some(ref name) = filter.name {
            query.push(" WHERE name ~* ").push_bind(contains_pattern(name));
        }

        query.push(" ORDER BY created_at, id");

        let authors = query
            .build_query_as::<Author>()
            .fetch_all(&self.pool)
            .await?;

        Ok(authors)
    }

    /// Get author by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Author>> {
        let author = sqlx::query_as::<_, Author>(
            "SELECT id, name, created_at FROM authors WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(author)
    }

    /// Create an author
    pub async fn create(&self, name: &str) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(
            r#"
            INSERT INTO authors (id, name, created_at)
            VALUES ($1, $2, $3)
            RETURNING id, name, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(author)
    }

    /// Save an author's name
    pub async fn update(&self, author: &Author) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(
            "UPDATE authors SET name = $1 WHERE id = $2 RETURNING id, name, created_at",
        )
        .bind(&author.name)
        .bind(author.id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Author {} not found", author.id)))
    }

    /// Delete an author. Books referencing it are left in place.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }
}
