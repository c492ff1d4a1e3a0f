//! Book queries on the PostgreSQL store.
//!
//! Covers are stored inline: raw bytes in `cover_image`, MIME type in
//! `cover_image_type`.

use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{FromRow, Pool, Postgres, QueryBuilder};
use uuid::Uuid;

use super::contains_pattern;
use crate::{
    error::{AppError, AppResult},
    models::{Book, BookDetail, BookFilter, BookOrder, Cover, ImageType, NewBook, Author},
};

const BOOK_COLUMNS: &str = "id, title, description, publish_date, page_count, author_id, \
                            cover_image, cover_image_type, created_at";

/// Row shape of the `books` table
#[derive(Debug, FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    description: String,
    publish_date: NaiveDate,
    page_count: i32,
    author_id: Uuid,
    cover_image: Option<Vec<u8>>,
    cover_image_type: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        let kind = row.cover_image_type.as_deref().and_then(ImageType::from_mime);
        let cover = match (kind, row.cover_image) {
            (Some(kind), Some(bytes)) => Some(Cover::new(kind, bytes)),
            _ => None,
        };

        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            publish_date: row.publish_date,
            page_count: row.page_count,
            author_id: row.author_id,
            cover,
            created_at: row.created_at,
        }
    }
}

/// Book row joined with its author's columns
#[derive(Debug, FromRow)]
struct BookWithAuthorRow {
    #[sqlx(flatten)]
    book: BookRow,
    author_name: Option<String>,
    author_created_at: Option<DateTime<Utc>>,
}

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List books matching a filter
    pub async fn search(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let mut query = QueryBuilder::<Postgres>::new(format!("SELECT {} FROM books WHERE 1=1", BOOK_COLUMNS));

        if let Some(ref title) = filter.title {
            query.push(" AND title ~* ").push_bind(contains_pattern(title));
        }

        if let Some(before) = filter.published_before {
            query.push(" AND publish_date <= ").push_bind(before);
        }

        if let Some(after) = filter.published_after {
            query.push(" AND publish_date >= ").push_bind(after);
        }

        if let Some(author_id) = filter.author_id {
            query.push(" AND author_id = ").push_bind(author_id);
        }

        query.push(match filter.order {
            BookOrder::Created => " ORDER BY created_at, id",
            BookOrder::Newest => " ORDER BY created_at DESC, id",
        });

        if let Some(limit) = filter.limit {
            query.push(" LIMIT ").push_bind(limit);
        }

        let rows = query
            .build_query_as::<BookRow>()
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(Book::from).collect())
    }

    /// Get book by ID
    pub async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Book>> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Book::from))
    }

    /// Resolve a book's author with a single join
    pub async fn populate_author(&self, book: Book) -> AppResult<BookDetail> {
        let row = sqlx::query_as::<_, BookWithAuthorRow>(
            r#"
            SELECT b.id, b.title, b.description, b.publish_date, b.page_count, b.author_id,
                   b.cover_image, b.cover_image_type, b.created_at,
                   a.name AS author_name, a.created_at AS author_created_at
            FROM books b
            LEFT JOIN authors a ON a.id = b.author_id
            WHERE b.id = $1
            "#,
        )
        .bind(book.id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            // Removed since it was fetched: fall back to a plain lookup
            let author = sqlx::query_as::<_, Author>(
                "SELECT id, name, created_at FROM authors WHERE id = $1",
            )
            .bind(book.author_id)
            .fetch_optional(&self.pool)
            .await?;
            return Ok(BookDetail { book, author });
        };

        let author = match (row.author_name, row.author_created_at) {
            (Some(name), Some(created_at)) => Some(Author {
                id: row.book.author_id,
                name,
                created_at,
            }),
            _ => None,
        };

        Ok(BookDetail {
            book: Book::from(row.book),
            author,
        })
    }

    /// Create a book
    pub async fn create(&self, book: &NewBook) -> AppResult<Book> {
        let row = sqlx::query_as::<_, BookRow>(&format!(
            r#"
            INSERT INTO books (
                id, title, description, publish_date, page_count, author_id,
                cover_image, cover_image_type, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.publish_date)
        .bind(book.page_count)
        .bind(book.author_id)
        .bind(book.cover.as_ref().map(|c| c.bytes.as_slice()))
        .bind(book.cover.as_ref().map(|c| c.kind.as_mime()))
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(Book::from(row))
    }

    /// Save every field of an existing book
    pub async fn update(&self, book: &Book) -> AppResult<Book> {
        sqlx::query_as::<_, BookRow>(&format!(
            r#"
            UPDATE books SET
                title = $1,
                description = $2,
                publish_date = $3,
                page_count = $4,
                author_id = $5,
                cover_image = $6,
                cover_image_type = $7
            WHERE id = $8
            RETURNING {}
            "#,
            BOOK_COLUMNS
        ))
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.publish_date)
        .bind(book.page_count)
        .bind(book.author_id)
        .bind(book.cover.as_ref().map(|c| c.bytes.as_slice()))
        .bind(book.cover.as_ref().map(|c| c.kind.as_mime()))
        .bind(book.id)
        .fetch_optional(&self.pool)
        .await?
        .map(Book::from)
        .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book.id)))
    }

    /// Delete a book
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
