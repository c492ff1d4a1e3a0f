//! PostgreSQL-backed catalog store

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{authors::AuthorsRepository, books::BooksRepository, CatalogStore};
use crate::{
    error::AppResult,
    models::{Author, AuthorFilter, Book, BookDetail, BookFilter, NewBook},
};

/// Catalog store holding the database connection pool
#[derive(Clone)]
pub struct PgStore {
    pub pool: Pool<Postgres>,
    pub authors: AuthorsRepository,
    pub books: BooksRepository,
}

impl PgStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            authors: AuthorsRepository::new(pool.clone()),
            books: BooksRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl CatalogStore for PgStore {
    async fn find_authors(&self, filter: &AuthorFilter) -> AppResult<Vec<Author>> {
        self.authors.search(filter).await
    }

    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        self.authors.get_by_id(id).await
    }

    async fn insert_author(&self, name: &str) -> AppResult<Author> {
        self.authors.create(name).await
    }

    async fn update_author(&self, author: &Author) -> AppResult<Author> {
        self.authors.update(author).await
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<()> {
        self.authors.delete(id).await
    }

    async fn find_books(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        self.books.search(filter).await
    }

    async fn find_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        self.books.get_by_id(id).await
    }

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book> {
        self.books.create(book).await
    }

    async fn update_book(&self, book: &Book) -> AppResult<Book> {
        self.books.update(book).await
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        self.books.delete(id).await
    }

    async fn populate_author(&self, book: Book) -> AppResult<BookDetail> {
        self.books.populate_author(book).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
