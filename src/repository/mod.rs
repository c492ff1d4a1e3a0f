//! Repository layer: the document store behind the catalog.
//!
//! Handlers and services only see [`CatalogStore`]; the backend is picked at
//! startup and injected through [`Repository`].

pub mod authors;
pub mod books;
pub mod memory;
pub mod postgres;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Author, AuthorFilter, Book, BookDetail, BookFilter, NewBook},
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Persistence operations for authors and books.
///
/// `find_*` return `Ok(None)` for unknown ids; `update_*` and `delete_*`
/// return `AppError::NotFound` when the record is gone.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_authors(&self, filter: &AuthorFilter) -> AppResult<Vec<Author>>;

    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>>;

    async fn insert_author(&self, name: &str) -> AppResult<Author>;

    async fn update_author(&self, author: &Author) -> AppResult<Author>;

    async fn delete_author(&self, id: Uuid) -> AppResult<()>;

    async fn find_books(&self, filter: &BookFilter) -> AppResult<Vec<Book>>;

    async fn find_book(&self, id: Uuid) -> AppResult<Option<Book>>;

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book>;

    async fn update_book(&self, book: &Book) -> AppResult<Book>;

    async fn delete_book(&self, id: Uuid) -> AppResult<()>;

    /// Resolve the book's author reference
    async fn populate_author(&self, book: Book) -> AppResult<BookDetail> {
        let author = self.find_author(book.author_id).await?;
        Ok(BookDetail { book, author })
    }

    /// Check that the store is reachable
    async fn ping(&self) -> AppResult<()>;
}

/// Shared handle to the configured store
#[derive(Clone)]
pub struct Repository {
    store: Arc<dyn CatalogStore>,
}

impl Repository {
    pub fn new(store: impl CatalogStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Repository backed by PostgreSQL
    pub fn postgres(pool: sqlx::PgPool) -> Self {
        Self::new(PgStore::new(pool))
    }

    /// Repository backed by process memory (nothing survives a restart)
    pub fn memory() -> Self {
        Self::new(MemoryStore::default())
    }
}

impl Deref for Repository {
    type Target = dyn CatalogStore;

    fn deref(&self) -> &Self::Target {
        self.store.as_ref()
    }
}

/// Regex matching `term` literally, anywhere in the text.
/// Callers apply it case-insensitively.
pub fn contains_pattern(term: &str) -> String {
    regex::escape(term)
}
