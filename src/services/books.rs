//! Book catalog service

use super::parse_id;
use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{Book, BookDetail, BookDraft, BookFilter, BookQuery},
    repository::Repository,
};

#[derive(Clone)]
pub struct BooksService {
    repository: Repository,
    catalog: CatalogConfig,
}

impl BooksService {
    pub fn new(repository: Repository, catalog: CatalogConfig) -> Self {
        Self { repository, catalog }
    }

    /// Search books by title and publish date range
    pub async fn list(&self, query: &BookQuery) -> AppResult<Vec<Book>> {
        let filter = BookFilter::try_from(query)?;
        tracing::debug!(?filter, "Listing books");
        self.repository.find_books(&filter).await
    }

    /// Most recently added books
    pub async fn recent(&self) -> AppResult<Vec<Book>> {
        self.repository
            .find_books(&BookFilter::newest(self.catalog.recent_books))
            .await
    }

    /// Get book by ID
    pub async fn get(&self, id: &str) -> AppResult<Book> {
        let id = parse_id("Book", id)?;
        self.repository
            .find_book(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Get book by ID together with its author
    pub async fn get_with_author(&self, id: &str) -> AppResult<BookDetail> {
        let book = self.get(id).await?;
        self.populate(book).await
    }

    /// Resolve the author of an already loaded book
    pub async fn populate(&self, book: Book) -> AppResult<BookDetail> {
        self.repository.populate_author(book).await
    }

    /// Create a book after schema validation
    pub async fn create(&self, draft: BookDraft) -> AppResult<Book> {
        let fields = draft.validated()?;
        let book = self.repository.insert_book(&fields).await?;
        tracing::info!(id = %book.id, has_cover = book.cover.is_some(), "Book created");
        Ok(book)
    }

    /// Apply a submitted form to a previously fetched book and save it.
    /// The stored cover survives unless the form carries a new one.
    pub async fn update(&self, mut book: Book, draft: BookDraft) -> AppResult<Book> {
        let fields = draft.validated()?;
        book.apply(fields);
        let saved = self.repository.update_book(&book).await?;
        tracing::info!(id = %saved.id, "Book updated");
        Ok(saved)
    }

    /// Delete a previously fetched book
    pub async fn delete(&self, book: &Book) -> AppResult<()> {
        self.repository.delete_book(book.id).await?;
        tracing::info!(id = %book.id, "Book deleted");
        Ok(())
    }
}
