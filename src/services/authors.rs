//! Author management service

use validator::Validate;

use super::parse_id;
use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::{Author, AuthorDetail, AuthorDraft, AuthorFilter, AuthorQuery, BookFilter},
    repository::Repository,
};

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
    catalog: CatalogConfig,
}

impl AuthorsService {
    pub fn new(repository: Repository, catalog: CatalogConfig) -> Self {
        Self { repository, catalog }
    }

    /// List authors, filtered by name when the query carries one
    pub async fn list(&self, query: &AuthorQuery) -> AppResult<Vec<Author>> {
        let filter = AuthorFilter::from(query);
        tracing::debug!(?filter, "Listing authors");
        self.repository.find_authors(&filter).await
    }

    /// Every author, for selectors
    pub async fn all(&self) -> AppResult<Vec<Author>> {
        self.repository.find_authors(&AuthorFilter::default()).await
    }

    /// Get author by ID
    pub async fn get(&self, id: &str) -> AppResult<Author> {
        let id = parse_id("Author", id)?;
        self.repository
            .find_author(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Get an author with the first few books referencing it
    pub async fn get_with_books(&self, id: &str) -> AppResult<AuthorDetail> {
        let author = self.get(id).await?;
        let books = self
            .repository
            .find_books(&BookFilter::by_author(author.id, self.catalog.author_books_preview))
            .await?;
        Ok(AuthorDetail { author, books })
    }

    /// Create an author after schema validation
    pub async fn create(&self, draft: AuthorDraft) -> AppResult<Author> {
        draft.validate()?;
        let author = self.repository.insert_author(&draft.name).await?;
        tracing::info!(id = %author.id, "Author created");
        Ok(author)
    }

    /// Rename a previously fetched author and save it
    pub async fn update(&self, mut author: Author, draft: AuthorDraft) -> AppResult<Author> {
        draft.validate()?;
        author.name = draft.name;
        let saved = self.repository.update_author(&author).await?;
        tracing::info!(id = %saved.id, "Author updated");
        Ok(saved)
    }

    /// Delete a previously fetched author. Its books are left untouched.
    pub async fn delete(&self, author: &Author) -> AppResult<()> {
        self.repository.delete_author(author.id).await?;
        tracing::info!(id = %author.id, "Author deleted");
        Ok(())
    }
}
