//! Business logic services

pub mod authors;
pub mod books;

use uuid::Uuid;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, catalog: CatalogConfig) -> Self {
        Self {
            authors: authors::AuthorsService::new(repository.clone(), catalog.clone()),
            books: books::BooksService::new(repository.clone(), catalog),
            repository,
        }
    }
}

/// Parse a record identifier from a URL segment. Malformed ids are
/// indistinguishable from unknown ones.
pub(crate) fn parse_id(kind: &str, raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound(format!("{} {} not found", kind, raw)))
}
