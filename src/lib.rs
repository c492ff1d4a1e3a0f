//! Bookshelf library catalog
//!
//! Authors and books with search filters, inline cover images and a home
//! page of the latest additions, served over axum.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;

#[cfg(test)]
pub(crate) mod test_support;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<Services>,
}

impl AppState {
    pub fn new(config: AppConfig, repository: Repository) -> Self {
        let services = Services::new(repository, config.catalog.clone());
        Self {
            config: Arc::new(config),
            services: Arc::new(services),
        }
    }
}
