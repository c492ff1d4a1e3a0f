//! HTTP handlers for the catalog pages

pub mod authors;
pub mod books;
pub mod health;
pub mod home;
pub mod method_override;
pub mod openapi;
pub mod views;

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::AppState;

pub use method_override::method_override;

/// Create the application router with all routes.
///
/// Form submissions for PUT and DELETE arrive as POST; wrap the returned
/// router with [`method_override`] before serving it.
pub fn create_router(state: AppState) -> Router {
    let pages = Router::new()
        .route("/", get(home::index))
        // Authors
        .route(
            "/authors",
            get(authors::list_authors).post(authors::create_author),
        )
        .route("/authors/new", get(authors::new_author))
        .route(
            "/authors/:id",
            get(authors::show_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .route("/authors/:id/edit", get(authors::edit_author))
        // Books
        .route("/books", get(books::list_books).post(books::create_book))
        .route("/books/new", get(books::new_book))
        .route(
            "/books/:id",
            get(books::show_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route("/books/:id/edit", get(books::edit_book))
        // Health check
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .with_state(state);

    Router::new()
        .merge(pages)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
}
