//! Home page

use axum::{extract::State, response::Response};
use serde::Serialize;
use utoipa::ToSchema;

use super::views;
use crate::{models::BookView, AppState};

#[derive(Serialize, ToSchema)]
pub struct HomePage {
    /// Most recently added books, newest first
    pub books: Vec<BookView>,
}

/// Home page with the latest additions
#[utoipa::path(
    get,
    path = "/",
    tag = "home",
    responses(
        (status = 200, description = "Rendered `index` view", body = HomePage)
    )
)]
pub async fn index(State(state): State<AppState>) -> Response {
    let books = match state.services.books.recent().await {
        Ok(books) => books,
        Err(e) => {
            tracing::warn!("Could not load recent books: {}", e);
            Vec::new()
        }
    };

    views::render(
        "index",
        HomePage {
            books: books.iter().map(BookView::from).collect(),
        },
    )
}
