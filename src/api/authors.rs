//! Author pages

use axum::{
    extract::{
        rejection::{FormRejection, QueryRejection},
        Path, Query, State,
    },
    response::Response,
    Form,
};
use serde::Serialize;
use utoipa::ToSchema;

use super::views;
use crate::{
    models::{Author, AuthorDraft, AuthorForm, AuthorQuery, AuthorView, BookView},
    AppState,
};

/// Locals of the `authors/index` view
#[derive(Serialize, ToSchema)]
pub struct AuthorIndexPage {
    pub authors: Vec<Author>,
    /// The query as received, to refill the search form
    pub search_options: AuthorQuery,
}

/// Locals of the `authors/new` and `authors/edit` views
#[derive(Serialize, ToSchema)]
pub struct AuthorFormPage {
    pub author: AuthorView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Locals of the `authors/show` view
#[derive(Serialize, ToSchema)]
pub struct AuthorShowPage {
    pub author: Author,
    pub books_by_author: Vec<BookView>,
}

fn form_error(template: &'static str, author: AuthorView, message: &str) -> Response {
    views::render_error(
        template,
        AuthorFormPage {
            author,
            error_message: Some(message.to_string()),
        },
    )
}

/// List authors, optionally filtered by name
#[utoipa::path(
    get,
    path = "/authors",
    tag = "authors",
    params(AuthorQuery),
    responses(
        (status = 200, description = "Rendered `authors/index` view", body = AuthorIndexPage),
        (status = 303, description = "Store failure, redirect home")
    )
)]
pub async fn list_authors(
    State(state): State<AppState>,
    query: Result<Query<AuthorQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(e) => {
            tracing::warn!("Rejected author search: {}", e);
            return views::redirect("/");
        }
    };

    match state.services.authors.list(&query).await {
        Ok(authors) => views::render(
            "authors/index",
            AuthorIndexPage {
                authors,
                search_options: query,
            },
        ),
        Err(e) => {
            tracing::warn!("Could not list authors: {}", e);
            views::redirect("/")
        }
    }
}

/// Empty author form
#[utoipa::path(
    get,
    path = "/authors/new",
    tag = "authors",
    responses(
        (status = 200, description = "Rendered `authors/new` view", body = AuthorFormPage)
    )
)]
pub async fn new_author() -> Response {
    views::render(
        "authors/new",
        AuthorFormPage {
            author: AuthorView::default(),
            error_message: None,
        },
    )
}

/// Create an author
#[utoipa::path(
    post,
    path = "/authors",
    tag = "authors",
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to the author list"),
        (status = 422, description = "Invalid author, `authors/new` rendered again", body = AuthorFormPage)
    )
)]
pub async fn create_author(
    State(state): State<AppState>,
    form: Result<Form<AuthorForm>, FormRejection>,
) -> Response {
    const FAILED: &str = "Error creating Author";

    let Form(form) = match form {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Rejected author form: {}", e);
            return form_error("authors/new", AuthorView::default(), FAILED);
        }
    };

    let draft = AuthorDraft::from(form);

    match state.services.authors.create(draft.clone()).await {
        Ok(_) => views::redirect("/authors"),
        Err(e) => {
            tracing::warn!("Could not create author: {}", e);
            let author = AuthorView {
                id: None,
                name: draft.name,
            };
            form_error("authors/new", author, FAILED)
        }
    }
}

/// Author details with a few of their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Rendered `authors/show` view", body = AuthorShowPage),
        (status = 303, description = "Unknown author, redirect home")
    )
)]
pub async fn show_author(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.services.authors.get_with_books(&id).await {
        Ok(detail) => views::render(
            "authors/show",
            AuthorShowPage {
                books_by_author: detail.books.iter().map(BookView::from).collect(),
                author: detail.author,
            },
        ),
        Err(e) => {
            tracing::warn!("Could not show author {}: {}", id, e);
            views::redirect("/")
        }
    }
}

/// Edit form for an author
#[utoipa::path(
    get,
    path = "/authors/{id}/edit",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 200, description = "Rendered `authors/edit` view", body = AuthorFormPage),
        (status = 303, description = "Unknown author, redirect to the author list")
    )
)]
pub async fn edit_author(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.services.authors.get(&id).await {
        Ok(author) => views::render(
            "authors/edit",
            AuthorFormPage {
                author: AuthorView::from(&author),
                error_message: None,
            },
        ),
        Err(e) => {
            tracing::warn!("Could not edit author {}: {}", id, e);
            views::redirect("/authors")
        }
    }
}

/// Rename an author
#[utoipa::path(
    put,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    request_body(content = AuthorForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Saved (redirect to the author) or unknown author (redirect home)"),
        (status = 422, description = "Save failed, `authors/edit` rendered again", body = AuthorFormPage)
    )
)]
pub async fn update_author(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<AuthorForm>, FormRejection>,
) -> Response {
    const FAILED: &str = "Error updating Author";

    let author = match state.services.authors.get(&id).await {
        Ok(author) => author,
        Err(e) => {
            tracing::warn!("Could not load author {} for update: {}", id, e);
            return views::redirect("/");
        }
    };

    let Form(form) = match form {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Rejected author form for {}: {}", author.id, e);
            return form_error("authors/edit", AuthorView::from(&author), FAILED);
        }
    };

    let draft = AuthorDraft::from(form);
    let author_id = author.id;

    match state.services.authors.update(author, draft.clone()).await {
        Ok(saved) => views::redirect(&format!("/authors/{}", saved.id)),
        Err(e) => {
            tracing::warn!("Could not update author {}: {}", author_id, e);
            let author = AuthorView {
                id: Some(author_id),
                name: draft.name,
            };
            form_error("authors/edit", author, FAILED)
        }
    }
}

/// Delete an author. Their books stay in the catalog.
#[utoipa::path(
    delete,
    path = "/authors/{id}",
    tag = "authors",
    params(
        ("id" = String, Path, description = "Author ID")
    ),
    responses(
        (status = 303, description = "Deleted or unknown (redirect to the author list), or failed (redirect to the author)")
    )
)]
pub async fn delete_author(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let author = match state.services.authors.get(&id).await {
        Ok(author) => author,
        Err(e) => {
            tracing::warn!("Could not load author {} for deletion: {}", id, e);
            return views::redirect("/authors");
        }
    };

    match state.services.authors.delete(&author).await {
        Ok(()) => views::redirect("/authors"),
        Err(e) => {
            tracing::warn!("Could not delete author {}: {}", author.id, e);
            views::redirect(&format!("/authors/{}", author.id))
        }
    }
}
