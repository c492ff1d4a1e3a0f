//! Book pages

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
    models::{Author, BookDraft, BookForm, BookQuery, BookView},
    AppState,
};

/// Locals of the `books/index` view
#[derive(Serialize, ToSchema)]
pub struct BookIndexPage {
    pub books: Vec<BookView>,
    /// The query as received, to refill the search form
    pub search_options: BookQuery,
}

/// Locals of the `books/new` and `books/edit` views
#[derive(Serialize, ToSchema)]
pub struct BookFormPage {
    /// Choices for the author selector
    pub authors: Vec<Author>,
    pub book: BookView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Locals of the `books/show` view
#[derive(Serialize, ToSchema)]
pub struct BookShowPage {
    pub book: BookView,
    pub author: Option<Author>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum FormKind {
    New,
    Edit,
}

impl FormKind {
    fn template(self) -> &'static str {
        match self {
            FormKind::New => "books/new",
            FormKind::Edit => "books/edit",
        }
    }

    fn error_message(self) -> &'static str {
        match self {
            FormKind::New => "Error Creating Book",
            FormKind::Edit => "Error Updating Book",
        }
    }
}

/// Render a book form with the author selector filled in
async fn render_form_page(state: &AppState, book: BookView, kind: FormKind, has_error: bool) -> Response {
    let authors = match state.services.authors.all().await {
        Ok(authors) => authors,
        Err(e) => {
            tracing::warn!("Could not load authors for {}: {}", kind.template(), e);
            return views::redirect("/books");
        }
    };

    let page = BookFormPage {
        authors,
        book,
        error_message: has_error.then(|| kind.error_message().to_string()),
    };

    if has_error {
        views::render_error(kind.template(), page)
    } else {
        views::render(kind.template(), page)
    }
}

/// List books, filtered by title and publish date range
#[utoipa::path(
    get,
    path = "/books",
    tag = "books",
    params(BookQuery),
    responses(
        (status = 200, description = "Rendered `books/index` view", body = BookIndexPage),
        (status = 303, description = "Store failure or bad date, redirect home")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> Response {
    let Query(query) = match query {
        Ok(query) => query,
        Err(e) => {
            tracing::warn!("Rejected book search: {}", e);
            return views::redirect("/");
        }
    };

    match state.services.books.list(&query).await {
        Ok(books) => views::render(
            "books/index",
            BookIndexPage {
                books: books.iter().map(BookView::from).collect(),
                search_options: query,
            },
        ),
        Err(e) => {
            tracing::warn!("Could not list books: {}", e);
            views::redirect("/")
        }
    }
}

/// Empty book form
#[utoipa::path(
    get,
    path = "/books/new",
    tag = "books",
    responses(
        (status = 200, description = "Rendered `books/new` view", body = BookFormPage),
        (status = 303, description = "Authors could not be loaded, redirect to the book list")
    )
)]
pub async fn new_book(State(state): State<AppState>) -> Response {
    render_form_page(&state, BookView::default(), FormKind::New, false).await
}

/// Create a book, with an optional inline cover
#[utoipa::path(
    post,
    path = "/books",
    tag = "books",
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to the book list"),
        (status = 422, description = "Invalid book, `books/new` rendered again", body = BookFormPage)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    form: Result<Form<BookForm>, FormRejection>,
) -> Response {
    let Form(form) = match form {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Rejected book form: {}", e);
            return render_form_page(&state, BookView::default(), FormKind::New, true).await;
        }
    };

    let draft = BookDraft::from(form);

    match state.services.books.create(draft.clone()).await {
        Ok(_) => views::redirect("/books"),
        Err(e) => {
            tracing::warn!("Could not create book: {}", e);
            render_form_page(&state, BookView::from_draft(&draft, None), FormKind::New, true).await
        }
    }
}

/// Book details with its author
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Rendered `books/show` view", body = BookShowPage),
        (status = 303, description = "Unknown book, redirect home")
    )
)]
pub async fn show_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.services.books.get_with_author(&id).await {
        Ok(detail) => {
            tracing::debug!(id = %detail.book.id, title = %detail.book.title, "Showing book");
            views::render(
                "books/show",
                BookShowPage {
                    book: BookView::from(&detail.book),
                    author: detail.author,
                    error_message: None,
                },
            )
        }
        Err(e) => {
            tracing::warn!("Could not show book {}: {}", id, e);
            views::redirect("/")
        }
    }
}

/// Edit form for a book
#[utoipa::path(
    get,
    path = "/books/{id}/edit",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 200, description = "Rendered `books/edit` view", body = BookFormPage),
        (status = 303, description = "Unknown book, redirect home")
    )
)]
pub async fn edit_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    match state.services.books.get(&id).await {
        Ok(book) => render_form_page(&state, BookView::from(&book), FormKind::Edit, false).await,
        Err(e) => {
            tracing::warn!("Could not edit book {}: {}", id, e);
            views::redirect("/")
        }
    }
}

/// Update a book. The cover is only replaced when a new one is sent.
#[utoipa::path(
    put,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    request_body(content = BookForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Saved (redirect to the book) or unknown book (redirect home)"),
        (status = 422, description = "Save failed, `books/edit` rendered again", body = BookFormPage)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: Result<Form<BookForm>, FormRejection>,
) -> Response {
    let book = match state.services.books.get(&id).await {
        Ok(book) => book,
        Err(e) => {
            tracing::warn!("Could not load book {} for update: {}", id, e);
            return views::redirect("/");
        }
    };

    let Form(form) = match form {
        Ok(form) => form,
        Err(e) => {
            tracing::warn!("Rejected book form for {}: {}", book.id, e);
            return render_form_page(&state, BookView::from(&book), FormKind::Edit, true).await;
        }
    };

    let draft = BookDraft::from(form);

    match state.services.books.update(book.clone(), draft.clone()).await {
        Ok(saved) => views::redirect(&format!("/books/{}", saved.id)),
        Err(e) => {
            tracing::warn!("Could not update book {}: {}", book.id, e);
            let view = BookView::from_draft(&draft, Some(&book));
            render_form_page(&state, view, FormKind::Edit, true).await
        }
    }
}

/// Delete a book
#[utoipa::path(
    delete,
    path = "/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID")
    ),
    responses(
        (status = 303, description = "Deleted (redirect to the book list) or unknown book (redirect home)"),
        (status = 422, description = "Removal failed, `books/show` rendered with an error", body = BookShowPage)
    )
)]
pub async fn delete_book(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let book = match state.services.books.get(&id).await {
        Ok(book) => book,
        Err(e) => {
            tracing::warn!("Could not load book {} for deletion: {}", id, e);
            return views::redirect("/");
        }
    };

    let Err(e) = state.services.books.delete(&book).await else {
        return views::redirect("/books");
    };

    tracing::warn!("Could not delete book {}: {}", book.id, e);
    let view = BookView::from(&book);
    let author = state
        .services
        .books
        .populate(book)
        .await
        .ok()
        .and_then(|detail| detail.author);

    views::render_error(
        "books/show",
        BookShowPage {
            book: view,
            author,
            error_message: Some("Could not remove book".to_string()),
        },
    )
}
