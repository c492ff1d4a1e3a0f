//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{authors, books, health, home};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bookshelf",
        version = "0.1.0",
        description = "Library catalog of authors and books. Pages answer with view locals as JSON and the template name in the `x-view-template` header.",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Home
        home::index,
        // Authors
        authors::list_authors,
        authors::new_author,
        authors::create_author,
        authors::show_author,
        authors::edit_author,
        authors::update_author,
        authors::delete_author,
        // Books
        books::list_books,
        books::new_book,
        books::create_book,
        books::show_book,
        books::edit_book,
        books::update_book,
        books::delete_book,
        // Health
        health::health_check,
        health::readiness_check,
    ),
    components(
        schemas(
            home::HomePage,
            // Authors
            crate::models::Author,
            crate::models::AuthorView,
            crate::models::AuthorForm,
            crate::models::AuthorQuery,
            authors::AuthorIndexPage,
            authors::AuthorFormPage,
            authors::AuthorShowPage,
            // Books
            crate::models::BookView,
            crate::models::BookForm,
            crate::models::BookQuery,
            crate::models::ImageType,
            books::BookIndexPage,
            books::BookFormPage,
            books::BookShowPage,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "home", description = "Home page"),
        (name = "authors", description = "Author pages"),
        (name = "books", description = "Book pages"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
