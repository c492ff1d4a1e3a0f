//! Author model and related types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::book::Book;

/// Full author model from the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// Author as shown in forms: may not have been saved yet
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AuthorView {
    pub id: Option<Uuid>,
    pub name: String,
}

impl From<&Author> for AuthorView {
    fn from(author: &Author) -> Self {
        Self {
            id: Some(author.id),
            name: author.name.clone(),
        }
    }
}

/// Author form body (create and update)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct AuthorForm {
    pub name: Option<String>,
}

/// Author fields checked against the schema before every save
#[derive(Debug, Clone, Validate)]
pub struct AuthorDraft {
    #[validate(length(min = 6, max = 255, message = "Name must be 6-255 characters"))]
    pub name: String,
}

impl From<AuthorForm> for AuthorDraft {
    fn from(form: AuthorForm) -> Self {
        Self {
            name: form.name.unwrap_or_default(),
        }
    }
}

/// Author list query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct AuthorQuery {
    /// Case-insensitive substring of the author name
    pub name: Option<String>,
}

/// Store-level author filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthorFilter {
    pub name: Option<String>,
}

impl From<&AuthorQuery> for AuthorFilter {
    fn from(query: &AuthorQuery) -> Self {
        Self {
            name: query.name.clone().filter(|name| !name.is_empty()),
        }
    }
}

/// Author with a preview of the books referencing it
#[derive(Debug, Clone)]
pub struct AuthorDetail {
    pub author: Author,
    pub books: Vec<Book>,
}
