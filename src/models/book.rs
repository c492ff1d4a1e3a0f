//! Book model and related types

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::author::Author;
use super::cover::{Cover, ImageType};
use crate::error::{AppError, AppResult};

/// Full book model from the store
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub publish_date: NaiveDate,
    pub page_count: i32,
    pub author_id: Uuid,
    pub cover: Option<Cover>,
    pub created_at: DateTime<Utc>,
}

impl Book {
    /// Replace the editable fields. The cover is only replaced when a new one is given.
    pub fn apply(&mut self, fields: NewBook) {
        self.title = fields.title;
        self.description = fields.description;
        self.publish_date = fields.publish_date;
        self.page_count = fields.page_count;
        self.author_id = fields.author_id;
        if let Some(cover) = fields.cover {
            self.cover = Some(cover);
        }
    }

    pub fn cover_image_path(&self) -> Option<String> {
        self.cover.as_ref().map(Cover::data_uri)
    }
}

/// Validated fields of a book about to be inserted or saved
#[derive(Debug, Clone, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub description: String,
    pub publish_date: NaiveDate,
    pub page_count: i32,
    pub author_id: Uuid,
    pub cover: Option<Cover>,
}

/// Book form body (create and update)
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookForm {
    pub title: Option<String>,
    /// Author id
    pub author: Option<String>,
    /// `YYYY-MM-DD`
    pub publish_date: Option<String>,
    pub page_count: Option<String>,
    pub description: Option<String>,
    /// JSON envelope `{"type": "image/png", "data": "<base64>"}`
    pub cover: Option<String>,
}

/// Book fields as submitted, checked against the schema before every save
#[derive(Debug, Clone, Default, Validate)]
pub struct BookDraft {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: String,
    #[validate(required(message = "Publish date is required"))]
    pub publish_date: Option<NaiveDate>,
    #[validate(
        required(message = "Page count is required"),
        range(min = 1, message = "Page count must be positive")
    )]
    pub page_count: Option<i32>,
    #[validate(required(message = "Author is required"))]
    pub author_id: Option<Uuid>,
    pub cover: Option<Cover>,
}

impl BookDraft {
    /// Run schema validation and produce the storable fields
    pub fn validated(self) -> AppResult<NewBook> {
        self.validate()?;

        let (Some(publish_date), Some(page_count), Some(author_id)) =
            (self.publish_date, self.page_count, self.author_id)
        else {
            return Err(AppError::Validation("Missing required book fields".to_string()));
        };

        Ok(NewBook {
            title: self.title,
            description: self.description,
            publish_date,
            page_count,
            author_id,
            cover: self.cover,
        })
    }
}

impl From<BookForm> for BookDraft {
    fn from(form: BookForm) -> Self {
        let cover = match form.cover.as_deref().map(Cover::parse_upload) {
            Some(Ok(cover)) => cover,
            Some(Err(e)) => {
                tracing::warn!("Discarding book cover: {}", e);
                None
            }
            None => None,
        };

        Self {
            title: form.title.unwrap_or_default(),
            description: form.description.unwrap_or_default(),
            publish_date: form.publish_date.as_deref().and_then(parse_date),
            page_count: form
                .page_count
                .as_deref()
                .and_then(|count| count.trim().parse().ok()),
            author_id: form
                .author
                .as_deref()
                .and_then(|id| Uuid::parse_str(id.trim()).ok()),
            cover,
        }
    }
}

/// Parse a date as sent by an `<input type="date">`, or a full RFC 3339 timestamp
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

/// Book list query parameters, echoed back to the list view as-is
#[derive(Debug, Clone, Default, Serialize, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct BookQuery {
    /// Case-insensitive substring of the title
    pub title: Option<String>,
    /// Latest publish date, inclusive
    pub published_before: Option<String>,
    /// Earliest publish date, inclusive
    pub published_after: Option<String>,
}

/// Sort order for book listings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BookOrder {
    /// Creation order, oldest first
    #[default]
    Created,
    /// Creation order, newest first
    Newest,
}

/// Store-level book filter
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookFilter {
    pub title: Option<String>,
    pub published_before: Option<NaiveDate>,
    pub published_after: Option<NaiveDate>,
    pub author_id: Option<Uuid>,
    pub order: BookOrder,
    pub limit: Option<i64>,
}

impl BookFilter {
    pub fn by_author(author_id: Uuid, limit: i64) -> Self {
        Self {
            author_id: Some(author_id),
            limit: Some(limit),
            ..Default::default()
        }
    }

    pub fn newest(limit: i64) -> Self {
        Self {
            order: BookOrder::Newest,
            limit: Some(limit),
            ..Default::default()
        }
    }
}

impl TryFrom<&BookQuery> for BookFilter {
    type Error = AppError;

    fn try_from(query: &BookQuery) -> AppResult<Self> {
        fn date_param(name: &str, value: &Option<String>) -> AppResult<Option<NaiveDate>> {
            match value.as_deref().filter(|v| !v.is_empty()) {
                None => Ok(None),
                Some(raw) => parse_date(raw)
                    .map(Some)
                    .ok_or_else(|| AppError::BadRequest(format!("Invalid {}: {}", name, raw))),
            }
        }

        Ok(Self {
            title: query.title.clone().filter(|title| !title.is_empty()),
            published_before: date_param("publishedBefore", &query.published_before)?,
            published_after: date_param("publishedAfter", &query.published_after)?,
            ..Default::default()
        })
    }
}

/// Book as shown in views. Cover bytes are inlined as a data URI.
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct BookView {
    pub id: Option<Uuid>,
    pub title: String,
    pub description: String,
    pub publish_date: Option<NaiveDate>,
    pub page_count: Option<i32>,
    pub author_id: Option<Uuid>,
    pub cover_image_type: Option<ImageType>,
    pub cover_image_path: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl BookView {
    /// View of a submitted form, for re-rendering it. `existing` supplies what
    /// the submission does not replace.
    pub fn from_draft(draft: &BookDraft, existing: Option<&Book>) -> Self {
        let cover = draft
            .cover
            .as_ref()
            .or_else(|| existing.and_then(|book| book.cover.as_ref()));

        Self {
            id: existing.map(|book| book.id),
            title: draft.title.clone(),
            description: draft.description.clone(),
            publish_date: draft.publish_date,
            page_count: draft.page_count,
            author_id: draft.author_id,
            cover_image_type: cover.map(|c| c.kind),
            cover_image_path: cover.map(Cover::data_uri),
            created_at: existing.map(|book| book.created_at),
        }
    }
}

impl From<&Book> for BookView {
    fn from(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: book.title.clone(),
            description: book.description.clone(),
            publish_date: Some(book.publish_date),
            page_count: Some(book.page_count),
            author_id: Some(book.author_id),
            cover_image_type: book.cover.as_ref().map(|c| c.kind),
            cover_image_path: book.cover_image_path(),
            created_at: Some(book.created_at),
        }
    }
}

/// Book joined with its author. A dangling reference leaves `author` empty.
#[derive(Debug, Clone)]
pub struct BookDetail {
    pub book: Book,
    pub author: Option<Author>,
}
