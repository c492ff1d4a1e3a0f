//! In-process catalog store.
//!
//! Records live in insertion-ordered maps, so "creation order" is simply map
//! order. Used by the `memory` backend and by the test suites.

use async_trait::async_trait;
use chrono::Utc;
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{contains_pattern, CatalogStore};
use crate::{
    error::{AppError, AppResult},
    models::{Author, AuthorFilter, Book, BookFilter, BookOrder, NewBook},
};

#[derive(Default)]
pub struct MemoryStore {
    authors: RwLock<IndexMap<Uuid, Author>>,
    books: RwLock<IndexMap<Uuid, Book>>,
}

fn case_insensitive(term: &str) -> AppResult<Regex> {
    RegexBuilder::new(&contains_pattern(term))
        .case_insensitive(true)
        .build()
        .map_err(|e| AppError::Internal(e.to_string()))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CatalogStore for MemoryStore {
    async fn find_authors(&self, filter: &AuthorFilter) -> AppResult<Vec<Author>> {
        let pattern = filter.name.as_deref().map(case_insensitive).transpose()?;
        let authors = self.authors.read().await;

        Ok(authors
            .values()
            .filter(|a| pattern.as_ref().map_or(true, |p| p.is_match(&a.name)))
            .cloned()
            .collect())
    }

    async fn find_author(&self, id: Uuid) -> AppResult<Option<Author>> {
        Ok(self.authors.read().await.get(&id).cloned())
    }

    async fn insert_author(&self, name: &str) -> AppResult<Author> {
        let author = Author {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        self.authors.write().await.insert(author.id, author.clone());
        Ok(author)
    }

    async fn update_author(&self, author: &Author) -> AppResult<Author> {
        let mut authors = self.authors.write().await;
        let stored = authors
            .get_mut(&author.id)
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", author.id)))?;
        stored.name = author.name.clone();
        Ok(stored.clone())
    }

    async fn delete_author(&self, id: Uuid) -> AppResult<()> {
        self.authors
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    async fn find_books(&self, filter: &BookFilter) -> AppResult<Vec<Book>> {
        let pattern = filter.title.as_deref().map(case_insensitive).transpose()?;
        let books = self.books.read().await;

        let mut found: Vec<Book> = books
            .values()
            .filter(|b| pattern.as_ref().map_or(true, |p| p.is_match(&b.title)))
            .filter(|b| filter.published_before.map_or(true, |d| b.publish_date <= d))
            .filter(|b| filter.published_after.map_or(true, |d| b.publish_date >= d))
            .filter(|b| filter.author_id.map_or(true, |id| b.author_id == id))
            .cloned()
            .collect();

        if filter.order == BookOrder::Newest {
            // stable sort: equal timestamps keep the most recent insertion first
            found.reverse();
            found.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        }

        if let Some(limit) = filter.limit {
            found.truncate(usize::try_from(limit).unwrap_or(0));
        }

        Ok(found)
    }

    async fn find_book(&self, id: Uuid) -> AppResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn insert_book(&self, book: &NewBook) -> AppResult<Book> {
        let book = Book {
            id: Uuid::new_v4(),
            title: book.title.clone(),
            description: book.description.clone(),
            publish_date: book.publish_date,
            page_count: book.page_count,
            author_id: book.author_id,
            cover: book.cover.clone(),
            created_at: Utc::now(),
        };
        self.books.write().await.insert(book.id, book.clone());
        Ok(book)
    }

    async fn update_book(&self, book: &Book) -> AppResult<Book> {
        let mut books = self.books.write().await;
        let stored = books
            .get_mut(&book.id)
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", book.id)))?;
        *stored = Book {
            created_at: stored.created_at,
            ..book.clone()
        };
        Ok(stored.clone())
    }

    async fn delete_book(&self, id: Uuid) -> AppResult<()> {
        self.books
            .write()
            .await
            .shift_remove(&id)
            .map(|_| ())
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
