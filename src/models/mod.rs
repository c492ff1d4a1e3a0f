//! Data models for Bookshelf

pub mod author;
pub mod book;
pub mod cover;

// Re-export commonly used types
pub use author::{Author, AuthorDetail, AuthorDraft, AuthorFilter, AuthorForm, AuthorQuery, AuthorView};
pub use book::{Book, BookDetail, BookDraft, BookFilter, BookForm, BookOrder, BookQuery, BookView, NewBook};
pub use cover::{Cover, ImageType};
