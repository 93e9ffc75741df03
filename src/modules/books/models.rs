use serde::{Deserialize, Serialize};

use folio_db::entities::{author, book, publisher};

use crate::modules::authors::models::AuthorMini;
use crate::modules::publishers::models::PublisherMini;

/// Request model for creating a new book.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBook {
    /// Title of the book
    pub title: String,
    /// Year of first publication, if known
    #[serde(default)]
    pub published_year: Option<i32>,
}

/// Book representation returned by the API, with authors and publisher resolved.
#[derive(Debug, Clone, Serialize)]
pub struct BookDto {
    pub book_id: i32,
    pub title: String,
    pub published_year: Option<i32>,
    pub publisher: Option<PublisherMini>,
    pub authors: Vec<AuthorMini>,
}

impl BookDto {
    pub fn from_parts(
        book: book::Model,
        authors: Vec<author::Model>,
        publisher: Option<publisher::Model>,
    ) -> Self {
        Self {
            book_id: book.book_id,
            title: book.title,
            published_year: book.published_year,
            publisher: publisher.map(PublisherMini::from),
            authors: authors.into_iter().map(AuthorMini::from).collect(),
        }
    }
}

/// Compact book shape embedded in other payloads and query results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct BookMini {
    pub book_id: i32,
    pub title: String,
}

impl From<book::Model> for BookMini {
    fn from(model: book::Model) -> Self {
        Self {
            book_id: model.book_id,
            title: model.title,
        }
    }
}

/// One row of the flattened author/book/publisher report.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct JoinRow {
    pub author_name: String,
    pub book_title: String,
    pub publisher_name: String,
}
