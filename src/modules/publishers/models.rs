use serde::{Deserialize, Serialize};

use folio_db::entities::{book, publisher};

use crate::modules::books::models::BookMini;

/// Request model for creating a new publisher.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePublisher {
    /// Publisher display name
    pub name: String,
    /// Country of the head office, if known
    #[serde(default)]
    pub country: Option<String>,
}

/// Publisher representation returned by the API, books included.
#[derive(Debug, Clone, Serialize)]
pub struct PublisherDto {
    pub publisher_id: i32,
    pub name: String,
    pub country: Option<String>,
    /// Books currently referencing this publisher
    pub books: Vec<BookMini>,
}

impl PublisherDto {
    pub fn from_parts(publisher: publisher::Model, books: Vec<book::Model>) -> Self {
        Self {
            publisher_id: publisher.publisher_id,
            name: publisher.name,
            country: publisher.country,
            books: books.into_iter().map(BookMini::from).collect(),
        }
    }
}

/// Compact publisher shape embedded in book payloads and query results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PublisherMini {
    pub publisher_id: i32,
    pub name: String,
}

impl From<publisher::Model> for PublisherMini {
    fn from(model: publisher::Model) -> Self {
        Self {
            publisher_id: model.publisher_id,
            name: model.name,
        }
    }
}
