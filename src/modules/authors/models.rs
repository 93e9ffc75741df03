use serde::{Deserialize, Serialize};

use folio_db::entities::{author, book};

use crate::modules::books::models::BookMini;

/// Request model for creating a new author.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateAuthor {
    /// Full display name of the author
    pub name: String,
    /// Year of birth, if known
    #[serde(default)]
    pub birth_year: Option<i32>,
}

/// Author representation returned by the API, books included.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorDto {
    pub author_id: i32,
    pub name: String,
    pub birth_year: Option<i32>,
    /// Books this author is attached to
    pub books: Vec<BookMini>,
}

impl AuthorDto {
    pub fn from_parts(author: author::Model, books: Vec<book::Model>) -> Self {
        Self {
            author_id: author.author_id,
            name: author.name,
            birth_year: author.birth_year,
            books: books.into_iter().map(BookMini::from).collect(),
        }
    }
}

/// Compact author shape embedded in other payloads and query results.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AuthorMini {
    pub author_id: i32,
    pub name: String,
}

impl From<author::Model> for AuthorMini {
    fn from(model: author::Model) -> Self {
        Self {
            author_id: model.author_id,
            name: model.name,
        }
    }
}
