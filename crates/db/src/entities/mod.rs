//! SeaORM entities for the catalog schema.

pub mod prelude;

pub mod author;
pub mod author_books;
pub mod book;
pub mod publisher;
