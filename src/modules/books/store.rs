//! Persistence operations for the books module.

use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait, Set,
};

use folio_db::entities::prelude::{Author, AuthorBooks, Book, Publisher};
use folio_db::entities::{author, author_books, book, publisher};
use folio_http::error::AppError;

use super::models::CreateBook;
use crate::utils::required_trimmed;

/// Insert a new book, trimming and validating the title.
pub async fn create(db: &DatabaseConnection, payload: CreateBook) -> Result<book::Model, AppError> {
    let title = required_trimmed(&payload.title, "Title")?;

    let book = book::ActiveModel {
        title: Set(title),
        published_year: Set(payload.published_year),
        ..Default::default()
    };

    Ok(book.insert(db).await?)
}

/// Fetch a single book with its authors and publisher resolved.
pub async fn get_detailed(
    db: &DatabaseConnection,
    book_id: i32,
) -> Result<(book::Model, Vec<author::Model>, Option<publisher::Model>), AppError> {
    let book = Book::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;

    let authors = book.find_related(Author).all(db).await?;
    let publisher = book.find_related(Publisher).one(db).await?;
    Ok((book, authors, publisher))
}

/// List every book with authors and publisher resolved.
pub async fn list_detailed(
    db: &DatabaseConnection,
) -> Result<Vec<(book::Model, Vec<author::Model>, Option<publisher::Model>)>, AppError> {
    let with_authors = Book::find().find_with_related(Author).all(db).await?;

    // One publisher lookup for the whole listing instead of a query per book.
    let publishers: HashMap<i32, publisher::Model> = Publisher::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.publisher_id, p))
        .collect();

    Ok(with_authors
        .into_iter()
        .map(|(book, authors)| {
            let publisher = book.publisher_id.and_then(|id| publishers.get(&id).cloned());
            (book, authors, publisher)
        })
        .collect())
}

/// Attach an author to a book, creating the association if it does not exist.
///
/// Attaching an already-attached author is a no-op, not an error.
pub async fn attach_author(
    db: &DatabaseConnection,
    book_id: i32,
    author_id: i32,
) -> Result<(), AppError> {
    Book::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;
    Author::find_by_id(author_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Author {author_id} not found")))?;

    let existing = AuthorBooks::find_by_id((author_id, book_id)).one(db).await?;
    if existing.is_some() {
        return Ok(());
    }

    let link = author_books::ActiveModel {
        author_id: Set(author_id),
        book_id: Set(book_id),
    };
    link.insert(db).await?;
    Ok(())
}

/// Point a book at a publisher, overwriting any previous reference.
pub async fn set_publisher(
    db: &DatabaseConnection,
    book_id: i32,
    publisher_id: i32,
) -> Result<book::Model, AppError> {
    let book = Book::find_by_id(book_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Book {book_id} not found")))?;
    Publisher::find_by_id(publisher_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Publisher {publisher_id} not found")))?;

    let mut active = book.into_active_model();
    active.publisher_id = Set(Some(publisher_id));
    Ok(active.update(db).await?)
}
