//! Canned read-only queries over the author/book/publisher schema.

use std::collections::HashMap;

use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter, QuerySelect, RelationTrait,
};

use folio_db::entities::prelude::{Author, Book, Publisher};
use folio_db::entities::{author, author_books, book, publisher};
use folio_http::error::AppError;

use super::models::{BookMini, JoinRow};
use crate::modules::authors::models::AuthorMini;
use crate::modules::publishers::models::PublisherMini;

/// Year bound applied when the after-year query is called without one.
pub const DEFAULT_PUBLISHED_AFTER_YEAR: i32 = 2015;

/// Book count floor applied when the publishers query is called without one.
pub const DEFAULT_MIN_PUBLISHER_BOOKS: i32 = 3;

/// Placeholder publisher name for books without a publisher reference.
pub const NO_PUBLISHER: &str = "(No Publisher)";

/// Placeholder author name for books without any attached author.
pub const NO_AUTHOR: &str = "(No Author)";

/// Books attached to the given author. Unknown authors yield an empty list.
pub async fn books_by_author(
    db: &DatabaseConnection,
    author_id: i32,
) -> Result<Vec<BookMini>, AppError> {
    let books = Book::find()
        .join_rev(JoinType::InnerJoin, author_books::Relation::Book.def())
        .filter(author_books::Column::AuthorId.eq(author_id))
        .all(db)
        .await?;

    Ok(books.into_iter().map(BookMini::from).collect())
}

/// Authors attached to strictly more than two books.
///
/// Grouped over the association table, so authors with zero books never
/// appear in the candidate set to begin with.
pub async fn authors_with_more_than_two_books(
    db: &DatabaseConnection,
) -> Result<Vec<AuthorMini>, AppError> {
    let rows: Vec<(i32, String)> = Author::find()
        .select_only()
        .column(author::Column::AuthorId)
        .column(author::Column::Name)
        .join_rev(JoinType::InnerJoin, author_books::Relation::Author.def())
        .group_by(author::Column::AuthorId)
        .group_by(author::Column::Name)
        .having(Expr::col((author_books::Entity, author_books::Column::BookId)).count().gt(2))
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(author_id, name)| AuthorMini { author_id, name })
        .collect())
}

/// Books published strictly after the given year.
///
/// Books without a published year are excluded regardless of the bound.
pub async fn books_published_after(
    db: &DatabaseConnection,
    year: i32,
) -> Result<Vec<BookMini>, AppError> {
    let books = Book::find()
        .filter(book::Column::PublishedYear.is_not_null())
        .filter(book::Column::PublishedYear.gt(year))
        .all(db)
        .await?;

    Ok(books.into_iter().map(BookMini::from).collect())
}

/// Publishers referenced by at least `min` books.
///
/// The join is a left join and the count only sees matched book rows, so a
/// publisher with zero books still qualifies when `min` is zero or negative.
pub async fn publishers_with_at_least(
    db: &DatabaseConnection,
    min: i32,
) -> Result<Vec<PublisherMini>, AppError> {
    let rows: Vec<(i32, String)> = Publisher::find()
        .select_only()
        .column(publisher::Column::PublisherId)
        .column(publisher::Column::Name)
        .join(JoinType::LeftJoin, publisher::Relation::Book.def())
        .group_by(publisher::Column::PublisherId)
        .group_by(publisher::Column::Name)
        .having(Expr::col((book::Entity, book::Column::BookId)).count().gte(min))
        .into_tuple()
        .all(db)
        .await?;

    Ok(rows
        .into_iter()
        .map(|(publisher_id, name)| PublisherMini { publisher_id, name })
        .collect())
}

/// Flatten every book into one row per (book, author) pair with the
/// publisher name resolved.
///
/// No book is dropped: a book without authors gets a single row with the
/// author placeholder, and a missing publisher becomes the publisher
/// placeholder.
pub async fn join_author_book_publisher(
    db: &DatabaseConnection,
) -> Result<Vec<JoinRow>, AppError> {
    let publishers: HashMap<i32, String> = Publisher::find()
        .all(db)
        .await?
        .into_iter()
        .map(|p| (p.publisher_id, p.name))
        .collect();

    let books = Book::find().find_with_related(Author).all(db).await?;

    let mut rows = Vec::new();
    for (book, authors) in books {
        let publisher_name = book
            .publisher_id
            .and_then(|id| publishers.get(&id).cloned())
            .unwrap_or_else(|| NO_PUBLISHER.to_string());

        if authors.is_empty() {
            rows.push(JoinRow {
                author_name: NO_AUTHOR.to_string(),
                book_title: book.title,
                publisher_name,
            });
            continue;
        }

        for author in authors {
            rows.push(JoinRow {
                author_name: author.name,
                book_title: book.title.clone(),
                publisher_name: publisher_name.clone(),
            });
        }
    }

    Ok(rows)
}
