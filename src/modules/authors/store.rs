//! Persistence operations for the authors module.

use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, ModelTrait, Set};

use folio_db::entities::prelude::{Author, Book};
use folio_db::entities::{author, book};
use folio_http::error::AppError;

use super::models::CreateAuthor;
use crate::utils::required_trimmed;

/// Insert a new author, trimming and validating the name.
pub async fn create(
    db: &DatabaseConnection,
    payload: CreateAuthor,
) -> Result<author::Model, AppError> {
    let name = required_trimmed(&payload.name, "Name")?;

    let author = author::ActiveModel {
        name: Set(name),
        birth_year: Set(payload.birth_year),
        ..Default::default()
    };

    Ok(author.insert(db).await?)
}

/// Fetch a single author together with their attached books.
pub async fn get_with_books(
    db: &DatabaseConnection,
    author_id: i32,
) -> Result<(author::Model, Vec<book::Model>), AppError> {
    let author = Author::find_by_id(author_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Author {author_id} not found")))?;

    let books = author.find_related(Book).all(db).await?;
    Ok((author, books))
}

/// List every author with their attached books eagerly loaded.
pub async fn list_with_books(
    db: &DatabaseConnection,
) -> Result<Vec<(author::Model, Vec<book::Model>)>, AppError> {
    Ok(Author::find().find_with_related(Book).all(db).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books;
    use crate::testing::test_db;

    #[tokio::test]
    async fn create_trims_and_persists() {
        let db = test_db().await;

        let created = create(
            &db,
            CreateAuthor {
                name: "  Ada Lovelace  ".to_string(),
                birth_year: Some(1815),
            },
        )
        .await
        .unwrap();

        assert!(created.author_id > 0);
        assert_eq!(created.name, "Ada Lovelace");
        assert_eq!(created.birth_year, Some(1815));
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let db = test_db().await;

        for bad in ["", "   ", "\t\n"] {
            let err = create(
                &db,
                CreateAuthor {
                    name: bad.to_string(),
                    birth_year: None,
                },
            )
            .await
            .unwrap_err();

            match err {
                AppError::Validation { message, .. } => {
                    assert_eq!(message, "Name is required.");
                }
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[tokio::test]
    async fn get_with_books_reports_missing_author() {
        let db = test_db().await;

        let err = get_with_books(&db, 999).await.unwrap_err();
        match err {
            AppError::NotFound { message, .. } => {
                assert_eq!(message, "Author 999 not found");
            }
            other => panic!("expected not found error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn list_with_books_resolves_attachments() {
        let db = test_db().await;

        let author = create(
            &db,
            CreateAuthor {
                name: "Frank Herbert".to_string(),
                birth_year: None,
            },
        )
        .await
        .unwrap();

        let book = books::store::create(
            &db,
            books::models::CreateBook {
                title: "Dune".to_string(),
                published_year: Some(1965),
            },
        )
        .await
        .unwrap();

        books::store::attach_author(&db, book.book_id, author.author_id)
            .await
            .unwrap();

        let listed = list_with_books(&db).await.unwrap();
        assert_eq!(listed.len(), 1);
        let (listed_author, listed_books) = &listed[0];
        assert_eq!(listed_author.author_id, author.author_id);
        assert_eq!(listed_books.len(), 1);
        assert_eq!(listed_books[0].title, "Dune");
    }
}
