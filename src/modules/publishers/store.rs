//! Persistence operations for the publishers module.

use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter, Set,
};

use folio_db::entities::prelude::{Book, Publisher};
use folio_db::entities::{book, publisher};
use folio_http::error::AppError;

use super::models::CreatePublisher;
use crate::utils::required_trimmed;

/// Insert a new publisher, trimming and validating the name.
pub async fn create(
    db: &DatabaseConnection,
    payload: CreatePublisher,
) -> Result<publisher::Model, AppError> {
    let name = required_trimmed(&payload.name, "Name")?;

    let publisher = publisher::ActiveModel {
        name: Set(name),
        country: Set(payload.country),
        ..Default::default()
    };

    Ok(publisher.insert(db).await?)
}

/// Fetch a single publisher together with the books referencing it.
pub async fn get_with_books(
    db: &DatabaseConnection,
    publisher_id: i32,
) -> Result<(publisher::Model, Vec<book::Model>), AppError> {
    let publisher = Publisher::find_by_id(publisher_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Publisher {publisher_id} not found")))?;

    let books = publisher.find_related(Book).all(db).await?;
    Ok((publisher, books))
}

/// List every publisher with the books referencing it.
pub async fn list_with_books(
    db: &DatabaseConnection,
) -> Result<Vec<(publisher::Model, Vec<book::Model>)>, AppError> {
    Ok(Publisher::find().find_with_related(Book).all(db).await?)
}

/// Delete a publisher, clearing the reference on any book that points at it.
///
/// Books are never deleted alongside their publisher.
pub async fn delete(db: &DatabaseConnection, publisher_id: i32) -> Result<(), AppError> {
    let publisher = Publisher::find_by_id(publisher_id)
        .one(db)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Publisher {publisher_id} not found")))?;

    Book::update_many()
        .col_expr(book::Column::PublisherId, Expr::value(None::<i32>))
        .filter(book::Column::PublisherId.eq(publisher_id))
        .exec(db)
        .await?;

    publisher.delete(db).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books;
    use crate::testing::test_db;

    async fn seed_book(db: &DatabaseConnection, title: &str) -> book::Model {
        books::store::create(
            db,
            books::models::CreateBook {
                title: title.to_string(),
                published_year: None,
            },
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn create_trims_and_persists() {
        let db = test_db().await;

        let created = create(
            &db,
            CreatePublisher {
                name: "  Tor Books  ".to_string(),
                country: Some("US".to_string()),
            },
        )
        .await
        .unwrap();

        assert!(created.publisher_id > 0);
        assert_eq!(created.name, "Tor Books");
        assert_eq!(created.country, Some("US".to_string()));
    }

    #[tokio::test]
    async fn create_rejects_blank_name() {
        let db = test_db().await;

        let err = create(
            &db,
            CreatePublisher {
                name: " \t ".to_string(),
                country: None,
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

    #[tokio::test]
    async fn get_with_books_reports_missing_publisher() {
        let db = test_db().await;

        let err = get_with_books(&db, 7).await.unwrap_err();
        match err {
            AppError::NotFound { message, .. } => {
                assert_eq!(message, "Publisher 7 not found");
            }
            other => panic!("expected not found error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn delete_clears_book_references_without_deleting_books() {
        let db = test_db().await;

        let publisher = create(
            &db,
            CreatePublisher {
                name: "Ace".to_string(),
                country: None,
            },
        )
        .await
        .unwrap();

        let first = seed_book(&db, "Neuromancer").await;
        let second = seed_book(&db, "Count Zero").await;
        books::store::set_publisher(&db, first.book_id, publisher.publisher_id)
            .await
            .unwrap();
        books::store::set_publisher(&db, second.book_id, publisher.publisher_id)
            .await
            .unwrap();

        delete(&db, publisher.publisher_id).await.unwrap();

        assert!(Publisher::find_by_id(publisher.publisher_id)
            .one(&db)
            .await
            .unwrap()
            .is_none());

        let survivors = Book::find().all(&db).await.unwrap();
        assert_eq!(survivors.len(), 2);
        assert!(survivors.iter().all(|b| b.publisher_id.is_none()));
    }

    #[tokio::test]
    async fn delete_reports_missing_publisher() {
        let db = test_db().await;

        let err = delete(&db, 123).await.unwrap_err();
        match err {
            AppError::NotFound { message, .. } => {
                assert_eq!(message, "Publisher 123 not found");
            }
            other => panic!("expected not found error, got {other:?}"),
        }
    }
}
