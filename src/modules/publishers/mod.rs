pub mod models;
pub mod store;

use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use folio_http::error::AppError;
use folio_kernel::{InitCtx, Migration, Module};
use sea_orm::DatabaseConnection;

use models::{CreatePublisher, PublisherDto};

/// Publishers module: publisher records and the books referencing them
pub struct PublishersModule;

impl PublishersModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for PublishersModule {
    fn name(&self) -> &'static str {
        "publishers"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "publishers module initialized"
        );
        Ok(())
    }

    fn routes(&self, db: &DatabaseConnection) -> Router {
        Router::new()
            .route("/", post(create_publisher).get(list_publishers))
            .route("/{id}", get(get_publisher).delete(delete_publisher))
            .with_state(db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Create publisher",
                        "tags": ["Publishers"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/CreatePublisher"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Publisher created",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Publisher"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Validation error",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "get": {
                        "summary": "List publishers",
                        "tags": ["Publishers"],
                        "responses": {
                            "200": {
                                "description": "List of publishers with their books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Publisher"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get publisher by id",
                        "tags": ["Publishers"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Publisher with its books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Publisher"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Publisher not found",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "delete": {
                        "summary": "Delete publisher",
                        "description": "Books referencing the publisher keep existing with their publisher cleared.",
                        "tags": ["Publishers"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "204": {
                                "description": "Publisher deleted"
                            },
                            "404": {
                                "description": "Publisher not found",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "CreatePublisher": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string",
                                "description": "Publisher display name"
                            },
                            "country": {
                                "type": "string",
                                "description": "Country of the head office, if known"
                            }
                        },
                        "required": ["name"]
                    },
                    "Publisher": {
                        "type": "object",
                        "properties": {
                            "publisher_id": { "type": "integer" },
                            "name": { "type": "string" },
                            "country": { "type": "string" },
                            "books": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "book_id": { "type": "integer" },
                                        "title": { "type": "string" }
                                    }
                                }
                            }
                        },
                        "required": ["publisher_id", "name", "books"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_publishers",
            up: r#"
                CREATE TABLE IF NOT EXISTS publishers (
                    publisher_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    country TEXT
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "publishers module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "publishers module stopped");
        Ok(())
    }
}

/// Create a new publisher from a JSON payload
async fn create_publisher(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreatePublisher>,
) -> Result<impl IntoResponse, AppError> {
    let created = store::create(&db, payload).await?;

    let location = format!("/api/publishers/{}", created.publisher_id);
    let dto = PublisherDto::from_parts(created, vec![]);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(dto),
    ))
}

/// Fetch one publisher with its books
async fn get_publisher(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<PublisherDto>, AppError> {
    let (publisher, books) = store::get_with_books(&db, id).await?;
    Ok(Json(PublisherDto::from_parts(publisher, books)))
}

/// List all publishers with their books
async fn list_publishers(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<PublisherDto>>, AppError> {
    let publishers = store::list_with_books(&db).await?;
    let dtos = publishers
        .into_iter()
        .map(|(publisher, books)| PublisherDto::from_parts(publisher, books))
        .collect();
    Ok(Json(dtos))
}

/// Delete a publisher, clearing book references
async fn delete_publisher(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<StatusCode, AppError> {
    store::delete(&db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Create a new instance of the publishers module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(PublishersModule::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn create_publisher_returns_created_with_location() {
        let db = crate::testing::test_db().await;
        let app = PublishersModule::new().routes(&db);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "Orbit", "country": "UK"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let location = response
            .headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(location.starts_with("/api/publishers/"));
    }

    #[tokio::test]
    async fn delete_returns_no_content() {
        let db = crate::testing::test_db().await;

        let publisher = store::create(
            &db,
            CreatePublisher {
                name: "Gollancz".to_string(),
                country: None,
            },
        )
        .await
        .unwrap();

        let app = PublishersModule::new().routes(&db);
        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/{}", publisher.publisher_id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn delete_missing_publisher_returns_not_found() {
        let db = crate::testing::test_db().await;
        let app = PublishersModule::new().routes(&db);

        let response = app
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/999")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
