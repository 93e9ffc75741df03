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

use models::{AuthorDto, CreateAuthor};

/// Authors module: author records and their book attachments
pub struct AuthorsModule;

impl AuthorsModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "authors module initialized"
        );
        Ok(())
    }

    fn routes(&self, db: &DatabaseConnection) -> Router {
        Router::new()
            .route("/", post(create_author).get(list_authors))
            .route("/{id}", get(get_author))
            .with_state(db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Create author",
                        "tags": ["Authors"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/CreateAuthor"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Author created",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Author"
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
                        "summary": "List authors",
                        "tags": ["Authors"],
                        "responses": {
                            "200": {
                                "description": "List of authors with their books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Author"
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
                        "summary": "Get author by id",
                        "tags": ["Authors"],
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
                                "description": "Author with their books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Author"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Author not found",
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
                    "CreateAuthor": {
                        "type": "object",
                        "properties": {
                            "name": {
                                "type": "string",
                                "description": "Full display name of the author"
                            },
                            "birth_year": {
                                "type": "integer",
                                "description": "Year of birth, if known"
                            }
                        },
                        "required": ["name"]
                    },
                    "Author": {
                        "type": "object",
                        "properties": {
                            "author_id": { "type": "integer" },
                            "name": { "type": "string" },
                            "birth_year": { "type": "integer" },
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
                        "required": ["author_id", "name", "books"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_authors",
            up: r#"
                CREATE TABLE IF NOT EXISTS authors (
                    author_id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    birth_year INTEGER
                );
                "#,
        }]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "authors module stopped");
        Ok(())
    }
}

/// Create a new author from a JSON payload
async fn create_author(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateAuthor>,
) -> Result<impl IntoResponse, AppError> {
    let created = store::create(&db, payload).await?;

    let location = format!("/api/authors/{}", created.author_id);
    let dto = AuthorDto::from_parts(created, vec![]);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(dto),
    ))
}

/// Fetch one author with their books
async fn get_author(
    State(db): State<DatabaseConnection>,
    Path(id): Path<i32>,
) -> Result<Json<AuthorDto>, AppError> {
    let (author, books) = store::get_with_books(&db, id).await?;
    Ok(Json(AuthorDto::from_parts(author, books)))
}

/// List all authors with their books
async fn list_authors(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<AuthorDto>>, AppError> {
    let authors = store::list_with_books(&db).await?;
    let dtos = authors
        .into_iter()
        .map(|(author, books)| AuthorDto::from_parts(author, books))
        .collect();
    Ok(Json(dtos))
}

/// Create a new instance of the authors module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    #[tokio::test]
    async fn create_author_returns_created_with_location() {
        let db = crate::testing::test_db().await;
        let app = AuthorsModule::new().routes(&db);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "N. K. Jemisin"}"#))
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
        assert!(location.starts_with("/api/authors/"));

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["name"], "N. K. Jemisin");
        assert!(body["books"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn blank_name_is_rejected_with_bad_request() {
        let db = crate::testing::test_db().await;
        let app = AuthorsModule::new().routes(&db);

        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"name": "   "}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"]["code"], "validation_error");
        assert_eq!(body["error"]["message"], "Name is required.");
    }

    #[tokio::test]
    async fn missing_author_returns_not_found() {
        let db = crate::testing::test_db().await;
        let app = AuthorsModule::new().routes(&db);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
