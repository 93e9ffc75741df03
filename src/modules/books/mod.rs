pub mod models;
pub mod queries;
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

use crate::modules::authors::models::AuthorMini;
use crate::modules::publishers::models::PublisherMini;
use models::{BookDto, BookMini, CreateBook, JoinRow};

/// Books module: book records, author attachments, publisher references,
/// and the canned catalog queries
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self, db: &DatabaseConnection) -> Router {
        Router::new()
            .route("/", post(create_book).get(list_books))
            .route("/by-author/{author_id}", get(by_author))
            .route("/authors-gt2-groupby", get(authors_gt2_groupby))
            .route("/after-year", get(after_year))
            .route("/after-year/{year}", get(after_year))
            .route("/publishers-atleast", get(publishers_atleast))
            .route("/publishers-atleast/{min}", get(publishers_atleast))
            .route("/join-abp", get(join_abp))
            .route("/{book_id}", get(get_book))
            .route("/{book_id}/attach-author/{author_id}", post(attach_author))
            .route("/{book_id}/set-publisher/{publisher_id}", post(set_publisher))
            .with_state(db.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "post": {
                        "summary": "Create book",
                        "tags": ["Books"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/CreateBook"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "Book created",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Book"
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
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "List of books with authors and publisher",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/Book"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{book_id}": {
                    "get": {
                        "summary": "Get book by id",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "book_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Book with authors and publisher",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Book"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Book not found",
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
                },
                "/{book_id}/attach-author/{author_id}": {
                    "post": {
                        "summary": "Attach author to book",
                        "description": "Attaching an already-attached author is a no-op.",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "book_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            },
                            {
                                "name": "author_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "204": {
                                "description": "Association ensured"
                            },
                            "404": {
                                "description": "Book or author not found",
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
                },
                "/{book_id}/set-publisher/{publisher_id}": {
                    "post": {
                        "summary": "Set book publisher",
                        "description": "Overwrites any previous publisher reference.",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "book_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            },
                            {
                                "name": "publisher_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "204": {
                                "description": "Publisher reference updated"
                            },
                            "404": {
                                "description": "Book or publisher not found",
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
                },
                "/by-author/{author_id}": {
                    "get": {
                        "summary": "Books by author",
                        "tags": ["Queries"],
                        "parameters": [
                            {
                                "name": "author_id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Books attached to the author, empty if none",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/BookMini"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/authors-gt2-groupby": {
                    "get": {
                        "summary": "Authors with more than two books",
                        "tags": ["Queries"],
                        "responses": {
                            "200": {
                                "description": "Authors attached to strictly more than two books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "type": "object",
                                                "properties": {
                                                    "author_id": { "type": "integer" },
                                                    "name": { "type": "string" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/after-year": {
                    "get": {
                        "summary": "Books published after 2015",
                        "tags": ["Queries"],
                        "responses": {
                            "200": {
                                "description": "Books with a published year strictly after the default bound",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/BookMini"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/after-year/{year}": {
                    "get": {
                        "summary": "Books published after a year",
                        "tags": ["Queries"],
                        "parameters": [
                            {
                                "name": "year",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Books with a published year strictly after the bound",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/BookMini"
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/publishers-atleast": {
                    "get": {
                        "summary": "Publishers with at least 3 books",
                        "tags": ["Queries"],
                        "responses": {
                            "200": {
                                "description": "Publishers whose book count meets the default floor",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "type": "object",
                                                "properties": {
                                                    "publisher_id": { "type": "integer" },
                                                    "name": { "type": "string" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/publishers-atleast/{min}": {
                    "get": {
                        "summary": "Publishers with at least a number of books",
                        "tags": ["Queries"],
                        "parameters": [
                            {
                                "name": "min",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Publishers whose book count meets the floor",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "type": "object",
                                                "properties": {
                                                    "publisher_id": { "type": "integer" },
                                                    "name": { "type": "string" }
                                                }
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/join-abp": {
                    "get": {
                        "summary": "Author/book/publisher join report",
                        "description": "One row per (book, author) pair with placeholder names for missing authors and publishers.",
                        "tags": ["Queries"],
                        "responses": {
                            "200": {
                                "description": "Flattened join rows",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {
                                                "$ref": "#/components/schemas/JoinRow"
                                            }
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
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "published_year": {
                                "type": "integer",
                                "description": "Year of first publication, if known"
                            }
                        },
                        "required": ["title"]
                    },
                    "Book": {
                        "type": "object",
                        "properties": {
                            "book_id": { "type": "integer" },
                            "title": { "type": "string" },
                            "published_year": { "type": "integer" },
                            "publisher": {
                                "type": "object",
                                "properties": {
                                    "publisher_id": { "type": "integer" },
                                    "name": { "type": "string" }
                                }
                            },
                            "authors": {
                                "type": "array",
                                "items": {
                                    "type": "object",
                                    "properties": {
                                        "author_id": { "type": "integer" },
                                        "name": { "type": "string" }
                                    }
                                }
                            }
                        },
                        "required": ["book_id", "title", "authors"]
                    },
                    "BookMini": {
                        "type": "object",
                        "properties": {
                            "book_id": { "type": "integer" },
                            "title": { "type": "string" }
                        },
                        "required": ["book_id", "title"]
                    },
                    "JoinRow": {
                        "type": "object",
                        "properties": {
                            "author_name": { "type": "string" },
                            "book_title": { "type": "string" },
                            "publisher_name": { "type": "string" }
                        },
                        "required": ["author_name", "book_title", "publisher_name"]
                    }
                }
            }
        }))
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![
            Migration {
                id: "001_create_books",
                up: r#"
                    CREATE TABLE IF NOT EXISTS books (
                        book_id INTEGER PRIMARY KEY AUTOINCREMENT,
                        title TEXT NOT NULL,
                        published_year INTEGER,
                        publisher_id INTEGER REFERENCES publishers(publisher_id) ON DELETE SET NULL
                    );
                    "#,
            },
            Migration {
                id: "002_create_author_books",
                up: r#"
                    CREATE TABLE IF NOT EXISTS author_books (
                        author_id INTEGER NOT NULL REFERENCES authors(author_id) ON DELETE CASCADE,
                        book_id INTEGER NOT NULL REFERENCES books(book_id) ON DELETE CASCADE,
                        PRIMARY KEY (author_id, book_id)
                    );
                    "#,
            },
        ]
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new book from a JSON payload
async fn create_book(
    State(db): State<DatabaseConnection>,
    Json(payload): Json<CreateBook>,
) -> Result<impl IntoResponse, AppError> {
    let created = store::create(&db, payload).await?;

    let location = format!("/api/books/{}", created.book_id);
    let dto = BookDto::from_parts(created, vec![], None);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(dto),
    ))
}

/// Fetch one book with authors and publisher
async fn get_book(
    State(db): State<DatabaseConnection>,
    Path(book_id): Path<i32>,
) -> Result<Json<BookDto>, AppError> {
    let (book, authors, publisher) = store::get_detailed(&db, book_id).await?;
    Ok(Json(BookDto::from_parts(book, authors, publisher)))
}

/// List all books with authors and publisher
async fn list_books(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<BookDto>>, AppError> {
    let books = store::list_detailed(&db).await?;
    let dtos = books
        .into_iter()
        .map(|(book, authors, publisher)| BookDto::from_parts(book, authors, publisher))
        .collect();
    Ok(Json(dtos))
}

/// Ensure an author is attached to a book
async fn attach_author(
    State(db): State<DatabaseConnection>,
    Path((book_id, author_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    store::attach_author(&db, book_id, author_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Overwrite a book's publisher reference
async fn set_publisher(
    State(db): State<DatabaseConnection>,
    Path((book_id, publisher_id)): Path<(i32, i32)>,
) -> Result<StatusCode, AppError> {
    store::set_publisher(&db, book_id, publisher_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Books attached to the given author
async fn by_author(
    State(db): State<DatabaseConnection>,
    Path(author_id): Path<i32>,
) -> Result<Json<Vec<BookMini>>, AppError> {
    Ok(Json(queries::books_by_author(&db, author_id).await?))
}

/// Authors with strictly more than two books
async fn authors_gt2_groupby(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<AuthorMini>>, AppError> {
    Ok(Json(queries::authors_with_more_than_two_books(&db).await?))
}

/// Books published strictly after a year, defaulting the bound when omitted
async fn after_year(
    State(db): State<DatabaseConnection>,
    year: Option<Path<i32>>,
) -> Result<Json<Vec<BookMini>>, AppError> {
    let year = year.map_or(queries::DEFAULT_PUBLISHED_AFTER_YEAR, |Path(y)| y);
    Ok(Json(queries::books_published_after(&db, year).await?))
}

/// Publishers with at least a number of books, defaulting the floor when omitted
async fn publishers_atleast(
    State(db): State<DatabaseConnection>,
    min: Option<Path<i32>>,
) -> Result<Json<Vec<PublisherMini>>, AppError> {
    let min = min.map_or(queries::DEFAULT_MIN_PUBLISHER_BOOKS, |Path(m)| m);
    Ok(Json(queries::publishers_with_at_least(&db, min).await?))
}

/// Flattened author/book/publisher report
async fn join_abp(
    State(db): State<DatabaseConnection>,
) -> Result<Json<Vec<JoinRow>>, AppError> {
    Ok(Json(queries::join_author_book_publisher(&db).await?))
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
