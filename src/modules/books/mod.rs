pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};

use crate::state::AppState;

/// Books module: read-only catalog endpoints, administrative seeding, and
/// the rating aggregator the review operations call into.
pub struct BooksModule {
    state: AppState,
}

impl BooksModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if let Some(seed_path) = &ctx.settings.store.seed_path {
            if seed_path.exists() {
                let count = self.state.catalog.seed_from_file(seed_path).await?;
                tracing::info!(module = self.name(), count, "seeded book catalog");
            } else {
                tracing::warn!(
                    module = self.name(),
                    path = %seed_path.display(),
                    "seed file not found; starting with an empty catalog"
                );
            }
        }

        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "page",
                                "in": "query",
                                "description": "Page number for pagination",
                                "required": false,
                                "schema": { "type": "integer" }
                            },
                            {
                                "name": "page_size",
                                "in": "query",
                                "description": "Number of results per page (max: 100)",
                                "required": false,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Paginated list of books",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/PaginatedBookList"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Invalid page",
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
                "/{id}": {
                    "get": {
                        "summary": "Get a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer", "format": "int64" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "The requested book",
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
                "/{id}/reviews": {
                    "get": {
                        "summary": "List reviews for a book",
                        "tags": ["Books"],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer", "format": "int64" }
                            },
                            {
                                "name": "page",
                                "in": "query",
                                "description": "Page number for pagination",
                                "required": false,
                                "schema": { "type": "integer" }
                            },
                            {
                                "name": "page_size",
                                "in": "query",
                                "description": "Number of results per page (max: 100)",
                                "required": false,
                                "schema": { "type": "integer" }
                            }
                        ],
                        "responses": {
                            "200": {
                                "description": "Paginated reviews of the book",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/PaginatedReviewList"
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
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Unique identifier for the book"
                            },
                            "title": {
                                "type": "string",
                                "description": "Title of the book"
                            },
                            "author": {
                                "type": "string",
                                "description": "Author of the book"
                            },
                            "publishing_date": {
                                "type": "string",
                                "format": "date",
                                "description": "Publication date of the book"
                            },
                            "category": {
                                "type": "string",
                                "description": "Category the book is filed under"
                            },
                            "url": {
                                "type": "string",
                                "format": "uri",
                                "description": "External URL for the book"
                            },
                            "average_rating": {
                                "type": "string",
                                "example": "4.50",
                                "description": "Cached mean of the book's review ratings, two decimals"
                            },
                            "created_at": {
                                "type": "string",
                                "format": "date-time",
                                "description": "When the book was catalogued"
                            }
                        },
                        "required": ["id", "title", "author", "publishing_date", "category", "url", "average_rating", "created_at"]
                    },
                    "PaginatedBookList": {
                        "type": "object",
                        "properties": {
                            "links": {
                                "type": "object",
                                "properties": {
                                    "next": { "type": "string", "nullable": true },
                                    "previous": { "type": "string", "nullable": true }
                                }
                            },
                            "total_count": { "type": "integer" },
                            "page_size": { "type": "integer" },
                            "results": {
                                "type": "array",
                                "items": { "$ref": "#/components/schemas/Book" }
                            }
                        },
                        "required": ["links", "total_count", "page_size", "results"]
                    }
                }
            }
        }))
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

/// Create a new instance of the books module
pub fn create_module(state: &AppState) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(state.clone()))
}
