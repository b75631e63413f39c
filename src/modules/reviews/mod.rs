pub mod models;
pub mod routes;
pub mod service;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};

use crate::state::AppState;

/// Reviews module: paginated listing plus guarded create/update/delete.
pub struct ReviewsModule {
    state: AppState,
}

impl ReviewsModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for ReviewsModule {
    fn name(&self) -> &'static str {
        "reviews"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "reviews module initialized"
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
                        "summary": "List reviews",
                        "description": "List all reviews, or filter by book ID.",
                        "tags": ["Reviews"],
                        "parameters": [
                            {
                                "name": "book_id",
                                "in": "query",
                                "description": "ID of the book to filter reviews by",
                                "required": false,
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
                                "description": "Paginated list of reviews",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/PaginatedReviewList"
                                        }
                                    }
                                }
                            }
                        }
                    },
                    "post": {
                        "summary": "Create a review",
                        "description": "Create a new review for a book. A user can only review the same book once.",
                        "tags": ["Reviews"],
                        "security": [{ "bearerAuth": [] }],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/ReviewInput"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "The created review",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Review"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Duplicate review",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "401": {
                                "description": "Authentication required",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "422": {
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
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Get a review",
                        "tags": ["Reviews"],
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
                                "description": "The requested review",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Review"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Review not found",
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
                    "put": {
                        "summary": "Update a review",
                        "description": "Update a review. Only the owner can edit their review.",
                        "tags": ["Reviews"],
                        "security": [{ "bearerAuth": [] }],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer", "format": "int64" }
                            }
                        ],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/ReviewUpdate"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "The updated review",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/Review"
                                        }
                                    }
                                }
                            },
                            "403": {
                                "description": "Permission denied",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Review not found",
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
                        "summary": "Delete a review",
                        "description": "Delete a review. Only the owner can delete their review.",
                        "tags": ["Reviews"],
                        "security": [{ "bearerAuth": [] }],
                        "parameters": [
                            {
                                "name": "id",
                                "in": "path",
                                "required": true,
                                "schema": { "type": "integer", "format": "int64" }
                            }
                        ],
                        "responses": {
                            "204": {
                                "description": "Review deleted"
                            },
                            "403": {
                                "description": "Permission denied",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/ErrorResponse"
                                        }
                                    }
                                }
                            },
                            "404": {
                                "description": "Review not found",
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
                    "Review": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Unique identifier for the review"
                            },
                            "book_id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "The reviewed book"
                            },
                            "reviewer_id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "The user who wrote the review"
                            },
                            "rating": {
                                "type": "integer",
                                "minimum": 1,
                                "maximum": 5,
                                "description": "Rating between 1 and 5"
                            },
                            "comment": {
                                "type": "string",
                                "description": "The text of the review"
                            },
                            "created_at": {
                                "type": "string",
                                "format": "date-time",
                                "description": "When the review was created"
                            }
                        },
                        "required": ["id", "book_id", "reviewer_id", "rating", "comment", "created_at"]
                    },
                    "ReviewInput": {
                        "type": "object",
                        "properties": {
                            "book_id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "The book to review"
                            },
                            "rating": {
                                "type": "integer",
                                "minimum": 1,
                                "maximum": 5,
                                "description": "Rating between 1 and 5"
                            },
                            "comment": {
                                "type": "string",
                                "description": "The text of the review"
                            }
                        },
                        "required": ["book_id", "rating", "comment"]
                    },
                    "ReviewUpdate": {
                        "type": "object",
                        "properties": {
                            "rating": {
                                "type": "integer",
                                "minimum": 1,
                                "maximum": 5,
                                "description": "New rating, if changing"
                            },
                            "comment": {
                                "type": "string",
                                "description": "New comment, if changing"
                            }
                        }
                    },
                    "PaginatedReviewList": {
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
                                "items": { "$ref": "#/components/schemas/Review" }
                            }
                        },
                        "required": ["links", "total_count", "page_size", "results"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "reviews module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "reviews module stopped");
        Ok(())
    }
}

/// Create a new instance of the reviews module
pub fn create_module(state: &AppState) -> Arc<dyn Module> {
    Arc::new(ReviewsModule::new(state.clone()))
}
