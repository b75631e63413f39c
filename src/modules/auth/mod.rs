pub mod models;
pub mod routes;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookshelf_kernel::{InitCtx, Module};

use crate::state::AppState;

/// Auth module: account registration and JWT login/refresh.
pub struct AuthModule {
    state: AppState,
}

impl AuthModule {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

#[async_trait]
impl Module for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "auth module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(serde_json::json!({
            "paths": {
                "/register": {
                    "post": {
                        "summary": "Register a new user",
                        "tags": ["Auth"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/RegisterInput"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "201": {
                                "description": "The created user",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/User"
                                        }
                                    }
                                }
                            },
                            "400": {
                                "description": "Username already taken",
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
                "/login": {
                    "post": {
                        "summary": "Obtain an access/refresh token pair",
                        "tags": ["Auth"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/LoginInput"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Token pair",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/TokenPair"
                                        }
                                    }
                                }
                            },
                            "401": {
                                "description": "Bad credentials",
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
                "/token/refresh": {
                    "post": {
                        "summary": "Refresh an access token",
                        "tags": ["Auth"],
                        "requestBody": {
                            "required": true,
                            "content": {
                                "application/json": {
                                    "schema": {
                                        "$ref": "#/components/schemas/RefreshInput"
                                    }
                                }
                            }
                        },
                        "responses": {
                            "200": {
                                "description": "Fresh access token",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "$ref": "#/components/schemas/AccessToken"
                                        }
                                    }
                                }
                            },
                            "401": {
                                "description": "Invalid or expired refresh token",
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
                    "User": {
                        "type": "object",
                        "properties": {
                            "id": {
                                "type": "integer",
                                "format": "int64",
                                "description": "Unique identifier for the user"
                            },
                            "username": {
                                "type": "string",
                                "description": "The user's login name"
                            },
                            "email": {
                                "type": "string",
                                "format": "email",
                                "description": "The user's email address"
                            }
                        },
                        "required": ["id", "username", "email"]
                    },
                    "RegisterInput": {
                        "type": "object",
                        "properties": {
                            "username": {
                                "type": "string",
                                "minLength": 3,
                                "maxLength": 150
                            },
                            "password": {
                                "type": "string",
                                "format": "password",
                                "minLength": 8,
                                "writeOnly": true
                            },
                            "email": {
                                "type": "string",
                                "format": "email"
                            }
                        },
                        "required": ["username", "password", "email"]
                    },
                    "LoginInput": {
                        "type": "object",
                        "properties": {
                            "username": { "type": "string" },
                            "password": { "type": "string", "format": "password" }
                        },
                        "required": ["username", "password"]
                    },
                    "TokenPair": {
                        "type": "object",
                        "properties": {
                            "access": { "type": "string" },
                            "refresh": { "type": "string" }
                        },
                        "required": ["access", "refresh"]
                    },
                    "RefreshInput": {
                        "type": "object",
                        "properties": {
                            "refresh": { "type": "string" }
                        },
                        "required": ["refresh"]
                    },
                    "AccessToken": {
                        "type": "object",
                        "properties": {
                            "access": { "type": "string" }
                        },
                        "required": ["access"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "auth module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "auth module stopped");
        Ok(())
    }
}

/// Create a new instance of the auth module
pub fn create_module(state: &AppState) -> Arc<dyn Module> {
    Arc::new(AuthModule::new(state.clone()))
}
