//! Axum extractor for the authenticated principal.
//!
//! Handlers that mutate state take an [`AuthUser`] argument; read-only
//! handlers simply omit it. The extractor expects the [`TokenService`] to be
//! provided as a request extension by the module that mounts the routes.

use std::sync::Arc;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use bookshelf_http::AppError;

use crate::token::TokenService;

/// The authenticated principal attached to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub id: i64,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let tokens = parts
            .extensions
            .get::<Arc<TokenService>>()
            .cloned()
            .ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!("token service extension not installed"))
            })?;

        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or_else(|| {
                AppError::unauthorized("Authentication credentials were not provided.")
            })?;

        let claims = tokens
            .verify_access(bearer)
            .map_err(|_| AppError::unauthorized("Given token not valid for any token type"))?;

        Ok(AuthUser { id: claims.sub })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Extension, Router};
    use tower::ServiceExt;

    fn app(tokens: Arc<TokenService>) -> Router {
        Router::new()
            .route("/", get(|user: AuthUser| async move { user.id.to_string() }))
            .layer(Extension(tokens))
    }

    fn request(auth_header: Option<String>) -> Request<Body> {
        let mut builder = Request::builder().uri("/");
        if let Some(value) = auth_header {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn missing_credentials_are_unauthorized() {
        let tokens = Arc::new(TokenService::new("test-secret", 900, 900));
        let response = app(tokens).oneshot(request(None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let tokens = Arc::new(TokenService::new("test-secret", 900, 900));
        let response = app(tokens)
            .oneshot(request(Some("Bearer not-a-token".to_string())))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_token_does_not_authenticate() {
        let tokens = Arc::new(TokenService::new("test-secret", 900, 900));
        let pair = tokens.issue_pair(3).unwrap();

        let response = app(tokens)
            .oneshot(request(Some(format!("Bearer {}", pair.refresh))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_access_token_resolves_the_principal() {
        let tokens = Arc::new(TokenService::new("test-secret", 900, 900));
        let pair = tokens.issue_pair(3).unwrap();

        let response = app(tokens)
            .oneshot(request(Some(format!("Bearer {}", pair.access))))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
        assert_eq!(&body[..], b"3");
    }
}
