//! Registration, login, and token refresh.

use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use validator::Validate;

use bookshelf_auth::{password, TokenPair};
use bookshelf_http::AppError;
use bookshelf_store::NewUser;

use crate::modules::store_error;
use crate::state::AppState;

use super::models::{
    AccessTokenResponse, LoginRequest, RefreshRequest, RegisterRequest, UserResponse,
};

const BAD_CREDENTIALS_MESSAGE: &str = "No active account found with the given credentials";

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/token/refresh", post(refresh))
        .with_state(state)
}

/// Register a new account
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    request.validate()?;

    let password_hash = password::hash_password(&request.password)
        .map_err(|error| AppError::Internal(error.into()))?;

    let user = state
        .users
        .create_user(NewUser {
            username: request.username,
            email: request.email,
            password_hash,
        })
        .await
        .map_err(store_error)?;

    tracing::info!(user_id = user.id, "account registered");
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Exchange credentials for an access/refresh token pair
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPair>, AppError> {
    let user = state
        .users
        .find_user_by_username(&request.username)
        .await
        .map_err(store_error)?
        .ok_or_else(|| AppError::unauthorized(BAD_CREDENTIALS_MESSAGE))?;

    let verified = password::verify_password(&request.password, &user.password_hash)
        .map_err(|error| AppError::Internal(error.into()))?;
    if !verified {
        return Err(AppError::unauthorized(BAD_CREDENTIALS_MESSAGE));
    }

    let pair = state
        .tokens
        .issue_pair(user.id)
        .map_err(|error| AppError::Internal(error.into()))?;

    Ok(Json(pair))
}

/// Exchange a refresh token for a fresh access token
async fn refresh(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<AccessTokenResponse>, AppError> {
    let access = state
        .tokens
        .refresh(&request.refresh)
        .map_err(|_| AppError::unauthorized("Token is invalid or expired"))?;

    Ok(Json(AccessTokenResponse { access }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn register_payload() -> serde_json::Value {
        serde_json::json!({
            "username": "testuser",
            "password": "testpassword",
            "email": "testuser@example.com"
        })
    }

    #[tokio::test]
    async fn register_then_login_yields_tokens() {
        let state = AppState::for_tests();
        let app = router(state.clone());

        let registered = app
            .clone()
            .oneshot(post_json("/register", register_payload()))
            .await
            .unwrap();
        assert_eq!(registered.status(), StatusCode::CREATED);
        let body = body_json(registered).await;
        assert_eq!(body["username"], "testuser");
        assert!(body.get("password").is_none());
        assert!(body.get("password_hash").is_none());

        let logged_in = app
            .oneshot(post_json(
                "/login",
                serde_json::json!({"username": "testuser", "password": "testpassword"}),
            ))
            .await
            .unwrap();
        assert_eq!(logged_in.status(), StatusCode::OK);
        let tokens = body_json(logged_in).await;

        let access = tokens["access"].as_str().unwrap();
        let claims = state.tokens.verify_access(access).unwrap();
        assert_eq!(claims.sub, body["id"].as_i64().unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_a_400() {
        let app = router(AppState::for_tests());

        let first = app
            .clone()
            .oneshot(post_json("/register", register_payload()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(post_json("/register", register_payload()))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::BAD_REQUEST);
        let body = body_json(second).await;
        assert_eq!(
            body["error"]["message"],
            "A user with that username already exists."
        );
    }

    #[tokio::test]
    async fn wrong_password_is_unauthorized() {
        let app = router(AppState::for_tests());
        app.clone()
            .oneshot(post_json("/register", register_payload()))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json(
                "/login",
                serde_json::json!({"username": "testuser", "password": "wrongpassword"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_user_is_unauthorized() {
        let response = router(AppState::for_tests())
            .oneshot(post_json(
                "/login",
                serde_json::json!({"username": "nobody", "password": "testpassword"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn refresh_flow_mints_a_working_access_token() {
        let state = AppState::for_tests();
        let app = router(state.clone());
        app.clone()
            .oneshot(post_json("/register", register_payload()))
            .await
            .unwrap();

        let logged_in = app
            .clone()
            .oneshot(post_json(
                "/login",
                serde_json::json!({"username": "testuser", "password": "testpassword"}),
            ))
            .await
            .unwrap();
        let tokens = body_json(logged_in).await;

        let refreshed = app
            .oneshot(post_json(
                "/token/refresh",
                serde_json::json!({"refresh": tokens["refresh"]}),
            ))
            .await
            .unwrap();
        assert_eq!(refreshed.status(), StatusCode::OK);

        let body = body_json(refreshed).await;
        let access = body["access"].as_str().unwrap();
        assert!(state.tokens.verify_access(access).is_ok());
    }

    #[tokio::test]
    async fn access_token_is_rejected_by_refresh() {
        let state = AppState::for_tests();
        let pair = state.tokens.issue_pair(1).unwrap();

        let response = router(state)
            .oneshot(post_json(
                "/token/refresh",
                serde_json::json!({"refresh": pair.access}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_registration_reports_field_errors() {
        let response = router(AppState::for_tests())
            .oneshot(post_json(
                "/register",
                serde_json::json!({
                    "username": "ab",
                    "password": "short",
                    "email": "not-an-email"
                }),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        let fields: Vec<&str> = body["error"]["details"]
            .as_array()
            .unwrap()
            .iter()
            .map(|detail| detail["field"].as_str().unwrap())
            .collect();
        assert!(fields.contains(&"username"));
        assert!(fields.contains(&"password"));
        assert!(fields.contains(&"email"));
    }
}
