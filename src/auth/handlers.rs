use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use crate::{
    auth::{
        dto::{AuthResponse, CredentialsRequest, PublicUser},
        services::{authenticate, create_account, require_credentials},
    },
    error::AuthFailure,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/api/register", post(register))
        .route("/api/login", post(login))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthFailure> {
    let Json(payload) = payload?;
    let (username, password) = require_credentials(payload.username, payload.password)?;

    let user = create_account(state.users.as_ref(), &username, &password).await?;

    info!(user_id = user.id, username = %user.username, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            success: true,
            message: "User registered successfully.",
            user: None,
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>, AuthFailure> {
    let Json(payload) = payload?;
    let (username, password) = require_credentials(payload.username, payload.password)?;

    let user = authenticate(state.users.as_ref(), &username, &password).await?;

    info!(user_id = user.id, username = %user.username, "user logged in");
    Ok(Json(AuthResponse {
        success: true,
        message: "Login successful.",
        user: Some(PublicUser {
            id: user.id,
            username: user.username,
        }),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_response_serialization() {
        let response = AuthResponse {
            success: true,
            message: "Login successful.",
            user: Some(PublicUser {
                id: 7,
                username: "alice".to_string(),
            }),
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["user"]["id"], 7);
        assert_eq!(json["user"]["username"], "alice");
        assert!(json["user"].get("password").is_none());
    }

    #[test]
    fn register_response_omits_user() {
        let response = AuthResponse {
            success: true,
            message: "User registered successfully.",
            user: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("user").is_none());
        assert_eq!(json["success"], true);
    }
}
