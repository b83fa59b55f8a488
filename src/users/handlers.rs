use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::CredentialsRequest,
        password::hash_password_async,
        services::{create_account, require_credentials},
    },
    dto::MessageResponse,
    error::{path_id, AppError, AppResult},
    state::AppState,
    users::{
        dto::{UpdateUserRequest, UpdatedUserResponse, UserResponse},
        repo_types::UserChanges,
    },
};

const USER_NOT_FOUND: &str = "User not found";

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", put(update_user).delete(delete_user))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserResponse>>> {
    let users = state.users.list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CredentialsRequest>, JsonRejection>,
) -> AppResult<(StatusCode, Json<UserResponse>)> {
    let Json(payload) = payload?;
    let (username, password) = require_credentials(payload.username, payload.password)?;

    let user = create_account(state.users.as_ref(), &username, &password).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// An absent or empty `password` clears the stored password; the account can no longer log in.
#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> AppResult<Json<UpdatedUserResponse>> {
    let id = path_id(id, USER_NOT_FOUND)?;
    let Json(payload) = payload?;

    let password_hash = match payload.password.filter(|p| !p.is_empty()) {
        Some(plain) => hash_password_async(plain).await?,
        None => {
            warn!(user_id = id, "update without password clears the stored password");
            String::new()
        }
    };
    let changes = UserChanges {
        username: payload.username.filter(|u| !u.is_empty()),
        password_hash,
    };

    let user = state
        .users
        .update(id, changes)
        .await?
        .ok_or(AppError::NotFound(USER_NOT_FOUND))?;

    info!(user_id = user.id, username = %user.username, "user updated");
    Ok(Json(UpdatedUserResponse {
        id: user.id,
        username: user.username,
    }))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    id: Result<Path<i64>, PathRejection>,
) -> AppResult<Json<MessageResponse>> {
    let id = path_id(id, USER_NOT_FOUND)?;
    if !state.users.delete(id).await? {
        return Err(AppError::NotFound(USER_NOT_FOUND));
    }

    info!(user_id = id, "user deleted");
    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}
