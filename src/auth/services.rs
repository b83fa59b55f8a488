use tracing::{debug, info, warn};

use crate::auth::password::{hash_password_async, verify_password_async};
use crate::error::{AppError, AppResult};
use crate::users::{repo::UserStore, repo_types::User};

pub(crate) const MISSING_CREDENTIALS: &str = "Username and password are required.";

/// Both fields must be present and non-empty.
pub(crate) fn require_credentials(
    username: Option<String>,
    password: Option<String>,
) -> AppResult<(String, String)> {
    match (username, password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Ok((u, p)),
        _ => Err(AppError::MissingFields(MISSING_CREDENTIALS)),
    }
}

/// Create a credentialed account. Shared by `/api/register` and `POST /users`.
pub async fn create_account(store: &dyn UserStore, username: &str, password: &str) -> AppResult<User> {
    // Ensure username is not taken
    if store.find_by_username(username).await?.is_some() {
        warn!(%username, "username already registered");
        return Err(AppError::DuplicateUsername);
    }

    let hash = hash_password_async(password.to_owned()).await?;
    // A concurrent insert of the same name surfaces as a unique violation -> DuplicateUsername.
    let user = store.create(username, &hash).await?;

    info!(user_id = user.id, username = %user.username, "account created");
    Ok(user)
}

/// Unknown usernames and wrong passwords are indistinguishable to the caller.
pub async fn authenticate(store: &dyn UserStore, username: &str, password: &str) -> AppResult<User> {
    let Some(user) = store.find_by_username(username).await? else {
        warn!(%username, "login unknown username");
        return Err(AppError::InvalidCredentials);
    };

    if !verify_password_async(password.to_owned(), user.password.clone()).await? {
        warn!(%username, user_id = user.id, "login invalid password");
        return Err(AppError::InvalidCredentials);
    }

    debug!(user_id = user.id, "credentials verified");
    Ok(user)
}
