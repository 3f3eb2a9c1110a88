//! Registration, login, and profile picture handlers.
//!
//! Credentials are stored as SHA-256 hex digests; the raw password
//! never reaches the storage layer.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use natter_core::repository::user::UserRepository;
use natter_types::user::User;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for /register and /login.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub username: String,
    pub password: String,
}

/// Request body for POST /profile-pic.
#[derive(Debug, Deserialize)]
pub struct ProfilePicRequest {
    pub username: String,
    #[serde(rename = "profilePic")]
    pub profile_pic: String,
}

fn digest(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// POST /register - Create a new account.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<User>, AppError> {
    if body.username.trim().is_empty() {
        return Err(AppError::Validation("username must not be empty".to_string()));
    }

    let user = state
        .users
        .create_user(&body.username, &digest(&body.password))
        .await?;

    tracing::info!(username = %user.username, "user registered");
    Ok(Json(user))
}

/// POST /login - Authenticate and return the account.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<CredentialsRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .find_by_credentials(&body.username, &digest(&body.password))
        .await?
        .ok_or_else(|| AppError::Unauthorized("invalid credentials".to_string()))?;

    Ok(Json(user))
}

/// POST /profile-pic - Store a user's profile picture.
pub async fn set_profile_pic(
    State(state): State<AppState>,
    Json(body): Json<ProfilePicRequest>,
) -> Result<Json<User>, AppError> {
    let user = state
        .users
        .set_profile_pic(&body.username, &body.profile_pic)
        .await?;

    Ok(Json(user))
}

/// GET /profile-pic/{username} - Fetch a user's profile picture.
pub async fn get_profile_pic(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    let pic = state.users.profile_pic(&username).await?;
    Ok(Json(serde_json::json!({ "profile_pic": pic })))
}
