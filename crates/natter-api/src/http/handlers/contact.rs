//! Contact list handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use natter_core::repository::contact::ContactRepository;
use natter_core::repository::user::UserRepository;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for POST /contacts.
#[derive(Debug, Deserialize)]
pub struct AddContactRequest {
    pub username: String,
    pub contact: String,
}

/// POST /contacts - Add a contact to a user's list.
pub async fn add_contact(
    State(state): State<AppState>,
    Json(body): Json<AddContactRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    if !state.users.user_exists(&body.contact).await? {
        return Err(AppError::Validation(format!(
            "contact '{}' does not exist",
            body.contact
        )));
    }

    state.contacts.add_contact(&body.username, &body.contact).await?;

    Ok(Json(serde_json::json!({
        "username": body.username,
        "contact": body.contact,
    })))
}

/// GET /contacts/{username} - List a user's contacts.
pub async fn list_contacts(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let contacts = state.contacts.contacts_of(&username).await?;
    Ok(Json(contacts))
}
