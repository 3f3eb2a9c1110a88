//! Message send and history handlers.
//!
//! Sends go through the messaging service: the message is persisted
//! first (the store assigns its id), then fanned out to whoever is
//! connected at that instant. The response is the stored copy; it is
//! returned as soon as persistence succeeds, regardless of who was
//! online.

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::Deserialize;

use natter_core::repository::message::MessageRepository;
use natter_types::message::{DirectMessage, GroupMessage};

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for POST /messages.
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub sender: String,
    pub receiver: String,
    pub text: String,
    /// Optional client timestamp; the server stamps the current time
    /// when omitted.
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Request body for POST /group_messages.
#[derive(Debug, Deserialize)]
pub struct SendGroupMessageRequest {
    pub group_id: i64,
    pub sender: String,
    pub text: String,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

/// POST /messages - Send a direct message.
pub async fn send_direct_message(
    State(state): State<AppState>,
    Json(body): Json<SendMessageRequest>,
) -> Result<Json<DirectMessage>, AppError> {
    let msg = state
        .messaging
        .send_direct(&body.sender, &body.receiver, &body.text, body.timestamp)
        .await?;

    Ok(Json(msg))
}

/// GET /messages/{sender}/{receiver} - Conversation history between two
/// users (both directions, oldest first).
pub async fn get_direct_history(
    State(state): State<AppState>,
    Path((sender, receiver)): Path<(String, String)>,
) -> Result<Json<Vec<DirectMessage>>, AppError> {
    let history = state
        .messaging
        .messages()
        .direct_history(&sender, &receiver)
        .await?;

    Ok(Json(history))
}

/// POST /group_messages - Send a message to a group.
pub async fn send_group_message(
    State(state): State<AppState>,
    Json(body): Json<SendGroupMessageRequest>,
) -> Result<Json<GroupMessage>, AppError> {
    let msg = state
        .messaging
        .send_group(body.group_id, &body.sender, &body.text, body.timestamp)
        .await?;

    Ok(Json(msg))
}

/// GET /group_messages/{group_id} - Message history for a group.
pub async fn get_group_history(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<GroupMessage>>, AppError> {
    let history = state.messaging.messages().group_history(group_id).await?;
    Ok(Json(history))
}
