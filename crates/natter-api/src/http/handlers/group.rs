//! Group management handlers.

use axum::Json;
use axum::extract::{Path, State};
use serde::Deserialize;

use natter_core::repository::group::GroupRepository;
use natter_types::group::Group;

use crate::http::error::AppError;
use crate::state::AppState;

/// Request body for POST /groups.
#[derive(Debug, Deserialize)]
pub struct CreateGroupRequest {
    pub group_name: String,
    pub members: Vec<String>,
    pub creator: String,
}

/// POST /groups - Create a group. The creator is always a member.
pub async fn create_group(
    State(state): State<AppState>,
    Json(body): Json<CreateGroupRequest>,
) -> Result<Json<Group>, AppError> {
    if body.group_name.trim().is_empty() {
        return Err(AppError::Validation("group name must not be empty".to_string()));
    }

    let mut members = body.members;
    members.push(body.creator);

    let group = state.groups.create_group(&body.group_name, &members).await?;
    tracing::info!(group_id = group.group_id, group_name = %group.group_name, "group created");

    Ok(Json(group))
}

/// GET /groups/{username} - All groups a user belongs to.
pub async fn list_groups(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Json<Vec<Group>>, AppError> {
    let groups = state.groups.groups_for(&username).await?;
    Ok(Json(groups))
}
