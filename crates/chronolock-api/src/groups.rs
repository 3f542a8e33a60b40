use axum::Json;
use axum::extract::{Multipart, Path, State};

use chronolock_db::models::GroupSummaryRow;
use chronolock_types::api::{AckResponse, CreateGroupResponse, GroupSummary};

use crate::AppState;
use crate::error::{ApiError, blocking};
use crate::form::AvatarForm;

const GROUP_NOT_FOUND: &str = "Group not found.";

/// POST /groups/insertGroup — group row plus the owner's membership row,
/// atomically.
pub async fn create_group(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<CreateGroupResponse>, ApiError> {
    let form = AvatarForm::read(multipart).await?;
    let (Some(owner), Some(name), Some(key)) = (
        form.text("userIdNumber"),
        form.text("name"),
        form.text("groupKey"),
    ) else {
        return Err(ApiError::validation("Missing required fields"));
    };
    let (owner, name, key) = (owner.to_string(), name.to_string(), key.to_string());

    let avatar_path = match &form.avatar {
        Some(file) => Some(state.uploads.store(&file.filename, &file.data).await?),
        None => None,
    };

    let db = state.clone();
    let group_id = blocking(move || {
        db.db
            .create_group_with_owner(&name, &key, avatar_path.as_deref(), &owner)
    })
    .await?;

    Ok(Json(CreateGroupResponse {
        success: true,
        group_id,
    }))
}

/// PUT /groups/updateGroup/{id} — on avatar replacement the old file is
/// unlinked only after the row update lands, and only best-effort.
pub async fn update_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    multipart: Multipart,
) -> Result<String, ApiError> {
    let form = AvatarForm::read(multipart).await?;
    let (Some(name), Some(key)) = (form.text("name"), form.text("groupKey")) else {
        return Err(ApiError::validation("Missing required fields"));
    };
    let (name, key) = (name.to_string(), key.to_string());

    let old_avatar = {
        let db = state.clone();
        blocking(move || db.db.get_group_avatar(group_id)).await?
    }
    .ok_or_else(|| ApiError::not_found(GROUP_NOT_FOUND))?;

    let new_avatar = match &form.avatar {
        Some(file) => Some(state.uploads.store(&file.filename, &file.data).await?),
        None => None,
    };

    let replaced = new_avatar.is_some();
    let db = state.clone();
    let n = blocking(move || db.db.update_group(group_id, &name, &key, new_avatar.as_deref()))
        .await?;
    if n == 0 {
        return Err(ApiError::not_found(GROUP_NOT_FOUND));
    }

    if replaced {
        if let Some(old) = old_avatar {
            state.uploads.remove_quietly(&old).await;
        }
    }

    Ok("Group updated successfully.".to_string())
}

/// DELETE /groups/deleteGroup/{id} — the row goes first; a failed avatar
/// unlink is surfaced even though the group is already gone.
pub async fn delete_group(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<Json<AckResponse>, ApiError> {
    let avatar = {
        let db = state.clone();
        blocking(move || db.db.get_group_avatar(group_id)).await?
    }
    .ok_or_else(|| ApiError::not_found(GROUP_NOT_FOUND))?;

    let db = state.clone();
    let n = blocking(move || db.db.delete_group(group_id)).await?;
    if n == 0 {
        return Err(ApiError::not_found(GROUP_NOT_FOUND));
    }

    let message = match avatar {
        Some(path) => {
            state.uploads.remove(&path).await.map_err(ApiError::Storage)?;
            "Group and its avatar deleted successfully."
        }
        None => "Group deleted successfully, no avatar to remove.",
    };

    Ok(Json(AckResponse {
        success: true,
        message: message.to_string(),
    }))
}

/// GET /groups/fetchFilteredGroups/{idNumber}
pub async fn filtered_groups(
    State(state): State<AppState>,
    Path(id_number): Path<String>,
) -> Result<Json<Vec<GroupSummary>>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.groups_for_member(&id_number)).await?;
    Ok(Json(rows.into_iter().map(summary).collect()))
}

/// GET /groups/fetchAllgroups
pub async fn all_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<GroupSummary>>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.all_groups()).await?;
    Ok(Json(rows.into_iter().map(summary).collect()))
}

/// GET /groups/fetchAvailableGroups/{idNumber} — groups the user has not
/// joined yet.
pub async fn available_groups(
    State(state): State<AppState>,
    Path(id_number): Path<String>,
) -> Result<Json<Vec<GroupSummary>>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.groups_available_to(&id_number)).await?;
    Ok(Json(rows.into_iter().map(summary).collect()))
}

fn summary(row: GroupSummaryRow) -> GroupSummary {
    GroupSummary {
        avatar: row.avatar,
        group_id: row.group_id,
        group_name: row.group_name,
        group_key: row.group_key,
        latest_message: row.latest_message,
        message_time: row.message_time,
        latest_message_is_seen: row.latest_message_is_seen,
        sender: row.sender,
    }
}
