use axum::Json;
use axum::extract::{Path, State};

use chronolock_db::models::MessageRow;
use chronolock_types::api::{
    MessageCreatedResponse, MessageView, NewMessageRequest, SeenResponse,
};

use crate::AppState;
use crate::auth::required;
use crate::error::{ApiError, blocking};

/// POST /messages/group/{groupId}/newMessage
pub async fn new_message(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Json(req): Json<NewMessageRequest>,
) -> Result<Json<MessageCreatedResponse>, ApiError> {
    post_message(state, group_id, req, false).await
}

/// POST /messages/group/{groupId}/newSystemMessage — platform-generated,
/// otherwise identical to a user message.
pub async fn new_system_message(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
    Json(req): Json<NewMessageRequest>,
) -> Result<Json<MessageCreatedResponse>, ApiError> {
    post_message(state, group_id, req, true).await
}

async fn post_message(
    state: AppState,
    group_id: i64,
    req: NewMessageRequest,
    is_system: bool,
) -> Result<Json<MessageCreatedResponse>, ApiError> {
    let (Some(user_id), Some(text)) = (required(&req.user_id), required(&req.text)) else {
        return Err(ApiError::validation("Missing required fields"));
    };
    let (user_id, text) = (user_id.to_string(), text.to_string());

    let db = state.clone();
    let message_id =
        blocking(move || db.db.insert_message(group_id, &user_id, &text, is_system)).await?;

    Ok(Json(MessageCreatedResponse {
        success: true,
        message_id,
    }))
}

/// GET /messages/group/{groupId}/fetchMessages — newest first.
pub async fn fetch_messages(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<Json<Vec<MessageView>>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.messages_for_group(group_id)).await?;
    Ok(Json(rows.into_iter().map(message_view).collect()))
}

/// POST /messages/group/{groupId}/markMessageAsSeen — flags only the single
/// most-recent message; succeeds even when the group has none.
pub async fn mark_latest_seen(
    State(state): State<AppState>,
    Path(group_id): Path<i64>,
) -> Result<Json<SeenResponse>, ApiError> {
    let db = state.clone();
    blocking(move || db.db.mark_latest_seen(group_id)).await?;
    Ok(Json(SeenResponse { success: true }))
}

fn message_view(row: MessageRow) -> MessageView {
    MessageView {
        id: row.id,
        group_id: row.group_id,
        text: row.text,
        created_at: row.created_at,
        user_id: row.user_id,
        is_seen: row.is_seen,
        is_system: row.is_system,
        first_name: row.first_name,
        last_name: row.last_name,
        user_avatar: row.user_avatar,
    }
}
