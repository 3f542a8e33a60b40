use axum::Json;
use axum::extract::{Query, State};

use chronolock_db::models::MemberRow;
use chronolock_types::api::{
    AckResponse, JoinGroupRequest, MemberCountQuery, MemberCountResponse, MemberInfo,
    MemberListResponse, RemoveMemberRequest,
};

use crate::AppState;
use crate::auth::required;
use crate::error::{ApiError, blocking};

/// GET /group-members/fetchMemberCount/?groupId=
pub async fn member_count(
    State(state): State<AppState>,
    Query(query): Query<MemberCountQuery>,
) -> Result<Json<MemberCountResponse>, ApiError> {
    let db = state.clone();
    let count = blocking(move || db.db.member_count(query.group_id)).await?;
    Ok(Json(MemberCountResponse {
        success: true,
        count,
    }))
}

/// GET /group-members/fetchMembers/?groupId=
pub async fn list_members(
    State(state): State<AppState>,
    Query(query): Query<MemberCountQuery>,
) -> Result<Json<MemberListResponse>, ApiError> {
    let db = state.clone();
    let rows = blocking(move || db.db.members_of_group(query.group_id)).await?;
    Ok(Json(MemberListResponse {
        success: true,
        results: rows.into_iter().map(member_info).collect(),
    }))
}

/// POST /group-members/insertMemberByGroupKey — join-by-key redemption.
///
/// The existence check and the insert are two steps; the store-level
/// uniqueness constraint backstops the race between concurrent joins.
pub async fn join_by_group_key(
    State(state): State<AppState>,
    Json(req): Json<JoinGroupRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let key = required(&req.group_key).unwrap_or_default().to_string();
    let user = required(&req.user_id_number)
        .unwrap_or_default()
        .to_string();

    let group_id = {
        let db = state.clone();
        blocking(move || db.db.find_group_by_key(&key)).await?
    }
    // An unknown key is reported as 400, not 404, matching the endpoint's
    // contract.
    .ok_or_else(|| ApiError::validation("Invalid group key"))?;

    let already = {
        let db = state.clone();
        let user = user.clone();
        blocking(move || db.db.is_member(group_id, &user)).await?
    };
    if already {
        return Err(ApiError::Conflict(
            "User is already a member of this group".to_string(),
        ));
    }

    let db = state.clone();
    blocking(move || db.db.add_member(group_id, &user)).await?;

    Ok(Json(AckResponse {
        success: true,
        message: "Member added to the group successfully".to_string(),
    }))
}

/// DELETE /group-members/deleteMember — body `{groupId, memberId}`.
pub async fn remove_member(
    State(state): State<AppState>,
    Json(req): Json<RemoveMemberRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let group_id = req.group_id.unwrap_or_default();
    let member = required(&req.member_id).unwrap_or_default().to_string();

    let db = state.clone();
    let n = blocking(move || db.db.remove_member(group_id, &member)).await?;
    if n == 0 {
        return Err(ApiError::not_found("Member not found."));
    }

    Ok(Json(AckResponse {
        success: true,
        message: "Member removed successfully.".to_string(),
    }))
}

fn member_info(row: MemberRow) -> MemberInfo {
    MemberInfo {
        id: row.id,
        group_id: row.group_id,
        id_number: row.id_number,
        first_name: row.first_name,
        last_name: row.last_name,
        avatar: row.avatar,
        user_type: row.user_type,
    }
}
