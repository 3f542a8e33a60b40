use serde::{Deserialize, Serialize};

// -- Auth --

/// Login body. Fields are optional so that an absent or blank value reaches
/// the handler's own validation instead of a deserializer rejection.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub user: PublicUser,
    #[serde(rename = "sessionToken")]
    pub session_token: String,
}

#[derive(Debug, Deserialize)]
pub struct GoogleSignInRequest {
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GoogleSignInResponse {
    pub exists: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<PublicUser>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A user row as clients see it: everything except the password.
///
/// Wire keys mirror the stored column names the mobile client was built
/// against, so the camel-cased ones are renamed explicitly while the
/// timestamp keys stay snake_case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i64,
    #[serde(rename = "idNumber")]
    pub id_number: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub email: String,
    pub avatar: Option<String>,
    #[serde(rename = "accountName")]
    pub account_name: Option<String>,
    #[serde(rename = "userType")]
    pub user_type: String,
    pub created_at: String,
    pub updated_at: String,
}

// -- Groups --

/// A group annotated with its most recent message, if any.
#[derive(Debug, Serialize, Deserialize)]
pub struct GroupSummary {
    pub avatar: Option<String>,
    pub group_id: i64,
    pub group_name: String,
    pub group_key: String,
    pub latest_message: Option<String>,
    pub message_time: Option<String>,
    #[serde(rename = "latest_message_isSeen")]
    pub latest_message_is_seen: Option<i64>,
    pub sender: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateGroupResponse {
    pub success: bool,
    #[serde(rename = "groupId")]
    pub group_id: i64,
}

// -- Group members --

#[derive(Debug, Deserialize)]
pub struct MemberCountQuery {
    #[serde(rename = "groupId")]
    pub group_id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberCountResponse {
    pub success: bool,
    pub count: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberInfo {
    pub id: i64,
    pub group_id: i64,
    #[serde(rename = "idNumber")]
    pub id_number: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub avatar: Option<String>,
    #[serde(rename = "userType")]
    pub user_type: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemberListResponse {
    pub success: bool,
    pub results: Vec<MemberInfo>,
}

#[derive(Debug, Deserialize)]
pub struct JoinGroupRequest {
    #[serde(rename = "userIdNumber")]
    pub user_id_number: Option<String>,
    #[serde(rename = "groupKey")]
    pub group_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RemoveMemberRequest {
    #[serde(rename = "groupId")]
    pub group_id: Option<i64>,
    /// The member's identity number, not the join-row id.
    #[serde(rename = "memberId")]
    pub member_id: Option<String>,
}

// -- Messages --

#[derive(Debug, Deserialize)]
pub struct NewMessageRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageCreatedResponse {
    pub success: bool,
    #[serde(rename = "messageId")]
    pub message_id: i64,
}

/// A chat message joined with its sender's name and avatar.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageView {
    pub id: i64,
    pub group_id: i64,
    pub text: String,
    pub created_at: String,
    pub user_id: String,
    #[serde(rename = "isSeen")]
    pub is_seen: i64,
    #[serde(rename = "isSystem")]
    pub is_system: i64,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    pub user_avatar: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SeenResponse {
    pub success: bool,
}

// -- Users --

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    #[serde(rename = "userId")]
    pub user_id: Option<i64>,
    #[serde(rename = "currentPassword")]
    pub current_password: Option<String>,
    #[serde(rename = "newPassword")]
    pub new_password: Option<String>,
}

// -- Shared response shapes --

#[derive(Debug, Serialize, Deserialize)]
pub struct AckResponse {
    pub success: bool,
    pub message: String,
}

/// `{message}` bodies used by the user-mutation endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserMessageResponse {
    pub message: String,
}
