/// Row types as they come out of SQLite, kept separate from the
/// chronolock-types wire models so the DB layer stays independent of
/// response shapes.

pub struct UserRow {
    pub id: i64,
    pub id_number: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub avatar: Option<String>,
    pub account_name: Option<String>,
    pub user_type: String,
    pub created_at: String,
    pub updated_at: String,
}

/// A group plus its most recent message (all message columns NULL for a
/// group that has none).
pub struct GroupSummaryRow {
    pub avatar: Option<String>,
    pub group_id: i64,
    pub group_name: String,
    pub group_key: String,
    pub latest_message: Option<String>,
    pub message_time: Option<String>,
    pub latest_message_is_seen: Option<i64>,
    pub sender: Option<String>,
}

pub struct MemberRow {
    pub id: i64,
    pub group_id: i64,
    pub id_number: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub user_type: String,
}

pub struct MessageRow {
    pub id: i64,
    pub group_id: i64,
    pub text: String,
    pub created_at: String,
    pub user_id: String,
    pub is_seen: i64,
    pub is_system: i64,
    pub first_name: String,
    pub last_name: String,
    pub user_avatar: Option<String>,
}
