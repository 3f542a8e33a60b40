pub mod auth;
pub mod error;
pub mod form;
pub mod groups;
pub mod members;
pub mod messages;
pub mod storage;
pub mod token;
pub mod users;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use chronolock_db::Database;

use crate::storage::UploadStore;
use crate::token::TokenIssuer;

/// 10 MB cap on multipart bodies; avatars only, nothing larger.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub uploads: UploadStore,
    pub tokens: TokenIssuer,
}

pub fn build_router(state: AppState) -> Router {
    let uploads_dir = state.uploads.dir().to_path_buf();

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/googleSignIn", post(auth::google_sign_in))
        .route(
            "/groups/fetchFilteredGroups/{idNumber}",
            get(groups::filtered_groups),
        )
        .route("/groups/fetchAllgroups", get(groups::all_groups))
        .route(
            "/groups/fetchAvailableGroups/{idNumber}",
            get(groups::available_groups),
        )
        .route("/groups/insertGroup", post(groups::create_group))
        .route("/groups/updateGroup/{id}", put(groups::update_group))
        .route("/groups/deleteGroup/{id}", delete(groups::delete_group))
        .route("/group-members/fetchMemberCount/", get(members::member_count))
        .route("/group-members/fetchMembers/", get(members::list_members))
        .route(
            "/group-members/insertMemberByGroupKey",
            post(members::join_by_group_key),
        )
        .route("/group-members/deleteMember", delete(members::remove_member))
        .route(
            "/messages/group/{groupId}/newMessage",
            post(messages::new_message),
        )
        .route(
            "/messages/group/{groupId}/newSystemMessage",
            post(messages::new_system_message),
        )
        .route(
            "/messages/group/{groupId}/fetchMessages",
            get(messages::fetch_messages),
        )
        .route(
            "/messages/group/{groupId}/markMessageAsSeen",
            post(messages::mark_latest_seen),
        )
        .route("/users/updateUser/", put(users::update_user))
        .route("/users/deleteUser/{id}", delete(users::delete_user))
        .route("/users/forgotPassword", post(users::forgot_password))
        .route("/users/resetPassword", put(users::reset_password))
        .route("/users/changePassword", put(users::change_password))
        .route("/health", get(health))
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health — liveness check.
async fn health() -> &'static str {
    "ok"
}
