use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;

use chronolock_db::models::UserRow;
use chronolock_types::api::{
    GoogleSignInRequest, GoogleSignInResponse, LoginRequest, LoginResponse, PublicUser,
};

use crate::AppState;
use crate::error::{ApiError, blocking};

const UNKNOWN_USER: &str = "User not found. Please register first.";

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let (Some(email), Some(password)) = (required(&req.email), required(&req.password)) else {
        return Err(ApiError::rejected(
            StatusCode::BAD_REQUEST,
            "Email and password are required.",
        ));
    };

    let user = {
        let db = state.clone();
        let email = email.to_string();
        blocking(move || db.db.get_user_by_email(&email)).await?
    }
    .ok_or_else(|| ApiError::rejected(StatusCode::NOT_FOUND, UNKNOWN_USER))?;

    // Passwords are stored and compared as plaintext. Known defect; see
    // the open-question notes in DESIGN.md before deploying this anywhere.
    if user.password != password {
        return Err(ApiError::rejected(
            StatusCode::UNAUTHORIZED,
            "Invalid email or password.",
        ));
    }

    let display_name = user
        .account_name
        .clone()
        .unwrap_or_else(|| format!("{} {}", user.first_name, user.last_name));
    let token = state
        .tokens
        .issue(&user.id_number, &user.email, &display_name)?;

    Ok(Json(LoginResponse {
        success: true,
        user: public_user(user),
        session_token: token,
    }))
}

/// POST /auth/googleSignIn — existence probe only, no token issuance.
pub async fn google_sign_in(
    State(state): State<AppState>,
    Json(req): Json<GoogleSignInRequest>,
) -> Result<Json<GoogleSignInResponse>, ApiError> {
    let user = match required(&req.email) {
        Some(email) => {
            let db = state.clone();
            let email = email.to_string();
            blocking(move || db.db.get_user_by_email(&email)).await?
        }
        None => None,
    };

    Ok(Json(match user {
        Some(user) => GoogleSignInResponse {
            exists: true,
            user: Some(public_user(user)),
            message: None,
        },
        None => GoogleSignInResponse {
            exists: false,
            user: None,
            message: Some(UNKNOWN_USER.to_string()),
        },
    }))
}

/// A required request field: present and non-blank.
pub(crate) fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Strip the password before a user row goes on the wire.
pub(crate) fn public_user(row: UserRow) -> PublicUser {
    PublicUser {
        id: row.id,
        id_number: row.id_number,
        first_name: row.first_name,
        last_name: row.last_name,
        email: row.email,
        avatar: row.avatar,
        account_name: row.account_name,
        user_type: row.user_type,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}
