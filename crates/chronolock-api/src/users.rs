use axum::Json;
use axum::extract::{Multipart, Path, State};

use chronolock_types::api::{
    AckResponse, ChangePasswordRequest, ForgotPasswordRequest, ResetPasswordRequest,
    UserMessageResponse,
};

use crate::AppState;
use crate::auth::required;
use crate::error::{ApiError, blocking};
use crate::form::AvatarForm;

const USER_NOT_FOUND: &str = "User not found";

/// PUT /users/updateUser/ — multipart, same avatar-replacement pattern as
/// groups: the old file is unlinked best-effort after the row update.
pub async fn update_user(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<UserMessageResponse>, ApiError> {
    let form = AvatarForm::read(multipart).await?;
    let id: i64 = form
        .text("id")
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ApiError::validation("Missing required fields"))?;
    let (Some(first_name), Some(last_name), Some(email)) = (
        form.text("firstName"),
        form.text("lastName"),
        form.text("email"),
    ) else {
        return Err(ApiError::validation("Missing required fields"));
    };
    let (first_name, last_name, email) = (
        first_name.to_string(),
        last_name.to_string(),
        email.to_string(),
    );
    let password = form.text("password").map(str::to_owned);

    let user = {
        let db = state.clone();
        blocking(move || db.db.get_user_by_id(id)).await?
    }
    .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    let new_avatar = match &form.avatar {
        Some(file) => Some(state.uploads.store(&file.filename, &file.data).await?),
        None => None,
    };

    let replaced = new_avatar.is_some();
    let db = state.clone();
    let n = blocking(move || {
        db.db.update_user(
            id,
            &first_name,
            &last_name,
            &email,
            password.as_deref(),
            new_avatar.as_deref(),
        )
    })
    .await?;
    if n == 0 {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }

    if replaced {
        if let Some(old) = user.avatar {
            state.uploads.remove_quietly(&old).await;
        }
    }

    Ok(Json(UserMessageResponse {
        message: "User updated successfully".to_string(),
    }))
}

/// DELETE /users/deleteUser/{id}
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserMessageResponse>, ApiError> {
    let user = {
        let db = state.clone();
        blocking(move || db.db.get_user_by_id(id)).await?
    }
    .ok_or_else(|| ApiError::not_found(USER_NOT_FOUND))?;

    let db = state.clone();
    let n = blocking(move || db.db.delete_user(id)).await?;
    if n == 0 {
        return Err(ApiError::not_found(USER_NOT_FOUND));
    }

    if let Some(avatar) = user.avatar {
        state.uploads.remove_quietly(&avatar).await;
    }

    Ok(Json(UserMessageResponse {
        message: "User deleted successfully".to_string(),
    }))
}

/// POST /users/forgotPassword — verifies the email exists; no mail is sent.
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let email = required(&req.email)
        .ok_or_else(|| ApiError::validation("Email is required."))?
        .to_string();

    let db = state.clone();
    blocking(move || db.db.get_user_by_email(&email))
        .await?
        .ok_or_else(|| ApiError::not_found("Email not found"))?;

    Ok(Json(AckResponse {
        success: true,
        message: "Verification successful".to_string(),
    }))
}

/// PUT /users/resetPassword
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let new_password = required(&req.new_password)
        .ok_or_else(|| ApiError::validation("New password is required"))?
        .to_string();
    let email = required(&req.email).unwrap_or_default().to_string();

    let db = state.clone();
    let n = blocking(move || db.db.reset_password(&email, &new_password)).await?;
    if n == 0 {
        return Err(ApiError::not_found("Email not found"));
    }

    Ok(Json(AckResponse {
        success: true,
        message: "Password reset successfully".to_string(),
    }))
}

/// PUT /users/changePassword
pub async fn change_password(
    State(state): State<AppState>,
    Json(req): Json<ChangePasswordRequest>,
) -> Result<Json<AckResponse>, ApiError> {
    let (Some(user_id), Some(current), Some(new_password)) = (
        req.user_id,
        required(&req.current_password),
        required(&req.new_password),
    ) else {
        return Err(ApiError::validation("All fields are required."));
    };
    let (current, new_password) = (current.to_string(), new_password.to_string());

    let user = {
        let db = state.clone();
        blocking(move || db.db.get_user_by_id(user_id)).await?
    }
    .ok_or_else(|| ApiError::not_found("User not found."))?;

    // Plaintext comparison. Known defect; see DESIGN.md.
    if user.password != current {
        return Err(ApiError::Auth("Incorrect current password.".to_string()));
    }

    let db = state.clone();
    blocking(move || db.db.update_password(user_id, &new_password)).await?;

    Ok(Json(AckResponse {
        success: true,
        message: "Password changed successfully.".to_string(),
    }))
}
