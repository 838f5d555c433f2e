//! Admin user management endpoints.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use serde_json::json;
use validator::Validate;

use vitalhub_core::error::AppError;
use vitalhub_core::result::AppResult;
use vitalhub_core::types::pagination::Page;
use vitalhub_entity::user::{CreateUser, UpdateUser, User, UserListParams};

use crate::dto::{CreateUserRequest, UpdateUserRequest};
use crate::extractors::AuthUser;
use crate::middleware::rbac::require_admin;
use crate::state::AppState;

/// Lists user accounts with optional search, role, and active filters.
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(params): Query<UserListParams>,
) -> AppResult<Json<Page<User>>> {
    require_admin(&auth)?;
    let page = state.user_repo.list(&params).await?;
    Ok(Json(page))
}

/// Creates a user account.
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<User>)> {
    require_admin(&auth)?;
    payload
        .validate()
        .map_err(|err| AppError::validation(err.to_string()))?;

    let password_hash = hash_password(&payload.password)?;
    let user = state
        .user_repo
        .create(&CreateUser {
            email: payload.email.to_lowercase(),
            password_hash,
            role: payload.role,
            created_by: auth.user_id,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

/// Fetches a single user account.
pub async fn get_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    require_admin(&auth)?;
    let user = state
        .user_repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;
    Ok(Json(user))
}

/// Applies a partial update to a user account.
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateUserRequest>,
) -> AppResult<Json<User>> {
    require_admin(&auth)?;
    payload
        .validate()
        .map_err(|err| AppError::validation(err.to_string()))?;

    let user = state
        .user_repo
        .update(
            id,
            &UpdateUser {
                email: payload.email.map(|e| e.to_lowercase()),
                role: payload.role,
            },
        )
        .await?;

    Ok(Json(user))
}

/// Deactivates a user account. Deactivation is soft: the row stays for
/// audit history and can be re-activated later.
pub async fn deactivate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&auth)?;
    if auth.user_id == Some(id) {
        return Err(AppError::validation("Cannot deactivate your own account"));
    }

    if !state.user_repo.set_active(id, false).await? {
        return Err(AppError::not_found("User not found"));
    }

    Ok(Json(json!({ "id": id, "message": "User deactivated" })))
}

/// Re-activates a previously deactivated user account.
pub async fn activate_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> AppResult<Json<serde_json::Value>> {
    require_admin(&auth)?;
    if !state.user_repo.set_active(id, true).await? {
        return Err(AppError::not_found("User not found"));
    }

    Ok(Json(json!({ "id": id, "message": "User activated" })))
}

fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| AppError::internal(format!("Password hashing failed: {err}")))
}
