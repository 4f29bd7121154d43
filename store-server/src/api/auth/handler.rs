//! Authentication Handlers
//!
//! Registration, login, and current-user lookup.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::auth::{CurrentUser, hash_password, verify_password};
use crate::core::AppState;
use crate::db::models::{Role, UserInfo};
use crate::db::repository::user;
use crate::utils::validation::{MAX_NAME_LEN, validate_email, validate_password, validate_required_text};
use crate::utils::{AppError, AppResult};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// Defaults to customer when omitted.
    #[serde(default)]
    pub role: Option<Role>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub message: String,
    pub user_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>), AppError> {
    validate_required_text(&req.username, "username", MAX_NAME_LEN)?;
    validate_email(&req.email)?;
    validate_password(&req.password)?;

    let email = req.email.trim().to_lowercase();
    let role = req.role.unwrap_or(Role::Customer);

    let password_hash = hash_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password hashing failed: {e}")))?;

    let user_id = user::create(&state.pool, req.username.trim(), &email, &password_hash, role)
        .await?;

    tracing::info!(user_id, role = %role, "User registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            message: "User registered successfully".to_string(),
            user_id,
        }),
    ))
}

/// POST /api/auth/login
///
/// The failure message is identical for unknown email and wrong password.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let email = req.email.trim().to_lowercase();

    let user = user::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(|| {
            tracing::warn!(target: "security", email = %email, "Login failed - user not found");
            AppError::invalid_credentials()
        })?;

    if !verify_password(&req.password, &user.password_hash) {
        tracing::warn!(target: "security", user_id = user.id, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let token = state
        .jwt
        .issue(user.id, &user.username, user.role)
        .map_err(|e| AppError::internal(format!("Failed to generate token: {e}")))?;

    tracing::info!(user_id = user.id, role = %user.role, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: user.into(),
    }))
}

/// GET /api/auth/me
pub async fn me(
    State(state): State<AppState>,
    current: CurrentUser,
) -> AppResult<Json<UserInfo>> {
    let user = user::find_by_id(&state.pool, current.id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("User {} not found", current.id)))?;

    Ok(Json(user.into()))
}
