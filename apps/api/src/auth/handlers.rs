use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::info;

use crate::auth::role::Role;
use crate::errors::AppError;
use crate::models::user::AuthedUser;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct SessionResponse {
    pub uid: String,
    pub email: String,
    pub role: Role,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: String,
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let tokens = state.identity.sign_up(&req.email, &req.password).await?;

    // New accounts start with the least-privileged role claim
    state.identity.set_role(&tokens.local_id, Role::Surveyor).await?;
    info!("Registered new account {}", tokens.local_id);

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            uid: tokens.local_id,
            email: tokens.email,
            role: Role::Surveyor,
            id_token: tokens.id_token,
            refresh_token: tokens.refresh_token,
            expires_in: tokens.expires_in,
        }),
    ))
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let tokens = state.identity.sign_in(&req.email, &req.password).await?;
    // Resolve the role claim with the fresh token
    let user = state.identity.lookup(&tokens.id_token).await?;

    Ok(Json(SessionResponse {
        uid: user.uid,
        email: user.email,
        role: user.role,
        id_token: tokens.id_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
    }))
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
}

/// POST /api/v1/auth/reset-password
pub async fn handle_reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> Result<Json<Value>, AppError> {
    state.identity.send_password_reset(&req.email).await?;
    Ok(Json(json!({ "message": "Password reset email sent" })))
}

/// GET /api/v1/auth/me
pub async fn handle_me(user: AuthedUser) -> Json<AuthedUser> {
    Json(user)
}

#[derive(Deserialize)]
pub struct SetRoleRequest {
    pub role: Role,
}

/// PUT /api/v1/auth/users/:uid/role
pub async fn handle_set_role(
    State(state): State<AppState>,
    user: AuthedUser,
    Path(uid): Path<String>,
    Json(req): Json<SetRoleRequest>,
) -> Result<StatusCode, AppError> {
    if !user.role.can_manage_roles() {
        return Err(AppError::Forbidden);
    }

    state.identity.set_role(&uid, req.role).await?;
    info!("Role for {uid} set to {} by {}", req.role.as_str(), user.uid);
    Ok(StatusCode::NO_CONTENT)
}
