//! Authentication route handlers.
//!
//! Registration always creates a client account; staff accounts are
//! provisioned through the CLI.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use comanda_core::UserRole;

use crate::error::{AppError, Result};
use crate::middleware::RequireUser;
use crate::middleware::auth::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Public view of the logged-in user.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            email: user.email.to_string(),
            name: user.name.clone(),
            role: user.role.as_str().to_string(),
        }
    }
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<RegisterRequest>,
) -> Result<Response> {
    let user = AuthService::new(state.pool())
        .register(&body.email, &body.name, &body.password, UserRole::Client)
        .await?;

    start_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))).into_response())
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<UserResponse>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    // Rotate the session id on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    start_session(&session, &user).await?;

    tracing::info!(user_id = %user.id, role = %user.role.as_str(), "user logged in");
    Ok(Json(UserResponse::from(&user)))
}

/// POST /auth/logout
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /auth/me
pub async fn me(RequireUser(user): RequireUser) -> Json<CurrentUser> {
    Json(user)
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser {
        id: user.id,
        email: user.email.clone(),
        name: user.name.clone(),
        role: user.role,
    };
    set_current_user(session, &current)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))
}
