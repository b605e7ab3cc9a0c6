use axum::{Json, extract::State, http::StatusCode};
use serde_json::Value;

use crate::{
    AppState,
    error::{AppError, AppResult},
    models::{Credentials, Session},
};

// Handler for POST /api/auth/login
pub async fn login(State(app_state): State<AppState>, Json(credentials): Json<Credentials>) -> AppResult<Json<Session>> {
    if credentials.email.trim().is_empty() || credentials.password.is_empty() {
        return Err(AppError::BadRequest("email and password are required".into()));
    }

    let session = app_state.backend.login(&credentials).await?;
    tracing::info!(email = %credentials.email, admin = session.is_admin(), "User logged in");
    Ok(Json(session))
}

// Handler for POST /api/auth/register
pub async fn register(State(app_state): State<AppState>, Json(account): Json<Value>) -> AppResult<(StatusCode, Json<Value>)> {
    let created = app_state.backend.register(&account).await?;
    tracing::info!("Account registered");
    Ok((StatusCode::CREATED, Json(created)))
}
