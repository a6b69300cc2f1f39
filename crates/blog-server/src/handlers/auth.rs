//! Registration and login handlers

use crate::error::AppError;
use crate::services::LoginOutcome;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use blog_types::{Credentials, LoginResponse, MessageResponse};
use tracing::info;

pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    let Json(req) = payload?;
    info!("Registration attempt for: {}", req.email);

    state.accounts.register(&req).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse::new("Registration successful!")),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<(StatusCode, Json<LoginResponse>), AppError> {
    let Json(req) = payload?;
    info!("Login attempt for: {}", req.email);

    let (status, message, user) = match state.accounts.login(&req).await? {
        LoginOutcome::Existing { email } => (StatusCode::OK, "Login successful!", email),
        LoginOutcome::Created { email } => (
            StatusCode::CREATED,
            "Welcome! Your account has been created.",
            email,
        ),
    };

    info!("Login successful for: {}", user);
    Ok((
        status,
        Json(LoginResponse {
            message: message.to_string(),
            user,
        }),
    ))
}
