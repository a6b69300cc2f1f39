//! Post handlers

use crate::error::AppError;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use blog_types::{MessageResponse, NewPost, Post, PostCreatedResponse};
use tracing::debug;

pub async fn create(
    State(state): State<AppState>,
    payload: Result<Json<NewPost>, JsonRejection>,
) -> Result<(StatusCode, Json<PostCreatedResponse>), AppError> {
    let Json(req) = payload?;
    let post = state.posts.create(req).await?;

    Ok((
        StatusCode::CREATED,
        Json(PostCreatedResponse {
            message: "Post uploaded successfully".to_string(),
            post,
        }),
    ))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Post>>, AppError> {
    Ok(Json(state.posts.list().await?))
}

/// Always reports success; an id that is not an integer cannot match a row.
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    match id.parse::<i64>() {
        Ok(id) => state.posts.delete(id).await?,
        Err(_) => debug!("Skipping delete for non-numeric post id: {:?}", id),
    }

    Ok(Json(MessageResponse::new("Post deleted")))
}
