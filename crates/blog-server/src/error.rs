//! Request-level error type

use crate::storage::StorageError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use blog_types::MessageResponse;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AppError>;

/// Failure of a single request. Rendered as `{ "message": ... }`.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Email already exists.")]
    EmailTaken,

    /// Unknown email or wrong password; the two are not distinguished
    #[error("Invalid email or password.")]
    InvalidCredentials,

    /// Body could not be extracted; keeps the extractor's status (400, 413, 415, 422)
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Storage failed; only `context` reaches the client
    #[error("{context}")]
    Storage {
        context: &'static str,
        #[source]
        source: StorageError,
    },
}

impl AppError {
    /// Wrap a storage failure with the message the client should see.
    ///
    /// ```ignore
    /// store.list_posts_desc().await.map_err(AppError::storage("Failed to load posts"))?;
    /// ```
    pub fn storage(context: &'static str) -> impl FnOnce(StorageError) -> AppError {
        move |source| AppError::Storage { context, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::EmailTaken | AppError::InvalidCredentials => StatusCode::BAD_REQUEST,
            AppError::Rejected { status, .. } => *status,
            AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Storage { context, source } = &self {
            tracing::error!("{}: {}", context, source);
        }
        let status = self.status();
        (status, Json(MessageResponse::new(self.to_string()))).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(AppError::EmailTaken.status(), StatusCode::BAD_REQUEST);
        assert_eq!(AppError::InvalidCredentials.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            AppError::Rejected {
                status: StatusCode::PAYLOAD_TOO_LARGE,
                message: "too big".into(),
            }
            .status(),
            StatusCode::PAYLOAD_TOO_LARGE
        );

        let err = AppError::storage("Upload failed")(StorageError::Duplicate("x".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_storage_message_hides_cause() {
        let err = AppError::storage("Failed to delete post")(StorageError::Io(
            std::io::Error::new(std::io::ErrorKind::Other, "disk on fire"),
        ));
        assert_eq!(err.to_string(), "Failed to delete post");
    }
}
