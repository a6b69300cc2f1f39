//! JSON response envelopes

use serde::{Deserialize, Serialize};

use crate::Post;

/// Plain `{ "message": ... }` body, used for successes and errors alike
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Successful login; `user` echoes the account email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: String,
}

/// Successful upload, carrying the materialized record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostCreatedResponse {
    pub message: String,
    pub post: Post,
}

/// Liveness probe body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}
