//! Post types

use serde::{Deserialize, Serialize};

/// Category assigned when an upload does not name one
pub const DEFAULT_CATEGORY: &str = "general";

/// A stored post
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub author: String,
    pub category: String,
    /// Data URI or URL, serialized as `null` when absent
    pub image: Option<String>,
    /// Server-assigned creation instant (RFC 3339, UTC)
    pub date: String,
}

/// Body of `POST /api/posts`
///
/// Unknown fields (including a client-supplied `date`) are ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewPost {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: String,
    /// Free-text author, usually the uploader's email
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewPost {
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        author: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            author: author.into(),
            category: None,
            image: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Category to store, falling back to [`DEFAULT_CATEGORY`] when absent or empty
    pub fn resolved_category(&self) -> String {
        match self.category.as_deref() {
            Some(c) if !c.is_empty() => c.to_string(),
            _ => DEFAULT_CATEGORY.to_string(),
        }
    }

    /// Image to store; an empty string counts as absent
    pub fn resolved_image(&self) -> Option<String> {
        self.image.clone().filter(|i| !i.is_empty())
    }
}
