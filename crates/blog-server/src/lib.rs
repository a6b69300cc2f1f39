//! Blog Server
//!
//! Minimal blog backend: account registration/login and post
//! create/list/delete over a JSON HTTP API, persisted in a single SQLite file.
//!
//! Storage is opened once by the binary and handed to the services
//! explicitly; nothing in this crate holds a global connection.

pub mod config;
pub mod error;
pub mod handlers;
pub mod password;
pub mod routes;
pub mod services;
pub mod storage;

use config::AccountMode;
use password::Plaintext;
use services::{AccountService, PostService};
use std::sync::Arc;
use storage::{PostStore, UserStore};

pub use routes::build_router;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountService>,
    pub posts: Arc<PostService>,
}

impl AppState {
    /// Wire both services to the given stores using plaintext passwords.
    pub fn new(
        users: Arc<dyn UserStore>,
        posts: Arc<dyn PostStore>,
        account_mode: AccountMode,
    ) -> Self {
        Self {
            accounts: Arc::new(AccountService::new(
                users,
                Box::new(Plaintext),
                account_mode,
            )),
            posts: Arc::new(PostService::new(posts)),
        }
    }
}
