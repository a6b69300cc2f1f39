//! Business logic services

pub mod accounts;
pub mod posts;

pub use accounts::{AccountService, LoginOutcome};
pub use posts::PostService;
