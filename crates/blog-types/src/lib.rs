//! Blog Types - Pure type definitions shared by the server and its clients
//!
//! This crate contains only serde data types with no async runtime or
//! database dependencies.

pub mod message;
pub mod post;
pub mod user;

pub use message::*;
pub use post::*;
pub use user::*;
