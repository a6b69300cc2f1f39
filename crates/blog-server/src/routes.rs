//! Router construction

use crate::config::AccountMode;
use crate::{handlers, AppState};
use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use std::path::PathBuf;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

/// Request bodies up to 50 MiB, enough for inline base64 images
pub const MAX_BODY_BYTES: usize = 50 * 1024 * 1024;

/// Build the full application router.
///
/// With a `static_dir`, unmatched paths are served from that directory and `/`
/// resolves to its `index.html`.
pub fn build_router(state: AppState, static_dir: Option<PathBuf>) -> Router {
    let mut app = Router::new()
        .route("/health", get(handlers::health))
        .nest("/api", api_routes(state.accounts.mode()));

    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes(mode: AccountMode) -> Router<AppState> {
    let routes = Router::new()
        .route("/login", post(handlers::auth::login))
        .route(
            "/posts",
            get(handlers::posts::list).post(handlers::posts::create),
        )
        .route("/posts/:id", delete(handlers::posts::delete));

    match mode {
        AccountMode::Strict => routes.route("/register", post(handlers::auth::register)),
        AccountMode::AutoRegister => routes,
    }
}
