//! Axum router configuration with middleware.
//!
//! Route shapes match what the chat clients call: flat top-level paths,
//! plain JSON bodies. Middleware: permissive CORS (any origin) and
//! request tracing.

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::http::handlers;
use crate::state::AppState;

/// Build the complete router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Accounts
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/profile-pic", post(handlers::auth::set_profile_pic))
        .route("/profile-pic/{username}", get(handlers::auth::get_profile_pic))
        // Contacts
        .route("/contacts", post(handlers::contact::add_contact))
        .route("/contacts/{username}", get(handlers::contact::list_contacts))
        // Direct messages
        .route("/messages", post(handlers::message::send_direct_message))
        .route(
            "/messages/{sender}/{receiver}",
            get(handlers::message::get_direct_history),
        )
        // Groups
        .route("/groups", post(handlers::group::create_group))
        .route("/groups/{username}", get(handlers::group::list_groups))
        .route(
            "/group_messages",
            post(handlers::message::send_group_message),
        )
        .route(
            "/group_messages/{group_id}",
            get(handlers::message::get_group_history),
        )
        // Live delivery
        .route("/ws", get(handlers::ws::ws_handler))
        .route("/health", get(health_check))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health - Simple health check endpoint.
async fn health_check(
    axum::extract::State(state): axum::extract::State<AppState>,
) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "online": state.presence.online_count(),
    }))
}
