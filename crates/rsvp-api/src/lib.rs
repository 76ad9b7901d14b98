//! HTTP surface of the RSVP flow: login, confirmation, closing message,
//! guest form and summary, all backed by [`rsvp_db::Database`].

pub mod auth;
pub mod middleware;
pub mod rsvp;
pub mod views;

use axum::{
    Router,
    http::StatusCode,
    middleware as axum_middleware,
    routing::get,
};
use tracing::error;

use rsvp_db::Database;

use crate::auth::AppState;
use crate::middleware::require_session;

/// Every route of the flow. Pages other than login, logout and health
/// require a session.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/health", get(health));

    let protected_routes = Router::new()
        .route("/confirmation", get(rsvp::confirmation_page).post(rsvp::confirm))
        .route("/text", get(rsvp::closing_page).post(rsvp::save_message))
        .route("/form", get(rsvp::form_page).post(rsvp::add_guests))
        .route("/success", get(rsvp::summary))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    public_routes.merge(protected_routes).with_state(state)
}

pub async fn health() -> &'static str {
    "ok"
}

/// Run a store call on the blocking pool; the store holds a std mutex and
/// does file I/O. Only a failed join becomes an HTTP error here, the store's
/// own result is handed back for the handler to judge.
pub(crate) async fn blocking<F, T>(state: &AppState, f: F) -> Result<rsvp_db::Result<T>, StatusCode>
where
    F: FnOnce(&Database) -> rsvp_db::Result<T> + Send + 'static,
    T: Send + 'static,
{
    let state = state.clone();
    tokio::task::spawn_blocking(move || f(&state.db))
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })
}
