//! Router wiring for the account endpoints

use std::sync::Arc;

use account_store::AccountStore;
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::handlers;

/// Create the account service router with HTTP request tracing
///
/// Routes:
/// - `POST /signup`
/// - `POST /login`
/// - `GET /users`
/// - `DELETE /users/{id}`
/// - `PUT /users/{id}/reset`
pub fn account_router(store: Arc<AccountStore>) -> Router {
    account_router_no_trace(store).layer(
        TraceLayer::new_for_http()
            .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
            .on_request(DefaultOnRequest::new().level(Level::INFO))
            .on_response(
                DefaultOnResponse::new()
                    .level(Level::INFO)
                    .latency_unit(LatencyUnit::Millis),
            ),
    )
}

/// Same as [`account_router`] but without the HTTP tracing middleware
///
/// Use this if you want to add your own tracing middleware or if you don't
/// need HTTP request tracing.
pub fn account_router_no_trace(store: Arc<AccountStore>) -> Router {
    Router::new()
        .route("/signup", post(handlers::signup))
        .route("/login", post(handlers::login))
        .route("/users", get(handlers::list_users))
        .route("/users/{id}", delete(handlers::delete_user))
        .route("/users/{id}/reset", put(handlers::reset_password))
        // The original service fronts everything with permissive CORS
        .layer(CorsLayer::permissive())
        .with_state(store)
}
