pub mod api;
pub mod guard;
pub mod pages;

use crate::state::AppState;
use axum::{http::StatusCode, middleware, routing::get, Router};
use std::sync::Arc;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let state = Arc::new(state);
    let timeout = state.config.request_timeout();

    Router::new()
        .route(guard::LOGIN_PATH, get(pages::login_page))
        .route("/dashboard", get(pages::dashboard_page))
        .route("/settings", get(pages::settings_page))
        .merge(api::build_api_routes(state.clone()))
        .layer(middleware::from_fn_with_state(state, guard::route_guard))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
