use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod bookings;
pub mod catalog;
pub mod error;
pub mod middleware;
pub mod state;

pub use state::{AppState, AuthConfig};

/// Full router with permissive CORS.
pub fn app(state: AppState) -> Router {
    app_with_origins(state, &[])
}

/// Full router. `origins` restricts CORS; empty allows any origin.
pub fn app_with_origins(state: AppState, origins: &[String]) -> Router {
    let allowed: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    let cors = CorsLayer::new()
        .allow_origin(if allowed.is_empty() { AllowOrigin::from(Any) } else { AllowOrigin::list(allowed) })
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::USER_AGENT]);

    let admin = Router::new()
        .merge(catalog::admin_routes())
        .merge(bookings::admin_routes())
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::admin_auth_middleware,
        ));

    Router::new()
        .route("/health", get(health))
        .nest("/v1/auth", auth::routes())
        .nest("/v1/admin", admin)
        .merge(bookings::routes())
        .merge(catalog::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
