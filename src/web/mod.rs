pub mod api;
pub mod error;
pub mod routes;
pub mod sse;
pub mod state;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};

use state::AppState;

pub fn create_router(state: AppState) -> Router {
    // The browser UI may be hosted elsewhere; answer preflight with
    // permissive headers.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(routes::dashboard))
        .route("/sse", get(sse::sse_handler))
        .route("/api/analyze-sentiment", post(api::analyze_sentiment))
        .route("/api/suggest-reply", post(api::suggest_reply))
        .route("/api/mentions", get(api::list_mentions).post(api::create_mention))
        .route("/api/mentions/{id}/acknowledge", post(api::acknowledge_mention))
        .route("/api/alerts", get(api::list_alerts))
        .route("/api/stats", get(api::stats))
        .route("/api/analytics", get(api::analytics_report))
        .route(
            "/api/settings/alerts",
            get(api::alert_settings).put(api::update_alert_settings),
        )
        .route(
            "/api/competitors",
            get(api::list_competitors).post(api::add_competitor),
        )
        .route("/api/simulate", post(api::simulate_mention))
        .layer(cors)
        .with_state(state)
}
