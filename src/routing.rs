//! Application router configuration.

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState,
    alert::get_alerts_endpoint,
    dashboard::get_dashboard_page,
    endpoints,
    health::get_health,
    not_found::get_404_not_found,
    transaction::{create_transaction_endpoint, list_transactions_endpoint},
};

/// Return a router with all the app's routes.
///
/// Cross-origin requests are allowed from any origin so that the API can be
/// used by clients served from elsewhere.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::ROOT, get(get_dashboard_page))
        .route(endpoints::HEALTH, get(get_health))
        .route(
            endpoints::TRANSACTIONS_API,
            get(list_transactions_endpoint).post(create_transaction_endpoint),
        )
        .route(endpoints::ALERTS_API, get(get_alerts_endpoint))
        .fallback(get_404_not_found)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
