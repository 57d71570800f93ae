pub mod charts;
pub mod health;

use axum::middleware as axum_mw;
use axum::routing::get;
use axum::Router;

use crate::middleware;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/", get(charts::download_charts))
        .route(
            &format!("/{}", charts::PDF_FILENAME),
            get(charts::download_charts),
        )
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .with_state(state)
}
