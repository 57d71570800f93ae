use std::sync::Arc;

use reqwest::Client;

use crate::config::Config;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub http: Client,
    pub config: Arc<Config>,
}
