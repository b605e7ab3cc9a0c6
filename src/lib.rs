use std::sync::Arc;

use axum::extract::FromRef;

pub mod auth_middleware;
pub mod backend;
pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod routes;

use crate::backend::BackendClient;
use crate::config::Settings;

// Shared application state handed to every handler
#[derive(Clone, FromRef)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub backend: BackendClient,
}

impl AppState {
    pub fn new(settings: Settings, http_client: reqwest::Client) -> Self {
        let backend = BackendClient::new(http_client, &settings.backend_url);
        AppState {
            settings: Arc::new(settings),
            backend,
        }
    }
}
