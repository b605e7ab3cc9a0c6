// Route definitions

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::{delete, get, post, put},
};
use serde_json::{Value, json};
use tower_http::trace::TraceLayer;

use crate::{AppState, config::Settings};

mod auth;
mod catalog;
mod listings;
mod reservations;

pub use catalog::CatalogQuery;

// Listing submissions carry images; axum's default 2 MB body cap is too small
const LISTING_UPLOAD_LIMIT: usize = 25 * 1024 * 1024;

pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        // Public catalogs
        .route("/catalog/:kind", get(catalog::get_catalog))
        // Listings
        .route("/listings", post(listings::create_listing))
        .route("/listings/mine", get(listings::my_listings))
        .route("/listings/:id", put(listings::update_listing).delete(listings::delete_listing))
        .route("/admin/listings/pending", get(listings::pending_listings))
        .route("/admin/listings/:id/approve", post(listings::approve_listing))
        .route("/admin/listings/:id/reject", post(listings::reject_listing))
        // Reservations
        .route("/reservations", post(reservations::create_reservation).put(reservations::modify_reservation))
        .route("/reservations/mine", get(reservations::my_reservations))
        .route("/reservations/:id", delete(reservations::delete_reservation))
        .route("/admin/reservations", get(reservations::all_reservations))
        .route("/admin/reservations/:id/accept", post(reservations::accept_reservation))
        .route("/admin/reservations/:id/reject", post(reservations::reject_reservation))
        // Accounts
        .route("/auth/login", post(auth::login))
        .route("/auth/register", post(auth::register))
        .layer(DefaultBodyLimit::max(LISTING_UPLOAD_LIMIT));

    Router::new()
        .route("/health", get(health))
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

async fn health(State(settings): State<Arc<Settings>>) -> Json<Value> {
    Json(json!({ "status": "ok", "backendUrl": settings.backend_url }))
}
