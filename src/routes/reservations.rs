// Handlers for vehicle reservations and their administration

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Local;
use serde::Serialize;
use validator::Validate;

use crate::{
    AppState,
    auth_middleware::BearerToken,
    error::{AppError, AppResult},
    models::{Reservation, ReservationRequest, ensure_future},
};

/// Where the buyer must be sent to pay the reservation deposit.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRedirect {
    pub payment_url: String,
}

pub async fn create_reservation(
    State(app_state): State<AppState>,
    token: BearerToken,
    Json(reservation): Json<ReservationRequest>,
) -> AppResult<Json<PaymentRedirect>> {
    reservation.validate()?;
    ensure_future(reservation.date, Local::now().naive_local())?;

    tracing::info!(listing_id = reservation.listing_id, "[HANDLER] /api/reservations - Creating reservation.");
    let payment_url = app_state.backend.create_reservation(token.as_str(), &reservation).await?;
    Ok(Json(PaymentRedirect { payment_url }))
}

pub async fn my_reservations(
    State(app_state): State<AppState>,
    token: BearerToken,
) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(app_state.backend.my_reservations(token.as_str()).await?))
}

pub async fn modify_reservation(
    State(app_state): State<AppState>,
    token: BearerToken,
    Json(reservation): Json<Reservation>,
) -> AppResult<Json<Reservation>> {
    if reservation.id.is_none() {
        return Err(AppError::BadRequest("reservation id is required".into()));
    }
    reservation.contact.validate()?;
    ensure_future(reservation.date, Local::now().naive_local())?;

    let modified = app_state.backend.modify_reservation(token.as_str(), &reservation).await?;
    tracing::info!(reservation_id = ?modified.id, "Reservation modified");
    Ok(Json(modified))
}

pub async fn delete_reservation(
    State(app_state): State<AppState>,
    token: BearerToken,
    Path(reservation_id): Path<i64>,
) -> AppResult<StatusCode> {
    app_state.backend.delete_reservation(token.as_str(), reservation_id).await?;
    tracing::info!(reservation_id, "Reservation deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- Administration ---

pub async fn all_reservations(
    State(app_state): State<AppState>,
    token: BearerToken,
) -> AppResult<Json<Vec<Reservation>>> {
    Ok(Json(app_state.backend.all_reservations(token.as_str()).await?))
}

async fn find_reservation(app_state: &AppState, token: &str, reservation_id: i64) -> AppResult<Reservation> {
    app_state
        .backend
        .all_reservations(token)
        .await?
        .into_iter()
        .find(|r| r.id == Some(reservation_id))
        .ok_or_else(|| AppError::NotFound(format!("reservation {reservation_id} not found")))
}

pub async fn accept_reservation(
    State(app_state): State<AppState>,
    token: BearerToken,
    Path(reservation_id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let reservation = find_reservation(&app_state, token.as_str(), reservation_id).await?;
    let accepted = app_state.backend.accept_reservation(token.as_str(), &reservation).await?;
    tracing::info!(reservation_id, "Reservation accepted");
    Ok(Json(accepted))
}

pub async fn reject_reservation(
    State(app_state): State<AppState>,
    token: BearerToken,
    Path(reservation_id): Path<i64>,
) -> AppResult<Json<Reservation>> {
    let reservation = find_reservation(&app_state, token.as_str(), reservation_id).await?;
    let rejected = app_state.backend.reject_reservation(token.as_str(), &reservation).await?;
    tracing::info!(reservation_id, "Reservation rejected");
    Ok(Json(rejected))
}
