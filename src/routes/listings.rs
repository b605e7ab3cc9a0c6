// Handlers for listing submission, the seller's own listings and moderation

use axum::{
    Json,
    extract::{Multipart, Path, State, multipart::MultipartError},
    http::StatusCode,
};
use validator::Validate;

use crate::{
    AppState,
    auth_middleware::BearerToken,
    backend::ImageUpload,
    error::{AppError, AppResult},
    models::{Listing, ListingRequest},
};

const LISTING_PART: &str = "publicacion";
const IMAGE_PART: &str = "files";

fn bad_multipart(e: MultipartError) -> AppError {
    AppError::BadRequest(format!("malformed multipart body: {e}"))
}

/// Splits a listing submission into its JSON part and its image parts.
async fn read_submission(mut multipart: Multipart) -> AppResult<(ListingRequest, Vec<ImageUpload>)> {
    let mut listing: Option<ListingRequest> = None;
    let mut images = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(bad_multipart)? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some(LISTING_PART) => {
                let text = field.text().await.map_err(bad_multipart)?;
                let parsed = serde_json::from_str(&text)
                    .map_err(|e| AppError::BadRequest(format!("invalid listing payload: {e}")))?;
                listing = Some(parsed);
            }
            Some(IMAGE_PART) => {
                let file_name = field.file_name().unwrap_or("image").to_string();
                let content_type = field.content_type().map(str::to_string);
                let bytes = field.bytes().await.map_err(bad_multipart)?;
                if !bytes.is_empty() {
                    images.push(ImageUpload {
                        file_name,
                        content_type,
                        bytes: bytes.to_vec(),
                    });
                }
            }
            other => tracing::debug!(field = ?other, "Ignoring unexpected multipart field"),
        }
    }

    let listing = listing.ok_or_else(|| AppError::BadRequest(format!("missing `{LISTING_PART}` part")))?;
    Ok((listing, images))
}

pub async fn create_listing(
    State(app_state): State<AppState>,
    token: BearerToken,
    multipart: Multipart,
) -> AppResult<(StatusCode, Json<Listing>)> {
    let (listing, images) = read_submission(multipart).await?;
    listing.validate()?;
    if images.is_empty() {
        return Err(AppError::BadRequest("at least one image is required".into()));
    }

    tracing::info!(
        make = %listing.vehicle.make,
        model = %listing.vehicle.model,
        images = images.len(),
        "[HANDLER] /api/listings - Submitting listing."
    );
    let created = app_state.backend.create_listing(token.as_str(), &listing, images).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn my_listings(State(app_state): State<AppState>, token: BearerToken) -> AppResult<Json<Vec<Listing>>> {
    Ok(Json(app_state.backend.my_listings(token.as_str()).await?))
}

pub async fn update_listing(
    State(app_state): State<AppState>,
    token: BearerToken,
    Path(listing_id): Path<i64>,
    Json(listing): Json<ListingRequest>,
) -> AppResult<Json<Listing>> {
    listing.validate()?;
    let updated = app_state.backend.update_listing(token.as_str(), listing_id, &listing).await?;
    tracing::info!(listing_id, "Listing updated");
    Ok(Json(updated))
}

pub async fn delete_listing(
    State(app_state): State<AppState>,
    token: BearerToken,
    Path(listing_id): Path<i64>,
) -> AppResult<StatusCode> {
    app_state.backend.delete_listing(token.as_str(), listing_id).await?;
    tracing::info!(listing_id, "Listing deleted");
    Ok(StatusCode::NO_CONTENT)
}

// --- Moderation ---

pub async fn pending_listings(
    State(app_state): State<AppState>,
    token: BearerToken,
) -> AppResult<Json<Vec<Listing>>> {
    let pending = app_state.backend.pending_listings(token.as_str()).await?;
    tracing::debug!(count = pending.len(), "Fetched listings awaiting moderation");
    Ok(Json(pending))
}

pub async fn approve_listing(
    State(app_state): State<AppState>,
    token: BearerToken,
    Path(listing_id): Path<i64>,
) -> AppResult<Json<Listing>> {
    Ok(Json(app_state.backend.approve_listing(token.as_str(), listing_id).await?))
}

pub async fn reject_listing(
    State(app_state): State<AppState>,
    token: BearerToken,
    Path(listing_id): Path<i64>,
) -> AppResult<StatusCode> {
    app_state.backend.reject_listing(token.as_str(), listing_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
