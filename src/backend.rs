// Client for the dealership REST backend (listings, reservations, accounts).
// Calls are single-shot: no timeout, retry or cancellation is layered on top.

use reqwest::{Client, RequestBuilder, Response, StatusCode, multipart};
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

use crate::catalog::CatalogKind;
use crate::models::{
    Credentials, Listing, ListingRequest, Reservation, ReservationRequest, ReservationStatus, Session,
};

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend responded with {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("invalid JSON exchanged with backend: {0}")]
    Json(#[from] serde_json::Error),
    #[error("backend returned an invalid payment url: `{0}`")]
    InvalidPaymentUrl(String),
}

// An image attached to a listing submission
#[derive(Debug, Clone)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// `reqwest::Client` is reference counted internally, so cloning the
/// wrapper is cheap.
#[derive(Debug, Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        BackendClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Image paths served by the backend may be relative; make them absolute.
    pub fn resolve_image_url(&self, raw: &str) -> String {
        if raw.is_empty() || raw.starts_with("http://") || raw.starts_with("https://") {
            raw.to_string()
        } else if raw.starts_with('/') {
            format!("{}{}", self.base_url, raw)
        } else {
            format!("{}/{}", self.base_url, raw)
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, BackendError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "[Failed to read response body]".to_string());
            tracing::debug!(%status, response_body = %body, "Backend error details");
            return Err(BackendError::Status { status, body });
        }
        Ok(response)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, BackendError> {
        let bytes = self.send(request).await?.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn send_listing(&self, request: RequestBuilder) -> Result<Listing, BackendError> {
        let mut listing: Listing = self.send_json(request).await?;
        self.resolve_images(&mut listing);
        Ok(listing)
    }

    async fn send_listings(&self, request: RequestBuilder) -> Result<Vec<Listing>, BackendError> {
        let mut listings: Vec<Listing> = self.send_json(request).await?;
        for listing in &mut listings {
            self.resolve_images(listing);
        }
        Ok(listings)
    }

    fn resolve_images(&self, listing: &mut Listing) {
        for image in &mut listing.vehicle.images {
            *image = self.resolve_image_url(image);
        }
    }

    // --- Listings ---

    pub async fn fetch_catalog(&self, kind: CatalogKind) -> Result<Vec<Listing>, BackendError> {
        let url = self.url(&format!("/publicacion/{}", kind.backend_path()));
        tracing::debug!(%kind, url = %url, "Fetching catalog");
        let listings = self.send_listings(self.http.get(&url)).await?;
        tracing::info!(%kind, count = listings.len(), "Fetched catalog listings");
        Ok(listings)
    }

    pub async fn my_listings(&self, token: &str) -> Result<Vec<Listing>, BackendError> {
        let url = self.url("/publicacion/misPublicaciones");
        self.send_listings(self.http.get(url).bearer_auth(token)).await
    }

    pub async fn create_listing(
        &self,
        token: &str,
        listing: &ListingRequest,
        images: Vec<ImageUpload>,
    ) -> Result<Listing, BackendError> {
        let mut form = multipart::Form::new().text("publicacion", serde_json::to_string(listing)?);
        for image in images {
            let mut part = multipart::Part::bytes(image.bytes).file_name(image.file_name);
            if let Some(content_type) = image.content_type.as_deref() {
                part = part.mime_str(content_type)?;
            }
            form = form.part("files", part);
        }

        let url = self.url("/publicacion/crearPublicacion");
        let created = self.send_listing(self.http.post(url).bearer_auth(token).multipart(form)).await?;
        tracing::info!(listing_id = created.id, status = ?created.status, "Listing submitted");
        Ok(created)
    }

    pub async fn update_listing(
        &self,
        token: &str,
        listing_id: i64,
        listing: &ListingRequest,
    ) -> Result<Listing, BackendError> {
        let url = self.url(&format!("/publicacion/{listing_id}"));
        self.send_listing(self.http.put(url).bearer_auth(token).json(listing)).await
    }

    pub async fn delete_listing(&self, token: &str, listing_id: i64) -> Result<(), BackendError> {
        let url = self.url(&format!("/publicacion/{listing_id}"));
        self.send(self.http.delete(url).bearer_auth(token)).await?;
        Ok(())
    }

    pub async fn pending_listings(&self, token: &str) -> Result<Vec<Listing>, BackendError> {
        let url = self.url("/publicacion/admin/pendientes");
        self.send_listings(self.http.get(url).bearer_auth(token)).await
    }

    pub async fn approve_listing(&self, token: &str, listing_id: i64) -> Result<Listing, BackendError> {
        let url = self.url(&format!("/publicacion/admin/aprobar/{listing_id}"));
        let approved = self
            .send_listing(self.http.patch(url).bearer_auth(token).json(&serde_json::json!({})))
            .await?;
        tracing::info!(listing_id, "Listing approved");
        Ok(approved)
    }

    pub async fn reject_listing(&self, token: &str, listing_id: i64) -> Result<(), BackendError> {
        let url = self.url(&format!("/publicacion/admin/rechazar/{listing_id}"));
        self.send(self.http.delete(url).bearer_auth(token)).await?;
        tracing::info!(listing_id, "Listing rejected");
        Ok(())
    }

    // --- Reservations ---

    /// Creates a reservation and returns the payment provider URL the buyer
    /// has to be redirected to.
    pub async fn create_reservation(
        &self,
        token: &str,
        reservation: &ReservationRequest,
    ) -> Result<String, BackendError> {
        let url = self.url("/reserva/crear");
        let response = self.send(self.http.post(url).bearer_auth(token).json(reservation)).await?;
        let payment_url = response.text().await?.trim().to_string();
        if !payment_url.starts_with("http") {
            return Err(BackendError::InvalidPaymentUrl(payment_url));
        }
        tracing::info!(listing_id = reservation.listing_id, "Reservation created, payment pending");
        Ok(payment_url)
    }

    pub async fn my_reservations(&self, token: &str) -> Result<Vec<Reservation>, BackendError> {
        let url = self.url("/reserva/mis-reservas");
        self.send_json(self.http.get(url).bearer_auth(token)).await
    }

    pub async fn all_reservations(&self, token: &str) -> Result<Vec<Reservation>, BackendError> {
        let url = self.url("/reserva/admin/lista");
        self.send_json(self.http.get(url).bearer_auth(token)).await
    }

    pub async fn modify_reservation(
        &self,
        token: &str,
        reservation: &Reservation,
    ) -> Result<Reservation, BackendError> {
        let url = self.url("/reserva/modificar-reserva");
        self.send_json(self.http.put(url).bearer_auth(token).json(reservation)).await
    }

    pub async fn accept_reservation(
        &self,
        token: &str,
        reservation: &Reservation,
    ) -> Result<Reservation, BackendError> {
        self.modify_reservation(token, &reservation.with_status(ReservationStatus::Accepted))
            .await
    }

    pub async fn reject_reservation(
        &self,
        token: &str,
        reservation: &Reservation,
    ) -> Result<Reservation, BackendError> {
        self.modify_reservation(token, &reservation.with_status(ReservationStatus::Cancelled))
            .await
    }

    pub async fn delete_reservation(&self, token: &str, reservation_id: i64) -> Result<(), BackendError> {
        let url = self.url(&format!("/reserva/{reservation_id}"));
        self.send(self.http.delete(url).bearer_auth(token)).await?;
        Ok(())
    }

    // --- Accounts ---

    pub async fn login(&self, credentials: &Credentials) -> Result<Session, BackendError> {
        let url = self.url("/usuario/login");
        self.send_json(self.http.post(url).json(credentials)).await
    }

    // Registration payloads are passed through untouched
    pub async fn register(&self, account: &Value) -> Result<Value, BackendError> {
        let url = self.url("/usuario/registro");
        self.send_json(self.http.post(url).json(account)).await
    }
}
