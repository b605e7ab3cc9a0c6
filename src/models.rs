// Wire models shared with the dealership backend.
// Field names follow the backend's JSON (Spanish keys), mapped onto English Rust names.

use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::catalog::{FuelType, Transmission, bounds};

// Accepts a JSON string, number or null and always yields text.
// The backend is not consistent about numeric-looking text fields (km, puertas, ...).
fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(other) => other.to_string(),
    })
}

// Numeric fields arrive as null on half-filled listings; read them as zero.
fn null_as_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a mileage text by keeping only its ASCII digits.
///
/// `"45,000 km"` reads as 45000. Text without any digit reads as 0, so it
/// never fails a mileage ceiling.
pub fn parse_mileage(raw: &str) -> u64 {
    raw.bytes()
        .filter(u8::is_ascii_digit)
        .fold(0u64, |acc, d| acc.saturating_mul(10).saturating_add(u64::from(d - b'0')))
}

/// Reads the leading integer of a door count text (`"4"`, `" 5 puertas"`).
pub fn parse_door_count(raw: &str) -> Option<u8> {
    let trimmed = raw.trim_start();
    let digits: &str = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .map_or(trimmed, |end| &trimmed[..end]);
    digits.parse().ok()
}

// --- Listings ---

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ListingStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "ACEPTADA")]
    Approved,
    #[serde(rename = "RECHAZADA")]
    Rejected,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TechnicalSheet {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "motor", default, deserialize_with = "lenient_text")]
    pub engine_displacement: String,
    #[serde(rename = "combustible", default, deserialize_with = "lenient_text")]
    pub fuel_type: String,
    #[serde(rename = "caja", default, deserialize_with = "lenient_text")]
    pub transmission: String,
    #[serde(rename = "puertas", default, deserialize_with = "lenient_text")]
    pub doors: String,
    #[serde(rename = "potencia", default, deserialize_with = "lenient_text")]
    pub power: String,
}

impl TechnicalSheet {
    pub fn door_count(&self) -> Option<u8> {
        parse_door_count(&self.doors)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct Vehicle {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "marca", default, deserialize_with = "lenient_text")]
    pub make: String,
    #[serde(rename = "modelo", default, deserialize_with = "lenient_text")]
    pub model: String,
    #[serde(rename = "precio", default, deserialize_with = "null_as_zero")]
    pub price: f64,
    #[serde(rename = "anio", default, deserialize_with = "null_as_zero")]
    pub year: i32,
    // Stored as free text by the backend, e.g. "45.000 km"
    #[serde(rename = "km", default, deserialize_with = "lenient_text")]
    pub mileage: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub color: String,
    #[serde(rename = "fichaTecnica", default)]
    pub technical_sheet: Option<TechnicalSheet>,
    #[serde(rename = "imagenesUrl", default)]
    pub images: Vec<String>,
}

impl Vehicle {
    pub fn mileage_km(&self) -> u64 {
        parse_mileage(&self.mileage)
    }
}

// A published or pending vehicle-for-sale record
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Listing {
    pub id: i64,
    #[serde(rename = "descripcion", default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(rename = "auto")]
    pub vehicle: Vehicle,
    #[serde(rename = "estado", default)]
    pub status: Option<ListingStatus>,
    #[serde(rename = "vendedorEmail", default, deserialize_with = "lenient_text")]
    pub seller_email: String,
    #[serde(rename = "nombreVendedor", default, deserialize_with = "lenient_text")]
    pub seller_name: String,
    #[serde(rename = "vendedorTelefono", default, deserialize_with = "lenient_text")]
    pub seller_phone: String,
}

// --- Listing submission ---

static DIGITS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").expect("valid digits pattern"));
static DECIMAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]+(\.[0-9]+)?$").expect("valid decimal pattern"));
static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZáéíóúÁÉÍÓÚñÑ ]+$").expect("valid color pattern"));

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(message.into())
}

fn validate_mileage_text(km: &str) -> Result<(), ValidationError> {
    if !DIGITS_RE.is_match(km) {
        return Err(invalid("km_digits", "mileage must contain digits only"));
    }
    if parse_mileage(km) > bounds::MILEAGE_CAP {
        return Err(invalid("km_range", "mileage must not exceed 400000 km"));
    }
    Ok(())
}

fn validate_color(color: &str) -> Result<(), ValidationError> {
    let len = color.chars().count();
    if !(4..=8).contains(&len) || !COLOR_RE.is_match(color) {
        return Err(invalid("color", "color must be 4 to 8 letters"));
    }
    Ok(())
}

fn validate_engine(engine: &str) -> Result<(), ValidationError> {
    if !DECIMAL_RE.is_match(engine) {
        return Err(invalid("engine_format", "engine displacement must be a decimal number"));
    }
    let displacement: f64 = engine.parse().unwrap_or(0.0);
    if !(0.1..=6.6).contains(&displacement) {
        return Err(invalid("engine_range", "engine displacement must be between 0.1 and 6.6"));
    }
    Ok(())
}

fn validate_power(power: &str) -> Result<(), ValidationError> {
    if !DIGITS_RE.is_match(power) {
        return Err(invalid("power_digits", "power must contain digits only"));
    }
    match power.parse::<u32>() {
        Ok(hp) if (1..=400).contains(&hp) => Ok(()),
        _ => Err(invalid("power_range", "power must be between 1 and 400")),
    }
}

fn validate_fuel_type(fuel: &str) -> Result<(), ValidationError> {
    fuel.parse::<FuelType>()
        .map(|_| ())
        .map_err(|_| invalid("fuel_type", "unknown fuel type"))
}

fn validate_transmission(transmission: &str) -> Result<(), ValidationError> {
    transmission
        .parse::<Transmission>()
        .map(|_| ())
        .map_err(|_| invalid("transmission", "unknown transmission type"))
}

fn validate_doors(doors: &str) -> Result<(), ValidationError> {
    parse_door_count(doors)
        .map(|_| ())
        .ok_or_else(|| invalid("doors", "door count is required"))
}

fn validate_model_year(vehicle: &VehicleRequest) -> Result<(), ValidationError> {
    if vehicle.year > bounds::current_year() {
        return Err(invalid("year_range", "year cannot be in the future"));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct TechnicalSheetRequest {
    #[serde(rename = "motor")]
    #[validate(custom(function = "validate_engine"))]
    pub engine_displacement: String,
    #[serde(rename = "combustible")]
    #[validate(custom(function = "validate_fuel_type"))]
    pub fuel_type: String,
    #[serde(rename = "caja")]
    #[validate(custom(function = "validate_transmission"))]
    pub transmission: String,
    #[serde(rename = "puertas")]
    #[validate(custom(function = "validate_doors"))]
    pub doors: String,
    #[serde(rename = "potencia")]
    #[validate(custom(function = "validate_power"))]
    pub power: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
#[validate(schema(function = "validate_model_year"))]
pub struct VehicleRequest {
    #[serde(rename = "marca")]
    #[validate(length(min = 2, max = 30, message = "make must be 2 to 30 characters"))]
    pub make: String,
    #[serde(rename = "modelo")]
    #[validate(length(min = 2, max = 30, message = "model must be 2 to 30 characters"))]
    pub model: String,
    #[serde(rename = "precio")]
    #[validate(range(min = 1.0, max = 1_000_000.0, message = "price must be between 1 and 1000000"))]
    pub price: f64,
    #[serde(rename = "anio")]
    #[validate(range(min = 1885, message = "year must be 1885 or later"))]
    pub year: i32,
    #[serde(rename = "km")]
    #[validate(custom(function = "validate_mileage_text"))]
    pub mileage: String,
    #[validate(custom(function = "validate_color"))]
    pub color: String,
    #[serde(rename = "fichaTecnica")]
    #[validate(nested)]
    pub technical_sheet: TechnicalSheetRequest,
}

// Body of a listing submission; new listings start out pending moderation
#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct ListingRequest {
    #[serde(rename = "descripcion")]
    #[validate(length(min = 5, max = 500, message = "description must be 5 to 500 characters"))]
    pub description: String,
    #[serde(rename = "auto")]
    #[validate(nested)]
    pub vehicle: VehicleRequest,
    #[serde(rename = "tipoPublicacion", default, skip_serializing_if = "Option::is_none")]
    pub listing_type: Option<String>,
}

// --- Reservations ---

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum ReservationStatus {
    #[serde(rename = "PENDIENTE")]
    Pending,
    #[serde(rename = "ACEPTADA")]
    Accepted,
    #[serde(rename = "CANCELADA")]
    Cancelled,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Validate)]
pub struct ReservationContact {
    #[serde(rename = "nombre")]
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "email is required"))]
    pub email: String,
    #[serde(rename = "telefono")]
    #[validate(length(min = 1, message = "phone is required"))]
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Validate)]
pub struct ReservationRequest {
    #[serde(rename = "usuarioReservaDTO")]
    #[validate(nested)]
    pub contact: ReservationContact,
    #[serde(rename = "idPublicacion")]
    pub listing_id: i64,
    #[serde(rename = "fecha")]
    pub date: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Reservation {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(rename = "usuarioReserva")]
    pub contact: ReservationContact,
    #[serde(rename = "fecha")]
    pub date: NaiveDateTime,
    #[serde(rename = "idPublicacion")]
    pub listing_id: i64,
    #[serde(rename = "montoReserva", default)]
    pub amount: f64,
    #[serde(rename = "estadoReserva")]
    pub status: ReservationStatus,
}

impl Reservation {
    pub fn with_status(&self, status: ReservationStatus) -> Self {
        Reservation { status, ..self.clone() }
    }
}

/// A reservation slot must lie strictly after `now`.
pub fn ensure_future(date: NaiveDateTime, now: NaiveDateTime) -> Result<(), ValidationError> {
    if date <= now {
        return Err(invalid("date", "reservation date and time must be in the future"));
    }
    Ok(())
}

// --- Accounts ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

// Login response from the backend; the UI caches it and reads the role from it
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Session {
    pub token: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub rol: Option<String>,
    #[serde(default)]
    pub nombre: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.rol.as_deref() == Some("ADMIN")
    }
}
