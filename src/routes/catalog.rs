// Handlers for the public store and used-car catalogs

use std::collections::BTreeSet;
use std::fmt::Display;
use std::str::FromStr;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState,
    catalog::{Bounds, CatalogKind, CatalogSnapshot, CatalogView, FilterState, SortOrder, bounds::current_year},
    error::{AppError, AppResult},
};

/// Filter criteria as they arrive on the query string. Anything left out
/// falls back to the cleared state for the loaded catalog.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    pub q: Option<String>,
    pub price_min: Option<f64>,
    pub price_max: Option<f64>,
    pub year_min: Option<i32>,
    pub year_max: Option<i32>,
    pub mileage_max: Option<u64>,
    // Comma separated lists
    pub fuel: Option<String>,
    pub transmission: Option<String>,
    pub doors: Option<String>,
    pub sort: Option<String>,
}

fn parse_list<T>(raw: Option<&str>, what: &str) -> AppResult<BTreeSet<T>>
where
    T: FromStr + Ord,
    T::Err: Display,
{
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse::<T>()
                .map_err(|e| AppError::BadRequest(format!("invalid {what} `{item}`: {e}")))
        })
        .collect()
}

impl CatalogQuery {
    pub fn into_filter_state(self, bounds: &Bounds) -> AppResult<FilterState> {
        let cleared = FilterState::cleared(bounds);
        let sort_order = match self.sort.as_deref() {
            Some(raw) => raw
                .parse::<SortOrder>()
                .map_err(|e| AppError::BadRequest(e.to_string()))?,
            None => cleared.sort_order,
        };

        Ok(FilterState {
            search_text: self.q.unwrap_or_default(),
            price_min: self.price_min.unwrap_or(cleared.price_min),
            price_max: self.price_max.unwrap_or(cleared.price_max),
            year_min: self.year_min.unwrap_or(cleared.year_min),
            year_max: self.year_max.unwrap_or(cleared.year_max),
            mileage_max: self.mileage_max.unwrap_or(cleared.mileage_max),
            fuel_types: parse_list(self.fuel.as_deref(), "fuel type")?,
            transmissions: parse_list(self.transmission.as_deref(), "transmission")?,
            door_counts: parse_list(self.doors.as_deref(), "door count")?,
            sort_order,
        })
    }
}

pub async fn get_catalog(
    State(app_state): State<AppState>,
    kind: Result<Path<CatalogKind>, PathRejection>,
    query: Result<Query<CatalogQuery>, QueryRejection>,
) -> AppResult<(StatusCode, Json<CatalogSnapshot>)> {
    let Path(kind) = kind?;
    let Query(query) = query?;
    tracing::info!(%kind, "[HANDLER] /api/catalog - Request received.");

    let listings = match app_state.backend.fetch_catalog(kind).await {
        Ok(listings) => listings,
        Err(e) => {
            tracing::error!(%kind, "Failed to load catalog: {}", e);
            let view = CatalogView::unavailable(kind, current_year());
            return Ok((StatusCode::SERVICE_UNAVAILABLE, Json(view.snapshot())));
        }
    };

    let mut view = CatalogView::load(kind, listings, current_year());
    let filters = query.into_filter_state(view.bounds())?;
    view.replace_filters(filters);

    let snapshot = view.snapshot();
    tracing::info!(%kind, displayed = snapshot.total, "[HANDLER] /api/catalog - Responding.");
    Ok((StatusCode::OK, Json(snapshot)))
}
