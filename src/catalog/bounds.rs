// Default range values offered by the catalog filters

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::models::Listing;

pub const PRICE_FLOOR: f64 = 0.0;
pub const PRICE_CAP: f64 = 1_000_000.0;
// Year of the first production automobile
pub const YEAR_FLOOR: i32 = 1885;
pub const MILEAGE_CAP: u64 = 400_000;

pub fn current_year() -> i32 {
    chrono::Local::now().year()
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub price_min: f64,
    pub price_max: f64,
    pub year_min: i32,
    pub year_max: i32,
    pub mileage_max: u64,
}

impl Bounds {
    pub fn platform_defaults(current_year: i32) -> Self {
        Bounds {
            price_min: PRICE_FLOOR,
            price_max: PRICE_CAP,
            year_min: YEAR_FLOOR,
            year_max: current_year,
            mileage_max: MILEAGE_CAP,
        }
    }

    /// Derives the filter defaults for a freshly loaded listing set.
    ///
    /// Only the price ceiling follows the data (clamped to [`PRICE_CAP`]); the
    /// floor stays at zero and the year and mileage ranges are always the
    /// platform constants, even though their observed extents are gathered.
    pub fn from_listings(listings: &[Listing], current_year: i32) -> Self {
        let defaults = Bounds::platform_defaults(current_year);
        let Some(max_price) = listings.iter().map(|l| l.vehicle.price).reduce(f64::max) else {
            return defaults;
        };

        // Observed extents are not applied to the ranges
        let observed_year_min = listings.iter().map(|l| l.vehicle.year).min();
        let observed_year_max = listings.iter().map(|l| l.vehicle.year).max();
        let observed_mileage_max = listings.iter().map(|l| l.vehicle.mileage_km()).max();
        tracing::debug!(
            listings = listings.len(),
            max_price,
            ?observed_year_min,
            ?observed_year_max,
            ?observed_mileage_max,
            "Computed catalog bounds"
        );

        Bounds {
            price_max: max_price.min(PRICE_CAP),
            ..defaults
        }
    }
}
