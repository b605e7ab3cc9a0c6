//! Catalog engine: the filter/sort/bounds pipeline behind both vehicle catalogs.
//!
//! The store catalog and the used-vehicle catalog share one engine; they only
//! differ in which listing fields free-text search looks at, see [`CatalogKind`].

pub mod bounds;
pub mod filter;
pub mod sort;
pub mod view;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Listing;

pub use bounds::Bounds;
pub use filter::{FilterState, apply_filters};
pub use sort::{SortOrder, sort_by_price};
pub use view::{CatalogSnapshot, CatalogView};

/// Door counts offered by the catalog filters.
pub const DOOR_COUNTS: [u8; 4] = [2, 3, 4, 5];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown {kind}: `{value}`")]
pub struct UnknownValue {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownValue {
    fn new(kind: &'static str, value: &str) -> Self {
        UnknownValue { kind, value: value.to_string() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    // New vehicles sold by the dealership itself
    #[serde(alias = "tienda")]
    Store,
    // Vehicles listed by private sellers
    #[serde(alias = "usados")]
    Used,
}

impl CatalogKind {
    /// Path segment of the backend endpoint serving this catalog.
    pub fn backend_path(&self) -> &'static str {
        match self {
            CatalogKind::Store => "tienda",
            CatalogKind::Used => "usados",
        }
    }

    pub fn search_fields(&self) -> &'static [SearchField] {
        match self {
            CatalogKind::Store => &[SearchField::Description, SearchField::Make, SearchField::Model],
            CatalogKind::Used => &[
                SearchField::Description,
                SearchField::Make,
                SearchField::Model,
                SearchField::SellerName,
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogKind::Store => "store",
            CatalogKind::Used => "used",
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Listing fields free-text search can match against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchField {
    Description,
    Make,
    Model,
    SellerName,
}

impl SearchField {
    pub fn value<'a>(&self, listing: &'a Listing) -> &'a str {
        match self {
            SearchField::Description => &listing.description,
            SearchField::Make => &listing.vehicle.make,
            SearchField::Model => &listing.vehicle.model,
            SearchField::SellerName => &listing.seller_name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FuelType {
    Nafta,
    Diesel,
    #[serde(rename = "GNC")]
    Gnc,
    #[serde(rename = "Híbrido")]
    Hybrid,
    #[serde(rename = "Eléctrico")]
    Electric,
}

impl FuelType {
    pub const ALL: [FuelType; 5] = [
        FuelType::Nafta,
        FuelType::Diesel,
        FuelType::Gnc,
        FuelType::Hybrid,
        FuelType::Electric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FuelType::Nafta => "Nafta",
            FuelType::Diesel => "Diesel",
            FuelType::Gnc => "GNC",
            FuelType::Hybrid => "Híbrido",
            FuelType::Electric => "Eléctrico",
        }
    }
}

impl FromStr for FuelType {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FuelType::ALL
            .into_iter()
            .find(|fuel| fuel.as_str() == s)
            .ok_or_else(|| UnknownValue::new("fuel type", s))
    }
}

impl fmt::Display for FuelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Transmission {
    Manual,
    #[serde(rename = "Automática")]
    Automatic,
}

impl Transmission {
    pub const ALL: [Transmission; 2] = [Transmission::Manual, Transmission::Automatic];

    pub fn as_str(&self) -> &'static str {
        match self {
            Transmission::Manual => "Manual",
            Transmission::Automatic => "Automática",
        }
    }
}

impl FromStr for Transmission {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Transmission::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownValue::new("transmission", s))
    }
}

impl fmt::Display for Transmission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
