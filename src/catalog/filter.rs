// Filter Engine: AND-combined predicates over the loaded listings

use std::collections::BTreeSet;

use serde::Serialize;

use super::{Bounds, FuelType, SearchField, SortOrder, Transmission};
use crate::models::Listing;

/// The user's current filter and sort criteria.
///
/// Transitions never mutate a state in place; every `with_*` / `toggle_*`
/// returns the next state, which is then run through the whole pipeline.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub search_text: String,
    pub price_min: f64,
    pub price_max: f64,
    pub year_min: i32,
    pub year_max: i32,
    pub mileage_max: u64,
    pub fuel_types: BTreeSet<FuelType>,
    pub transmissions: BTreeSet<Transmission>,
    pub door_counts: BTreeSet<u8>,
    pub sort_order: SortOrder,
}

fn toggled<T: Ord + Copy>(set: &BTreeSet<T>, member: T) -> BTreeSet<T> {
    let mut next = set.clone();
    if !next.remove(&member) {
        next.insert(member);
    }
    next
}

impl FilterState {
    /// The "clear filters" state: ranges at `bounds`, no selections, no search, no sort.
    pub fn cleared(bounds: &Bounds) -> Self {
        FilterState {
            search_text: String::new(),
            price_min: bounds.price_min,
            price_max: bounds.price_max,
            year_min: bounds.year_min,
            year_max: bounds.year_max,
            mileage_max: bounds.mileage_max,
            fuel_types: BTreeSet::new(),
            transmissions: BTreeSet::new(),
            door_counts: BTreeSet::new(),
            sort_order: SortOrder::None,
        }
    }

    pub fn with_search_text(self, text: impl Into<String>) -> Self {
        FilterState { search_text: text.into(), ..self }
    }

    pub fn with_price_range(self, min: f64, max: f64) -> Self {
        FilterState { price_min: min, price_max: max, ..self }
    }

    pub fn with_year_range(self, min: i32, max: i32) -> Self {
        FilterState { year_min: min, year_max: max, ..self }
    }

    pub fn with_mileage_max(self, max: u64) -> Self {
        FilterState { mileage_max: max, ..self }
    }

    pub fn with_sort_order(self, order: SortOrder) -> Self {
        FilterState { sort_order: order, ..self }
    }

    pub fn toggle_fuel_type(&self, fuel: FuelType) -> Self {
        FilterState { fuel_types: toggled(&self.fuel_types, fuel), ..self.clone() }
    }

    pub fn toggle_transmission(&self, transmission: Transmission) -> Self {
        FilterState { transmissions: toggled(&self.transmissions, transmission), ..self.clone() }
    }

    pub fn toggle_door_count(&self, doors: u8) -> Self {
        FilterState { door_counts: toggled(&self.door_counts, doors), ..self.clone() }
    }

    /// Whether `listing` passes every active predicate.
    pub fn matches(&self, listing: &Listing, search_fields: &[SearchField]) -> bool {
        self.matches_search(listing, search_fields)
            && self.within_price(listing)
            && self.within_year(listing)
            && self.within_mileage(listing)
            && self.matches_fuel_type(listing)
            && self.matches_transmission(listing)
            && self.matches_door_count(listing)
    }

    fn matches_search(&self, listing: &Listing, search_fields: &[SearchField]) -> bool {
        if self.search_text.is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        search_fields
            .iter()
            .any(|field| field.value(listing).to_lowercase().contains(&needle))
    }

    fn within_price(&self, listing: &Listing) -> bool {
        let price = listing.vehicle.price;
        price >= self.price_min && price <= self.price_max
    }

    fn within_year(&self, listing: &Listing) -> bool {
        (self.year_min..=self.year_max).contains(&listing.vehicle.year)
    }

    // Unreadable mileage counts as 0 and is never excluded here
    fn within_mileage(&self, listing: &Listing) -> bool {
        listing.vehicle.mileage_km() <= self.mileage_max
    }

    fn matches_fuel_type(&self, listing: &Listing) -> bool {
        if self.fuel_types.is_empty() {
            return true;
        }
        listing
            .vehicle
            .technical_sheet
            .as_ref()
            .and_then(|sheet| sheet.fuel_type.parse::<FuelType>().ok())
            .is_some_and(|fuel| self.fuel_types.contains(&fuel))
    }

    fn matches_transmission(&self, listing: &Listing) -> bool {
        if self.transmissions.is_empty() {
            return true;
        }
        listing
            .vehicle
            .technical_sheet
            .as_ref()
            .and_then(|sheet| sheet.transmission.parse::<Transmission>().ok())
            .is_some_and(|t| self.transmissions.contains(&t))
    }

    fn matches_door_count(&self, listing: &Listing) -> bool {
        if self.door_counts.is_empty() {
            return true;
        }
        listing
            .vehicle
            .technical_sheet
            .as_ref()
            .and_then(|sheet| sheet.door_count())
            .is_some_and(|doors| self.door_counts.contains(&doors))
    }
}

/// Listings passing `state`, in load order.
pub fn apply_filters<'a>(
    listings: &'a [Listing],
    state: &FilterState,
    search_fields: &[SearchField],
) -> Vec<&'a Listing> {
    listings
        .iter()
        .filter(|listing| state.matches(listing, search_fields))
        .collect()
}

pub(crate) fn matching_positions(
    listings: &[Listing],
    state: &FilterState,
    search_fields: &[SearchField],
) -> Vec<usize> {
    listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| state.matches(listing, search_fields))
        .map(|(pos, _)| pos)
        .collect()
}
