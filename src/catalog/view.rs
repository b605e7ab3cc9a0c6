// A loaded catalog and its current filter state.
// Every transition replaces the state and reruns filter + sort over the whole store.

use serde::Serialize;

use super::filter::matching_positions;
use super::sort::sort_positions_by_price;
use super::{Bounds, CatalogKind, FilterState, FuelType, SortOrder, Transmission};
use crate::models::Listing;

pub const UNAVAILABLE_NOTICE: &str = "The catalog is unavailable. Please try again later.";

#[derive(Debug, Clone)]
pub struct CatalogView {
    kind: CatalogKind,
    available: bool,
    listings: Vec<Listing>,
    bounds: Bounds,
    filters: FilterState,
    // Positions into `listings`, in display order
    displayed: Vec<usize>,
}

/// Serializable picture of what a catalog page currently shows.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSnapshot {
    pub catalog: CatalogKind,
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<String>,
    pub total: usize,
    pub listings: Vec<Listing>,
    pub bounds: Bounds,
    pub filters: FilterState,
}

impl CatalogView {
    /// Fills the store with a fetched listing set and resets filters to its bounds.
    pub fn load(kind: CatalogKind, listings: Vec<Listing>, current_year: i32) -> Self {
        let bounds = Bounds::from_listings(&listings, current_year);
        let mut view = CatalogView {
            kind,
            available: true,
            listings,
            bounds,
            filters: FilterState::cleared(&bounds),
            displayed: Vec::new(),
        };
        view.recompute();
        view
    }

    /// A catalog whose fetch failed: nothing to filter, nothing displayed.
    pub fn unavailable(kind: CatalogKind, current_year: i32) -> Self {
        let bounds = Bounds::platform_defaults(current_year);
        CatalogView {
            kind,
            available: false,
            listings: Vec::new(),
            bounds,
            filters: FilterState::cleared(&bounds),
            displayed: Vec::new(),
        }
    }

    pub fn kind(&self) -> CatalogKind {
        self.kind
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn listings(&self) -> &[Listing] {
        &self.listings
    }

    pub fn displayed(&self) -> Vec<&Listing> {
        self.displayed.iter().map(|&pos| &self.listings[pos]).collect()
    }

    pub fn replace_filters(&mut self, filters: FilterState) {
        self.filters = filters;
        self.recompute();
    }

    pub fn set_search_text(&mut self, text: &str) {
        self.replace_filters(self.filters.clone().with_search_text(text));
    }

    pub fn toggle_fuel_type(&mut self, fuel: FuelType) {
        self.replace_filters(self.filters.toggle_fuel_type(fuel));
    }

    pub fn toggle_transmission(&mut self, transmission: Transmission) {
        self.replace_filters(self.filters.toggle_transmission(transmission));
    }

    pub fn toggle_door_count(&mut self, doors: u8) {
        self.replace_filters(self.filters.toggle_door_count(doors));
    }

    pub fn set_sort_order(&mut self, order: SortOrder) {
        self.replace_filters(self.filters.clone().with_sort_order(order));
    }

    pub fn cycle_sort_order(&mut self) {
        let next = self.filters.sort_order.next();
        self.set_sort_order(next);
    }

    pub fn clear_filters(&mut self) {
        self.replace_filters(FilterState::cleared(&self.bounds));
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        let listings: Vec<Listing> = self.displayed().into_iter().cloned().collect();
        CatalogSnapshot {
            catalog: self.kind,
            available: self.available,
            notice: (!self.available).then(|| UNAVAILABLE_NOTICE.to_string()),
            total: listings.len(),
            listings,
            bounds: self.bounds,
            filters: self.filters.clone(),
        }
    }

    fn recompute(&mut self) {
        let mut positions = matching_positions(&self.listings, &self.filters, self.kind.search_fields());
        sort_positions_by_price(&self.listings, &mut positions, self.filters.sort_order);
        tracing::debug!(
            catalog = %self.kind,
            loaded = self.listings.len(),
            displayed = positions.len(),
            "Catalog filters applied"
        );
        self.displayed = positions;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TechnicalSheet, Vehicle};

    fn listing(id: i64, price: f64, fuel: &str) -> Listing {
        Listing {
            id,
            description: String::new(),
            vehicle: Vehicle {
                make: "Fiat".into(),
                model: format!("Modelo {id}"),
                price,
                year: 2019,
                mileage: "30000".into(),
                technical_sheet: Some(TechnicalSheet { fuel_type: fuel.into(), ..TechnicalSheet::default() }),
                ..Vehicle::default()
            },
            status: None,
            seller_email: String::new(),
            seller_name: String::new(),
            seller_phone: String::new(),
        }
    }

    fn displayed_ids(view: &CatalogView) -> Vec<i64> {
        view.displayed().iter().map(|l| l.id).collect()
    }

    #[test]
    fn load_shows_everything_within_bounds() {
        let view = CatalogView::load(
            CatalogKind::Store,
            vec![listing(1, 10_000.0, "Nafta"), listing(2, 25_000.0, "Diesel")],
            2026,
        );
        assert!(view.is_available());
        assert_eq!(view.bounds().price_max, 25_000.0);
        assert_eq!(displayed_ids(&view), vec![1, 2]);
    }

    #[test]
    fn toggles_recompute_immediately() {
        let mut view = CatalogView::load(
            CatalogKind::Used,
            vec![listing(1, 10_000.0, "Nafta"), listing(2, 25_000.0, "Diesel"), listing(3, 15_000.0, "Diesel")],
            2026,
        );
        view.toggle_fuel_type(FuelType::Diesel);
        assert_eq!(displayed_ids(&view), vec![2, 3]);

        view.cycle_sort_order();
        assert_eq!(view.filters().sort_order, SortOrder::Asc);
        assert_eq!(displayed_ids(&view), vec![3, 2]);

        view.toggle_fuel_type(FuelType::Diesel);
        assert_eq!(displayed_ids(&view), vec![1, 3, 2]);
    }

    #[test]
    fn clear_filters_restores_bounds_defaults() {
        let mut view = CatalogView::load(CatalogKind::Store, vec![listing(1, 10_000.0, "Nafta")], 2026);
        view.set_search_text("nothing matches this");
        view.toggle_door_count(2);
        view.set_sort_order(SortOrder::Desc);
        assert!(view.displayed().is_empty());

        view.clear_filters();
        assert_eq!(view.filters(), &FilterState::cleared(view.bounds()));
        assert_eq!(displayed_ids(&view), vec![1]);
    }

    #[test]
    fn unavailable_catalog_displays_nothing() {
        let mut view = CatalogView::unavailable(CatalogKind::Used, 2026);
        view.toggle_fuel_type(FuelType::Nafta);
        let snapshot = view.snapshot();
        assert!(!snapshot.available);
        assert_eq!(snapshot.notice.as_deref(), Some(UNAVAILABLE_NOTICE));
        assert_eq!(snapshot.total, 0);
        assert_eq!(snapshot.bounds, Bounds::platform_defaults(2026));
    }
}
