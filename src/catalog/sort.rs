use std::borrow::Borrow;
use std::cmp::Ordering;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::UnknownValue;
use crate::models::Listing;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    None,
    Asc,
    Desc,
}

impl SortOrder {
    /// Next order of the price toggle: none, ascending, descending, none again.
    pub fn next(self) -> Self {
        match self {
            SortOrder::None => SortOrder::Asc,
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::None,
        }
    }

    fn compare(self, a: f64, b: f64) -> Ordering {
        match self {
            SortOrder::None => Ordering::Equal,
            SortOrder::Asc => a.total_cmp(&b),
            SortOrder::Desc => b.total_cmp(&a),
        }
    }
}

impl FromStr for SortOrder {
    type Err = UnknownValue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "none" => Ok(SortOrder::None),
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(UnknownValue::new("sort order", s)),
        }
    }
}

/// Orders listings by price. The sort is stable: equal prices keep their
/// relative input order, and [`SortOrder::None`] leaves the slice untouched.
pub fn sort_by_price<L: Borrow<Listing>>(items: &mut [L], order: SortOrder) {
    if order == SortOrder::None {
        return;
    }
    items.sort_by(|a, b| order.compare(a.borrow().vehicle.price, b.borrow().vehicle.price));
}

// Same ordering over positions into `listings`
pub(crate) fn sort_positions_by_price(listings: &[Listing], positions: &mut [usize], order: SortOrder) {
    if order == SortOrder::None {
        return;
    }
    positions.sort_by(|&a, &b| order.compare(listings[a].vehicle.price, listings[b].vehicle.price));
}
