use crate::catalog::{rental_categories, RentalCategory};
use tracing::{info, warn};

/// Look up a rental category by id and record the choice.
pub fn select_category(id: &str) -> Option<&'static RentalCategory> {
    let category = rental_categories()
        .iter()
        .find(|category| category.id == id);
    match category {
        Some(category) => info!(
            category = category.id,
            available = category.available,
            "rental category selected"
        ),
        None => warn!(category = id, "unknown rental category"),
    }
    category
}
