//! Static listing data: search results, notaries, zones, price bands, rental
//! categories and subscription tiers.

pub mod domain;
mod fixtures;
pub mod subscription;

pub use domain::{Fcfa, Notary, NotaryRef, PriceRange, Property, RentalCategory, Zone};
pub use fixtures::{price_ranges, rental_categories, zones, Catalog, FixtureError};
pub use subscription::{subscription_tiers, SubscriptionTier};
