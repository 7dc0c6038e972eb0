//! Location search: zone suggestions, the fixed result set, and sorting.

mod service;

pub use service::SearchService;

use crate::catalog::{zones, Catalog, Property, Zone};
use crate::i18n::Translator;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    /// Fixture order.
    #[default]
    Newest,
    PriceLowToHigh,
    PriceHighToLow,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "newest" => Some(Self::Newest),
            "price_low_to_high" | "pricelowtohigh" | "asc" => Some(Self::PriceLowToHigh),
            "price_high_to_low" | "pricehightolow" | "desc" => Some(Self::PriceHighToLow),
            _ => None,
        }
    }

    pub const fn label_key(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::PriceLowToHigh => "priceLowToHigh",
            Self::PriceHighToLow => "priceHighToLow",
        }
    }
}

/// Zones whose name, city or district contains `term`, ignoring case.
///
/// A blank term lists every zone; `city` narrows the list to one city.
pub fn suggest_zones(term: &str, city: Option<&str>) -> Vec<Zone> {
    let needle = term.trim().to_lowercase();
    zones()
        .iter()
        .filter(|zone| city.map_or(true, |city| zone.city == city))
        .filter(|zone| needle.is_empty() || zone.matches(&needle))
        .copied()
        .collect()
}

pub fn cities() -> Vec<&'static str> {
    zones()
        .iter()
        .map(|zone| zone.city)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Stable sort by numeric price; `Newest` leaves the order untouched.
pub fn sort_properties(properties: &mut [Property], order: SortOrder) {
    match order {
        SortOrder::Newest => {}
        SortOrder::PriceLowToHigh => properties.sort_by_key(Property::price_amount),
        SortOrder::PriceHighToLow => {
            properties.sort_by(|a, b| b.price_amount().cmp(&a.price_amount()))
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub term: String,
    #[serde(default)]
    pub sort: SortOrder,
}

impl SearchQuery {
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            sort: SortOrder::default(),
        }
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn is_blank(&self) -> bool {
        self.term.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResults {
    pub location: String,
    pub sort: SortOrder,
    pub properties: Vec<Property>,
}

impl SearchResults {
    /// "Propriétés trouvées à Cocody".
    pub fn headline(&self, translator: Translator) -> String {
        format!("{} {}", translator.t("propertiesFound"), self.location)
    }

    /// Re-sort from fixture order so switching back to `Newest` restores it.
    pub fn resort(&mut self, catalog: &Catalog, sort: SortOrder) {
        self.properties = catalog.search_results(&self.location);
        sort_properties(&mut self.properties, sort);
        self.sort = sort;
    }
}

/// Label the fixed result set with the searched text. Blank input yields nothing.
pub fn run_search(catalog: &Catalog, query: &SearchQuery) -> Option<SearchResults> {
    if query.is_blank() {
        return None;
    }

    let mut properties = catalog.search_results(&query.term);
    sort_properties(&mut properties, query.sort);
    Some(SearchResults {
        location: query.term.clone(),
        sort: query.sort,
        properties,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    fn catalog() -> Catalog {
        Catalog::embedded().expect("fixtures parse")
    }

    fn titles(results: &SearchResults) -> Vec<&str> {
        results
            .properties
            .iter()
            .map(|property| property.title.as_str())
            .collect()
    }

    #[test]
    fn suggestions_match_name_city_and_district() {
        let by_name: Vec<_> = suggest_zones("coc", None).iter().map(|z| z.id).collect();
        assert_eq!(by_name, vec!["cocody", "riviera", "deuxplateau", "angre"]);

        let by_district: Vec<_> = suggest_zones("MARCORY", None).iter().map(|z| z.id).collect();
        assert_eq!(by_district, vec!["marcory", "zone4", "bietry"]);

        assert_eq!(suggest_zones("abidjan", None).len(), zones().len());
        assert!(suggest_zones("bouaké", None).is_empty());
    }

    #[test]
    fn blank_term_lists_every_zone_of_the_city() {
        assert_eq!(suggest_zones("  ", None).len(), zones().len());
        assert_eq!(suggest_zones("", Some("Abidjan")).len(), zones().len());
        assert!(suggest_zones("", Some("Yamoussoukro")).is_empty());
        assert_eq!(cities(), vec!["Abidjan"]);
    }

    #[test]
    fn picking_a_zone_fills_its_label() {
        let riviera = suggest_zones("riviera", None)[0];
        assert_eq!(riviera.label(), "Riviera, Cocody, Abidjan");
        let plateau = suggest_zones("plateau", None)[0];
        assert_eq!(plateau.label(), "Plateau, Abidjan");
    }

    #[test]
    fn blank_search_is_a_no_op() {
        let catalog = catalog();
        assert!(run_search(&catalog, &SearchQuery::new("")).is_none());
        assert!(run_search(&catalog, &SearchQuery::new(" \t ")).is_none());
    }

    #[test]
    fn results_are_not_filtered_by_location() {
        let results = run_search(&catalog(), &SearchQuery::new("Yopougon")).expect("results");
        assert_eq!(results.properties.len(), 8);
        assert!(results
            .properties
            .iter()
            .all(|property| property.location == "Yopougon"));
        assert_eq!(
            results.headline(Translator::new(Language::Fr)),
            "Propriétés trouvées à Yopougon"
        );
    }

    #[test]
    fn price_sorts_order_by_amount() {
        let catalog = catalog();
        let ascending = run_search(
            &catalog,
            &SearchQuery::new("Cocody").sorted(SortOrder::PriceLowToHigh),
        )
        .expect("results");
        assert_eq!(titles(&ascending)[0], "Studio Moderne");
        assert_eq!(titles(&ascending)[7], "Villa avec Piscine");

        let descending = run_search(
            &catalog,
            &SearchQuery::new("Cocody").sorted(SortOrder::PriceHighToLow),
        )
        .expect("results");
        let mut reversed = titles(&ascending);
        reversed.reverse();
        assert_eq!(titles(&descending), reversed);
    }

    #[test]
    fn equal_prices_keep_fixture_order() {
        let catalog = catalog();
        let mut properties = catalog.search_results("Plateau");
        for property in &mut properties {
            property.price = "100,000".to_string();
        }
        let before: Vec<_> = properties.iter().map(|p| p.title.clone()).collect();
        sort_properties(&mut properties, SortOrder::PriceHighToLow);
        let after: Vec<_> = properties.iter().map(|p| p.title.clone()).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn resort_back_to_newest_restores_fixture_order() {
        let catalog = catalog();
        let mut results = run_search(
            &catalog,
            &SearchQuery::new("Cocody").sorted(SortOrder::PriceHighToLow),
        )
        .expect("results");
        results.resort(&catalog, SortOrder::Newest);
        assert_eq!(titles(&results)[0], "Villa Moderne");
        assert_eq!(results.sort, SortOrder::Newest);
    }

    #[test]
    fn sort_order_parses_common_spellings() {
        assert_eq!(SortOrder::parse("price-low-to-high"), Some(SortOrder::PriceLowToHigh));
        assert_eq!(SortOrder::parse("priceHighToLow"), Some(SortOrder::PriceHighToLow));
        assert_eq!(SortOrder::parse("Newest"), Some(SortOrder::Newest));
        assert_eq!(SortOrder::parse("random"), None);
    }
}
