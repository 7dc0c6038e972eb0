use super::domain::{Fcfa, Notary, PriceRange, Property, RentalCategory, Zone};
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;

const SEARCH_RESULTS_CSV: &str = include_str!("../../fixtures/search_results.csv");
const NOTARIES_CSV: &str = include_str!("../../fixtures/notaries.csv");
const NOTARY_PROPERTIES_CSV: &str = include_str!("../../fixtures/notary_properties.csv");

#[derive(Debug, thiserror::Error)]
pub enum FixtureError {
    #[error("invalid fixture data: {0}")]
    Csv(#[from] csv::Error),
    #[error("property '{title}' references unknown notary {notary_id}")]
    UnknownNotary { notary_id: u32, title: String },
}

/// Read-only listing data shared by every visitor.
#[derive(Debug, Clone)]
pub struct Catalog {
    search_results: Vec<Property>,
    notaries: Vec<Notary>,
}

impl Catalog {
    /// Parse the fixtures compiled into the crate.
    pub fn embedded() -> Result<Self, FixtureError> {
        Self::from_readers(
            SEARCH_RESULTS_CSV.as_bytes(),
            NOTARIES_CSV.as_bytes(),
            NOTARY_PROPERTIES_CSV.as_bytes(),
        )
    }

    pub fn from_readers<S, N, P>(
        search_results: S,
        notaries: N,
        notary_properties: P,
    ) -> Result<Self, FixtureError>
    where
        S: Read,
        N: Read,
        P: Read,
    {
        let search_results = read_rows::<_, SearchResultRow>(search_results)?
            .into_iter()
            .map(SearchResultRow::into_property)
            .collect();

        let mut notaries: Vec<Notary> = read_rows::<_, NotaryRow>(notaries)?
            .into_iter()
            .map(NotaryRow::into_notary)
            .collect();

        let mut owned: BTreeMap<u32, Vec<Property>> = BTreeMap::new();
        for row in read_rows::<_, NotaryPropertyRow>(notary_properties)? {
            let notary = notaries
                .iter()
                .find(|notary| notary.id == row.notary_id)
                .ok_or_else(|| FixtureError::UnknownNotary {
                    notary_id: row.notary_id,
                    title: row.title.clone(),
                })?;
            let reference = notary.reference();
            owned
                .entry(row.notary_id)
                .or_default()
                .push(row.into_property(reference));
        }

        for notary in &mut notaries {
            if let Some(properties) = owned.remove(&notary.id) {
                notary.properties = properties;
            }
        }

        Ok(Self {
            search_results,
            notaries,
        })
    }

    /// The fixed result set, each entry relabelled with the searched location.
    pub fn search_results(&self, location: &str) -> Vec<Property> {
        self.search_results
            .iter()
            .cloned()
            .map(|mut property| {
                property.location = location.to_string();
                property
            })
            .collect()
    }

    pub fn notaries(&self) -> &[Notary] {
        &self.notaries
    }

    pub fn notary(&self, id: u32) -> Option<&Notary> {
        self.notaries.iter().find(|notary| notary.id == id)
    }
}

fn read_rows<R, T>(reader: R) -> Result<Vec<T>, csv::Error>
where
    R: Read,
    T: for<'de> Deserialize<'de>,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader)
        .deserialize::<T>()
        .collect()
}

#[derive(Debug, Deserialize)]
struct SearchResultRow {
    title: String,
    price: String,
    beds: u8,
    baths: u8,
    size: String,
    image_url: String,
    video_url: String,
    available: bool,
}

impl SearchResultRow {
    fn into_property(self) -> Property {
        Property {
            title: self.title,
            price: self.price,
            location: String::new(),
            beds: self.beds,
            baths: self.baths,
            size: self.size,
            image_url: self.image_url,
            video_url: self.video_url,
            available: self.available,
            notary: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NotaryRow {
    id: u32,
    name: String,
    title: String,
    image_url: String,
    address: String,
    phone: String,
    email: String,
    experience: String,
    rating: f32,
    #[serde(deserialize_with = "pipe_separated")]
    specialties: Vec<String>,
}

impl NotaryRow {
    fn into_notary(self) -> Notary {
        Notary {
            id: self.id,
            name: self.name,
            title: self.title,
            image_url: self.image_url,
            address: self.address,
            phone: self.phone,
            email: self.email,
            experience: self.experience,
            rating: self.rating,
            specialties: self.specialties,
            properties: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct NotaryPropertyRow {
    notary_id: u32,
    title: String,
    price: String,
    location: String,
    beds: u8,
    baths: u8,
    size: String,
    image_url: String,
    video_url: String,
    available: bool,
}

impl NotaryPropertyRow {
    fn into_property(self, notary: super::domain::NotaryRef) -> Property {
        Property {
            title: self.title,
            price: self.price,
            location: self.location,
            beds: self.beds,
            baths: self.baths,
            size: self.size,
            image_url: self.image_url,
            video_url: self.video_url,
            available: self.available,
            notary: Some(notary),
        }
    }
}

fn pipe_separated<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(raw
        .split('|')
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_string)
        .collect())
}

const ZONES: &[Zone] = &[
    zone("abobo", "Abobo", None),
    zone("adjame", "Adjamé", None),
    zone("attecoube", "Attécoubé", None),
    zone("cocody", "Cocody", None),
    zone("koumassi", "Koumassi", None),
    zone("marcory", "Marcory", None),
    zone("plateau", "Plateau", None),
    zone("portbouet", "Port-Bouët", None),
    zone("treichville", "Treichville", None),
    zone("yopougon", "Yopougon", None),
    zone("riviera", "Riviera", Some("Cocody")),
    zone("deuxplateau", "Deux Plateaux", Some("Cocody")),
    zone("angre", "Angré", Some("Cocody")),
    zone("zone4", "Zone 4", Some("Marcory")),
    zone("bietry", "Biétry", Some("Marcory")),
];

const fn zone(id: &'static str, name: &'static str, district: Option<&'static str>) -> Zone {
    Zone {
        id,
        name,
        city: "Abidjan",
        district,
    }
}

const PRICE_RANGES: &[PriceRange] = &[
    PriceRange {
        min: Fcfa(0),
        max: Some(Fcfa(100_000)),
    },
    PriceRange {
        min: Fcfa(100_000),
        max: Some(Fcfa(200_000)),
    },
    PriceRange {
        min: Fcfa(200_000),
        max: Some(Fcfa(500_000)),
    },
    PriceRange {
        min: Fcfa(500_000),
        max: Some(Fcfa(1_000_000)),
    },
    PriceRange {
        min: Fcfa(1_000_000),
        max: None,
    },
];

const RENTAL_CATEGORIES: &[RentalCategory] = &[
    RentalCategory {
        id: "apartment",
        name: "Appartements",
        description: "Studios, F2, F3, F4 et plus",
        available: 245,
    },
    RentalCategory {
        id: "house",
        name: "Maisons",
        description: "Maisons individuelles, jumelées",
        available: 183,
    },
    RentalCategory {
        id: "villa",
        name: "Villas",
        description: "Villas de luxe, résidences",
        available: 97,
    },
    RentalCategory {
        id: "warehouse",
        name: "Entrepôts",
        description: "Espaces de stockage, hangars",
        available: 42,
    },
    RentalCategory {
        id: "office",
        name: "Bureaux",
        description: "Espaces professionnels",
        available: 156,
    },
    RentalCategory {
        id: "commercial",
        name: "Commerces",
        description: "Boutiques, restaurants, locaux",
        available: 89,
    },
];

pub fn zones() -> &'static [Zone] {
    ZONES
}

pub fn price_ranges() -> &'static [PriceRange] {
    PRICE_RANGES
}

pub fn rental_categories() -> &'static [RentalCategory] {
    RENTAL_CATEGORIES
}
