use crate::i18n::Translator;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Amount in CFA francs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Fcfa(pub u64);

impl Fcfa {
    /// Read an amount out of a display string by keeping only its digits.
    ///
    /// `"450,000"`, `"450 000 FCFA"` and `"450000"` all give 450 000; a string
    /// without digits gives zero.
    pub fn parse(raw: &str) -> Self {
        let amount = raw
            .chars()
            .filter_map(|ch| ch.to_digit(10))
            .fold(0u64, |acc, digit| {
                acc.saturating_mul(10).saturating_add(u64::from(digit))
            });
        Self(amount)
    }

    pub const fn amount(self) -> u64 {
        self.0
    }

    /// Share of the amount in basis points, rounded half up.
    pub const fn basis_points(self, bps: u64) -> Self {
        Self(self.0.saturating_mul(bps).saturating_add(5_000) / 10_000)
    }

    /// Digits grouped by thousands with a narrow no-break space, as fr-FR does.
    pub fn grouped(self) -> String {
        let digits = self.0.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 * 3);
        for (index, ch) in digits.chars().enumerate() {
            if index > 0 && (digits.len() - index) % 3 == 0 {
                out.push('\u{202f}');
            }
            out.push(ch);
        }
        out
    }

    pub fn display(self, translator: Translator) -> String {
        format!("{} {}", self.grouped(), translator.t("currency"))
    }
}

impl fmt::Display for Fcfa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} FCFA", self.grouped())
    }
}

/// What a property card knows about the notary managing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotaryRef {
    pub id: u32,
    pub name: String,
    pub title: String,
    pub image_url: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub title: String,
    /// Price as listed, e.g. `"450,000"`.
    pub price: String,
    pub location: String,
    pub beds: u8,
    pub baths: u8,
    pub size: String,
    pub image_url: String,
    pub video_url: String,
    pub available: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notary: Option<NotaryRef>,
}

impl Property {
    pub fn price_amount(&self) -> Fcfa {
        Fcfa::parse(&self.price)
    }

    pub fn formatted_price(&self, translator: Translator) -> String {
        self.price_amount().display(translator)
    }

    pub fn availability_label(&self) -> &'static str {
        if self.available {
            "Disponible"
        } else {
            "Indisponible"
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notary {
    pub id: u32,
    pub name: String,
    pub title: String,
    pub image_url: String,
    pub address: String,
    pub phone: String,
    pub email: String,
    pub experience: String,
    pub rating: f32,
    pub specialties: Vec<String>,
    pub properties: Vec<Property>,
}

impl Notary {
    pub fn reference(&self) -> NotaryRef {
        NotaryRef {
            id: self.id,
            name: self.name.clone(),
            title: self.title.clone(),
            image_url: self.image_url.clone(),
            email: self.email.clone(),
        }
    }

    /// "2 biens disponibles", "1 bien disponible", or nothing for an empty list.
    pub fn availability_label(&self) -> Option<String> {
        match self.properties.len() {
            0 => None,
            1 => Some("1 bien disponible".to_string()),
            count => Some(format!("{count} biens disponibles")),
        }
    }
}

/// Commune or neighbourhood offered as a search suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Zone {
    pub id: &'static str,
    pub name: &'static str,
    pub city: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub district: Option<&'static str>,
}

impl Zone {
    /// Text placed in the search box when the zone is picked.
    pub fn label(&self) -> String {
        match self.district {
            Some(district) => format!("{}, {}, {}", self.name, district, self.city),
            None => format!("{}, {}", self.name, self.city),
        }
    }

    pub(crate) fn matches(&self, needle_lowercase: &str) -> bool {
        self.name.to_lowercase().contains(needle_lowercase)
            || self.city.to_lowercase().contains(needle_lowercase)
            || self
                .district
                .is_some_and(|district| district.to_lowercase().contains(needle_lowercase))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PriceRange {
    pub min: Fcfa,
    pub max: Option<Fcfa>,
}

impl PriceRange {
    pub fn label(&self) -> String {
        match self.max {
            Some(max) => format!("{} - {} FCFA", self.min.grouped(), max.grouped()),
            None => format!("{}+ FCFA", self.min.grouped()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RentalCategory {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub available: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Language;

    #[test]
    fn parse_strips_every_non_digit() {
        assert_eq!(Fcfa::parse("450,000"), Fcfa(450_000));
        assert_eq!(Fcfa::parse("450\u{202f}000 FCFA"), Fcfa(450_000));
        assert_eq!(Fcfa::parse("Prix sur demande"), Fcfa(0));
        assert_eq!(Fcfa::parse(""), Fcfa(0));
    }

    #[test]
    fn parse_saturates_instead_of_overflowing() {
        assert_eq!(Fcfa::parse(&"9".repeat(40)), Fcfa(u64::MAX));
    }

    #[test]
    fn grouped_inserts_separators_every_three_digits() {
        assert_eq!(Fcfa(0).grouped(), "0");
        assert_eq!(Fcfa(999).grouped(), "999");
        assert_eq!(Fcfa(1_000).grouped(), "1\u{202f}000");
        assert_eq!(Fcfa(1_000_000).grouped(), "1\u{202f}000\u{202f}000");
        assert_eq!(Fcfa(45_000).to_string(), "45\u{202f}000 FCFA");
    }

    #[test]
    fn basis_points_round_half_up() {
        assert_eq!(Fcfa(450_000).basis_points(150), Fcfa(6_750));
        assert_eq!(Fcfa(50).basis_points(100), Fcfa(1));
        assert_eq!(Fcfa(49).basis_points(100), Fcfa(0));
    }

    #[test]
    fn formatted_price_uses_translated_currency() {
        let property = Property {
            title: "Studio Moderne".to_string(),
            price: "150,000".to_string(),
            location: "Plateau".to_string(),
            beds: 1,
            baths: 1,
            size: "45 m²".to_string(),
            image_url: String::new(),
            video_url: String::new(),
            available: false,
            notary: None,
        };
        assert_eq!(
            property.formatted_price(Translator::new(Language::En)),
            "150\u{202f}000 FCFA"
        );
        assert_eq!(property.availability_label(), "Indisponible");
    }

    #[test]
    fn price_range_labels() {
        let band = PriceRange {
            min: Fcfa(100_000),
            max: Some(Fcfa(200_000)),
        };
        assert_eq!(band.label(), "100\u{202f}000 - 200\u{202f}000 FCFA");

        let open = PriceRange {
            min: Fcfa(1_000_000),
            max: None,
        };
        assert_eq!(open.label(), "1\u{202f}000\u{202f}000+ FCFA");
    }
}
