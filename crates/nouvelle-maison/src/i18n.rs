//! Static English/French lookup table.
//!
//! Keys are the identifiers the pages use; a key with no entry translates to
//! itself so a missing string is visible rather than blank.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    #[default]
    Fr,
}

impl Language {
    pub const fn code(self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Fr => "fr",
        }
    }

    pub fn from_code(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "en" | "english" => Some(Self::En),
            "fr" | "french" | "francais" | "français" => Some(Self::Fr),
            _ => None,
        }
    }
}

struct Entry {
    key: &'static str,
    en: &'static str,
    fr: &'static str,
}

impl Entry {
    const fn text(&self, language: Language) -> &'static str {
        match language {
            Language::En => self.en,
            Language::Fr => self.fr,
        }
    }
}

const fn entry(key: &'static str, en: &'static str, fr: &'static str) -> Entry {
    Entry { key, en, fr }
}

const TRANSLATIONS: &[Entry] = &[
    entry("findDreamHome", "Find Your Dream Home", "Trouvez la Maison de vos Rêves"),
    entry("searchResults", "Search Results", "Résultats de Recherche"),
    entry("propertiesFound", "Properties found in", "Propriétés trouvées à"),
    entry("newest", "Newest First", "Plus Récent"),
    entry("priceLowToHigh", "Price: Low to High", "Prix: Croissant"),
    entry("priceHighToLow", "Price: High to Low", "Prix: Décroissant"),
    entry("backToSearch", "Back to Search", "Retour à la Recherche"),
    entry("rent", "Rent", "Louer"),
    entry("buy", "Buy", "Acheter"),
    entry("sell", "Sell", "Vendre"),
    entry("about", "About", "À Propos"),
    entry("notaries", "Notaries", "Notaires"),
    entry("signIn", "Sign In", "Se Connecter"),
    entry("signOut", "Sign Out", "Se déconnecter"),
    entry("createAccount", "Create Account", "Créer un Compte"),
    entry("fullName", "Full Name", "Nom Complet"),
    entry("email", "Email", "Email"),
    entry("password", "Password", "Mot de passe"),
    entry("enterFullName", "Enter your full name", "Entrez votre nom complet"),
    entry("enterEmail", "Enter your email", "Entrez votre email"),
    entry("enterPassword", "Enter your password", "Entrez votre mot de passe"),
    entry("forgotPassword", "Forgot Password?", "Mot de passe oublié ?"),
    entry("noAccount", "Don't have an account?", "Vous n'avez pas de compte ?"),
    entry("alreadyHaveAccount", "Already have an account?", "Vous avez déjà un compte ?"),
    entry("allCities", "All Cities", "Toutes les villes"),
    entry("priceRange", "Price Range", "Fourchette de prix"),
    entry("propertyType", "Property Type", "Type de bien"),
    entry("house", "House", "Maison"),
    entry("apartment", "Apartment", "Appartement"),
    entry("villa", "Villa", "Villa"),
    entry("studio", "Studio", "Studio"),
    entry("moreFilters", "More Filters", "Plus de filtres"),
    entry("searching", "Searching...", "Recherche en cours..."),
    entry("searchNow", "Search Now", "Rechercher maintenant"),
    entry("perMonth", "/month", "/mois"),
    entry("currency", "FCFA", "FCFA"),
];

/// Look up `key`, falling back to the key itself.
pub fn translate(language: Language, key: &str) -> &str {
    TRANSLATIONS
        .iter()
        .find(|entry| entry.key == key)
        .map(|entry| entry.text(language))
        .unwrap_or(key)
}

/// Every known key rendered in one language.
pub fn table(language: Language) -> BTreeMap<&'static str, &'static str> {
    TRANSLATIONS
        .iter()
        .map(|entry| (entry.key, entry.text(language)))
        .collect()
}

/// Language handle passed to anything that renders text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Translator {
    language: Language,
}

impl Translator {
    pub const fn new(language: Language) -> Self {
        Self { language }
    }

    pub const fn language(&self) -> Language {
        self.language
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        translate(self.language, key)
    }
}
