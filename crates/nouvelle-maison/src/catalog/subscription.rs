use super::domain::Fcfa;
use serde::Serialize;

/// Paid visibility plan for a listing, priced as a share of the asking price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionTier {
    pub name: &'static str,
    pub price: Fcfa,
    pub features: &'static [&'static str],
}

struct TierDefinition {
    name: &'static str,
    basis_points: u64,
    features: &'static [&'static str],
}

const TIERS: &[TierDefinition] = &[
    TierDefinition {
        name: "Basic",
        basis_points: 100,
        features: &[
            "Voir les détails des biens",
            "Filtres de recherche basiques",
            "Enregistrer vos favoris",
            "Support par email",
        ],
    },
    TierDefinition {
        name: "Premium",
        basis_points: 150,
        features: &[
            "Tous les avantages Basic",
            "Visites virtuelles",
            "Planification prioritaire des visites",
            "Contact direct avec les propriétaires",
            "Support téléphonique 24/7",
        ],
    },
    TierDefinition {
        name: "Elite",
        basis_points: 200,
        features: &[
            "Tous les avantages Premium",
            "Conseiller immobilier personnel",
            "Révision des documents juridiques",
            "Assistance au déménagement",
            "Accès exclusif aux biens",
            "Service de conciergerie",
        ],
    },
];

/// Basic, Premium and Elite at 1 %, 1.5 % and 2 % of `base`, rounded half up.
pub fn subscription_tiers(base: Fcfa) -> Vec<SubscriptionTier> {
    TIERS
        .iter()
        .map(|tier| SubscriptionTier {
            name: tier.name,
            price: base.basis_points(tier.basis_points),
            features: tier.features,
        })
        .collect()
}
