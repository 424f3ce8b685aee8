use serde::{Deserialize, Serialize};

/// Rarity tier assigned to a car at classification time.
///
/// Ordered from least to most rare, so `Ord` comparisons read naturally
/// (`tier >= RarityTier::Rare` means "Rare or rarer").
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum RarityTier {
    Common,
    Uncommon,
    Rare,
    Exotic,
    Legendary,
}

impl RarityTier {
    /// All tiers, least rare first
    pub const ALL: [RarityTier; 5] = [
        RarityTier::Common,
        RarityTier::Uncommon,
        RarityTier::Rare,
        RarityTier::Exotic,
        RarityTier::Legendary,
    ];

    /// Points awarded for a car of this tier
    pub const fn points(self) -> u64 {
        match self {
            Self::Common => 10,
            Self::Uncommon => 25,
            Self::Rare => 50,
            Self::Exotic => 100,
            Self::Legendary => 250,
        }
    }

    /// Canonical label, also the storage and semantic-classifier spelling
    pub const fn label(self) -> &'static str {
        match self {
            Self::Common => "Common",
            Self::Uncommon => "Uncommon",
            Self::Rare => "Rare",
            Self::Exotic => "Exotic",
            Self::Legendary => "Legendary",
        }
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Common => "Everyday cars you see on every street",
            Self::Uncommon => "Premium and enthusiast cars",
            Self::Rare => "High-performance and luxury cars",
            Self::Exotic => "Supercars and ultra-luxury marques",
            Self::Legendary => "Hypercars and collector icons",
        }
    }

    /// Position in `ALL`, used for per-tier count arrays
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Parse a tier label. Case-sensitive: "rare" is not a tier.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Common" => Some(Self::Common),
            "Uncommon" => Some(Self::Uncommon),
            "Rare" => Some(Self::Rare),
            "Exotic" => Some(Self::Exotic),
            "Legendary" => Some(Self::Legendary),
            _ => None,
        }
    }
}

impl std::fmt::Display for RarityTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
