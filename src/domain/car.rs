use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RarityTier;

/// Maximum length of a car note, in characters
pub const MAX_NOTE_CHARS: usize = 250;

/// Identity of a car record.
///
/// Records are created in memory before the store has acknowledged them, so
/// the id starts out as a local sequence number and is replaced by the
/// store-assigned id once persistence succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CarId {
    /// Not yet persisted; local sequence number
    Pending(u64),
    /// Assigned by the persistence store
    Stored(String),
}

impl CarId {
    pub fn stored(&self) -> Option<&str> {
        match self {
            Self::Stored(id) => Some(id),
            Self::Pending(_) => None,
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Pending(_))
    }
}

impl std::fmt::Display for CarId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending(seq) => write!(f, "pending-{}", seq),
            Self::Stored(id) => write!(f, "{}", id),
        }
    }
}

/// A photographed car in the collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarRecord {
    pub id: CarId,

    /// Display name as returned by recognition, e.g. "2017-2022 Lamborghini Aventador S Roadster"
    pub name: String,

    pub rarity: RarityTier,

    /// Points stamped at classification time. Never recomputed from `rarity`.
    pub points: u64,

    pub captured_at: DateTime<Utc>,

    #[serde(default)]
    pub note: Option<String>,

    #[serde(default)]
    pub favorite: bool,

    /// Reference to the external image asset (deleted with the record)
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl CarRecord {
    /// True when the note has at least one character
    pub fn has_note(&self) -> bool {
        self.note.as_deref().is_some_and(|n| !n.is_empty())
    }
}
