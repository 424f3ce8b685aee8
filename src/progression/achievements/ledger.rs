//! Per-user achievement state and coin balance

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of one achievement: Locked -> Unlocked -> Claimed, never backwards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum AchievementState {
    #[default]
    Locked,
    Unlocked {
        unlocked_at: DateTime<Utc>,
    },
    Claimed {
        unlocked_at: DateTime<Utc>,
        claimed_at: DateTime<Utc>,
    },
}

impl AchievementState {
    /// Unlocked or claimed
    pub fn is_unlocked(&self) -> bool {
        !matches!(self, Self::Locked)
    }

    pub fn is_claimed(&self) -> bool {
        matches!(self, Self::Claimed { .. })
    }

    /// Unlocked and waiting to be claimed
    pub fn is_claimable(&self) -> bool {
        matches!(self, Self::Unlocked { .. })
    }

    pub fn unlocked_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Locked => None,
            Self::Unlocked { unlocked_at } | Self::Claimed { unlocked_at, .. } => Some(*unlocked_at),
        }
    }

    pub fn claimed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Self::Claimed { claimed_at, .. } => Some(*claimed_at),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Locked => "locked",
            Self::Unlocked { .. } => "unlocked",
            Self::Claimed { .. } => "claimed",
        }
    }
}

/// Coin balance plus unlock/claim state for every achievement a user has touched.
///
/// Keys absent from the map are Locked. Only the achievement engine moves
/// states forward; the orchestrator banks claimed XP.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProgressionLedger {
    coins: u64,
    bonus_xp: u64,
    achievements: BTreeMap<String, AchievementState>,
}

impl ProgressionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a ledger from persisted parts
    pub fn from_parts(
        coins: u64,
        bonus_xp: u64,
        achievements: impl IntoIterator<Item = (String, AchievementState)>,
    ) -> Self {
        Self {
            coins,
            bonus_xp,
            achievements: achievements
                .into_iter()
                .filter(|(_, state)| state.is_unlocked())
                .collect(),
        }
    }

    pub fn coins(&self) -> u64 {
        self.coins
    }

    /// XP from claimed achievements, counted toward leveling
    pub fn bonus_xp(&self) -> u64 {
        self.bonus_xp
    }

    pub fn state(&self, key: &str) -> AchievementState {
        self.achievements.get(key).copied().unwrap_or_default()
    }

    /// Every non-locked achievement, in key order
    pub fn states(&self) -> impl Iterator<Item = (&str, AchievementState)> {
        self.achievements.iter().map(|(k, s)| (k.as_str(), *s))
    }

    /// Keys of unlocked achievements, claimed ones included
    pub fn unlocked_keys(&self) -> BTreeSet<&str> {
        self.states()
            .filter(|(_, s)| s.is_unlocked())
            .map(|(k, _)| k)
            .collect()
    }

    pub fn claimed_keys(&self) -> BTreeSet<&str> {
        self.states()
            .filter(|(_, s)| s.is_claimed())
            .map(|(k, _)| k)
            .collect()
    }

    pub fn unlocked_count(&self) -> usize {
        self.achievements.values().filter(|s| s.is_unlocked()).count()
    }

    /// Anything unlocked but not yet claimed (drives the rewards badge)
    pub fn has_unclaimed(&self) -> bool {
        self.achievements.values().any(AchievementState::is_claimable)
    }

    /// Locked -> Unlocked. Returns false if already unlocked or claimed.
    pub(crate) fn mark_unlocked(&mut self, key: &str, at: DateTime<Utc>) -> bool {
        if self.state(key).is_unlocked() {
            return false;
        }
        self.achievements
            .insert(key.to_string(), AchievementState::Unlocked { unlocked_at: at });
        true
    }

    /// Unlocked -> Claimed, crediting `coins`. On any other state returns it unchanged.
    pub(crate) fn mark_claimed(
        &mut self,
        key: &str,
        at: DateTime<Utc>,
        coins: u64,
    ) -> Result<(), AchievementState> {
        match self.state(key) {
            AchievementState::Unlocked { unlocked_at } => {
                self.achievements.insert(
                    key.to_string(),
                    AchievementState::Claimed {
                        unlocked_at,
                        claimed_at: at,
                    },
                );
                self.coins = self.coins.saturating_add(coins);
                Ok(())
            }
            other => Err(other),
        }
    }

    pub(crate) fn add_bonus_xp(&mut self, xp: u64) {
        self.bonus_xp = self.bonus_xp.saturating_add(xp);
    }
}
