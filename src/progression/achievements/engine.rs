//! Achievement evaluation and claiming

use chrono::{DateTime, Utc};
use tracing::info;

use super::conditions::EvalContext;
use super::definitions::{AchievementDefinition, CATALOG};
use super::ledger::ProgressionLedger;
use super::snapshot::CollectionStats;
use crate::domain::CarRecord;
use crate::progression::ProgressionError;

/// Source of timestamps for unlock/claim stamps and date-relative conditions
pub trait Clock {
    fn now(&self) -> DateTime<Utc>;
}

impl<F: Fn() -> DateTime<Utc>> Clock for F {
    fn now(&self) -> DateTime<Utc> {
        self()
    }
}

/// Result of a successful claim
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub key: &'static str,
    /// Coins credited to the ledger by this claim
    pub coins: u64,
    /// XP for the caller to apply to leveling; not credited here
    pub xp: u64,
    /// Ledger balance after the claim
    pub total_coins: u64,
}

/// Evaluates a catalog against a ledger. Holds no per-user state, so one
/// engine can serve any number of ledgers.
pub struct AchievementEngine<K = fn() -> DateTime<Utc>> {
    catalog: &'static [AchievementDefinition],
    clock: K,
}

impl AchievementEngine {
    /// Engine over the built-in catalog using the system clock
    pub fn new() -> Self {
        Self {
            catalog: CATALOG,
            clock: Utc::now,
        }
    }
}

impl Default for AchievementEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clock> AchievementEngine<K> {
    pub fn with_clock(catalog: &'static [AchievementDefinition], clock: K) -> Self {
        Self { catalog, clock }
    }

    pub fn catalog(&self) -> &'static [AchievementDefinition] {
        self.catalog
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    pub fn definition(&self, key: &str) -> Result<&'static AchievementDefinition, ProgressionError> {
        self.catalog
            .iter()
            .find(|a| a.key == key)
            .ok_or_else(|| ProgressionError::UnknownAchievementKey(key.to_string()))
    }

    /// Unlock every locked achievement whose condition now holds.
    /// Returns only the achievements unlocked by this call.
    pub fn evaluate(
        &self,
        ledger: &mut ProgressionLedger,
        collection: &[CarRecord],
        level: u32,
        total_points: u64,
    ) -> Vec<&'static AchievementDefinition> {
        let stats = CollectionStats::from_records(collection);
        self.evaluate_stats(ledger, &stats, level, total_points)
    }

    /// `evaluate` over precomputed collection aggregates
    pub fn evaluate_stats(
        &self,
        ledger: &mut ProgressionLedger,
        stats: &CollectionStats,
        level: u32,
        total_points: u64,
    ) -> Vec<&'static AchievementDefinition> {
        let now = self.clock.now();
        let ctx = EvalContext {
            stats,
            level,
            total_points,
            today: now.date_naive(),
        };

        let mut newly_unlocked = Vec::new();
        for achievement in self.catalog {
            if ledger.state(achievement.key).is_unlocked() {
                continue;
            }
            if achievement.condition.is_met(&ctx) && ledger.mark_unlocked(achievement.key, now) {
                info!(key = achievement.key, title = achievement.title, "Achievement unlocked");
                newly_unlocked.push(achievement);
            }
        }
        newly_unlocked
    }

    /// Claim an unlocked achievement, crediting its coins exactly once
    pub fn claim(
        &self,
        ledger: &mut ProgressionLedger,
        key: &str,
    ) -> Result<ClaimReceipt, ProgressionError> {
        let achievement = self.definition(key)?;

        ledger
            .mark_claimed(achievement.key, self.clock.now(), achievement.coin_reward)
            .map_err(|state| ProgressionError::InvalidClaim {
                key: key.to_string(),
                state: state.label(),
            })?;

        info!(
            key = achievement.key,
            coins = achievement.coin_reward,
            balance = ledger.coins(),
            "Achievement claimed"
        );

        Ok(ClaimReceipt {
            key: achievement.key,
            coins: achievement.coin_reward,
            xp: achievement.xp_reward,
            total_coins: ledger.coins(),
        })
    }
}
