//! Typed unlock conditions
//!
//! One variant per kind of predicate, each carrying its own thresholds.
//! Every catalog entry names exactly one condition.

use chrono::NaiveDate;

use super::groups::CarGroup;
use super::snapshot::CollectionStats;
use crate::domain::RarityTier;

/// Inputs a condition is evaluated against
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub stats: &'a CollectionStats,
    pub level: u32,
    pub total_points: u64,
    pub today: NaiveDate,
}

/// Unlock condition for an achievement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    // === COLLECTION ===
    CarCount(u64),
    FavoriteCount(u64),
    NotedCount(u64),

    // === DEDICATION ===
    /// Captures on N consecutive days
    CaptureDayStreak(u64),
    CapturesInOneDay(u64),

    // === RARITY ===
    TierCount(RarityTier, u64),
    TierOrRarerCount(RarityTier, u64),
    /// At least one car of every tier
    AllTiers,
    EveryTierCount(u64),
    /// `tier`-or-rarer cars make up at least `percent` of the collection
    TierOrRarerShare { tier: RarityTier, percent: u64 },
    /// `tier` cars are under `percent` of a collection of at least `min_cars`
    TierShareBelow { tier: RarityTier, percent: u64, min_cars: u64 },
    /// No `tier` cars in a collection of at least `min_cars`
    NoneOfTier { tier: RarityTier, min_cars: u64 },
    /// `count` cars of `tier` among the first `within` captures
    TierWithinFirst { tier: RarityTier, count: u64, within: u64 },
    RarityPyramid,
    /// `run` consecutive captures at `tier` or rarer
    TierOrRarerRun { tier: RarityTier, run: u64 },
    /// A `tier` capture on `days` consecutive days
    TierDayStreak { tier: RarityTier, days: u64 },
    AllTiersInOneDay,
    /// N Rare-or-rarer captures after the N-th Common capture
    UpgradesAfterCommons(u64),

    // === POINTS ===
    TotalPoints(u64),
    PointsInOneDay(u64),
    PointsInWindow { days: u32, points: u64 },
    AveragePoints(u64),
    SingleCarPoints(u64),
    /// At least `points` on each of `days` consecutive days
    DailyPointsStreak { points: u64, days: u64 },
    /// Points earned in one day reach `multiplier` x current level
    LevelMultipleInOneDay(u64),
    /// `points` total with fewer than `max_cars` cars
    PointsWithFewCars { points: u64, max_cars: u64 },

    // === LEVEL ===
    Level(u32),
    /// `level` reached within `days` days of the first capture
    LevelWithinDays { level: u32, days: u32 },
    LevelUpsInOneDay(u32),
    /// Level-ups on `days` consecutive days; `exactly_one` demands one per day
    LevelUpDayStreak { days: u64, exactly_one: bool },
    /// At or above `level` for at least `days` days
    LevelHeld { level: u32, days: u32 },

    // === SPECIFIC ===
    GroupCount(CarGroup, u64),
    /// Cars at least 20 model years older than their capture
    ClassicCount(u64),
    SingleBrandCount(u64),
}

impl Condition {
    /// The numeric requirement shown with the achievement
    pub fn threshold(&self) -> u64 {
        match *self {
            Self::CarCount(n)
            | Self::FavoriteCount(n)
            | Self::NotedCount(n)
            | Self::CaptureDayStreak(n)
            | Self::CapturesInOneDay(n)
            | Self::TierCount(_, n)
            | Self::TierOrRarerCount(_, n)
            | Self::EveryTierCount(n)
            | Self::UpgradesAfterCommons(n)
            | Self::TotalPoints(n)
            | Self::PointsInOneDay(n)
            | Self::AveragePoints(n)
            | Self::SingleCarPoints(n)
            | Self::LevelMultipleInOneDay(n)
            | Self::GroupCount(_, n)
            | Self::ClassicCount(n)
            | Self::SingleBrandCount(n) => n,
            Self::AllTiers | Self::AllTiersInOneDay => RarityTier::ALL.len() as u64,
            Self::RarityPyramid => 1,
            Self::TierOrRarerShare { percent, .. } | Self::TierShareBelow { percent, .. } => percent,
            Self::NoneOfTier { min_cars, .. } => min_cars,
            Self::TierWithinFirst { count, .. } => count,
            Self::TierOrRarerRun { run, .. } => run,
            Self::TierDayStreak { days, .. }
            | Self::DailyPointsStreak { days, .. }
            | Self::LevelUpDayStreak { days, .. } => days,
            Self::PointsInWindow { points, .. } | Self::PointsWithFewCars { points, .. } => points,
            Self::Level(level)
            | Self::LevelWithinDays { level, .. }
            | Self::LevelUpsInOneDay(level) => u64::from(level),
            Self::LevelHeld { days, .. } => u64::from(days),
        }
    }

    pub fn is_met(&self, ctx: &EvalContext<'_>) -> bool {
        let stats = ctx.stats;
        match *self {
            Self::CarCount(n) => stats.total >= n,
            Self::FavoriteCount(n) => stats.favorites >= n,
            Self::NotedCount(n) => stats.noted >= n,

            Self::CaptureDayStreak(n) => stats.longest_day_run(|d| d.captures > 0) >= n,
            Self::CapturesInOneDay(n) => stats.max_captures_in_day() >= n,

            Self::TierCount(tier, n) => stats.tier_count(tier) >= n,
            Self::TierOrRarerCount(tier, n) => stats.tier_or_rarer(tier) >= n,
            Self::AllTiers => stats.per_tier.iter().all(|&c| c > 0),
            Self::EveryTierCount(n) => stats.per_tier.iter().all(|&c| c >= n),
            Self::TierOrRarerShare { tier, percent } => {
                stats.total > 0 && stats.tier_or_rarer(tier) * 100 >= percent * stats.total
            }
            Self::TierShareBelow { tier, percent, min_cars } => {
                stats.total > 0
                    && stats.total >= min_cars
                    && stats.tier_count(tier) * 100 < percent * stats.total
            }
            Self::NoneOfTier { tier, min_cars } => {
                stats.total > 0 && stats.total >= min_cars && stats.tier_count(tier) == 0
            }
            Self::TierWithinFirst { tier, count, within } => {
                stats.tier_in_first(tier, within) >= count
            }
            Self::RarityPyramid => stats.is_rarity_pyramid(),
            Self::TierOrRarerRun { tier, run } => stats.longest_capture_run(tier) >= run,
            Self::TierDayStreak { tier, days } => {
                stats.longest_day_run(|d| d.tiers[tier.index()]) >= days
            }
            Self::AllTiersInOneDay => stats.any_day_with_all_tiers(),
            Self::UpgradesAfterCommons(n) => stats.upgrades_after_commons(n) >= n,

            Self::TotalPoints(n) => ctx.total_points >= n,
            Self::PointsInOneDay(n) => stats.max_points_in_day() >= n,
            Self::PointsInWindow { days, points } => stats.max_points_in_window(days) >= points,
            Self::AveragePoints(n) => {
                stats.total > 0 && stats.collection_points >= n * stats.total
            }
            Self::SingleCarPoints(n) => stats.best_single >= n,
            Self::DailyPointsStreak { points, days } => {
                stats.longest_day_run(|d| d.points >= points) >= days
            }
            Self::LevelMultipleInOneDay(multiplier) => {
                stats.max_points_in_day() >= multiplier * u64::from(ctx.level)
            }
            Self::PointsWithFewCars { points, max_cars } => {
                ctx.total_points >= points && stats.total < max_cars
            }

            Self::Level(level) => ctx.level >= level,
            Self::LevelWithinDays { level, days } => {
                match (stats.first_capture_day(), stats.level_reached_on(level)) {
                    (Some(first), Some(reached)) => (reached - first).num_days() < i64::from(days),
                    _ => false,
                }
            }
            Self::LevelUpsInOneDay(n) => stats.max_level_ups_in_day() >= n,
            Self::LevelUpDayStreak { days, exactly_one } => {
                let run = if exactly_one {
                    stats.longest_day_run(|d| d.level_ups == 1)
                } else {
                    stats.longest_day_run(|d| d.level_ups > 0)
                };
                run >= days
            }
            Self::LevelHeld { level, days } => {
                ctx.level >= level
                    && stats
                        .level_reached_on(level)
                        .is_some_and(|reached| (ctx.today - reached).num_days() >= i64::from(days))
            }

            Self::GroupCount(group, n) => stats.group_count(group) >= n,
            Self::ClassicCount(n) => stats.classics >= n,
            Self::SingleBrandCount(n) => stats.top_brand >= n,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CarId, CarRecord};
    use crate::progression::achievements::find_definition;
    use crate::progression::{MAX_LEVEL, level_for, required_points};
    use crate::domain::RarityTier::{Common, Exotic, Legendary, Rare, Uncommon};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 9, 0, 0).unwrap()
    }

    /// `n` minutes into day `day`
    fn at(day: i64, n: i64) -> DateTime<Utc> {
        start() + Duration::days(day) + Duration::minutes(n)
    }

    fn car(name: &str, rarity: RarityTier, captured_at: DateTime<Utc>) -> CarRecord {
        CarRecord {
            id: CarId::Pending(0),
            name: name.to_string(),
            rarity,
            points: rarity.points(),
            captured_at,
            note: None,
            favorite: false,
            image_ref: None,
        }
    }

    /// `count` cars of `rarity`, one minute apart on day `day`
    fn batch(rarity: RarityTier, count: usize, day: i64) -> Vec<CarRecord> {
        (0..count)
            .map(|i| car(&format!("Car {i}"), rarity, at(day, i as i64)))
            .collect()
    }

    fn condition(key: &str) -> Condition {
        find_definition(key).unwrap().condition
    }

    fn met_on(condition: Condition, records: &[CarRecord], today: DateTime<Utc>) -> bool {
        let stats = CollectionStats::from_records(records);
        let ctx = EvalContext {
            stats: &stats,
            level: level_for(stats.collection_points),
            total_points: stats.collection_points,
            today: today.date_naive(),
        };
        condition.is_met(&ctx)
    }

    fn met(condition: Condition, records: &[CarRecord]) -> bool {
        met_on(condition, records, start())
    }

    #[test]
    fn test_common_purge_share_boundary() {
        let purge = condition("common_purge");

        let mut cars = batch(Common, 9, 0);
        cars.extend(batch(Uncommon, 91, 1));
        assert!(met(purge, &cars));

        let mut cars = batch(Common, 10, 0);
        cars.extend(batch(Uncommon, 90, 1));
        assert!(!met(purge, &cars));

        // Too small a collection, however clean
        assert!(!met(purge, &batch(Uncommon, 99, 0)));
    }

    #[test]
    fn test_no_common_needs_200_cars() {
        let elite = condition("no_common");

        assert!(!met(elite, &batch(Uncommon, 199, 0)));
        assert!(met(elite, &batch(Uncommon, 200, 0)));

        let mut cars = batch(Uncommon, 200, 0);
        cars.push(car("Honda Fit", Common, at(1, 0)));
        assert!(!met(elite, &cars));
        assert!(!met(elite, &[]));
    }

    #[test]
    fn test_exotic_share() {
        let dominance = condition("exotic_dominance");

        let mut cars = batch(Exotic, 1, 0);
        cars.extend(batch(Legendary, 1, 1));
        cars.extend(batch(Common, 2, 2));
        assert!(met(dominance, &cars));

        cars.extend(batch(Common, 1, 3));
        assert!(!met(dominance, &cars));
        assert!(!met(dominance, &[]));
    }

    #[test]
    fn test_legendary_focus_counts_capture_order() {
        let focus = condition("legendary_focus");

        // Fifth Legendary is capture 50
        let mut cars = batch(Common, 45, 0);
        cars.extend(batch(Legendary, 5, 1));
        assert!(met(focus, &cars));

        // Fifth Legendary is capture 51
        let mut cars = batch(Common, 46, 0);
        cars.extend(batch(Legendary, 5, 1));
        assert!(!met(focus, &cars));

        // Later Legendaries cannot make up for it
        cars.extend(batch(Legendary, 10, 2));
        assert!(!met(focus, &cars));
    }

    #[test]
    fn test_tier_day_streak() {
        let week = condition("legendary_week");

        let daily: Vec<CarRecord> = (0..7)
            .map(|d| car("Bugatti Chiron", Legendary, at(d, 0)))
            .collect();
        assert!(met(week, &daily));

        let gap: Vec<CarRecord> = (0..8)
            .filter(|d| *d != 3)
            .map(|d| car("Bugatti Chiron", Legendary, at(d, 0)))
            .collect();
        assert!(!met(week, &gap));

        // A Common capture keeps the day active but does not count
        let mut mixed = gap;
        mixed.push(car("Honda Fit", Common, at(3, 0)));
        assert!(!met(week, &mixed));
    }

    #[test]
    fn test_all_tiers_in_one_day() {
        let variety = condition("mixed_day");

        let same_day: Vec<CarRecord> = RarityTier::ALL
            .iter()
            .enumerate()
            .map(|(i, &tier)| car("Car", tier, at(0, i as i64)))
            .collect();
        assert!(met(variety, &same_day));

        let mut split = same_day;
        split[4].captured_at = at(1, 0);
        assert!(!met(variety, &split));
    }

    #[test]
    fn test_daily_points_streak() {
        let consistent = condition("consistent_100");

        let steady: Vec<CarRecord> = (0..10)
            .map(|d| car("Ferrari 296", Exotic, at(d, 0)))
            .collect();
        assert!(met(consistent, &steady));

        let mut short_day = steady.clone();
        short_day[5].rarity = Rare;
        short_day[5].points = 50;
        assert!(!met(consistent, &short_day));

        // Two captures on the short day make it up
        short_day.push(car("Porsche Cayman", Rare, at(5, 30)));
        assert!(met(consistent, &short_day));
    }

    #[test]
    fn test_points_in_window() {
        let week = condition("week_1000");

        let mut cars = batch(Exotic, 5, 0);
        cars.extend(batch(Exotic, 5, 6));
        assert!(met(week, &cars));

        let mut cars = batch(Exotic, 5, 0);
        cars.extend(batch(Exotic, 5, 7));
        assert!(!met(week, &cars));
    }

    #[test]
    fn test_points_with_few_cars() {
        let efficient = condition("efficiency");

        assert!(met(efficient, &batch(Legendary, 40, 0)));
        assert!(!met(efficient, &batch(Legendary, 39, 0)));

        // Enough points but the collection is too big
        let mut cars = batch(Legendary, 40, 0);
        cars.extend(batch(Common, 60, 1));
        assert!(!met(efficient, &cars));
    }

    #[test]
    fn test_level_within_days() {
        let fast = condition("fast_level_10");
        assert_eq!(required_points(10), 165);

        let mut cars = vec![car("Honda Fit", Common, at(0, 0))];
        cars.extend(batch(Exotic, 2, 6));
        assert!(met(fast, &cars));

        let mut cars = vec![car("Honda Fit", Common, at(0, 0))];
        cars.extend(batch(Exotic, 2, 7));
        assert!(!met(fast, &cars));
    }

    #[test]
    fn test_level_held() {
        let grind = condition("level_grind");

        let mut maxed = car("Koenigsegg Jesko", Legendary, at(0, 0));
        maxed.points = required_points(MAX_LEVEL);
        let cars = [maxed];

        assert!(!met_on(grind, &cars, at(29, 0)));
        assert!(met_on(grind, &cars, at(30, 0)));

        let held = Condition::LevelHeld { level: 5, days: 5 };
        let cars = [car("Porsche Macan", Rare, at(0, 0))];
        assert!(!met_on(held, &cars, at(4, 0)));
        assert!(met_on(held, &cars, at(5, 0)));
    }

    /// One record per day worth exactly one level-up
    fn one_level_per_day(days: u32) -> Vec<CarRecord> {
        (0..days)
            .map(|d| {
                let mut record = car("Car", Common, at(i64::from(d), 0));
                record.points = required_points(d + 2) - required_points(d + 1);
                record
            })
            .collect()
    }

    #[test]
    fn test_perfect_pace() {
        let pace = condition("perfect_pace");

        let cars = one_level_per_day(30);
        assert!(met(pace, &cars));
        assert!(!met(pace, &cars[..29]));

        // Two level-ups on day 15 breaks the exact streak but not the loose one
        let mut double = one_level_per_day(31);
        let extra = double.remove(16).points;
        double[15].points += extra;
        for record in double.iter_mut().skip(16) {
            record.captured_at -= Duration::days(1);
        }
        assert!(!met(pace, &double));
        assert!(met(Condition::LevelUpDayStreak { days: 30, exactly_one: false }, &double));
    }

    #[test]
    fn test_level_up_streak_needs_a_level_each_day() {
        // Three active days, one level-up in total
        let cars: Vec<CarRecord> = (0..3)
            .map(|d| {
                let mut record = car("Car", Common, at(d, 0));
                record.points = 4;
                record
            })
            .collect();

        assert_eq!(level_for(12), 2);
        assert!(!met(Condition::LevelUpDayStreak { days: 3, exactly_one: true }, &cars));
        assert!(!met(Condition::LevelUpDayStreak { days: 3, exactly_one: false }, &cars));
    }

    #[test]
    fn test_classic_is_twenty_model_years() {
        let classic = condition("classic_3");

        let old: Vec<CarRecord> = (0..3)
            .map(|i| car("2005 Honda Civic", Common, at(0, i)))
            .collect();
        assert!(met(classic, &old));

        let mut nineteen = old.clone();
        nineteen[2].name = "2006 Honda Civic".to_string();
        assert!(!met(classic, &nineteen));

        // A range counts from its newest year
        nineteen[2].name = "2003-2006 Honda Civic".to_string();
        assert!(!met(classic, &nineteen));
        nineteen[2].name = "1999-2005 Honda Civic".to_string();
        assert!(met(classic, &nineteen));
    }

    #[test]
    fn test_single_brand_aliases() {
        let loyal = condition("one_brand_25");

        let mut cars: Vec<CarRecord> = (0..13)
            .map(|i| car("Chevy Malibu", Common, at(0, i)))
            .collect();
        cars.extend((0..11).map(|i| car("2019 Chevrolet Tahoe", Common, at(1, i))));
        assert!(!met(loyal, &cars));

        cars.push(car("2020 Chevrolet Camaro SS", Uncommon, at(2, 0)));
        assert!(met(loyal, &cars));

        // Another make does not top it up
        cars.pop();
        cars.push(car("Ford F-150", Common, at(2, 0)));
        assert!(!met(loyal, &cars));
    }
}
