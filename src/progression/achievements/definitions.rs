//! Achievement catalog
//!
//! The catalog is fixed at compile time; only per-user state changes.
//! Keys are stable storage identifiers and must never be reused.

use serde::{Deserialize, Serialize};

use super::conditions::Condition;
use super::groups::CarGroup;
use crate::domain::RarityTier::{Common, Exotic, Legendary, Rare, Uncommon};
use AchievementCategory::{Collection, Dedication, Level, Points, Rarity, Specific};
use AchievementDefinition as Def;
use Condition as C;

/// Bumped whenever entries are added or retired
pub const CATALOG_VERSION: u32 = 1;

/// Achievement category for grouping in UI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AchievementCategory {
    Collection,
    Rarity,
    Points,
    Level,
    Specific,
    Dedication,
}

impl AchievementCategory {
    pub const ALL: [AchievementCategory; 6] = [
        AchievementCategory::Collection,
        AchievementCategory::Rarity,
        AchievementCategory::Points,
        AchievementCategory::Level,
        AchievementCategory::Specific,
        AchievementCategory::Dedication,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Collection => "Collection",
            Self::Rarity => "Rarity",
            Self::Points => "Points",
            Self::Level => "Level",
            Self::Specific => "Specific",
            Self::Dedication => "Dedication",
        }
    }

    /// Case-insensitive parse of a label
    pub fn from_label(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
    }
}

/// Achievement definition with all metadata
#[derive(Debug, Clone)]
pub struct AchievementDefinition {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub coin_reward: u64,
    pub xp_reward: u64,
    pub icon: &'static str,
    pub condition: Condition,
}

impl AchievementDefinition {
    const fn new(
        key: &'static str,
        title: &'static str,
        description: &'static str,
        category: AchievementCategory,
        coin_reward: u64,
        icon: &'static str,
        condition: Condition,
    ) -> Self {
        Self {
            key,
            title,
            description,
            category,
            coin_reward,
            xp_reward: 0,
            icon,
            condition,
        }
    }

    /// Numeric requirement threshold
    pub fn requirement(&self) -> u64 {
        self.condition.threshold()
    }
}

/// All achievement definitions
#[rustfmt::skip]
pub static CATALOG: &[AchievementDefinition] = &[
    // === COLLECTION ===
    Def::new("first_car", "First Wheels", "Collect your first car", Collection, 10, "car.fill", C::CarCount(1)),
    Def::new("5_cars", "Small Garage", "Collect 5 cars", Collection, 25, "car.2.fill", C::CarCount(5)),
    Def::new("10_cars", "Car Enthusiast", "Collect 10 cars", Collection, 50, "car.circle", C::CarCount(10)),
    Def::new("25_cars", "Growing Collection", "Collect 25 cars", Collection, 100, "car.circle.fill", C::CarCount(25)),
    Def::new("50_cars", "Serious Collector", "Collect 50 cars", Collection, 200, "car.ferry", C::CarCount(50)),
    Def::new("75_cars", "Car Connoisseur", "Collect 75 cars", Collection, 300, "car.top.radiowaves.front", C::CarCount(75)),
    Def::new("100_cars", "Century Club", "Collect 100 cars", Collection, 500, "100.circle.fill", C::CarCount(100)),
    Def::new("150_cars", "Master Collector", "Collect 150 cars", Collection, 750, "star.fill", C::CarCount(150)),
    Def::new("200_cars", "Legend", "Collect 200 cars", Collection, 1000, "crown.fill", C::CarCount(200)),
    Def::new("300_cars", "Ultimate Collection", "Collect 300 cars", Collection, 2000, "diamond.fill", C::CarCount(300)),
    Def::new("favorite_5", "Favorites", "Mark 5 cars as favorites", Collection, 30, "star.circle.fill", C::FavoriteCount(5)),
    Def::new("favorite_25", "Beloved Collection", "Mark 25 cars as favorites", Collection, 150, "sparkles", C::FavoriteCount(25)),
    Def::new("notes_10", "Storyteller", "Add notes to 10 cars", Collection, 40, "note.text", C::NotedCount(10)),
    Def::new("notes_50", "Detailed Archivist", "Add notes to 50 cars", Collection, 200, "book.fill", C::NotedCount(50)),
    // === DEDICATION ===
    Def::new("daily_scan_3", "Three Day Streak", "Scan cars for 3 days in a row", Dedication, 50, "flame.fill", C::CaptureDayStreak(3)),
    Def::new("daily_scan_7", "Week Warrior", "Scan cars for 7 days in a row", Dedication, 100, "calendar.badge.clock", C::CaptureDayStreak(7)),
    Def::new("daily_scan_30", "Monthly Dedication", "Scan cars for 30 days in a row", Dedication, 500, "medal.fill", C::CaptureDayStreak(30)),
    Def::new("one_day_5", "Productive Day", "Scan 5 cars in one day", Dedication, 40, "sunrise.fill", C::CapturesInOneDay(5)),
    Def::new("one_day_10", "Car Spotting Spree", "Scan 10 cars in one day", Dedication, 100, "sun.max.fill", C::CapturesInOneDay(10)),
    Def::new("one_day_25", "Super Spotter", "Scan 25 cars in one day", Dedication, 300, "sparkles.square.filled.on.square", C::CapturesInOneDay(25)),
    // === RARITY ===
    Def::new("common_10", "Common Grounds", "Collect 10 Common cars", Rarity, 20, "circle.fill", C::TierCount(Common, 10)),
    Def::new("common_50", "Everyday Enthusiast", "Collect 50 Common cars", Rarity, 100, "circle.grid.3x3.fill", C::TierCount(Common, 50)),
    Def::new("uncommon_5", "Rising Interest", "Collect 5 Uncommon cars", Rarity, 30, "circle.hexagongrid.fill", C::TierCount(Uncommon, 5)),
    Def::new("uncommon_25", "Premium Seeker", "Collect 25 Uncommon cars", Rarity, 150, "hexagon.fill", C::TierCount(Uncommon, 25)),
    Def::new("rare_3", "Rare Find", "Collect 3 Rare cars", Rarity, 50, "diamond", C::TierCount(Rare, 3)),
    Def::new("rare_10", "Luxury Lover", "Collect 10 Rare cars", Rarity, 200, "gem.fill", C::TierCount(Rare, 10)),
    Def::new("rare_25", "High Performance", "Collect 25 Rare cars", Rarity, 500, "bolt.fill", C::TierCount(Rare, 25)),
    Def::new("exotic_1", "First Exotic", "Collect your first Exotic car", Rarity, 100, "star.circle.fill", C::TierCount(Exotic, 1)),
    Def::new("exotic_5", "Supercar Collector", "Collect 5 Exotic cars", Rarity, 300, "flame.circle.fill", C::TierCount(Exotic, 5)),
    Def::new("exotic_15", "Elite Fleet", "Collect 15 Exotic cars", Rarity, 750, "sparkle", C::TierCount(Exotic, 15)),
    Def::new("legendary_1", "Legendary Moment", "Collect your first Legendary car", Rarity, 200, "trophy.fill", C::TierCount(Legendary, 1)),
    Def::new("legendary_3", "Hypercar Hunter", "Collect 3 Legendary cars", Rarity, 500, "crown", C::TierCount(Legendary, 3)),
    Def::new("legendary_10", "Ultimate Collection", "Collect 10 Legendary cars", Rarity, 1500, "shield.fill", C::TierCount(Legendary, 10)),
    Def::new("all_rarities", "Rainbow Collection", "Own at least one of each rarity", Rarity, 250, "paintpalette.fill", C::AllTiers),
    Def::new("balanced_10", "Balanced Collector", "Have 10+ cars in each rarity", Rarity, 500, "equal.circle.fill", C::EveryTierCount(10)),
    Def::new("rare_only_10", "Only the Best", "Collect 10 cars of Rare or higher", Rarity, 300, "rosette", C::TierOrRarerCount(Rare, 10)),
    Def::new("exotic_streak_3", "Exotic Streak", "Find 3 Exotic+ cars in a row", Rarity, 400, "arrow.up.circle.fill", C::TierOrRarerRun { tier: Exotic, run: 3 }),
    Def::new("legendary_week", "Golden Week", "Find a Legendary car 7 days in a row", Rarity, 1000, "calendar.badge.plus", C::TierDayStreak { tier: Legendary, days: 7 }),
    Def::new("mixed_day", "Variety Spotter", "Find all 5 rarities in one day", Rarity, 350, "checkerboard.shield", C::AllTiersInOneDay),
    Def::new("upgrade_collection", "Upgrading", "Find 10 Rare+ cars after your 10th Common", Rarity, 200, "arrow.up.square.fill", C::UpgradesAfterCommons(10)),
    Def::new("rarity_master", "Rarity Master", "Collect 25+ of each rarity type", Rarity, 1000, "star.square.fill", C::EveryTierCount(25)),
    Def::new("exotic_dominance", "Exotic Dominance", "Have 50% of collection be Exotic+", Rarity, 800, "percent", C::TierOrRarerShare { tier: Exotic, percent: 50 }),
    Def::new("common_purge", "Quality Over Quantity", "Have under 10% Common cars in 100+ collection", Rarity, 400, "trash.circle", C::TierShareBelow { tier: Common, percent: 10, min_cars: 100 }),
    Def::new("legendary_focus", "Legendary Focus", "Collect 5 Legendary before 50 total cars", Rarity, 600, "target", C::TierWithinFirst { tier: Legendary, count: 5, within: 50 }),
    Def::new("rarity_pyramid", "Perfect Pyramid", "Have each rarity tier decrease by 50%", Rarity, 500, "pyramid.fill", C::RarityPyramid),
    Def::new("exotic_collector", "Exotic Only Club", "Own 50 Exotic+ cars", Rarity, 1200, "automobile.fill", C::TierOrRarerCount(Exotic, 50)),
    Def::new("legendary_hunter", "Legendary Hunter", "Own 20 Legendary cars", Rarity, 2000, "flag.checkered.2.crossed", C::TierCount(Legendary, 20)),
    Def::new("diverse_rare", "Diverse Excellence", "Own 100 cars of Rare+ quality", Rarity, 1500, "square.3.layers.3d", C::TierOrRarerCount(Rare, 100)),
    Def::new("no_common", "Elite Only", "Have 0 Common cars in 200+ collection", Rarity, 1000, "xmark.circle", C::NoneOfTier { tier: Common, min_cars: 200 }),
    Def::new("full_legendary", "Hall of Legends", "Own 50 Legendary cars", Rarity, 5000, "building.columns.fill", C::TierCount(Legendary, 50)),
    // === POINTS ===
    Def::new("100_points", "Century", "Earn 100 points", Points, 20, "100.square", C::TotalPoints(100)),
    Def::new("500_points", "Point Collector", "Earn 500 points", Points, 50, "star.leadinghalf.filled", C::TotalPoints(500)),
    Def::new("1000_points", "Thousand Club", "Earn 1,000 points", Points, 100, "1000.circle.fill", C::TotalPoints(1000)),
    Def::new("2500_points", "Point Master", "Earn 2,500 points", Points, 200, "chart.line.uptrend.xyaxis", C::TotalPoints(2500)),
    Def::new("5000_points", "Five Thousand", "Earn 5,000 points", Points, 400, "5000.circle", C::TotalPoints(5000)),
    Def::new("10000_points", "Ten Thousand", "Earn 10,000 points", Points, 750, "mountain.2.fill", C::TotalPoints(10_000)),
    Def::new("25000_points", "Point Tycoon", "Earn 25,000 points", Points, 1500, "diamond.inset.filled", C::TotalPoints(25_000)),
    Def::new("50000_points", "Fifty Thousand", "Earn 50,000 points", Points, 2500, "trophy.circle.fill", C::TotalPoints(50_000)),
    Def::new("100000_points", "Six Figures", "Earn 100,000 points", Points, 5000, "shippingbox.fill", C::TotalPoints(100_000)),
    Def::new("250000_points", "Quarter Million", "Earn 250,000 points", Points, 10_000, "banknote.fill", C::TotalPoints(250_000)),
    Def::new("500_one_day", "Daily Excellence", "Earn 500 points in one day", Points, 150, "calendar.day.timeline.left", C::PointsInOneDay(500)),
    Def::new("1000_one_day", "Thousand Day", "Earn 1,000 points in one day", Points, 400, "calendar.badge.exclamationmark", C::PointsInOneDay(1000)),
    Def::new("avg_50", "Quality Collector", "Average 50+ points per car", Points, 300, "chart.bar.fill", C::AveragePoints(50)),
    Def::new("avg_100", "Elite Standards", "Average 100+ points per car", Points, 600, "chart.bar.xaxis", C::AveragePoints(100)),
    Def::new("single_200", "Big Score", "Find a single car worth 200+ points", Points, 250, "bolt.circle.fill", C::SingleCarPoints(200)),
    Def::new("week_1000", "Productive Week", "Earn 1,000 points in a week", Points, 300, "calendar.circle.fill", C::PointsInWindow { days: 7, points: 1000 }),
    Def::new("month_5000", "Monthly Milestone", "Earn 5,000 points in a month", Points, 800, "calendar.badge.checkmark", C::PointsInWindow { days: 30, points: 5000 }),
    Def::new("consistent_100", "Consistency", "Earn 100+ points 10 days in a row", Points, 500, "arrow.clockwise.circle.fill", C::DailyPointsStreak { points: 100, days: 10 }),
    Def::new("point_multiplier", "Multiplier", "Earn 10x your level in points in one day", Points, 400, "multiply.circle.fill", C::LevelMultipleInOneDay(10)),
    Def::new("efficiency", "Efficient Collector", "Reach 10,000 points with under 100 cars", Points, 700, "gauge.high", C::PointsWithFewCars { points: 10_000, max_cars: 100 }),
    // === LEVEL ===
    Def::new("level_5", "Level 5", "Reach Level 5", Level, 25, "5.square.fill", C::Level(5)),
    Def::new("level_10", "Level 10", "Reach Level 10", Level, 50, "10.square.fill", C::Level(10)),
    Def::new("level_25", "Level 25", "Reach Level 25", Level, 150, "25.square.fill", C::Level(25)),
    Def::new("level_50", "Halfway", "Reach Level 50", Level, 500, "50.square.fill", C::Level(50)),
    Def::new("level_75", "Level 75", "Reach Level 75", Level, 1000, "75.square.fill", C::Level(75)),
    Def::new("level_100", "Maximum Level", "Reach Level 100", Level, 5000, "100.circle.fill", C::Level(100)),
    Def::new("fast_level_10", "Speed Leveler", "Reach Level 10 in 7 days", Level, 200, "hare.fill", C::LevelWithinDays { level: 10, days: 7 }),
    Def::new("fast_level_25", "Rapid Rise", "Reach Level 25 in 30 days", Level, 500, "tornado", C::LevelWithinDays { level: 25, days: 30 }),
    Def::new("level_up_5", "Growth Spurt", "Level up 5 times in one day", Level, 300, "arrow.up.forward.circle.fill", C::LevelUpsInOneDay(5)),
    Def::new("steady_pace", "Steady Progress", "Level up every day for a week", Level, 400, "figure.walk", C::LevelUpDayStreak { days: 7, exactly_one: false }),
    Def::new("double_digits", "Double Digits", "Reach a double-digit level", Level, 250, "00.circle.fill", C::Level(10)),
    Def::new("halfway_month", "Quick Climber", "Reach Level 50 in 60 days", Level, 800, "mountain.2.circle.fill", C::LevelWithinDays { level: 50, days: 60 }),
    Def::new("level_grind", "Dedicated Grinder", "Stay at max level for 30 days", Level, 1000, "figure.strengthtraining.traditional", C::LevelHeld { level: 100, days: 30 }),
    Def::new("never_stop", "Never Stop Growing", "Maintain 90+ level for 90 days", Level, 1500, "infinity.circle.fill", C::LevelHeld { level: 90, days: 90 }),
    Def::new("perfect_pace", "Perfect Pace", "Level up exactly once per day for 30 days", Level, 1200, "metronome.fill", C::LevelUpDayStreak { days: 30, exactly_one: true }),
    // === SPECIFIC ===
    Def::new("german_5", "German Engineering", "Collect 5 German cars (BMW, Mercedes, Audi, Porsche)", Specific, 75, "flag.fill", C::GroupCount(CarGroup::German, 5)),
    Def::new("japanese_10", "JDM Lover", "Collect 10 Japanese cars (Toyota, Honda, Nissan, Mazda)", Specific, 100, "japan.flag", C::GroupCount(CarGroup::Japanese, 10)),
    Def::new("american_muscle", "American Muscle", "Collect 5 American muscle cars (Mustang, Camaro, Challenger)", Specific, 100, "flag.checkered", C::GroupCount(CarGroup::AmericanMuscle, 5)),
    Def::new("italian_exotic", "Italian Style", "Collect 3 Italian exotics (Ferrari, Lamborghini, Maserati)", Specific, 200, "laurel.leading", C::GroupCount(CarGroup::ItalianExotic, 3)),
    Def::new("british_luxury", "British Luxury", "Collect 3 British luxury cars (Rolls-Royce, Bentley, Aston Martin)", Specific, 200, "crown.fill", C::GroupCount(CarGroup::BritishLuxury, 3)),
    Def::new("electric_5", "Future Forward", "Collect 5 electric vehicles", Specific, 80, "bolt.car.fill", C::GroupCount(CarGroup::Electric, 5)),
    Def::new("classic_3", "Classic Collector", "Collect 3 classic cars (20+ years old)", Specific, 150, "clock.arrow.circlepath", C::ClassicCount(3)),
    Def::new("suv_10", "SUV Enthusiast", "Collect 10 SUVs", Specific, 70, "suv.side.fill", C::GroupCount(CarGroup::Suv, 10)),
    Def::new("sports_15", "Sports Car Fan", "Collect 15 sports cars", Specific, 120, "sportscourt.fill", C::GroupCount(CarGroup::Sports, 15)),
    Def::new("luxury_sedan", "Executive Choice", "Collect 10 luxury sedans", Specific, 100, "car.rear.fill", C::GroupCount(CarGroup::LuxurySedan, 10)),
    Def::new("supercar_5", "Supercar Collection", "Collect 5 supercars (Ferrari, McLaren, Lamborghini)", Specific, 300, "flame.fill", C::GroupCount(CarGroup::Supercar, 5)),
    Def::new("hypercar_3", "Hypercar Elite", "Collect 3 hypercars (Bugatti, Koenigsegg, Pagani)", Specific, 500, "wind", C::GroupCount(CarGroup::Hypercar, 3)),
    Def::new("convertible_5", "Top Down", "Collect 5 convertibles", Specific, 60, "sun.horizon.fill", C::GroupCount(CarGroup::Convertible, 5)),
    Def::new("truck_10", "Truck Collector", "Collect 10 pickup trucks", Specific, 75, "truck.box.fill", C::GroupCount(CarGroup::Truck, 10)),
    Def::new("one_brand_25", "Brand Loyalty", "Collect 25 cars from one manufacturer", Specific, 250, "building.2.fill", C::SingleBrandCount(25)),
];

/// Get achievement definition by key
pub fn find_definition(key: &str) -> Option<&'static AchievementDefinition> {
    CATALOG.iter().find(|a| a.key == key)
}

/// Total coins available from the whole catalog
pub fn catalog_coins() -> u64 {
    CATALOG.iter().map(|a| a.coin_reward).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_catalog_size_and_unique_keys() {
        assert_eq!(CATALOG.len(), 100);
        let keys: HashSet<&str> = CATALOG.iter().map(|a| a.key).collect();
        assert_eq!(keys.len(), CATALOG.len());
    }

    #[test]
    fn test_category_counts() {
        let count = |category| CATALOG.iter().filter(|a| a.category == category).count();
        assert_eq!(count(AchievementCategory::Collection), 14);
        assert_eq!(count(AchievementCategory::Dedication), 6);
        assert_eq!(count(AchievementCategory::Rarity), 30);
        assert_eq!(count(AchievementCategory::Points), 20);
        assert_eq!(count(AchievementCategory::Level), 15);
        assert_eq!(count(AchievementCategory::Specific), 15);
    }

    #[test]
    fn test_requirements_follow_conditions() {
        assert_eq!(find_definition("first_car").unwrap().requirement(), 1);
        assert_eq!(find_definition("all_rarities").unwrap().requirement(), 5);
        assert_eq!(find_definition("consistent_100").unwrap().requirement(), 10);
        assert_eq!(find_definition("efficiency").unwrap().requirement(), 10_000);
        assert_eq!(find_definition("level_grind").unwrap().requirement(), 30);
        assert!(find_definition("missing_key").is_none());
    }

    #[test]
    fn test_category_labels() {
        for category in AchievementCategory::ALL {
            assert_eq!(AchievementCategory::from_label(category.label()), Some(category));
        }
        assert_eq!(
            AchievementCategory::from_label("rarity"),
            Some(AchievementCategory::Rarity)
        );
    }
}
