//! Aggregate view of a collection that achievement conditions read from
//!
//! Built once per evaluation. Day boundaries are UTC calendar dates; the
//! level timeline replays captures in capture order through the leveling curve.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use super::groups::{self, CarGroup};
use crate::domain::{CarRecord, RarityTier};
use crate::progression::levels::{MAX_LEVEL, level_for};

/// Activity on one calendar day
#[derive(Debug, Clone, Default)]
pub struct DayStats {
    pub captures: u64,
    pub points: u64,
    pub tiers: [bool; 5],
    pub level_ups: u32,
}

/// Collection aggregates
#[derive(Debug, Clone, Default)]
pub struct CollectionStats {
    pub total: u64,
    pub favorites: u64,
    pub noted: u64,
    pub per_tier: [u64; 5],
    pub collection_points: u64,
    pub best_single: u64,
    pub classics: u64,
    /// Largest number of cars sharing one manufacturer
    pub top_brand: u64,
    groups: HashMap<CarGroup, u64>,
    days: BTreeMap<NaiveDate, DayStats>,
    /// Tiers in capture order
    timeline: Vec<RarityTier>,
    /// Date each level was first reached (index = level)
    level_reached: Vec<Option<NaiveDate>>,
}

impl CollectionStats {
    pub fn from_records(records: &[CarRecord]) -> Self {
        let mut stats = Self {
            level_reached: vec![None; MAX_LEVEL as usize + 1],
            ..Self::default()
        };

        let mut ordered: Vec<&CarRecord> = records.iter().collect();
        ordered.sort_by_key(|r| r.captured_at);

        let mut brands: HashMap<String, u64> = HashMap::new();
        let mut running_points = 0u64;
        let mut level = 1u32;

        for record in ordered {
            let day = record.captured_at.date_naive();
            let name = record.name.to_lowercase();

            stats.total += 1;
            stats.favorites += u64::from(record.favorite);
            stats.noted += u64::from(record.has_note());
            stats.per_tier[record.rarity.index()] += 1;
            stats.collection_points += record.points;
            stats.best_single = stats.best_single.max(record.points);
            stats.timeline.push(record.rarity);

            for group in CarGroup::ALL {
                if group.matches(&name) {
                    *stats.groups.entry(group).or_default() += 1;
                }
            }
            if groups::model_year(&record.name)
                .is_some_and(|year| record.captured_at.year() - year >= 20)
            {
                stats.classics += 1;
            }
            if let Some(make) = groups::manufacturer(&record.name) {
                *brands.entry(make).or_default() += 1;
            }

            running_points += record.points;
            let new_level = level_for(running_points);
            for reached in level + 1..=new_level {
                stats.level_reached[reached as usize] = Some(day);
            }

            let entry = stats.days.entry(day).or_default();
            entry.captures += 1;
            entry.points += record.points;
            entry.tiers[record.rarity.index()] = true;
            entry.level_ups += new_level.saturating_sub(level);
            level = level.max(new_level);
        }

        stats.top_brand = brands.values().copied().max().unwrap_or(0);
        stats
    }

    pub fn tier_count(&self, tier: RarityTier) -> u64 {
        self.per_tier[tier.index()]
    }

    /// Cars of `tier` or any rarer tier
    pub fn tier_or_rarer(&self, tier: RarityTier) -> u64 {
        self.per_tier[tier.index()..].iter().sum()
    }

    pub fn group_count(&self, group: CarGroup) -> u64 {
        self.groups.get(&group).copied().unwrap_or(0)
    }

    pub fn first_capture_day(&self) -> Option<NaiveDate> {
        self.days.keys().next().copied()
    }

    pub fn max_captures_in_day(&self) -> u64 {
        self.days.values().map(|d| d.captures).max().unwrap_or(0)
    }

    pub fn max_points_in_day(&self) -> u64 {
        self.days.values().map(|d| d.points).max().unwrap_or(0)
    }

    pub fn max_level_ups_in_day(&self) -> u32 {
        self.days.values().map(|d| d.level_ups).max().unwrap_or(0)
    }

    pub fn any_day_with_all_tiers(&self) -> bool {
        self.days.values().any(|d| d.tiers.iter().all(|&t| t))
    }

    /// Most points earned inside any window of `days` consecutive calendar days
    pub fn max_points_in_window(&self, days: u32) -> u64 {
        let span = i64::from(days.max(1));
        let entries: Vec<(NaiveDate, u64)> =
            self.days.iter().map(|(day, d)| (*day, d.points)).collect();

        let mut best = 0;
        let mut window = 0;
        let mut start = 0;
        for end in 0..entries.len() {
            window += entries[end].1;
            while (entries[end].0 - entries[start].0).num_days() >= span {
                window -= entries[start].1;
                start += 1;
            }
            best = best.max(window);
        }
        best
    }

    /// Longest run of consecutive calendar days on which `pred` holds
    pub fn longest_day_run(&self, pred: impl Fn(&DayStats) -> bool) -> u64 {
        let mut best = 0;
        let mut run = 0;
        let mut previous: Option<NaiveDate> = None;

        for (day, stats) in &self.days {
            if !pred(stats) {
                run = 0;
                previous = None;
                continue;
            }
            run = match previous {
                Some(prev) if (*day - prev).num_days() == 1 => run + 1,
                _ => 1,
            };
            previous = Some(*day);
            best = best.max(run);
        }
        best
    }

    /// Longest run of consecutive captures at `tier` or rarer
    pub fn longest_capture_run(&self, tier: RarityTier) -> u64 {
        let mut best = 0;
        let mut run = 0;
        for captured in &self.timeline {
            run = if *captured >= tier { run + 1 } else { 0 };
            best = best.max(run);
        }
        best
    }

    /// Cars of `tier` among the first `within` captures
    pub fn tier_in_first(&self, tier: RarityTier, within: u64) -> u64 {
        self.timeline
            .iter()
            .take(within as usize)
            .filter(|t| **t == tier)
            .count() as u64
    }

    /// Rare-or-rarer captures made after the `commons`-th Common capture
    pub fn upgrades_after_commons(&self, commons: u64) -> u64 {
        if commons == 0 {
            return self.tier_or_rarer(RarityTier::Rare);
        }
        let mut seen = 0;
        let mut upgrades = 0;
        for tier in &self.timeline {
            if seen >= commons && *tier >= RarityTier::Rare {
                upgrades += 1;
            }
            if *tier == RarityTier::Common {
                seen += 1;
            }
        }
        upgrades
    }

    /// Every tier present, and each rarer tier at most half the one below it
    pub fn is_rarity_pyramid(&self) -> bool {
        self.per_tier.iter().all(|&c| c > 0)
            && self.per_tier.windows(2).all(|pair| pair[1] * 2 <= pair[0])
    }

    /// Date `level` was first reached by collection points alone
    pub fn level_reached_on(&self, level: u32) -> Option<NaiveDate> {
        if level <= 1 {
            return self.first_capture_day();
        }
        self.level_reached.get(level as usize).copied().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::CarId;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
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

    #[test]
    fn test_counts() {
        let mut noted = car("Honda Civic", RarityTier::Common, at(1, 9));
        noted.note = Some("parked outside".to_string());
        noted.favorite = true;
        let mut empty_note = car("Honda Accord", RarityTier::Common, at(1, 10));
        empty_note.note = Some(String::new());

        let stats = CollectionStats::from_records(&[
            noted,
            empty_note,
            car("Ferrari 488", RarityTier::Exotic, at(2, 9)),
        ]);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.favorites, 1);
        assert_eq!(stats.noted, 1);
        assert_eq!(stats.tier_count(RarityTier::Common), 2);
        assert_eq!(stats.tier_or_rarer(RarityTier::Rare), 1);
        assert_eq!(stats.collection_points, 120);
        assert_eq!(stats.best_single, 100);
        assert_eq!(stats.top_brand, 2);
        assert_eq!(stats.group_count(CarGroup::Japanese), 2);
        assert_eq!(stats.group_count(CarGroup::Supercar), 1);
    }

    #[test]
    fn test_day_runs_and_windows() {
        let stats = CollectionStats::from_records(&[
            car("Honda Civic", RarityTier::Common, at(1, 9)),
            car("Honda Civic", RarityTier::Common, at(2, 9)),
            car("Honda Civic", RarityTier::Common, at(2, 18)),
            car("Honda Civic", RarityTier::Common, at(3, 9)),
            car("Honda Civic", RarityTier::Common, at(5, 9)),
        ]);
        assert_eq!(stats.longest_day_run(|d| d.captures > 0), 3);
        assert_eq!(stats.max_captures_in_day(), 2);
        assert_eq!(stats.max_points_in_day(), 20);
        assert_eq!(stats.max_points_in_window(2), 30);
        assert_eq!(stats.max_points_in_window(5), 50);
    }

    #[test]
    fn test_capture_order_not_input_order() {
        let stats = CollectionStats::from_records(&[
            car("Bugatti Chiron", RarityTier::Legendary, at(3, 9)),
            car("Honda Civic", RarityTier::Common, at(1, 9)),
            car("Ferrari F8", RarityTier::Exotic, at(2, 9)),
        ]);
        assert_eq!(stats.longest_capture_run(RarityTier::Exotic), 2);
        assert_eq!(stats.tier_in_first(RarityTier::Legendary, 2), 0);
        assert_eq!(stats.upgrades_after_commons(1), 2);
    }

    #[test]
    fn test_level_timeline() {
        // 250 points on day 1 reaches level 12 (threshold 240);
        // 350 on day 4 reaches level 14 (339), level 15 needs 400
        let stats = CollectionStats::from_records(&[
            car("Bugatti Chiron", RarityTier::Legendary, at(1, 9)),
            car("Ferrari F8", RarityTier::Exotic, at(4, 9)),
        ]);
        assert_eq!(stats.level_reached_on(12), Some(at(1, 0).date_naive()));
        assert_eq!(stats.level_reached_on(13), Some(at(4, 0).date_naive()));
        assert_eq!(stats.level_reached_on(14), Some(at(4, 0).date_naive()));
        assert_eq!(stats.level_reached_on(15), None);
        assert_eq!(stats.max_level_ups_in_day(), 11);
    }

    #[test]
    fn test_pyramid() {
        let mut records = Vec::new();
        for (tier, count) in [
            (RarityTier::Common, 16),
            (RarityTier::Uncommon, 8),
            (RarityTier::Rare, 4),
            (RarityTier::Exotic, 2),
            (RarityTier::Legendary, 1),
        ] {
            for _ in 0..count {
                records.push(car("Some Car", tier, at(1, 9)));
            }
        }
        assert!(CollectionStats::from_records(&records).is_rarity_pyramid());

        records.push(car("Bugatti Veyron", RarityTier::Legendary, at(1, 9)));
        assert!(!CollectionStats::from_records(&records).is_rarity_pyramid());
    }
}
