//! Leveling curve
//!
//! Level L (2..=100) costs `floor(10 * 1.15^(L-2))` points on top of the
//! previous level; `required_points` is the running sum of those costs.

use once_cell::sync::Lazy;

/// Highest reachable level
pub const MAX_LEVEL: u32 = 100;

const BASE_COST: f64 = 10.0;
const GROWTH: f64 = 1.15;

/// Cumulative thresholds, indexed by level (index 0 unused)
static THRESHOLDS: Lazy<Vec<u64>> = Lazy::new(|| {
    let mut thresholds = vec![0u64; MAX_LEVEL as usize + 1];
    for level in 2..=MAX_LEVEL as usize {
        thresholds[level] = thresholds[level - 1] + level_cost(level as u32);
    }
    thresholds
});

/// Points needed to go from `level - 1` to `level`
fn level_cost(level: u32) -> u64 {
    (BASE_COST * GROWTH.powf(f64::from(level - 2))).floor() as u64
}

/// Cumulative points required to reach `level`. Zero at or below level 1;
/// levels above the cap cost the same as the cap.
pub fn required_points(level: u32) -> u64 {
    if level <= 1 {
        return 0;
    }
    THRESHOLDS[level.min(MAX_LEVEL) as usize]
}

/// Highest level whose threshold `total_points` meets, capped at `MAX_LEVEL`
pub fn level_for(total_points: u64) -> u32 {
    // Thresholds are sorted; count how many of levels 2..=100 are reached
    let reached = THRESHOLDS[2..].partition_point(|&t| t <= total_points);
    1 + reached as u32
}

/// Player level summary derived from total points
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerStats {
    pub total_points: u64,
    pub level: u32,
    /// Points required for the current level
    pub current_level_points: u64,
    /// Points required for the next level (None at max level)
    pub next_level_points: Option<u64>,
}

impl PlayerStats {
    pub fn new(total_points: u64) -> Self {
        let level = level_for(total_points);
        let next_level_points = (level < MAX_LEVEL).then(|| required_points(level + 1));

        Self {
            total_points,
            level,
            current_level_points: required_points(level),
            next_level_points,
        }
    }

    /// Progress toward the next level (0.0 - 1.0), pinned to 1.0 at max level
    pub fn progress_to_next(&self) -> f64 {
        match self.next_level_points {
            Some(next) => {
                let into_level = self.total_points - self.current_level_points;
                let level_span = next - self.current_level_points;
                if level_span == 0 {
                    1.0
                } else {
                    into_level as f64 / level_span as f64
                }
            }
            None => 1.0,
        }
    }

    /// Points still missing for the next level-up (0 at max level)
    pub fn points_to_next(&self) -> u64 {
        self.next_level_points
            .map(|next| next - self.total_points)
            .unwrap_or(0)
    }

    pub fn is_max_level(&self) -> bool {
        self.next_level_points.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_thresholds() {
        let firsts: Vec<u64> = (1..=8).map(required_points).collect();
        assert_eq!(firsts, vec![0, 10, 21, 34, 49, 66, 86, 109]);
        assert_eq!(required_points(0), 0);
    }

    #[test]
    fn test_level_for_points() {
        assert_eq!(level_for(0), 1);
        assert_eq!(level_for(9), 1);
        assert_eq!(level_for(10), 2);
        assert_eq!(level_for(20), 2);
        assert_eq!(level_for(21), 3);
        assert_eq!(level_for(2500), 27);
        assert_eq!(level_for(required_points(MAX_LEVEL)), MAX_LEVEL);
        assert_eq!(level_for(u64::MAX), MAX_LEVEL);
    }

    #[test]
    fn test_level_brackets_points() {
        for points in (0..20_000).step_by(7) {
            let level = level_for(points);
            assert!(required_points(level) <= points);
            if level < MAX_LEVEL {
                assert!(points < required_points(level + 1));
            }
        }
    }

    #[test]
    fn test_curve_is_strictly_increasing_and_convex() {
        for level in 1..MAX_LEVEL {
            assert!(required_points(level + 1) > required_points(level));
        }
        for level in 2..MAX_LEVEL - 1 {
            let step = required_points(level + 1) - required_points(level);
            let next_step = required_points(level + 2) - required_points(level + 1);
            assert!(next_step >= step, "curve flattens at level {level}");
        }
    }

    #[test]
    fn test_player_stats_progress() {
        // Level 2 spans 10..21
        let stats = PlayerStats::new(15);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.current_level_points, 10);
        assert_eq!(stats.next_level_points, Some(21));
        assert_eq!(stats.points_to_next(), 6);
        assert!((stats.progress_to_next() - 5.0 / 11.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_points() {
        let stats = PlayerStats::new(0);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.progress_to_next(), 0.0);
        assert_eq!(stats.points_to_next(), 10);
    }

    #[test]
    fn test_max_level_is_complete() {
        let stats = PlayerStats::new(required_points(MAX_LEVEL) * 3);
        assert_eq!(stats.level, MAX_LEVEL);
        assert!(stats.is_max_level());
        assert_eq!(stats.progress_to_next(), 1.0);
        assert_eq!(stats.points_to_next(), 0);
    }
}
