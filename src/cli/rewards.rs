//! Rewards commands: level, achievements, claim

use anyhow::{Result, bail};
use serde::Serialize;

use car_collector::progression::{
    AchievementCategory, AchievementState, CATALOG, catalog_coins, find_definition,
};
use car_collector::session::DefaultSession;

use super::collection::print_unlocked;

pub fn level_command(session: &DefaultSession) -> Result<()> {
    let progression = session.progression();
    let stats = progression.player_stats();

    println!("Level {}", stats.level);
    println!(
        "  Points: {} ({} from cars, {} bonus XP)",
        stats.total_points,
        progression.collection_points(),
        progression.ledger().bonus_xp()
    );
    match stats.next_level_points {
        Some(next) => println!(
            "  Next level at {} ({} to go, {:.0}%)",
            next,
            stats.points_to_next(),
            stats.progress_to_next() * 100.0
        ),
        None => println!("  Max level reached"),
    }
    println!(
        "  Coins: {} (catalog total {})",
        progression.ledger().coins(),
        catalog_coins()
    );
    Ok(())
}

#[derive(Serialize)]
struct AchievementRow<'a> {
    key: &'a str,
    title: &'a str,
    description: &'a str,
    category: AchievementCategory,
    requirement: u64,
    coin_reward: u64,
    #[serde(flatten)]
    state: AchievementState,
}

pub fn achievements_command(
    session: &mut DefaultSession,
    category: Option<String>,
    unclaimed: bool,
    json: bool,
) -> Result<()> {
    let category = match category {
        Some(label) => match AchievementCategory::from_label(&label) {
            Some(c) => Some(c),
            None => bail!("Unknown category: {}", label),
        },
        None => None,
    };

    // Catch up on anything a catalog update made reachable
    let unlocked = session.evaluate()?;
    print_unlocked(&unlocked);

    let ledger = session.progression().ledger();
    let rows: Vec<AchievementRow> = CATALOG
        .iter()
        .filter(|a| category.is_none_or(|c| a.category == c))
        .map(|a| AchievementRow {
            key: a.key,
            title: a.title,
            description: a.description,
            category: a.category,
            requirement: a.requirement(),
            coin_reward: a.coin_reward,
            state: ledger.state(a.key),
        })
        .filter(|row| !unclaimed || row.state.is_claimable())
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No achievements found.");
        return Ok(());
    }

    let done = rows.iter().filter(|r| r.state.is_unlocked()).count();
    println!("Achievements ({}/{} unlocked):\n", done, rows.len());
    for row in &rows {
        let mark = match row.state {
            AchievementState::Locked => " ",
            AchievementState::Unlocked { .. } => "!",
            AchievementState::Claimed { .. } => "x",
        };
        println!(
            "  [{}] {} ({}) - {} [{} coins]",
            mark,
            row.title,
            row.key,
            row.description,
            row.coin_reward
        );
    }

    if ledger.has_unclaimed() {
        println!("\nClaim rewards with: car-collector claim <KEY>");
    }
    Ok(())
}

pub fn claim_command(session: &mut DefaultSession, key: &str) -> Result<()> {
    let receipt = session.claim(key)?;
    let title = find_definition(receipt.key).map_or(receipt.key, |a| a.title);
    println!("Claimed {}: +{} coins (balance {})", title, receipt.coins, receipt.total_coins);
    if receipt.xp > 0 {
        println!("  +{} XP", receipt.xp);
    }
    Ok(())
}
