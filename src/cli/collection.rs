//! Collection commands: classify, add, list, favorite, note, delete

use anyhow::Result;
use std::path::Path;

use car_collector::classifier::{self, ClassificationSource};
use car_collector::config::Config;
use car_collector::progression::AchievementDefinition;
use car_collector::session::DefaultSession;

/// Classify a name without saving anything
pub fn classify_command(config: &Config, name: &str) -> Result<()> {
    let classifier = classifier::from_settings(&config.classifier);
    let result = classifier.classify_detailed(name);

    let source = match &result.source {
        ClassificationSource::Keyword(keyword) => format!("keyword \"{}\"", keyword),
        ClassificationSource::Semantic => "semantic classifier".to_string(),
        ClassificationSource::Defaulted => "default (no keyword, fallback unavailable)".to_string(),
    };

    println!("{}: {} ({} points)", name, result.tier, result.tier.points());
    println!("  decided by {}", source);
    Ok(())
}

pub fn add_command(session: &mut DefaultSession, name: &str, image: Option<&Path>) -> Result<()> {
    let added = session.add_car(name, image)?;
    let car = &added.car;

    println!("Collected {} [{}] +{} points", car.name, car.rarity, car.points);
    println!("  id: {}", car.id);
    print_unlocked(&added.unlocked);

    let stats = session.progression().player_stats();
    println!("  Level {} ({} points)", stats.level, stats.total_points);
    Ok(())
}

pub fn list_command(session: &DefaultSession, json: bool) -> Result<()> {
    let mut cars = session.progression().cars().to_vec();
    cars.sort_by(|a, b| b.captured_at.cmp(&a.captured_at));

    if json {
        println!("{}", serde_json::to_string_pretty(&cars)?);
        return Ok(());
    }

    if cars.is_empty() {
        println!("No cars collected yet.");
        return Ok(());
    }

    println!("Cars ({}):\n", cars.len());
    for car in cars {
        let star = if car.favorite { "*" } else { " " };
        println!(
            " {} {} [{}] {} pts - {}",
            star,
            car.name,
            car.rarity,
            car.points,
            car.captured_at.format("%Y-%m-%d %H:%M")
        );
        println!("    id: {}", car.id);
        if let Some(note) = &car.note {
            println!("    {}", note);
        }
    }
    Ok(())
}

pub fn favorite_command(session: &mut DefaultSession, id: &str, off: bool) -> Result<()> {
    let unlocked = session.set_favorite(id, !off)?;
    println!("{} {}", if off { "Unfavorited" } else { "Favorited" }, id);
    print_unlocked(&unlocked);
    Ok(())
}

pub fn note_command(session: &mut DefaultSession, id: &str, text: Option<String>) -> Result<()> {
    let clearing = text.as_deref().is_none_or(|t| t.trim().is_empty());
    let unlocked = session.set_note(id, text)?;
    println!("{} note on {}", if clearing { "Cleared" } else { "Saved" }, id);
    print_unlocked(&unlocked);
    Ok(())
}

pub fn delete_command(session: &mut DefaultSession, id: &str) -> Result<()> {
    let removed = session.delete(id)?;
    println!("Deleted {} ({} points)", removed.name, removed.points);
    Ok(())
}

pub(crate) fn print_unlocked(unlocked: &[&'static AchievementDefinition]) {
    for achievement in unlocked {
        println!(
            "  Achievement unlocked: {} - {} (+{} coins to claim)",
            achievement.title, achievement.description, achievement.coin_reward
        );
    }
}
