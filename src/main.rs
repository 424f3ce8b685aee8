use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use car_collector::config::Config;
use car_collector::session::DefaultSession;

mod cli;

#[derive(Parser)]
#[command(name = "car-collector")]
#[command(about = "Car Collector - collect cars, earn points, unlock achievements")]
#[command(version)]
struct Cli {
    /// Path to the config file (defaults to ~/.car-collector/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ~/.car-collector/config.toml configuration file
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Show the rarity a car name would get, without saving it
    Classify {
        /// Car name, e.g. "2019 Lamborghini Huracan EVO"
        name: String,
    },

    /// Add an identified car to the collection
    Add {
        name: String,

        /// Photo to keep with the car
        #[arg(long)]
        image: Option<PathBuf>,
    },

    /// List the collection, newest first
    List {
        #[arg(long)]
        json: bool,
    },

    /// Mark a car as favorite
    Favorite {
        id: String,

        /// Remove the favorite mark instead
        #[arg(long)]
        off: bool,
    },

    /// Set a car's note; omit TEXT to clear it
    Note { id: String, text: Option<String> },

    /// Delete a car and its photo
    Delete { id: String },

    /// Show level and progress
    Level,

    /// Show achievements
    Achievements {
        /// Only this category (Collection, Rarity, Points, Level, Specific, Dedication)
        #[arg(long)]
        category: Option<String>,

        /// Only unlocked achievements waiting to be claimed
        #[arg(long)]
        unclaimed: bool,

        #[arg(long)]
        json: bool,
    },

    /// Claim the coin reward of an unlocked achievement
    Claim { key: String },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = match &cli.command {
        Commands::Init { force } => return cli::init::init_command(cli.config, *force),
        _ => Config::load(cli.config.as_deref())?,
    };

    if let Commands::Classify { name } = &cli.command {
        return cli::collection::classify_command(&config, name);
    }

    let mut session = DefaultSession::from_config(&config)?;

    match cli.command {
        Commands::Add { name, image } => {
            cli::collection::add_command(&mut session, &name, image.as_deref())?;
        }
        Commands::List { json } => {
            cli::collection::list_command(&session, json)?;
        }
        Commands::Favorite { id, off } => {
            cli::collection::favorite_command(&mut session, &id, off)?;
        }
        Commands::Note { id, text } => {
            cli::collection::note_command(&mut session, &id, text)?;
        }
        Commands::Delete { id } => {
            cli::collection::delete_command(&mut session, &id)?;
        }
        Commands::Level => {
            cli::rewards::level_command(&session)?;
        }
        Commands::Achievements {
            category,
            unclaimed,
            json,
        } => {
            cli::rewards::achievements_command(&mut session, category, unclaimed, json)?;
        }
        Commands::Claim { key } => {
            cli::rewards::claim_command(&mut session, &key)?;
        }
        Commands::Init { .. } | Commands::Classify { .. } => {}
    }

    Ok(())
}
