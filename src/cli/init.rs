//! Init command implementation

use anyhow::{Result, bail};
use std::path::PathBuf;

use car_collector::config::Config;

/// Default configuration content for car-collector init
pub const DEFAULT_CONFIG: &str = r#"# Car Collector Configuration
# ===========================
#
# Cars are classified by keyword first. Names with no keyword hit are sent
# to the semantic classifier; if that is disabled or fails, the car is Common.

# ============================================================================
# CLASSIFIER - Rarity classification
# ============================================================================
#
# Available options:
#   enabled        - Use the semantic classifier for keyword misses (default: true)
#   endpoint       - Generative Language API base URL
#   model          - Model used for one-word rarity answers
#   api_key_env    - Environment variable holding the API key (default: GEMINI_API_KEY)
#   timeout_secs   - Request timeout; slow answers default to Common (default: 10)

[classifier]
enabled = true
endpoint = "https://generativelanguage.googleapis.com/v1beta"
model = "gemini-2.0-flash"
api_key_env = "GEMINI_API_KEY"
timeout_secs = 10

# Extra keywords per tier, checked together with the built-in lists.
# Rarer tiers still win: a name matching Rare and Common keywords is Rare.
#
#   Rare = ["lada niva 4x4"]
#   Exotic = ["de tomaso"]
[classifier.extra_keywords]

# ============================================================================
# STORAGE
# ============================================================================
#
#   database - SQLite file for the collection (default: ~/.car-collector/collection.db)

[storage]
# database = "/path/to/collection.db"
"#;

/// Write the default configuration file
pub fn init_command(config_path: Option<PathBuf>, force: bool) -> Result<()> {
    let config_path = config_path.unwrap_or_else(Config::global_config_path);

    if config_path.exists() && !force {
        bail!(
            "Configuration already exists: {}\nUse --force to overwrite.",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&config_path, DEFAULT_CONFIG)?;
    println!("Created: {}", config_path.display());

    Ok(())
}
