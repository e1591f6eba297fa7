mod types;

pub use types::*;

use anyhow::{Context, Result};
use evenue_common::CountryCode;
use evenue_db::models::validate_email;
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = [
        "./evenue.toml",
        "./config.toml",
        "~/.config/evenue/config.toml",
        "/etc/evenue/config.toml",
    ];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            tracing::debug!("Using config file {:?}", path);
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let db = &config.database;
    if db.pool_size == 0 {
        anyhow::bail!("Database pool size cannot be 0");
    }
    match &db.url {
        Some(url) if url.trim().is_empty() => anyhow::bail!("Database url cannot be empty"),
        Some(_) => {
            db.to_pg_config()?;
        }
        None => {
            if db.port == 0 {
                anyhow::bail!("Database port cannot be 0");
            }
            if db.dbname.trim().is_empty() {
                anyhow::bail!("Database name cannot be empty");
            }
            if db.user.trim().is_empty() {
                anyhow::bail!("Database user cannot be empty");
            }
        }
    }

    let showcase = &config.showcase;
    CountryCode::new(&showcase.country)
        .map_err(|e| anyhow::anyhow!("showcase.country: {}", e))?;
    validate_email(&showcase.attendee_email).context("showcase.attendee_email")?;
    if showcase.party_title.trim().is_empty() {
        anyhow::bail!("showcase.party_title cannot be empty");
    }
    let zip_len = showcase.zip_code.chars().count();
    if zip_len == 0 || zip_len > 12 {
        anyhow::bail!(
            "showcase.zip_code must be 1 to 12 characters, got {:?}",
            showcase.zip_code
        );
    }
    if let (Some(start), Some(end)) = (showcase.window_start, showcase.window_end) {
        if start > end {
            anyhow::bail!(
                "showcase.window_start {} is after showcase.window_end {}",
                start,
                end
            );
        }
    }

    Ok(())
}

/// Replace the connection settings with a connection string.
pub fn apply_database_url(config: &mut Config, url: Option<&str>) {
    if let Some(url) = url {
        config.database.url = Some(url.to_string());
    }
}
