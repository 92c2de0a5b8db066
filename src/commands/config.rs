use crate::core::Config;
use anyhow::{Context, Result};
use colored::Colorize;
use std::path::Path;

pub fn execute(matches: &clap::ArgMatches) -> Result<()> {
    let path = Config::get_config_path()?;

    match matches.subcommand() {
        Some(("show", _)) => {
            let config = Config::load_from(&path)?;
            print_config(&config, &path);
        }
        Some(("reset", _)) => {
            reset(&path)?;
            println!("{}", "Configuration reset to defaults.".green().bold());
        }
        Some(("set", sub_matches)) => {
            let key = sub_matches
                .get_one::<String>("key")
                .context("Setting name is required")?;
            let value = sub_matches
                .get_one::<String>("value")
                .context("Value is required")?;

            set_value(&path, key, value)?;
            println!(
                "{} {} = {}",
                "✓".green().bold(),
                key.white().bold(),
                value.cyan()
            );
        }
        _ => {
            println!("Use 'lpm config --help' for more information.");
        }
    }

    Ok(())
}

/// Update one setting in the file at `path` and return the saved config
pub fn set_value(path: &Path, key: &str, value: &str) -> Result<Config> {
    let mut config = Config::load_from(path)?;
    config.set(key, value)?;
    config.save_to(path).context("Failed to save configuration")?;
    Ok(config)
}

/// Overwrite the file at `path` with defaults
pub fn reset(path: &Path) -> Result<Config> {
    let config = Config::default();
    config.save_to(path).context("Failed to save configuration")?;
    Ok(config)
}

fn print_config(config: &Config, path: &Path) {
    let history = match config.history_capacity {
        Some(capacity) => format!("{} points", capacity),
        None => "unbounded".to_string(),
    };

    println!("{}", "Configuration".white().bold());
    println!("  {:<10} {}", "file", path.display().to_string().dimmed());
    println!("  {:<10} {}s", "interval", config.interval_secs());
    println!("  {:<10} {}", "sort", config.sort_mode);
    println!("  {:<10} {}", "theme", config.theme);
    println!("  {:<10} {}", "history", history);
}
