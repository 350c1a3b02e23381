use colored::Colorize;
use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::Config;

pub fn run(command: ConfigCommands) -> anyhow::Result<()> {
    match command {
        ConfigCommands::Show => show(),
        ConfigCommands::Set { key, value } => set(&key, &value),
    }
}

fn show() -> anyhow::Result<()> {
    let path = Config::path()?;
    let config = if path.exists() {
        Config::load_from(&path)?
    } else {
        Config::default()
    };

    println!("{} {}", "Config file:".bold(), path.display());
    if !path.exists() {
        println!("{}", "(not created yet, showing defaults)".dimmed());
    }
    println!();
    println!(
        "  defaults.theme        {}",
        config.default_theme().unwrap_or("(from deck, else network)")
    );
    println!(
        "  defaults.start_slide  {}",
        config
            .start_slide()
            .map_or_else(|| "1".to_string(), |n| n.to_string())
    );
    println!("  print.output          {}", config.print_output().display());
    Ok(())
}

fn set(key: &str, value: &str) -> anyhow::Result<()> {
    let path = Config::path()?;
    set_at(&path, key, value)?;
    println!("{} {key} = {value}", "Saved".green().bold());
    Ok(())
}

/// Update one key in the config at `path`. A file that fails to parse is
/// left alone rather than replaced by defaults.
fn set_at(path: &Path, key: &str, value: &str) -> anyhow::Result<()> {
    let mut config = Config::load_if_exists_from(path)?;
    config.set(key, value)?;
    config.save_to(path)?;
    log::debug!("wrote {}", path.display());
    Ok(())
}
