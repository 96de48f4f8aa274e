//! Config command - show or change persisted settings

use std::path::Path;

use crate::cli::ConfigCommands;
use crate::config::{KEYS, RenamrConfig};
use crate::RenamrError;

type Result<T> = std::result::Result<T, RenamrError>;

/// Execute a config subcommand against the user config file
///
/// `show` and `get` report the effective configuration; `set` edits only
/// what is stored in the file.
///
/// # Errors
/// Returns `RenamrError::InvalidInput` for a malformed setting or an unknown
/// key passed to `get`, and `RenamrError::ConfigError` for an unknown key or
/// bad value passed to `set`, or if the file cannot be read or written.
pub fn execute(config: RenamrConfig, command: &ConfigCommands, quiet: bool) -> Result<()> {
    let path = RenamrConfig::config_path()?;
    execute_at(config, command, &path, quiet)
}

fn execute_at(config: RenamrConfig, command: &ConfigCommands, path: &Path, quiet: bool) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let text = toml::to_string_pretty(&config)
                .map_err(|e| RenamrError::InvalidInput(format!("Failed to serialize config: {e}")))?;
            print!("{text}");
        }
        ConfigCommands::Path => println!("{}", path.display()),
        ConfigCommands::Set { setting } => {
            let (key, value) = parse_setting(setting)?;
            let mut stored = RenamrConfig::load_stored(path)?;
            stored.set(key, value)?;
            stored.save_to(path)?;
            if !quiet {
                println!("Set {key} = {value}");
            }
        }
        ConfigCommands::Get { key } => {
            let value = config.get(key).ok_or_else(|| {
                RenamrError::InvalidInput(format!(
                    "Unknown configuration key: '{key}'. Available keys: {}",
                    KEYS.join(", ")
                ))
            })?;
            println!("{value}");
        }
    }
    Ok(())
}

fn parse_setting(setting: &str) -> Result<(&str, &str)> {
    setting
        .split_once('=')
        .map(|(k, v)| (k.trim(), v.trim()))
        .filter(|(k, _)| !k.is_empty())
        .ok_or_else(|| RenamrError::InvalidInput("Invalid format. Use: renamr config set key=value".into()))
}
