//! Configuration module for renamr
//!
//! Holds defaults for scanning and exporting. Configuration is stored as
//! TOML in the user's config directory; any key can be overridden with a
//! `RENAMR_`-prefixed environment variable (e.g. `RENAMR_LAYOUT=nested`).

use std::fs;
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::archive::{ArchiveLayout, Compression, ExportOptions};
use crate::walker::WalkOptions;

/// Default archive file name
pub const DEFAULT_OUTPUT_NAME: &str = "renamed-files.zip";

/// Keys accepted by [`RenamrConfig::set`] and [`RenamrConfig::get`]
pub const KEYS: &[&str] = &[
    "output_name",
    "layout",
    "compression",
    "sort_entries",
    "follow_links",
    "include_hidden",
    "quiet",
];

/// Application configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct RenamrConfig {
    /// File name used when no output path is given
    pub output_name: String,

    /// Flat (display names only) or nested (keep directories) archive layout
    pub layout: ArchiveLayout,

    pub compression: Compression,

    /// Visit directory contents by name rather than in the order the OS reports
    pub sort_entries: bool,

    pub follow_links: bool,

    /// Collect dotfiles and dot-directories
    pub include_hidden: bool,

    /// Suppress informational output by default
    pub quiet: bool,
}

impl Default for RenamrConfig {
    fn default() -> Self {
        Self {
            output_name: DEFAULT_OUTPUT_NAME.to_string(),
            layout: ArchiveLayout::default(),
            compression: Compression::default(),
            sort_entries: false,
            follow_links: false,
            include_hidden: true,
            quiet: false,
        }
    }
}

impl RenamrConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("renamr").join("config.toml"))
    }

    /// Load configuration from the user config file, creating a default one if missing
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config file cannot be read, parsed, or created.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let default_config = Self::default();
            default_config.save_to(&config_path)?;
            return Ok(default_config);
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific file, layering environment overrides on top
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or a value has the wrong type.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::build(path, true)
    }

    /// Load only what is stored in the file, ignoring `RENAMR_*` overrides
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file cannot be read or a value has the wrong type.
    pub fn load_stored(path: &Path) -> Result<Self, ConfigError> {
        Self::build(path, false)
    }

    fn build(path: &Path, with_env: bool) -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(File::from(path).format(FileFormat::Toml).required(false));
        if with_env {
            builder = builder.add_source(Environment::with_prefix("RENAMR").try_parsing(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Set a value by key from its string form
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` for an unknown key or a value that does not parse.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        match key {
            "output_name" => {
                if value.trim().is_empty() {
                    return Err(ConfigError::Message("output_name cannot be empty".into()));
                }
                self.output_name = value.to_string();
            }
            "layout" => self.layout = parse_enum(key, value)?,
            "compression" => self.compression = parse_enum(key, value)?,
            "sort_entries" => self.sort_entries = parse_bool(key, value)?,
            "follow_links" => self.follow_links = parse_bool(key, value)?,
            "include_hidden" => self.include_hidden = parse_bool(key, value)?,
            "quiet" => self.quiet = parse_bool(key, value)?,
            _ => {
                return Err(ConfigError::Message(format!(
                    "Unknown config key '{key}'. Valid keys: {}",
                    KEYS.join(", ")
                )));
            }
        }
        Ok(())
    }

    /// Get a value by key in its string form
    #[must_use]
    pub fn get(&self, key: &str) -> Option<String> {
        Some(match key {
            "output_name" => self.output_name.clone(),
            "layout" => enum_name(self.layout),
            "compression" => enum_name(self.compression),
            "sort_entries" => self.sort_entries.to_string(),
            "follow_links" => self.follow_links.to_string(),
            "include_hidden" => self.include_hidden.to_string(),
            "quiet" => self.quiet.to_string(),
            _ => return None,
        })
    }

    #[must_use]
    pub const fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            follow_links: self.follow_links,
            include_hidden: self.include_hidden,
            sort_by_name: self.sort_entries,
        }
    }

    #[must_use]
    pub const fn export_options(&self) -> ExportOptions {
        ExportOptions {
            layout: self.layout,
            compression: self.compression,
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::Message(format!("Invalid value for {key}: '{value}' (expected true or false)")))
}

fn parse_enum<T: ValueEnum>(key: &str, value: &str) -> Result<T, ConfigError> {
    T::from_str(value, true).map_err(|e| ConfigError::Message(format!("Invalid value for {key}: {e}")))
}

fn enum_name<T: ValueEnum>(value: T) -> String {
    value
        .to_possible_value()
        .map_or_else(String::new, |v| v.get_name().to_string())
}
