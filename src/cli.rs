//! Command-line interface definitions and parsing
//!
//! This module defines the complete CLI structure for renamr using the `clap` crate.
//!
//! # Commands
//!
//! - **shell**: Interactive session: add files, filter, select, rename, export (default)
//! - **list**: Show the collected files as a table or JSON
//! - **rename**: One-shot rename of collected files followed by a zip export
//! - **config**: Show or change configuration
//!
//! # Examples
//!
//! ```bash
//! # Lowercase every jpg under photos/ and write renamed-files.zip
//! renamr rename photos/ --filter jpg --lower
//!
//! # Preview a find/replace without writing anything
//! renamr rename docs/ --find draft --replace final --dry-run
//! ```

use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use crate::archive::{ArchiveLayout, Compression, ExportOptions};
use crate::config::RenamrConfig;
use crate::rename::RenameOp;
use crate::walker::WalkOptions;

/// Listing format
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human readable table
    #[default]
    Table,
    /// JSON array of records
    Json,
}

/// Case transform applied before any find/replace
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseOp {
    Lower,
    Upper,
}

impl From<CaseOp> for RenameOp {
    fn from(value: CaseOp) -> Self {
        match value {
            CaseOp::Lower => Self::Lowercase,
            CaseOp::Upper => Self::Uppercase,
        }
    }
}

/// Flags controlling how folders are read (override config)
#[derive(Parser, Debug, Clone, Default)]
pub struct WalkArgs {
    /// Visit folder contents sorted by name
    #[arg(long = "sort")]
    pub sort: bool,

    /// Follow symbolic links while scanning folders
    #[arg(long = "follow-links")]
    pub follow_links: bool,

    /// Skip dotfiles and dot-directories
    #[arg(long = "no-hidden")]
    pub no_hidden: bool,
}

impl WalkArgs {
    /// Layer these flags over the configured defaults
    #[must_use]
    pub const fn options(&self, config: &RenamrConfig) -> WalkOptions {
        let base = config.walk_options();
        WalkOptions {
            follow_links: base.follow_links || self.follow_links,
            include_hidden: base.include_hidden && !self.no_hidden,
            sort_by_name: base.sort_by_name || self.sort,
        }
    }
}

/// Where and how to write the archive (override config)
#[derive(Parser, Debug, Clone, Default)]
pub struct ExportArgs {
    /// Output archive path (defaults to the configured output name)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Archive layout
    #[arg(long = "layout", value_enum)]
    pub layout: Option<ArchiveLayout>,

    /// Entry compression
    #[arg(long = "compression", value_enum)]
    pub compression: Option<Compression>,
}

impl ExportArgs {
    #[must_use]
    pub fn output_path(&self, config: &RenamrConfig) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(&config.output_name))
    }

    #[must_use]
    pub fn options(&self, config: &RenamrConfig) -> ExportOptions {
        let base = config.export_options();
        ExportOptions {
            layout: self.layout.unwrap_or(base.layout),
            compression: self.compression.unwrap_or(base.compression),
        }
    }
}

/// Arguments of the rename command
#[derive(Parser, Debug, Clone)]
pub struct RenameArgs {
    /// Files or folders to collect
    #[arg(value_name = "PATH", required = true)]
    pub paths: Vec<PathBuf>,

    /// Only rename files matching this text (name, type or path, case-insensitive)
    #[arg(short = 'f', long = "filter", value_name = "QUERY")]
    pub filter: Option<String>,

    /// Convert names to lowercase
    #[arg(long = "lower", conflicts_with = "upper")]
    pub lower: bool,

    /// Convert names to uppercase
    #[arg(long = "upper", conflicts_with = "lower")]
    pub upper: bool,

    /// Text to find in names
    #[arg(long = "find", value_name = "TEXT")]
    pub find: Option<String>,

    /// Replacement text for --find
    #[arg(long = "replace", value_name = "TEXT", requires = "find")]
    pub replace: Option<String>,

    /// Treat --find as a regular expression
    #[arg(short = 'r', long = "regex", requires = "find")]
    pub regex: bool,

    /// Preview changes without writing the archive
    #[arg(short = 'n', long = "dry-run")]
    pub dry_run: bool,

    /// Skip confirmation prompt
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    #[command(flatten)]
    pub walk: WalkArgs,

    #[command(flatten)]
    pub export: ExportArgs,
}

impl RenameArgs {
    /// Operations to run, case transform first
    #[must_use]
    pub fn ops(&self) -> Vec<RenameOp> {
        let mut ops = Vec::new();
        if self.lower {
            ops.push(CaseOp::Lower.into());
        } else if self.upper {
            ops.push(CaseOp::Upper.into());
        }
        if let Some(find) = &self.find {
            let replacement = self.replace.clone().unwrap_or_default();
            ops.push(if self.regex {
                RenameOp::RegexReplace {
                    pattern: find.clone(),
                    replacement,
                }
            } else {
                RenameOp::FindReplace {
                    find: find.clone(),
                    replace: replacement,
                }
            });
        }
        ops
    }
}

/// Configuration management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigCommands {
    /// Print the effective configuration
    Show,

    /// Print the path of the configuration file
    Path,

    /// Set a configuration value
    Set {
        /// Configuration key=value (e.g., layout=nested)
        #[arg(value_name = "KEY=VALUE")]
        setting: String,
    },

    /// Get a configuration value
    Get {
        /// Configuration key to retrieve (e.g., output_name)
        #[arg(value_name = "KEY")]
        key: String,
    },
}

/// Main CLI structure for parsing command-line arguments
#[derive(Parser, Debug)]
#[command(name = "renamr")]
#[command(about = "Batch rename files and export them as one zip", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Start an interactive session (default)
    #[command(visible_alias = "sh")]
    Shell {
        /// Files or folders to start with
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        walk: WalkArgs,
    },

    /// List collected files
    #[command(visible_alias = "ls")]
    List {
        /// Files or folders to collect
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,

        /// Only show files matching this text
        #[arg(short = 'f', long = "filter", value_name = "QUERY")]
        filter: Option<String>,

        /// Output format
        #[arg(long = "format", value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        #[command(flatten)]
        walk: WalkArgs,
    },

    /// Rename collected files and export them as a zip archive
    #[command(visible_alias = "r")]
    Rename(RenameArgs),

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to an empty interactive session
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Shell {
            paths: Vec::new(),
            walk: WalkArgs::default(),
        })
    }

    /// Log filter derived from `-v` flags
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
