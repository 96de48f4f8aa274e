//! Renamr CLI application entry point
//!
//! Collects files and folders, renames them in bulk and exports the result
//! as a single zip archive.
//!
//! # Usage
//!
//! ```bash
//! # Interactive session (default command)
//! renamr
//! renamr shell photos/ notes.txt
//!
//! # Show what was collected
//! renamr list photos/ --filter jpg
//!
//! # Rename and export in one go
//! renamr rename photos/ --lower --find IMG_ --replace holiday- -o holiday.zip
//!
//! # Quiet mode (only output results)
//! renamr -q rename docs/ --upper -y
//! ```
//!
//! # Configuration
//!
//! Defaults live in the user's config directory
//! (`~/.config/renamr/config.toml` on Linux) and are created on first run.

use env_logger::Env;
use renamr::{
    RenamrError,
    cli::{Cli, Commands},
    commands,
    config::RenamrConfig,
};

type Result<T> = std::result::Result<T, RenamrError>;

/// Main entry point for the renamr application
///
/// Parses command-line arguments, loads configuration and dispatches to the
/// appropriate command handler.
///
/// # Errors
///
/// Returns `RenamrError` if configuration loading fails, a path cannot be
/// scanned or any command handler returns an error.
fn main() -> Result<()> {
    let cli = Cli::parse_args();

    env_logger::Builder::from_env(Env::default().default_filter_or(cli.log_level()))
        .format_timestamp(None)
        .init();

    let config = RenamrConfig::load()?;
    let quiet = cli.quiet || config.quiet;
    log::debug!("loaded config: {config:?}");

    match cli.get_command() {
        Commands::Shell { paths, walk } => {
            let walk = walk.options(&config);
            let session = commands::collect(&paths, &walk, quiet || paths.is_empty())?;
            commands::shell(
                session,
                walk,
                config.export_options(),
                config.output_name.clone().into(),
                quiet,
            )?;
        }
        Commands::List {
            paths,
            filter,
            format,
            walk,
        } => {
            let mut session = commands::collect(&paths, &walk.options(&config), true)?;
            commands::list(&mut session, filter.as_deref(), format, quiet)?;
        }
        Commands::Rename(args) => {
            let ops = args.ops();
            if ops.is_empty() {
                return Err(RenamrError::InvalidInput(
                    "Nothing to do. Pass --lower, --upper or --find".into(),
                ));
            }
            let mut session = commands::collect(&args.paths, &args.walk.options(&config), quiet)?;
            commands::rename(
                &mut session,
                args.filter.as_deref(),
                &ops,
                &args.export.output_path(&config),
                &args.export.options(&config),
                args.dry_run,
                args.yes,
                quiet,
            )?;
        }
        Commands::Config { command } => commands::config(config, &command, quiet)?,
    }

    Ok(())
}
