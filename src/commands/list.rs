//! List command - show collected files

use crate::{RenamrError, cli::OutputFormat, output, session::Session};

type Result<T> = std::result::Result<T, RenamrError>;

/// Execute the list command
///
/// # Errors
/// Returns `RenamrError::InvalidInput` if JSON serialization fails.
pub fn execute(session: &mut Session, filter: Option<&str>, format: OutputFormat, quiet: bool) -> Result<()> {
    if let Some(query) = filter {
        session.set_filter(query);
    }

    match format {
        OutputFormat::Table => output::print_table(session, quiet),
        OutputFormat::Json => {
            let json = output::records_json(session)
                .map_err(|e| RenamrError::InvalidInput(format!("Failed to serialize records: {e}")))?;
            println!("{json}");
        }
    }
    Ok(())
}
