//! Shell command - interactive session
//!
//! Reads one command per line and re-renders the table after every change.
//! Rows are addressed by their 1-based position in the visible list, so the
//! numbers always match the last table printed.

use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use colored::Colorize;
use dialoguer::Input;
use dialoguer::theme::ColorfulTheme;

use crate::archive::ExportOptions;
use crate::record::RecordId;
use crate::rename::RenameOp;
use crate::session::Session;
use crate::walker::WalkOptions;
use crate::{RenamrError, output};

type Result<T> = std::result::Result<T, RenamrError>;

const HELP: &str = "\
Commands:
  add <path>...             Collect files or folders
  filter [text]             Show only matching files (no text clears the filter)
  select all|none|<row>...  Select visible rows
  toggle <row>...           Flip selection of rows
  lower | upper             Change case of selected visible names
  replace <find> [with]     Replace every occurrence of text in names
  regex <pattern> [with]    Replace regex matches in names
  list                      Show the table again
  export [file]             Write all files to a zip archive
  help                      Show this help
  quit                      Leave the shell

Quote arguments containing spaces: replace \"old name\" \"new name\"";

/// One parsed shell line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Add(Vec<PathBuf>),
    Filter(String),
    SelectAll,
    SelectNone,
    Select(Vec<usize>),
    Toggle(Vec<usize>),
    Rename(RenameOp),
    List,
    Export(Option<PathBuf>),
    Help,
    Quit,
}

impl ShellCommand {
    /// Parse a line; blank lines yield `None`
    ///
    /// # Errors
    /// Returns `RenamrError::InvalidInput` for an unknown command or bad arguments.
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let tokens = tokenize(line)?;
        let Some((head, args)) = tokens.split_first() else {
            return Ok(None);
        };

        let command = match head.to_lowercase().as_str() {
            "add" | "a" => {
                if args.is_empty() {
                    return Err(usage("add <path>..."));
                }
                Self::Add(args.iter().map(PathBuf::from).collect())
            }
            "filter" | "f" => Self::Filter(args.join(" ")),
            "select" | "s" => match args {
                [one] if one.eq_ignore_ascii_case("all") => Self::SelectAll,
                [one] if one.eq_ignore_ascii_case("none") => Self::SelectNone,
                [] => return Err(usage("select all|none|<row>...")),
                rows => Self::Select(parse_rows(rows)?),
            },
            "toggle" | "t" => {
                if args.is_empty() {
                    return Err(usage("toggle <row>..."));
                }
                Self::Toggle(parse_rows(args)?)
            }
            "lower" => Self::Rename(RenameOp::Lowercase),
            "upper" => Self::Rename(RenameOp::Uppercase),
            "replace" => match args {
                [find] => Self::Rename(RenameOp::FindReplace {
                    find: find.clone(),
                    replace: String::new(),
                }),
                [find, replace] => Self::Rename(RenameOp::FindReplace {
                    find: find.clone(),
                    replace: replace.clone(),
                }),
                _ => return Err(usage("replace <find> [with]")),
            },
            "regex" => match args {
                [pattern] => Self::Rename(RenameOp::RegexReplace {
                    pattern: pattern.clone(),
                    replacement: String::new(),
                }),
                [pattern, replacement] => Self::Rename(RenameOp::RegexReplace {
                    pattern: pattern.clone(),
                    replacement: replacement.clone(),
                }),
                _ => return Err(usage("regex <pattern> [with]")),
            },
            "list" | "ls" => Self::List,
            "export" | "x" => match args {
                [] => Self::Export(None),
                [path] => Self::Export(Some(PathBuf::from(path))),
                _ => return Err(usage("export [file]")),
            },
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            other => {
                return Err(RenamrError::InvalidInput(format!(
                    "Unknown command '{other}'. Type 'help' for a list of commands"
                )));
            }
        };
        Ok(Some(command))
    }
}

fn usage(text: &str) -> RenamrError {
    RenamrError::InvalidInput(format!("Usage: {text}"))
}

fn parse_rows(args: &[String]) -> Result<Vec<usize>> {
    args.iter()
        .map(|a| match a.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(RenamrError::InvalidInput(format!("Invalid row number: '{a}'"))),
        })
        .collect()
}

/// Split on whitespace, keeping single- or double-quoted runs together
fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut in_token = false;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_token = true;
            }
            None if c.is_whitespace() => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            None => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quote.is_some() {
        return Err(RenamrError::InvalidInput("Unterminated quote".into()));
    }
    if in_token {
        tokens.push(current);
    }
    Ok(tokens)
}

/// Whether the loop should keep reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Interactive front end over a [`Session`]
pub struct Shell {
    session: Session,
    walk: WalkOptions,
    export: ExportOptions,
    output: PathBuf,
    quiet: bool,
}

impl Shell {
    #[must_use]
    pub const fn new(session: Session, walk: WalkOptions, export: ExportOptions, output: PathBuf, quiet: bool) -> Self {
        Self {
            session,
            walk,
            export,
            output,
            quiet,
        }
    }

    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }

    /// Parse and run one line
    ///
    /// # Errors
    /// Returns the error of the failed command; the session is unchanged
    /// unless the command partially succeeded.
    pub fn run_line(&mut self, line: &str) -> Result<Flow> {
        match ShellCommand::parse(line)? {
            Some(command) => self.run(command),
            None => Ok(Flow::Continue),
        }
    }

    /// Run a parsed command
    ///
    /// # Errors
    /// Returns `RenamrError::Walk` if a path cannot be added,
    /// `RenamrError::InvalidInput` for a row outside the visible list,
    /// `RenamrError::Rename` for an invalid pattern and
    /// `RenamrError::Export` if the archive cannot be written.
    pub fn run(&mut self, command: ShellCommand) -> Result<Flow> {
        match command {
            ShellCommand::Add(paths) => {
                let added = self.session.add_paths(&paths, &self.walk)?;
                if !self.quiet {
                    println!("Added {added} file(s)");
                }
                self.render();
            }
            ShellCommand::Filter(query) => {
                self.session.set_filter(query);
                self.render();
            }
            ShellCommand::SelectAll => {
                self.session.select_all();
                self.render();
            }
            ShellCommand::SelectNone => {
                self.session.deselect_all();
                self.render();
            }
            ShellCommand::Select(rows) => {
                for id in self.row_ids(&rows)? {
                    if !self.session.selection().contains(id) {
                        self.session.toggle(id)?;
                    }
                }
                self.render();
            }
            ShellCommand::Toggle(rows) => {
                for id in self.row_ids(&rows)? {
                    self.session.toggle(id)?;
                }
                self.render();
            }
            ShellCommand::Rename(op) => {
                let plan = self.session.apply(&op)?;
                if !self.quiet {
                    output::print_summary(&op.label(), &plan);
                }
                self.render();
            }
            ShellCommand::List => output::print_table(&self.session, self.quiet),
            ShellCommand::Export(path) => {
                if self.session.records().is_empty() {
                    return Err(RenamrError::InvalidInput("Nothing to export yet".into()));
                }
                let path = path.unwrap_or_else(|| self.output.clone());
                super::rename::export_to(&self.session, &path, &self.export, self.quiet)?;
            }
            ShellCommand::Help => println!("{HELP}"),
            ShellCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Resolve 1-based visible rows to record ids, failing before any change
    fn row_ids(&self, rows: &[usize]) -> Result<Vec<RecordId>> {
        let visible = self.session.visible();
        rows.iter()
            .map(|&row| {
                row.checked_sub(1)
                    .and_then(|i| visible.get(i))
                    .map(|r| r.id)
                    .ok_or_else(|| RenamrError::InvalidInput(format!("No row {row} (showing {})", visible.len())))
            })
            .collect()
    }

    fn render(&self) {
        if !self.quiet {
            println!();
        }
        output::print_table(&self.session, self.quiet);
    }
}

/// Execute the shell command
///
/// Reads from a prompt when stdin is a terminal, otherwise one command per
/// input line. Failed commands are reported and the loop continues.
///
/// # Errors
/// Returns `RenamrError::IoError` if stdin cannot be read.
pub fn execute(session: Session, walk: WalkOptions, export: ExportOptions, output_path: PathBuf, quiet: bool) -> Result<()> {
    let interactive = io::stdin().is_terminal();
    let mut shell = Shell::new(session, walk, export, output_path, quiet);

    if interactive && !quiet {
        println!("Type 'help' for commands, 'quit' to leave.\n");
    }
    output::print_table(shell.session(), quiet);

    if interactive {
        let theme = ColorfulTheme::default();
        loop {
            let line = match Input::<String>::with_theme(&theme)
                .with_prompt("renamr")
                .allow_empty(true)
                .interact_text()
            {
                Ok(line) => line,
                Err(e) => {
                    log::debug!("prompt closed: {e}");
                    break;
                }
            };
            if step(&mut shell, &line) == Flow::Quit {
                break;
            }
        }
    } else {
        for line in io::stdin().lock().lines() {
            if step(&mut shell, &line?) == Flow::Quit {
                break;
            }
        }
    }
    Ok(())
}

fn step(shell: &mut Shell, line: &str) -> Flow {
    shell.run_line(line).unwrap_or_else(|e| {
        eprintln!("{} {e}", "Error:".red());
        Flow::Continue
    })
}
