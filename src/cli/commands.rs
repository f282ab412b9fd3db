use std::collections::HashSet;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;

use anyhow::{Context, Result, bail};

use super::{AddArgs, Cli, Commands, DirectoryArgs};
use crate::config::{Config, DEFAULT_CONFIG_CONTENT};
use crate::models::{HistoryEntry, NewEntry};
use crate::recorder::{RecordError, RecordOptions, RecordOutcome, record_command};
use crate::session::SearchSession;
use crate::store::{HistoryStore, SqliteStore};
use crate::tui::run_interactive;
use crate::utils::environment::{hostname, tty, username};
use crate::utils::resolve_current_directory;

/// zsh hooks installed by `dirhist init`
pub const ZSH_INTEGRATION_SCRIPT: &str = include_str!("../../scripts/dirhist.zsh");
const ZSH_SCRIPT_NAME: &str = "dirhist.zsh";

/// Line separating current-directory commands from the full history
const HISTORY_DELIMITER: &str = "---";

pub fn execute(cli: Cli) -> Result<ExitCode> {
    let config_path = cli.config.as_deref();
    let verbose = cli.verbose > 0;

    match cli.command {
        Commands::Init => init(config_path)?,
        Commands::Add(args) => return add(&load_config(config_path)?, args, verbose),
        Commands::Search(args) => search(&load_config(config_path)?, args)?,
        Commands::History(args) => history(&load_config(config_path)?, args)?,
        Commands::List => list(&load_config(config_path)?)?,
        Commands::SchemaMigrate => schema_migrate(&load_config(config_path)?)?,
    }

    Ok(ExitCode::SUCCESS)
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    Config::load(path).context("failed to load config")
}

fn init(config_override: Option<&Path>) -> Result<()> {
    let default_path = Config::default_path()?;
    let config_path = config_override.unwrap_or(default_path.as_path());

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    if config_override.is_none() {
        if !config_path.exists() {
            fs::write(config_path, DEFAULT_CONFIG_CONTENT)
                .with_context(|| format!("failed to create {}", config_path.display()))?;
            println!("Created config file at: {}", config_path.display());
        }
    } else if !config_path.exists() {
        bail!("cannot open config file: {}", config_path.display());
    }

    let config = Config::load_from(config_path).context("failed to load config")?;
    if let Some(parent) = config.database_path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create database directory {}", parent.display()))?;
    }
    let (_store, applied) = SqliteStore::open_and_migrate(&config.database_path)
        .context("failed to initialize database")?;
    tracing::info!(applied, "database migrations applied");
    println!("Initialized database at: {}", config.database_path.display());

    if config_path == default_path.as_path() {
        let script_path = default_path.with_file_name(ZSH_SCRIPT_NAME);
        fs::write(&script_path, ZSH_INTEGRATION_SCRIPT)
            .with_context(|| format!("failed to create {}", script_path.display()))?;
        println!("\nTo integrate with zsh, add the following line to your ~/.zshrc:");
        println!("source {}", script_path.display());
    }

    Ok(())
}

fn add(config: &Config, args: AddArgs, verbose: bool) -> Result<ExitCode> {
    let command = args.command.join(" ");
    if command.trim().is_empty() {
        if verbose {
            println!("Empty command, skipping");
        }
        return Ok(ExitCode::FAILURE);
    }
    let directory = resolve_current_directory(args.directory.as_deref())
        .context("failed to get current directory")?;

    let candidate = NewEntry::new(command, directory)
        .hostname(hostname())
        .username(username())
        .tty(args.tty.unwrap_or_else(tty))
        .sid(args.sid);

    let store = SqliteStore::open_read_write(&config.database_path)
        .context("failed to open history database")?;
    let options = RecordOptions { dedup: !args.no_dedup };

    match record_command(&store, candidate.clone(), options) {
        Ok(outcome) => {
            if verbose {
                println!("{}", add_message(&outcome, candidate.command.trim()));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(RecordError::EmptyCommand) => Ok(ExitCode::FAILURE),
        Err(e) => Err(e).context("failed to add command"),
    }
}

fn search(config: &Config, args: DirectoryArgs) -> Result<()> {
    let session = {
        let store = SqliteStore::open_read_only(&config.database_path)
            .context("failed to open history database")?;
        SearchSession::load(&store, args.directory.as_deref())?
    };

    if let Some(selection) = run_interactive(session)? {
        write_lines([selection.output_line()])?;
    }
    Ok(())
}

fn history(config: &Config, args: DirectoryArgs) -> Result<()> {
    let store = SqliteStore::open_read_only(&config.database_path)
        .context("failed to open history database")?;
    let current_directory = resolve_current_directory(args.directory.as_deref())
        .context("failed to get current directory")?;
    let entries = store.list_all()?;

    write_lines(history_listing(
        &entries,
        &current_directory,
        config.current_directory_history_limit,
    ))
}

fn list(config: &Config) -> Result<()> {
    let store = SqliteStore::open_read_only(&config.database_path)
        .context("failed to open history database")?;
    let entries = store.list_all()?;
    write_lines(entries.iter().rev().map(|entry| entry.command.as_str()))
}

fn schema_migrate(config: &Config) -> Result<()> {
    let (_store, applied) = SqliteStore::open_and_migrate(&config.database_path)
        .context("failed to apply migrations")?;
    println!("Database schema is up to date ({} migration(s) applied)", applied);
    println!("Database path: {}", config.database_path.display());
    println!("Schema version: {}", crate::store::schema::SCHEMA_VERSION);
    Ok(())
}

fn add_message(outcome: &RecordOutcome, command: &str) -> String {
    match (outcome.id, outcome.duplicate) {
        (None, _) => format!("Duplicate command, skipped: {}", command),
        (Some(_), true) => format!("Command added to history (duplicate): {}", command),
        (Some(_), false) => format!("Command added to history: {}", command),
    }
}

/// Lines printed by `dirhist history`
///
/// The newest `limit` commands recorded in `current_directory`, the
/// delimiter, then the rest of that directory's commands followed by every
/// other command, each part newest first. A command is printed at most once.
/// `entries` must be oldest first.
pub fn history_listing<'a>(
    entries: &'a [HistoryEntry],
    current_directory: &str,
    limit: usize,
) -> Vec<&'a str> {
    let mut printed = HashSet::new();
    let mut lines = Vec::new();

    let local = entries.iter().rev().filter(|e| e.directory == current_directory).take(limit);
    for entry in local {
        if printed.insert(entry.command.as_str()) {
            lines.push(entry.command.as_str());
        }
    }

    lines.push(HISTORY_DELIMITER);

    let (here, elsewhere): (Vec<_>, Vec<_>) =
        entries.iter().rev().partition(|e| e.directory == current_directory);
    for entry in here.into_iter().chain(elsewhere) {
        if printed.insert(entry.command.as_str()) {
            lines.push(entry.command.as_str());
        }
    }

    lines
}

/// Write lines to stdout; a closed pipe (`| head`) is not an error
fn write_lines<I, S>(lines: I) -> Result<()>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = BufWriter::new(io::stdout().lock());
    let result = lines
        .into_iter()
        .try_for_each(|line| writeln!(out, "{}", line.as_ref()))
        .and_then(|()| out.flush());

    match result {
        Err(e) if e.kind() == io::ErrorKind::BrokenPipe => Ok(()),
        other => Ok(other?),
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    use super::*;

    fn entry(id: u128, command: &str, directory: &str) -> HistoryEntry {
        HistoryEntry {
            id: Uuid::from_u128(id),
            command: command.to_string(),
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
            hostname: "h".to_string(),
            directory: directory.to_string(),
            username: "u".to_string(),
            tty: String::new(),
            sid: String::new(),
        }
    }

    #[test]
    fn test_history_listing_order_and_delimiter() {
        let entries = vec![
            entry(1, "make", "/src"),
            entry(2, "ls", "/tmp"),
            entry(3, "cargo test", "/src"),
            entry(4, "htop", "/"),
        ];
        assert_eq!(
            history_listing(&entries, "/src", 5),
            vec!["cargo test", "make", "---", "htop", "ls"]
        );
    }

    #[test]
    fn test_history_listing_limit() {
        let entries: Vec<_> =
            (1..=4).map(|i| entry(i, &format!("cmd{}", i), "/src")).collect();
        assert_eq!(
            history_listing(&entries, "/src", 2),
            vec!["cmd4", "cmd3", "---", "cmd2", "cmd1"]
        );
    }

    #[test]
    fn test_history_listing_overflow_keeps_directory_first() {
        let entries = vec![
            entry(1, "make", "/src"),
            entry(2, "ls", "/tmp"),
            entry(3, "cargo test", "/src"),
            entry(4, "htop", "/"),
        ];
        assert_eq!(
            history_listing(&entries, "/src", 1),
            vec!["cargo test", "---", "make", "htop", "ls"]
        );
    }

    #[test]
    fn test_add_message() {
        let id = Some(Uuid::from_u128(1));
        let added = RecordOutcome { id, duplicate: false };
        let forced = RecordOutcome { id, duplicate: true };
        let skipped = RecordOutcome { id: None, duplicate: true };

        assert_eq!(add_message(&added, "ls"), "Command added to history: ls");
        assert_eq!(add_message(&forced, "ls"), "Command added to history (duplicate): ls");
        assert_eq!(add_message(&skipped, "ls"), "Duplicate command, skipped: ls");
    }

    #[test]
    fn test_history_listing_prints_each_command_once() {
        let entries = vec![
            entry(1, "git pull", "/a"),
            entry(2, "git pull", "/b"),
            entry(3, "git pull", "/a"),
            entry(4, "ls", "/b"),
        ];
        assert_eq!(history_listing(&entries, "/a", 5), vec!["git pull", "---", "ls"]);
    }

    #[test]
    fn test_history_listing_empty() {
        assert_eq!(history_listing(&[], "/a", 5), vec!["---"]);
    }

    #[test]
    fn test_zsh_script_calls_binary() {
        assert!(ZSH_INTEGRATION_SCRIPT.contains("dirhist add"));
        assert!(ZSH_INTEGRATION_SCRIPT.contains("dirhist search"));
    }
}
