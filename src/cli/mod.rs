mod commands;

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

pub use commands::{execute, history_listing};

#[derive(Parser)]
#[command(name = "dirhist")]
#[command(version)]
#[command(about = "Directory-aware shell history with incremental search", long_about = None)]
pub struct Cli {
    /// Config file (default is ~/.config/dirhist/dirhist.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the config file, the database and the zsh integration script
    Init,
    /// Record a command. Use -- to separate the command
    Add(AddArgs),
    /// Pick a command interactively; prints it on stdout
    Search(DirectoryArgs),
    /// Commands for fzf/peco: current directory first, then everything
    History(DirectoryArgs),
    /// All recorded commands, newest first
    List,
    /// Update the database schema to the latest version
    SchemaMigrate,
}

#[derive(Args)]
pub struct AddArgs {
    /// Directory to record (default is the current directory)
    #[arg(short, long)]
    pub directory: Option<String>,

    /// Terminal (default is $TTY)
    #[arg(long)]
    pub tty: Option<String>,

    /// Shell session id
    #[arg(long, default_value = "")]
    pub sid: String,

    /// Record even when an identical entry exists
    #[arg(long)]
    pub no_dedup: bool,

    /// The command line
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

#[derive(Args)]
pub struct DirectoryArgs {
    /// Directory to treat as current (default is the working directory)
    #[arg(short, long)]
    pub directory: Option<String>,
}
