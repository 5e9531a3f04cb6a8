//! Command-line and environment configuration.

use clap::{Args, Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

/// Collection progress tracker.
#[derive(Debug, Parser)]
#[command(name = "arsenal", version, about)]
pub struct Cli {
    /// SQLite database file holding item progress.
    #[arg(long, env = "ARSENAL_DB", default_value = "progress.db", global = true)]
    pub db: PathBuf,

    /// trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "ARSENAL_LOG_LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when unset.
    #[arg(long, env = "ARSENAL_LOG_DIR", global = true)]
    pub log_dir: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Seed the catalog and serve the web interface.
    Serve(ServeArgs),
    /// Seed the catalog from the resources directory and exit.
    Seed(SeedArgs),
    /// Mark every item named in a file as owned and mastered.
    Import(ImportArgs),
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    #[arg(long, env = "ARSENAL_BIND", default_value = "0.0.0.0:5000")]
    pub bind: SocketAddr,

    /// Directory of `<category>.txt` item lists.
    #[arg(long, env = "ARSENAL_RESOURCES", default_value = "resources")]
    pub resources: PathBuf,
}

#[derive(Debug, Args)]
pub struct SeedArgs {
    /// Directory of `<category>.txt` item lists.
    #[arg(long, env = "ARSENAL_RESOURCES", default_value = "resources")]
    pub resources: PathBuf,
}

#[derive(Debug, Args)]
pub struct ImportArgs {
    /// Text file with one item name per line.
    pub file: PathBuf,

    /// Match names case-insensitively, treating spaces as underscores.
    #[arg(long)]
    pub resolve: bool,
}

/// Resolved settings for the web server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub bind: SocketAddr,
    pub resources_dir: PathBuf,
}

impl ServerConfig {
    pub fn from_args(db: PathBuf, args: ServeArgs) -> Self {
        Self {
            db_path: db,
            bind: args.bind,
            resources_dir: args.resources,
        }
    }
}
