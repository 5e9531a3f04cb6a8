//! arsenal command-line entry point.

use anyhow::anyhow;
use arsenal_core::{default_log_level, init_logging};
use arsenal_server::commands;
use arsenal_server::config::{Cli, Command, ServerConfig};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = cli.log_level.as_deref().unwrap_or(default_log_level());
    init_logging(level, cli.log_dir.as_deref()).map_err(|err| anyhow!(err))?;

    match cli.command {
        Command::Serve(args) => commands::serve(ServerConfig::from_args(cli.db, args)).await,
        Command::Seed(args) => {
            let report = commands::seed(&cli.db, &args)?;
            println!(
                "seeded {} list(s): {} name(s), {} new",
                report.lists, report.names_seen, report.inserted
            );
            Ok(())
        }
        Command::Import(args) => {
            let outcome = commands::import(&cli.db, &args)?;
            println!("import: {outcome:?}");
            Ok(())
        }
    }
}
