//! sitesmith CLI - XML sitemap generation from a content API
//!
//! This is the main entry point for the sitesmith command-line interface.
//! Command implementations live in separate modules under `commands`.

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

mod cli;
mod commands;
mod output;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    initialize_logging(&cli)?;

    execute_command(cli).await
}

fn initialize_logging(cli: &Cli) -> Result<()> {
    let level = if cli.verbose {
        Level::DEBUG
    } else if cli.quiet {
        Level::ERROR
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

async fn execute_command(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Generate {
            out,
            stdout,
            format,
        } => {
            commands::generate(&cli.config, out, stdout, format).await?;
        },
        Commands::Types { format } => {
            commands::list_types(&cli.config, format).await?;
        },
        Commands::Check { format } => {
            commands::check(&cli.config, format).await?;
        },
        Commands::Completions { shell } => {
            commands::completions(shell);
        },
    }
    Ok(())
}
