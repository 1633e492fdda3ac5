//! CLI structure and argument parsing.
//!
//! `sitesmith` replaces the interactive admin screen of the generator it
//! reimplements: the operator's rule list lives in a TOML file (see
//! [`sitesmith_core::config`]) and the subcommands work against it.
//!
//! ```bash
//! # Generate sitemap.xml from ./sitesmith.toml
//! sitesmith generate
//!
//! # Discover which collections the API offers, with attribute hints
//! sitesmith types
//!
//! # Validate the configuration against the live API without generating
//! sitesmith check
//! ```

use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Main CLI structure for the `sitesmith` command.
#[derive(Parser, Debug)]
#[command(name = "sitesmith")]
#[command(version)]
#[command(about = "sitesmith - XML sitemap generation from a content API", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging output
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable all ANSI colors in output (also respects `NO_COLOR` env)
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    /// Path to the configuration file. Also via `SITESMITH_CONFIG`.
    #[arg(
        long,
        global = true,
        value_name = "FILE",
        env = "SITESMITH_CONFIG",
        default_value = "sitesmith.toml"
    )]
    pub config: PathBuf,
}

/// Available subcommands for the `sitesmith` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate the sitemap and write it to a file (or stdout)
    Generate {
        /// Output path for the artifact (defaults to sitemap.xml)
        #[arg(long, value_name = "PATH")]
        out: Option<PathBuf>,

        /// Write the XML to stdout instead of a file; the report goes to stderr
        #[arg(long, conflicts_with = "out")]
        stdout: bool,

        /// Report output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// List the content types discoverable on the API, with attribute hints
    Types {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Validate the configuration against the live API without generating
    Check {
        /// Output format
        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}
