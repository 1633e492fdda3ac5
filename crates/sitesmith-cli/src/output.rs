//! Output format selection shared by reporting commands.

use clap::ValueEnum;

/// Output format for reporting commands.
///
/// - **Text**: human-readable output with colors
/// - **Json**: machine-readable JSON for scripting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output (default)
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}
