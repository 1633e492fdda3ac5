//! Command implementations for the `sitesmith` CLI.

mod check;
mod completions;
mod generate;
mod types;

pub use check::execute as check;
pub use completions::generate as completions;
pub use generate::execute as generate;
pub use types::execute as list_types;
