//! CLI structure and command handlers.

mod commands;
mod migrate;
mod run;

pub use commands::{Cli, Commands};
pub use migrate::migrate;
pub use run::{load_config, run};
