//! Command dispatch: bridges CLI args -> core operations -> output formatting.

pub mod config_cmd;
pub mod format;
pub mod notify;
pub mod refresh;
pub mod table;

use commdash_config::Config;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a config-aware command to its handler.
pub async fn dispatch(cmd: Command, config: &Config, global: &GlobalOpts) -> Result<(), CliError> {
    match cmd {
        Command::Format(args) => format::handle(args, config, global),
        Command::Table(args) => table::handle(args, config, global),
        Command::Notify(args) => notify::handle(args, config, global).await,
        Command::Refresh(args) => refresh::handle(args, config, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => Ok(()),
    }
}
