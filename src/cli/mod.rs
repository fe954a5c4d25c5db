pub mod commands;
pub mod parser;

pub use parser::Cli;

use crate::config::{Config, ConfigManager};
use crate::utils::Result;

pub fn execute_command(cli: Cli) -> Result<()> {
    execute_command_with_config(cli, None)
}

pub fn execute_command_with_config(cli: Cli, test_config: Option<Config>) -> Result<()> {
    let config = match test_config {
        Some(cfg) => cfg,
        None => ConfigManager::load()?,
    };

    commands::sweep::execute(config, cli.dry_run)
}
