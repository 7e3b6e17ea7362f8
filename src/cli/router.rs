//! Command routing and execution
//!
//! This module handles routing CLI commands to their respective implementations.

use crate::cli::args::{Cli, Commands};
use crate::cli::commands::run_cleanup_command;
use anyhow::Result;
use clap::CommandFactory;

/// Execute a CLI command based on the parsed arguments
pub async fn execute_command(command: Option<Commands>) -> Result<()> {
    match command {
        Some(Commands::Cleanup(args)) => run_cleanup_command(args).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}
