//! Command implementation modules
//!
//! This module contains the implementation of each CLI command.

pub mod cleanup;

pub use cleanup::run_cleanup_command;
