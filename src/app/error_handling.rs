//! Error handling utilities
//!
//! This module provides centralized error handling for the application.

use tracing::error;

use crate::error::CleanupError;
use crate::subprocess::ProcessError;

/// Report a fatal error and exit with a non-zero status
///
/// A failed runtime command is reported with its command line and captured
/// stdout. In verbose mode the full cause chain follows.
pub fn handle_fatal_error(error: anyhow::Error, verbose: u8) -> ! {
    error!("Fatal error: {}", error);

    match error.downcast_ref::<CleanupError>() {
        // Already reads "Error running command: ..."
        Some(CleanupError::Process(ProcessError::CommandFailed { .. })) => eprintln!("{error}"),
        _ => eprintln!("Error: {error}"),
    }

    if verbose >= 1 {
        eprintln!("\nError chain:");
        for (i, cause) in error.chain().enumerate() {
            eprintln!("  {}: {}", i, cause);
        }
    }

    std::process::exit(1)
}
