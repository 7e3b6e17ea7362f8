//! Cleanup command implementation
//!
//! Resolves the option set from flags and an optional options file, then
//! hands it to the orchestrator.

use anyhow::Result;
use tracing::debug;

use crate::cleanup::{comma_sep_parse, CleanupOptions, Orchestrator, SweepPaths};
use crate::cli::args::CleanupArgs;
use crate::subprocess::SubprocessManager;

/// Merge CLI flags over the options file, if any
pub fn resolve_options(args: &CleanupArgs) -> Result<CleanupOptions> {
    let mut options = match &args.options_file {
        Some(path) => CleanupOptions::load(path)?,
        None => CleanupOptions::default(),
    };

    if let Some(pattern) = &args.file_pattern {
        options.file_pattern = Some(pattern.clone());
    }
    if args.exclude_idents.is_some() {
        options.exclude_idents = comma_sep_parse(args.exclude_idents.as_deref());
    }
    if args.remove_images.is_some() {
        options.remove_images = comma_sep_parse(args.remove_images.as_deref());
    }
    if args.image_prune {
        options.image_prune = true;
    }
    if let Some(executable) = &args.process_isolation_executable {
        options.process_isolation_executable = executable.clone();
    }

    Ok(options)
}

/// Execute the cleanup command
pub async fn run_cleanup_command(args: CleanupArgs) -> Result<()> {
    let options = resolve_options(&args)?;
    debug!("Resolved cleanup options: {:?}", options);

    let orchestrator = Orchestrator::new(SweepPaths::default(), SubprocessManager::production());
    orchestrator.run_cleanup(&options).await?;
    Ok(())
}
