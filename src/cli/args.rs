//! CLI argument structures
//!
//! This module defines the command-line interface of jobsweep.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Remove leftovers of finished automation jobs
#[derive(Parser)]
#[command(name = "jobsweep")]
#[command(about = "jobsweep - Remove stale job directories and container images", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace, -vvv for all)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Delete private data dirs of finished jobs and unused container images
    #[command(name = "cleanup")]
    Cleanup(CleanupArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct CleanupArgs {
    /// A file glob pattern to find private data dir folders to remove.
    /// Example: --file-pattern=/tmp/.ansible-runner-*
    #[arg(long, value_name = "GLOB")]
    pub file_pattern: Option<String>,

    /// A comma separated list of run IDs to preserve. Any matched directory
    /// whose path contains one of them is left alone.
    #[arg(long, value_name = "IDENTS")]
    pub exclude_idents: Option<String>,

    /// A comma separated list of podman or docker tags to delete. This may not
    /// remove the corresponding layers, use --image-prune to assure full deletion.
    /// Example: --remove-images=quay.io/user/image:devel,quay.io/user/builder:latest
    #[arg(long, value_name = "TAGS")]
    pub remove_images: Option<String>,

    /// Run `image prune -f` with the container runtime. This only runs after untagging.
    #[arg(long)]
    pub image_prune: bool,

    /// The container runtime to clean up images for [default: podman]
    #[arg(long, value_name = "EXECUTABLE")]
    pub process_isolation_executable: Option<String>,

    /// TOML file providing any of the options above; flags take precedence
    #[arg(long, value_name = "PATH")]
    pub options_file: Option<PathBuf>,
}
