//! # jobsweep
//!
//! Removes what finished automation jobs leave behind: their private data
//! directories, the registry credential directories tied to them, and
//! container images they pulled.
//!
//! ## Usage
//!
//! ```bash
//! jobsweep cleanup --file-pattern '/tmp/.ansible-runner-*' --exclude-idents job1 \
//!     --remove-images quay.io/user/image:devel --image-prune
//! ```
//!
//! ## Modules
//!
//! - `app` - Logging setup, verbosity configuration and fatal error reporting
//! - `cleanup` - Liveness checks, directory and image cleanup, orchestration
//! - `cli` - Argument structures and command handlers
//! - `error` - Error kinds raised by a cleanup run
//! - `subprocess` - Process runner abstraction with production and mock runners
pub mod app;
pub mod cleanup;
pub mod cli;
pub mod error;
pub mod subprocess;
