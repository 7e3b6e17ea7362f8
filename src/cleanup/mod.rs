//! Removal of leftovers from finished automation jobs
//!
//! - `liveness` - pid file reading and process probing
//! - `dirs` - working directory and registry auth dir removal
//! - `images` - container image removal and pruning via the runtime CLI
//! - `options` - the flat option set of a cleanup run
//! - `orchestrator` - runs the requested cleanups and reports changed status
//! - `paths` - fixed locations shared by the engines

pub mod dirs;
pub mod images;
pub mod liveness;
pub mod options;
pub mod orchestrator;
pub mod paths;

pub use dirs::{DirCleanupReport, DirectoryCleaner};
pub use images::{ContainerRuntime, DEFAULT_RUNTIME};
pub use liveness::{ProcessProbe, SignalProbe};
pub use options::{comma_sep_parse, CleanupOptions};
pub use orchestrator::{CleanupOutcome, Orchestrator};
pub use paths::{SweepPaths, REGISTRY_AUTH_PREFIX};
