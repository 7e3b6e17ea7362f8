//! Removal of finished job working directories
//!
//! Each directory matched by the caller's glob is either skipped (excluded),
//! kept (its job is still running) or removed. Registry auth dirs belonging
//! to removed jobs are deleted in a second pass.

use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use super::liveness::{self, ProcessProbe, SignalProbe};
use super::paths::SweepPaths;
use crate::error::{CleanupError, Result};

pub const ARTIFACTS_DIR: &str = "artifacts";

/// What a directory sweep removed and what it left behind.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DirCleanupReport {
    /// Number of working directories removed
    pub removed: usize,
    /// Identifiers of jobs still running, in discovery order
    pub running_idents: Vec<String>,
    pub deleted_idents: Vec<String>,
    pub removed_auth_dirs: Vec<PathBuf>,
}

/// List the job identifiers of a working directory.
///
/// These are the entry names under `artifacts/`; a directory without one has
/// no identifiers.
pub fn job_idents(dir: &Path) -> Result<Vec<String>> {
    let artifacts = dir.join(ARTIFACTS_DIR);

    let entries = match fs::read_dir(&artifacts) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(CleanupError::io(artifacts, e)),
    };

    let mut idents = entries
        .map(|entry| {
            entry
                .map(|entry| entry.file_name().to_string_lossy().into_owned())
                .map_err(|e| CleanupError::io(&artifacts, e))
        })
        .collect::<Result<Vec<_>>>()?;
    idents.sort();
    Ok(idents)
}

fn is_excluded(dir: &Path, exclude_idents: &[String]) -> bool {
    // Substring match on the whole path, not on the identifier set.
    let dir_str = dir.to_string_lossy();
    exclude_idents
        .iter()
        .any(|ident| dir_str.contains(ident.as_str()))
}

pub struct DirectoryCleaner<P = SignalProbe> {
    paths: SweepPaths,
    probe: P,
}

impl DirectoryCleaner<SignalProbe> {
    pub fn new(paths: SweepPaths) -> Self {
        Self::with_probe(paths, SignalProbe)
    }
}

impl<P: ProcessProbe> DirectoryCleaner<P> {
    pub fn with_probe(paths: SweepPaths, probe: P) -> Self {
        Self { paths, probe }
    }

    /// Remove every directory matching `pattern` whose job is no longer
    /// running, then the registry auth dirs of the removed jobs.
    pub fn cleanup_dirs(
        &self,
        pattern: &str,
        exclude_idents: &[String],
    ) -> Result<DirCleanupReport> {
        let matches = glob::glob(pattern).map_err(|source| CleanupError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;

        let mut report = DirCleanupReport::default();

        for entry in matches {
            let dir = match entry {
                Ok(dir) => dir,
                Err(e) => {
                    warn!(
                        "Skipping unreadable match {}: {}",
                        e.path().display(),
                        e.error()
                    );
                    continue;
                }
            };

            if is_excluded(&dir, exclude_idents) {
                debug!("Skipping excluded directory {}", dir.display());
                continue;
            }
            if !dir.is_dir() {
                debug!("Skipping non-directory match {}", dir.display());
                continue;
            }

            let dir_idents = job_idents(&dir)?;

            if liveness::is_alive(&dir, &self.probe)? {
                debug!("Job in {} is still running", dir.display());
                report.running_idents.extend(dir_idents);
                continue;
            }

            report.deleted_idents.extend(dir_idents);
            fs::remove_dir_all(&dir).map_err(|e| CleanupError::io(&dir, e))?;
            info!("Removed {}", dir.display());
            report.removed += 1;
        }

        if report.removed > 0 {
            println!(
                "Removed {} private data dir(s) in pattern {}",
                report.removed, pattern
            );
        }
        if !report.running_idents.is_empty() {
            println!(
                "Excluding from cleanup running jobs {:?}",
                report.running_idents
            );
        }

        self.remove_auth_dirs(exclude_idents, &mut report)?;
        Ok(report)
    }

    fn remove_auth_dirs(
        &self,
        exclude_idents: &[String],
        report: &mut DirCleanupReport,
    ) -> Result<()> {
        let pattern = self.paths.registry_auth_glob();
        let parser = self.paths.auth_dir_parser()?;

        let matches = glob::glob(&pattern).map_err(|source| CleanupError::InvalidPattern {
            pattern: pattern.clone(),
            source,
        })?;

        for entry in matches {
            let dir = match entry {
                Ok(dir) => dir,
                Err(e) => {
                    warn!(
                        "Skipping unreadable match {}: {}",
                        e.path().display(),
                        e.error()
                    );
                    continue;
                }
            };

            let ident = parser.ident(&dir)?;
            if exclude_idents.contains(&ident) || report.running_idents.contains(&ident) {
                continue;
            }
            if !report.deleted_idents.contains(&ident) {
                continue;
            }
            if !dir.is_dir() {
                debug!("Skipping non-directory auth match {}", dir.display());
                continue;
            }

            fs::remove_dir_all(&dir).map_err(|e| CleanupError::io(&dir, e))?;
            println!("Removed associated registry auth dir {}", dir.display());
            report.removed_auth_dirs.push(dir);
        }

        Ok(())
    }
}
