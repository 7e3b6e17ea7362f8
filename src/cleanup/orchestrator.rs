use tracing::debug;

use super::dirs::DirectoryCleaner;
use super::images::ContainerRuntime;
use super::liveness::{ProcessProbe, SignalProbe};
use super::options::CleanupOptions;
use super::paths::SweepPaths;
use crate::error::Result;
use crate::subprocess::SubprocessManager;

/// Aggregate result of one cleanup run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupOutcome {
    pub dirs_removed: usize,
    pub images_removed: usize,
    pub pruned: bool,
}

impl CleanupOutcome {
    pub fn changed(&self) -> bool {
        self.dirs_removed > 0 || self.images_removed > 0 || self.pruned
    }

    pub fn status_line(&self) -> &'static str {
        if self.changed() {
            "(changed: True)"
        } else {
            "(changed: False)"
        }
    }
}

pub struct Orchestrator<P = SignalProbe> {
    dirs: DirectoryCleaner<P>,
    subprocess: SubprocessManager,
}

impl Orchestrator<SignalProbe> {
    pub fn new(paths: SweepPaths, subprocess: SubprocessManager) -> Self {
        Self::with_probe(paths, SignalProbe, subprocess)
    }
}

impl<P: ProcessProbe> Orchestrator<P> {
    pub fn with_probe(paths: SweepPaths, probe: P, subprocess: SubprocessManager) -> Self {
        Self {
            dirs: DirectoryCleaner::with_probe(paths, probe),
            subprocess,
        }
    }

    /// Run each requested cleanup in order and print the changed status.
    ///
    /// The first error aborts the run; work already done is not undone.
    pub async fn run_cleanup(&self, options: &CleanupOptions) -> Result<CleanupOutcome> {
        let mut outcome = CleanupOutcome::default();

        if let Some(pattern) = options.file_pattern() {
            debug!("Cleaning working directories matching {}", pattern);
            let report = self.dirs.cleanup_dirs(pattern, &options.exclude_idents)?;
            outcome.dirs_removed = report.removed;
        }

        let runtime = ContainerRuntime::new(
            self.subprocess.clone(),
            &options.process_isolation_executable,
        );

        if !options.remove_images.is_empty() {
            debug!(
                "Removing {} image tag(s) with {}",
                options.remove_images.len(),
                runtime.executable()
            );
            outcome.images_removed = runtime.cleanup_images(&options.remove_images).await?;
        }

        if options.image_prune {
            outcome.pruned = runtime.prune_images().await?;
        }

        println!("{}", outcome.status_line());
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    struct NeverAlive;

    impl ProcessProbe for NeverAlive {
        fn is_alive(&self, _pid: i32) -> bool {
            false
        }
    }

    fn orchestrator(root: &TempDir, subprocess: SubprocessManager) -> Orchestrator<NeverAlive> {
        Orchestrator::with_probe(
            SweepPaths::new(root.path(), "registry_"),
            NeverAlive,
            subprocess,
        )
    }

    #[test]
    fn test_outcome_status_line() {
        assert_eq!(CleanupOutcome::default().status_line(), "(changed: False)");
        let pruned = CleanupOutcome {
            pruned: true,
            ..Default::default()
        };
        assert_eq!(pruned.status_line(), "(changed: True)");
    }

    #[tokio::test]
    async fn test_no_options_does_nothing() {
        let root = TempDir::new().unwrap();
        let (subprocess, mock) = SubprocessManager::mock();

        let outcome = orchestrator(&root, subprocess)
            .run_cleanup(&CleanupOptions::default())
            .await
            .unwrap();

        assert!(!outcome.changed());
        assert!(mock.get_call_history().is_empty());
    }

    #[tokio::test]
    async fn test_dirs_images_and_prune() {
        let root = TempDir::new().unwrap();
        let job = root.path().join("run-A");
        fs::create_dir_all(job.join("artifacts").join("j1")).unwrap();

        let (subprocess, mut mock) = SubprocessManager::mock();
        mock.expect_command("docker")
            .with_args(|args| args[0] == "images")
            .returns_stdout("old:1")
            .finish();
        mock.expect_command("docker")
            .with_args(|args| args[0] == "rmi")
            .returns_stdout("Untagged: old:1")
            .finish();
        mock.expect_command("docker")
            .with_args(|args| args[0] == "image")
            .returns_stdout("Total reclaimed space: 0B")
            .finish();

        let options = CleanupOptions {
            file_pattern: Some(format!("{}/run-*", root.path().display())),
            remove_images: vec!["old:1".to_string()],
            image_prune: true,
            process_isolation_executable: "docker".to_string(),
            ..Default::default()
        };

        let outcome = orchestrator(&root, subprocess)
            .run_cleanup(&options)
            .await
            .unwrap();

        assert_eq!(
            outcome,
            CleanupOutcome {
                dirs_removed: 1,
                images_removed: 1,
                pruned: false,
            }
        );
        assert!(outcome.changed());
        assert!(!job.exists());
        assert!(mock.verify_called("docker", 3));
    }

    #[tokio::test]
    async fn test_prune_only_runs_when_requested() {
        let root = TempDir::new().unwrap();
        let (subprocess, mut mock) = SubprocessManager::mock();
        mock.expect_command("podman")
            .returns_stdout("Total reclaimed space: 1GB")
            .finish();

        let options = CleanupOptions {
            image_prune: true,
            ..Default::default()
        };
        let outcome = orchestrator(&root, subprocess)
            .run_cleanup(&options)
            .await
            .unwrap();

        assert!(outcome.pruned);
        let history = mock.get_call_history();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].args, vec!["image", "prune", "-f"]);
    }

    #[tokio::test]
    async fn test_runtime_failure_aborts_before_prune() {
        let root = TempDir::new().unwrap();
        let (subprocess, mut mock) = SubprocessManager::mock();
        mock.expect_command("podman")
            .with_args(|args| args[0] == "images")
            .returns_exit_code(125)
            .finish();

        let options = CleanupOptions {
            remove_images: vec!["x:1".to_string()],
            image_prune: true,
            ..Default::default()
        };
        let result = orchestrator(&root, subprocess).run_cleanup(&options).await;

        assert!(result.is_err());
        assert_eq!(mock.get_call_history().len(), 1);
    }
}
