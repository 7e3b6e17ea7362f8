//! Integration tests for the cleanup command
//!
//! Drives the jobsweep binary against temporary job directories and a shell
//! script standing in for the container runtime.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn jobsweep() -> Command {
    Command::cargo_bin("jobsweep").unwrap()
}

/// Pid of a child that has already exited and been reaped
fn exited_pid() -> u32 {
    let mut child = std::process::Command::new("true").spawn().unwrap();
    let pid = child.id();
    child.wait().unwrap();
    pid
}

fn job_dir(root: &Path, name: &str, pid: Option<u32>, idents: &[&str]) -> PathBuf {
    let dir = root.join(name);
    fs::create_dir_all(&dir).unwrap();
    if let Some(pid) = pid {
        fs::write(dir.join("pid"), format!("{pid}\n")).unwrap();
    }
    for ident in idents {
        fs::create_dir_all(dir.join("artifacts").join(ident)).unwrap();
    }
    dir
}

#[cfg(unix)]
fn fake_runtime(root: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = root.join("fake-runtime");
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

#[test]
fn test_cleanup_help_lists_flags() {
    jobsweep()
        .args(["cleanup", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--file-pattern"))
        .stdout(predicate::str::contains("--exclude-idents"))
        .stdout(predicate::str::contains("--remove-images"))
        .stdout(predicate::str::contains("--image-prune"))
        .stdout(predicate::str::contains("--process-isolation-executable"));
}

#[test]
fn test_cleanup_without_options_is_unchanged() {
    jobsweep()
        .arg("cleanup")
        .assert()
        .success()
        .stdout(predicate::str::diff("(changed: False)\n"));
}

#[test]
fn test_finished_job_removed_running_job_kept() {
    let temp = TempDir::new().unwrap();
    let finished = job_dir(
        temp.path(),
        "run-A",
        Some(exited_pid()),
        &["jobsweep-it-finished"],
    );
    let running = job_dir(
        temp.path(),
        "run-B",
        Some(std::process::id()),
        &["jobsweep-it-running"],
    );

    jobsweep()
        .arg("cleanup")
        .arg(format!("--file-pattern={}/run-*", temp.path().display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 private data dir(s) in pattern"))
        .stdout(predicate::str::contains(
            "Excluding from cleanup running jobs [\"jobsweep-it-running\"]",
        ))
        .stdout(predicate::str::ends_with("(changed: True)\n"));

    assert!(!finished.exists());
    assert!(running.exists());
}

#[test]
fn test_excluded_directory_is_untouched() {
    let temp = TempDir::new().unwrap();
    let dir = job_dir(temp.path(), "run-keep-this", None, &["keep-this"]);

    jobsweep()
        .arg("cleanup")
        .arg(format!("--file-pattern={}/run-*", temp.path().display()))
        .arg("--exclude-idents=other,keep-this")
        .assert()
        .success()
        .stdout(predicate::str::diff("(changed: False)\n"));

    assert!(dir.exists());
}

#[test]
fn test_malformed_pid_fails_run() {
    let temp = TempDir::new().unwrap();
    let dir = job_dir(temp.path(), "run-A", None, &[]);
    fs::write(dir.join("pid"), "not-a-number\n").unwrap();

    jobsweep()
        .arg("cleanup")
        .arg(format!("--file-pattern={}/run-*", temp.path().display()))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Malformed pid file"))
        .stdout(predicate::str::contains("(changed:").not());

    assert!(dir.exists());
}

#[cfg(unix)]
#[test]
fn test_remove_images_counts_untagged() {
    let temp = TempDir::new().unwrap();
    let runtime = fake_runtime(
        temp.path(),
        r#"case "$1" in
  images) echo '"localhost/myimg:latest"' ;;
  rmi) echo "Untagged: $2"; echo "Untagged: quay.io/mirror/myimg:latest" ;;
  image) echo "Total reclaimed space: 0B" ;;
esac"#,
    );

    jobsweep()
        .arg("cleanup")
        .arg("--remove-images=myimg:latest")
        .arg("--image-prune")
        .arg("--process-isolation-executable")
        .arg(&runtime)
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 2 image(s)"))
        .stdout(predicate::str::contains("Pruned images").not())
        .stdout(predicate::str::ends_with("(changed: True)\n"));
}

#[cfg(unix)]
#[test]
fn test_runtime_failure_reports_command_and_stdout() {
    let temp = TempDir::new().unwrap();
    let runtime = fake_runtime(temp.path(), "echo 'storage is locked'\nexit 125");

    jobsweep()
        .arg("cleanup")
        .arg("--image-prune")
        .arg("--process-isolation-executable")
        .arg(&runtime)
        .env_remove("RUST_LOG")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error running command:"))
        .stderr(predicate::str::contains("image prune -f"))
        // Once in the fatal log line, once in the printed report
        .stderr(predicate::function(|stderr: &str| {
            stderr.matches("storage is locked").count() == 2
        }));
}

#[cfg(unix)]
#[test]
fn test_options_file_supplies_runtime() {
    let temp = TempDir::new().unwrap();
    let runtime = fake_runtime(temp.path(), "echo 'Total reclaimed space: 3MB'");
    let options = temp.path().join("cleanup.toml");
    fs::write(
        &options,
        format!(
            "image_prune = true\nprocess_isolation_executable = \"{}\"\n",
            runtime.display()
        ),
    )
    .unwrap();

    jobsweep()
        .arg("cleanup")
        .arg("--options-file")
        .arg(&options)
        .assert()
        .success()
        .stdout(predicate::str::contains("Pruned images"))
        .stdout(predicate::str::ends_with("(changed: True)\n"));
}

#[test]
fn test_invalid_options_file_fails() {
    let temp = TempDir::new().unwrap();
    let options = temp.path().join("cleanup.toml");
    fs::write(&options, "unknown_option = 1\n").unwrap();

    jobsweep()
        .arg("cleanup")
        .arg("--options-file")
        .arg(&options)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Options error"));
}
