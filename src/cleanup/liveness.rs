//! Process liveness checks for job working directories
//!
//! A working directory records its job's process id in a `pid` file. The
//! directory counts as alive only while that process can be found.

use std::fs;
use std::path::Path;
use tracing::{debug, trace};

use crate::error::{CleanupError, Result};

pub const PID_FILE: &str = "pid";

/// Capability to test whether a process id refers to a live process.
pub trait ProcessProbe {
    fn is_alive(&self, pid: i32) -> bool;
}

/// Probes with signal 0 on Unix, which checks existence without delivering
/// anything to the target.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignalProbe;

#[cfg(unix)]
impl ProcessProbe for SignalProbe {
    fn is_alive(&self, pid: i32) -> bool {
        use nix::errno::Errno;
        use nix::sys::signal::kill;
        use nix::unistd::Pid;

        match kill(Pid::from_raw(pid), None) {
            Ok(()) => true,
            Err(Errno::ESRCH) | Err(Errno::EPERM) => false,
            Err(e) => {
                debug!("Liveness probe for pid {} failed: {}", pid, e);
                false
            }
        }
    }
}

#[cfg(not(unix))]
impl ProcessProbe for SignalProbe {
    fn is_alive(&self, pid: i32) -> bool {
        use sysinfo::{Pid, ProcessesToUpdate, System};

        let pid = Pid::from_u32(pid as u32);
        let mut system = System::new();
        system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        system.process(pid).is_some()
    }
}

/// Read the process id recorded in `dir`.
///
/// Returns `Ok(None)` when the pid file is missing or unreadable. Content
/// that is not UTF-8 or not a positive integer is an error.
pub fn read_pid(dir: &Path) -> Result<Option<i32>> {
    let pid_path = dir.join(PID_FILE);

    let bytes = match fs::read(&pid_path) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!("No readable pid file at {}: {}", pid_path.display(), e);
            return Ok(None);
        }
    };

    let content = String::from_utf8(bytes).map_err(|e| CleanupError::MalformedPid {
        path: pid_path.clone(),
        content: String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })?;

    let first_line = content.lines().next().unwrap_or_default().trim();
    match first_line.parse::<i32>() {
        Ok(pid) if pid > 0 => Ok(Some(pid)),
        _ => Err(CleanupError::MalformedPid {
            path: pid_path,
            content: first_line.to_string(),
        }),
    }
}

/// Whether the job owning `dir` is still running.
pub fn is_alive(dir: &Path, probe: &dyn ProcessProbe) -> Result<bool> {
    let Some(pid) = read_pid(dir)? else {
        return Ok(false);
    };

    let alive = probe.is_alive(pid);
    trace!("pid {} for {} alive: {}", pid, dir.display(), alive);
    Ok(alive)
}
