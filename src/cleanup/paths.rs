//! Fixed locations shared by the cleanup engines
//!
//! The temporary root and the registry credential prefix are process-wide
//! constants. Both the glob that finds registry auth dirs and the regex that
//! parses their names are derived from one [`SweepPaths`] value.

use regex::Regex;
use std::path::{Path, PathBuf};

use crate::error::{CleanupError, Result};

/// Root under which job runners create registry credential directories
pub const DEFAULT_TEMP_ROOT: &str = "/tmp";

/// Prefix of registry credential directories, followed by `<ident>_<suffix>`
pub const REGISTRY_AUTH_PREFIX: &str = "ansible_runner_registry_";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepPaths {
    temp_root: PathBuf,
    registry_auth_prefix: String,
}

impl SweepPaths {
    pub fn new(temp_root: impl Into<PathBuf>, registry_auth_prefix: impl Into<String>) -> Self {
        Self {
            temp_root: temp_root.into(),
            registry_auth_prefix: registry_auth_prefix.into(),
        }
    }

    pub fn temp_root(&self) -> &Path {
        &self.temp_root
    }

    fn root_str(&self) -> String {
        self.temp_root
            .to_string_lossy()
            .trim_end_matches('/')
            .to_string()
    }

    /// Glob matching every registry auth dir: `<root>/<prefix>*_*`
    pub fn registry_auth_glob(&self) -> String {
        format!(
            "{}/{}*_*",
            glob::Pattern::escape(&self.root_str()),
            glob::Pattern::escape(&self.registry_auth_prefix)
        )
    }

    /// Compile the name parser for registry auth dirs under this root
    pub fn auth_dir_parser(&self) -> Result<AuthDirParser> {
        let pattern = format!(
            "^{}/{}(?P<ident>.*)_.*?$",
            regex::escape(&self.root_str()),
            regex::escape(&self.registry_auth_prefix)
        );
        Ok(AuthDirParser {
            regex: Regex::new(&pattern)?,
        })
    }
}

impl Default for SweepPaths {
    fn default() -> Self {
        Self::new(DEFAULT_TEMP_ROOT, REGISTRY_AUTH_PREFIX)
    }
}

/// Extracts the job identifier embedded in a registry auth dir path.
#[derive(Debug, Clone)]
pub struct AuthDirParser {
    regex: Regex,
}

impl AuthDirParser {
    /// The identifier is everything between the prefix and the last `_`.
    pub fn ident(&self, path: &Path) -> Result<String> {
        let name_error = || CleanupError::AuthDirName {
            path: path.to_path_buf(),
        };

        let path_str = path.to_str().ok_or_else(name_error)?;
        let captures = self.regex.captures(path_str).ok_or_else(name_error)?;

        captures
            .name("ident")
            .map(|m| m.as_str().to_string())
            .ok_or_else(name_error)
    }
}
