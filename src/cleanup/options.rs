//! The flat option set accepted by a cleanup run
//!
//! Options come from CLI flags, optionally layered over a TOML options file
//! using the same key names.

use serde::{Deserialize, Deserializer};
use std::path::Path;

use super::images::DEFAULT_RUNTIME;
use crate::error::{CleanupError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CleanupOptions {
    /// Glob of working directories to clean
    pub file_pattern: Option<String>,
    /// Identifiers whose directories must be preserved
    #[serde(deserialize_with = "deserialize_list")]
    pub exclude_idents: Vec<String>,
    /// Image tags to remove
    #[serde(deserialize_with = "deserialize_list")]
    pub remove_images: Vec<String>,
    pub image_prune: bool,
    pub process_isolation_executable: String,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            file_pattern: None,
            exclude_idents: Vec::new(),
            remove_images: Vec::new(),
            image_prune: false,
            process_isolation_executable: DEFAULT_RUNTIME.to_string(),
        }
    }
}

impl CleanupOptions {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CleanupError::Options(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CleanupError::io(path, e))?;
        Self::from_toml_str(&content).map_err(|e| match e {
            CleanupError::Options(msg) => {
                CleanupError::Options(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })
    }

    /// The directory pattern, if one was given and is non-empty
    pub fn file_pattern(&self) -> Option<&str> {
        self.file_pattern.as_deref().filter(|p| !p.is_empty())
    }
}

/// Split a comma separated list, dropping empty entries.
pub fn comma_sep_parse(value: Option<&str>) -> Vec<String> {
    value
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ListValue {
    Csv(String),
    List(Vec<String>),
}

fn deserialize_list<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match ListValue::deserialize(deserializer)? {
        ListValue::Csv(value) => comma_sep_parse(Some(&value)),
        ListValue::List(items) => items.into_iter().filter(|item| !item.is_empty()).collect(),
    })
}
