//! Container image removal through the runtime's CLI
//!
//! Docker only untags on `rmi` while podman also drops the layers, so a
//! prune pass may still be needed to reclaim space.

use tracing::debug;

use crate::error::Result;
use crate::subprocess::{ProcessCommandBuilder, SubprocessManager};

pub const DEFAULT_RUNTIME: &str = "podman";

const IMAGE_REF_FORMAT: &str = "--format=\"{{.Repository}}:{{.Tag}}\"";
const UNTAGGED_MARKER: &str = "Untagged:";
const NOTHING_RECLAIMED: &str = "Total reclaimed space: 0B";

/// A container runtime executable such as `podman` or `docker`.
#[derive(Clone)]
pub struct ContainerRuntime {
    subprocess: SubprocessManager,
    executable: String,
}

impl ContainerRuntime {
    pub fn new(subprocess: SubprocessManager, executable: impl Into<String>) -> Self {
        Self {
            subprocess,
            executable: executable.into(),
        }
    }

    pub fn executable(&self) -> &str {
        &self.executable
    }

    /// Resolve a possibly wildcarded tag to `repository:tag` references.
    pub async fn resolve_tag(&self, image_tag: &str) -> Result<Vec<String>> {
        let command = ProcessCommandBuilder::new(&self.executable)
            .args(["images", IMAGE_REF_FORMAT, image_tag])
            .build();
        let stdout = self.subprocess.run_checked(command).await?;

        // The format argument reaches the runtime with its quotes intact.
        Ok(stdout
            .lines()
            .map(|line| line.trim().trim_matches('"'))
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }

    /// Force-remove one image reference, returning how many tags went away.
    pub async fn remove_image(&self, image_ref: &str) -> Result<usize> {
        let command = ProcessCommandBuilder::new(&self.executable)
            .args(["rmi", image_ref, "-f"])
            .build();
        let stdout = self.subprocess.run_checked(command).await?;
        Ok(stdout.matches(UNTAGGED_MARKER).count())
    }

    /// Remove every image matching the given tags.
    ///
    /// Returns the number of untag events reported by the runtime.
    pub async fn cleanup_images(&self, image_tags: &[String]) -> Result<usize> {
        let mut removed = 0;

        for image_tag in image_tags {
            let image_refs = self.resolve_tag(image_tag).await?;
            if image_refs.is_empty() {
                debug!("No images match {}", image_tag);
                continue;
            }

            for image_ref in &image_refs {
                removed += self.remove_image(image_ref).await?;
            }
        }

        if removed > 0 {
            println!("Removed {} image(s)", removed);
        }
        Ok(removed)
    }

    /// Run `image prune` and report whether any space was reclaimed.
    pub async fn prune_images(&self) -> Result<bool> {
        let command = ProcessCommandBuilder::new(&self.executable)
            .args(["image", "prune", "-f"])
            .build();
        let stdout = self.subprocess.run_checked(command).await?;

        if stdout.is_empty() || stdout == NOTHING_RECLAIMED {
            return Ok(false);
        }
        println!("Pruned images");
        Ok(true)
    }
}
