//! Docker runtime adapters — container inspection and file retrieval.
//!
//! Inspection goes through the Engine API. Pulling a file out of a running
//! container shells out to `docker cp`, which copies straight to a host path
//! in one step.

use std::path::Path;

use anyhow::{Context, Result};
use bollard::Docker;
use bollard::query_parameters::{InspectContainerOptions, ListContainersOptions};

use crate::command_runner::CommandRunner;

/// Invocation metadata for one running container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerImageRef {
    /// Runtime-assigned container id.
    pub id: String,
    /// Image reference string, e.g. `nginx:latest`.
    pub name: String,
    /// Entrypoint tokens; may be empty.
    pub entrypoint: Vec<String>,
    /// Cmd tokens; the fallback when the entrypoint is empty.
    pub cmd: Vec<String>,
}

impl ContainerImageRef {
    /// Tokens the runtime would execute: the entrypoint, or the cmd when the
    /// entrypoint is empty. An empty slice means neither is set.
    #[must_use]
    pub fn invocation_tokens(&self) -> &[String] {
        if self.entrypoint.is_empty() {
            &self.cmd
        } else {
            &self.entrypoint
        }
    }
}

/// Abstraction over container inspection, enabling test doubles.
#[allow(async_fn_in_trait)]
pub trait ContainerInspector {
    /// List the ids of running containers.
    ///
    /// # Errors
    ///
    /// Returns an error if the container runtime cannot be reached.
    async fn list_containers(&self) -> Result<Vec<String>>;

    /// Fetch invocation metadata for one container.
    ///
    /// # Errors
    ///
    /// Returns an error if the container cannot be inspected.
    async fn inspect(&self, id: &str) -> Result<ContainerImageRef>;
}

/// Production inspector — talks to the Docker Engine API.
pub struct DockerInspector {
    docker: Docker,
}

impl DockerInspector {
    /// Connect using the ambient Docker environment (`DOCKER_HOST` or the
    /// default socket).
    ///
    /// # Errors
    ///
    /// Returns an error if no Docker endpoint is reachable.
    pub fn connect() -> Result<Self> {
        let docker = Docker::connect_with_local_defaults()
            .context("failed to connect to the Docker daemon")?;
        Ok(Self { docker })
    }
}

impl ContainerInspector for DockerInspector {
    async fn list_containers(&self) -> Result<Vec<String>> {
        let summaries = self
            .docker
            .list_containers(None::<ListContainersOptions>)
            .await
            .context("failed to list containers")?;
        Ok(summaries.into_iter().filter_map(|s| s.id).collect())
    }

    async fn inspect(&self, id: &str) -> Result<ContainerImageRef> {
        let inspect = self
            .docker
            .inspect_container(id, None::<InspectContainerOptions>)
            .await
            .with_context(|| format!("failed to inspect container {id}"))?;
        let config = inspect.config.unwrap_or_default();
        Ok(ContainerImageRef {
            id: inspect.id.unwrap_or_else(|| id.to_string()),
            name: config.image.unwrap_or_default(),
            entrypoint: config.entrypoint.unwrap_or_default(),
            cmd: config.cmd.unwrap_or_default(),
        })
    }
}

/// Abstraction over pulling a file out of a running container's filesystem.
#[allow(async_fn_in_trait)]
pub trait ContainerFs {
    /// Copy `container_path` from inside `container_id` to `dest` on the host.
    ///
    /// # Errors
    ///
    /// Returns an error if the copy cannot run or reports failure.
    async fn copy_from(
        &self,
        container_id: &str,
        container_path: &str,
        dest: &Path,
    ) -> Result<()>;
}

/// Production file retrieval — shells out to `docker cp`.
pub struct DockerCp<R> {
    runner: R,
}

impl<R> DockerCp<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ContainerFs for DockerCp<R> {
    async fn copy_from(
        &self,
        container_id: &str,
        container_path: &str,
        dest: &Path,
    ) -> Result<()> {
        let source = format!("{container_id}:{container_path}");
        let dest = dest.to_string_lossy();
        tracing::info!(%source, dest = %dest, "copying entrypoint out of container");
        let output = self.runner.run("docker", &["cp", &source, &dest]).await?;
        if !output.status.success() {
            anyhow::bail!(
                "docker cp {source} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image_ref(entrypoint: &[&str], cmd: &[&str]) -> ContainerImageRef {
        ContainerImageRef {
            id: "abc123".into(),
            name: "nginx:latest".into(),
            entrypoint: entrypoint.iter().map(ToString::to_string).collect(),
            cmd: cmd.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn invocation_tokens_prefers_entrypoint() {
        let c = image_ref(&["/entry.sh"], &["nginx", "-g"]);
        assert_eq!(c.invocation_tokens(), ["/entry.sh"]);
    }

    #[test]
    fn invocation_tokens_falls_back_to_cmd() {
        let c = image_ref(&[], &["nginx", "-g"]);
        assert_eq!(c.invocation_tokens(), ["nginx", "-g"]);
    }

    #[test]
    fn invocation_tokens_empty_when_neither_set() {
        let c = image_ref(&[], &[]);
        assert!(c.invocation_tokens().is_empty());
    }
}
