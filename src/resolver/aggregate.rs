//! Dependency closure aggregation — drives classification, extraction, path
//! resolution, and library introspection for one container.

use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::config::ResolverConfig;
use crate::docker::{ContainerFs, ContainerImageRef};
use crate::resolver::classify::{EntrypointKind, ScriptPolicy};
use crate::resolver::extract::extract_commands;
use crate::resolver::manifest::ResolutionManifest;
use crate::resolver::probe::EnvironmentProbe;

/// One-shot resolver for a single container.
///
/// All accumulation is scoped to one `resolve` call, so a resolver can be
/// reused across containers without state leaking between runs.
pub struct Resolver<P, F> {
    probe: P,
    fs: F,
    policy: ScriptPolicy,
    closure_for_binaries: bool,
}

impl<P: EnvironmentProbe, F: ContainerFs> Resolver<P, F> {
    #[must_use]
    pub fn new(probe: P, fs: F, config: &ResolverConfig) -> Self {
        Self {
            probe,
            fs,
            policy: ScriptPolicy::new(config.script_suffixes.clone()),
            closure_for_binaries: config.compute_library_closure_for_binaries,
        }
    }

    /// Resolve the dependency closure of `container`'s entrypoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the container has no entrypoint or cmd, if the
    /// script cannot be staged or read, or if library introspection fails.
    /// A command name that does not resolve on the search path is logged
    /// and skipped, never fatal.
    pub async fn resolve(&self, container: &ContainerImageRef) -> Result<ResolutionManifest> {
        let tokens = container.invocation_tokens();
        let kind = self.policy.classify(tokens);
        tracing::info!(
            image = %container.name,
            container = %container.id,
            ?kind,
            "classified entrypoint"
        );
        match kind {
            EntrypointKind::Unresolved => {
                anyhow::bail!("container {} has no entrypoint or cmd", container.id)
            }
            EntrypointKind::Script => self.resolve_script(container, &tokens[0]).await,
            EntrypointKind::Binary => self.resolve_binary(container, &tokens[0]).await,
        }
    }

    /// Script branch: stage the script locally, extract the commands it
    /// invokes, then resolve them and compute the library closure.
    async fn resolve_script(
        &self,
        container: &ContainerImageRef,
        script_path: &str,
    ) -> Result<ResolutionManifest> {
        // The staged copy lives exactly as long as this call; the temp file
        // is removed on drop on every exit path, extraction errors included.
        let staged = tempfile::NamedTempFile::new().context("failed to create staging file")?;
        self.fs
            .copy_from(&container.id, script_path, staged.path())
            .await?;
        let text = tokio::fs::read_to_string(staged.path())
            .await
            .with_context(|| format!("failed to read staged script {script_path}"))?;

        let commands = extract_commands(&text, &self.probe).await;
        tracing::info!(total = commands.len(), "extracted script commands");
        self.assemble(container, commands.into_vec(), true).await
    }

    /// Binary branch: the entrypoint token is the one command. The library
    /// closure is only computed when configured on.
    async fn resolve_binary(
        &self,
        container: &ContainerImageRef,
        binary: &str,
    ) -> Result<ResolutionManifest> {
        self.assemble(
            container,
            vec![binary.to_string()],
            self.closure_for_binaries,
        )
        .await
    }

    async fn assemble(
        &self,
        container: &ContainerImageRef,
        names: Vec<String>,
        with_closure: bool,
    ) -> Result<ResolutionManifest> {
        let mut manifest = ResolutionManifest::new(container);
        let mut paths: Vec<PathBuf> = Vec::new();

        for name in names {
            match self.probe.resolve_path(&name).await {
                Ok(path) => {
                    tracing::info!(command = %name, path = %path.display(), "resolved command");
                    if !paths.contains(&path) {
                        paths.push(path.clone());
                    }
                    manifest.push_command(name, path);
                }
                Err(err) => {
                    tracing::error!(command = %name, %err, "skipping unresolved command");
                }
            }
        }

        if with_closure {
            for path in &paths {
                let libs = self
                    .probe
                    .library_closure(path)
                    .await
                    .with_context(|| format!("failed to list libraries of {}", path.display()))?;
                for lib in libs {
                    manifest.push_library(lib);
                }
            }
            tracing::info!(total = manifest.libraries.len(), "collected shared libraries");
        }

        Ok(manifest)
    }
}
