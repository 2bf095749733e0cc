//! `paredown resolve` — the default action: resolve the entrypoint dependency
//! closure of the first running container.

use anyhow::{Context, Result};

use crate::command_runner::{DEFAULT_CMD_TIMEOUT, TokioCommandRunner};
use crate::config::ResolverConfig;
use crate::docker::{ContainerInspector, DockerCp, DockerInspector};
use crate::output::OutputContext;
use crate::resolver::aggregate::Resolver;
use crate::resolver::manifest::ResolutionManifest;
use crate::resolver::probe::SystemProbe;

/// Run the resolver against the first running container.
///
/// # Errors
///
/// Returns an error if the Docker daemon is unreachable, no container is
/// running, inspection fails, or the resolution pipeline aborts.
pub async fn run(ctx: &OutputContext, json: bool) -> Result<()> {
    let config = ResolverConfig::load()?;
    let inspector = DockerInspector::connect()?;

    let ids = inspector.list_containers().await?;
    let first = ids
        .first()
        .ok_or_else(|| anyhow::anyhow!("no running containers found"))?;
    let container = inspector.inspect(first).await?;
    tracing::info!(image = %container.name, container = %container.id, "inspecting container");

    let runner = TokioCommandRunner::new(DEFAULT_CMD_TIMEOUT);
    let resolver = Resolver::new(SystemProbe::new(runner), DockerCp::new(runner), &config);
    let manifest = resolver.resolve(&container).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&manifest).context("JSON serialization failed")?
        );
    } else {
        render(ctx, &manifest);
    }
    Ok(())
}

/// Human-readable manifest rendering.
fn render(ctx: &OutputContext, manifest: &ResolutionManifest) {
    ctx.header(&format!(
        "{} ({})",
        manifest.image,
        short_id(&manifest.container_id)
    ));
    if manifest.commands.is_empty() {
        ctx.warn("no resolvable commands found");
    }
    for command in &manifest.commands {
        ctx.kv(&command.name, &command.path.display().to_string());
    }
    if !manifest.libraries.is_empty() {
        ctx.header("shared libraries");
        for lib in &manifest.libraries {
            ctx.info(&lib.path.display().to_string());
        }
    }
    ctx.success(&format!(
        "{} commands, {} libraries required by the entrypoint",
        manifest.commands.len(),
        manifest.libraries.len()
    ));
}

/// Container ids are hex; the first 12 characters are the familiar short form.
fn short_id(id: &str) -> &str {
    &id[..id.len().min(12)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_id_truncates_long_ids() {
        assert_eq!(short_id("0123456789abcdef0123"), "0123456789ab");
    }

    #[test]
    fn short_id_keeps_short_ids_whole() {
        assert_eq!(short_id("c0ffee"), "c0ffee");
    }
}
