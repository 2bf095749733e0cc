//! Runtime environment probe — command path resolution and shared-library
//! introspection via external OS tools.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;

use crate::command_runner::CommandRunner;

/// A command name that did not resolve on the search path.
///
/// Recoverable: the caller logs it and continues with the next command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("command `{0}` not found on PATH")]
pub struct CommandNotFound(pub String);

/// Abstraction over the ambient OS facilities the resolver depends on,
/// enabling test doubles.
#[allow(async_fn_in_trait)]
pub trait EnvironmentProbe {
    /// Resolve a command name to an absolute path, like a shell's `which`.
    ///
    /// # Errors
    ///
    /// Returns [`CommandNotFound`] if the name is not on the search path.
    async fn resolve_path(&self, command: &str) -> Result<PathBuf, CommandNotFound>;

    /// List the shared libraries a binary links against at load time.
    ///
    /// One flat scan of a single introspection-tool invocation: absolute
    /// paths in its output are captured as printed, with no recursive
    /// re-invocation per dependency.
    ///
    /// # Errors
    ///
    /// Returns an error if the tool cannot run or reports failure (e.g. the
    /// binary is statically linked). Not recoverable — it aborts the closure
    /// computation for the run.
    async fn library_closure(&self, binary: &Path) -> Result<Vec<PathBuf>>;
}

/// Production probe — shells out to `which` and `ldd`.
pub struct SystemProbe<R> {
    runner: R,
}

impl<R> SystemProbe<R> {
    #[must_use]
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> EnvironmentProbe for SystemProbe<R> {
    async fn resolve_path(&self, command: &str) -> Result<PathBuf, CommandNotFound> {
        // A failure to run `which` at all is indistinguishable from a miss
        // for the caller's purposes: the command cannot be resolved.
        let Ok(output) = self.runner.run("which", &[command]).await else {
            return Err(CommandNotFound(command.to_string()));
        };
        if !output.status.success() {
            return Err(CommandNotFound(command.to_string()));
        }
        let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if path.is_empty() {
            return Err(CommandNotFound(command.to_string()));
        }
        Ok(PathBuf::from(path))
    }

    async fn library_closure(&self, binary: &Path) -> Result<Vec<PathBuf>> {
        let binary = binary.to_string_lossy();
        let output = self
            .runner
            .run("ldd", &[&binary])
            .await
            .with_context(|| format!("failed to run ldd on {binary}"))?;
        if !output.status.success() {
            anyhow::bail!(
                "ldd {binary} failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(parse_library_paths(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Absolute filesystem paths embedded in the tool's human-readable output.
static LIB_PATH_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"/\S+").expect("valid regex")
});

/// Pull every absolute path out of `ldd`-style output, in print order.
///
/// Lines without a path (`linux-vdso.so.1 (0x...)`) and unresolved entries
/// (`libfoo.so => not found`) contribute nothing.
#[must_use]
pub fn parse_library_paths(output: &str) -> Vec<PathBuf> {
    LIB_PATH_RE
        .find_iter(output)
        .map(|m| PathBuf::from(m.as_str()))
        .collect()
}
