//! The resolution manifest — the terminal artifact of one run.

use std::path::PathBuf;

use serde::Serialize;

use crate::docker::ContainerImageRef;

/// A command name together with the absolute path it resolved to.
///
/// Names that fail to resolve are logged and skipped upstream; a reference
/// here always carries a non-empty path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandReference {
    pub name: String,
    pub path: PathBuf,
}

/// Absolute path to a shared library required by at least one resolved
/// command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct LibraryDependency {
    pub path: PathBuf,
}

/// Everything the entrypoint needs: resolved commands plus the shared
/// libraries they load. Consumed immediately — printed or handed to an
/// image-rebuild step — never persisted.
#[derive(Debug, Serialize)]
pub struct ResolutionManifest {
    pub image: String,
    pub container_id: String,
    pub commands: Vec<CommandReference>,
    pub libraries: Vec<LibraryDependency>,
}

impl ResolutionManifest {
    #[must_use]
    pub fn new(container: &ContainerImageRef) -> Self {
        Self {
            image: container.name.clone(),
            container_id: container.id.clone(),
            commands: Vec::new(),
            libraries: Vec::new(),
        }
    }

    /// Record a resolved command.
    pub fn push_command(&mut self, name: String, path: PathBuf) {
        self.commands.push(CommandReference { name, path });
    }

    /// Record a library path, keeping first-occurrence order. A library
    /// required by two commands appears once.
    pub fn push_library(&mut self, path: PathBuf) {
        if !self.libraries.iter().any(|l| l.path == path) {
            self.libraries.push(LibraryDependency { path });
        }
    }
}
