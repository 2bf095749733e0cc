//! Resolver configuration (`~/.paredown/config.yaml`).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Tunable resolver behavior. A missing config file yields the defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Filename suffixes classified as shell scripts.
    pub script_suffixes: Vec<String>,
    /// Whether direct binary entrypoints also get a shared-library closure.
    /// Off by default: a binary entrypoint yields its resolved path only.
    pub compute_library_closure_for_binaries: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            script_suffixes: vec![".sh".to_string()],
            compute_library_closure_for_binaries: false,
        }
    }
}

impl ResolverConfig {
    /// Load from the default path (`~/.paredown/config.yaml`).
    ///
    /// # Errors
    ///
    /// Returns an error if the home directory cannot be determined, or if
    /// the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let home =
            dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))?;
        Self::load_from(&home.join(".paredown").join("config.yaml"))
    }

    /// Load from an explicit path (used in tests).
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_script_only_closure() {
        let config = ResolverConfig::default();
        assert_eq!(config.script_suffixes, vec![".sh".to_string()]);
        assert!(!config.compute_library_closure_for_binaries);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let config = ResolverConfig::load_from(&dir.path().join("config.yaml")).expect("load");
        assert_eq!(config.script_suffixes, vec![".sh".to_string()]);
    }

    #[test]
    fn partial_yaml_keeps_defaults_for_the_rest() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "compute_library_closure_for_binaries: true\n").expect("write");
        let config = ResolverConfig::load_from(&path).expect("load");
        assert!(config.compute_library_closure_for_binaries);
        assert_eq!(config.script_suffixes, vec![".sh".to_string()]);
    }

    #[test]
    fn custom_suffixes_are_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "script_suffixes: [\".sh\", \".bash\"]\n").expect("write");
        let config = ResolverConfig::load_from(&path).expect("load");
        assert_eq!(
            config.script_suffixes,
            vec![".sh".to_string(), ".bash".to_string()]
        );
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "script_suffixes: {not: [valid").expect("write");
        assert!(ResolverConfig::load_from(&path).is_err());
    }
}
