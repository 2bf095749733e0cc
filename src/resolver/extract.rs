//! Script command extraction — which external commands does a shell script
//! actually invoke?

use std::sync::LazyLock;

use regex::Regex;

use crate::resolver::probe::EnvironmentProbe;

/// Shell keywords, builtins, and operators interpreted by the shell itself
/// rather than resolved as external executables.
const SHELL_BUILTINS: &[&str] = &[
    "exit", "return", "set", "unset", "export",
    "if", "then", "else", "elif", "fi",
    "gt", "lt", "ge", "le", "eq", "ne",
    "case", "esac", "for", "select", "while",
    "until", "do", "done", "in", "function",
    "time",
    "{", "}", "[[", "]]",
    "!", "|", "&", ";", "=",
];

/// Matches bareword identifiers and single-or-double-dash flag tokens as one
/// lexical class, so flags can be recognized and dropped in the same pass.
/// No leading `\b`: there is no word boundary between whitespace and `-`, so
/// anchoring the alternation on one would split `-sSL` into a bareword `sSL`.
static WORD_RE: LazyLock<Regex> = LazyLock::new(|| {
    // Safety: this is a compile-time constant pattern — cannot fail.
    #[allow(clippy::expect_used)]
    Regex::new(r"(-{1,2}[a-zA-Z_][a-zA-Z0-9_]*|[a-zA-Z_][a-zA-Z0-9_]*)\b").expect("valid regex")
});

static ENV_LIKE_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[A-Z_]+$").expect("valid regex")
});

/// Names consisting solely of uppercase letters and underscores are assumed
/// to be environment-variable references, not commands. Every membership
/// check treats them as already present: they count as builtins during
/// filtering and as seen during dedup, so they never survive extraction.
fn is_env_like(token: &str) -> bool {
    ENV_LIKE_RE.is_match(token)
}

fn is_shell_builtin(token: &str) -> bool {
    SHELL_BUILTINS.contains(&token) || is_env_like(token)
}

/// Ordered, name-deduplicated accumulation of extracted command names.
///
/// Scoped to one resolution run — never shared across runs.
#[derive(Debug, Default)]
pub struct CommandSet {
    names: Vec<String>,
}

impl CommandSet {
    /// Whether `name` is already present. Environment-variable-style names
    /// (all uppercase/underscores) always count as present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        is_env_like(name) || self.names.iter().any(|n| n == name)
    }

    /// Insert preserving first-occurrence order. Returns `false` when the
    /// name was already present and nothing changed.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<String> {
        self.names
    }
}

/// Extract the external commands a script plausibly invokes.
///
/// Per line: skip blanks and `#` comments, tokenize into barewords and flag
/// tokens, drop shell builtins/keywords and flag-like tokens, drop names that do not
/// resolve on the current search path, and keep the rest in first-occurrence
/// order.
///
/// A script that invokes no resolvable external command yields an empty set;
/// that is a valid result, not an error.
pub async fn extract_commands(script: &str, probe: &impl EnvironmentProbe) -> CommandSet {
    let mut commands = CommandSet::default();
    for line in script.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        for token in WORD_RE.find_iter(line).map(|m| m.as_str()) {
            if is_shell_builtin(token) || token.starts_with('-') {
                continue;
            }
            if probe.resolve_path(token).await.is_err() {
                // Not on the search path: not a real command.
                continue;
            }
            if commands.insert(token) {
                tracing::debug!(command = token, "extracted command");
            }
        }
    }
    commands
}

#[cfg(test)]
mod tests {
    use std::path::{Path, PathBuf};

    use super::*;
    use crate::resolver::probe::CommandNotFound;

    /// Probe with a fixed set of resolvable names; `["*"]` resolves anything.
    struct FakePath(Vec<&'static str>);

    impl EnvironmentProbe for FakePath {
        async fn resolve_path(&self, command: &str) -> Result<PathBuf, CommandNotFound> {
            if self.0.contains(&"*") || self.0.contains(&command) {
                Ok(PathBuf::from(format!("/usr/bin/{command}")))
            } else {
                Err(CommandNotFound(command.to_string()))
            }
        }

        async fn library_closure(&self, _: &Path) -> anyhow::Result<Vec<PathBuf>> {
            anyhow::bail!("not expected in this test")
        }
    }

    fn resolve_all() -> FakePath {
        FakePath(vec!["*"])
    }

    #[tokio::test]
    async fn blank_and_comment_lines_yield_nothing() {
        let script = "\n   \n# just a comment\n  # indented comment\n\n";
        let commands = extract_commands(script, &resolve_all()).await;
        assert!(commands.is_empty());
    }

    #[tokio::test]
    async fn builtins_are_excluded_even_when_resolvable() {
        let script = "if true\nthen export PATH\nfi\nwhile time do done";
        let commands = extract_commands(script, &resolve_all()).await;
        assert_eq!(commands.into_vec(), vec!["true".to_string()]);
    }

    #[tokio::test]
    async fn flag_tokens_are_excluded() {
        let script = "ls -l --all --color";
        let commands = extract_commands(script, &resolve_all()).await;
        assert_eq!(commands.into_vec(), vec!["ls".to_string()]);
    }

    #[tokio::test]
    async fn unresolvable_names_are_dropped() {
        let script = "ls myapp";
        let commands = extract_commands(script, &FakePath(vec!["ls"])).await;
        assert_eq!(commands.into_vec(), vec!["ls".to_string()]);
    }

    #[tokio::test]
    async fn repeated_names_appear_once() {
        let script = "curl one\ncurl two\ncurl three";
        let commands = extract_commands(script, &FakePath(vec!["curl"])).await;
        assert_eq!(commands.into_vec(), vec!["curl".to_string()]);
    }

    #[tokio::test]
    async fn first_occurrence_order_is_preserved() {
        let script = "tar x\ncurl y\ntar z";
        let commands = extract_commands(script, &FakePath(vec!["tar", "curl"])).await;
        assert_eq!(
            commands.into_vec(),
            vec!["tar".to_string(), "curl".to_string()]
        );
    }

    #[tokio::test]
    async fn extraction_is_idempotent() {
        let script = "#!/bin/sh\ncurl -sSL http://x | sh\nexec myapp --flag\n";
        let probe = FakePath(vec!["curl", "sh", "exec", "myapp"]);
        let first = extract_commands(script, &probe).await.into_vec();
        let second = extract_commands(script, &probe).await.into_vec();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn exec_is_not_in_the_builtin_list() {
        let script = "exec myapp";
        let commands = extract_commands(script, &FakePath(vec!["exec", "myapp"])).await;
        assert_eq!(
            commands.into_vec(),
            vec!["exec".to_string(), "myapp".to_string()]
        );
    }

    #[tokio::test]
    async fn env_like_names_never_survive() {
        let script = "MY_APP_HOME curl";
        let commands = extract_commands(script, &resolve_all()).await;
        assert_eq!(commands.into_vec(), vec!["curl".to_string()]);
    }

    #[test]
    fn command_set_treats_env_like_names_as_seen() {
        let set = CommandSet::default();
        assert!(set.contains("SOME_VAR"));
        assert!(!set.contains("some_var"));
    }

    #[test]
    fn command_set_insert_dedups() {
        let mut set = CommandSet::default();
        assert!(set.insert("curl"));
        assert!(!set.insert("curl"));
        assert!(!set.insert("HTTP_PROXY"));
        assert_eq!(set.len(), 1);
    }
}
