//! Entrypoint classification.

/// How an entrypoint invocation should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntrypointKind {
    /// A shell script whose text must be analyzed for invoked commands.
    Script,
    /// A directly executable binary.
    Binary,
    /// No invocable token: entrypoint and cmd are both empty.
    Unresolved,
}

/// Filename-suffix policy deciding whether a token names a shell script.
///
/// Suffix matching is a heuristic: an extension-less script classifies as
/// Binary and a binary named `foo.sh` classifies as Script. The suffix list
/// is injectable so the trade-off stays visible and testable instead of
/// buried in string slicing.
#[derive(Debug, Clone)]
pub struct ScriptPolicy {
    suffixes: Vec<String>,
}

impl Default for ScriptPolicy {
    fn default() -> Self {
        Self {
            suffixes: vec![".sh".to_string()],
        }
    }
}

impl ScriptPolicy {
    #[must_use]
    pub fn new(suffixes: Vec<String>) -> Self {
        Self { suffixes }
    }

    /// Classify an invocation by its first token.
    #[must_use]
    pub fn classify(&self, tokens: &[String]) -> EntrypointKind {
        match tokens.first() {
            None => EntrypointKind::Unresolved,
            Some(token) if self.suffixes.iter().any(|s| token.ends_with(s.as_str())) => {
                EntrypointKind::Script
            }
            Some(_) => EntrypointKind::Binary,
        }
    }
}
