use crate::FilePath;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A parsed and classified Rego source file.
///
/// Built once per load call from a `(path, contents)` pair and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RegoFile {
    pub file_path: FilePath,

    /// Package the module declares itself under, rooted at `data` (e.g. `data.main`).
    pub package_name: String,

    /// Imported refs in declaration order. Duplicates are kept.
    #[serde(default)]
    pub import_packages: Vec<String>,

    /// Raw source text, kept verbatim for later evaluation.
    pub contents: String,

    /// Action tags of the module's rules, in rule order. Duplicates are kept.
    #[serde(default)]
    pub rules_actions: Vec<String>,

    /// Comment text in source order, without the leading `#`.
    #[serde(default)]
    pub comments: Vec<String>,
}

impl RegoFile {
    /// A policy is a file with at least one action tag.
    pub fn is_policy(&self) -> bool {
        !self.rules_actions.is_empty()
    }

    pub fn has_action(&self, action: &str) -> bool {
        self.rules_actions.iter().any(|a| a == action)
    }
}
