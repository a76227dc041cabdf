//! The `inspect` use case: show how one file is seen by the loader.

use regoscope_domain::{RegoParser, action_of, build_file, parse_file};
use regoscope_types::RegoFile;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InspectedRule {
    /// Canonical head rendering, the text actions are matched against.
    pub head: String,
    pub action: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InspectOutput {
    pub file: RegoFile,
    pub rules: Vec<InspectedRule>,
}

/// Parse `contents` once and list every rule head with the action it declares, if any.
pub fn run_inspect(path: &str, contents: &str) -> anyhow::Result<InspectOutput> {
    let module = parse_file(&RegoParser, path, contents)?;
    let file = build_file(path, contents, &module);

    let rules = module
        .rules
        .iter()
        .map(|rule| {
            let head = rule.head.to_string();
            let action = action_of(&head).map(str::to_string);
            InspectedRule { head, action }
        })
        .collect();

    Ok(InspectOutput { file, rules })
}
