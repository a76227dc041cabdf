use crate::classify::classify;
use crate::error::ParseError;
use regoscope_syntax::{Module, ModuleParser};
use regoscope_types::{FilePath, RegoFile};

/// Parse one file and build its classified record.
///
/// Pure: the same `(path, contents)` always yields an equal record.
pub fn load<P: ModuleParser + ?Sized>(
    parser: &P,
    path: &str,
    contents: &str,
) -> Result<RegoFile, ParseError> {
    let module = parse_file(parser, path, contents)?;
    let file = build_file(path, contents, &module);

    tracing::trace!(
        path,
        package = %file.package_name,
        actions = ?file.rules_actions,
        "loaded rego module"
    );

    Ok(file)
}

/// Parse one file, attributing a syntax error to `path`.
pub fn parse_file<P: ModuleParser + ?Sized>(
    parser: &P,
    path: &str,
    contents: &str,
) -> Result<Module, ParseError> {
    parser
        .parse_module(path, contents)
        .map_err(|source| ParseError {
            path: FilePath::new(path),
            source,
        })
}

/// The classified record of an already parsed module.
pub fn build_file(path: &str, contents: &str, module: &Module) -> RegoFile {
    RegoFile {
        file_path: FilePath::new(path),
        package_name: module.package.path.to_string(),
        import_packages: module.imports.iter().map(|i| i.path.to_string()).collect(),
        contents: contents.to_string(),
        rules_actions: classify(&module.rules),
        comments: comments(module),
    }
}

fn comments(module: &Module) -> Vec<String> {
    module.comments.iter().map(|c| c.text.clone()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use regoscope_syntax::RegoParser;

    const POLICY: &str = r#"# METADATA
# title: Pods must not run as root
package kubernetes.admission

import data.lib.k8s
import input.request as req
import data.lib.k8s

# Deny root containers.
deny[msg] {
    req.object.spec.securityContext.runAsUser == 0
    msg := "containers must not run as root" # inline
}

warn[msg] {
    not req.object.metadata.labels.team
    msg := "missing team label"
}
"#;

    #[test]
    fn builds_every_field() {
        let file = load(&RegoParser, "policy/root.rego", POLICY).expect("load");

        assert_eq!(file.file_path.as_str(), "policy/root.rego");
        assert_eq!(file.package_name, "data.kubernetes.admission");
        assert_eq!(
            file.import_packages,
            vec!["data.lib.k8s", "input.request", "data.lib.k8s"]
        );
        assert_eq!(file.contents, POLICY);
        assert_eq!(file.rules_actions, vec!["deny", "warn"]);
        assert_eq!(
            file.comments,
            vec![
                " METADATA",
                " title: Pods must not run as root",
                " Deny root containers.",
                " inline"
            ]
        );
    }

    #[test]
    fn is_deterministic() {
        let a = load(&RegoParser, "a.rego", POLICY).expect("load");
        let b = load(&RegoParser, "a.rego", POLICY).expect("load");
        assert_eq!(a, b);
    }

    #[test]
    fn parse_then_build_matches_load() {
        let module = parse_file(&RegoParser, "a.rego", POLICY).expect("parse");
        assert_eq!(module.rules.len(), 2);
        let built = build_file("a.rego", POLICY, &module);
        assert_eq!(built, load(&RegoParser, "a.rego", POLICY).expect("load"));
    }

    #[test]
    fn module_without_rules_is_a_library() {
        let file = load(&RegoParser, "lib.rego", "package lib.k8s\n").expect("load");
        assert_eq!(file.package_name, "data.lib.k8s");
        assert!(file.import_packages.is_empty());
        assert!(file.rules_actions.is_empty());
        assert!(file.comments.is_empty());
        assert!(!file.is_policy());
    }

    #[test]
    fn syntax_error_carries_path_and_diagnostic() {
        let err = load(&RegoParser, "broken.rego", "package p\ndeny[msg] {\n").unwrap_err();
        assert_eq!(err.path.as_str(), "broken.rego");
        assert_eq!(err.source.path, "broken.rego");
        assert_eq!(err.source.line, 2);
        assert_eq!(err.source.message, "unexpected eof, expected `}`");
    }
}
