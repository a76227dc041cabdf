use crate::{load_libraries, load_policies, load_policies_with_action};
use proptest::prelude::*;
use regoscope_syntax::RegoParser;
use std::collections::BTreeMap;

fn module_text(package: &str, heads: &[String]) -> String {
    let mut out = format!("package {package}\n");
    for head in heads {
        out.push_str(&format!("\n{head} {{\n    msg := \"x\"\n}}\n"));
    }
    out
}

const KEYWORDS: &[&str] = &[
    "package", "import", "as", "default", "else", "not", "some", "every", "in", "with", "if",
    "contains", "true", "false", "null",
];

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z]{1,6}".prop_filter("keyword", |n| !KEYWORDS.contains(&n.as_str()))
}

fn arb_head() -> impl Strategy<Value = String> {
    prop_oneof![
        "(deny|warn|violation)".prop_map(|a| format!("{a}[msg]")),
        arb_name().prop_map(|a| format!("{a}[msg]")),
        arb_name().prop_map(|a| format!("{a}[reason]")),
        Just("allow".to_string()),
        Just("deny contains msg if".to_string()),
    ]
}

fn arb_batch() -> impl Strategy<Value = BTreeMap<String, String>> {
    prop::collection::btree_map(
        "[a-z]{1,6}\\.rego",
        (arb_name(), prop::collection::vec(arb_head(), 0..4))
            .prop_map(|(pkg, heads)| module_text(&pkg, &heads)),
        0..6,
    )
}

proptest! {
    #[test]
    fn loading_is_deterministic(batch in arb_batch()) {
        let a = load_libraries(&RegoParser, &batch).expect("load");
        let b = load_libraries(&RegoParser, &batch).expect("load");
        prop_assert_eq!(a, b);
    }

    #[test]
    fn libraries_cover_every_input(batch in arb_batch()) {
        let files = load_libraries(&RegoParser, &batch).expect("load");
        prop_assert_eq!(files.len(), batch.len());
        for file in &files {
            prop_assert_eq!(Some(&file.contents), batch.get(file.file_path.as_str()));
        }
    }

    #[test]
    fn policies_are_the_libraries_with_actions(batch in arb_batch()) {
        let libraries = load_libraries(&RegoParser, &batch).expect("load");
        let policies = load_policies(&RegoParser, &batch).expect("load");
        let expected: Vec<_> = libraries.into_iter().filter(|f| f.is_policy()).collect();
        prop_assert_eq!(policies, expected);
    }

    #[test]
    fn empty_action_is_policies(batch in arb_batch()) {
        let policies = load_policies(&RegoParser, &batch).expect("load");
        let empty = load_policies_with_action(&RegoParser, &batch, "").expect("load");
        prop_assert_eq!(policies, empty);
    }

    #[test]
    fn action_selection_is_exact_and_unique(batch in arb_batch(), action in "(deny|warn|violation)") {
        let selected = load_policies_with_action(&RegoParser, &batch, &action).expect("load");
        let mut seen = std::collections::BTreeSet::new();
        for file in &selected {
            prop_assert!(file.has_action(&action));
            prop_assert!(seen.insert(file.file_path.clone()));
        }
        let libraries = load_libraries(&RegoParser, &batch).expect("load");
        let expected = libraries.iter().filter(|f| f.has_action(&action)).count();
        prop_assert_eq!(selected.len(), expected);
    }
}
