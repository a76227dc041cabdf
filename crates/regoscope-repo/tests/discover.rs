//! Integration tests for policy discovery against the shared fixtures.
//!
//! Discovery must produce a stable, sorted list regardless of filesystem traversal order.

use camino::Utf8PathBuf;
use regoscope_repo::{DiscoverOptions, discover_policies, load_directory};
use std::path::PathBuf;

/// Get the path to the test fixtures directory (repo root / tests / fixtures).
fn fixtures_dir() -> Utf8PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    // crates/regoscope-repo -> crates -> repo root
    let repo_root = manifest_dir
        .parent()
        .expect("regoscope-repo should have parent (crates)")
        .parent()
        .expect("crates should have parent (repo root)");
    Utf8PathBuf::from_path_buf(repo_root.join("tests").join("fixtures"))
        .expect("fixture path should be valid UTF-8")
}

fn discovered(fixture: &str, options: &DiscoverOptions) -> Vec<String> {
    discover_policies(&fixtures_dir().join(fixture), options)
        .expect("discovery should succeed")
        .into_iter()
        .map(|p| p.into_string())
        .collect()
}

#[test]
fn mixed_fixture_skips_tests_and_non_rego_files() {
    assert_eq!(
        discovered("policies_mixed", &DiscoverOptions::default()),
        vec![
            "lib/k8s.rego",
            "policy/labels.rego",
            "policy/run_as_root.rego"
        ]
    );
}

#[test]
fn mixed_fixture_with_tests() {
    let options = DiscoverOptions {
        include_tests: true,
        ..DiscoverOptions::default()
    };
    assert_eq!(
        discovered("policies_mixed", &options),
        vec![
            "lib/k8s.rego",
            "policy/labels.rego",
            "policy/run_as_root.rego",
            "policy/run_as_root_test.rego"
        ]
    );
}

#[test]
fn configured_fixture_globs() {
    let options = DiscoverOptions {
        include: vec!["policy/**".to_string()],
        exclude: vec!["policy/experimental/**".to_string()],
        include_tests: false,
    };
    assert_eq!(
        discovered("configured", &options),
        vec!["policy/privileged.rego", "policy/replicas.rego"]
    );
}

#[test]
fn discovery_is_repeatable() {
    let first = discovered("policies_mixed", &DiscoverOptions::default());
    for _ in 0..5 {
        assert_eq!(discovered("policies_mixed", &DiscoverOptions::default()), first);
    }
}

#[test]
fn load_directory_returns_raw_contents() {
    let root = fixtures_dir().join("syntax_error");
    let sources = load_directory(&root, &DiscoverOptions::default()).expect("load");

    let keys: Vec<&str> = sources.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["policy/broken.rego", "policy/ok.rego"]);

    let expected = std::fs::read_to_string(root.join("policy/broken.rego")).expect("read");
    assert_eq!(sources["policy/broken.rego"], expected);
}
