//! Fuzz target for batch loading and action selection.
//!
//! Goal: for any batch, loading should **never panic**, and when it succeeds the action
//! filter must only return files declaring the action, each at most once.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_action_filter
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use regoscope_domain::{RegoParser, load_policies_with_action};
use std::collections::{BTreeMap, BTreeSet};

#[derive(Arbitrary, Debug)]
struct BatchInput {
    files: BTreeMap<String, String>,
    action: String,
}

fuzz_target!(|input: BatchInput| {
    if input.files.len() > 16 || input.files.values().any(|c| c.len() > 4096) {
        return;
    }

    if let Ok(files) = load_policies_with_action(&RegoParser, &input.files, &input.action) {
        let mut seen = BTreeSet::new();
        for file in &files {
            if input.action.is_empty() {
                assert!(file.is_policy());
            } else {
                assert!(file.has_action(&input.action));
            }
            assert!(seen.insert(file.file_path.clone()));
        }
    }
});
