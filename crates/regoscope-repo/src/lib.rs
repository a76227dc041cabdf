//! Repository adapters: discover `.rego` files and read them into memory.
//!
//! This crate is allowed to do filesystem IO. It does not parse Rego; the returned
//! path → contents mapping is handed to the pure loader by the caller.

#![forbid(unsafe_code)]

mod discover;
mod read;

use anyhow::Context;
use camino::Utf8Path;
use std::collections::BTreeMap;

pub use discover::{DiscoverOptions, discover_policies};
pub use read::read_sources;

/// Fuzz-friendly API for testing path filtering without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Apply discovery filtering to a list of candidate relative paths.
    ///
    /// Returns `Ok(selected_paths)` if every pattern compiles, `Err(...)` otherwise.
    /// **Never panics** on any input.
    pub fn filter_candidates(
        include: &[String],
        exclude: &[String],
        candidates: &[String],
    ) -> anyhow::Result<Vec<String>> {
        let options = DiscoverOptions {
            include: include.to_vec(),
            exclude: exclude.to_vec(),
            include_tests: false,
        };
        let filter = discover::PathFilter::new(&options)?;
        Ok(candidates
            .iter()
            .filter(|c| filter.accepts(c))
            .cloned()
            .collect())
    }
}

/// Discover and read every selected `.rego` file under `root`.
///
/// Keys are root-relative, forward-slash paths; the map iterates in sorted order.
pub fn load_directory(
    root: &Utf8Path,
    options: &DiscoverOptions,
) -> anyhow::Result<BTreeMap<String, String>> {
    let paths = discover_policies(root, options).context("discover policies")?;
    read_sources(root, &paths)
}
