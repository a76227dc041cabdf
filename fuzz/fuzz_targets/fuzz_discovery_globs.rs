//! Fuzz target for discovery include/exclude filtering.
//!
//! Goal: glob compilation and matching should **never panic** on any input.
//! It may return errors for invalid patterns, but panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_discovery_globs
//! ```

#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct GlobInput {
    include: Vec<String>,
    exclude: Vec<String>,
    candidates: Vec<String>,
}

fuzz_target!(|input: GlobInput| {
    if input.include.len() > 20 || input.exclude.len() > 20 || input.candidates.len() > 100 {
        return;
    }

    let keep = |v: Vec<String>, max: usize| -> Vec<String> {
        v.into_iter().filter(|s| s.len() <= max).collect()
    };
    let include = keep(input.include, 256);
    let exclude = keep(input.exclude, 256);
    let candidates = keep(input.candidates, 512);

    // Should never panic - errors are fine
    let _ = regoscope_repo::fuzz::filter_candidates(&include, &exclude, &candidates);
});
