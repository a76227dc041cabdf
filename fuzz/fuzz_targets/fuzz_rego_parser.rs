//! Fuzz target for the Rego module parser.
//!
//! Goal: parsing should **never panic** on any input.
//! Syntax errors are expected for most inputs; panics are unacceptable.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_rego_parser
//! ```

#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Limit input size to avoid OOM and keep fuzzing fast
    if data.len() > 64 * 1024 {
        return;
    }

    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(module) = regoscope_syntax::parse_module("fuzz.rego", text) {
            // Rendering must not panic either.
            let _ = module.package.path.to_string();
            for rule in &module.rules {
                let _ = rule.head.to_string();
            }
        }
    }
});
