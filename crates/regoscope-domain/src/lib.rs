//! Pure Rego loading (no IO).
//!
//! Input: file paths mapped to raw Rego text, supplied by the caller.
//! Output: classified [`RegoFile`] records, optionally narrowed by a [`Selection`].
//!
//! The parser is a seam: every operation is generic over [`ModuleParser`].

#![forbid(unsafe_code)]

mod batch;
pub mod classify;
mod error;
mod fingerprint;
mod load;

#[cfg(test)]
mod properties;
#[cfg(test)]
mod test_support;

pub use batch::{
    load_all, load_libraries, load_policies, load_policies_with_action, select, sort_by_path,
};
#[cfg(feature = "parallel")]
pub use batch::load_all_parallel;
pub use classify::{action_of, classify};
pub use error::{LoadError, ParseError};
pub use fingerprint::fingerprint_for_file;
pub use load::{build_file, load, parse_file};

pub use regoscope_syntax::{ModuleParser, RegoParser};
pub use regoscope_types::{FilePath, RegoFile, Selection};
