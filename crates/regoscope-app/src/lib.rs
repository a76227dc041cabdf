//! Use case orchestration for regoscope.
//!
//! This crate provides the application layer: use cases that coordinate the settings, repo,
//! domain, and render layers. It is intentionally thin and delegates heavy lifting to the
//! appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod inspect;
mod load;
mod render;
mod report;

pub use inspect::{InspectOutput, InspectedRule, run_inspect};
pub use load::{LoadInput, LoadOutput, run_load};
pub use render::{render_inspection, render_markdown, render_text};
pub use report::{parse_report_json, serialize_report, to_renderable};
