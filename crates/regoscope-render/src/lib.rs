//! Rendering utilities for human-facing surfaces (Markdown, plain text).
//!
//! Renderers take their own small models so they stay independent of the report schema.

#![forbid(unsafe_code)]

mod markdown;
mod model;
mod text;

pub use markdown::render_markdown;
pub use model::{
    RenderableFile, RenderableInspection, RenderableReport, RenderableRule, RenderableSummary,
};
pub use text::{render_inspection, render_text};
