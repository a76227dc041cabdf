//! Render use cases: markdown and plain text from in-memory reports.

use crate::inspect::InspectOutput;
use crate::report::to_renderable;
use regoscope_render::{RenderableInspection, RenderableRule};
use regoscope_types::LoadReport;

pub fn render_markdown(report: &LoadReport) -> String {
    regoscope_render::render_markdown(&to_renderable(report))
}

pub fn render_text(report: &LoadReport) -> String {
    regoscope_render::render_text(&to_renderable(report))
}

pub fn render_inspection(output: &InspectOutput) -> String {
    let inspection = RenderableInspection {
        path: output.file.file_path.as_str().to_string(),
        package: output.file.package_name.clone(),
        imports: output.file.import_packages.clone(),
        rules: output
            .rules
            .iter()
            .map(|r| RenderableRule {
                head: r.head.clone(),
                action: r.action.clone(),
            })
            .collect(),
        comments: output.file.comments.len(),
    };
    regoscope_render::render_inspection(&inspection)
}
