use crate::{RenderableFile, RenderableReport};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();
    let summary = &report.summary;

    out.push_str("# Regoscope load report\n\n");
    out.push_str(&format!(
        "- Selection: **{}**\n- Files: {} (selected) / {} (scanned)\n",
        summary.selection, summary.files_selected, summary.files_scanned
    ));
    if !summary.actions.is_empty() {
        out.push_str(&format!("- Actions: {}\n", code_list(&summary.actions)));
    }
    out.push('\n');

    if report.files.is_empty() {
        out.push_str("No files selected.\n");
        return out;
    }

    out.push_str("## Files\n\n");
    out.push_str("| File | Package | Actions | Imports |\n");
    out.push_str("|---|---|---|---|\n");
    for f in &report.files {
        out.push_str(&row(f));
    }

    out
}

fn row(f: &RenderableFile) -> String {
    let actions = if f.actions.is_empty() {
        "(library)".to_string()
    } else {
        f.actions.join(", ")
    };
    format!(
        "| `{}` | `{}` | {} | {} |\n",
        escape_cell(&f.path),
        escape_cell(&f.package),
        actions,
        escape_cell(&code_list(&f.imports))
    )
}

fn code_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("`{i}`"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}
