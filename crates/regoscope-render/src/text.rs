use crate::{RenderableInspection, RenderableReport};

/// One line per file, then a summary line.
pub fn render_text(report: &RenderableReport) -> String {
    let mut out = String::new();

    for f in &report.files {
        if f.actions.is_empty() {
            out.push_str(&format!("{}: {} (library)\n", f.path, f.package));
        } else {
            out.push_str(&format!("{}: {} [{}]\n", f.path, f.package, f.actions.join(", ")));
        }
    }

    let s = &report.summary;
    out.push_str(&format!(
        "{} of {} files selected ({})\n",
        s.files_selected, s.files_scanned, s.selection
    ));
    out
}

pub fn render_inspection(inspection: &RenderableInspection) -> String {
    let mut out = String::new();

    out.push_str(&format!("{}\n", inspection.path));
    out.push_str(&format!("package: {}\n", inspection.package));

    if inspection.imports.is_empty() {
        out.push_str("imports: (none)\n");
    } else {
        out.push_str("imports:\n");
        for i in &inspection.imports {
            out.push_str(&format!("  {i}\n"));
        }
    }

    if inspection.rules.is_empty() {
        out.push_str("rules: (none)\n");
    } else {
        out.push_str("rules:\n");
        for r in &inspection.rules {
            match &r.action {
                Some(action) => out.push_str(&format!("  {} -> {}\n", r.head, action)),
                None => out.push_str(&format!("  {}\n", r.head)),
            }
        }
    }

    out.push_str(&format!("comments: {}\n", inspection.comments));
    out
}
