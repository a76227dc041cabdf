use anyhow::Context;
use regoscope_render::{RenderableFile, RenderableReport, RenderableSummary};
use regoscope_types::{LoadReport, SCHEMA_LOAD_REPORT_V1};

pub fn parse_report_json(text: &str) -> anyhow::Result<LoadReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    if schema != SCHEMA_LOAD_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema}");
    }
    serde_json::from_value(value).context("parse load report")
}

pub fn serialize_report(report: &LoadReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize load report")
}

pub fn to_renderable(report: &LoadReport) -> RenderableReport {
    RenderableReport {
        summary: RenderableSummary {
            selection: report.selection.to_string(),
            files_scanned: report.data.files_scanned,
            files_selected: report.data.files_selected,
            actions: report.data.actions.clone(),
        },
        files: report
            .files
            .iter()
            .map(|f| RenderableFile {
                path: f.file.file_path.as_str().to_string(),
                package: f.file.package_name.clone(),
                imports: f.file.import_packages.clone(),
                actions: f.file.rules_actions.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use regoscope_types::{FilePath, LoadData, LoadedFile, RegoFile, Selection, ToolMeta};
    use time::macros::datetime;

    fn sample_report() -> LoadReport {
        LoadReport {
            schema: SCHEMA_LOAD_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "regoscope".to_string(),
                version: "0.1.0".to_string(),
            },
            started_at: datetime!(2025-03-01 12:00 UTC),
            finished_at: datetime!(2025-03-01 12:00:01 UTC),
            selection: Selection::Action("deny".to_string()),
            data: LoadData {
                files_scanned: 3,
                files_selected: 1,
                actions: vec!["deny".to_string()],
            },
            files: vec![LoadedFile {
                file: RegoFile {
                    file_path: FilePath::new("a.rego"),
                    package_name: "data.p".to_string(),
                    import_packages: vec!["data.lib".to_string()],
                    contents: "package p\n".to_string(),
                    rules_actions: vec!["deny".to_string()],
                    comments: Vec::new(),
                },
                fingerprint: "00".repeat(32),
            }],
        }
    }

    #[test]
    fn serialized_report_parses_back() {
        let report = sample_report();
        let bytes = serialize_report(&report).expect("serialize");
        let text = String::from_utf8(bytes).expect("utf8");
        assert!(text.contains("\"schema\": \"regoscope.load.v1\""));
        assert_eq!(parse_report_json(&text).expect("parse"), report);
    }

    #[test]
    fn unknown_schema_is_rejected() {
        let err = parse_report_json(r#"{"schema": "other.v1"}"#).unwrap_err();
        assert_eq!(err.to_string(), "unknown report schema: other.v1");

        let err = parse_report_json("not json").unwrap_err();
        assert_eq!(err.to_string(), "parse report json");
    }

    #[test]
    fn renderable_carries_summary_and_files() {
        let renderable = to_renderable(&sample_report());
        assert_eq!(renderable.summary.selection, "policies with action 'deny'");
        assert_eq!(renderable.summary.files_scanned, 3);
        assert_eq!(renderable.files.len(), 1);
        assert_eq!(renderable.files[0].path, "a.rego");
        assert_eq!(renderable.files[0].imports, vec!["data.lib"]);
    }
}
