//! The `load` use case: discover, parse, classify, select, and report.

use anyhow::Context;
use camino::Utf8Path;
use regoscope_domain::{RegoParser, fingerprint_for_file, load_all_parallel, select, sort_by_path};
use regoscope_repo::DiscoverOptions;
use regoscope_settings::{Overrides, RegoscopeConfigV1, ResolvedConfig};
use regoscope_types::{LoadData, LoadReport, LoadedFile, SCHEMA_LOAD_REPORT_V1, ToolMeta};
use std::collections::BTreeSet;
use time::OffsetDateTime;

/// Input for the load use case.
#[derive(Clone, Debug)]
pub struct LoadInput<'a> {
    /// Directory the policy files live under.
    pub root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the load use case.
#[derive(Clone, Debug)]
pub struct LoadOutput {
    /// The generated report.
    pub report: LoadReport,
    /// The resolved configuration used.
    pub resolved_config: ResolvedConfig,
}

/// Run the load use case: parse config, discover files, load and select them, produce a report.
///
/// Any file that fails to parse fails the whole run.
pub fn run_load(input: LoadInput<'_>) -> anyhow::Result<LoadOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        RegoscopeConfigV1::default()
    } else {
        regoscope_settings::parse_config_toml(input.config_text).context("parse config")?
    };

    let resolved = regoscope_settings::resolve_config(cfg, input.overrides.clone())
        .context("resolve config")?;
    let effective = &resolved.effective;

    let options = DiscoverOptions {
        include: effective.include.clone(),
        exclude: effective.exclude.clone(),
        include_tests: effective.include_tests,
    };
    let sources: Vec<(String, String)> = regoscope_repo::load_directory(input.root, &options)
        .context("read policy sources")?
        .into_iter()
        .collect();

    let loaded = load_all_parallel(&RegoParser, &sources)?;
    let files_scanned = loaded.len();

    let mut selected = select(loaded, &effective.selection);
    sort_by_path(&mut selected);

    let actions: BTreeSet<&str> = selected
        .iter()
        .flat_map(|f| f.rules_actions.iter().map(String::as_str))
        .collect();
    let data = LoadData {
        files_scanned: count(files_scanned),
        files_selected: count(selected.len()),
        actions: actions.into_iter().map(str::to_string).collect(),
    };

    let files = selected
        .into_iter()
        .map(|file| LoadedFile {
            fingerprint: fingerprint_for_file(file.file_path.as_str(), &file.contents),
            file,
        })
        .collect();

    tracing::info!(
        selection = %effective.selection,
        scanned = data.files_scanned,
        selected = data.files_selected,
        "load finished"
    );

    let report = LoadReport {
        schema: SCHEMA_LOAD_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "regoscope".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        selection: effective.selection.clone(),
        data,
        files,
    };

    Ok(LoadOutput {
        report,
        resolved_config: resolved,
    })
}

fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}
