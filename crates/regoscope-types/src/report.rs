use crate::{RegoFile, Selection};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for load reports.
pub const SCHEMA_LOAD_REPORT_V1: &str = "regoscope.load.v1";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Summary counters for a load run.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoadData {
    /// Files parsed (the whole batch, before selection).
    pub files_scanned: u32,
    /// Files kept by the selection.
    pub files_selected: u32,
    /// Distinct action tags across the selected files, sorted.
    #[serde(default)]
    pub actions: Vec<String>,
}

/// A selected file plus its stable identity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoadedFile {
    #[serde(flatten)]
    pub file: RegoFile,

    /// SHA-256 over `path|contents`, hex encoded.
    pub fingerprint: String,
}

/// Envelope emitted by `regoscope load`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct LoadReport {
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub selection: Selection,
    pub data: LoadData,
    /// Selected files, sorted by path.
    pub files: Vec<LoadedFile>,
}
