#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableFile {
    pub path: String,
    pub package: String,
    pub imports: Vec<String>,
    pub actions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableSummary {
    /// Human description of the selection, e.g. `policies with action 'deny'`.
    pub selection: String,
    pub files_scanned: u32,
    pub files_selected: u32,
    pub actions: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableReport {
    pub summary: RenderableSummary,
    pub files: Vec<RenderableFile>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableRule {
    pub head: String,
    pub action: Option<String>,
}

/// One file, rule by rule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderableInspection {
    pub path: String,
    pub package: String,
    pub imports: Vec<String>,
    pub rules: Vec<RenderableRule>,
    pub comments: usize,
}
