use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable schema identifier for `regoscope.toml`.
pub const SCHEMA_CONFIG_V1: &str = "regoscope.config.v1";

/// `regoscope.toml` schema v1.
///
/// This is a *user-facing* config model: it is intentionally permissive so forward-compat is easy.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RegoscopeConfigV1 {
    /// Optional schema string for tooling (`regoscope.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// What to load: `libraries` or `policies` (default).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<String>,

    /// Only load policies declaring this action (e.g. `deny`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,

    /// Globs (relative to the root) a file must match to be loaded. Empty means every `.rego` file.
    #[serde(default)]
    pub include: Vec<String>,

    /// Globs (relative to the root) that remove files from the load.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Load `*_test.rego` files as well.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_tests: Option<bool>,
}
