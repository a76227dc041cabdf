//! Config parsing and override resolution.
//!
//! This crate is intentionally IO-free: it parses and resolves configuration provided as strings.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{RegoscopeConfigV1, SCHEMA_CONFIG_V1};
pub use resolve::{EffectiveConfig, Overrides, ResolvedConfig};

/// Parse `regoscope.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<RegoscopeConfigV1> {
    let cfg: RegoscopeConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by the loader (file values + CLI overrides).
pub fn resolve_config(
    cfg: RegoscopeConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}

#[cfg(test)]
mod tests {
    use super::*;
    use regoscope_types::Selection;

    #[test]
    fn parses_a_full_config() {
        let cfg = parse_config_toml(
            r#"
schema = "regoscope.config.v1"
mode = "policies"
action = "deny"
include = ["policy/**/*.rego"]
exclude = ["policy/legacy/**"]
include_tests = true
"#,
        )
        .expect("parse");

        assert_eq!(cfg.schema.as_deref(), Some(SCHEMA_CONFIG_V1));
        assert_eq!(cfg.mode.as_deref(), Some("policies"));
        assert_eq!(cfg.action.as_deref(), Some("deny"));
        assert_eq!(cfg.include, vec!["policy/**/*.rego"]);
        assert_eq!(cfg.exclude, vec!["policy/legacy/**"]);
        assert_eq!(cfg.include_tests, Some(true));

        let resolved = resolve_config(cfg, Overrides::default()).expect("resolve");
        assert_eq!(
            resolved.effective.selection,
            Selection::Action("deny".to_string())
        );
        assert!(resolved.effective.include_tests);
    }

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = parse_config_toml("").expect("parse");
        assert_eq!(cfg, RegoscopeConfigV1::default());

        let resolved = resolve_config(cfg, Overrides::default()).expect("resolve");
        assert_eq!(resolved.effective, EffectiveConfig::default());
        assert_eq!(resolved.effective.selection, Selection::Policies);
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(parse_config_toml("mode = ").is_err());
        assert!(parse_config_toml("include = \"policy\"").is_err());
    }
}
