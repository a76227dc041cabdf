use crate::model::{RegoscopeConfigV1, SCHEMA_CONFIG_V1};
use anyhow::Context;
use globset::Glob;
use regoscope_types::Selection;

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub mode: Option<String>,
    pub action: Option<String>,
    pub include_tests: Option<bool>,
}

/// Everything the loader needs to know about one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectiveConfig {
    pub selection: Selection,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub include_tests: bool,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub effective: EffectiveConfig,
}

pub fn resolve_config(
    cfg: RegoscopeConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref()
        && schema != SCHEMA_CONFIG_V1
    {
        anyhow::bail!("unsupported config schema: {schema} (expected '{SCHEMA_CONFIG_V1}')");
    }

    let mode = overrides
        .mode
        .or(cfg.mode)
        .unwrap_or_else(|| "policies".to_string());
    let action = overrides.action.or(cfg.action);
    let selection = parse_selection(&mode, action.as_deref())?;

    validate_globs("include", &cfg.include)?;
    validate_globs("exclude", &cfg.exclude)?;

    let effective = EffectiveConfig {
        selection,
        include: cfg.include,
        exclude: cfg.exclude,
        include_tests: overrides
            .include_tests
            .or(cfg.include_tests)
            .unwrap_or(false),
    };

    Ok(ResolvedConfig { effective })
}

fn validate_globs(field: &str, patterns: &[String]) -> anyhow::Result<()> {
    for pattern in patterns {
        Glob::new(pattern).with_context(|| format!("invalid {field} glob: {pattern}"))?;
    }
    Ok(())
}

fn parse_selection(mode: &str, action: Option<&str>) -> anyhow::Result<Selection> {
    match mode {
        "libraries" | "library" => match action {
            Some(a) if !a.is_empty() => {
                anyhow::bail!("action '{a}' cannot be combined with mode 'libraries'")
            }
            _ => Ok(Selection::Libraries),
        },
        "policies" | "policy" => Ok(Selection::for_action(action)),
        other => anyhow::bail!("unknown mode: {other} (expected 'libraries' or 'policies')"),
    }
}
