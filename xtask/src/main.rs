//! Developer tasks (schema generation, fixture conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use regoscope_test_util::normalize_nondeterministic;
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    // If we're in the xtask directory, go up one level
    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Get the fixtures directory path.
fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

/// Generate the LoadReport schema.
fn generate_load_report_schema() -> schemars::Schema {
    schema_for!(regoscope_types::LoadReport)
}

/// Generate the RegoscopeConfigV1 schema.
fn generate_config_schema() -> schemars::Schema {
    schema_for!(regoscope_settings::RegoscopeConfigV1)
}

/// List of schemas to generate.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "regoscope.load.v1.json",
            generate: generate_load_report_schema,
        },
        SchemaSpec {
            filename: "regoscope.config.v1.json",
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();

    if !dir.exists() {
        fs::create_dir_all(&dir).context("Failed to create schemas directory")?;
    }

    for spec in schema_specs() {
        let schema = (spec.generate)();
        let json = serialize_schema(&schema)?;
        let path = dir.join(spec.filename);

        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;

        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);

        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {}", name);
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {}", name);
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate golden fixture reports against the load report schema");
}

/// Check that a path is clean: relative, no `..`, forward slashes only.
fn is_clean_path(path: &str) -> bool {
    !(path.starts_with('/')
        || path.starts_with('\\')
        || path.split('/').any(|seg| seg == "..")
        || path.contains('\\')
        // Reject Windows-style drive letters like C:
        || (path.len() >= 2 && path.as_bytes()[1] == b':'))
}

/// Placeholders in golden files are not RFC 3339; swap in a fixed instant before validating.
fn with_concrete_timestamps(value: &serde_json::Value) -> serde_json::Value {
    let mut value = normalize_nondeterministic(value.clone());
    if let Some(obj) = value.as_object_mut() {
        for key in ["started_at", "finished_at"] {
            if obj.contains_key(key) {
                obj.insert(
                    key.to_string(),
                    serde_json::Value::String("1970-01-01T00:00:00Z".to_string()),
                );
            }
        }
    }
    value
}

/// Validate every `tests/fixtures/*/expected.load.json`.
///
/// This checks:
/// 1. Schema validation against the generated load report schema
/// 2. Path hygiene: relative paths, no `..`, forward slashes only
/// 3. Files are sorted by path and `data.files_selected` matches the file count
fn conform() -> anyhow::Result<()> {
    let schema = serde_json::to_value(generate_load_report_schema())
        .context("Failed to serialize load report schema")?;
    let compiled = jsonschema::validator_for(&schema)
        .map_err(|e| anyhow::anyhow!("Failed to compile schema: {}", e))?;

    println!("✓ regoscope.load.v1 schema compiles");

    let dir = fixtures_dir();
    let mut fixture_count = 0;
    let mut errors = Vec::new();

    let mut entries: Vec<PathBuf> = fs::read_dir(&dir)
        .with_context(|| format!("Failed to read {}", dir.display()))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.join("expected.load.json").is_file())
        .collect();
    entries.sort();

    for fixture_dir in entries {
        let name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let golden = fixture_dir.join("expected.load.json");
        let content = fs::read_to_string(&golden)
            .with_context(|| format!("Failed to read {}", golden.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", golden.display()))?;

        for err in compiled.iter_errors(&with_concrete_timestamps(&value)) {
            errors.push(format!("{}: schema validation: {}", name, err));
        }

        let files = value
            .get("files")
            .and_then(|v| v.as_array())
            .cloned()
            .unwrap_or_default();
        let paths: Vec<&str> = files
            .iter()
            .filter_map(|f| f.get("file_path").and_then(|v| v.as_str()))
            .collect();

        for (i, path) in paths.iter().enumerate() {
            if !is_clean_path(path) {
                errors.push(format!(
                    "{}: files[{}].file_path '{}' is not clean (no absolute, no .., forward slashes only)",
                    name, i, path
                ));
            }
        }
        if paths.windows(2).any(|w| w[0] > w[1]) {
            errors.push(format!("{}: files are not sorted by path", name));
        }
        let selected = value
            .get("data")
            .and_then(|d| d.get("files_selected"))
            .and_then(|v| v.as_u64());
        if selected != Some(files.len() as u64) {
            errors.push(format!(
                "{}: data.files_selected {:?} does not match {} files",
                name,
                selected,
                files.len()
            ));
        }

        fixture_count += 1;
        println!("  ✓ {} checked", name);
    }

    if fixture_count == 0 {
        bail!("No golden reports found under {}", dir.display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {}", err);
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} golden reports pass conformance checks!", fixture_count);
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                let name = spec.filename.trim_end_matches(".json");
                println!("{}", name);
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
