//! CLI entry point for regoscope.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and exit
//! codes. All business logic lives in the `regoscope-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use regoscope_app::{
    LoadInput, parse_report_json, render_inspection, render_markdown, render_text, run_inspect,
    run_load, serialize_report,
};
use regoscope_settings::Overrides;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "regoscope",
    version,
    about = "Load Rego policy files and classify them by the actions they declare"
)]
struct Cli {
    /// Directory containing the policy files.
    #[arg(long, global = true, default_value = ".")]
    root: Utf8PathBuf,

    /// Path to regoscope config TOML (relative to --root unless absolute).
    #[arg(long, global = true, default_value = "regoscope.toml")]
    config: Utf8PathBuf,

    /// Log debug events to stderr (RUST_LOG takes precedence).
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover, parse, and classify policy files, then emit a report.
    Load {
        /// Override mode (libraries|policies).
        #[arg(long)]
        mode: Option<String>,

        /// Only select policies declaring this action (e.g. deny).
        #[arg(long)]
        action: Option<String>,

        /// Also load `*_test.rego` files.
        #[arg(long)]
        include_tests: bool,

        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Json)]
        format: Format,

        /// Where to write the output (if not specified, prints to stdout).
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,
    },

    /// Show how a single file is parsed and classified.
    Inspect {
        /// Path to the Rego file.
        file: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long)]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        out: Option<Utf8PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Json,
    Md,
    Text,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        eprintln!("regoscope error: {err:#}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.cmd {
        Commands::Load {
            ref mode,
            ref action,
            include_tests,
            format,
            ref out,
        } => {
            let overrides = Overrides {
                mode: mode.clone(),
                action: action.clone(),
                include_tests: include_tests.then_some(true),
            };
            cmd_load(&cli, overrides, format, out.as_deref())
        }
        Commands::Inspect { ref file } => cmd_inspect(file),
        Commands::Md { ref report, ref out } => cmd_md(report, out.as_deref()),
    }
}

fn cmd_load(
    cli: &Cli,
    overrides: Overrides,
    format: Format,
    out: Option<&Utf8Path>,
) -> anyhow::Result<()> {
    let root = cli
        .root
        .canonicalize_utf8()
        .unwrap_or_else(|_| cli.root.clone());
    if !root.is_dir() {
        anyhow::bail!("root is not a directory: {}", root);
    }

    // Load config if present; missing file is allowed (defaults apply).
    let cfg_path = root.join(&cli.config);
    let cfg_text = if cfg_path.is_file() {
        std::fs::read_to_string(&cfg_path).with_context(|| format!("read config: {}", cfg_path))?
    } else {
        tracing::debug!(path = %cfg_path, "no config file, using defaults");
        String::new()
    };

    let output = run_load(LoadInput {
        root: &root,
        config_text: &cfg_text,
        overrides,
    })?;

    let bytes = match format {
        Format::Json => serialize_report(&output.report)?,
        Format::Md => render_markdown(&output.report).into_bytes(),
        Format::Text => render_text(&output.report).into_bytes(),
    };
    emit(out, &bytes)
}

fn cmd_inspect(file: &Utf8Path) -> anyhow::Result<()> {
    let contents =
        std::fs::read_to_string(file).with_context(|| format!("read policy: {}", file))?;
    let output = run_inspect(file.as_str(), &contents)?;
    print!("{}", render_inspection(&output));
    Ok(())
}

fn cmd_md(report_path: &Utf8Path, out: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    emit(out, render_markdown(&report).as_bytes())
}

fn emit(out: Option<&Utf8Path>, bytes: &[u8]) -> anyhow::Result<()> {
    match out {
        Some(path) => write_file(path, bytes),
        None => {
            use std::io::Write;
            std::io::stdout()
                .write_all(bytes)
                .context("write to stdout")
        }
    }
}

fn write_file(path: &Utf8Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write output: {}", path))?;
    Ok(())
}
