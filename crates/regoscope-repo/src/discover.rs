use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use globset::{Glob, GlobSet, GlobSetBuilder};
use regoscope_types::FilePath;
use std::path::PathBuf;
use walkdir::WalkDir;

/// Which files under a root count as policy sources.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DiscoverOptions {
    /// Globs a root-relative path must match. Empty means every `.rego` file.
    pub include: Vec<String>,
    /// Globs that remove a root-relative path.
    pub exclude: Vec<String>,
    /// Keep `*_test.rego` files.
    pub include_tests: bool,
}

const REGO_EXTENSION: &str = ".rego";
const TEST_SUFFIX: &str = "_test.rego";

pub(crate) struct PathFilter {
    include: GlobSet,
    has_include: bool,
    exclude: GlobSet,
    include_tests: bool,
}

impl PathFilter {
    pub(crate) fn new(options: &DiscoverOptions) -> anyhow::Result<Self> {
        Ok(Self {
            include: build_globset(&options.include).context("compile include globset")?,
            has_include: !options.include.is_empty(),
            exclude: build_globset(&options.exclude).context("compile exclude globset")?,
            include_tests: options.include_tests,
        })
    }

    /// Whether a root-relative, forward-slash path is selected.
    pub(crate) fn accepts(&self, rel: &str) -> bool {
        if !rel.ends_with(REGO_EXTENSION) {
            return false;
        }
        if !self.include_tests && rel.ends_with(TEST_SUFFIX) {
            return false;
        }
        if self.has_include && !self.include.is_match(rel) {
            return false;
        }
        !self.exclude.is_match(rel)
    }
}

/// Discover `.rego` files under `root`, as sorted root-relative paths.
///
/// Behavior:
/// - Paths use `/` separators on every platform.
/// - `include`/`exclude` globs are matched against the relative path.
/// - `*_test.rego` files are skipped unless `include_tests` is set.
pub fn discover_policies(
    root: &Utf8Path,
    options: &DiscoverOptions,
) -> anyhow::Result<Vec<FilePath>> {
    if !root.is_dir() {
        anyhow::bail!("policy root is not a directory: {root}");
    }
    let filter = PathFilter::new(options)?;

    let mut out: Vec<FilePath> = Vec::new();
    for abs in WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .filter_map(|e| pathbuf_to_utf8(e.path().to_path_buf()))
    {
        let rel = abs
            .strip_prefix(root)
            .unwrap_or(&abs)
            .as_str()
            .replace('\\', "/");

        if filter.accepts(&rel) {
            out.push(FilePath::new(rel));
        }
    }

    // Stable order.
    out.sort();
    out.dedup();

    tracing::debug!(root = %root, files = out.len(), "discovered rego files");
    Ok(out)
}

fn build_globset(patterns: &[String]) -> anyhow::Result<GlobSet> {
    let mut b = GlobSetBuilder::new();
    for p in patterns {
        b.add(Glob::new(p)?);
    }
    Ok(b.build()?)
}

fn pathbuf_to_utf8(path: PathBuf) -> Option<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8_root(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path")
    }

    fn write_file(path: &Utf8Path, contents: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent");
        }
        std::fs::write(path, contents).expect("write file");
    }

    fn paths(files: &[FilePath]) -> Vec<&str> {
        files.iter().map(|p| p.as_str()).collect()
    }

    fn layout(root: &Utf8Path) {
        write_file(&root.join("main.rego"), "package main\n");
        write_file(&root.join("policy/deny.rego"), "package main\n");
        write_file(&root.join("policy/deny_test.rego"), "package main\n");
        write_file(&root.join("policy/legacy/old.rego"), "package legacy\n");
        write_file(&root.join("lib/k8s.rego"), "package lib.k8s\n");
        write_file(&root.join("lib/data.json"), "{}\n");
    }

    #[test]
    fn discovers_rego_files_sorted_without_tests() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        layout(&root);

        let files = discover_policies(&root, &DiscoverOptions::default()).expect("discover");
        assert_eq!(
            paths(&files),
            vec![
                "lib/k8s.rego",
                "main.rego",
                "policy/deny.rego",
                "policy/legacy/old.rego"
            ]
        );
    }

    #[test]
    fn include_tests_keeps_test_files() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        layout(&root);

        let options = DiscoverOptions {
            include_tests: true,
            ..DiscoverOptions::default()
        };
        let files = discover_policies(&root, &options).expect("discover");
        assert!(paths(&files).contains(&"policy/deny_test.rego"));
        assert_eq!(files.len(), 5);
    }

    #[test]
    fn include_and_exclude_globs_apply_to_relative_paths() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);
        layout(&root);

        let options = DiscoverOptions {
            include: vec!["policy/**".to_string()],
            exclude: vec!["policy/legacy/*".to_string()],
            include_tests: false,
        };
        let files = discover_policies(&root, &options).expect("discover");
        assert_eq!(paths(&files), vec!["policy/deny.rego"]);
    }

    #[test]
    fn empty_directory_yields_nothing() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        let files = discover_policies(&root, &DiscoverOptions::default()).expect("discover");
        assert!(files.is_empty());
    }

    #[test]
    fn missing_root_is_an_error() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp).join("nope");

        let err = discover_policies(&root, &DiscoverOptions::default()).unwrap_err();
        assert!(err.to_string().starts_with("policy root is not a directory"));
    }

    #[test]
    fn invalid_glob_returns_error() {
        let tmp = TempDir::new().expect("temp dir");
        let root = utf8_root(&tmp);

        let options = DiscoverOptions {
            exclude: vec!["[".to_string()],
            ..DiscoverOptions::default()
        };
        let err = discover_policies(&root, &options).unwrap_err();
        assert!(err.to_string().contains("compile exclude globset"));
    }

    #[test]
    fn pathbuf_to_utf8_rejects_invalid() {
        #[cfg(unix)]
        {
            use std::ffi::OsString;
            use std::os::unix::ffi::OsStringExt;
            let invalid = OsString::from_vec(vec![0xFF, 0xFE, 0xFD]);
            let path = PathBuf::from(invalid);
            assert!(pathbuf_to_utf8(path).is_none());
        }
    }
}
