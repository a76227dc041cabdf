use anyhow::Context;
use camino::Utf8Path;
use rayon::prelude::*;
use regoscope_types::FilePath;
use std::collections::BTreeMap;

/// Read `paths` (relative to `root`) into a path → contents map.
///
/// Files are read in parallel. If several reads fail, the error for the first path in
/// `paths` order is returned.
pub fn read_sources(
    root: &Utf8Path,
    paths: &[FilePath],
) -> anyhow::Result<BTreeMap<String, String>> {
    let results: Vec<anyhow::Result<(String, String)>> = paths
        .par_iter()
        .map(|rel| {
            let abs = root.join(rel.as_str());
            let text = std::fs::read_to_string(&abs).with_context(|| format!("read {abs}"))?;
            Ok((rel.as_str().to_string(), text))
        })
        .collect();

    let sources = results
        .into_iter()
        .collect::<anyhow::Result<BTreeMap<String, String>>>()?;
    tracing::debug!(files = sources.len(), "read rego sources");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use tempfile::TempDir;

    #[test]
    fn reads_contents_verbatim() {
        let tmp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
        std::fs::write(root.join("a.rego"), "package a\r\n# keep\r\n").expect("write");

        let sources = read_sources(&root, &[FilePath::new("a.rego")]).expect("read");
        assert_eq!(sources["a.rego"], "package a\r\n# keep\r\n");
    }

    #[test]
    fn missing_file_error_names_the_path() {
        let tmp = TempDir::new().expect("temp dir");
        let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");

        let err = read_sources(&root, &[FilePath::new("gone.rego")]).unwrap_err();
        assert!(err.to_string().starts_with("read "));
        assert!(err.to_string().ends_with("gone.rego"));
    }
}
