use crate::error::{LoadError, ParseError};
use crate::load::load;
use regoscope_syntax::ModuleParser;
use regoscope_types::{RegoFile, Selection};

/// Load every `(path, contents)` pair, in iteration order.
///
/// The first file that fails to parse aborts the batch; no partial result is returned.
pub fn load_all<P, I, K, V>(parser: &P, sources: I) -> Result<Vec<RegoFile>, LoadError>
where
    P: ModuleParser + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut files = Vec::new();
    for (path, contents) in sources {
        files.push(load(parser, path.as_ref(), contents.as_ref())?);
    }
    tracing::debug!(files = files.len(), "loaded rego batch");
    Ok(files)
}

/// Parallel [`load_all`]. Output keeps input order.
///
/// When several files fail, the error reported is the one with the smallest path, so the
/// outcome does not depend on thread scheduling.
#[cfg(feature = "parallel")]
pub fn load_all_parallel<P, K, V>(parser: &P, sources: &[(K, V)]) -> Result<Vec<RegoFile>, LoadError>
where
    P: ModuleParser + Sync + ?Sized,
    K: AsRef<str> + Sync,
    V: AsRef<str> + Sync,
{
    use rayon::prelude::*;

    let results: Vec<Result<RegoFile, ParseError>> = sources
        .par_iter()
        .map(|(path, contents)| load(parser, path.as_ref(), contents.as_ref()))
        .collect();

    let mut files = Vec::with_capacity(results.len());
    let mut first_error: Option<ParseError> = None;
    for result in results {
        match result {
            Ok(file) => files.push(file),
            Err(err) => {
                let replace = first_error
                    .as_ref()
                    .is_none_or(|current| err.path.as_str() < current.path.as_str());
                if replace {
                    first_error = Some(err);
                }
            }
        }
    }

    if let Some(err) = first_error {
        return Err(err.into());
    }
    tracing::debug!(files = files.len(), "loaded rego batch in parallel");
    Ok(files)
}

/// Keep the files matching `selection`, preserving order. Each file appears at most once.
pub fn select(files: Vec<RegoFile>, selection: &Selection) -> Vec<RegoFile> {
    let scanned = files.len();
    let kept: Vec<RegoFile> = match selection {
        Selection::Libraries => files,
        Selection::Policies => files.into_iter().filter(RegoFile::is_policy).collect(),
        Selection::Action(action) if action.is_empty() => {
            files.into_iter().filter(RegoFile::is_policy).collect()
        }
        Selection::Action(action) => files
            .into_iter()
            .filter(|f| f.has_action(action))
            .collect(),
    };
    tracing::debug!(%selection, scanned, selected = kept.len(), "applied selection");
    kept
}

/// Every parsed file, policies and pure libraries alike.
pub fn load_libraries<P, I, K, V>(parser: &P, sources: I) -> Result<Vec<RegoFile>, LoadError>
where
    P: ModuleParser + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    load_all(parser, sources)
}

/// Files declaring at least one action.
pub fn load_policies<P, I, K, V>(parser: &P, sources: I) -> Result<Vec<RegoFile>, LoadError>
where
    P: ModuleParser + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    Ok(select(load_all(parser, sources)?, &Selection::Policies))
}

/// Files declaring `action`. An empty `action` behaves like [`load_policies`].
pub fn load_policies_with_action<P, I, K, V>(
    parser: &P,
    sources: I,
    action: &str,
) -> Result<Vec<RegoFile>, LoadError>
where
    P: ModuleParser + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let selection = Selection::for_action(Some(action));
    Ok(select(load_all(parser, sources)?, &selection))
}

/// Sort files by path. Batch order otherwise follows the input.
pub fn sort_by_path(files: &mut [RegoFile]) {
    files.sort_by(|a, b| a.file_path.cmp(&b.file_path));
}
