use regoscope_syntax::SyntaxError;
use regoscope_types::FilePath;
use thiserror::Error;

/// A single file could not be parsed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("parse module {path}")]
pub struct ParseError {
    pub path: FilePath,
    #[source]
    pub source: SyntaxError,
}

/// A batch load failed because one of its files could not be parsed.
///
/// Batches are all-or-nothing: no records are returned alongside this error.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("load rego files")]
pub struct LoadError {
    #[source]
    pub source: ParseError,
}

impl LoadError {
    /// The file that failed the batch.
    pub fn path(&self) -> &FilePath {
        &self.source.path
    }

    pub fn syntax_error(&self) -> &SyntaxError {
        &self.source.source
    }
}

impl From<ParseError> for LoadError {
    fn from(source: ParseError) -> Self {
        LoadError { source }
    }
}
