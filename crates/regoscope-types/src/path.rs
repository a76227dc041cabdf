use camino::{Utf8Path, Utf8PathBuf};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a loaded source file.
///
/// The value is opaque: it is carried through verbatim for diagnostics and traceability and is
/// never normalized or reparsed. Uniqueness within one batch comes from the keys of the input
/// mapping.
#[derive(
    Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct FilePath(String);

impl FilePath {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for FilePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FilePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for FilePath {
    fn from(value: &str) -> Self {
        FilePath::new(value)
    }
}

impl From<String> for FilePath {
    fn from(value: String) -> Self {
        FilePath(value)
    }
}

impl From<&Utf8Path> for FilePath {
    fn from(value: &Utf8Path) -> Self {
        FilePath::new(value.as_str())
    }
}

impl From<Utf8PathBuf> for FilePath {
    fn from(value: Utf8PathBuf) -> Self {
        FilePath(value.into_string())
    }
}
