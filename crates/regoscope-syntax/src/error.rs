use crate::ast::Location;
use thiserror::Error;

/// The parser rejected a source file.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{path}:{line}:{col}: rego_parse_error: {message}")]
pub struct SyntaxError {
    pub path: String,
    pub line: u32,
    pub col: u32,
    pub message: String,
}

impl SyntaxError {
    pub(crate) fn at(path: &str, loc: Location, message: impl Into<String>) -> Self {
        Self {
            path: path.to_string(),
            line: loc.line,
            col: loc.col,
            message: message.into(),
        }
    }

    pub fn location(&self) -> Location {
        Location {
            line: self.line,
            col: self.col,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_file_and_position() {
        let err = SyntaxError::at("policy/a.rego", Location { line: 3, col: 7 }, "unexpected `}`");
        assert_eq!(
            err.to_string(),
            "policy/a.rego:3:7: rego_parse_error: unexpected `}`"
        );
        assert_eq!(err.location(), Location { line: 3, col: 7 });
    }
}
