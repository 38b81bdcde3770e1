use thiserror::Error;

/// User-facing errors.
#[derive(Error, Debug)]
pub enum SqlfmtError {
    #[error("sqlfmt config error: {0}")]
    Config(String),

    /// Malformed input bytes or an unsupported lexical construct.
    #[error("sqlfmt lexing error at byte {position}: {message}")]
    Lex { position: usize, message: String },

    /// `position` is the index of the offending token.
    #[error("sqlfmt parsing error at token {position}: {message}")]
    Parsing { position: usize, message: String },

    /// The group tree handed to the reindenter broke one of its contracts.
    #[error("sqlfmt build error: {0}")]
    Build(String),

    /// The formatted text no longer carries the same content as the input.
    /// `original` is the untouched input, so callers can fall back to it.
    #[error("sqlfmt safety error: {message}")]
    Safety { message: String, original: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl SqlfmtError {
    pub(crate) fn lex(position: usize, message: impl Into<String>) -> Self {
        Self::Lex {
            position,
            message: message.into(),
        }
    }

    pub(crate) fn parsing(position: usize, message: impl Into<String>) -> Self {
        Self::Parsing {
            position,
            message: message.into(),
        }
    }

    /// The unformatted input carried by a safety error.
    pub fn original(&self) -> Option<&str> {
        match self {
            Self::Safety { original, .. } => Some(original),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SqlfmtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_safety_error_keeps_original() {
        let err = SqlfmtError::Safety {
            message: "content changed".to_string(),
            original: "select 1".to_string(),
        };
        assert_eq!(err.original(), Some("select 1"));
        assert_eq!(err.to_string(), "sqlfmt safety error: content changed");
    }

    #[test]
    fn test_other_errors_have_no_original() {
        let err = SqlfmtError::parsing(3, "no end token");
        assert_eq!(err.original(), None);
        assert_eq!(
            err.to_string(),
            "sqlfmt parsing error at token 3: no end token"
        );
    }
}
