use std::sync::Arc;

use tracing::{debug, warn};

use crate::dialect::Dialect;
use crate::error::{Result, SqlfmtError};
use crate::lexer::Lexer;
use crate::options::FormatOptions;
use crate::parser::parse_statements;
use crate::reindent::reindent;
use crate::render::strip_ansi;

/// SqlFormatter runs the formatting pipeline:
///   1. Tokenize with the configured dialect
///   2. Parse statements into clause groups
///   3. Reindent the group tree
///   4. Pad lines by `distance`
///   5. Check the result still carries the input's content
pub struct SqlFormatter<'o> {
    options: &'o FormatOptions,
    dialect: Arc<Dialect>,
}

impl<'o> SqlFormatter<'o> {
    pub fn new(options: &'o FormatOptions) -> Self {
        Self {
            options,
            dialect: options.dialect(),
        }
    }

    pub fn format(&self, source: &str) -> Result<String> {
        let tokens = Lexer::new(&self.dialect).tokenize(source)?;
        let statements = parse_statements(&tokens)?;
        let laid_out = reindent(&statements, self.options)?;
        let formatted = put_distance(&laid_out, self.options.distance);
        let formatted = check_equivalence(source, formatted)?;
        debug!(bytes_in = source.len(), bytes_out = formatted.len(), "formatted");
        Ok(formatted)
    }

    /// Format raw bytes, such as a file's contents. Invalid UTF-8 is a lexing
    /// error.
    pub fn format_bytes(&self, bytes: &[u8]) -> Result<String> {
        let source = std::str::from_utf8(bytes)
            .map_err(|e| SqlfmtError::lex(e.valid_up_to(), "invalid UTF-8 sequence"))?;
        self.format(source)
    }
}

/// Left-pad every non-empty line by `distance` spaces.
pub fn put_distance(text: &str, distance: usize) -> String {
    if distance == 0 {
        return text.to_string();
    }
    let pad = " ".repeat(distance);
    text.split('\n')
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Pass `formatted` through if it carries the content of `source`, otherwise
/// fail with a safety error holding the untouched `source`.
fn check_equivalence(source: &str, formatted: String) -> Result<String> {
    if is_equivalent(source, &formatted) {
        return Ok(formatted);
    }
    warn!(
        bytes = source.len(),
        "formatted output lost content, returning safety error"
    );
    Err(SqlfmtError::Safety {
        message: "the formatted statement has diffed from the source".to_string(),
        original: source.to_string(),
    })
}

/// Whether two texts carry the same content once whitespace, letter case and
/// color sequences are ignored.
pub fn is_equivalent(before: &str, after: &str) -> bool {
    fold(before) == fold(after)
}

fn fold(text: &str) -> String {
    strip_ansi(text)
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_is_equivalent() {
        assert!(is_equivalent("select * from xxx", "\nSELECT\n  *\nFROM xxx"));
        assert!(is_equivalent("select\u{3000}a", "SELECT a"));
        assert!(!is_equivalent("select a", "select b"));
        assert!(is_equivalent("select a", "\u{1b}[33mSELECT\u{1b}[0m a"));
    }

    #[test]
    fn test_check_equivalence_keeps_original_on_mismatch() {
        let source = "select a from t";
        let err = check_equivalence(source, "\nSELECT\n  b\nFROM t".to_string()).unwrap_err();
        match &err {
            SqlfmtError::Safety { original, .. } => assert_eq!(original, source),
            other => panic!("expected a safety error, got {other:?}"),
        }
        assert_eq!(err.original(), Some(source));

        assert_eq!(
            check_equivalence(source, "\nSELECT\n  a\nFROM t".to_string()).unwrap(),
            "\nSELECT\n  a\nFROM t"
        );
    }

    #[test]
    fn test_fold_removes_whitespace_and_case() {
        assert_eq!(fold("select xxx from xxx"), "selectxxxfromxxx");
        assert_eq!(fold("A\tB\nC"), "abc");
    }

    #[test]
    fn test_put_distance() {
        assert_eq!(put_distance("\nSELECT\n  a", 2), "\n  SELECT\n    a");
        assert_eq!(put_distance("\nSELECT", 0), "\nSELECT");
        assert_eq!(put_distance("", 4), "");
    }

    #[test]
    fn test_format_pipeline() {
        let options = FormatOptions::default();
        let formatter = SqlFormatter::new(&options);
        assert_eq!(
            formatter.format("select a from t").unwrap(),
            "\nSELECT\n  a\nFROM t"
        );
        assert_eq!(formatter.format("").unwrap(), "");
        assert_eq!(formatter.format(" \n ").unwrap(), "");
    }

    #[test]
    fn test_format_with_distance() {
        let options = FormatOptions::default().with_distance(4);
        let formatted = SqlFormatter::new(&options).format("select a from t").unwrap();
        assert_eq!(formatted, "\n    SELECT\n      a\n    FROM t");
    }

    #[test]
    fn test_colorized_output_passes_safety_check() {
        let options = FormatOptions::default().with_colorized(true);
        let formatted = SqlFormatter::new(&options)
            .format("select sum(a) from t where b = 'x'")
            .unwrap();
        assert!(formatted.contains('\u{1b}'));
        assert_eq!(
            strip_ansi(&formatted),
            "\nSELECT\n  SUM(a)\nFROM t\nWHERE b = 'x'"
        );
    }

    #[test]
    fn test_format_bytes_rejects_invalid_utf8() {
        let options = FormatOptions::default();
        let err = SqlFormatter::new(&options)
            .format_bytes(b"select \xff")
            .unwrap_err();
        assert!(matches!(err, SqlfmtError::Lex { position: 7, .. }));
    }

    #[test]
    fn test_errors_propagate() {
        let options = FormatOptions::default();
        let formatter = SqlFormatter::new(&options);
        assert!(matches!(
            formatter.format("select a from"),
            Err(SqlfmtError::Parsing { .. })
        ));
        assert!(matches!(
            formatter.format("select a -- note"),
            Err(SqlfmtError::Lex { .. })
        ));
    }
}
