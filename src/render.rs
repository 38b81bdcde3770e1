//! Token text as it appears in formatted output.

use std::io::Write;

use termcolor::{Ansi, Color, ColorSpec, WriteColor};

use crate::error::{Result, SqlfmtError};
use crate::options::FormatOptions;
use crate::token::{Token, TokenKind};
use crate::vocabulary::canonical_reserved_value;

/// Render one token: recase it, canonicalize reserved values, then colorize.
pub fn render_token(token: &Token, options: &FormatOptions) -> Result<String> {
    let text = spelling(token, options);
    if !options.colorized {
        return Ok(text);
    }
    match color_for(token.kind) {
        Some(color) => colorize(&text, color),
        None => Ok(text),
    }
}

fn spelling(token: &Token, options: &FormatOptions) -> String {
    match token.kind {
        kind if kind.is_verbatim() || kind == TokenKind::Operator => token.text.to_string(),
        TokenKind::ReservedValue => canonical_reserved_value(&token.text)
            .map(str::to_string)
            .unwrap_or_else(|| token.text.to_string()),
        _ if options.lower_cased => token.text.to_lowercase().to_string(),
        _ => token.text.to_string(),
    }
}

fn color_for(kind: TokenKind) -> Option<Color> {
    match kind {
        TokenKind::Function => Some(Color::Cyan),
        TokenKind::Type => Some(Color::Green),
        TokenKind::ReservedValue => Some(Color::Magenta),
        TokenKind::String => Some(Color::Red),
        k if k.is_keyword() => Some(Color::Yellow),
        _ => None,
    }
}

fn colorize(text: &str, color: Color) -> Result<String> {
    let mut out = Ansi::new(Vec::with_capacity(text.len() + 12));
    out.set_color(ColorSpec::new().set_fg(Some(color)))?;
    out.write_all(text.as_bytes())?;
    out.reset()?;
    String::from_utf8(out.into_inner())
        .map_err(|e| SqlfmtError::Build(format!("colorized token is not UTF-8: {}", e)))
}

/// Remove ANSI SGR sequences (`ESC [ ... m`) from `text`.
pub fn strip_ansi(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(ch) = chars.next() {
        if ch == '\u{1b}' && chars.peek() == Some(&'[') {
            chars.next();
            for c in chars.by_ref() {
                if c.is_ascii_alphabetic() {
                    break;
                }
            }
            continue;
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(kind: TokenKind, text: &str, options: &FormatOptions) -> String {
        render_token(&Token::new(kind, text), options).unwrap()
    }

    #[test]
    fn test_plain_rendering() {
        let options = FormatOptions::default();
        assert_eq!(render(TokenKind::Select, "SELECT", &options), "SELECT");
        assert_eq!(render(TokenKind::Ident, "MyCol", &options), "MyCol");
        assert_eq!(render(TokenKind::ReservedValue, "NAN", &options), "NaN");
        assert_eq!(render(TokenKind::ReservedValue, "TRUE", &options), "TRUE");
    }

    #[test]
    fn test_lower_cased_rendering() {
        let options = FormatOptions::default().with_lower_cased(true);
        assert_eq!(render(TokenKind::Select, "SELECT", &options), "select");
        assert_eq!(render(TokenKind::Function, "SUM", &options), "sum");
        assert_eq!(render(TokenKind::Type, "DOUBLE PRECISION", &options), "double precision");
        assert_eq!(render(TokenKind::String, "'ABC'", &options), "'ABC'");
        assert_eq!(render(TokenKind::ReservedValue, "INFINITY", &options), "Infinity");
    }

    #[test]
    fn test_colorized_rendering() {
        let options = FormatOptions::default().with_colorized(true);
        let keyword = render(TokenKind::Select, "SELECT", &options);
        assert!(keyword.starts_with('\u{1b}'));
        assert!(keyword.contains("SELECT"));
        assert_eq!(strip_ansi(&keyword), "SELECT");

        assert_eq!(render(TokenKind::Ident, "name", &options), "name");
        assert_eq!(render(TokenKind::Operator, "=", &options), "=");
        assert_ne!(
            render(TokenKind::Function, "SUM", &options),
            render(TokenKind::Type, "SUM", &options)
        );
    }

    #[test]
    fn test_strip_ansi_leaves_plain_text() {
        assert_eq!(strip_ansi("select [1]"), "select [1]");
        assert_eq!(strip_ansi("\u{1b}[0m\u{1b}[33mAS\u{1b}[0m x"), "AS x");
    }
}
