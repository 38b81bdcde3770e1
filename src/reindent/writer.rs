use crate::error::Result;
use crate::options::{CommaStyle, FormatOptions};
use crate::render::render_token;
use crate::token::{Token, TokenKind};

const INDENT: &str = "  ";

/// Output buffer for the reindenter.
///
/// Tokens are written either at the start of a fresh line or inline after a
/// single space. `glue` suppresses that space for the next inline token, which
/// is how `(`, `[` and `::` stick to what follows them.
pub(crate) struct Writer<'o> {
    buf: String,
    options: &'o FormatOptions,
    glue: bool,
}

impl<'o> Writer<'o> {
    pub fn new(options: &'o FormatOptions) -> Self {
        Self {
            buf: String::new(),
            options,
            glue: false,
        }
    }

    pub fn comma_style(&self) -> CommaStyle {
        self.options.comma_style
    }

    /// Start a line at `indent` levels plus `pad` extra spaces.
    pub fn newline(&mut self, indent: usize, pad: usize) {
        self.buf.push('\n');
        for _ in 0..indent {
            self.buf.push_str(INDENT);
        }
        for _ in 0..pad {
            self.buf.push(' ');
        }
        self.glue = false;
    }

    /// Write `token` at the start of a new line.
    pub fn line(&mut self, indent: usize, pad: usize, token: &Token) -> Result<()> {
        self.newline(indent, pad);
        self.tight(token)
    }

    /// Write `token` with no leading space.
    pub fn tight(&mut self, token: &Token) -> Result<()> {
        let text = render_token(token, self.options)?;
        self.buf.push_str(&text);
        self.glue = token.kind.is_opening() || token.is_cast();
        Ok(())
    }

    /// Write `token` after a space, unless the previous token asked for glue.
    pub fn spaced(&mut self, token: &Token) -> Result<()> {
        if !self.glue {
            self.buf.push(' ');
        }
        self.tight(token)
    }

    /// Write `token` in running text, following the punctuation rules.
    pub fn inline(&mut self, token: &Token) -> Result<()> {
        match token.kind {
            TokenKind::Comma
            | TokenKind::Semicolon
            | TokenKind::EndParenthesis
            | TokenKind::EndBracket
            | TokenKind::EndBrace => self.tight(token),
            _ if token.is_cast() => self.tight(token),
            _ => self.spaced(token),
        }
    }

    /// Write a comma that separates two columns of a list.
    pub fn column_comma(&mut self, indent: usize, token: &Token) -> Result<()> {
        match self.comma_style() {
            CommaStyle::Left => self.line(indent, 2, token),
            CommaStyle::Right => {
                self.tight(token)?;
                self.newline(indent, 1);
                Ok(())
            }
        }
    }

    pub fn finish(self) -> String {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, text: &str) -> Token {
        Token::new(kind, text)
    }

    #[test]
    fn test_newline_indents_in_pairs() {
        let options = FormatOptions::default();
        let mut w = Writer::new(&options);
        w.line(2, 1, &tok(TokenKind::Ident, "a")).unwrap();
        assert_eq!(w.finish(), "\n     a");
    }

    #[test]
    fn test_inline_punctuation() {
        let options = FormatOptions::default();
        let mut w = Writer::new(&options);
        w.line(0, 0, &tok(TokenKind::Function, "SUM")).unwrap();
        w.tight(&tok(TokenKind::StartParenthesis, "(")).unwrap();
        w.inline(&tok(TokenKind::Ident, "a")).unwrap();
        w.inline(&tok(TokenKind::Comma, ",")).unwrap();
        w.inline(&tok(TokenKind::Ident, "b")).unwrap();
        w.inline(&tok(TokenKind::EndParenthesis, ")")).unwrap();
        assert_eq!(w.finish(), "\nSUM(a, b)");
    }

    #[test]
    fn test_cast_glues_both_sides() {
        let options = FormatOptions::default();
        let mut w = Writer::new(&options);
        w.line(0, 0, &tok(TokenKind::String, "'{1}'")).unwrap();
        w.inline(&tok(TokenKind::Operator, "::")).unwrap();
        w.inline(&tok(TokenKind::Ident, "int")).unwrap();
        w.inline(&tok(TokenKind::StartBracket, "[")).unwrap();
        w.inline(&tok(TokenKind::EndBracket, "]")).unwrap();
        assert_eq!(w.finish(), "\n'{1}'::int []");
    }

    #[test]
    fn test_comma_styles() {
        let comma = tok(TokenKind::Comma, ",");
        let b = tok(TokenKind::Ident, "b");

        let left = FormatOptions::default();
        let mut w = Writer::new(&left);
        w.line(0, 2, &tok(TokenKind::Ident, "a")).unwrap();
        w.column_comma(0, &comma).unwrap();
        w.inline(&b).unwrap();
        assert_eq!(w.finish(), "\n  a\n  , b");

        let right = FormatOptions::default().with_comma_style(CommaStyle::Right);
        let mut w = Writer::new(&right);
        w.line(0, 2, &tok(TokenKind::Ident, "a")).unwrap();
        w.column_comma(0, &comma).unwrap();
        w.inline(&b).unwrap();
        assert_eq!(w.finish(), "\n  a,\n  b");
    }
}
