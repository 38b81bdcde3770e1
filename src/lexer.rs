use tracing::debug;

use crate::dialect::Dialect;
use crate::error::{Result, SqlfmtError};
use crate::scanner::Scanner;
use crate::string_utils::{is_exponent_head, skip_quoted};
use crate::token::{Token, TokenKind};
use crate::vocabulary::{self, COMPOUND_TYPES};

/// Shape of a lexeme before word classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RawClass {
    Word,
    Quoted,
    Operator,
    Punct(TokenKind),
}

/// A slice of source text plus the whitespace that preceded it.
#[derive(Debug, Clone, Copy)]
struct Lexeme<'a> {
    class: RawClass,
    text: &'a str,
    after_newline: bool,
    spaced: bool,
}

/// A classified token that still remembers its leading whitespace.
#[derive(Debug, Clone)]
struct Classified {
    token: Token,
    after_newline: bool,
    spaced: bool,
}

/// Turns SQL text into tokens, consulting a [`Dialect`] for vocabulary.
///
/// Lexing runs in three passes: scanning into raw lexemes, classifying words
/// (with compound-type fusion), then contextual retagging.
pub struct Lexer<'d> {
    dialect: &'d Dialect,
}

impl<'d> Lexer<'d> {
    pub fn new(dialect: &'d Dialect) -> Self {
        Self { dialect }
    }

    /// Tokenize `src`. The result always ends with a single EOF token.
    pub fn tokenize(&self, src: &str) -> Result<Vec<Token>> {
        let lexemes = self.scan(src)?;
        let classified = self.classify(&lexemes);
        let mut tokens = self.retag(&classified);
        tokens.push(Token::eof());
        debug!(tokens = tokens.len(), bytes = src.len(), "tokenized input");
        Ok(tokens)
    }

    fn scan<'a>(&self, src: &'a str) -> Result<Vec<Lexeme<'a>>> {
        let mut scanner = Scanner::new(src, self.dialect.max_operator_chars());
        let mut lexemes = Vec::new();
        let mut after_newline = false;
        let mut spaced = true;

        while let Some(ch) = scanner.peek() {
            if ch.is_whitespace() {
                scanner.read();
                if ch == '\n' {
                    after_newline = true;
                }
                spaced = true;
                continue;
            }

            let start = scanner.pos();
            if starts_comment(ch, scanner.peek_second()) {
                return Err(SqlfmtError::lex(start, "comments are not supported"));
            }

            let class = if ch == '\'' || ch == '"' {
                scanner.jump_to(skip_quoted(src.as_bytes(), start));
                RawClass::Quoted
            } else if let Some(kind) = punctuation_kind(ch) {
                scanner.read();
                RawClass::Punct(kind)
            } else if self.scan_operator(&mut scanner)?.is_some() {
                RawClass::Operator
            } else {
                self.scan_word(&mut scanner)?;
                RawClass::Word
            };

            lexemes.push(Lexeme {
                class,
                text: scanner.slice(start),
                after_newline,
                spaced,
            });
            after_newline = false;
            spaced = false;
        }

        Ok(lexemes)
    }

    /// Longest registered operator at the current position. On a match the
    /// scanner is left just past it; otherwise it is left untouched.
    fn scan_operator(&self, scanner: &mut Scanner) -> Result<Option<usize>> {
        let start = scanner.pos();
        let mut read = 0;
        let mut longest = 0;
        while read < self.dialect.max_operator_chars() {
            if scanner.read().is_none() {
                break;
            }
            read += 1;
            let candidate = scanner.slice(start);
            if !self.dialect.is_operator_prefix(candidate) {
                break;
            }
            if self.dialect.is_operator(candidate) {
                longest = read;
            }
        }
        scanner.rewind(read - longest)?;
        Ok((longest > 0).then_some(longest))
    }

    fn scan_word(&self, scanner: &mut Scanner) -> Result<()> {
        let start = scanner.pos();
        while let Some(ch) = scanner.peek() {
            if is_separator(ch) {
                break;
            }
            let word = scanner.slice(start);
            if !word.is_empty() {
                // `t.*`
                if ch == '*' && word.ends_with('.') {
                    scanner.read();
                    continue;
                }
                // `1.5e-3`
                if (ch == '-' || ch == '+')
                    && is_exponent_head(word)
                    && scanner.peek_second().is_some_and(|c| c.is_ascii_digit())
                {
                    scanner.read();
                    continue;
                }
                if starts_comment(ch, scanner.peek_second()) {
                    break;
                }
                if let Some(len) = self.scan_operator(scanner)? {
                    scanner.rewind(len)?;
                    break;
                }
            }
            scanner.read();
        }
        Ok(())
    }

    fn classify(&self, lexemes: &[Lexeme]) -> Vec<Classified> {
        let mut out = Vec::with_capacity(lexemes.len());
        let mut i = 0;
        while i < lexemes.len() {
            let lexeme = &lexemes[i];
            let token = match lexeme.class {
                RawClass::Quoted => Token::new(TokenKind::String, lexeme.text),
                RawClass::Operator => Token::new(TokenKind::Operator, lexeme.text),
                RawClass::Punct(kind) => Token::new(kind, lexeme.text),
                RawClass::Word => {
                    if let Some((consumed, text)) = match_compound_type(&lexemes[i..]) {
                        out.push(Classified {
                            token: Token::new(TokenKind::Type, text),
                            after_newline: lexeme.after_newline,
                            spaced: lexeme.spaced,
                        });
                        i += consumed;
                        continue;
                    }
                    let next_is_paren = lexemes.get(i + 1).is_some_and(|next| {
                        next.class == RawClass::Punct(TokenKind::StartParenthesis)
                    });
                    self.classify_word(lexeme.text, next_is_paren)
                }
            };
            out.push(Classified {
                token,
                after_newline: lexeme.after_newline,
                spaced: lexeme.spaced,
            });
            i += 1;
        }
        out
    }

    fn classify_word(&self, word: &str, next_is_paren: bool) -> Token {
        let upper = word.to_uppercase();
        if let Some(kind) = vocabulary::keyword_kind(&upper) {
            return Token::new(kind, upper);
        }
        match self.dialect.word_kind(&upper) {
            Some(TokenKind::Function) if next_is_paren => {
                let spelling = self
                    .dialect
                    .function_spelling(&upper)
                    .unwrap_or(upper.as_str());
                Token::new(TokenKind::Function, spelling)
            }
            Some(TokenKind::Type) if next_is_paren => Token::new(TokenKind::Type, upper),
            Some(TokenKind::ReservedValue) => Token::new(TokenKind::ReservedValue, upper),
            _ => Token::new(TokenKind::Ident, word),
        }
    }

    fn retag(&self, items: &[Classified]) -> Vec<Token> {
        let mut tokens = Vec::with_capacity(items.len() + 1);
        let mut i = 0;
        while i < items.len() {
            if let Some((consumed, token)) = self.fuse_literal_prefix(&items[i..]) {
                tokens.push(token);
                i += consumed;
                continue;
            }

            let item = &items[i];
            let next_is_paren = items
                .get(i + 1)
                .is_some_and(|next| next.token.is(TokenKind::StartParenthesis));
            let mut token = item.token.clone();
            match token.kind {
                TokenKind::And if item.after_newline => token.kind = TokenKind::AndGroup,
                TokenKind::Or if item.after_newline => token.kind = TokenKind::OrGroup,
                TokenKind::Left if next_is_paren => token.kind = TokenKind::Function,
                _ => {}
            }
            tokens.push(token);
            i += 1;
        }
        tokens
    }

    /// A literal prefix glued to the string that follows it, e.g. `E'\t'`.
    /// The prefix may span several lexemes (`U` `&`) as long as nothing
    /// separates them.
    fn fuse_literal_prefix(&self, items: &[Classified]) -> Option<(usize, Token)> {
        for prefix in self.dialect.literal_prefixes() {
            let mut joined = String::new();
            for (n, item) in items.iter().enumerate() {
                if n > 0 && item.spaced {
                    break;
                }
                if !matches!(item.token.kind, TokenKind::Ident | TokenKind::Operator) {
                    break;
                }
                joined.push_str(&item.token.text);
                if joined.len() >= prefix.len() {
                    if joined.to_uppercase() != *prefix {
                        break;
                    }
                    let literal = items.get(n + 1)?;
                    if literal.token.is(TokenKind::String) && !literal.spaced {
                        let text = format!("{}{}", joined, literal.token.text);
                        return Some((n + 2, Token::new(TokenKind::String, text)));
                    }
                    break;
                }
            }
        }
        None
    }
}

fn punctuation_kind(ch: char) -> Option<TokenKind> {
    match ch {
        ',' => Some(TokenKind::Comma),
        ';' => Some(TokenKind::Semicolon),
        '(' => Some(TokenKind::StartParenthesis),
        ')' => Some(TokenKind::EndParenthesis),
        '[' => Some(TokenKind::StartBracket),
        ']' => Some(TokenKind::EndBracket),
        '{' => Some(TokenKind::StartBrace),
        '}' => Some(TokenKind::EndBrace),
        _ => None,
    }
}

fn is_separator(ch: char) -> bool {
    ch.is_whitespace() || ch == '\'' || ch == '"' || punctuation_kind(ch).is_some()
}

fn starts_comment(ch: char, next: Option<char>) -> bool {
    matches!((ch, next), ('-', Some('-')) | ('/', Some('*')))
}

/// Fuse a run of words that spell a multi-word type.
fn match_compound_type(lexemes: &[Lexeme]) -> Option<(usize, String)> {
    'sequences: for sequence in COMPOUND_TYPES {
        if lexemes.len() < sequence.len() {
            continue;
        }
        for (lexeme, word) in lexemes.iter().zip(sequence.iter()) {
            if lexeme.class != RawClass::Word || !lexeme.text.eq_ignore_ascii_case(word) {
                continue 'sequences;
            }
        }
        return Some((sequence.len(), sequence.join(" ")));
    }
    None
}
