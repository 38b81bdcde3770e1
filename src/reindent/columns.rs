use crate::error::Result;
use crate::group::{Element, Group, GroupKind};
use crate::token::{Token, TokenKind};

use super::writer::Writer;
use super::{write_group, Placement};

/// Comma-separated list layout: the clause keyword on its own line, then one
/// column per line with the separating comma leading or trailing.
pub(super) fn write(w: &mut Writer, group: &Group, indent: usize, place: Placement) -> Result<()> {
    let mut list = ColumnList {
        kind: group.kind,
        indent,
        count: 0,
        depth: 0,
    };
    for (i, element) in group.elements.iter().enumerate() {
        let prev = i.checked_sub(1).and_then(|p| group.elements.get(p));
        match element {
            Element::Token(token) => list.token(w, token)?,
            Element::Group(child) => list.group(w, child, prev, place)?,
        }
    }
    Ok(())
}

struct ColumnList {
    kind: GroupKind,
    indent: usize,
    /// Items written so far; the first one starts a fresh line.
    count: usize,
    /// `[]` / `{}` nesting. Commas in there belong to the literal.
    depth: usize,
}

impl ColumnList {
    fn token(&mut self, w: &mut Writer, token: &Token) -> Result<()> {
        if self.depth > 0 {
            self.track_depth(token.kind);
            return w.inline(token);
        }

        match token.kind {
            TokenKind::Comma => w.column_comma(self.indent, token),
            kind if kind.is_keyword_in_column_list() => self.keyword(w, token),
            kind => {
                self.track_depth(kind);
                self.item(w, token)
            }
        }
    }

    fn keyword(&mut self, w: &mut Writer, token: &Token) -> Result<()> {
        if self.kind == GroupKind::Select {
            return match token.kind {
                TokenKind::Select | TokenKind::Into => w.line(self.indent, 0, token),
                TokenKind::Exists => {
                    self.count += 1;
                    w.inline(token)
                }
                _ => w.inline(token),
            };
        }
        if token.kind.needs_newline_before() {
            w.line(self.indent, 0, token)
        } else {
            w.inline(token)
        }
    }

    fn item(&mut self, w: &mut Writer, token: &Token) -> Result<()> {
        let first = self.count == 0;
        self.count += 1;
        if first {
            w.line(self.indent, 2, token)
        } else {
            w.inline(token)
        }
    }

    fn group(
        &mut self,
        w: &mut Writer,
        child: &Group,
        prev: Option<&Element>,
        place: Placement,
    ) -> Result<()> {
        let mut child_place = place.child();
        match child.kind {
            GroupKind::Case => {
                child_place.after_comma = prev.is_some_and(|e| e.is_token(TokenKind::Comma));
            }
            GroupKind::Subquery if prev.is_some_and(|e| e.is_token(TokenKind::Exists)) => {}
            GroupKind::Subquery
            | GroupKind::Function
            | GroupKind::TypeCast
            | GroupKind::Parenthesis => child_place.column = Some(self.count),
            _ => {}
        }
        self.count += 1;
        write_group(w, child, child_place)
    }

    fn track_depth(&mut self, kind: TokenKind) {
        match kind {
            TokenKind::StartBracket | TokenKind::StartBrace => self.depth += 1,
            TokenKind::EndBracket | TokenKind::EndBrace => {
                self.depth = self.depth.saturating_sub(1)
            }
            _ => {}
        }
    }
}
