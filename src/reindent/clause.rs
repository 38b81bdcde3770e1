use crate::error::Result;
use crate::group::{Element, Group};
use crate::token::{Token, TokenKind};

use super::writer::Writer;
use super::{write_group, Placement};

/// Single-stream layout: the clause keyword starts a line at the group's
/// indent and the rest follows inline. Clause keywords met along the way
/// (`ON`, `OFFSET`, `DO`, ...) break the line again.
pub(super) fn write(w: &mut Writer, group: &Group, indent: usize, place: Placement) -> Result<()> {
    write_stream(w, group, indent, place, |token| {
        token.kind.needs_newline_before() || token.is(TokenKind::Do)
    })
}

/// `LOCK table` / `IN mode`.
pub(super) fn write_lock(w: &mut Writer, group: &Group, indent: usize, place: Placement) -> Result<()> {
    write_stream(w, group, indent, place, |token| token.is(TokenKind::In))
}

fn write_stream(
    w: &mut Writer,
    group: &Group,
    indent: usize,
    place: Placement,
    breaks_line: impl Fn(&Token) -> bool,
) -> Result<()> {
    for (i, element) in group.elements.iter().enumerate() {
        match element {
            Element::Token(token) if i == 0 || breaks_line(token) => w.line(indent, 0, token)?,
            Element::Token(token) => w.inline(token)?,
            Element::Group(child) => write_group(w, child, place.child())?,
        }
    }
    Ok(())
}
