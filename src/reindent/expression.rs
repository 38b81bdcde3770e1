use crate::error::{Result, SqlfmtError};
use crate::group::{Element, Group};
use crate::token::TokenKind;

use super::writer::Writer;
use super::{write_group, Placement};

pub(super) fn write_case(w: &mut Writer, group: &Group, indent: usize, place: Placement) -> Result<()> {
    // Branch and END offsets line up under CASE in both layouts.
    let (branch_pad, end_pad) = if place.after_comma { (6, 4) } else { (5, 2) };
    for element in &group.elements {
        match element {
            Element::Token(token) => match token.kind {
                TokenKind::Case if place.after_comma => w.spaced(token)?,
                TokenKind::Case => w.line(indent, 2, token)?,
                TokenKind::When | TokenKind::Else => w.line(indent, branch_pad, token)?,
                TokenKind::End => w.line(indent, end_pad, token)?,
                _ => w.inline(token)?,
            },
            Element::Group(child) => write_group(w, child, place.child())?,
        }
    }
    Ok(())
}

/// Function calls and type casts with arguments: `NAME(args)`.
pub(super) fn write_call(w: &mut Writer, group: &Group, indent: usize, place: Placement) -> Result<()> {
    for (i, element) in group.elements.iter().enumerate() {
        match element {
            Element::Token(token) if i == 0 => {
                if place.column == Some(0) {
                    w.line(indent, 2, token)?
                } else {
                    w.spaced(token)?
                }
            }
            Element::Token(token) if i == 1 && token.is(TokenKind::StartParenthesis) => {
                w.tight(token)?
            }
            Element::Token(token) => w.inline(token)?,
            Element::Group(child) if i == 0 => {
                return Err(SqlfmtError::Build(format!(
                    "{:?} group starts with a nested {:?}",
                    group.kind, child.kind
                )));
            }
            Element::Group(child) => write_group(w, child, place.child())?,
        }
    }
    Ok(())
}

pub(super) fn write_parenthesis(
    w: &mut Writer,
    group: &Group,
    indent: usize,
    place: Placement,
) -> Result<()> {
    for (i, element) in group.elements.iter().enumerate() {
        match element {
            Element::Token(token) if i == 0 && place.column == Some(0) => {
                w.line(indent, 2, token)?
            }
            Element::Token(token) => w.inline(token)?,
            Element::Group(child) => write_group(w, child, place.child())?,
        }
    }
    Ok(())
}

/// `( SELECT ... )`. The body is indented one level deeper than the
/// parenthesis; a subquery used as a column also pushes its body one more
/// level so it sits inside the column.
pub(super) fn write_subquery(
    w: &mut Writer,
    group: &Group,
    indent: usize,
    place: Placement,
) -> Result<()> {
    let as_column = place.column.is_some();
    let body = Placement {
        bonus: place.bonus + usize::from(as_column),
        ..Placement::default()
    };
    let close_indent = if as_column {
        indent
    } else {
        indent.saturating_sub(1)
    };

    for (i, element) in group.elements.iter().enumerate() {
        match element {
            Element::Token(token) if i == 0 && place.column == Some(0) => w.line(indent, 0, token)?,
            Element::Token(token) if token.is(TokenKind::EndParenthesis) => {
                w.line(close_indent, 0, token)?
            }
            Element::Token(token) => w.inline(token)?,
            Element::Group(child) => write_group(w, child, body)?,
        }
    }
    Ok(())
}
