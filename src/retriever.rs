use crate::error::{Result, SqlfmtError};
use crate::group::{Element, Group, GroupKind};
use crate::token::{Token, TokenKind};

/// How many leading tokens of a join clause may still be join keywords
/// (`NATURAL LEFT OUTER JOIN`) without opening a nested join.
const JOIN_START_WINDOW: usize = 4;

/// Token kinds that end a clause, besides EOF. Groups with a closing token
/// (see [`GroupKind::closing_token`]) end only on that token.
pub fn end_tokens(kind: GroupKind) -> &'static [TokenKind] {
    use TokenKind as T;
    match kind {
        GroupKind::Select => &[
            T::From,
            T::Where,
            T::Group,
            T::Having,
            T::Order,
            T::Limit,
            T::Offset,
            T::Fetch,
            T::Union,
            T::Except,
            T::Intersect,
            T::EndParenthesis,
        ],
        GroupKind::From => &[
            T::Where,
            T::Full,
            T::Inner,
            T::Outer,
            T::Left,
            T::Right,
            T::Join,
            T::Natural,
            T::Cross,
            T::Order,
            T::Group,
            T::Having,
            T::Union,
            T::Offset,
            T::Limit,
            T::Fetch,
            T::Except,
            T::Intersect,
            T::Returning,
            T::EndParenthesis,
        ],
        GroupKind::Join => &[
            T::Where,
            T::Order,
            T::Group,
            T::Having,
            T::Limit,
            T::Offset,
            T::Fetch,
            T::AndGroup,
            T::OrGroup,
            T::Join,
            T::Full,
            T::Left,
            T::Right,
            T::Inner,
            T::Outer,
            T::Natural,
            T::Cross,
            T::Union,
            T::Except,
            T::Intersect,
            T::Returning,
            T::EndParenthesis,
        ],
        GroupKind::Where => &[
            T::Group,
            T::Order,
            T::Limit,
            T::Offset,
            T::Fetch,
            T::Having,
            T::AndGroup,
            T::OrGroup,
            T::Union,
            T::Except,
            T::Intersect,
            T::Returning,
            T::EndParenthesis,
        ],
        GroupKind::AndGroup | GroupKind::OrGroup => &[
            T::Group,
            T::Order,
            T::Limit,
            T::Offset,
            T::Fetch,
            T::Having,
            T::Union,
            T::Except,
            T::Intersect,
            T::AndGroup,
            T::OrGroup,
            T::Returning,
            T::EndParenthesis,
        ],
        GroupKind::GroupBy => &[
            T::Order,
            T::Limit,
            T::Fetch,
            T::Offset,
            T::Union,
            T::Except,
            T::Intersect,
            T::Having,
            T::EndParenthesis,
        ],
        GroupKind::Having => &[
            T::Limit,
            T::Offset,
            T::Fetch,
            T::Order,
            T::Union,
            T::Except,
            T::Intersect,
            T::EndParenthesis,
        ],
        GroupKind::OrderBy => &[
            T::Limit,
            T::Fetch,
            T::Offset,
            T::Union,
            T::Except,
            T::Intersect,
            T::EndParenthesis,
        ],
        GroupKind::LimitClause => &[T::Union, T::Except, T::Intersect, T::EndParenthesis],
        GroupKind::TieClause => &[T::Select],
        GroupKind::Update => &[T::Where, T::Set, T::Returning],
        GroupKind::Set => &[T::Where, T::From, T::Returning],
        GroupKind::Returning => &[T::EndParenthesis],
        GroupKind::Delete => &[T::Where, T::From],
        GroupKind::Insert => &[T::Values, T::Select],
        GroupKind::Values => &[T::Update, T::Returning, T::Select],
        GroupKind::Lock => &[],
        GroupKind::With => &[T::Select, T::Insert, T::Update, T::Delete],
        GroupKind::Case => &[T::End],
        GroupKind::Function
        | GroupKind::TypeCast
        | GroupKind::Parenthesis
        | GroupKind::Subquery => &[T::EndParenthesis],
    }
}

/// Collects one group by scanning forward from its start token.
///
/// Group-maker tokens met on the way recurse into a child retriever; the
/// scan stops at the first end token of this group's kind.
pub struct Retriever<'t> {
    tokens: &'t [Token],
    /// Absolute index of `tokens[0]`, for error positions.
    offset: usize,
    kind: GroupKind,
    indent_level: usize,
    elements: Vec<Element>,
}

impl<'t> Retriever<'t> {
    /// A retriever for the group opened by `tokens[0]`, if it opens one.
    pub fn new(tokens: &'t [Token], offset: usize, indent_level: usize) -> Option<Self> {
        let kind = GroupKind::for_start(tokens.first()?.kind)?;
        Some(Self {
            tokens,
            offset,
            kind,
            indent_level,
            elements: Vec::new(),
        })
    }

    /// Retrieve the group. Returns it with the number of tokens it consumed.
    pub fn retrieve(mut self) -> Result<(Group, usize)> {
        let consumed = self.append_elements()?;
        let group = self.into_group()?;
        Ok((group, consumed))
    }

    fn append_elements(&mut self) -> Result<usize> {
        let closing = self.kind.closing_token();
        let mut idx = 0;
        loop {
            let Some(token) = self.tokens.get(idx) else {
                return Err(SqlfmtError::parsing(
                    self.offset + idx,
                    format!("{:?} clause has no end token", self.kind),
                ));
            };

            if self.is_end(token, idx) {
                if closing == Some(token.kind) {
                    self.elements.push(Element::Token(token.clone()));
                    return Ok(idx + 1);
                }
                return Ok(idx);
            }
            if closing.is_some() && token.is(TokenKind::Eof) {
                return Err(SqlfmtError::parsing(
                    self.offset + idx,
                    format!("{:?} group is never closed", self.kind),
                ));
            }

            if let Some(sub) = self.sub_retriever(idx) {
                if let Some(close) = sub.kind.closing_token() {
                    if !self.tokens[idx + 1..].iter().any(|t| t.is(close)) {
                        return Err(SqlfmtError::parsing(
                            self.offset + idx,
                            format!("{} has no matching {:?}", token.describe(), close),
                        ));
                    }
                }
                let (group, used) = sub.retrieve()?;
                self.elements.push(Element::Group(group));
                idx += used;
                continue;
            }

            self.elements.push(Element::Token(token.clone()));
            idx += 1;
        }
    }

    fn is_end(&self, token: &Token, idx: usize) -> bool {
        if idx == 0 || self.in_join_start(idx) {
            return false;
        }
        match self.kind.closing_token() {
            Some(close) => token.is(close),
            None => token.is(TokenKind::Eof) || end_tokens(self.kind).contains(&token.kind),
        }
    }

    /// Whether `idx` is still inside the leading join keywords of a join clause.
    fn in_join_start(&self, idx: usize) -> bool {
        self.kind == GroupKind::Join
            && idx < JOIN_START_WINDOW
            && self.tokens[..=idx].iter().all(|t| t.kind.is_join_start())
    }

    fn is_subquery(&self) -> bool {
        self.kind == GroupKind::Parenthesis
            && self.tokens.get(1).is_some_and(|t| t.is(TokenKind::Select))
    }

    /// Group makers that stay plain tokens in this context.
    fn is_irregular(&self, token: &Token, idx: usize) -> bool {
        let next_is_paren = self
            .tokens
            .get(idx + 1)
            .is_some_and(|t| t.is(TokenKind::StartParenthesis));

        let exempt_here = match self.kind {
            GroupKind::Function => {
                matches!(token.kind, TokenKind::Order | TokenKind::From)
                    || (idx == 1 && token.is(TokenKind::StartParenthesis))
            }
            GroupKind::TypeCast => idx == 1 && token.is(TokenKind::StartParenthesis),
            GroupKind::Parenthesis => token.is(TokenKind::Order) && !self.is_subquery(),
            _ => false,
        };

        exempt_here
            || (token.is(TokenKind::Type) && !next_is_paren)
            || (token.kind.is_line_group_start()
                && !self.kind.holds_line_groups()
                && !self.is_subquery())
    }

    fn sub_retriever(&self, idx: usize) -> Option<Retriever<'t>> {
        if idx == 0 {
            return None;
        }
        let token = &self.tokens[idx];
        if !token.kind.is_group_maker() || self.is_irregular(token, idx) {
            return None;
        }
        if token.kind.is_join_start() && self.in_join_start(idx) {
            return None;
        }

        let opens_subquery = token.is(TokenKind::StartParenthesis)
            && self
                .tokens
                .get(idx + 1)
                .is_some_and(|t| t.is(TokenKind::Select));
        let indent_level = if opens_subquery {
            self.indent_level + 1
        } else {
            self.indent_level
        };
        Retriever::new(&self.tokens[idx..], self.offset + idx, indent_level)
    }

    fn into_group(self) -> Result<Group> {
        let mut kind = self.kind;
        if kind == GroupKind::Parenthesis
            && self
                .elements
                .get(1)
                .and_then(Element::as_group)
                .is_some_and(|g| g.kind == GroupKind::Select)
        {
            kind = GroupKind::Subquery;
        }

        if is_missing_operand(kind, &self.elements) {
            let keyword = self
                .elements
                .first()
                .and_then(Element::as_token)
                .map(Token::describe)
                .unwrap_or_default();
            return Err(SqlfmtError::parsing(
                self.offset + self.elements.len(),
                format!("{} is missing its operand", keyword),
            ));
        }

        Ok(Group::new(kind, self.elements, self.indent_level))
    }
}

/// A clause holding nothing but its own keywords, as in `select a from`.
fn is_missing_operand(kind: GroupKind, elements: &[Element]) -> bool {
    let leading_keywords = |pred: fn(TokenKind) -> bool| {
        elements
            .iter()
            .take_while(|e| e.as_token().is_some_and(|t| pred(t.kind)))
            .count()
    };
    let lead = match kind {
        GroupKind::Select
        | GroupKind::From
        | GroupKind::Where
        | GroupKind::AndGroup
        | GroupKind::OrGroup
        | GroupKind::Having
        | GroupKind::LimitClause
        | GroupKind::Set
        | GroupKind::Returning
        | GroupKind::Values
        | GroupKind::Lock
        | GroupKind::With => 1,
        GroupKind::GroupBy | GroupKind::OrderBy => {
            leading_keywords(|k| matches!(k, TokenKind::Group | TokenKind::Order | TokenKind::By))
        }
        GroupKind::Join => leading_keywords(TokenKind::is_join_start),
        GroupKind::Insert => {
            leading_keywords(|k| matches!(k, TokenKind::Insert | TokenKind::Into))
        }
        _ => return false,
    };
    elements.len() <= lead
}
