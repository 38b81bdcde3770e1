use crate::token::{Token, TokenKind};

/// One entry of a group: a plain token or a nested group.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Token(Token),
    Group(Group),
}

impl Element {
    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Element::Token(token) => Some(token),
            Element::Group(_) => None,
        }
    }

    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Element::Group(group) => Some(group),
            Element::Token(_) => None,
        }
    }

    pub fn is_token(&self, kind: TokenKind) -> bool {
        self.as_token().is_some_and(|t| t.is(kind))
    }
}

/// The clause or expression a group stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKind {
    Select,
    From,
    Join,
    Where,
    AndGroup,
    OrGroup,
    GroupBy,
    Having,
    OrderBy,
    LimitClause,
    TieClause,
    Update,
    Set,
    Returning,
    Delete,
    Insert,
    Values,
    Lock,
    With,
    Case,
    Function,
    TypeCast,
    Parenthesis,
    Subquery,
}

impl GroupKind {
    /// The group a token opens. Parenthesis is refined into Subquery once
    /// its contents are known.
    pub fn for_start(kind: TokenKind) -> Option<Self> {
        let group = match kind {
            TokenKind::Select => Self::Select,
            TokenKind::From => Self::From,
            TokenKind::Where => Self::Where,
            TokenKind::AndGroup => Self::AndGroup,
            TokenKind::OrGroup => Self::OrGroup,
            TokenKind::Group => Self::GroupBy,
            TokenKind::Having => Self::Having,
            TokenKind::Order => Self::OrderBy,
            TokenKind::Limit | TokenKind::Offset | TokenKind::Fetch => Self::LimitClause,
            TokenKind::Union | TokenKind::Intersect | TokenKind::Except => Self::TieClause,
            TokenKind::Update => Self::Update,
            TokenKind::Set => Self::Set,
            TokenKind::Returning => Self::Returning,
            TokenKind::Delete => Self::Delete,
            TokenKind::Insert => Self::Insert,
            TokenKind::Values => Self::Values,
            TokenKind::Lock => Self::Lock,
            TokenKind::With => Self::With,
            TokenKind::Case => Self::Case,
            TokenKind::Function => Self::Function,
            TokenKind::Type => Self::TypeCast,
            TokenKind::StartParenthesis => Self::Parenthesis,
            k if k.is_join_start() => Self::Join,
            _ => return None,
        };
        Some(group)
    }

    /// The token that closes this group and belongs to it.
    pub fn closing_token(self) -> Option<TokenKind> {
        match self {
            Self::Case => Some(TokenKind::End),
            Self::Function | Self::TypeCast | Self::Parenthesis | Self::Subquery => {
                Some(TokenKind::EndParenthesis)
            }
            _ => None,
        }
    }

    /// Groups that may hold AND/OR continuation lines as nested groups.
    pub fn holds_line_groups(self) -> bool {
        !matches!(
            self,
            Self::Case | Self::Function | Self::TypeCast | Self::Parenthesis
        )
    }
}

/// A clause or expression with its elements, in source order.
///
/// Closing tokens (`)` and `END`) are the last element of their own group.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub kind: GroupKind,
    pub elements: Vec<Element>,
    pub indent_level: usize,
}

impl Group {
    pub fn new(kind: GroupKind, elements: Vec<Element>, indent_level: usize) -> Self {
        Self {
            kind,
            elements,
            indent_level,
        }
    }

    #[cfg(test)]
    pub(crate) fn from_tokens(kind: GroupKind, tokens: Vec<Token>, indent_level: usize) -> Self {
        Self::new(
            kind,
            tokens.into_iter().map(Element::Token).collect(),
            indent_level,
        )
    }

    /// All tokens of this group and its descendants, in source order.
    pub fn tokens(&self) -> Vec<&Token> {
        let mut out = Vec::new();
        self.collect_tokens(&mut out);
        out
    }

    fn collect_tokens<'a>(&'a self, out: &mut Vec<&'a Token>) {
        for element in &self.elements {
            match element {
                Element::Token(token) => out.push(token),
                Element::Group(group) => group.collect_tokens(out),
            }
        }
    }

}

/// Index of the first token across `groups` that breaks nesting: a closer
/// that does not match the innermost opener, or the innermost opener left
/// unclosed. Indexes count the flattened tokens of `groups` in order.
pub fn unbalanced_token(groups: &[Group]) -> Option<usize> {
    let mut stack: Vec<(TokenKind, usize)> = Vec::new();
    let tokens = groups.iter().flat_map(|g| g.tokens());
    for (idx, token) in tokens.enumerate() {
        match token.kind {
            TokenKind::StartParenthesis => stack.push((TokenKind::EndParenthesis, idx)),
            TokenKind::StartBracket => stack.push((TokenKind::EndBracket, idx)),
            TokenKind::StartBrace => stack.push((TokenKind::EndBrace, idx)),
            TokenKind::Case => stack.push((TokenKind::End, idx)),
            TokenKind::EndParenthesis
            | TokenKind::EndBracket
            | TokenKind::EndBrace
            | TokenKind::End => match stack.pop() {
                Some((expected, _)) if expected == token.kind => {}
                _ => return Some(idx),
            },
            _ => {}
        }
    }
    stack.pop().map(|(_, idx)| idx)
}
