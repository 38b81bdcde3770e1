use compact_str::CompactString;

/// Every token kind the lexer can produce.
///
/// Keyword kinds carry their uppercase spelling as token text. `AndGroup` and
/// `OrGroup` are AND/OR retagged because they started a new input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Punctuation
    Eof,
    Comma,
    Semicolon,
    StartParenthesis,
    EndParenthesis,
    StartBracket,
    EndBracket,
    StartBrace,
    EndBrace,

    // Keywords
    All,
    And,
    Any,
    As,
    Asc,
    At,
    Between,
    By,
    Case,
    Collate,
    Conflict,
    Content,
    Cross,
    Delete,
    Desc,
    Distinct,
    DistinctRow,
    Do,
    Document,
    Double,
    Else,
    End,
    Escape,
    Except,
    Exists,
    Fetch,
    Filter,
    First,
    Following,
    For,
    From,
    Full,
    Group,
    Having,
    In,
    Inner,
    Insert,
    Intersect,
    Into,
    Is,
    Join,
    Last,
    Lateral,
    Left,
    Like,
    Limit,
    Lock,
    Natural,
    Not,
    Null,
    Nulls,
    Offset,
    On,
    Or,
    Order,
    Ordinality,
    Outer,
    Overlaps,
    Passing,
    Preceding,
    Precision,
    Ref,
    Returning,
    Right,
    Row,
    Rows,
    Select,
    Set,
    Similar,
    Some,
    Then,
    Time,
    To,
    Unbounded,
    Union,
    Update,
    Using,
    Values,
    Varying,
    When,
    Where,
    Window,
    With,
    Within,
    XmlNamespaces,
    Zone,

    // Literals and structural markers
    Ident,
    String,
    ReservedValue,
    Function,
    Type,
    Operator,
    AndGroup,
    OrGroup,
}

impl TokenKind {
    pub fn is_punctuation(self) -> bool {
        matches!(
            self,
            Self::Eof
                | Self::Comma
                | Self::Semicolon
                | Self::StartParenthesis
                | Self::EndParenthesis
                | Self::StartBracket
                | Self::EndBracket
                | Self::StartBrace
                | Self::EndBrace
        )
    }

    pub fn is_keyword(self) -> bool {
        !self.is_punctuation()
            && !matches!(
                self,
                Self::Ident
                    | Self::String
                    | Self::ReservedValue
                    | Self::Function
                    | Self::Type
                    | Self::Operator
            )
    }

    /// Kinds whose text comes straight from the source and is never recased.
    pub fn is_verbatim(self) -> bool {
        matches!(self, Self::Ident | Self::String) || self.is_punctuation()
    }

    /// Kinds that open a nested group when met inside another group.
    pub fn is_group_maker(self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::Case
                | Self::From
                | Self::Where
                | Self::Order
                | Self::Group
                | Self::Limit
                | Self::Offset
                | Self::Fetch
                | Self::AndGroup
                | Self::OrGroup
                | Self::Having
                | Self::Union
                | Self::Except
                | Self::Intersect
                | Self::Function
                | Self::StartParenthesis
                | Self::Type
        ) || self.is_join_start()
    }

    pub fn is_join_start(self) -> bool {
        matches!(
            self,
            Self::Join
                | Self::Full
                | Self::Inner
                | Self::Outer
                | Self::Left
                | Self::Right
                | Self::Natural
                | Self::Cross
                | Self::Lateral
        )
    }

    pub fn is_tie_clause_start(self) -> bool {
        matches!(self, Self::Union | Self::Intersect | Self::Except)
    }

    pub fn is_limit_clause_start(self) -> bool {
        matches!(self, Self::Limit | Self::Fetch | Self::Offset)
    }

    pub fn is_line_group_start(self) -> bool {
        matches!(self, Self::AndGroup | Self::OrGroup)
    }

    /// Kinds that start their own output line in clause layouts.
    pub fn needs_newline_before(self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::Update
                | Self::Insert
                | Self::Delete
                | Self::AndGroup
                | Self::OrGroup
                | Self::From
                | Self::Group
                | Self::Order
                | Self::Having
                | Self::Limit
                | Self::Offset
                | Self::Fetch
                | Self::Returning
                | Self::Set
                | Self::Union
                | Self::Intersect
                | Self::Except
                | Self::Values
                | Self::Where
                | Self::On
                | Self::Using
        )
    }

    /// Keywords that break a column list instead of joining a column.
    pub fn is_keyword_in_column_list(self) -> bool {
        matches!(
            self,
            Self::Select
                | Self::Exists
                | Self::Distinct
                | Self::DistinctRow
                | Self::Into
                | Self::As
                | Self::Group
                | Self::Order
                | Self::By
                | Self::On
                | Self::Returning
                | Self::Set
                | Self::Update
        )
    }

    pub fn is_opening(self) -> bool {
        matches!(
            self,
            Self::StartParenthesis | Self::StartBracket | Self::StartBrace
        )
    }
}

/// An immutable token produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: CompactString,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<CompactString>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// The `::` cast operator.
    pub fn is_cast(&self) -> bool {
        self.kind == TokenKind::Operator && self.text.starts_with("::")
    }

    /// Human-readable form for error messages.
    pub fn describe(&self) -> String {
        if self.kind == TokenKind::Eof {
            "end of input".to_string()
        } else {
            format!("'{}'", self.text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_makers_include_join_starters() {
        assert!(TokenKind::Select.is_group_maker());
        assert!(TokenKind::StartParenthesis.is_group_maker());
        assert!(TokenKind::Lateral.is_group_maker());
        assert!(!TokenKind::Ident.is_group_maker());
        assert!(!TokenKind::EndParenthesis.is_group_maker());
    }

    #[test]
    fn test_clause_start_sets() {
        assert!(TokenKind::Union.is_tie_clause_start());
        assert!(TokenKind::Except.is_tie_clause_start());
        assert!(!TokenKind::All.is_tie_clause_start());

        assert!(TokenKind::Offset.is_limit_clause_start());
        assert!(TokenKind::Fetch.is_limit_clause_start());
        assert!(!TokenKind::First.is_limit_clause_start());
    }

    #[test]
    fn test_newline_kinds() {
        assert!(TokenKind::AndGroup.needs_newline_before());
        assert!(TokenKind::On.needs_newline_before());
        assert!(!TokenKind::And.needs_newline_before());
        assert!(!TokenKind::As.needs_newline_before());
    }

    #[test]
    fn test_verbatim_kinds() {
        assert!(TokenKind::Ident.is_verbatim());
        assert!(TokenKind::Comma.is_verbatim());
        assert!(!TokenKind::Select.is_verbatim());
        assert!(!TokenKind::Function.is_verbatim());
    }

    #[test]
    fn test_keyword_kinds() {
        assert!(TokenKind::Select.is_keyword());
        assert!(TokenKind::AndGroup.is_keyword());
        assert!(!TokenKind::Function.is_keyword());
        assert!(!TokenKind::Operator.is_keyword());
        assert!(!TokenKind::Eof.is_keyword());
    }

    #[test]
    fn test_token_creation() {
        let tok = Token::new(TokenKind::Operator, "::");
        assert!(tok.is(TokenKind::Operator));
        assert!(tok.is_cast());
        assert_eq!(tok.describe(), "'::'");
        assert_eq!(Token::eof().describe(), "end of input");
    }
}
