//! Statement-level grammar over the clause groups built by [`Retriever`].
//!
//! Each statement is a fixed sequence of optional clauses after its leading
//! keyword. The retriever decides where a clause ends; the parser decides
//! which clauses may follow one another.

use tracing::debug;

use crate::error::{Result, SqlfmtError};
use crate::group::{unbalanced_token, Element, Group};
use crate::retriever::Retriever;
use crate::token::{Token, TokenKind};

/// One `;`-separated statement.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub groups: Vec<Group>,
    /// The `;` that ended the statement, if any.
    pub terminator: Option<Token>,
}

/// Parse a single statement. `tokens` must end with EOF.
///
/// Input holding nothing but EOF parses to no groups.
pub fn parse_tokens(tokens: &[Token]) -> Result<Vec<Group>> {
    ensure_eof(tokens)?;
    Parser::new(tokens, 0).parse()
}

/// Parse `;`-separated statements. `tokens` must end with EOF.
pub fn parse_statements(tokens: &[Token]) -> Result<Vec<Statement>> {
    ensure_eof(tokens)?;
    let mut statements = Vec::new();
    let mut start = 0;
    for (idx, token) in tokens.iter().enumerate() {
        let is_last = token.is(TokenKind::Eof);
        if !token.is(TokenKind::Semicolon) && !is_last {
            continue;
        }

        let body = &tokens[start..idx];
        if body.is_empty() {
            if is_last {
                break;
            }
            return Err(SqlfmtError::parsing(idx, "empty statement before ';'"));
        }

        let mut segment = body.to_vec();
        segment.push(Token::eof());
        let groups = Parser::new(&segment, start).parse()?;
        statements.push(Statement {
            groups,
            terminator: (!is_last).then(|| token.clone()),
        });
        start = idx + 1;
        if is_last {
            break;
        }
    }
    debug!(statements = statements.len(), "parsed statements");
    Ok(statements)
}

fn ensure_eof(tokens: &[Token]) -> Result<()> {
    match tokens.last() {
        Some(last) if last.is(TokenKind::Eof) => Ok(()),
        _ => Err(SqlfmtError::parsing(tokens.len(), "token stream does not end with EOF")),
    }
}

struct Parser<'t> {
    tokens: &'t [Token],
    /// Absolute index of `tokens[0]`, for error positions.
    base: usize,
    pos: usize,
    groups: Vec<Group>,
}

impl<'t> Parser<'t> {
    fn new(tokens: &'t [Token], base: usize) -> Self {
        Self {
            tokens,
            base,
            pos: 0,
            groups: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<Group>> {
        match self.peek() {
            TokenKind::Eof => return Ok(Vec::new()),
            TokenKind::With => {
                self.take()?;
                self.statement()?;
            }
            _ => self.statement()?,
        }

        let rest = self.current();
        if !rest.is(TokenKind::Eof) {
            return Err(self.error(format!("unexpected {} after statement", rest.describe())));
        }
        if let Some(idx) = unbalanced_token(&self.groups) {
            let message = match self.tokens.get(idx) {
                Some(token) if token.kind.is_opening() || token.is(TokenKind::Case) => {
                    format!("{} is never closed", token.describe())
                }
                Some(token) => format!("unmatched {}", token.describe()),
                None => "unbalanced brackets".to_string(),
            };
            return Err(SqlfmtError::parsing(self.base + idx, message));
        }
        Ok(self.groups)
    }

    fn statement(&mut self) -> Result<()> {
        match self.peek() {
            TokenKind::Select => self.select_statement(),
            TokenKind::Update => self.update_statement(),
            TokenKind::Delete => self.delete_statement(),
            TokenKind::Insert => self.insert_statement(),
            TokenKind::Lock => self.take(),
            _ => Err(self.error(format!(
                "unrecognized leading keyword {}",
                self.current().describe()
            ))),
        }
    }

    fn select_statement(&mut self) -> Result<()> {
        loop {
            if !self.take_if(|k| k == TokenKind::Select)? {
                return Err(self.error(format!(
                    "expected SELECT, found {}",
                    self.current().describe()
                )));
            }
            self.take_if(|k| k == TokenKind::From)?;
            self.take_while(|k| k.is_join_start() || k.is_line_group_start())?;
            self.take_if(|k| k == TokenKind::Where)?;
            self.take_while(TokenKind::is_line_group_start)?;
            self.take_if(|k| k == TokenKind::Group)?;
            self.take_if(|k| k == TokenKind::Having)?;
            self.take_if(|k| k == TokenKind::Order)?;
            self.take_while(TokenKind::is_limit_clause_start)?;

            if !self.peek().is_tie_clause_start() {
                return Ok(());
            }
            let tie_pos = self.pos;
            self.take()?;
            if self.peek() == TokenKind::Select {
                continue;
            }
            let holds_query = self
                .groups
                .last()
                .is_some_and(|g| g.elements.iter().any(|e| e.as_group().is_some()));
            if !holds_query {
                return Err(SqlfmtError::parsing(
                    self.base + tie_pos,
                    format!("{} must be followed by a query", self.tokens[tie_pos].describe()),
                ));
            }
            return Ok(());
        }
    }

    fn update_statement(&mut self) -> Result<()> {
        self.take()?;
        self.require_operand()?;
        self.take_if(|k| k == TokenKind::Set)?;
        self.take_if(|k| k == TokenKind::From)?;
        self.take_while(TokenKind::is_join_start)?;
        self.filter_and_returning()
    }

    fn delete_statement(&mut self) -> Result<()> {
        self.take()?;
        if !self.take_if(|k| k == TokenKind::From)? {
            self.require_operand()?;
        }
        self.filter_and_returning()
    }

    fn insert_statement(&mut self) -> Result<()> {
        self.take()?;
        self.take_if(|k| k == TokenKind::Values)?;
        if self.peek() == TokenKind::Select {
            return self.select_statement();
        }
        // ON CONFLICT ... DO UPDATE SET ...
        self.take_if(|k| k == TokenKind::Update)?;
        self.take_if(|k| k == TokenKind::Set)?;
        self.filter_and_returning()
    }

    fn filter_and_returning(&mut self) -> Result<()> {
        self.take_if(|k| k == TokenKind::Where)?;
        self.take_while(TokenKind::is_line_group_start)?;
        self.take_if(|k| k == TokenKind::Returning)?;
        Ok(())
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> TokenKind {
        self.current().kind
    }

    /// Retrieve the group opened by the current token.
    fn take(&mut self) -> Result<()> {
        let Some(retriever) = Retriever::new(&self.tokens[self.pos..], self.base + self.pos, 0)
        else {
            return Err(self.error(format!(
                "{} does not start a clause",
                self.current().describe()
            )));
        };
        let (group, consumed) = retriever.retrieve()?;
        self.groups.push(group);
        self.pos += consumed;
        Ok(())
    }

    fn take_if(&mut self, accept: impl Fn(TokenKind) -> bool) -> Result<bool> {
        if !accept(self.peek()) {
            return Ok(false);
        }
        self.take()?;
        Ok(true)
    }

    fn take_while(&mut self, accept: impl Fn(TokenKind) -> bool) -> Result<()> {
        while self.take_if(&accept)? {}
        Ok(())
    }

    /// The statement's leading clause must hold more than its keyword.
    /// `DO UPDATE SET` in an insert is exempt, so the check lives here rather
    /// than in the retriever.
    fn require_operand(&self) -> Result<()> {
        match self.groups.last() {
            Some(group) if group.elements.len() <= 1 => {
                let keyword = group
                    .elements
                    .first()
                    .and_then(Element::as_token)
                    .map(Token::describe)
                    .unwrap_or_default();
                Err(self.error(format!("{} is missing its operand", keyword)))
            }
            _ => Ok(()),
        }
    }

    fn error(&self, message: String) -> SqlfmtError {
        SqlfmtError::parsing(self.base + self.pos, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::group::GroupKind;
    use crate::lexer::Lexer;

    fn lex(src: &str) -> Vec<Token> {
        let dialect = Dialect::builtin();
        Lexer::new(&dialect).tokenize(src).unwrap()
    }

    fn kinds(src: &str) -> Vec<GroupKind> {
        parse_tokens(&lex(src))
            .unwrap()
            .iter()
            .map(|g| g.kind)
            .collect()
    }

    #[test]
    fn test_select_clauses() {
        use GroupKind::*;
        assert_eq!(
            kinds("select a from t left join u on t.id = u.id where x = 1\nand y = 2 group by a having count(a) > 1 order by a limit 10 offset 5"),
            vec![Select, From, Join, Where, AndGroup, GroupBy, Having, OrderBy, LimitClause]
        );
    }

    #[test]
    fn test_union_chains_selects() {
        use GroupKind::*;
        assert_eq!(
            kinds("select a from t union all select b from u"),
            vec![Select, From, TieClause, Select, From]
        );
    }

    #[test]
    fn test_union_with_parenthesized_query() {
        use GroupKind::*;
        assert_eq!(
            kinds("select a from t union (select b from u)"),
            vec![Select, From, TieClause]
        );
        assert!(parse_tokens(&lex("select a from t union all")).is_err());
    }

    #[test]
    fn test_update_statement() {
        use GroupKind::*;
        assert_eq!(
            kinds("update x set a = $1, b = $2 where id = $3 returning id"),
            vec![Update, Set, Where, Returning]
        );
    }

    #[test]
    fn test_delete_statement() {
        use GroupKind::*;
        assert_eq!(
            kinds("delete from t where a = 1\nor b = 2"),
            vec![Delete, From, Where, OrGroup]
        );
    }

    #[test]
    fn test_insert_statements() {
        use GroupKind::*;
        assert_eq!(
            kinds("insert into t (a, b) values (1, 2)"),
            vec![Insert, Values]
        );
        assert_eq!(
            kinds("insert into t select a from u"),
            vec![Insert, Select, From]
        );
        assert_eq!(
            kinds("insert into t (id) values (1) on conflict (id) do update set a = 2 returning id"),
            vec![Insert, Values, Update, Set, Returning]
        );
    }

    #[test]
    fn test_lock_and_with() {
        use GroupKind::*;
        assert_eq!(kinds("lock table in xxx"), vec![Lock]);
        assert_eq!(
            kinds("with x as (select 1) select a from x"),
            vec![With, Select, From]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_tokens(&lex("")).unwrap().is_empty());
        assert!(parse_statements(&lex("  ")).unwrap().is_empty());
    }

    #[test]
    fn test_parse_errors() {
        let cases = [
            "select a from",
            "foo bar",
            "select a from t where",
            "select a from t )",
            "where a = 1",
        ];
        for src in cases {
            let err = parse_tokens(&lex(src)).unwrap_err();
            assert!(matches!(err, SqlfmtError::Parsing { .. }), "{src}");
        }
    }

    #[test]
    fn test_leftover_reports_position() {
        let err = parse_tokens(&lex("select a from t )")).unwrap_err();
        assert!(matches!(err, SqlfmtError::Parsing { position: 4, .. }));
    }

    #[test]
    fn test_statements_split_on_semicolon() {
        let statements = parse_statements(&lex("select 1; select 2;")).unwrap();
        assert_eq!(statements.len(), 2);
        assert!(statements.iter().all(|s| s.terminator.is_some()));

        let statements = parse_statements(&lex("select 1; select 2")).unwrap();
        assert_eq!(statements.len(), 2);
        assert!(statements[1].terminator.is_none());
    }

    #[test]
    fn test_empty_statement_is_error() {
        let err = parse_statements(&lex("select 1;; select 2")).unwrap_err();
        assert!(matches!(err, SqlfmtError::Parsing { position: 3, .. }));
    }

    #[test]
    fn test_unbalanced_brackets() {
        let err = parse_tokens(&lex("select [1")).unwrap_err();
        assert!(matches!(err, SqlfmtError::Parsing { position: 1, .. }), "{err}");

        let err = parse_tokens(&lex("select a]")).unwrap_err();
        assert!(matches!(err, SqlfmtError::Parsing { position: 2, .. }), "{err}");

        let err = parse_tokens(&lex("select {")).unwrap_err();
        assert!(matches!(err, SqlfmtError::Parsing { position: 1, .. }), "{err}");

        let err = parse_statements(&lex("select 1; select a[1 from t")).unwrap_err();
        assert!(matches!(err, SqlfmtError::Parsing { position: 5, .. }), "{err}");

        assert!(parse_tokens(&lex("select a[1], '{1}'::int[] from t")).is_ok());
    }

    #[test]
    fn test_bare_update_and_delete_are_errors() {
        for src in ["update", "delete", "update where a = 1"] {
            let err = parse_tokens(&lex(src)).unwrap_err();
            assert!(matches!(err, SqlfmtError::Parsing { position: 1, .. }), "{src}: {err}");
        }
        assert!(parse_tokens(&lex("delete from t")).is_ok());
    }

    #[test]
    fn test_missing_eof_is_error() {
        assert!(matches!(
            parse_tokens(&[]),
            Err(SqlfmtError::Parsing { position: 0, .. })
        ));
        let mut tokens = lex("select 1");
        tokens.pop();
        assert!(parse_tokens(&tokens).is_err());
        assert!(parse_statements(&tokens).is_err());
    }

    #[test]
    fn test_statement_errors_use_absolute_positions() {
        let err = parse_statements(&lex("select 1; select a from")).unwrap_err();
        assert!(matches!(err, SqlfmtError::Parsing { position: 6, .. }));
    }
}
