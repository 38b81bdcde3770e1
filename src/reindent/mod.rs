//! Layout of a group tree as text.
//!
//! Every [`GroupKind`] has one layout. Layouts write into a shared
//! [`Writer`] and recurse into child groups with a [`Placement`] describing
//! where the child sits in its parent.

mod clause;
mod columns;
mod expression;
mod writer;

use tracing::debug;

use crate::error::{Result, SqlfmtError};
use crate::group::{Group, GroupKind};
use crate::options::FormatOptions;
use crate::parser::Statement;

use self::writer::Writer;

/// Where a group sits inside its parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Placement {
    /// Index of the column this group belongs to when the parent is a column
    /// list; `None` outside column lists.
    pub column: Option<usize>,
    /// The group directly follows a column-separating comma.
    pub after_comma: bool,
    /// Extra indent levels inherited from subqueries laid out as columns.
    pub bonus: usize,
}

impl Placement {
    /// Placement for a child that is not a column of this group.
    fn child(self) -> Placement {
        Placement {
            bonus: self.bonus,
            ..Placement::default()
        }
    }
}

/// Lay out parsed statements. Each statement starts on a new line; a
/// terminating `;` stays on the statement's last line.
pub fn reindent(statements: &[Statement], options: &FormatOptions) -> Result<String> {
    let mut writer = Writer::new(options);
    for statement in statements {
        for group in &statement.groups {
            write_group(&mut writer, group, Placement::default())?;
        }
        if let Some(terminator) = &statement.terminator {
            writer.tight(terminator)?;
        }
    }
    let out = writer.finish();
    debug!(statements = statements.len(), bytes = out.len(), "reindented");
    Ok(out)
}

/// Lay out top-level groups of a single statement.
pub fn reindent_groups(groups: &[Group], options: &FormatOptions) -> Result<String> {
    let mut writer = Writer::new(options);
    for group in groups {
        write_group(&mut writer, group, Placement::default())?;
    }
    Ok(writer.finish())
}

fn write_group(w: &mut Writer, group: &Group, place: Placement) -> Result<()> {
    if group.elements.is_empty() {
        return Err(SqlfmtError::Build(format!("empty {:?} group", group.kind)));
    }
    let indent = group.indent_level + place.bonus;
    match group.kind {
        GroupKind::Select
        | GroupKind::Update
        | GroupKind::Set
        | GroupKind::OrderBy
        | GroupKind::GroupBy
        | GroupKind::Returning => columns::write(w, group, indent, place),
        GroupKind::Case => expression::write_case(w, group, indent, place),
        GroupKind::Function | GroupKind::TypeCast => {
            expression::write_call(w, group, indent, place)
        }
        GroupKind::Parenthesis => expression::write_parenthesis(w, group, indent, place),
        GroupKind::Subquery => expression::write_subquery(w, group, indent, place),
        GroupKind::Lock => clause::write_lock(w, group, indent, place),
        GroupKind::From
        | GroupKind::Join
        | GroupKind::Where
        | GroupKind::AndGroup
        | GroupKind::OrGroup
        | GroupKind::Having
        | GroupKind::LimitClause
        | GroupKind::TieClause
        | GroupKind::Delete
        | GroupKind::Insert
        | GroupKind::Values
        | GroupKind::With => clause::write(w, group, indent, place),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::Dialect;
    use crate::lexer::Lexer;
    use crate::options::CommaStyle;
    use crate::parser::parse_statements;
    use crate::token::{Token, TokenKind};
    use pretty_assertions::assert_eq;

    fn layout(src: &str, options: &FormatOptions) -> String {
        let dialect = Dialect::builtin();
        let tokens = Lexer::new(&dialect).tokenize(src).unwrap();
        let statements = parse_statements(&tokens).unwrap();
        reindent(&statements, options).unwrap()
    }

    fn fmt(src: &str) -> String {
        layout(src, &FormatOptions::default())
    }

    #[test]
    fn test_select_columns() {
        assert_eq!(
            fmt("select name, age from user"),
            "\nSELECT\n  name\n  , age\nFROM user"
        );
    }

    #[test]
    fn test_right_commas() {
        let options = FormatOptions::default().with_comma_style(CommaStyle::Right);
        assert_eq!(
            layout("select a, b from t", &options),
            "\nSELECT\n  a,\n  b\nFROM t"
        );
    }

    #[test]
    fn test_function_column() {
        assert_eq!(fmt("select sum(x) from t"), "\nSELECT\n  SUM(x)\nFROM t");
        assert_eq!(
            fmt("select a, coalesce(b, c) as d from t"),
            "\nSELECT\n  a\n  , COALESCE(b, c) AS d\nFROM t"
        );
    }

    #[test]
    fn test_case_after_comma() {
        assert_eq!(
            fmt("select a, case when b is null then 1 else 2 end as c from t"),
            "\nSELECT\n  a\n  , CASE\n      WHEN b IS NULL THEN 1\n      ELSE 2\n    END AS c\nFROM t"
        );
    }

    #[test]
    fn test_case_first_column() {
        assert_eq!(
            fmt("select case foo when 4 then 'A' else 'C' end from baz"),
            "\nSELECT\n  CASE foo\n     WHEN 4 THEN 'A'\n     ELSE 'C'\n  END\nFROM baz"
        );
    }

    #[test]
    fn test_exists_subquery() {
        assert_eq!(
            fmt("select foo from baz where exists (select 1 from quz)"),
            "\nSELECT\n  foo\nFROM baz\nWHERE EXISTS (\n  SELECT\n    1\n  FROM quz\n)"
        );
    }

    #[test]
    fn test_subquery_column_is_indented() {
        assert_eq!(
            fmt("select foo, array (select bar from quz) from baz"),
            "\nSELECT\n  foo\n  , array (\n    SELECT\n      bar\n    FROM quz\n  )\nFROM baz"
        );
    }

    #[test]
    fn test_join_subquery() {
        assert_eq!(
            fmt("select a from t left outer join (select b from u) as x on a = b"),
            "\nSELECT\n  a\nFROM t\nLEFT OUTER JOIN (\n  SELECT\n    b\n  FROM u\n) AS x\nON a = b"
        );
    }

    #[test]
    fn test_brackets_do_not_split_columns() {
        assert_eq!(
            fmt("select array[1, 2], '{1,2,3}'::int[] from t"),
            "\nSELECT\n  array [1, 2]\n  , '{1,2,3}'::int []\nFROM t"
        );
    }

    #[test]
    fn test_window_function() {
        assert_eq!(
            fmt("select foo, row_number() over(range unbounded preceding) from baz"),
            "\nSELECT\n  foo\n  , ROW_NUMBER() OVER(range UNBOUNDED PRECEDING)\nFROM baz"
        );
    }

    #[test]
    fn test_update_layout() {
        assert_eq!(
            fmt("update x set a = $1, b = $2 where id = $3"),
            "\nUPDATE\n  x\nSET\n  a = $1\n  , b = $2\nWHERE id = $3"
        );
    }

    #[test]
    fn test_order_by_and_limits() {
        assert_eq!(
            fmt("select a from t order by a desc, b limit 7 offset 42"),
            "\nSELECT\n  a\nFROM t\nORDER BY\n  a DESC\n  , b\nLIMIT 7\nOFFSET 42"
        );
    }

    #[test]
    fn test_line_groups() {
        assert_eq!(
            fmt("select a from t where x = 1\nand y = 2\nor z = 3"),
            "\nSELECT\n  a\nFROM t\nWHERE x = 1\nAND y = 2\nOR z = 3"
        );
    }

    #[test]
    fn test_union_all() {
        assert_eq!(
            fmt("select a from t union all select b from u"),
            "\nSELECT\n  a\nFROM t\nUNION ALL\nSELECT\n  b\nFROM u"
        );
    }

    #[test]
    fn test_lock() {
        assert_eq!(fmt("lock table in xxx"), "\nLOCK table\nIN xxx");
    }

    #[test]
    fn test_insert_on_conflict() {
        assert_eq!(
            fmt("insert into t (a, b) values (1, 2) on conflict (a) do update set b = 3"),
            "\nINSERT INTO t (a, b)\nVALUES (1, 2)\nON CONFLICT (a)\nDO\nUPDATE\nSET\n  b = 3"
        );
    }

    #[test]
    fn test_statements_keep_terminators() {
        assert_eq!(
            fmt("select 1; select 2;"),
            "\nSELECT\n  1;\nSELECT\n  2;"
        );
    }

    #[test]
    fn test_lower_cased_layout() {
        let options = FormatOptions::default().with_lower_cased(true);
        assert_eq!(
            layout("SELECT Sum(X) FROM T", &options),
            "\nselect\n  sum(X)\nfrom T"
        );
    }

    #[test]
    fn test_empty_group_is_build_error() {
        let groups = vec![Group::new(GroupKind::Where, Vec::new(), 0)];
        let err = reindent_groups(&groups, &FormatOptions::default()).unwrap_err();
        assert!(matches!(err, SqlfmtError::Build(_)));
    }

    #[test]
    fn test_hand_built_tree() {
        let group = Group::from_tokens(
            GroupKind::From,
            vec![Token::new(TokenKind::From, "FROM"), Token::new(TokenKind::Ident, "t")],
            0,
        );
        assert_eq!(
            reindent_groups(&[group], &FormatOptions::default()).unwrap(),
            "\nFROM t"
        );
    }
}
