//! Built-in word tables.
//!
//! Keywords are fixed and looked up through a compile-time map. Types,
//! functions, reserved values, operators and literal prefixes live in
//! [`Registry`](crate::dialect::Registry) values so dialects can extend them.

pub mod postgis;
pub mod postgres;

use phf::phf_map;

use crate::token::TokenKind;

/// Keyword spellings (uppercase) and the kind they lex to.
pub static KEYWORDS: phf::Map<&'static str, TokenKind> = phf_map! {
    "ALL" => TokenKind::All,
    "AND" => TokenKind::And,
    "ANY" => TokenKind::Any,
    "AS" => TokenKind::As,
    "ASC" => TokenKind::Asc,
    "AT" => TokenKind::At,
    "BETWEEN" => TokenKind::Between,
    "BY" => TokenKind::By,
    "CASE" => TokenKind::Case,
    "COLLATE" => TokenKind::Collate,
    "CONFLICT" => TokenKind::Conflict,
    "CONTENT" => TokenKind::Content,
    "CROSS" => TokenKind::Cross,
    "DELETE" => TokenKind::Delete,
    "DESC" => TokenKind::Desc,
    "DISTINCT" => TokenKind::Distinct,
    "DISTINCTROW" => TokenKind::DistinctRow,
    "DO" => TokenKind::Do,
    "DOCUMENT" => TokenKind::Document,
    "DOUBLE" => TokenKind::Double,
    "ELSE" => TokenKind::Else,
    "END" => TokenKind::End,
    "ESCAPE" => TokenKind::Escape,
    "EXCEPT" => TokenKind::Except,
    "EXISTS" => TokenKind::Exists,
    "FETCH" => TokenKind::Fetch,
    "FILTER" => TokenKind::Filter,
    "FIRST" => TokenKind::First,
    "FOLLOWING" => TokenKind::Following,
    "FOR" => TokenKind::For,
    "FROM" => TokenKind::From,
    "FULL" => TokenKind::Full,
    "GROUP" => TokenKind::Group,
    "HAVING" => TokenKind::Having,
    "ILIKE" => TokenKind::Like,
    "IN" => TokenKind::In,
    "INNER" => TokenKind::Inner,
    "INSERT" => TokenKind::Insert,
    "INTERSECT" => TokenKind::Intersect,
    "INTO" => TokenKind::Into,
    "IS" => TokenKind::Is,
    "JOIN" => TokenKind::Join,
    "LAST" => TokenKind::Last,
    "LATERAL" => TokenKind::Lateral,
    "LEFT" => TokenKind::Left,
    "LIKE" => TokenKind::Like,
    "LIMIT" => TokenKind::Limit,
    "LOCK" => TokenKind::Lock,
    "NATURAL" => TokenKind::Natural,
    "NOT" => TokenKind::Not,
    "NULL" => TokenKind::Null,
    "NULLS" => TokenKind::Nulls,
    "OFFSET" => TokenKind::Offset,
    "ON" => TokenKind::On,
    "OR" => TokenKind::Or,
    "ORDER" => TokenKind::Order,
    "ORDINALITY" => TokenKind::Ordinality,
    "OUTER" => TokenKind::Outer,
    "OVERLAPS" => TokenKind::Overlaps,
    "PASSING" => TokenKind::Passing,
    "PRECEDING" => TokenKind::Preceding,
    "PRECISION" => TokenKind::Precision,
    "REF" => TokenKind::Ref,
    "RETURNING" => TokenKind::Returning,
    "RIGHT" => TokenKind::Right,
    "ROW" => TokenKind::Row,
    "ROWS" => TokenKind::Rows,
    "SELECT" => TokenKind::Select,
    "SET" => TokenKind::Set,
    "SIMILAR" => TokenKind::Similar,
    "SOME" => TokenKind::Some,
    "THEN" => TokenKind::Then,
    "TIME" => TokenKind::Time,
    "TO" => TokenKind::To,
    "UNBOUNDED" => TokenKind::Unbounded,
    "UNION" => TokenKind::Union,
    "UNKNOWN" => TokenKind::Null,
    "UPDATE" => TokenKind::Update,
    "USING" => TokenKind::Using,
    "VALUES" => TokenKind::Values,
    "VARYING" => TokenKind::Varying,
    "WHEN" => TokenKind::When,
    "WHERE" => TokenKind::Where,
    "WINDOW" => TokenKind::Window,
    "WITH" => TokenKind::With,
    "WITHIN" => TokenKind::Within,
    "XMLNAMESPACES" => TokenKind::XmlNamespaces,
    "ZONE" => TokenKind::Zone,
};

/// Word sequences that lex as a single TYPE token.
pub static COMPOUND_TYPES: &[&[&str]] = &[
    &["TIMESTAMP", "WITHOUT", "TIME", "ZONE"],
    &["TIMESTAMP", "WITH", "TIME", "ZONE"],
    &["TIME", "WITHOUT", "TIME", "ZONE"],
    &["TIME", "WITH", "TIME", "ZONE"],
    &["DOUBLE", "PRECISION"],
    &["CHARACTER", "VARYING"],
    &["BIT", "VARYING"],
];

/// Canonical spelling for reserved values that are not plain uppercase.
pub fn canonical_reserved_value(upper: &str) -> Option<&'static str> {
    match upper {
        "NAN" => Some("NaN"),
        "INFINITY" => Some("Infinity"),
        "-INFINITY" => Some("-Infinity"),
        _ => None,
    }
}

pub fn keyword_kind(upper: &str) -> Option<TokenKind> {
    KEYWORDS.get(upper).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_aliases() {
        assert_eq!(keyword_kind("ILIKE"), Some(TokenKind::Like));
        assert_eq!(keyword_kind("UNKNOWN"), Some(TokenKind::Null));
        assert_eq!(keyword_kind("SELECT"), Some(TokenKind::Select));
        assert_eq!(keyword_kind("select"), None);
    }

    #[test]
    fn test_table_is_not_a_keyword() {
        assert_eq!(keyword_kind("TABLE"), None);
    }

    #[test]
    fn test_compound_types_longest_first() {
        // A shorter sequence must never shadow a longer one sharing its head.
        for (i, seq) in COMPOUND_TYPES.iter().enumerate() {
            for later in &COMPOUND_TYPES[i + 1..] {
                if later.len() > seq.len() {
                    assert_ne!(&later[..seq.len()], *seq);
                }
            }
        }
    }

    #[test]
    fn test_canonical_reserved_values() {
        assert_eq!(canonical_reserved_value("NAN"), Some("NaN"));
        assert_eq!(canonical_reserved_value("INFINITY"), Some("Infinity"));
        assert_eq!(canonical_reserved_value("TRUE"), None);
    }
}
