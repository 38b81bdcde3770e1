//! The built-in PostgreSQL vocabulary, registered into every dialect.

use crate::dialect::Registry;

pub const NAME: &str = "postgresql";

pub const OPERATORS: &[&str] = &[
    "+", "-", "*", "/", "%", "^", "=", "<>", "!=", "<", ">", "<=", ">=", "||", "::", ":=", "=>",
    "@>", "<@", "->", "->>", "#>", "#>>", "#-", "&&", "@", "!", "!!", "~", "~*", "!~", "!~*",
    "~~", "~~*", "!~~", "!~~*", "|/", "||/", "<<", ">>", "&", "|", "#", "?", "?|", "?&", "-|-",
    "@@", "@@@", "<->", "&<", "&>", "<<|", "|>>", "&<|", "|&>", "<^", ">^", "?#", "?-", "?-|",
    "?||", "~=", "<<=", ">>=",
];

pub const TYPES: &[&str] = &[
    "BIGINT",
    "BIGSERIAL",
    "BIT",
    "BOOL",
    "BOOLEAN",
    "BOX",
    "BYTEA",
    "CHAR",
    "CHARACTER",
    "CIDR",
    "CIRCLE",
    "DATE",
    "DEC",
    "DECIMAL",
    "FLOAT",
    "FLOAT4",
    "FLOAT8",
    "INET",
    "INT",
    "INT2",
    "INT4",
    "INT8",
    "INTEGER",
    "INTERVAL",
    "JSON",
    "JSONB",
    "LINE",
    "LSEG",
    "MACADDR",
    "MONEY",
    "NUMERIC",
    "PATH",
    "POINT",
    "POLYGON",
    "REAL",
    "SECOND",
    "SERIAL",
    "SMALLINT",
    "SMALLSERIAL",
    "TEXT",
    "TIMESTAMP",
    "TIMESTAMPTZ",
    "TIMETZ",
    "TSQUERY",
    "TSVECTOR",
    "UUID",
    "VARBIT",
    "VARCHAR",
    "XML",
];

pub const FUNCTIONS: &[&str] = &[
    "ABS",
    "ARRAY_AGG",
    "AVG",
    "CAST",
    "CEIL",
    "COALESCE",
    "CONCAT",
    "COUNT",
    "DATE_PART",
    "DATE_TRUNC",
    "DENSE_RANK",
    "EXTRACT",
    "FIRST_VALUE",
    "FLOOR",
    "GENERATE_SERIES",
    "GREATEST",
    "JSON_AGG",
    "JSONB_AGG",
    "JSONB_BUILD_OBJECT",
    "JSON_BUILD_OBJECT",
    "LAG",
    "LAST_VALUE",
    "LEAD",
    "LEAST",
    "LENGTH",
    "LOWER",
    "MAX",
    "MIN",
    "NOW",
    "NULLIF",
    "OVER",
    "OVERLAY",
    "PERCENTILE_CONT",
    "PERCENTILE_DISC",
    "POSITION",
    "RANDOM",
    "RANK",
    "REPLACE",
    "ROUND",
    "ROW_NUMBER",
    "SPLIT_PART",
    "STRING_AGG",
    "SUBSTRING",
    "SUM",
    "TO_CHAR",
    "TO_DATE",
    "TO_TIMESTAMP",
    "TRIM",
    "UNNEST",
    "UPPER",
    "XMLCONCAT",
    "XMLELEMENT",
    "XMLFOREST",
];

pub const RESERVED_VALUES: &[&str] = &[
    "TRUE",
    "FALSE",
    "INFINITY",
    "NAN",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "CURRENT_TIMESTAMP",
    "CURRENT_USER",
    "LOCALTIME",
    "LOCALTIMESTAMP",
    "SESSION_USER",
];

/// Prefixes glued to a following string literal, as in `E'\n'` or `U&'d\0061t'`.
pub const LITERAL_PREFIXES: &[&str] = &["B", "E", "N", "X", "U&"];

pub fn registry() -> Registry {
    Registry::new(NAME)
        .with_operators(OPERATORS)
        .with_types(TYPES)
        .with_functions(FUNCTIONS)
        .with_reserved_values(RESERVED_VALUES)
        .with_literal_prefixes(LITERAL_PREFIXES)
}
