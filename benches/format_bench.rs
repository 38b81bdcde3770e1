use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sqlfmt::lexer::Lexer;
use sqlfmt::parser::parse_statements;
use sqlfmt::{format_string, Dialect, FormatOptions};

const SENTINEL: &str = ")))))__SQLFMT_OUTPUT__(((((";

fn load_test_file(name: &str) -> String {
    let path = format!("{}/tests/data/{}", env!("CARGO_MANIFEST_DIR"), name);
    let content =
        std::fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path, e));
    // Golden test files use a sentinel to separate input/expected; take only input
    match content.split_once(SENTINEL) {
        Some((source, _)) => source.to_string(),
        None => content,
    }
}

fn large_query() -> String {
    let columns: Vec<String> = (0..200)
        .map(|i| format!("coalesce(c_{i}, 0) + {i} as a_{i}"))
        .collect();
    format!(
        "select {} from t left outer join (select id from u where x = 1) as s on t.id = s.id \
         where exists (select 1 from v where v.id = t.id) order by a_1 desc",
        columns.join(", ")
    )
}

fn bench_format_small(c: &mut Criterion) {
    let sql = "select a, b, c from my_table where x = 1 and y > 2 order by a";
    let options = FormatOptions::default();
    c.bench_function("format_small", |b| {
        b.iter(|| format_string(black_box(sql), black_box(&options)).unwrap())
    });
}

fn bench_format_medium(c: &mut Criterion) {
    let sql = load_test_file("003_subqueries.sql");
    let options = FormatOptions::default();
    c.bench_function("format_medium", |b| {
        b.iter(|| format_string(black_box(&sql), black_box(&options)).unwrap())
    });
}

fn bench_format_large(c: &mut Criterion) {
    let sql = large_query();
    let options = FormatOptions::default();
    c.bench_function("format_large", |b| {
        b.iter(|| format_string(black_box(&sql), black_box(&options)).unwrap())
    });
}

fn bench_lex_only(c: &mut Criterion) {
    let sql = large_query();
    let dialect = Dialect::builtin();
    c.bench_function("lex_only", |b| {
        b.iter(|| Lexer::new(&dialect).tokenize(black_box(&sql)).unwrap())
    });
}

fn bench_parse_only(c: &mut Criterion) {
    let sql = large_query();
    let dialect = Dialect::builtin();
    let tokens = Lexer::new(&dialect).tokenize(&sql).unwrap();
    c.bench_function("parse_only", |b| {
        b.iter(|| parse_statements(black_box(&tokens)).unwrap())
    });
}

criterion_group!(
    benches,
    bench_format_small,
    bench_format_medium,
    bench_format_large,
    bench_lex_only,
    bench_parse_only
);
criterion_main!(benches);
