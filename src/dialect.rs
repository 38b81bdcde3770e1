use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, LazyLock};

use parking_lot::Mutex;
use serde::Deserialize;
use tracing::debug;

use crate::error::SqlfmtError;
use crate::token::TokenKind;
use crate::vocabulary::{postgis, postgres};

/// A named bundle of vocabulary that extends the built-in tables.
///
/// Words are matched case-insensitively. Function names keep the spelling
/// given here, so `ST_MakePoint` is emitted exactly like that.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Registry {
    pub name: String,
    pub operators: Vec<String>,
    pub types: Vec<String>,
    pub functions: Vec<String>,
    pub reserved_values: Vec<String>,
    pub literal_prefixes: Vec<String>,
}

impl Registry {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_operators(mut self, operators: &[&str]) -> Self {
        self.operators.extend(operators.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_types(mut self, types: &[&str]) -> Self {
        self.types.extend(types.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_functions(mut self, functions: &[&str]) -> Self {
        self.functions.extend(functions.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_reserved_values(mut self, values: &[&str]) -> Self {
        self.reserved_values
            .extend(values.iter().map(|s| s.to_string()));
        self
    }

    pub fn with_literal_prefixes(mut self, prefixes: &[&str]) -> Self {
        self.literal_prefixes
            .extend(prefixes.iter().map(|s| s.to_string()));
        self
    }
}

/// Look up one of the registries shipped with the crate.
pub fn registry_from_name(name: &str) -> Result<Registry, SqlfmtError> {
    match name.to_ascii_lowercase().as_str() {
        "postgresql" | "postgres" => Ok(postgres::registry()),
        "postgis" => Ok(postgis::registry()),
        _ => Err(SqlfmtError::Config(format!("Unknown dialect: {}", name))),
    }
}

/// Immutable vocabulary consulted by the lexer.
///
/// Built once and shared behind an `Arc`; reads never lock.
#[derive(Debug)]
pub struct Dialect {
    names: Vec<String>,
    words: HashMap<String, TokenKind>,
    function_spellings: HashMap<String, String>,
    operators: HashSet<String>,
    operator_prefixes: HashSet<String>,
    max_operator_chars: usize,
    literal_prefixes: Vec<String>,
}

static BUILTIN: LazyLock<Arc<Dialect>> = LazyLock::new(|| {
    debug!("registering built-in vocabulary");
    Arc::new(DialectBuilder::new().build())
});

/// Extended dialects kept alive at once. The oldest is dropped past this.
const EXTENDED_CAPACITY: usize = 64;

static EXTENDED: LazyLock<Mutex<DialectCache>> =
    LazyLock::new(|| Mutex::new(DialectCache::new(EXTENDED_CAPACITY)));

/// Built dialects keyed by the full registry lists they were built from.
struct DialectCache {
    entries: HashMap<Vec<Registry>, Arc<Dialect>>,
    /// Keys in insertion order, oldest first.
    order: VecDeque<Vec<Registry>>,
    capacity: usize,
}

impl DialectCache {
    fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            capacity: capacity.max(1),
        }
    }

    fn get_or_build(&mut self, registries: &[Registry]) -> Arc<Dialect> {
        if let Some(dialect) = self.entries.get(registries) {
            return Arc::clone(dialect);
        }
        let mut builder = DialectBuilder::new();
        for registry in registries {
            builder.register(registry);
        }
        let dialect = Arc::new(builder.build());

        if self.entries.len() >= self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
        let key = registries.to_vec();
        self.order.push_back(key.clone());
        self.entries.insert(key, Arc::clone(&dialect));
        dialect
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

impl Dialect {
    /// The built-in vocabulary alone.
    pub fn builtin() -> Arc<Dialect> {
        Arc::clone(&BUILTIN)
    }

    /// The built-in vocabulary extended with `registries`.
    ///
    /// Each distinct registry list is built once; later calls with equal
    /// registries share the cached result while it stays in the cache.
    pub fn with_registries(registries: &[Registry]) -> Arc<Dialect> {
        if registries.is_empty() {
            return Self::builtin();
        }
        EXTENDED.lock().get_or_build(registries)
    }

    /// Names of the registries folded into this dialect, built-in first.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Kind of a non-keyword word (TYPE, FUNCTION or RESERVEDVALUE).
    pub fn word_kind(&self, upper: &str) -> Option<TokenKind> {
        self.words.get(upper).copied()
    }

    /// Registered spelling of a function name.
    pub fn function_spelling(&self, upper: &str) -> Option<&str> {
        self.function_spellings.get(upper).map(String::as_str)
    }

    pub fn is_operator(&self, candidate: &str) -> bool {
        self.operators.contains(candidate)
    }

    /// Whether some registered operator starts with `candidate`.
    pub fn is_operator_prefix(&self, candidate: &str) -> bool {
        self.operator_prefixes.contains(candidate)
    }

    /// Length in characters of the longest registered operator.
    pub fn max_operator_chars(&self) -> usize {
        self.max_operator_chars
    }

    /// Uppercased literal prefixes, longest first.
    pub fn literal_prefixes(&self) -> &[String] {
        &self.literal_prefixes
    }

}

/// Accumulates registries before freezing them into a [`Dialect`].
pub struct DialectBuilder {
    names: Vec<String>,
    words: HashMap<String, TokenKind>,
    function_spellings: HashMap<String, String>,
    operators: HashSet<String>,
    literal_prefixes: Vec<String>,
}

impl DialectBuilder {
    /// A builder already holding the built-in PostgreSQL vocabulary.
    pub fn new() -> Self {
        let mut builder = Self {
            names: Vec::new(),
            words: HashMap::new(),
            function_spellings: HashMap::new(),
            operators: HashSet::new(),
            literal_prefixes: Vec::new(),
        };
        builder.register(&postgres::registry());
        builder
    }

    /// Fold a registry in. A name that is already registered is skipped.
    pub fn register(&mut self, registry: &Registry) -> &mut Self {
        let name = registry.name.to_ascii_lowercase();
        if self.names.contains(&name) {
            debug!(registry = %name, "registry already registered, skipping");
            return self;
        }

        for ty in &registry.types {
            self.words.insert(ty.to_uppercase(), TokenKind::Type);
        }
        for function in &registry.functions {
            let upper = function.to_uppercase();
            self.words.insert(upper.clone(), TokenKind::Function);
            self.function_spellings.insert(upper, function.clone());
        }
        for value in &registry.reserved_values {
            self.words
                .insert(value.to_uppercase(), TokenKind::ReservedValue);
        }
        for op in &registry.operators {
            if !op.is_empty() {
                self.operators.insert(op.clone());
            }
        }
        for prefix in &registry.literal_prefixes {
            let upper = prefix.to_uppercase();
            if !upper.is_empty() && !self.literal_prefixes.contains(&upper) {
                self.literal_prefixes.push(upper);
            }
        }

        debug!(
            registry = %name,
            types = registry.types.len(),
            functions = registry.functions.len(),
            operators = registry.operators.len(),
            "registered vocabulary"
        );
        self.names.push(name);
        self
    }

    pub fn build(self) -> Dialect {
        let mut operator_prefixes = HashSet::new();
        let mut max_operator_chars = 0;
        for op in &self.operators {
            let mut end = 0;
            for (count, ch) in op.chars().enumerate() {
                end += ch.len_utf8();
                operator_prefixes.insert(op[..end].to_string());
                max_operator_chars = max_operator_chars.max(count + 1);
            }
        }

        let mut literal_prefixes = self.literal_prefixes;
        literal_prefixes.sort_by_key(|p| std::cmp::Reverse(p.chars().count()));

        Dialect {
            names: self.names,
            words: self.words,
            function_spellings: self.function_spellings,
            operators: self.operators,
            operator_prefixes,
            max_operator_chars,
            literal_prefixes,
        }
    }
}

impl Default for DialectBuilder {
    fn default() -> Self {
        Self::new()
    }
}
