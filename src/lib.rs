pub mod api;
pub mod config;
pub mod dialect;
pub mod error;
pub mod formatter;
pub mod group;
pub mod lexer;
pub mod mode;
pub mod options;
pub mod parser;
pub mod reindent;
pub mod render;
pub mod report;
pub mod retriever;
mod scanner;
mod string_utils;
pub mod token;
pub mod vocabulary;

// Re-export the main public API
pub use api::{format_bytes, format_document, format_string, get_matching_paths, run};
pub use api::format_string as format;
pub use config::load_config;
pub use dialect::{Dialect, Registry};
pub use error::SqlfmtError;
pub use mode::Mode;
pub use options::{CommaStyle, FormatOptions};
