use std::sync::Arc;

use serde::Deserialize;

use crate::dialect::{Dialect, Registry};

/// Where the comma goes when a column list is split across lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CommaStyle {
    /// `  , column`
    #[default]
    Left,
    /// `column,`
    Right,
}

/// Formatting options threaded through the whole pipeline.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Spaces added to the left of every output line.
    pub distance: usize,
    pub comma_style: CommaStyle,
    /// Emit keywords, functions and types in lowercase.
    pub lower_cased: bool,
    /// Wrap tokens in ANSI color sequences by kind.
    pub colorized: bool,
    /// Extra vocabulary on top of the built-in PostgreSQL tables.
    pub dialects: Vec<Registry>,
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_distance(mut self, distance: usize) -> Self {
        self.distance = distance;
        self
    }

    pub fn with_comma_style(mut self, style: CommaStyle) -> Self {
        self.comma_style = style;
        self
    }

    pub fn with_lower_cased(mut self, lower: bool) -> Self {
        self.lower_cased = lower;
        self
    }

    pub fn with_colorized(mut self, colorized: bool) -> Self {
        self.colorized = colorized;
        self
    }

    pub fn with_dialect(mut self, registry: Registry) -> Self {
        self.dialects.push(registry);
        self
    }

    /// The vocabulary these options select.
    pub fn dialect(&self) -> Arc<Dialect> {
        Dialect::with_registries(&self.dialects)
    }
}
