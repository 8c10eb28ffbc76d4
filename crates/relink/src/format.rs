//! Content formats and operations for generic dispatch.

use std::fmt;

use relink_core::{Direction, ReadyTarget};

/// Serialized content format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Html,
    Markdown,
    Mobiledoc,
    Lexical,
    Plaintext,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "markdown",
            Self::Mobiledoc => "mobiledoc",
            Self::Lexical => "lexical",
            Self::Plaintext => "plaintext",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A whole-document operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Rewrite each URL with the given direction.
    Rewrite(Direction),
    /// Expand transform-ready URLs.
    Expand(ReadyTarget),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rewrite(direction) => direction.fmt(f),
            Self::Expand(ReadyTarget::Absolute) => f.write_str("transform-ready-to-absolute"),
            Self::Expand(ReadyTarget::Relative) => f.write_str("transform-ready-to-relative"),
        }
    }
}
