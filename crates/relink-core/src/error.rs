//! Error types for relink.

/// Errors raised while preparing or parsing content for URL rewriting.
///
/// Single-URL conversions never fail; they return their input unchanged.
/// Errors only surface for invalid site configuration and for structured
/// documents (Mobiledoc, Lexical) that cannot be parsed.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The configured site URL is not an absolute URL.
    #[error("Invalid site URL '{url}': {source}")]
    InvalidSiteUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    /// A serialized document is not valid JSON.
    #[error("Invalid {format} document: {source}")]
    InvalidDocument {
        format: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// A document parsed but does not have the expected shape.
    #[error("Malformed {format} document: {reason}")]
    MalformedDocument { format: &'static str, reason: String },
}
