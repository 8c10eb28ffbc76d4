//! Syntactic URL classification.

use url::Url;

/// Shape of a URL string as written in content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Empty or whitespace-only.
    Empty,
    /// Pure fragment (`#section`).
    Hash,
    /// Pure query (`?page=2`).
    Query,
    /// Scheme-less URL with a host (`//cdn.example.com/a.png`).
    ProtocolRelative,
    /// Path from the domain root (`/about`).
    RootRelative,
    /// Path relative to the current item (`image.png`, `../other`).
    PageRelative,
    /// `http:` or `https:` URL with a host.
    Absolute,
    /// Any other scheme (`mailto:`, `tel:`, `data:`, ...).
    NonHttp,
}

impl UrlKind {
    /// Classify a URL string.
    pub fn classify(url: &str) -> Self {
        let url = url.trim();
        if url.is_empty() {
            Self::Empty
        } else if url.starts_with('#') {
            Self::Hash
        } else if url.starts_with('?') {
            Self::Query
        } else if url.starts_with("//") {
            Self::ProtocolRelative
        } else if url.starts_with('/') {
            Self::RootRelative
        } else {
            match Url::parse(url) {
                Ok(parsed) if is_http(&parsed) => Self::Absolute,
                Ok(_) => Self::NonHttp,
                Err(_) => Self::PageRelative,
            }
        }
    }
}

/// Check whether a URL is relative to the site or the current page.
///
/// Root-relative, page-relative, hash-only and query-only URLs are relative.
pub fn is_relative(url: &str) -> bool {
    matches!(
        UrlKind::classify(url),
        UrlKind::RootRelative | UrlKind::PageRelative | UrlKind::Hash | UrlKind::Query
    )
}

pub(crate) fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
}
