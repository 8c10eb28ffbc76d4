//! Absolute to relative conversion.

use std::sync::LazyLock;

use url::{Position, Url};

use crate::join::with_trailing_slash;
use crate::kind::UrlKind;
use crate::options::TransformOptions;

/// Base used to resolve protocol-relative URLs before host comparison.
static RELATIVE_BASE: LazyLock<Url> = LazyLock::new(|| Url::parse("http://relative").unwrap());

/// Convert an absolute URL on the site into a root-relative path.
///
/// The URL must share the root's host, and its path must sit inside the
/// root's path (subdirectory). The protocol must match too unless
/// `ignore_protocol` is set. Query string and fragment are preserved.
///
/// Anything else (external URLs, relative input, malformed URLs, non-http
/// schemes) is returned unchanged.
///
/// ```
/// use relink_core::{TransformOptions, absolute_to_relative};
///
/// let options = TransformOptions::default();
/// assert_eq!(
///     absolute_to_relative("https://example.com/about#team", "https://example.com", &options),
///     "/about#team"
/// );
/// assert_eq!(
///     absolute_to_relative("https://other.com/about", "https://example.com", &options),
///     "https://other.com/about"
/// );
/// ```
pub fn absolute_to_relative(url: &str, root: &str, options: &TransformOptions) -> String {
    strip_site_origin(url, root, options, options.without_subdirectory)
        .unwrap_or_else(|| url.to_owned())
}

/// Strip the site origin from `url`, returning `None` when it does not belong
/// to the site.
pub(crate) fn strip_site_origin(
    url: &str,
    root: &str,
    options: &TransformOptions,
    without_subdirectory: bool,
) -> Option<String> {
    if options.assets_only && !options.matches_asset_prefix(url) {
        return None;
    }

    let parsed = parse_with_host(url)?;
    let parsed_root = Url::parse(&with_trailing_slash(root)).ok()?;

    let matches_host =
        parsed.host_str() == parsed_root.host_str() && parsed.port() == parsed_root.port();
    let matches_protocol = parsed.scheme() == parsed_root.scheme();
    let matches_path = parsed.path().starts_with(parsed_root.path());

    if !(matches_host && (options.ignore_protocol || matches_protocol) && matches_path) {
        return None;
    }

    let path = &parsed[Position::BeforePath..];
    let subdir = parsed_root.path().trim_end_matches('/');
    if without_subdirectory && !subdir.is_empty() {
        return Some(path.strip_prefix(subdir).unwrap_or(path).to_owned());
    }
    Some(path.to_owned())
}

/// Parse an absolute or protocol-relative URL. Returns `None` for relative,
/// non-http or malformed input.
pub(crate) fn parse_with_host(url: &str) -> Option<Url> {
    let url = url.trim();
    let parsed = match UrlKind::classify(url) {
        UrlKind::Absolute => Url::parse(url).ok()?,
        UrlKind::ProtocolRelative => RELATIVE_BASE.join(url).ok()?,
        _ => return None,
    };
    parsed.host_str().is_some().then_some(parsed)
}
