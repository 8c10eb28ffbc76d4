//! Path joining helpers.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use url::Url;

static REPEATED_SLASHES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(^|[^:])//+").unwrap());

/// Append a trailing slash to a root URL if it is missing.
pub fn with_trailing_slash(root: &str) -> Cow<'_, str> {
    if root.ends_with('/') {
        Cow::Borrowed(root)
    } else {
        Cow::Owned(format!("{root}/"))
    }
}

/// Join URL parts with `/`, collapsing repeated slashes.
///
/// A leading `//` (protocol-relative URL) survives the collapse, and a
/// subdirectory repeated by the join is deduplicated against `root`.
///
/// ```
/// use relink_core::url_join;
///
/// assert_eq!(url_join(&["/blog/", "/my-post/"], "https://example.com/blog/"), "/blog/my-post/");
/// assert_eq!(url_join(&["/", "about"], "https://example.com/"), "/about");
/// ```
pub fn url_join(parts: &[&str], root: &str) -> String {
    let parts = match parts.split_first() {
        Some((first, rest)) if first.is_empty() => rest,
        _ => parts,
    };
    let protocol_relative = parts.first().is_some_and(|first| first.starts_with("//"));

    let joined = parts.join("/");
    let mut url = REPEATED_SLASHES.replace_all(&joined, "$1/").into_owned();

    if protocol_relative && !url.starts_with("//") {
        url.insert(0, '/');
    }

    deduplicate_subdirectory(&url, root).into_owned()
}

/// Collapse a doubled subdirectory (`/blog/blog/`) into a single one.
///
/// Only applies when `root` has a subdirectory. Matches must start at a path
/// boundary so subdirectories that look like TLDs (`/co/`) are not mangled
/// inside host names.
pub fn deduplicate_subdirectory<'a>(url: &'a str, root: &str) -> Cow<'a, str> {
    let Ok(parsed_root) = Url::parse(&with_trailing_slash(root)) else {
        return Cow::Borrowed(url);
    };
    if parsed_root.path() == "/" {
        return Cow::Borrowed(url);
    }

    let subdir = parsed_root.path().trim_matches('/');
    let escaped = regex::escape(subdir);
    let Ok(pattern) = Regex::new(&format!("(^|/){escaped}/{escaped}(/|$)")) else {
        return Cow::Borrowed(url);
    };

    pattern.replacen(url, 1, |caps: &Captures<'_>| format!("{}{subdir}/", &caps[1]))
}
