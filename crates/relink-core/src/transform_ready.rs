//! Transform-ready encoding and decoding.
//!
//! A transform-ready URL replaces the site root (or a CDN base) with a fixed
//! placeholder, so stored content stays valid when the site moves to another
//! domain, subdirectory or CDN:
//!
//! ```text
//! https://example.com/blog/about/    ->  __GHOST_URL__/about/
//! https://cdn.example/content/media/a.mp4  ->  __GHOST_URL__/content/media/a.mp4
//! ```

use url::{Position, Url};

use crate::absolute::{parse_with_host, strip_site_origin};
use crate::join::with_trailing_slash;
use crate::kind::is_relative;
use crate::options::TransformOptions;
use crate::relative::relative_to_absolute;

/// Convert an absolute URL on the site (or a configured CDN base) into its
/// transform-ready form. Everything else is returned unchanged.
///
/// The site's subdirectory is always stripped so that decoding against a
/// root with a different subdirectory still yields a valid URL.
pub fn absolute_to_transform_ready(url: &str, root: &str, options: &TransformOptions) -> String {
    let Some(parsed) = parse_with_host(url) else {
        return url.to_owned();
    };

    if let Some(ready) = cdn_transform_ready(&parsed, options) {
        return ready;
    }

    match strip_site_origin(url, root, options, true) {
        Some(relative) if relative.starts_with('/') => {
            format!("{}{relative}", options.replacement_str)
        }
        _ => url.to_owned(),
    }
}

/// Convert a relative URL into its transform-ready form.
///
/// Root-relative paths are only converted when they can unambiguously be
/// attributed to the site: the root has no subdirectory, the path already
/// starts with the subdirectory, or the path points at the image prefix.
/// Page-relative paths are converted whenever they resolve.
pub fn relative_to_transform_ready(
    url: &str,
    root: &str,
    item_path: Option<&str>,
    options: &TransformOptions,
) -> String {
    if !is_relative(url) {
        return url.to_owned();
    }

    let absolute = relative_to_absolute(url, root, item_path, options);
    if absolute == url {
        return url.to_owned();
    }

    let Ok(parsed_root) = Url::parse(&with_trailing_slash(root)) else {
        return url.to_owned();
    };
    let subdir = parsed_root.path().trim_end_matches('/');
    let image_prefix = format!("/{}", options.static_image_url_prefix.trim_matches('/'));

    // Images are accepted outside the subdirectory as well.
    let convertible = !url.starts_with('/')
        || subdir.is_empty()
        || url.starts_with(subdir)
        || url.starts_with(&image_prefix);

    if convertible {
        let ready = absolute_to_transform_ready(&absolute, root, options);
        if ready != absolute {
            return ready;
        }
    }

    url.to_owned()
}

/// Convert any URL into its transform-ready form: relative input is first
/// made absolute, then encoded.
pub fn to_transform_ready(
    url: &str,
    root: &str,
    item_path: Option<&str>,
    options: &TransformOptions,
) -> String {
    let absolute = relative_to_absolute(url, root, item_path, options);
    absolute_to_transform_ready(&absolute, root, options)
}

/// Expand a transform-ready URL into an absolute URL for the current root.
///
/// Only input that starts with the replacement string is touched.
pub fn transform_ready_to_absolute(url: &str, root: &str, options: &TransformOptions) -> String {
    expand_prefix(url, root, options, ReadyTarget::Absolute)
}

/// Expand a transform-ready URL into a root-relative path for the current
/// root, keeping (but never doubling) the root's subdirectory.
pub fn transform_ready_to_relative(url: &str, root: &str, options: &TransformOptions) -> String {
    expand_prefix(url, root, options, ReadyTarget::Relative)
}

/// Representation produced when expanding transform-ready content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyTarget {
    /// Full URL on the current root (or CDN base for assets).
    Absolute,
    /// Root-relative path including the current subdirectory.
    Relative,
}

/// Expand every transform-ready URL embedded in a text document.
///
/// Unlike the single-URL functions, the replacement string may appear
/// anywhere in `text`. Text without the replacement string is returned as-is.
pub fn replace_transform_ready(
    text: &str,
    root: &str,
    options: &TransformOptions,
    target: ReadyTarget,
) -> String {
    let token = options.replacement_str.as_str();
    if token.is_empty() || !text.contains(token) {
        return text.to_owned();
    }

    let expander = Expander::new(root, options, target);
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for (start, _) in text.match_indices(token) {
        out.push_str(&text[last..start]);
        out.push_str(expander.base_for(&text[start + token.len()..]));
        last = start + token.len();
    }
    out.push_str(&text[last..]);
    out
}

fn expand_prefix(url: &str, root: &str, options: &TransformOptions, target: ReadyTarget) -> String {
    let token = options.replacement_str.as_str();
    match url.strip_prefix(token) {
        Some(rest) if !token.is_empty() => {
            let expander = Expander::new(root, options, target);
            format!("{}{rest}", expander.base_for(rest))
        }
        _ => url.to_owned(),
    }
}

/// Resolves what the replacement string expands to at a given position.
struct Expander<'a> {
    root: &'a str,
    subdir: String,
    options: &'a TransformOptions,
    target: ReadyTarget,
}

impl<'a> Expander<'a> {
    fn new(root: &'a str, options: &'a TransformOptions, target: ReadyTarget) -> Self {
        let subdir = Url::parse(&with_trailing_slash(root))
            .map(|parsed| parsed.path().trim_end_matches('/').to_owned())
            .unwrap_or_default();
        Self {
            root: root.trim_end_matches('/'),
            subdir,
            options,
            target,
        }
    }

    /// Text to substitute for the replacement string, given the text that
    /// follows it.
    fn base_for(&self, rest: &str) -> &str {
        match self.target {
            ReadyTarget::Absolute => self
                .options
                .cdn_bases()
                .find(|(_, prefix)| starts_with_segment(rest, &format!("/{prefix}")))
                .map_or(self.root, |(base, _)| base.trim_end_matches('/')),
            ReadyTarget::Relative => {
                if !self.subdir.is_empty() && starts_with_segment(rest, &self.subdir) {
                    ""
                } else if self.subdir.is_empty() && !rest.starts_with('/') {
                    "/"
                } else {
                    &self.subdir
                }
            }
        }
    }
}

/// Check that `path` starts with `segment` followed by a path boundary.
fn starts_with_segment(path: &str, segment: &str) -> bool {
    path.strip_prefix(segment)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with(['/', '?', '#', '"', '\'', ')', ']']))
}

/// Match an absolute URL against the configured CDN bases.
///
/// The URL must share the base's origin, sit at or below the base's path,
/// and the remaining path must start with the prefix the base serves.
fn cdn_transform_ready(url: &Url, options: &TransformOptions) -> Option<String> {
    options.cdn_bases().find_map(|(base, prefix)| {
        let base = Url::parse(base).ok()?;
        if base.origin() != url.origin() {
            return None;
        }

        let base_path = base.path().trim_end_matches('/');
        let rest = if base_path.is_empty() {
            url.path()
        } else {
            url.path()
                .strip_prefix(base_path)
                .filter(|rest| rest.is_empty() || rest.starts_with('/'))?
        };

        let prefix = format!("/{prefix}");
        if !starts_with_segment(rest, &prefix) {
            return None;
        }

        let suffix = &url[Position::AfterPath..];
        tracing::trace!(url = %url, base = %base, "Matched CDN base");
        Some(format!("{}{rest}{suffix}", options.replacement_str))
    })
}
