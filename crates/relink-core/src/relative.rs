//! Relative to absolute conversion.

use url::Url;

use crate::join::{url_join, with_trailing_slash};
use crate::kind::UrlKind;
use crate::options::TransformOptions;

/// Convert a root-relative or page-relative path into an absolute URL.
///
/// Root-relative paths (`/about`) resolve against `root`, keeping the root's
/// subdirectory. Page-relative paths (`image.png`) resolve against
/// `root + item_path` and are left unchanged when no item path is known.
///
/// Absolute, protocol-relative, hash-only, query-only and transform-ready
/// input is returned unchanged, as is anything that fails to parse.
///
/// ```
/// use relink_core::{TransformOptions, relative_to_absolute};
///
/// let options = TransformOptions::default();
/// assert_eq!(
///     relative_to_absolute("image.png", "https://example.com/blog/", Some("/my-post/"), &options),
///     "https://example.com/blog/my-post/image.png"
/// );
/// assert_eq!(
///     relative_to_absolute("image.png", "https://example.com/", None, &options),
///     "image.png"
/// );
/// ```
pub fn relative_to_absolute(
    path: &str,
    root: &str,
    item_path: Option<&str>,
    options: &TransformOptions,
) -> String {
    resolve(path, root, item_path, options).unwrap_or_else(|| path.to_owned())
}

fn resolve(
    path: &str,
    root: &str,
    item_path: Option<&str>,
    options: &TransformOptions,
) -> Option<String> {
    if options.assets_only && !options.matches_asset_prefix(path) {
        return None;
    }
    if !options.replacement_str.is_empty() && path.starts_with(&options.replacement_str) {
        return None;
    }

    let base_path = match UrlKind::classify(path) {
        UrlKind::RootRelative => "",
        UrlKind::PageRelative => item_path_only(item_path?)?,
        _ => return None,
    };

    let root = with_trailing_slash(root);
    let parsed_root = Url::parse(&root).ok()?;

    let full_path = url_join(&[parsed_root.path(), base_path, path], &root);
    let mut absolute = parsed_root.join(&full_path).ok()?;

    if options.secure {
        absolute.set_scheme("https").ok()?;
    }

    Some(absolute.into())
}

/// Item paths may be given as full URLs; only their path takes part in
/// resolution. Empty item paths count as missing.
fn item_path_only(item_path: &str) -> Option<&str> {
    if item_path.is_empty() {
        return None;
    }
    if let Some((_, after_scheme)) = item_path
        .split_once("://")
        .filter(|(scheme, _)| matches!(*scheme, "http" | "https"))
    {
        return Some(after_scheme.find('/').map_or("/", |idx| &after_scheme[idx..]));
    }
    Some(item_path)
}
