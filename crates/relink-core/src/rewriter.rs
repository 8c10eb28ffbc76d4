//! The rewrite contract between URL primitives and format walkers.

use regex::Regex;

use crate::absolute::absolute_to_relative;
use crate::early_exit::early_exit_regex;
use crate::options::TransformOptions;
use crate::relative::relative_to_absolute;
use crate::transform_ready::{absolute_to_transform_ready, to_transform_ready};

/// Everything a rewriter needs to know about where a URL lives.
#[derive(Debug, Clone, Copy)]
pub struct TransformContext<'a> {
    /// Site root URL, possibly with a subdirectory.
    pub site_url: &'a str,
    /// Path (or full URL) of the item the content belongs to. Needed to
    /// resolve page-relative URLs.
    pub item_path: Option<&'a str>,
    pub options: &'a TransformOptions,
}

impl<'a> TransformContext<'a> {
    pub fn new(site_url: &'a str, options: &'a TransformOptions) -> Self {
        Self {
            site_url,
            item_path: None,
            options,
        }
    }

    #[must_use]
    pub fn with_item_path(mut self, item_path: Option<&'a str>) -> Self {
        self.item_path = item_path;
        self
    }
}

/// A single-URL rewrite applied by format walkers.
///
/// Walkers call [`UrlRewriter::rewrite`] on every URL-bearing field they find
/// and splice the result back. Returning the input unchanged means "leave
/// this URL alone".
pub trait UrlRewriter {
    /// Rewrite one URL.
    fn rewrite(&self, url: &str, cx: &TransformContext<'_>) -> String;

    /// Regex that must match somewhere in a document for this rewriter to
    /// have any effect. Walkers return the document untouched when it does
    /// not match. `None` disables the check.
    fn early_exit(&self, _cx: &TransformContext<'_>) -> Option<Regex> {
        None
    }

    fn direction(&self) -> Direction;
}

/// Resolves root-relative and page-relative URLs against the site root.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelativeToAbsolute;

/// Strips the site origin from absolute URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteToRelative;

/// Encodes relative and absolute site URLs into the transform-ready form.
#[derive(Debug, Clone, Copy, Default)]
pub struct ToTransformReady;

/// Encodes only absolute site URLs into the transform-ready form.
#[derive(Debug, Clone, Copy, Default)]
pub struct AbsoluteToTransformReady;

impl UrlRewriter for RelativeToAbsolute {
    fn rewrite(&self, url: &str, cx: &TransformContext<'_>) -> String {
        relative_to_absolute(url, cx.site_url, cx.item_path, cx.options)
    }

    fn direction(&self) -> Direction {
        Direction::RelativeToAbsolute
    }
}

impl UrlRewriter for AbsoluteToRelative {
    fn rewrite(&self, url: &str, cx: &TransformContext<'_>) -> String {
        absolute_to_relative(url, cx.site_url, cx.options)
    }

    fn early_exit(&self, cx: &TransformContext<'_>) -> Option<Regex> {
        early_exit_regex(cx.site_url, cx.options)
    }

    fn direction(&self) -> Direction {
        Direction::AbsoluteToRelative
    }
}

impl UrlRewriter for ToTransformReady {
    fn rewrite(&self, url: &str, cx: &TransformContext<'_>) -> String {
        to_transform_ready(url, cx.site_url, cx.item_path, cx.options)
    }

    fn direction(&self) -> Direction {
        Direction::ToTransformReady
    }
}

impl UrlRewriter for AbsoluteToTransformReady {
    fn rewrite(&self, url: &str, cx: &TransformContext<'_>) -> String {
        absolute_to_transform_ready(url, cx.site_url, cx.options)
    }

    fn early_exit(&self, cx: &TransformContext<'_>) -> Option<Regex> {
        early_exit_regex(cx.site_url, cx.options)
    }

    fn direction(&self) -> Direction {
        Direction::AbsoluteToTransformReady
    }
}

/// Runtime selection of one of the rewriters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    RelativeToAbsolute,
    AbsoluteToRelative,
    ToTransformReady,
    AbsoluteToTransformReady,
}

impl Direction {
    /// Short name used in logs and by the CLI.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RelativeToAbsolute => "relative-to-absolute",
            Self::AbsoluteToRelative => "absolute-to-relative",
            Self::ToTransformReady => "to-transform-ready",
            Self::AbsoluteToTransformReady => "absolute-to-transform-ready",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl UrlRewriter for Direction {
    fn rewrite(&self, url: &str, cx: &TransformContext<'_>) -> String {
        match self {
            Self::RelativeToAbsolute => RelativeToAbsolute.rewrite(url, cx),
            Self::AbsoluteToRelative => AbsoluteToRelative.rewrite(url, cx),
            Self::ToTransformReady => ToTransformReady.rewrite(url, cx),
            Self::AbsoluteToTransformReady => AbsoluteToTransformReady.rewrite(url, cx),
        }
    }

    fn early_exit(&self, cx: &TransformContext<'_>) -> Option<Regex> {
        match self {
            Self::RelativeToAbsolute => RelativeToAbsolute.early_exit(cx),
            Self::AbsoluteToRelative => AbsoluteToRelative.early_exit(cx),
            Self::ToTransformReady => ToTransformReady.early_exit(cx),
            Self::AbsoluteToTransformReady => AbsoluteToTransformReady.early_exit(cx),
        }
    }

    fn direction(&self) -> Direction {
        *self
    }
}

impl<R: UrlRewriter + ?Sized> UrlRewriter for &R {
    fn rewrite(&self, url: &str, cx: &TransformContext<'_>) -> String {
        (**self).rewrite(url, cx)
    }

    fn early_exit(&self, cx: &TransformContext<'_>) -> Option<Regex> {
        (**self).early_exit(cx)
    }

    fn direction(&self) -> Direction {
        (**self).direction()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_delegates() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);

        assert_eq!(
            Direction::RelativeToAbsolute.rewrite("/a", &cx),
            "https://my-blog.com/a"
        );
        assert_eq!(
            Direction::AbsoluteToRelative.rewrite("https://my-blog.com/a", &cx),
            "/a"
        );
        assert_eq!(
            Direction::ToTransformReady.rewrite("/a", &cx),
            "__GHOST_URL__/a"
        );
        assert_eq!(
            Direction::AbsoluteToTransformReady.rewrite("/a", &cx),
            "/a"
        );
    }

    #[test]
    fn test_item_path_flows_through_context() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options).with_item_path(Some("/post/"));
        assert_eq!(
            RelativeToAbsolute.rewrite("image.png", &cx),
            "https://my-blog.com/post/image.png"
        );
    }

    #[test]
    fn test_early_exit_only_for_absolute_input() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        assert!(RelativeToAbsolute.early_exit(&cx).is_none());
        assert!(ToTransformReady.early_exit(&cx).is_none());
        assert!(AbsoluteToRelative.early_exit(&cx).is_some());
        assert!(Direction::AbsoluteToTransformReady.early_exit(&cx).is_some());
    }

    #[test]
    fn test_direction_names() {
        assert_eq!(Direction::ToTransformReady.to_string(), "to-transform-ready");
        assert_eq!(AbsoluteToRelative.direction(), Direction::AbsoluteToRelative);
    }
}
