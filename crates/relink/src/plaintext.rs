//! Plaintext walker: links rendered as `Title [url]`.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use relink_core::{
    AbsoluteToTransformReady, Direction, RelativeToAbsolute, TransformContext, UrlRewriter,
    build_early_exit_match,
};

/// Bracketed root-relative link.
static RELATIVE_LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r" \[(/[^\]]*)\]").unwrap());

/// Rewrite bracketed links in plaintext.
///
/// Only the bracketed URL is replaced. Relative-to-absolute conversion looks
/// at root-relative links; the absolute directions look at links on the site
/// or one of its CDN bases.
pub fn transform_plaintext<R: UrlRewriter>(text: &str, rewriter: &R, cx: &TransformContext<'_>) -> String {
    match rewriter.direction() {
        Direction::RelativeToAbsolute => rewrite_links(text, &RELATIVE_LINK, rewriter, cx),
        Direction::AbsoluteToRelative | Direction::AbsoluteToTransformReady => {
            match absolute_link_pattern(cx) {
                Some(pattern) => rewrite_links(text, &pattern, rewriter, cx),
                None => text.to_owned(),
            }
        }
        Direction::ToTransformReady => {
            let absolute = rewrite_links(text, &RELATIVE_LINK, &RelativeToAbsolute, cx);
            match absolute_link_pattern(cx) {
                Some(pattern) => rewrite_links(&absolute, &pattern, &AbsoluteToTransformReady, cx),
                None => absolute,
            }
        }
    }
}

/// Bracketed link on the site or a CDN base, with or without scheme.
fn absolute_link_pattern(cx: &TransformContext<'_>) -> Option<Regex> {
    let hosts = relink_core::TransformOptions {
        ignore_protocol: true,
        ..cx.options.clone()
    };
    let alternation = build_early_exit_match(cx.site_url, &hosts)?;
    Regex::new(&format!(r"(?i) \[((?:https?:)?{alternation}[^\]]*)\]"))
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to compile plaintext link pattern"))
        .ok()
}

fn rewrite_links<R: UrlRewriter>(
    text: &str,
    pattern: &Regex,
    rewriter: &R,
    cx: &TransformContext<'_>,
) -> String {
    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            format!(" [{}]", rewriter.rewrite(&caps[1], cx))
        })
        .into_owned()
}
