//! URL rewriting for HTML fragments.
//!
//! The fragment is parsed with [`tl`] only to find URL-bearing attributes
//! (`href`, `src`, `srcset` and `url(...)` inside `style`) and to learn which
//! of them sit inside `<code>`. Rewrites are then applied to the original
//! string, so quoting, whitespace and everything else the DOM would normalise
//! stays exactly as written.
//!
//! ```
//! use relink_core::{AbsoluteToRelative, TransformContext, TransformOptions};
//!
//! let options = TransformOptions::default();
//! let cx = TransformContext::new("https://my-blog.com/", &options);
//! let html = r#"<a href="https://my-blog.com/about#x">About</a>"#;
//! assert_eq!(
//!     relink_html::transform_html(html, &AbsoluteToRelative, &cx),
//!     r#"<a href="/about#x">About</a>"#
//! );
//! ```

mod attr;
mod collect;
mod splice;

use relink_core::{TransformContext, UrlRewriter};

pub use attr::{rewrite_srcset, rewrite_style};

/// Rewrite every URL-bearing attribute in an HTML fragment.
///
/// Attributes inside `<code>` and on `<stream>` elements are left alone.
/// Input that cannot be parsed is returned unchanged.
pub fn transform_html<R: UrlRewriter>(html: &str, rewriter: &R, cx: &TransformContext<'_>) -> String {
    if html.is_empty() {
        return String::new();
    }

    if let Some(early_exit) = rewriter.early_exit(cx)
        && !early_exit.is_match(html)
    {
        tracing::debug!(direction = %rewriter.direction(), "No site URLs in HTML, skipping");
        return html.to_owned();
    }

    let dom = match tl::parse(html, tl::ParserOptions::default()) {
        Ok(dom) => dom,
        Err(e) => {
            tracing::warn!(error = ?e, "Failed to parse HTML, leaving unchanged");
            return html.to_owned();
        }
    };

    let occurrences = collect::collect_occurrences(&dom, rewriter, cx);
    let edits = splice::plan_edits(html, occurrences);
    if edits.is_empty() {
        return html.to_owned();
    }

    tracing::trace!(direction = %rewriter.direction(), edits = edits.len(), "Rewriting HTML attributes");
    splice::apply_edits(html, edits)
}
