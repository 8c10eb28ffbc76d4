//! URL rewriting for Markdown documents.
//!
//! The document is parsed with `pulldown-cmark` to find link and image
//! destinations, reference definitions, autolinks and embedded HTML. Each
//! rewritten URL is spliced back into the source at its byte span, so the
//! output differs from the input only in the URLs themselves.
//!
//! ```
//! use relink_core::{RelativeToAbsolute, TransformContext, TransformOptions};
//!
//! let options = TransformOptions::default();
//! let cx = TransformContext::new("https://my-blog.com/", &options);
//! assert_eq!(
//!     relink_markdown::transform_markdown("  [About](/about)\n", &RelativeToAbsolute, &cx),
//!     "  [About](https://my-blog.com/about)\n"
//! );
//! ```

mod locate;

use std::ops::Range;
use std::sync::LazyLock;

use pulldown_cmark::{Event, LinkType, Options, Parser, Tag, TagEnd};
use regex::Regex;
use relink_core::{TransformContext, UrlRewriter};

use crate::locate::Destination;

/// HTML fragments are only handed to the HTML walker when they may carry URLs.
static HTML_URL_ATTRIBUTE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)src|srcset|href").unwrap());

fn parser_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
}

/// Rewrite every link, image, reference definition and HTML URL in a
/// Markdown document.
pub fn transform_markdown<R: UrlRewriter>(
    markdown: &str,
    rewriter: &R,
    cx: &TransformContext<'_>,
) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    if let Some(early_exit) = rewriter.early_exit(cx)
        && !early_exit.is_match(markdown)
    {
        tracing::debug!(direction = %rewriter.direction(), "No site URLs in Markdown, skipping");
        return markdown.to_owned();
    }

    let mut edits = EditList::default();
    let mut iter = Parser::new_ext(markdown, parser_options()).into_offset_iter();

    let mut in_html_block = false;
    for (event, range) in iter.by_ref() {
        match event {
            Event::Start(Tag::Link {
                link_type,
                dest_url,
                ..
            })
            | Event::Start(Tag::Image {
                link_type,
                dest_url,
                ..
            }) => {
                let found = match link_type {
                    LinkType::Inline => locate::inline_dest(markdown, &range, &dest_url),
                    LinkType::Autolink => locate::autolink_dest(markdown, &range, &dest_url),
                    // Reference links are rewritten at their definition.
                    _ => None,
                };
                if let Some(found) = found {
                    edits.rewrite_url(markdown, found, &dest_url, rewriter, cx);
                }
            }
            Event::Start(Tag::HtmlBlock) => {
                in_html_block = true;
                edits.rewrite_html(markdown, range, rewriter, cx);
            }
            Event::End(TagEnd::HtmlBlock) => in_html_block = false,
            Event::Html(_) | Event::InlineHtml(_) if !in_html_block => {
                edits.rewrite_html(markdown, range, rewriter, cx);
            }
            _ => {}
        }
    }

    for (_, definition) in iter.reference_definitions().iter() {
        if let Some(found) = locate::definition_dest(markdown, &definition.span, &definition.dest) {
            edits.rewrite_url(markdown, found, &definition.dest, rewriter, cx);
        }
    }

    edits.apply(markdown)
}

#[derive(Debug, Default)]
struct EditList {
    edits: Vec<(Range<usize>, String)>,
}

impl EditList {
    /// Rewrite the parsed destination `url` and splice it over its source.
    fn rewrite_url<R: UrlRewriter>(
        &mut self,
        source: &str,
        found: Destination,
        url: &str,
        rewriter: &R,
        cx: &TransformContext<'_>,
    ) {
        let rewritten = rewriter.rewrite(url, cx);
        if rewritten != url {
            tracing::trace!(from = url, to = %rewritten, "Rewriting Markdown URL");
            let replacement = found.replacement(source, url, &rewritten);
            self.edits.push((found.span, replacement));
        }
    }

    fn rewrite_html<R: UrlRewriter>(
        &mut self,
        source: &str,
        range: Range<usize>,
        rewriter: &R,
        cx: &TransformContext<'_>,
    ) {
        let html = &source[range.clone()];
        if !HTML_URL_ATTRIBUTE.is_match(html) {
            return;
        }
        let rewritten = relink_html::transform_html(html, rewriter, cx);
        if rewritten != html {
            self.edits.push((range, rewritten));
        }
    }

    fn apply(mut self, source: &str) -> String {
        if self.edits.is_empty() {
            return source.to_owned();
        }
        self.edits.sort_by_key(|(range, _)| range.start);

        let mut out = String::with_capacity(source.len());
        let mut last = 0;
        for (range, replacement) in self.edits {
            if range.start < last {
                continue;
            }
            out.push_str(&source[last..range.start]);
            out.push_str(&replacement);
            last = range.end;
        }
        out.push_str(&source[last..]);
        out
    }
}
