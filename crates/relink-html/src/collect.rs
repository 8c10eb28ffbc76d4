//! DOM traversal collecting URL-bearing attributes.

use relink_core::{TransformContext, UrlRewriter};

use crate::attr::{URL_ATTRIBUTES, rewrite_attribute};

/// Elements whose own attributes are never rewritten.
const SKIPPED_ELEMENTS: [&str; 1] = ["stream"];

/// One URL-bearing attribute found in the DOM, in document order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Occurrence {
    /// Lowercase attribute name.
    pub attr: String,
    /// Attribute value exactly as written in the source.
    pub original: String,
    /// New value, or `None` when this occurrence must be left alone.
    pub rewritten: Option<String>,
}

/// Collect URL-bearing attributes grouped per tag, in document order.
///
/// Tags without any URL-bearing attribute are left out.
pub(crate) fn collect_occurrences<R: UrlRewriter>(
    dom: &tl::VDom<'_>,
    rewriter: &R,
    cx: &TransformContext<'_>,
) -> Vec<Vec<Occurrence>> {
    let parser = dom.parser();
    let mut collector = Collector {
        parser,
        rewriter,
        cx,
        tags: Vec::new(),
    };
    for handle in dom.children() {
        collector.visit(*handle, false);
    }
    collector.tags
}

struct Collector<'p, 'a, 'r, R> {
    parser: &'p tl::Parser<'a>,
    rewriter: &'r R,
    cx: &'r TransformContext<'r>,
    tags: Vec<Vec<Occurrence>>,
}

impl<R: UrlRewriter> Collector<'_, '_, '_, R> {
    fn visit(&mut self, handle: tl::NodeHandle, in_code: bool) {
        let Some(tl::Node::Tag(tag)) = handle.get(self.parser) else {
            return;
        };

        let name = tag.name().as_utf8_str().to_ascii_lowercase();
        let skip = in_code || SKIPPED_ELEMENTS.contains(&name.as_str());

        let mut found = Vec::new();
        for (key, value) in tag.attributes().iter() {
            let attr = key.to_ascii_lowercase();
            if !URL_ATTRIBUTES.contains(&attr.as_str()) {
                continue;
            }
            let Some(value) = value else {
                continue;
            };
            if attr == "style" && !value.to_ascii_lowercase().contains("url(") {
                continue;
            }

            let rewritten = if skip {
                None
            } else {
                rewrite_attribute(&attr, &value, self.rewriter, self.cx)
            };
            found.push(Occurrence {
                attr,
                original: value.into_owned(),
                rewritten,
            });
        }
        if !found.is_empty() {
            self.tags.push(found);
        }

        let children_in_code = in_code || name == "code";
        for child in tag.children().top().iter() {
            self.visit(*child, children_in_code);
        }
    }
}
