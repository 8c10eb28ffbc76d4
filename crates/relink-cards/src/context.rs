//! Context handed to card and node transformers.

use relink_core::{Direction, TransformContext, UrlRewriter};

/// What a card or node transformer receives alongside its payload.
///
/// Carries the active [`Direction`] so a single transformer can serve every
/// rewrite direction, plus helpers that apply it to URLs and embedded
/// documents.
#[derive(Debug, Clone, Copy)]
pub struct CardContext<'a> {
    pub direction: Direction,
    pub transform: TransformContext<'a>,
}

impl<'a> CardContext<'a> {
    pub fn new(direction: Direction, transform: TransformContext<'a>) -> Self {
        Self {
            direction,
            transform,
        }
    }

    pub fn site_url(&self) -> &'a str {
        self.transform.site_url
    }

    pub fn item_path(&self) -> Option<&'a str> {
        self.transform.item_path
    }

    /// Rewrite a single URL.
    pub fn url(&self, url: &str) -> String {
        self.direction.rewrite(url, &self.transform)
    }

    /// Rewrite the URLs of an embedded HTML fragment.
    pub fn html(&self, html: &str) -> String {
        relink_html::transform_html(html, &self.direction, &self.transform)
    }

    /// Rewrite the URLs of an embedded Markdown document.
    pub fn markdown(&self, markdown: &str) -> String {
        relink_markdown::transform_markdown(markdown, &self.direction, &self.transform)
    }
}
