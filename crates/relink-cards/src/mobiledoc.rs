//! Mobiledoc walker.
//!
//! Rewrites anchor markups (`["a", ["href", url, ...]]`), image sections
//! (`[2, src]`) and card payloads via the [`CardRegistry`].

use relink_core::{Error, TransformContext, UrlRewriter};
use serde_json::Value;

use crate::context::CardContext;
use crate::registry::{CardRegistry, transform_card};

const FORMAT: &str = "mobiledoc";

/// Section type identifier of image sections.
const IMAGE_SECTION: u64 = 2;

/// Rewrite the URLs of a serialized Mobiledoc document.
///
/// Returns the re-serialized document; the input string is never modified.
/// Cards without a registered transformer are left as they are.
pub fn transform_mobiledoc<R: UrlRewriter>(
    serialized: &str,
    rewriter: &R,
    cx: &TransformContext<'_>,
    cards: &CardRegistry,
) -> Result<String, Error> {
    if let Some(early_exit) = rewriter.early_exit(cx)
        && !early_exit.is_match(serialized)
    {
        tracing::debug!(direction = %rewriter.direction(), "No site URLs in Mobiledoc, skipping");
        return Ok(serialized.to_owned());
    }

    let mut doc: Value = serde_json::from_str(serialized).map_err(|source| Error::InvalidDocument {
        format: FORMAT,
        source,
    })?;

    if let Some(Value::Array(markups)) = doc.get_mut("markups") {
        for markup in markups {
            rewrite_markup(markup, rewriter, cx);
        }
    }

    if let Some(Value::Array(sections)) = doc.get_mut("sections") {
        for section in sections {
            rewrite_image_section(section, rewriter, cx);
        }
    }

    if let Some(Value::Array(doc_cards)) = doc.get_mut("cards") {
        let card_cx = CardContext::new(rewriter.direction(), *cx);
        for card in doc_cards {
            rewrite_card(card, cards, &card_cx);
        }
    }

    serde_json::to_string(&doc).map_err(|source| Error::InvalidDocument {
        format: FORMAT,
        source,
    })
}

/// Rewrite the `href` attribute of an anchor markup.
///
/// Attributes are a flat `[key, value, key, value, ...]` list; `href` may sit
/// at any even index.
fn rewrite_markup<R: UrlRewriter>(markup: &mut Value, rewriter: &R, cx: &TransformContext<'_>) {
    let Some(parts) = markup.as_array_mut() else {
        return;
    };
    if parts.first().and_then(Value::as_str) != Some("a") {
        return;
    }
    let Some(Value::Array(attributes)) = parts.get_mut(1) else {
        return;
    };

    for pair in attributes.chunks_exact_mut(2) {
        if pair[0].as_str() == Some("href")
            && let Value::String(href) = &mut pair[1]
        {
            *href = rewriter.rewrite(href, cx);
        }
    }
}

fn rewrite_image_section<R: UrlRewriter>(section: &mut Value, rewriter: &R, cx: &TransformContext<'_>) {
    let Some(parts) = section.as_array_mut() else {
        return;
    };
    if parts.first().and_then(Value::as_u64) != Some(IMAGE_SECTION) {
        return;
    }
    if let Some(Value::String(src)) = parts.get_mut(1) {
        *src = rewriter.rewrite(src, cx);
    }
}

fn rewrite_card(card: &mut Value, cards: &CardRegistry, cx: &CardContext<'_>) {
    let Some([Value::String(name), payload, ..]) = card.as_array_mut().map(Vec::as_mut_slice) else {
        return;
    };
    let Some(transformer) = cards.get(name) else {
        tracing::trace!(card = %name, "No transformer registered for card");
        return;
    };
    *payload = transform_card(transformer, payload.take(), cx);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relink_core::{
        AbsoluteToRelative, AbsoluteToTransformReady, RelativeToAbsolute, TransformOptions,
    };
    use serde_json::json;

    use crate::map::UrlTransformMap;
    use crate::registry::MapCardTransformer;

    fn doc(value: &Value) -> String {
        serde_json::to_string(value).unwrap()
    }

    #[test]
    fn test_markup_href_absolute_to_relative() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("http://my-blog.com/", &options);
        let input = doc(&json!({
            "version": "0.3.1",
            "markups": [
                ["a", ["href", "http://my-blog.com/x"]],
                ["a", ["href", "https://external.com/x"]],
                ["strong"],
            ],
            "sections": [],
        }));
        let output = transform_mobiledoc(&input, &AbsoluteToRelative, &cx, &CardRegistry::new()).unwrap();
        assert_eq!(
            output,
            doc(&json!({
                "version": "0.3.1",
                "markups": [
                    ["a", ["href", "/x"]],
                    ["a", ["href", "https://external.com/x"]],
                    ["strong"],
                ],
                "sections": [],
            }))
        );
    }

    #[test]
    fn test_escaped_slashes_are_not_skipped() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let input = r#"{"markups":[["a",["href","https:\/\/my-blog.com\/x"]]]}"#;
        let output = transform_mobiledoc(input, &AbsoluteToRelative, &cx, &CardRegistry::new()).unwrap();
        assert_eq!(output, r#"{"markups":[["a",["href","/x"]]]}"#);
    }

    #[test]
    fn test_href_at_any_attribute_position() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("http://my-blog.com/", &options);
        let input = doc(&json!({
            "markups": [["a", ["rel", "noopener", "href", "/x", "title", "/not-a-url"]]],
        }));
        let output = transform_mobiledoc(&input, &RelativeToAbsolute, &cx, &CardRegistry::new()).unwrap();
        assert_eq!(
            output,
            doc(&json!({
                "markups": [["a", ["rel", "noopener", "href", "http://my-blog.com/x", "title", "/not-a-url"]]],
            }))
        );
    }

    #[test]
    fn test_image_sections() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let input = doc(&json!({
            "sections": [[2, "https://my-blog.com/content/images/a.png"], [1, "p", []]],
        }));
        let output =
            transform_mobiledoc(&input, &AbsoluteToTransformReady, &cx, &CardRegistry::new()).unwrap();
        assert_eq!(
            output,
            doc(&json!({
                "sections": [[2, "__GHOST_URL__/content/images/a.png"], [1, "p", []]],
            }))
        );
    }

    #[test]
    fn test_registered_and_unknown_cards() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let cards = CardRegistry::new().with(MapCardTransformer::new(
            "image",
            UrlTransformMap::new().url("src").html("caption"),
        ));
        let input = doc(&json!({
            "cards": [
                ["image", {"src": "/a.png", "caption": "<a href=\"/b\">b</a>"}],
                ["mystery", {"src": "/c.png"}],
            ],
        }));
        let output = transform_mobiledoc(&input, &RelativeToAbsolute, &cx, &cards).unwrap();
        assert_eq!(
            output,
            doc(&json!({
                "cards": [
                    ["image", {"src": "https://my-blog.com/a.png", "caption": "<a href=\"https://my-blog.com/b\">b</a>"}],
                    ["mystery", {"src": "/c.png"}],
                ],
            }))
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let err = transform_mobiledoc("{not json", &RelativeToAbsolute, &cx, &CardRegistry::new())
            .unwrap_err();
        assert!(matches!(err, Error::InvalidDocument { format: "mobiledoc", .. }));
    }

    #[test]
    fn test_early_exit_skips_parse() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let input = "{not json but no site url";
        assert_eq!(
            transform_mobiledoc(input, &AbsoluteToRelative, &cx, &CardRegistry::new()).unwrap(),
            input
        );
    }

    #[test]
    fn test_key_order_preserved() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let input = r#"{"version":"0.3.1","atoms":[],"cards":[],"markups":[["a",["href","/x"]]],"sections":[]}"#;
        assert_eq!(
            transform_mobiledoc(input, &RelativeToAbsolute, &cx, &CardRegistry::new()).unwrap(),
            r#"{"version":"0.3.1","atoms":[],"cards":[],"markups":[["a",["href","https://my-blog.com/x"]]],"sections":[]}"#
        );
    }
}
