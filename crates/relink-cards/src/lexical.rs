//! Lexical walker.
//!
//! Visits every node below `root.children`. Nodes whose `type` is registered
//! in the [`NodeRegistry`] are rewritten through their transform map; any
//! other node with a string `url` property is treated as a link.

use relink_core::{Error, TransformContext, UrlRewriter};
use serde_json::Value;

use crate::context::CardContext;
use crate::registry::NodeRegistry;

const FORMAT: &str = "lexical";

/// Rewrite the URLs of a serialized Lexical document.
pub fn transform_lexical<R: UrlRewriter>(
    serialized: &str,
    rewriter: &R,
    cx: &TransformContext<'_>,
    nodes: &NodeRegistry,
) -> Result<String, Error> {
    if let Some(early_exit) = rewriter.early_exit(cx)
        && !early_exit.is_match(serialized)
    {
        tracing::debug!(direction = %rewriter.direction(), "No site URLs in Lexical, skipping");
        return Ok(serialized.to_owned());
    }

    let mut doc: Value = serde_json::from_str(serialized).map_err(|source| Error::InvalidDocument {
        format: FORMAT,
        source,
    })?;

    let Some(Value::Array(children)) = doc.get_mut("root").and_then(|root| root.get_mut("children"))
    else {
        return Err(Error::MalformedDocument {
            format: FORMAT,
            reason: "missing root.children array".to_owned(),
        });
    };

    let walker = Walker {
        rewriter,
        cx,
        card_cx: CardContext::new(rewriter.direction(), *cx),
        nodes,
    };
    for child in children {
        walker.visit(child);
    }

    serde_json::to_string(&doc).map_err(|source| Error::InvalidDocument {
        format: FORMAT,
        source,
    })
}

struct Walker<'w, R> {
    rewriter: &'w R,
    cx: &'w TransformContext<'w>,
    card_cx: CardContext<'w>,
    nodes: &'w NodeRegistry,
}

impl<R: UrlRewriter> Walker<'_, R> {
    fn visit(&self, node: &mut Value) {
        let card_map = node
            .get("type")
            .and_then(Value::as_str)
            .and_then(|node_type| self.nodes.get(node_type));

        if let Some(map) = card_map {
            map.apply(node, &self.card_cx);
        } else if let Some(Value::String(url)) = node.get_mut("url") {
            *url = self.rewriter.rewrite(url, self.cx);
        }

        if let Some(Value::Array(children)) = node.get_mut("children") {
            for child in children {
                self.visit(child);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use relink_core::{AbsoluteToRelative, RelativeToAbsolute, ToTransformReady, TransformOptions};
    use serde_json::json;

    use crate::map::UrlTransformMap;

    fn doc(children: &Value) -> String {
        serde_json::to_string(&json!({
            "root": {"children": children, "direction": null, "type": "root", "version": 1}
        }))
        .unwrap()
    }

    #[test]
    fn test_link_node_relative_to_absolute() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("http://my-blog.com", &options).with_item_path(Some("/my-post"));
        let input = doc(&json!([
            {"type": "paragraph", "children": [
                {"type": "link", "url": "/inline", "children": [{"type": "text", "text": "x"}]},
            ]},
        ]));
        let output = transform_lexical(&input, &RelativeToAbsolute, &cx, &NodeRegistry::new()).unwrap();
        assert_eq!(
            output,
            doc(&json!([
                {"type": "paragraph", "children": [
                    {"type": "link", "url": "http://my-blog.com/inline", "children": [{"type": "text", "text": "x"}]},
                ]},
            ]))
        );
    }

    #[test]
    fn test_escaped_slashes_and_default_port() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com:443/", &options);
        let input = r#"{"root":{"children":[{"type":"link","url":"https:\/\/my-blog.com\/x"}]}}"#;
        let output = transform_lexical(input, &AbsoluteToRelative, &cx, &NodeRegistry::new()).unwrap();
        assert_eq!(output, r#"{"root":{"children":[{"type":"link","url":"/x"}]}}"#);
    }

    #[test]
    fn test_nested_lists_are_visited() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let input = doc(&json!([
            {"type": "list", "children": [
                {"type": "listitem", "children": [
                    {"type": "list", "children": [
                        {"type": "listitem", "children": [
                            {"type": "autolink", "url": "https://my-blog.com/deep"},
                        ]},
                    ]},
                ]},
            ]},
        ]));
        let output = transform_lexical(&input, &AbsoluteToRelative, &cx, &NodeRegistry::new()).unwrap();
        assert!(output.contains(r#""url":"/deep""#));
    }

    #[test]
    fn test_card_nodes_use_transform_map() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let nodes = NodeRegistry::new().with(
            "gallery",
            UrlTransformMap::new()
                .each("images", UrlTransformMap::new().url("src").html("caption"))
                .html("caption"),
        );
        let input = doc(&json!([
            {
                "type": "gallery",
                "url": "/left-alone",
                "images": [
                    {"src": "/a.png", "caption": "<a href=\"/x\">x</a>"},
                    {"src": "https://other.com/b.png"},
                ],
                "caption": "",
            },
        ]));
        let output = transform_lexical(&input, &ToTransformReady, &cx, &nodes).unwrap();
        assert_eq!(
            output,
            doc(&json!([
                {
                    "type": "gallery",
                    "url": "/left-alone",
                    "images": [
                        {"src": "__GHOST_URL__/a.png", "caption": "<a href=\"__GHOST_URL__/x\">x</a>"},
                        {"src": "https://other.com/b.png"},
                    ],
                    "caption": "",
                },
            ]))
        );
    }

    #[test]
    fn test_missing_root_children_is_malformed() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let err = transform_lexical(r#"{"root": {}}"#, &RelativeToAbsolute, &cx, &NodeRegistry::new())
            .unwrap_err();
        assert!(matches!(err, Error::MalformedDocument { format: "lexical", .. }));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        let err = transform_lexical("[", &RelativeToAbsolute, &cx, &NodeRegistry::new()).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument { format: "lexical", .. }));
    }
}
