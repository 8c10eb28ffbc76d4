//! Transform maps for the standard content cards.
//!
//! Mobiledoc cards and Lexical nodes share property names, so both registries
//! are built from the same maps.

use crate::map::UrlTransformMap;
use crate::registry::{CardRegistry, MapCardTransformer, NodeRegistry};

/// Card names paired with their URL-bearing properties.
pub fn standard_maps() -> Vec<(&'static str, UrlTransformMap)> {
    vec![
        (
            "image",
            UrlTransformMap::new().url("src").url("href").html("caption"),
        ),
        (
            "gallery",
            UrlTransformMap::new()
                .each(
                    "images",
                    UrlTransformMap::new().url("src").url("href").html("caption"),
                )
                .html("caption"),
        ),
        (
            "bookmark",
            UrlTransformMap::new()
                .url("url")
                .url("metadata.url")
                .url("metadata.icon")
                .url("metadata.thumbnail")
                .html("caption"),
        ),
        ("html", UrlTransformMap::new().html("html")),
        ("markdown", UrlTransformMap::new().markdown("markdown")),
        (
            "video",
            UrlTransformMap::new()
                .url("src")
                .url("thumbnailSrc")
                .url("customThumbnailSrc")
                .html("caption"),
        ),
        (
            "audio",
            UrlTransformMap::new().url("src").url("thumbnailSrc"),
        ),
        ("file", UrlTransformMap::new().url("src")),
        (
            "product",
            UrlTransformMap::new()
                .url("productImageSrc")
                .url("productUrl")
                .html("productTitle")
                .html("productDescription"),
        ),
        (
            "header",
            UrlTransformMap::new()
                .url("backgroundImageSrc")
                .url("buttonUrl")
                .html("header")
                .html("subheader"),
        ),
        ("button", UrlTransformMap::new().url("buttonUrl")),
        ("callout", UrlTransformMap::new().html("calloutText")),
        (
            "toggle",
            UrlTransformMap::new().html("heading").html("content"),
        ),
    ]
}

/// Mobiledoc card registry covering the standard cards.
pub fn standard_cards() -> CardRegistry {
    standard_maps()
        .into_iter()
        .fold(CardRegistry::new(), |registry, (name, map)| {
            registry.with(MapCardTransformer::new(name, map))
        })
}

/// Lexical node registry covering the standard cards.
pub fn standard_nodes() -> NodeRegistry {
    standard_maps()
        .into_iter()
        .fold(NodeRegistry::new(), |registry, (name, map)| registry.with(name, map))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registries_cover_every_map() {
        let count = standard_maps().len();
        assert_eq!(standard_cards().len(), count);
        assert_eq!(standard_nodes().len(), count);
    }

    #[test]
    fn test_standard_names() {
        let cards = standard_cards();
        for name in ["image", "gallery", "bookmark", "html", "markdown", "video", "audio"] {
            assert!(cards.get(name).is_some(), "missing card {name}");
        }
        let nodes = standard_nodes();
        for name in ["file", "product", "header", "button", "callout", "toggle"] {
            assert!(nodes.get(name).is_some(), "missing node {name}");
        }
        assert!(nodes.get("paragraph").is_none());
    }
}
