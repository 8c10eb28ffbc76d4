//! Registries of host-defined cards (Mobiledoc) and nodes (Lexical).

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use relink_core::Direction;
use serde_json::Value;

use crate::context::CardContext;
use crate::map::UrlTransformMap;

/// Rewrites the payload of one Mobiledoc card type.
///
/// Every method defaults to returning the payload unchanged, so a
/// transformer only implements the directions it cares about.
pub trait CardTransformer: Send + Sync {
    /// Card name as it appears in the document's `cards` section.
    fn name(&self) -> &str;

    fn absolute_to_relative(&self, payload: Value, _cx: &CardContext<'_>) -> Value {
        payload
    }

    fn relative_to_absolute(&self, payload: Value, _cx: &CardContext<'_>) -> Value {
        payload
    }

    fn to_transform_ready(&self, payload: Value, _cx: &CardContext<'_>) -> Value {
        payload
    }
}

/// Dispatch a payload to the transformer method matching `cx.direction`.
pub(crate) fn transform_card(
    transformer: &dyn CardTransformer,
    payload: Value,
    cx: &CardContext<'_>,
) -> Value {
    match cx.direction {
        Direction::RelativeToAbsolute => transformer.relative_to_absolute(payload, cx),
        Direction::AbsoluteToRelative => transformer.absolute_to_relative(payload, cx),
        Direction::ToTransformReady | Direction::AbsoluteToTransformReady => {
            transformer.to_transform_ready(payload, cx)
        }
    }
}

/// Card transformer driven by a [`UrlTransformMap`].
#[derive(Debug, Clone)]
pub struct MapCardTransformer {
    name: String,
    map: UrlTransformMap,
}

impl MapCardTransformer {
    pub fn new(name: impl Into<String>, map: UrlTransformMap) -> Self {
        Self {
            name: name.into(),
            map,
        }
    }

    fn apply(&self, mut payload: Value, cx: &CardContext<'_>) -> Value {
        self.map.apply(&mut payload, cx);
        payload
    }
}

impl CardTransformer for MapCardTransformer {
    fn name(&self) -> &str {
        &self.name
    }

    fn absolute_to_relative(&self, payload: Value, cx: &CardContext<'_>) -> Value {
        self.apply(payload, cx)
    }

    fn relative_to_absolute(&self, payload: Value, cx: &CardContext<'_>) -> Value {
        self.apply(payload, cx)
    }

    fn to_transform_ready(&self, payload: Value, cx: &CardContext<'_>) -> Value {
        self.apply(payload, cx)
    }
}

/// Card transformers keyed by card name.
#[derive(Clone, Default)]
pub struct CardRegistry {
    cards: HashMap<String, Arc<dyn CardTransformer>>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a transformer, replacing any previous one with the same name.
    pub fn register(&mut self, transformer: impl CardTransformer + 'static) {
        self.cards
            .insert(transformer.name().to_owned(), Arc::new(transformer));
    }

    #[must_use]
    pub fn with(mut self, transformer: impl CardTransformer + 'static) -> Self {
        self.register(transformer);
        self
    }

    pub fn get(&self, name: &str) -> Option<&dyn CardTransformer> {
        self.cards.get(name).map(|card| &**card)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl fmt::Debug for CardRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.cards.keys().collect();
        names.sort();
        f.debug_struct("CardRegistry").field("cards", &names).finish()
    }
}

/// Lexical node types with URL-bearing properties, keyed by node `type`.
#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: HashMap<String, UrlTransformMap>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, node_type: impl Into<String>, map: UrlTransformMap) {
        self.nodes.insert(node_type.into(), map);
    }

    #[must_use]
    pub fn with(mut self, node_type: impl Into<String>, map: UrlTransformMap) -> Self {
        self.register(node_type, map);
        self
    }

    pub fn get(&self, node_type: &str) -> Option<&UrlTransformMap> {
        self.nodes.get(node_type)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::{TransformContext, TransformOptions};
    use serde_json::json;

    struct UppercaseTitle;

    impl CardTransformer for UppercaseTitle {
        fn name(&self) -> &str {
            "title"
        }

        fn relative_to_absolute(&self, mut payload: Value, _cx: &CardContext<'_>) -> Value {
            if let Some(Value::String(title)) = payload.get_mut("title") {
                *title = title.to_uppercase();
            }
            payload
        }
    }

    #[test]
    fn test_register_and_lookup() {
        let registry = CardRegistry::new()
            .with(UppercaseTitle)
            .with(MapCardTransformer::new("image", UrlTransformMap::new().url("src")));
        assert_eq!(registry.len(), 2);
        assert!(registry.get("image").is_some());
        assert!(registry.get("unknown").is_none());
        assert_eq!(format!("{registry:?}"), r#"CardRegistry { cards: ["image", "title"] }"#);
    }

    #[test]
    fn test_default_methods_are_noops() {
        let options = TransformOptions::default();
        let cx = CardContext::new(
            Direction::AbsoluteToRelative,
            TransformContext::new("https://my-blog.com/", &options),
        );
        let payload = json!({"title": "hello"});
        assert_eq!(transform_card(&UppercaseTitle, payload.clone(), &cx), payload);

        let cx = CardContext {
            direction: Direction::RelativeToAbsolute,
            ..cx
        };
        assert_eq!(transform_card(&UppercaseTitle, payload, &cx), json!({"title": "HELLO"}));
    }

    #[test]
    fn test_map_transformer_serves_every_direction() {
        let options = TransformOptions::default();
        let transformer = MapCardTransformer::new("image", UrlTransformMap::new().url("src"));
        let transform = TransformContext::new("https://my-blog.com/", &options);

        let to_ready = CardContext::new(Direction::AbsoluteToTransformReady, transform);
        assert_eq!(
            transform_card(&transformer, json!({"src": "https://my-blog.com/a.png"}), &to_ready),
            json!({"src": "__GHOST_URL__/a.png"})
        );

        let to_relative = CardContext::new(Direction::AbsoluteToRelative, transform);
        assert_eq!(
            transform_card(&transformer, json!({"src": "https://my-blog.com/a.png"}), &to_relative),
            json!({"src": "/a.png"})
        );
    }

    #[test]
    fn test_node_registry() {
        let nodes = NodeRegistry::new().with("image", UrlTransformMap::new().url("src"));
        assert_eq!(nodes.get("image"), Some(&UrlTransformMap::new().url("src")));
        assert!(nodes.get("paragraph").is_none());
    }
}
