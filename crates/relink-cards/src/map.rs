//! Declarative description of URL-bearing card properties.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::context::CardContext;

/// How a single card property is rewritten.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawTransform")]
pub enum UrlTransform {
    /// The property is a single URL (or an array of URLs).
    Url,
    /// The property is an HTML fragment.
    Html,
    /// The property is a Markdown document.
    Markdown,
    /// The property is an object, or an array of objects, described by a
    /// nested map.
    Each(UrlTransformMap),
}

#[derive(Deserialize)]
#[serde(rename_all = "lowercase")]
enum LeafKind {
    Url,
    Html,
    Markdown,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTransform {
    Leaf(LeafKind),
    Nested(UrlTransformMap),
}

impl From<RawTransform> for UrlTransform {
    fn from(raw: RawTransform) -> Self {
        match raw {
            RawTransform::Leaf(LeafKind::Url) => Self::Url,
            RawTransform::Leaf(LeafKind::Html) => Self::Html,
            RawTransform::Leaf(LeafKind::Markdown) => Self::Markdown,
            RawTransform::Nested(map) => Self::Each(map),
        }
    }
}

/// Map from a property path to the way it is rewritten.
///
/// Paths may be dotted (`metadata.thumbnail`) to reach nested objects.
/// Deserializes from the JSON shape used by card definitions:
///
/// ```
/// use relink_cards::{UrlTransform, UrlTransformMap};
///
/// let map: UrlTransformMap = serde_json::from_str(
///     r#"{"src": "url", "caption": "html", "images": {"src": "url"}}"#,
/// ).unwrap();
/// assert_eq!(map.get("src"), Some(&UrlTransform::Url));
/// assert_eq!(map, UrlTransformMap::new()
///     .url("src")
///     .html("caption")
///     .each("images", UrlTransformMap::new().url("src")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct UrlTransformMap(BTreeMap<String, UrlTransform>);

impl UrlTransformMap {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn url(self, path: &str) -> Self {
        self.with(path, UrlTransform::Url)
    }

    #[must_use]
    pub fn html(self, path: &str) -> Self {
        self.with(path, UrlTransform::Html)
    }

    #[must_use]
    pub fn markdown(self, path: &str) -> Self {
        self.with(path, UrlTransform::Markdown)
    }

    #[must_use]
    pub fn each(self, path: &str, map: UrlTransformMap) -> Self {
        self.with(path, UrlTransform::Each(map))
    }

    #[must_use]
    pub fn with(mut self, path: &str, transform: UrlTransform) -> Self {
        self.0.insert(path.to_owned(), transform);
        self
    }

    pub fn get(&self, path: &str) -> Option<&UrlTransform> {
        self.0.get(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &UrlTransform)> {
        self.0.iter().map(|(path, transform)| (path.as_str(), transform))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rewrite the properties of `value` described by this map.
    ///
    /// Missing properties and values of an unexpected JSON type are skipped.
    pub fn apply(&self, value: &mut Value, cx: &CardContext<'_>) {
        for (path, transform) in self.iter() {
            if let Some(target) = lookup_mut(value, path) {
                apply_transform(target, transform, cx);
            }
        }
    }
}

fn apply_transform(target: &mut Value, transform: &UrlTransform, cx: &CardContext<'_>) {
    if let Value::Array(items) = target {
        for item in items {
            match transform {
                UrlTransform::Each(map) => map.apply(item, cx),
                leaf => apply_transform(item, leaf, cx),
            }
        }
        return;
    }

    match transform {
        UrlTransform::Each(map) if target.is_object() => map.apply(target, cx),
        UrlTransform::Url => rewrite_string(target, |url| cx.url(url)),
        UrlTransform::Html => rewrite_string(target, |html| cx.html(html)),
        UrlTransform::Markdown => rewrite_string(target, |markdown| cx.markdown(markdown)),
        UrlTransform::Each(_) => {}
    }
}

fn rewrite_string(target: &mut Value, rewrite: impl FnOnce(&str) -> String) {
    if let Value::String(value) = target {
        *value = rewrite(value);
    }
}

/// Walk a dotted property path through nested objects.
fn lookup_mut<'v>(value: &'v mut Value, path: &str) -> Option<&'v mut Value> {
    path.split('.')
        .try_fold(value, |current, key| current.as_object_mut()?.get_mut(key))
}
