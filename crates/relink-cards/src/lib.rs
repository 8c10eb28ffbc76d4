//! URL rewriting for Mobiledoc and Lexical documents.
//!
//! Both formats are JSON. The walkers parse a serialized document, rewrite
//! URL-bearing fields in the parsed copy and serialize it again, so the
//! caller's input is never touched. Host-defined content blocks (Mobiledoc
//! cards, Lexical card nodes) are rewritten through registries: a
//! [`CardRegistry`] of [`CardTransformer`]s and a [`NodeRegistry`] of
//! [`UrlTransformMap`]s. [`presets`] provides both for the standard cards.

mod context;
mod lexical;
mod map;
mod mobiledoc;
pub mod presets;
mod registry;

use relink_core::{Error, ReadyTarget, TransformOptions, replace_transform_ready};

pub use context::CardContext;
pub use lexical::transform_lexical;
pub use map::{UrlTransform, UrlTransformMap};
pub use mobiledoc::transform_mobiledoc;
pub use registry::{CardRegistry, CardTransformer, MapCardTransformer, NodeRegistry};

/// Expand every transform-ready URL in a serialized JSON document.
///
/// The document is validated first; the expansion itself works on the raw
/// string, so formatting and key order are kept.
pub fn decode_transform_ready(
    serialized: &str,
    format: &'static str,
    site_url: &str,
    options: &TransformOptions,
    target: ReadyTarget,
) -> Result<String, Error> {
    serde_json::from_str::<serde::de::IgnoredAny>(serialized)
        .map_err(|source| Error::InvalidDocument { format, source })?;
    Ok(replace_transform_ready(serialized, site_url, options, target))
}
