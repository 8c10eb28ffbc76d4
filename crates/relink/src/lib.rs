//! URL transformation for stored site content.
//!
//! Content is stored with links that must survive a change of site URL,
//! subdirectory, or CDN. This crate rewrites every URL embedded in HTML,
//! Markdown, Mobiledoc, Lexical and plaintext documents between three
//! representations:
//!
//! - absolute (`https://my-blog.com/blog/about/`)
//! - root-relative (`/blog/about/`)
//! - transform-ready (`__GHOST_URL__/about/`), independent of the current
//!   site URL and expanded again on read
//!
//! # Quick Start
//!
//! ```
//! use relink::UrlUtils;
//!
//! let utils = UrlUtils::new("https://my-blog.com/").unwrap();
//! let stored = utils.html_to_transform_ready(r#"<a href="/about/">About</a>"#, None);
//! assert_eq!(stored, r#"<a href="__GHOST_URL__/about/">About</a>"#);
//!
//! let moved = UrlUtils::new("https://new-home.org/").unwrap();
//! assert_eq!(
//!     moved.html_transform_ready_to_absolute(&stored),
//!     r#"<a href="https://new-home.org/about/">About</a>"#
//! );
//! ```

mod format;
mod named;
mod permalink;
mod plaintext;
mod utils;

pub use format::{Format, Operation};
pub use named::{ApiKind, NamedPath};
pub use permalink::PermalinkResolver;
pub use plaintext::transform_plaintext;
pub use utils::UrlUtils;

pub use relink_cards::{
    CardContext, CardRegistry, CardTransformer, MapCardTransformer, NodeRegistry, UrlTransform,
    UrlTransformMap, presets,
};
pub use relink_config::{CliSettings, Config, ConfigError};
pub use relink_core::{
    AbsoluteToRelative, AbsoluteToTransformReady, Direction, Error, ReadyTarget,
    RelativeToAbsolute, ToTransformReady, TransformContext, TransformOptions, UrlRewriter,
};
pub use relink_html::transform_html;
pub use relink_markdown::transform_markdown;
