//! URL primitives shared by every relink content walker.
//!
//! Three URL representations are supported:
//!
//! - **absolute**: `https://example.com/blog/about/`
//! - **relative**: `/blog/about/` (root-relative) or `about/` (page-relative)
//! - **transform-ready**: `__GHOST_URL__/about/`, a portable form that is
//!   re-expanded against whatever site URL is current when content is read
//!
//! The free functions in this crate convert a single URL between those
//! representations. Format walkers (HTML, Markdown, Mobiledoc, Lexical) never
//! make URL decisions themselves; they receive a [`UrlRewriter`] and a
//! [`TransformContext`] and only own the traversal of their document format.
//!
//! # Example
//!
//! ```
//! use relink_core::{TransformOptions, absolute_to_relative, relative_to_absolute};
//!
//! let options = TransformOptions::default();
//! let absolute = relative_to_absolute("/about", "https://example.com/", None, &options);
//! assert_eq!(absolute, "https://example.com/about");
//! assert_eq!(
//!     absolute_to_relative(&absolute, "https://example.com/", &options),
//!     "/about"
//! );
//! ```

mod absolute;
mod early_exit;
mod error;
mod join;
mod kind;
mod options;
mod relative;
mod rewriter;
mod transform_ready;

pub use absolute::absolute_to_relative;
pub use early_exit::{build_early_exit_match, early_exit_regex};
pub use error::Error;
pub use join::{deduplicate_subdirectory, url_join, with_trailing_slash};
pub use kind::{UrlKind, is_relative};
pub use options::{
    DEFAULT_REPLACEMENT_STR, DEFAULT_STATIC_FILES_URL_PREFIX, DEFAULT_STATIC_IMAGE_URL_PREFIX,
    DEFAULT_STATIC_MEDIA_URL_PREFIX, TransformOptions,
};
pub use relative::relative_to_absolute;
pub use rewriter::{
    AbsoluteToRelative, AbsoluteToTransformReady, Direction, RelativeToAbsolute,
    ToTransformReady, TransformContext, UrlRewriter,
};
pub use transform_ready::{
    absolute_to_transform_ready, relative_to_transform_ready, replace_transform_ready,
    to_transform_ready, transform_ready_to_absolute, transform_ready_to_relative,
    ReadyTarget,
};
