//! Transformation options.

/// Placeholder that stands in for the site URL in transform-ready content.
pub const DEFAULT_REPLACEMENT_STR: &str = "__GHOST_URL__";
/// Default path prefix of uploaded images.
pub const DEFAULT_STATIC_IMAGE_URL_PREFIX: &str = "content/images";
/// Default path prefix of uploaded files.
pub const DEFAULT_STATIC_FILES_URL_PREFIX: &str = "content/files";
/// Default path prefix of uploaded media.
pub const DEFAULT_STATIC_MEDIA_URL_PREFIX: &str = "content/media";

/// Options shared by every URL primitive and format walker.
///
/// Built once by the orchestrator and passed by reference; primitives never
/// rebuild or merge options themselves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    /// Only rewrite URLs that point at static assets.
    pub assets_only: bool,
    /// Force `https:` on URLs produced by relative-to-absolute conversion.
    pub secure: bool,
    /// Treat `http:` and `https:` URLs on the site host as the same site.
    pub ignore_protocol: bool,
    /// Strip the site's subdirectory from relative output.
    pub without_subdirectory: bool,
    /// Path prefix of uploaded images, without leading or trailing slash.
    pub static_image_url_prefix: String,
    /// Path prefix of uploaded files.
    pub static_files_url_prefix: String,
    /// Path prefix of uploaded media.
    pub static_media_url_prefix: String,
    /// CDN base serving images instead of the site origin.
    pub image_base_url: Option<String>,
    /// CDN base serving files instead of the site origin.
    pub files_base_url: Option<String>,
    /// CDN base serving media instead of the site origin.
    pub media_base_url: Option<String>,
    /// Token written in place of the site URL in transform-ready content.
    pub replacement_str: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            assets_only: false,
            secure: false,
            ignore_protocol: true,
            without_subdirectory: false,
            static_image_url_prefix: DEFAULT_STATIC_IMAGE_URL_PREFIX.to_owned(),
            static_files_url_prefix: DEFAULT_STATIC_FILES_URL_PREFIX.to_owned(),
            static_media_url_prefix: DEFAULT_STATIC_MEDIA_URL_PREFIX.to_owned(),
            image_base_url: None,
            files_base_url: None,
            media_base_url: None,
            replacement_str: DEFAULT_REPLACEMENT_STR.to_owned(),
        }
    }
}

impl TransformOptions {
    /// Check whether `url` references one of the static asset prefixes.
    ///
    /// Used by `assets_only` filtering; the prefix may appear anywhere in the
    /// URL so absolute, root-relative and CDN URLs are all recognised.
    pub(crate) fn matches_asset_prefix(&self, url: &str) -> bool {
        [
            &self.static_image_url_prefix,
            &self.static_files_url_prefix,
            &self.static_media_url_prefix,
        ]
        .into_iter()
        .filter(|prefix| !prefix.is_empty())
        .any(|prefix| url.contains(prefix.as_str()))
    }

    /// Configured CDN bases paired with the static prefix they serve.
    ///
    /// Media is checked first, then files, then images.
    pub(crate) fn cdn_bases(&self) -> impl Iterator<Item = (&str, &str)> {
        [
            (&self.media_base_url, &self.static_media_url_prefix),
            (&self.files_base_url, &self.static_files_url_prefix),
            (&self.image_base_url, &self.static_image_url_prefix),
        ]
        .into_iter()
        .filter_map(|(base, prefix)| {
            base.as_deref()
                .filter(|base| !base.is_empty())
                .map(|base| (base, prefix.trim_matches('/')))
        })
    }
}
