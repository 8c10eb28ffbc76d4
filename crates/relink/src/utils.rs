//! The orchestrator: one configured site, every format and direction.

use relink_cards::{CardRegistry, NodeRegistry, presets};
use relink_config::Config;
use relink_core::{
    AbsoluteToRelative, AbsoluteToTransformReady, Direction, Error, ReadyTarget,
    RelativeToAbsolute, ToTransformReady, TransformContext, TransformOptions, UrlRewriter,
};
use url::Url;

use crate::format::{Format, Operation};
use crate::named::{ADMIN_PATH, NamedPath, PROTECTED_SLUGS};
use crate::permalink::PermalinkResolver;
use crate::plaintext::transform_plaintext;

/// URL utilities bound to one site.
///
/// Holds the site URL (always ending with `/`), the optional admin URL, the
/// transformation options and the card/node registries. Every operation
/// borrows this configuration; nothing is rebuilt per call.
#[derive(Debug, Clone)]
pub struct UrlUtils {
    site_url: String,
    admin_url: Option<String>,
    options: TransformOptions,
    cards: CardRegistry,
    nodes: NodeRegistry,
}

impl UrlUtils {
    /// Create utilities for `site_url` with default options and the standard
    /// card and node presets.
    pub fn new(site_url: &str) -> Result<Self, Error> {
        Ok(Self {
            site_url: normalize_base(site_url)?,
            admin_url: None,
            options: TransformOptions::default(),
            cards: presets::standard_cards(),
            nodes: presets::standard_nodes(),
        })
    }

    /// Build from a loaded configuration file.
    pub fn from_config(config: &Config) -> Result<Self, Error> {
        let options = TransformOptions {
            assets_only: config.transform.assets_only,
            secure: config.transform.secure,
            ignore_protocol: config.transform.ignore_protocol,
            static_image_url_prefix: config.assets.image_prefix.clone(),
            static_files_url_prefix: config.assets.files_prefix.clone(),
            static_media_url_prefix: config.assets.media_prefix.clone(),
            image_base_url: config.assets.image_base_url.clone(),
            files_base_url: config.assets.files_base_url.clone(),
            media_base_url: config.assets.media_base_url.clone(),
            replacement_str: config.transform.replacement.clone(),
            ..TransformOptions::default()
        };

        let utils = Self::new(&config.site.url)?.with_transform_options(options);
        match &config.site.admin_url {
            Some(admin_url) => utils.with_admin_url(admin_url),
            None => Ok(utils),
        }
    }

    pub fn with_admin_url(mut self, admin_url: &str) -> Result<Self, Error> {
        self.admin_url = Some(normalize_base(admin_url)?);
        Ok(self)
    }

    #[must_use]
    pub fn with_transform_options(mut self, options: TransformOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use]
    pub fn with_cards(mut self, cards: CardRegistry) -> Self {
        self.cards = cards;
        self
    }

    #[must_use]
    pub fn with_nodes(mut self, nodes: NodeRegistry) -> Self {
        self.nodes = nodes;
        self
    }

    /// Copy of these utilities with adjusted options.
    ///
    /// ```
    /// let utils = relink::UrlUtils::new("https://my-blog.com").unwrap();
    /// let assets = utils.with_options(|opts| opts.assets_only = true);
    /// assert_eq!(assets.relative_to_absolute("/about", None), "/about");
    /// ```
    #[must_use]
    pub fn with_options(&self, adjust: impl FnOnce(&mut TransformOptions)) -> Self {
        let mut utils = self.clone();
        adjust(&mut utils.options);
        utils
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    pub fn get_site_url(&self) -> &str {
        &self.site_url
    }

    /// Site subdirectory without trailing slash (`/blog`), or `""`.
    pub fn get_subdir(&self) -> String {
        Url::parse(&self.site_url)
            .map(|url| url.path().trim_end_matches('/').to_owned())
            .unwrap_or_default()
    }

    /// Admin URL including the site subdirectory, if an admin URL is set.
    pub fn get_admin_url(&self) -> Option<String> {
        let admin_url = self.admin_url.as_deref()?;
        Some(relink_core::url_join(
            &[admin_url, &self.get_subdir(), "/"],
            admin_url,
        ))
    }

    /// Slugs that content may not use because the application routes them.
    pub fn get_protected_slugs(&self) -> Vec<String> {
        let subdir = self.get_subdir();
        let mut slugs: Vec<String> = PROTECTED_SLUGS.iter().map(|&slug| slug.to_owned()).collect();
        if let Some(name) = subdir.trim_start_matches('/').split('/').next_back()
            && !name.is_empty()
        {
            slugs.push(name.to_owned());
        }
        slugs
    }

    fn context<'a>(&'a self, item_path: Option<&'a str>) -> TransformContext<'a> {
        TransformContext::new(&self.site_url, &self.options).with_item_path(item_path)
    }

    // Path helpers

    pub fn url_join(&self, parts: &[&str]) -> String {
        relink_core::url_join(parts, &self.site_url)
    }

    /// Build a site URL for `path`, absolute or root-relative.
    pub fn create_url(&self, path: &str, absolute: bool) -> String {
        if absolute {
            self.url_join(&[&self.site_url, path])
        } else {
            self.url_join(&["/", &self.get_subdir(), path])
        }
    }

    /// Check whether `url` (absolute or relative) points into the site.
    ///
    /// The protocol is not compared.
    pub fn is_site_url(&self, url: &str) -> bool {
        let Ok(site) = Url::parse(&self.site_url) else {
            return false;
        };
        site.join(url).is_ok_and(|parsed| {
            parsed.host_str() == site.host_str()
                && parsed.port() == site.port()
                && parsed.path().starts_with(site.path())
        })
    }

    pub fn is_ssl(&self, url: &str) -> bool {
        Url::parse(url).is_ok_and(|parsed| parsed.scheme() == "https")
    }

    /// Resolve a named site location.
    pub fn url_for(&self, path: NamedPath<'_>, absolute: bool) -> String {
        match path {
            NamedPath::Home => self.create_url("/", absolute),
            NamedPath::SitemapXsl => self.create_url("/sitemap.xsl", absolute),
            NamedPath::Admin => self.admin_path(ADMIN_PATH, absolute),
            NamedPath::Api { kind, cors } => {
                let url = self.admin_path(kind.path(), absolute);
                if absolute && cors {
                    url.split_once("//")
                        .map_or(url.clone(), |(_, rest)| format!("//{rest}"))
                } else {
                    url
                }
            }
            NamedPath::Image(image) => {
                if absolute && image.starts_with('/') && !image.starts_with("//") {
                    self.relative_to_absolute(image, None)
                } else {
                    image.to_owned()
                }
            }
            NamedPath::Nav(nav) => {
                let relative = self.absolute_to_relative(nav);
                if relative == nav {
                    nav.to_owned()
                } else if absolute {
                    self.relative_to_absolute(&relative, None)
                } else {
                    relative
                }
            }
        }
    }

    fn admin_path(&self, path: &str, absolute: bool) -> String {
        if absolute {
            let base = self.get_admin_url().unwrap_or_else(|| self.site_url.clone());
            relink_core::url_join(&[&base, path], &base)
        } else {
            self.create_url(path, false)
        }
    }

    /// Resolve a permalink template for `resource` into a site URL.
    pub fn url_for_permalink<P: PermalinkResolver>(
        &self,
        resolver: &P,
        permalink: &str,
        resource: &P::Resource,
        timezone: &str,
        absolute: bool,
    ) -> String {
        let path = resolver.replace_permalink(permalink, resource, timezone);
        self.create_url(&path, absolute)
    }

    // Single URLs

    pub fn relative_to_absolute(&self, url: &str, item_path: Option<&str>) -> String {
        RelativeToAbsolute.rewrite(url, &self.context(item_path))
    }

    pub fn absolute_to_relative(&self, url: &str) -> String {
        AbsoluteToRelative.rewrite(url, &self.context(None))
    }

    pub fn to_transform_ready(&self, url: &str, item_path: Option<&str>) -> String {
        ToTransformReady.rewrite(url, &self.context(item_path))
    }

    pub fn absolute_to_transform_ready(&self, url: &str) -> String {
        AbsoluteToTransformReady.rewrite(url, &self.context(None))
    }

    pub fn relative_to_transform_ready(&self, url: &str, item_path: Option<&str>) -> String {
        relink_core::relative_to_transform_ready(url, &self.site_url, item_path, &self.options)
    }

    pub fn transform_ready_to_absolute(&self, url: &str) -> String {
        relink_core::transform_ready_to_absolute(url, &self.site_url, &self.options)
    }

    pub fn transform_ready_to_relative(&self, url: &str) -> String {
        relink_core::transform_ready_to_relative(url, &self.site_url, &self.options)
    }

    // Documents

    /// Apply `operation` to a document of the given format.
    pub fn transform(
        &self,
        format: Format,
        operation: Operation,
        doc: &str,
        item_path: Option<&str>,
    ) -> Result<String, Error> {
        tracing::debug!(%format, %operation, len = doc.len(), "Transforming document");
        match operation {
            Operation::Rewrite(direction) => self.rewrite(format, direction, doc, item_path),
            Operation::Expand(target) => self.expand(format, target, doc),
        }
    }

    fn rewrite(
        &self,
        format: Format,
        direction: Direction,
        doc: &str,
        item_path: Option<&str>,
    ) -> Result<String, Error> {
        let cx = self.context(item_path);
        Ok(match format {
            Format::Html => relink_html::transform_html(doc, &direction, &cx),
            Format::Markdown => relink_markdown::transform_markdown(doc, &direction, &cx),
            Format::Mobiledoc => relink_cards::transform_mobiledoc(doc, &direction, &cx, &self.cards)?,
            Format::Lexical => relink_cards::transform_lexical(doc, &direction, &cx, &self.nodes)?,
            Format::Plaintext => transform_plaintext(doc, &direction, &cx),
        })
    }

    fn expand(&self, format: Format, target: ReadyTarget, doc: &str) -> Result<String, Error> {
        match format {
            Format::Mobiledoc | Format::Lexical => relink_cards::decode_transform_ready(
                doc,
                format.as_str(),
                &self.site_url,
                &self.options,
                target,
            ),
            Format::Html | Format::Markdown | Format::Plaintext => Ok(
                relink_core::replace_transform_ready(doc, &self.site_url, &self.options, target),
            ),
        }
    }

    fn expand_text(&self, doc: &str, target: ReadyTarget) -> String {
        relink_core::replace_transform_ready(doc, &self.site_url, &self.options, target)
    }

    // HTML

    pub fn html_relative_to_absolute(&self, html: &str, item_path: Option<&str>) -> String {
        relink_html::transform_html(html, &RelativeToAbsolute, &self.context(item_path))
    }

    pub fn html_absolute_to_relative(&self, html: &str) -> String {
        relink_html::transform_html(html, &AbsoluteToRelative, &self.context(None))
    }

    pub fn html_to_transform_ready(&self, html: &str, item_path: Option<&str>) -> String {
        relink_html::transform_html(html, &ToTransformReady, &self.context(item_path))
    }

    pub fn html_absolute_to_transform_ready(&self, html: &str) -> String {
        relink_html::transform_html(html, &AbsoluteToTransformReady, &self.context(None))
    }

    pub fn html_transform_ready_to_absolute(&self, html: &str) -> String {
        self.expand_text(html, ReadyTarget::Absolute)
    }

    pub fn html_transform_ready_to_relative(&self, html: &str) -> String {
        self.expand_text(html, ReadyTarget::Relative)
    }

    // Markdown

    pub fn markdown_relative_to_absolute(&self, markdown: &str, item_path: Option<&str>) -> String {
        relink_markdown::transform_markdown(markdown, &RelativeToAbsolute, &self.context(item_path))
    }

    pub fn markdown_absolute_to_relative(&self, markdown: &str) -> String {
        relink_markdown::transform_markdown(markdown, &AbsoluteToRelative, &self.context(None))
    }

    pub fn markdown_to_transform_ready(&self, markdown: &str, item_path: Option<&str>) -> String {
        relink_markdown::transform_markdown(markdown, &ToTransformReady, &self.context(item_path))
    }

    pub fn markdown_absolute_to_transform_ready(&self, markdown: &str) -> String {
        relink_markdown::transform_markdown(markdown, &AbsoluteToTransformReady, &self.context(None))
    }

    pub fn markdown_transform_ready_to_absolute(&self, markdown: &str) -> String {
        self.expand_text(markdown, ReadyTarget::Absolute)
    }

    pub fn markdown_transform_ready_to_relative(&self, markdown: &str) -> String {
        self.expand_text(markdown, ReadyTarget::Relative)
    }

    // Mobiledoc

    pub fn mobiledoc_relative_to_absolute(
        &self,
        mobiledoc: &str,
        item_path: Option<&str>,
    ) -> Result<String, Error> {
        self.rewrite(Format::Mobiledoc, Direction::RelativeToAbsolute, mobiledoc, item_path)
    }

    pub fn mobiledoc_absolute_to_relative(&self, mobiledoc: &str) -> Result<String, Error> {
        self.rewrite(Format::Mobiledoc, Direction::AbsoluteToRelative, mobiledoc, None)
    }

    pub fn mobiledoc_to_transform_ready(
        &self,
        mobiledoc: &str,
        item_path: Option<&str>,
    ) -> Result<String, Error> {
        self.rewrite(Format::Mobiledoc, Direction::ToTransformReady, mobiledoc, item_path)
    }

    pub fn mobiledoc_absolute_to_transform_ready(&self, mobiledoc: &str) -> Result<String, Error> {
        self.rewrite(Format::Mobiledoc, Direction::AbsoluteToTransformReady, mobiledoc, None)
    }

    pub fn mobiledoc_transform_ready_to_absolute(&self, mobiledoc: &str) -> Result<String, Error> {
        self.expand(Format::Mobiledoc, ReadyTarget::Absolute, mobiledoc)
    }

    pub fn mobiledoc_transform_ready_to_relative(&self, mobiledoc: &str) -> Result<String, Error> {
        self.expand(Format::Mobiledoc, ReadyTarget::Relative, mobiledoc)
    }

    // Lexical

    pub fn lexical_relative_to_absolute(
        &self,
        lexical: &str,
        item_path: Option<&str>,
    ) -> Result<String, Error> {
        self.rewrite(Format::Lexical, Direction::RelativeToAbsolute, lexical, item_path)
    }

    pub fn lexical_absolute_to_relative(&self, lexical: &str) -> Result<String, Error> {
        self.rewrite(Format::Lexical, Direction::AbsoluteToRelative, lexical, None)
    }

    pub fn lexical_to_transform_ready(
        &self,
        lexical: &str,
        item_path: Option<&str>,
    ) -> Result<String, Error> {
        self.rewrite(Format::Lexical, Direction::ToTransformReady, lexical, item_path)
    }

    pub fn lexical_absolute_to_transform_ready(&self, lexical: &str) -> Result<String, Error> {
        self.rewrite(Format::Lexical, Direction::AbsoluteToTransformReady, lexical, None)
    }

    pub fn lexical_transform_ready_to_absolute(&self, lexical: &str) -> Result<String, Error> {
        self.expand(Format::Lexical, ReadyTarget::Absolute, lexical)
    }

    pub fn lexical_transform_ready_to_relative(&self, lexical: &str) -> Result<String, Error> {
        self.expand(Format::Lexical, ReadyTarget::Relative, lexical)
    }

    // Plaintext

    pub fn plaintext_relative_to_absolute(&self, text: &str, item_path: Option<&str>) -> String {
        transform_plaintext(text, &RelativeToAbsolute, &self.context(item_path))
    }

    pub fn plaintext_absolute_to_relative(&self, text: &str) -> String {
        transform_plaintext(text, &AbsoluteToRelative, &self.context(None))
    }

    pub fn plaintext_to_transform_ready(&self, text: &str, item_path: Option<&str>) -> String {
        transform_plaintext(text, &ToTransformReady, &self.context(item_path))
    }

    pub fn plaintext_absolute_to_transform_ready(&self, text: &str) -> String {
        transform_plaintext(text, &AbsoluteToTransformReady, &self.context(None))
    }

    pub fn plaintext_transform_ready_to_absolute(&self, text: &str) -> String {
        self.expand_text(text, ReadyTarget::Absolute)
    }

    pub fn plaintext_transform_ready_to_relative(&self, text: &str) -> String {
        self.expand_text(text, ReadyTarget::Relative)
    }
}

/// Validate a base URL and make sure it ends with `/`.
fn normalize_base(url: &str) -> Result<String, Error> {
    let url = url.trim();
    Url::parse(url).map_err(|source| Error::InvalidSiteUrl {
        url: url.to_owned(),
        source,
    })?;
    Ok(relink_core::with_trailing_slash(url).into_owned())
}
