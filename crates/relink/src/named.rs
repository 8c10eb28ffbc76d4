//! Named site paths.

/// Which API a URL is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiKind {
    Admin,
    Content,
}

impl ApiKind {
    pub(crate) fn path(self) -> &'static str {
        match self {
            Self::Admin => "/ghost/api/admin/",
            Self::Content => "/ghost/api/content/",
        }
    }
}

/// Well-known site locations resolvable with `UrlUtils::url_for`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedPath<'a> {
    /// Site home page.
    Home,
    /// Admin application.
    Admin,
    /// API root. With `cors` the absolute URL is protocol-relative.
    Api { kind: ApiKind, cors: bool },
    /// Sitemap stylesheet.
    SitemapXsl,
    /// An image URL; root-relative paths become absolute on request.
    Image(&'a str),
    /// A navigation entry; links on the site are made relative or absolute
    /// on request, everything else passes through.
    Nav(&'a str),
}

/// Path prefix of the admin application.
pub(crate) const ADMIN_PATH: &str = "/ghost/";

/// First-level slugs reserved by the application.
pub(crate) const PROTECTED_SLUGS: [&str; 3] = ["ghost", "rss", "amp"];
