/// Resolves permalink templates such as `/:year/:slug/` for a resource.
///
/// Implemented by the host; relink only composes the resolved path with the
/// site URL.
pub trait PermalinkResolver {
    type Resource;

    /// Substitute the template's tokens for `resource`, using `timezone` for
    /// date-based tokens. Returns a root-relative path.
    fn replace_permalink(&self, permalink: &str, resource: &Self::Resource, timezone: &str) -> String;
}
