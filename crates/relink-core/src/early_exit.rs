//! Cheap pre-check for content that cannot contain site URLs.

use regex::{Regex, RegexBuilder};
use url::Url;

use crate::options::TransformOptions;

/// A `/` that may be written as `\/` inside JSON strings.
const SLASH: &str = r"\\?/";

/// Build a regex pattern matching any occurrence of the site URL or one of
/// the configured CDN bases.
///
/// Candidates are built from the parsed URL: the host, the port (optional
/// when it is the scheme's default) and the path. With `ignore_protocol` the
/// scheme is dropped, so `http:`, `https:` and protocol-relative occurrences
/// all match; without it the candidate's own scheme is optional. Slashes may
/// be JSON-escaped. The result is a superset check: a match does not
/// guarantee anything gets rewritten, but no match means nothing will be.
///
/// Returns `None` when there is no candidate to look for.
///
/// ```
/// use regex::Regex;
/// use relink_core::{TransformOptions, build_early_exit_match};
///
/// let options = TransformOptions::default();
/// let pattern = build_early_exit_match("https://example.com/", &options).unwrap();
/// let regex = Regex::new(&pattern).unwrap();
/// assert!(regex.is_match(r#"<a href="http://example.com/a">"#));
/// assert!(regex.is_match(r#"{"href":"https:\/\/example.com\/a"}"#));
/// assert!(!regex.is_match(r#"<a href="/a">"#));
/// ```
pub fn build_early_exit_match(site_url: &str, options: &TransformOptions) -> Option<String> {
    let candidates: Vec<String> = [
        Some(site_url),
        options.image_base_url.as_deref(),
        options.files_base_url.as_deref(),
        options.media_base_url.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(|url| url.trim().trim_end_matches('/'))
    .filter(|url| !url.is_empty())
    .map(|url| candidate_pattern(url, options.ignore_protocol))
    .collect();

    match candidates.as_slice() {
        [] => None,
        [single] => Some(single.clone()),
        many => Some(format!("(?:{})", many.join("|"))),
    }
}

/// Compile [`build_early_exit_match`] into a case-insensitive regex.
pub fn early_exit_regex(site_url: &str, options: &TransformOptions) -> Option<Regex> {
    let pattern = build_early_exit_match(site_url, options)?;
    RegexBuilder::new(&pattern)
        .case_insensitive(true)
        .build()
        .inspect_err(|e| tracing::warn!(error = %e, "Failed to compile early-exit pattern"))
        .ok()
}

fn candidate_pattern(url: &str, ignore_protocol: bool) -> String {
    let protocol_relative = url.starts_with("//");
    let parsed = if protocol_relative {
        Url::parse(&format!("http:{url}"))
    } else {
        Url::parse(url)
    };
    let Some((parsed, host)) = parsed
        .ok()
        .and_then(|parsed| parsed.host_str().map(regex::escape).map(|host| (parsed, host)))
    else {
        return escape_path(url);
    };

    let scheme = if ignore_protocol || protocol_relative {
        String::new()
    } else {
        format!("(?:{}:)?", regex::escape(parsed.scheme()))
    };
    // `Url::port` is `None` for the scheme's default port.
    let port = match (parsed.port(), parsed.port_or_known_default()) {
        (Some(port), _) => format!(":{port}"),
        (None, Some(default)) => format!("(?::{default})?"),
        (None, None) => String::new(),
    };
    let path = escape_path(parsed.path().trim_end_matches('/'));

    format!("{scheme}{SLASH}{SLASH}{host}{port}{path}")
}

fn escape_path(path: &str) -> String {
    regex::escape(path).replace('/', SLASH)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn regex(site_url: &str, options: &TransformOptions) -> Regex {
        early_exit_regex(site_url, options).unwrap()
    }

    #[test]
    fn test_site_url_only() {
        let regex = regex("https://my-blog.com", &TransformOptions::default());
        assert!(regex.is_match("https://my-blog.com/a"));
        assert!(regex.is_match("http://my-blog.com"));
        assert!(regex.is_match("//my-blog.com/a"));
        assert!(!regex.is_match("https://other.com/my-blog.com"));
        assert!(!regex.is_match("/relative/only"));
    }

    #[test]
    fn test_includes_cdn_bases() {
        let options = TransformOptions {
            image_base_url: Some("https://img.example/".to_owned()),
            media_base_url: Some("https://cdn.example/media".to_owned()),
            ..Default::default()
        };
        let regex = regex("https://my-blog.com/", &options);
        assert!(regex.is_match("https://my-blog.com/a"));
        assert!(regex.is_match("https://img.example/content/images/a.png"));
        assert!(regex.is_match("https://cdn.example/media/content/media/a.mp4"));
        assert!(!regex.is_match("https://cdn.example/other/a.mp4"));
    }

    #[test]
    fn test_strict_protocol_keeps_optional_scheme() {
        let options = TransformOptions {
            ignore_protocol: false,
            ..Default::default()
        };
        let pattern = build_early_exit_match("https://my-blog.com", &options).unwrap();
        assert!(pattern.starts_with("(?:https:)?"));
        let regex = regex("https://my-blog.com", &options);
        assert!(regex.is_match("https://my-blog.com/a"));
        assert!(regex.is_match("//my-blog.com/a"));
    }

    #[test]
    fn test_explicit_default_port_is_optional() {
        let regex = regex("https://my-blog.com:443/", &TransformOptions::default());
        assert!(regex.is_match(r#"<a href="https://my-blog.com/x">"#));
        assert!(regex.is_match(r#"<a href="https://my-blog.com:443/x">"#));
    }

    #[test]
    fn test_non_default_port_is_required() {
        let regex = regex("http://localhost:2368/", &TransformOptions::default());
        assert!(regex.is_match("http://localhost:2368/a"));
        assert!(!regex.is_match("http://localhost/a"));
    }

    #[test]
    fn test_json_escaped_slashes() {
        let options = TransformOptions {
            media_base_url: Some("https://cdn.example/c/site".to_owned()),
            ..Default::default()
        };
        let regex = regex("https://my-blog.com/blog/", &options);
        assert!(regex.is_match(r#"["href","https:\/\/my-blog.com\/blog\/x"]"#));
        assert!(regex.is_match(r#""src":"https:\/\/cdn.example\/c\/site\/content\/media\/a.mp4""#));
    }

    #[test]
    fn test_protocol_relative_base() {
        let regex = regex("https://my-blog.com/", &TransformOptions {
            files_base_url: Some("//files.example".to_owned()),
            ..Default::default()
        });
        assert!(regex.is_match("https://files.example/content/files/a.pdf"));
    }

    #[test]
    fn test_empty_site_url() {
        assert_eq!(build_early_exit_match("", &TransformOptions::default()), None);
        assert!(early_exit_regex("  ", &TransformOptions::default()).is_none());
    }

    #[test]
    fn test_regex_matches_case_insensitively() {
        let regex = regex("https://my-blog.com/", &TransformOptions::default());
        assert!(regex.is_match(r#"<a href="HTTP://My-Blog.com/a">"#));
        assert!(regex.is_match("//my-blog.com/a"));
        assert!(!regex.is_match("https://my-blogXcom/a"));
        assert!(!regex.is_match("/relative/only"));
    }
}
