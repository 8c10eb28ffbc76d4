//! Rewriting of individual attribute values.

use std::sync::LazyLock;

use regex::Regex;
use relink_core::{TransformContext, UrlRewriter};

/// `url(...)` references in inline styles, quoted or bare.
static STYLE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]*)"|'([^']*)'|([^'")\s]+))\s*\)"#).unwrap()
});

/// Attributes that may carry URLs.
pub(crate) const URL_ATTRIBUTES: [&str; 4] = ["href", "src", "srcset", "style"];

/// Rewrite the value of a URL-bearing attribute.
///
/// `attr` must already be lowercase. Returns `None` when the attribute is not
/// one the walker handles.
pub(crate) fn rewrite_attribute<R: UrlRewriter>(
    attr: &str,
    value: &str,
    rewriter: &R,
    cx: &TransformContext<'_>,
) -> Option<String> {
    let rewritten = match attr {
        "href" | "src" => rewriter.rewrite(value.trim(), cx),
        "srcset" => rewrite_srcset(value, rewriter, cx),
        "style" => rewrite_style(value, rewriter, cx),
        _ => return None,
    };
    Some(rewritten)
}

/// Rewrite each candidate URL of a `srcset` list independently, keeping
/// descriptors and separators as written.
pub fn rewrite_srcset<R: UrlRewriter>(value: &str, rewriter: &R, cx: &TransformContext<'_>) -> String {
    value
        .split(',')
        .map(|candidate| {
            let start = candidate.len() - candidate.trim_start().len();
            let end = candidate[start..]
                .find(char::is_whitespace)
                .map_or(candidate.len(), |idx| start + idx);
            if start == end {
                return candidate.to_owned();
            }
            let url = rewriter.rewrite(&candidate[start..end], cx);
            format!("{}{url}{}", &candidate[..start], &candidate[end..])
        })
        .collect::<Vec<_>>()
        .join(",")
}

/// Rewrite every `url(...)` reference in an inline style.
pub fn rewrite_style<R: UrlRewriter>(value: &str, rewriter: &R, cx: &TransformContext<'_>) -> String {
    let mut out = String::with_capacity(value.len());
    let mut last = 0;
    for caps in STYLE_URL.captures_iter(value) {
        let Some(url) = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)) else {
            continue;
        };
        out.push_str(&value[last..url.start()]);
        out.push_str(&rewriter.rewrite(url.as_str(), cx));
        last = url.end();
    }
    out.push_str(&value[last..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use relink_core::{AbsoluteToRelative, RelativeToAbsolute, TransformOptions};

    #[test]
    fn test_rewrite_srcset_keeps_descriptors() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        assert_eq!(
            rewrite_srcset("/a.png 600w, /b.png 1000w", &RelativeToAbsolute, &cx),
            "https://my-blog.com/a.png 600w, https://my-blog.com/b.png 1000w"
        );
    }

    #[test]
    fn test_rewrite_srcset_mixed_hosts() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        assert_eq!(
            rewrite_srcset(
                "https://my-blog.com/a.png 1x,https://other.com/b.png 2x",
                &AbsoluteToRelative,
                &cx
            ),
            "/a.png 1x,https://other.com/b.png 2x"
        );
    }

    #[test]
    fn test_rewrite_style_urls() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        assert_eq!(
            rewrite_style(
                "background-image: url('/a.jpg'); border-image: url(/b.png)",
                &RelativeToAbsolute,
                &cx
            ),
            "background-image: url('https://my-blog.com/a.jpg'); border-image: url(https://my-blog.com/b.png)"
        );
    }

    #[test]
    fn test_rewrite_style_without_urls() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        assert_eq!(rewrite_style("color: red", &RelativeToAbsolute, &cx), "color: red");
    }

    #[test]
    fn test_unknown_attribute() {
        let options = TransformOptions::default();
        let cx = TransformContext::new("https://my-blog.com/", &options);
        assert_eq!(rewrite_attribute("alt", "/a", &RelativeToAbsolute, &cx), None);
    }
}
