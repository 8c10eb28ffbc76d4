//! Applying attribute rewrites to the raw source string.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::attr::URL_ATTRIBUTES;
use crate::collect::Occurrence;

/// Start tags and comments. Group 1 holds a start tag's attribute region and
/// is absent for comments.
static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)<!--.*?-->|<[a-zA-Z][^\s/>]*((?:\s*(?:[^\s"'>/=]+(?:\s*=\s*(?:"[^"]*"|'[^']*'|[^\s"'>]+))?|/))*)\s*>"#,
    )
    .unwrap()
});

/// One attribute inside a tag's attribute region. Groups 2-4 hold the value
/// for double-quoted, single-quoted and unquoted values.
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'>/=]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#).unwrap()
});

/// A single value replacement in the source string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Edit {
    pub range: Range<usize>,
    pub replacement: String,
}

/// A URL-bearing attribute value found in a raw start tag.
struct RawAttribute {
    name: String,
    span: Range<usize>,
}

/// Pair the parsed tags with start tags in `source` and produce edits.
///
/// Only real start tags are considered, so attribute-like text in text nodes,
/// escaped markup and comments is never touched. Tags pair up in document
/// order; a raw tag whose values disagree with the next parsed tag is left
/// alone and the parsed tag waits for the following one.
pub(crate) fn plan_edits(source: &str, tags: Vec<Vec<Occurrence>>) -> Vec<Edit> {
    let mut pending = tags.into_iter().peekable();
    let mut edits = Vec::new();

    for caps in TAG.captures_iter(source) {
        let Some(region) = caps.get(1) else {
            continue;
        };
        let raw = url_attributes(source, region.range());
        if raw.is_empty() {
            continue;
        }
        let Some(expected) = pending.peek() else {
            break;
        };

        let Some(spans) = align(source, &raw, expected) else {
            tracing::warn!(
                offset = region.start(),
                "Tag does not match parsed document, leaving unchanged"
            );
            continue;
        };

        if let Some(occurrences) = pending.next() {
            for (occurrence, span) in occurrences.into_iter().zip(spans) {
                if let Some(replacement) = occurrence.rewritten
                    && replacement != occurrence.original
                {
                    edits.push(Edit {
                        range: span,
                        replacement,
                    });
                }
            }
        }
    }

    let unmatched = pending.count();
    if unmatched > 0 {
        tracing::warn!(unmatched, "Parsed tags not found in source");
    }
    edits
}

/// URL-bearing attributes of one start tag, filtered the same way the DOM
/// collector filters them.
fn url_attributes(source: &str, region: Range<usize>) -> Vec<RawAttribute> {
    let offset = region.start;
    ATTRIBUTE
        .captures_iter(&source[region])
        .filter_map(|caps| {
            let name = caps.get(1)?.as_str().to_ascii_lowercase();
            if !URL_ATTRIBUTES.contains(&name.as_str()) {
                return None;
            }
            let value = caps.get(2).or_else(|| caps.get(3)).or_else(|| caps.get(4))?;
            if name == "style" && !value.as_str().to_ascii_lowercase().contains("url(") {
                return None;
            }
            Some(RawAttribute {
                name,
                span: value.start() + offset..value.end() + offset,
            })
        })
        .collect()
}

/// Find the raw span of every parsed occurrence, or `None` if one is missing.
fn align(source: &str, raw: &[RawAttribute], expected: &[Occurrence]) -> Option<Vec<Range<usize>>> {
    let mut used = vec![false; raw.len()];
    expected
        .iter()
        .map(|occurrence| {
            let idx = raw.iter().enumerate().position(|(idx, attr)| {
                !used[idx]
                    && attr.name == occurrence.attr
                    && source[attr.span.clone()] == occurrence.original
            })?;
            used[idx] = true;
            Some(raw[idx].span.clone())
        })
        .collect()
}

/// Apply edits to `source`. Overlapping edits after the first are dropped.
pub(crate) fn apply_edits(source: &str, mut edits: Vec<Edit>) -> String {
    edits.sort_by_key(|edit| edit.range.start);

    let mut out = String::with_capacity(source.len());
    let mut last = 0;
    for edit in edits {
        if edit.range.start < last {
            continue;
        }
        out.push_str(&source[last..edit.range.start]);
        out.push_str(&edit.replacement);
        last = edit.range.end;
    }
    out.push_str(&source[last..]);
    out
}
