//! Locating link destinations in Markdown source.
//!
//! The parser reports the byte range of a whole link and the destination with
//! backslash escapes and entity references already decoded. These helpers
//! find the destination as written in the source, so only the URL text is
//! replaced and its escaping survives wherever a rewrite leaves it alone.

use std::ops::Range;

/// A destination as it is written in the source.
#[derive(Debug, PartialEq, Eq)]
pub(crate) struct Destination {
    /// Byte span of the raw destination in the whole document.
    pub span: Range<usize>,
    /// `(decoded offset, raw offset)` at the start of every source segment,
    /// ending with both lengths.
    marks: Vec<(usize, usize)>,
}

impl Destination {
    fn verbatim(span: Range<usize>) -> Self {
        let len = span.len();
        Self {
            span,
            marks: vec![(0, 0), (len, len)],
        }
    }

    /// Source text for `rewritten`, the rewrite of the `decoded` destination.
    ///
    /// The longest tail the rewrite kept is copied from the source with its
    /// original escapes.
    pub(crate) fn replacement(&self, source: &str, decoded: &str, rewritten: &str) -> String {
        let raw = &source[self.span.clone()];
        for &(at_decoded, at_raw) in &self.marks {
            let tail = &decoded[at_decoded..];
            if rewritten.ends_with(tail) {
                let head = &rewritten[..rewritten.len() - tail.len()];
                return format!("{head}{}", &raw[at_raw..]);
            }
        }
        rewritten.to_owned()
    }
}

/// Destination of an inline link or image (`[text](dest "title")`).
///
/// `range` is the event range of the link; `dest` is the parsed destination.
pub(crate) fn inline_dest(source: &str, range: &Range<usize>, dest: &str) -> Option<Destination> {
    let slice = source.get(range.clone())?;
    let open = usize::from(slice.starts_with('!'));
    if !slice[open..].starts_with('[') {
        return None;
    }
    let close = closing_bracket(slice, open)?;
    if slice.as_bytes().get(close + 1) != Some(&b'(') {
        return None;
    }
    dest_at(slice, close + 2, dest, range.start)
}

/// Destination of an autolink (`<https://example.com>`). Autolinks carry no
/// escapes, so the text is taken as is.
pub(crate) fn autolink_dest(source: &str, range: &Range<usize>, dest: &str) -> Option<Destination> {
    let slice = source.get(range.clone())?;
    let start = slice.find(dest)? + range.start;
    Some(Destination::verbatim(start..start + dest.len()))
}

/// Destination of a reference definition (`[label]: dest "title"`).
pub(crate) fn definition_dest(source: &str, span: &Range<usize>, dest: &str) -> Option<Destination> {
    let slice = source.get(span.clone())?;
    let open = slice.find('[')?;
    let close = closing_bracket(slice, open)?;
    if slice.as_bytes().get(close + 1) != Some(&b':') {
        return None;
    }
    dest_at(slice, close + 2, dest, span.start)
}

/// Scan the destination starting at `from` and check it decodes to `dest`.
fn dest_at(slice: &str, from: usize, dest: &str, base: usize) -> Option<Destination> {
    let raw = scan_dest(slice, from)?;
    let (decoded, marks) = unescape(&slice[raw.clone()]);
    if decoded != dest {
        tracing::trace!(raw = &slice[raw], dest, "Destination does not match source, skipping");
        return None;
    }
    Some(Destination {
        span: raw.start + base..raw.end + base,
        marks,
    })
}

/// Raw destination after optional whitespace: either `<...>` or a run of
/// non-space characters with balanced parentheses. Angle brackets are not
/// part of the returned range.
fn scan_dest(slice: &str, from: usize) -> Option<Range<usize>> {
    let rest = slice.get(from..)?;
    let start = from + (rest.len() - rest.trim_start().len());
    let bytes = slice.as_bytes();

    if bytes.get(start) == Some(&b'<') {
        let mut i = start + 1;
        while let Some(&b) = bytes.get(i) {
            match b {
                b'\\' => i += 2,
                b'>' => return Some(start + 1..i),
                b'\n' | b'<' => return None,
                _ => i += 1,
            }
        }
        return None;
    }

    let mut depth = 0usize;
    let mut i = start;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\\' if bytes.get(i + 1).is_some_and(u8::is_ascii_punctuation) => {
                i += 2;
                continue;
            }
            b'(' => depth += 1,
            b')' if depth == 0 => break,
            b')' => depth -= 1,
            _ if b.is_ascii_whitespace() || b.is_ascii_control() => break,
            _ => {}
        }
        i += 1;
    }
    (i > start).then_some(start..i)
}

/// Offset of the `]` closing the `[` at `open`. Escaped brackets and brackets
/// inside code spans do not count.
fn closing_bracket(slice: &str, open: usize) -> Option<usize> {
    let bytes = slice.as_bytes();
    let mut depth = 0usize;
    let mut i = open;
    while let Some(&b) = bytes.get(i) {
        match b {
            b'\\' => {
                i += 2;
                continue;
            }
            b'`' => {
                let run = backtick_run(bytes, i);
                i = code_span_end(bytes, i + run, run).unwrap_or(i + run);
                continue;
            }
            b'[' => depth += 1,
            b']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn backtick_run(bytes: &[u8], at: usize) -> usize {
    bytes[at..].iter().take_while(|&&b| b == b'`').count()
}

/// End of the code span whose opening run of `run` backticks ends at `from`.
fn code_span_end(bytes: &[u8], from: usize, run: usize) -> Option<usize> {
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'`' {
            let len = backtick_run(bytes, i);
            if len == run {
                return Some(i + len);
            }
            i += len;
        } else {
            i += 1;
        }
    }
    None
}

/// Decode backslash escapes and entity references, recording where each
/// source segment starts in both strings.
fn unescape(raw: &str) -> (String, Vec<(usize, usize)>) {
    let mut decoded = String::with_capacity(raw.len());
    let mut marks = Vec::new();
    let mut pos = 0;

    while let Some(c) = raw[pos..].chars().next() {
        marks.push((decoded.len(), pos));
        let rest = &raw[pos..];
        if c == '\\'
            && let Some(next) = rest[1..].chars().next()
            && next.is_ascii_punctuation()
        {
            decoded.push(next);
            pos += 2;
        } else if c == '&'
            && let Some((entity, len)) = entity(rest)
        {
            decoded.push(entity);
            pos += len;
        } else {
            decoded.push(c);
            pos += c.len_utf8();
        }
    }
    marks.push((decoded.len(), raw.len()));
    (decoded, marks)
}

/// Decode the entity reference at the start of `rest`, returning the
/// character and the reference length. Unknown names are left alone.
fn entity(rest: &str) -> Option<(char, usize)> {
    let end = rest.find(';')?;
    let name = &rest[1..end];
    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => '\u{a0}',
        _ => {
            let number = name.strip_prefix('#')?;
            let (digits, radix) = match number.strip_prefix(['x', 'X']) {
                Some(hex) => (hex, 16),
                None => (number, 10),
            };
            if digits.is_empty() || digits.len() > 7 || !digits.chars().all(|d| d.is_digit(radix)) {
                return None;
            }
            char::from_u32(u32::from_str_radix(digits, radix).ok()?).filter(|&c| c != '\0')?
        }
    };
    Some((c, end + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn whole(source: &str) -> Range<usize> {
        0..source.len()
    }

    #[test]
    fn test_inline_dest() {
        let source = "See [a](/about \"Title\") now";
        let range = 4..23;
        let found = inline_dest(source, &range, "/about").unwrap();
        assert_eq!(&source[found.span], "/about");
    }

    #[test]
    fn test_inline_dest_angle_brackets() {
        let source = "[a](</my page>)";
        let found = inline_dest(source, &whole(source), "/my page").unwrap();
        assert_eq!(&source[found.span], "/my page");
    }

    #[test]
    fn test_inline_dest_nested_image() {
        let source = "[![alt](/img.png)](/link)";
        let found = inline_dest(source, &whole(source), "/link").unwrap();
        assert_eq!(&source[found.span], "/link");

        let image = inline_dest(source, &(1..17), "/img.png").unwrap();
        assert_eq!(&source[image.span], "/img.png");
    }

    #[test]
    fn test_inline_dest_title_with_brackets() {
        let source = r#"[a](/a "see ](/b)")"#;
        let found = inline_dest(source, &whole(source), "/a").unwrap();
        assert_eq!(&source[found.span], "/a");
    }

    #[test]
    fn test_inline_dest_code_span_in_text() {
        let source = "[`a]`](/a)";
        let found = inline_dest(source, &whole(source), "/a").unwrap();
        assert_eq!(&source[found.span], "/a");
    }

    #[test]
    fn test_inline_dest_balanced_parens() {
        let source = "[a](/wiki/Rust_(language))";
        let found = inline_dest(source, &whole(source), "/wiki/Rust_(language)").unwrap();
        assert_eq!(&source[found.span], "/wiki/Rust_(language)");
    }

    #[test]
    fn test_inline_dest_with_escape() {
        let source = r"[a](/a\_b)";
        let found = inline_dest(source, &whole(source), "/a_b").unwrap();
        assert_eq!(&source[found.span], r"/a\_b");
    }

    #[test]
    fn test_inline_dest_with_entities() {
        let source = "[c](/?x=1&amp;y=2&#38;z=&#x33;)";
        let found = inline_dest(source, &whole(source), "/?x=1&y=2&z=3").unwrap();
        assert_eq!(&source[found.span], "/?x=1&amp;y=2&#38;z=&#x33;");
    }

    #[test]
    fn test_inline_dest_mismatch_is_skipped() {
        let source = "[a](/a)";
        assert_eq!(inline_dest(source, &whole(source), "/b"), None);
    }

    #[test]
    fn test_definition_dest() {
        let source = "text\n\n[ref]:\n  https://example.com/a 'T'\n";
        let found = definition_dest(source, &(6..source.len()), "https://example.com/a").unwrap();
        assert_eq!(&source[found.span], "https://example.com/a");
    }

    #[test]
    fn test_autolink_dest() {
        let source = "go <https://example.com/a> now";
        let found = autolink_dest(source, &(3..26), "https://example.com/a").unwrap();
        assert_eq!(&source[found.span], "https://example.com/a");
    }

    #[test]
    fn test_replacement_keeps_escaped_tail() {
        let source = r"[a](https://s.com/a\_b?x=1&amp;y=2)";
        let decoded = "https://s.com/a_b?x=1&y=2";
        let found = inline_dest(source, &whole(source), decoded).unwrap();
        assert_eq!(
            found.replacement(source, decoded, "/a_b?x=1&y=2"),
            r"/a\_b?x=1&amp;y=2"
        );
        assert_eq!(
            found.replacement(source, decoded, "https://t.org/a_b?x=1&y=2"),
            r"https://t.org/a\_b?x=1&amp;y=2"
        );
        assert_eq!(found.replacement(source, decoded, "/other"), "/other");
    }

    #[test]
    fn test_unknown_entity_is_literal() {
        let (decoded, _) = unescape("/a&bogus;b&#;");
        assert_eq!(decoded, "/a&bogus;b&#;");
    }
}
