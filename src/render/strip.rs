//! Markup and escape-sequence stripping used for plain output and width
//! measurement.

use std::sync::LazyLock;

use regex::Regex;

/// A whole string wrapped by one outer tag pair.
static OUTER_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<[^>?]+>(.*)</[^>?]+>$").expect("OUTER_TAG must compile")
});

/// Remove ANSI escape sequences.
pub fn strip_color(s: &str) -> String {
    console::strip_ansi_codes(s).into_owned()
}

/// If the whole string is wrapped by one outer tag pair, return its inner
/// text; otherwise return it unchanged.
pub fn strip_tag(s: &str) -> String {
    match OUTER_TAG.captures(s).and_then(|caps| caps.get(1)) {
        Some(inner) => inner.as_str().to_string(),
        None => s.to_string(),
    }
}

/// Remove every `<name>`/`</name>` pair, keeping the text between them.
///
/// Pairs are unwound left to right: the first opener is matched with the
/// nearest following closer of the same name. Nested tags of different names
/// unwind layer by layer. The scan stops at the first opener without a
/// closer and leaves the rest of the markup as is.
pub fn strip_tags(s: &str) -> String {
    let mut out = s.to_string();

    while let Some((open_start, open_end, name)) = first_opener(&out) {
        let closer = format!("</{}>", name);
        let Some(offset) = out[open_end..].find(&closer) else {
            break;
        };
        let close_start = open_end + offset;
        let close_end = close_start + closer.len();

        out = format!(
            "{}{}{}",
            &out[..open_start],
            &out[open_end..close_start],
            &out[close_end..]
        );
    }

    out
}

/// Leftmost `<name>` with a non-empty name free of `<`, `>` and `?`.
/// Returns the byte span of the opener and the name.
fn first_opener(s: &str) -> Option<(usize, usize, String)> {
    let mut from = 0;

    while let Some(offset) = s[from..].find('<') {
        let start = from + offset;
        let body = &s[start + 1..];
        let name_len = body.find(['>', '?', '<']).unwrap_or(body.len());

        if name_len > 0 && body[name_len..].starts_with('>') {
            let name = body[..name_len].to_string();
            return Some((start, start + 1 + name_len + 1, name));
        }

        from = start + 1;
    }

    None
}

/// Display width of `s` once markup and escape codes are removed.
pub fn visible_width(s: &str) -> usize {
    console::measure_text_width(&strip_tags(s))
}
