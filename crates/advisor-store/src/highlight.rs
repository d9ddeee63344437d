// ── Case-Insensitive Literal Matching ──
//
// The query is never compiled into a pattern: matching walks char
// boundaries and compares lowercase expansions, so `(`, `*`, `.` and
// friends are plain characters.

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

// ── Helpers ──

fn lowercase_chars(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Byte length of the prefix of `rest` that case-insensitively equals `needle`.
fn match_at(rest: &str, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, c) in rest.char_indices() {
        for lc in c.to_lowercase() {
            if matched == needle.len() || needle[matched] != lc {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(offset + c.len_utf8());
        }
    }
    None
}

// ── Public API ──

/// Whether `haystack` contains `needle`, ignoring case. An empty needle
/// never matches.
pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    let needle = lowercase_chars(needle);
    if needle.is_empty() {
        return false;
    }
    haystack
        .char_indices()
        .any(|(i, _)| match_at(&haystack[i..], &needle).is_some())
}

/// Wrap every non-overlapping, case-insensitive occurrence of `query` in
/// `<mark>` tags, leftmost first. The original casing of the content is kept.
pub fn highlight(content: &str, query: &str) -> String {
    let needle = lowercase_chars(query);
    if needle.is_empty() {
        return content.to_string();
    }

    let mut out = String::with_capacity(content.len());
    let mut i = 0;
    while i < content.len() {
        let rest = &content[i..];
        if let Some(len) = match_at(rest, &needle) {
            out.push_str(MARK_OPEN);
            out.push_str(&rest[..len]);
            out.push_str(MARK_CLOSE);
            i += len;
        } else if let Some(c) = rest.chars().next() {
            out.push(c);
            i += c.len_utf8();
        }
    }
    out
}
