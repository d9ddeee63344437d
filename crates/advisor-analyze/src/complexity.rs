// ── Complexity Score ──
//
// 1 + one point per lexical occurrence of a branching or looping construct.
// Occurrences inside comments and strings are counted as well, and so are
// identifiers ending in a keyword (`elif (`, `nocatch(`).

use std::sync::LazyLock;

use regex::Regex;

static BRANCH_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"if\s*\(",
        r"for\s*\(",
        r"while\s*\(",
        r"switch\s*\(",
        r"catch\s*\(",
        // ternary
        r"\?.*?:",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

pub fn complexity(code: &str) -> usize {
    1 + BRANCH_PATTERNS
        .iter()
        .map(|re| re.find_iter(code).count())
        .sum::<usize>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_straight_line_code() {
        assert_eq!(complexity(""), 1);
        assert_eq!(complexity("const a = 1;\nreturn a + 2;"), 1);
    }

    #[test]
    fn test_counts_each_construct() {
        let code = "\
if (a) {}
for (const x of xs) {}
while (busy) {}
switch (kind) {}
try {} catch (e) {}
const v = ok ? 1 : 2;
";
        assert_eq!(complexity(code), 7);
    }

    #[test]
    fn test_repeated_occurrences() {
        assert_eq!(complexity("if(a){} else if (b) {} if (c) {}"), 4);
    }

    #[test]
    fn test_keyword_suffixes_are_counted() {
        assert_eq!(complexity("elif (z)"), 2);
        assert_eq!(complexity("verif(x); nocatch(e)"), 3);
        assert_eq!(complexity("notify(x); format(y)"), 1);
    }
}
