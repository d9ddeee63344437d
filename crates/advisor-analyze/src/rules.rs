// ── Heuristic Rules ──
//
// Each rule is a named predicate over the raw source text. Matching is
// lexical (regex or substring), not a syntax-tree walk, so constructs inside
// comments and string literals are seen too.

use std::sync::LazyLock;

use regex::Regex;

// ── Types ──

/// What a matched rule contributes to the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finding {
    Issue(&'static str),
    Suggestion(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub predicate: fn(&str) -> bool,
    pub finding: Finding,
}

// ── Messages ──

pub const ISSUE_LOOSE_TYPES: &str =
    "Type safety concern: `any` disables type checking for this value";
pub const SUGGEST_REMOVE_DEBUG: &str =
    "Remove debug output (console.log, debugger) before release";
pub const ISSUE_UNBOUNDED_EFFECT: &str =
    "Possible missing dependency list or cleanup: the effect may re-run without bound";
pub const SUGGEST_STATE_NAMING: &str =
    "Use more specific state naming than generic names such as `data` or `value`";
pub const SUGGEST_SINGLE_PASS: &str =
    "Consider a single-pass reduction instead of chaining map and filter for performance";
pub const ISSUE_HTML_INJECTION: &str =
    "Raw HTML injection API in use: injection/XSS risk";

/// Rules in evaluation order. Output ordering follows this table.
pub const RULES: [Rule; 6] = [
    Rule {
        name: "loose-types",
        predicate: has_loose_types,
        finding: Finding::Issue(ISSUE_LOOSE_TYPES),
    },
    Rule {
        name: "debug-output",
        predicate: has_debug_output,
        finding: Finding::Suggestion(SUGGEST_REMOVE_DEBUG),
    },
    Rule {
        name: "unbounded-effect",
        predicate: has_unbounded_effect,
        finding: Finding::Issue(ISSUE_UNBOUNDED_EFFECT),
    },
    Rule {
        name: "vague-state-names",
        predicate: has_vague_state_names,
        finding: Finding::Suggestion(SUGGEST_STATE_NAMING),
    },
    Rule {
        name: "chained-transforms",
        predicate: has_chained_transforms,
        finding: Finding::Suggestion(SUGGEST_SINGLE_PASS),
    },
    Rule {
        name: "html-injection",
        predicate: has_html_injection,
        finding: Finding::Issue(ISSUE_HTML_INJECTION),
    },
];

// ── Patterns ──

static LOOSE_TYPES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":\s*any\b|\bas\s+any\b|<any>|\bany\[\]").unwrap());

static DEBUG_OUTPUT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bconsole\.(?:log|debug|trace)\s*\(|\bdebugger\s*;|\bdbg!\s*\(").unwrap()
});

static EFFECT_CALL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\buseEffect\s*\(").unwrap());

static STATE_BINDING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[\s*([A-Za-z_$][\w$]*)\s*,\s*set[\w$]*\s*\]\s*=\s*(?:React\.)?useState\b")
        .unwrap()
});

static TRANSFORM_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\.(map|filter)\s*\(").unwrap());

static NEXT_TRANSFORM_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\.(map|filter)\s*\(").unwrap());

static HTML_INJECTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"dangerouslySetInnerHTML|\.(?:inner|outer)HTML\s*=(?:[^=]|$)|\binsertAdjacentHTML\s*\(|\bdocument\.write(?:ln)?\s*\(",
    )
    .unwrap()
});

const GENERIC_STATE_NAMES: [&str; 10] = [
    "state", "data", "value", "val", "temp", "tmp", "item", "obj", "flag", "info",
];

// ── Helpers ──

/// Text between the opening paren already consumed and its matching close,
/// or `None` when the call is never closed.
fn call_arguments(rest: &str) -> Option<&str> {
    let mut depth = 1usize;
    for (i, c) in rest.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&rest[..i]);
                }
            }
            _ => {}
        }
    }
    None
}

fn effect_lacks_dependencies(code: &str) -> bool {
    EFFECT_CALL.find_iter(code).any(|m| {
        match call_arguments(&code[m.end()..]) {
            Some(args) => !args.trim_end().trim_end_matches(',').trim_end().ends_with(']'),
            None => true,
        }
    })
}

/// A `.map(` whose balanced call is immediately followed by `.filter(`, or
/// the other way round.
fn transform_is_chained(code: &str) -> bool {
    TRANSFORM_CALL.captures_iter(code).any(|caps| {
        let (Some(call), Some(method)) = (caps.get(0), caps.get(1)) else {
            return false;
        };
        let rest = &code[call.end()..];
        let Some(args) = call_arguments(rest) else {
            return false;
        };
        // skip the arguments and their closing paren
        let after = &rest[args.len() + 1..];
        NEXT_TRANSFORM_CALL
            .captures(after)
            .and_then(|next| next.get(1))
            .is_some_and(|next| next.as_str() != method.as_str())
    })
}

fn subscription_lacks_cleanup(code: &str) -> bool {
    (code.contains("addEventListener(") && !code.contains("removeEventListener("))
        || (code.contains("setInterval(") && !code.contains("clearInterval("))
}

// ── Predicates ──

/// An untyped escape hatch such as `: any` or `as any`.
pub fn has_loose_types(code: &str) -> bool {
    LOOSE_TYPES.is_match(code)
}

pub fn has_debug_output(code: &str) -> bool {
    DEBUG_OUTPUT.is_match(code)
}

/// A `useEffect` call without a trailing dependency array, or a listener or
/// interval that is never torn down.
pub fn has_unbounded_effect(code: &str) -> bool {
    effect_lacks_dependencies(code) || subscription_lacks_cleanup(code)
}

/// A `useState` binding named with a generic word or a one- or two-letter name.
pub fn has_vague_state_names(code: &str) -> bool {
    STATE_BINDING.captures_iter(code).any(|caps| {
        let name = caps[1].to_lowercase();
        name.chars().count() <= 2 || GENERIC_STATE_NAMES.contains(&name.as_str())
    })
}

/// `.map(...)` directly followed by `.filter(` or the other way round.
pub fn has_chained_transforms(code: &str) -> bool {
    transform_is_chained(code)
}

pub fn has_html_injection(code: &str) -> bool {
    HTML_INJECTION.is_match(code)
}
