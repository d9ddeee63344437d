pub mod complexity;
pub mod rules;

use advisor_core::config::AnalyzerConfig;
use advisor_core::{AdvisorError, AnalysisResult, AnalysisSource, CodeQuality, Result};
use chrono::Utc;

use crate::rules::{Finding, RULES};

pub use complexity::complexity;

// ── Types ──

/// Offline code analyzer. Never fails for any input string.
#[derive(Debug, Clone)]
pub struct HeuristicAnalyzer {
    confidence: f64,
    detailed_confidence: f64,
}

/// Above this score the detailed mode reports the code as too complex.
pub const COMPLEXITY_LIMIT: usize = 10;

pub const ISSUE_TOO_COMPLEX: &str = "Function is too complex";
pub const SUGGEST_SPLIT_FUNCTION: &str = "Split the function into smaller ones";

// ── Helpers ──

struct Findings {
    issues: Vec<String>,
    suggestions: Vec<String>,
}

fn run_rules(code: &str) -> Findings {
    let mut findings = Findings {
        issues: Vec::new(),
        suggestions: Vec::new(),
    };

    for rule in &RULES {
        if !(rule.predicate)(code) {
            continue;
        }
        log::debug!("analyzer rule matched: {}", rule.name);
        match rule.finding {
            Finding::Issue(msg) => findings.issues.push(msg.to_string()),
            Finding::Suggestion(msg) => findings.suggestions.push(msg.to_string()),
        }
    }

    findings
}

/// First line of the caller context, shortened for the explanation.
fn context_note(context: Option<&str>) -> String {
    let Some(first) = context.and_then(|c| c.lines().find(|l| !l.trim().is_empty())) else {
        return String::new();
    };
    let first = first.trim();
    if first.chars().count() > 80 {
        let short: String = first.chars().take(77).collect();
        format!(" Context: {}...", short)
    } else {
        format!(" Context: {}", first)
    }
}

// ── Public API ──

/// Reject code the analyzer should not be asked about: empty or only
/// whitespace.
pub fn validate_code(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(AdvisorError::invalid_input("code must not be empty"));
    }
    Ok(())
}

impl Default for HeuristicAnalyzer {
    fn default() -> Self {
        Self::new(&AnalyzerConfig::default())
    }
}

impl HeuristicAnalyzer {
    pub fn new(config: &AnalyzerConfig) -> Self {
        let config = config.clamped();
        Self {
            confidence: config.confidence,
            detailed_confidence: config.detailed_confidence,
        }
    }

    /// Run the rule table and grade the snippet by issue count.
    pub fn analyze(&self, code: &str, context: Option<&str>) -> AnalysisResult {
        let findings = run_rules(code);
        let quality = CodeQuality::from_issue_count(findings.issues.len());

        let explanation = format!(
            "Heuristic offline analysis: {} issue(s), {} suggestion(s).{}",
            findings.issues.len(),
            findings.suggestions.len(),
            context_note(context)
        );

        AnalysisResult {
            code_quality: quality,
            potential_issues: findings.issues,
            suggestions: findings.suggestions,
            explanation,
            confidence: self.confidence,
            source: AnalysisSource::Fallback,
            timestamp: Utc::now(),
        }
    }

    /// `analyze` plus the complexity score and line count. Code whose
    /// complexity exceeds `COMPLEXITY_LIMIT` gets an issue and a split
    /// suggestion.
    pub fn analyze_detailed(&self, code: &str, context: Option<&str>) -> AnalysisResult {
        let mut findings = run_rules(code);
        let score = complexity(code);
        let lines = code.lines().count();

        if score > COMPLEXITY_LIMIT {
            log::debug!("complexity {} exceeds limit {}", score, COMPLEXITY_LIMIT);
            findings.issues.push(ISSUE_TOO_COMPLEX.to_string());
            findings.suggestions.push(SUGGEST_SPLIT_FUNCTION.to_string());
        }

        let explanation = format!(
            "Fallback analysis. Complexity: {}, lines: {}.{}",
            score,
            lines,
            context_note(context)
        );

        AnalysisResult {
            code_quality: CodeQuality::from_issue_count(findings.issues.len()),
            potential_issues: findings.issues,
            suggestions: findings.suggestions,
            explanation,
            confidence: self.detailed_confidence,
            source: AnalysisSource::Fallback,
            timestamp: Utc::now(),
        }
    }
}
