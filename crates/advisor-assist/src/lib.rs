pub mod context;
pub mod remote;

use std::sync::atomic::{AtomicU64, Ordering};

use advisor_analyze::{validate_code, HeuristicAnalyzer};
use advisor_core::config::DEFAULT_SEARCH_MAX;
use advisor_core::{AdvisorError, AnalysisResult, Category, FileContext, NewEntry};
use advisor_store::KnowledgeStore;
use anyhow::Result;
use chrono::Utc;
use serde::Serialize;

pub use context::{detect_language, project_summary, Language};
pub use remote::{Offline, RemoteAssistant};

// ── Types ──

/// Routes analysis and chat to the remote model when it answers, and to the
/// knowledge store and heuristic analyzer otherwise.
pub struct Assistant<R = Offline> {
    store: KnowledgeStore,
    analyzer: HeuristicAnalyzer,
    remote: R,
    file_context: Option<FileContext>,
    success_count: AtomicU64,
    error_count: AtomicU64,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssistantStatus {
    pub remote_configured: bool,
    pub success_count: u64,
    pub error_count: u64,
}

// ── Helpers ──

pub const OFFLINE_CHAT_REPLY: &str = "The remote assistant is unavailable and the knowledge base \
has nothing matching. Ask a more specific question, or configure an API key for full answers.";

const CHAT_PREVIEW_CHARS: usize = 300;
const PATTERN_QUERY: &str = "pattern";
const RECORDED_CODE_CHARS: usize = 200;

fn truncate_chars(s: &str, max: usize) -> (&str, bool) {
    match s.char_indices().nth(max) {
        Some((idx, _)) => (&s[..idx], true),
        None => (s, false),
    }
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|i| format!("- {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_learned_pattern(code: &str, result: &AnalysisResult) -> String {
    let (snippet, truncated) = truncate_chars(code, RECORDED_CODE_CHARS);
    format!(
        "## Analyzed code\n```\n{}{}\n```\n\n## Issues\n{}\n\n## Suggestions\n{}\n\n## Explanation\n{}\n",
        snippet,
        if truncated { "..." } else { "" },
        bullet_list(&result.potential_issues),
        bullet_list(&result.suggestions),
        result.explanation,
    )
}

// ── Public API ──

impl Assistant<Offline> {
    /// An assistant with no remote: everything is answered offline.
    pub fn offline(store: KnowledgeStore, analyzer: HeuristicAnalyzer) -> Self {
        Self::new(store, analyzer, Offline)
    }
}

impl<R: RemoteAssistant> Assistant<R> {
    pub fn new(store: KnowledgeStore, analyzer: HeuristicAnalyzer, remote: R) -> Self {
        Self {
            store,
            analyzer,
            remote,
            file_context: None,
            success_count: AtomicU64::new(0),
            error_count: AtomicU64::new(0),
        }
    }

    pub fn with_file_context(mut self, ctx: FileContext) -> Self {
        self.file_context = Some(ctx);
        self
    }

    pub fn store(&self) -> &KnowledgeStore {
        &self.store
    }

    pub fn analyzer(&self) -> &HeuristicAnalyzer {
        &self.analyzer
    }

    pub fn status(&self) -> AssistantStatus {
        AssistantStatus {
            remote_configured: self.remote.is_configured(),
            success_count: self.success_count.load(Ordering::Relaxed),
            error_count: self.error_count.load(Ordering::Relaxed),
        }
    }

    /// Caller context followed by the project summary, when either exists.
    pub fn full_context(&self, context: Option<&str>) -> String {
        let summary = self.file_context.as_ref().map(project_summary);
        match (context.map(str::trim).filter(|c| !c.is_empty()), summary) {
            (Some(c), Some(s)) => format!("{}\n\n{}", c, s),
            (Some(c), None) => c.to_string(),
            (None, Some(s)) => s,
            (None, None) => String::new(),
        }
    }

    /// Analyze code, preferring the remote model. Remote answers are also
    /// recorded into the knowledge store when they carry a new suggestion.
    pub fn analyze_code(&self, code: &str, context: Option<&str>) -> Result<AnalysisResult> {
        validate_code(code)?;
        let full_context = self.full_context(context);

        if self.remote.is_configured() {
            match self.remote.analyze_code(code, &full_context) {
                Ok(Some(result)) => {
                    self.success_count.fetch_add(1, Ordering::Relaxed);
                    self.record_analysis(code, &result);
                    return Ok(result);
                }
                Ok(None) => log::debug!("remote analysis returned nothing, using fallback"),
                Err(e) => {
                    self.error_count.fetch_add(1, Ordering::Relaxed);
                    log::warn!("remote analysis failed, using fallback: {:#}", e);
                }
            }
        } else {
            log::debug!("remote not configured, using fallback analysis");
        }

        Ok(self.fallback_analysis(code, &full_context))
    }

    /// Detailed heuristic analysis plus a pointer to the best-matching
    /// knowledge entry for the detected language.
    pub fn fallback_analysis(&self, code: &str, context: &str) -> AnalysisResult {
        let context = (!context.is_empty()).then_some(context);
        let mut result = self.analyzer.analyze_detailed(code, context);

        let language = detect_language(code);
        if let Some(hit) = self.store.search(language.as_str(), 1).first() {
            result
                .suggestions
                .push(format!("Related pattern: see \"{}\"", hit.entry.title));
        }

        result
    }

    /// Store a remote result as a new pattern entry unless its first
    /// suggestion already appears in an entry returned by a `pattern` search.
    /// Returns the new id.
    pub fn record_analysis(&self, code: &str, result: &AnalysisResult) -> Option<String> {
        let first = result.suggestions.first()?;

        let already_known = self
            .store
            .search(PATTERN_QUERY, DEFAULT_SEARCH_MAX)
            .iter()
            .any(|r| r.entry.content.contains(first.as_str()));
        if already_known {
            return None;
        }

        let mut entry = NewEntry::new(
            format!("Code improvement pattern: {}", Utc::now().format("%Y-%m-%d")),
            render_learned_pattern(code, result),
            Category::Pattern,
        );
        entry.tags = vec![
            "analysis".to_string(),
            "pattern".to_string(),
            "improvement".to_string(),
        ];

        let id = self.store.add_entry(entry);
        log::info!("recorded analysis as knowledge entry {}", id);
        Some(id)
    }

    /// Answer a chat message, preferring the remote model and otherwise
    /// quoting the best knowledge-base match.
    pub fn chat(&self, message: &str) -> Result<String> {
        if message.trim().is_empty() {
            return Err(AdvisorError::invalid_input("message must not be empty").into());
        }
        let full_context = self.full_context(None);

        if self.remote.is_configured() {
            match self.remote.chat(message, &full_context) {
                Ok(Some(reply)) => {
                    self.success_count.fetch_add(1, Ordering::Relaxed);
                    return Ok(reply);
                }
                Ok(None) => log::debug!("remote chat returned nothing, using fallback"),
                Err(e) => {
                    self.error_count.fetch_add(1, Ordering::Relaxed);
                    log::warn!("remote chat failed, using fallback: {:#}", e);
                }
            }
        }

        Ok(self.fallback_chat(message))
    }

    pub fn fallback_chat(&self, message: &str) -> String {
        match self.store.search(message, 1).first() {
            Some(best) => {
                let (preview, truncated) = truncate_chars(&best.entry.content, CHAT_PREVIEW_CHARS);
                format!(
                    "Found related information in the knowledge base:\n\n**{}**\n\n{}{}\n\nSee the knowledge tab for details.",
                    best.entry.title,
                    preview,
                    if truncated { "..." } else { "" },
                )
            }
            None => format!("{}\n\nYour question: \"{}\"", OFFLINE_CHAT_REPLY, message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{AnalysisSource, CodeQuality};
    use anyhow::anyhow;

    enum Scripted {
        Answer,
        Nothing,
        Fail,
    }

    struct FakeRemote(Scripted);

    fn remote_result(suggestion: &str) -> AnalysisResult {
        AnalysisResult {
            code_quality: CodeQuality::Medium,
            potential_issues: vec!["Missing error handling".to_string()],
            suggestions: vec![suggestion.to_string()],
            explanation: "remote".to_string(),
            confidence: 0.8,
            source: AnalysisSource::Claude,
            timestamp: Utc::now(),
        }
    }

    impl RemoteAssistant for FakeRemote {
        fn is_configured(&self) -> bool {
            true
        }

        fn analyze_code(&self, _code: &str, _context: &str) -> Result<Option<AnalysisResult>> {
            match self.0 {
                Scripted::Answer => Ok(Some(remote_result("Wrap the fetch in a Result type"))),
                Scripted::Nothing => Ok(None),
                Scripted::Fail => Err(anyhow!("rate limited")),
            }
        }

        fn chat(&self, message: &str, _context: &str) -> Result<Option<String>> {
            match self.0 {
                Scripted::Answer => Ok(Some(format!("remote: {}", message))),
                Scripted::Nothing => Ok(None),
                Scripted::Fail => Err(anyhow!("timeout")),
            }
        }
    }

    fn assistant(script: Scripted) -> Assistant<FakeRemote> {
        Assistant::new(
            KnowledgeStore::with_seed(),
            HeuristicAnalyzer::default(),
            FakeRemote(script),
        )
    }

    #[test]
    fn test_offline_analysis_uses_fallback() {
        let assistant = Assistant::offline(KnowledgeStore::with_seed(), HeuristicAnalyzer::default());
        let result = assistant
            .analyze_code("const el: any = document.body;", None)
            .unwrap();

        assert_eq!(result.source, AnalysisSource::Fallback);
        assert_eq!(result.confidence, 0.7);
        assert_eq!(result.code_quality, CodeQuality::Medium);
        // `: ` marks the snippet as typescript
        assert_eq!(
            result.suggestions.last().unwrap(),
            "Related pattern: see \"TypeScript error handling\""
        );
        assert_eq!(assistant.status().success_count, 0);
    }

    #[test]
    fn test_empty_code_is_rejected() {
        let assistant = Assistant::offline(KnowledgeStore::empty(), HeuristicAnalyzer::default());
        let err = assistant.analyze_code("   ", None).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AdvisorError>(),
            Some(AdvisorError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_remote_answer_is_preferred_and_recorded() {
        let assistant = assistant(Scripted::Answer);
        let before = assistant.store().len();

        let result = assistant.analyze_code("fetch(url)", Some("api layer")).unwrap();
        assert_eq!(result.source, AnalysisSource::Claude);
        assert_eq!(assistant.store().len(), before + 1);

        let learned = assistant.store().entries_by_tag("analysis");
        assert_eq!(learned.len(), 1);
        assert!(learned[0].content.contains("- Wrap the fetch in a Result type"));
        assert!(learned[0].content.contains("fetch(url)"));

        // same suggestion again is not recorded twice
        assistant.analyze_code("fetch(other)", None).unwrap();
        assert_eq!(assistant.store().len(), before + 1);
        assert_eq!(assistant.status().success_count, 2);
    }

    #[test]
    fn test_remote_failure_falls_back() {
        let assistant = assistant(Scripted::Fail);
        let result = assistant.analyze_code("let a = 1;", None).unwrap();
        assert_eq!(result.source, AnalysisSource::Fallback);

        let status = assistant.status();
        assert!(status.remote_configured);
        assert_eq!(status.error_count, 1);
        assert_eq!(status.success_count, 0);
    }

    #[test]
    fn test_remote_without_answer_falls_back_without_error() {
        let assistant = assistant(Scripted::Nothing);
        let result = assistant.analyze_code("let a = 1;", None).unwrap();
        assert_eq!(result.source, AnalysisSource::Fallback);
        assert_eq!(assistant.status().error_count, 0);
    }

    #[test]
    fn test_record_analysis_skips_suggestion_known_to_pattern_search() {
        let assistant = assistant(Scripted::Answer);
        let before = assistant.store().len();

        // only in typescript-error-handling, a solution entry tagged `pattern`
        let result = remote_result("safeApiCall");
        assert!(assistant.record_analysis("fetch(url)", &result).is_none());
        assert_eq!(assistant.store().len(), before);

        let result = remote_result("Prefer a discriminated union for loading state");
        assert!(assistant.record_analysis("fetch(url)", &result).is_some());
        assert_eq!(assistant.store().len(), before + 1);
    }

    #[test]
    fn test_record_analysis_without_suggestions() {
        let assistant = assistant(Scripted::Answer);
        let mut result = remote_result("x");
        result.suggestions.clear();
        assert!(assistant.record_analysis("code", &result).is_none());
    }

    #[test]
    fn test_chat_remote_and_fallback() {
        assert_eq!(assistant(Scripted::Answer).chat("hello").unwrap(), "remote: hello");

        let reply = assistant(Scripted::Fail).chat("Framer Motion").unwrap();
        assert!(reply.contains("**Framer Motion animation patterns**"));
        assert!(reply.ends_with("See the knowledge tab for details."));

        let reply = assistant(Scripted::Nothing).chat("quantum chromodynamics").unwrap();
        assert!(reply.starts_with(OFFLINE_CHAT_REPLY));
        assert!(reply.ends_with("Your question: \"quantum chromodynamics\""));
    }

    #[test]
    fn test_chat_rejects_empty_message() {
        assert!(assistant(Scripted::Answer).chat(" ").is_err());
    }

    #[test]
    fn test_full_context_combines_caller_and_project() {
        let assistant = Assistant::offline(KnowledgeStore::empty(), HeuristicAnalyzer::default());
        assert_eq!(assistant.full_context(None), "");
        assert_eq!(assistant.full_context(Some(" review ")), "review");

        let assistant = assistant.with_file_context(FileContext::default());
        let ctx = assistant.full_context(Some("review"));
        assert!(ctx.starts_with("review\n\n## Project"));
    }
}
