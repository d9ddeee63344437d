// ── Types ──

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AdvisorError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Pattern,
    Solution,
    Example,
    Note,
}

/// One unit of curated or runtime-added knowledge.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeEntry {
    pub id: String,
    pub title: String,
    pub content: String,
    /// Lowercase keywords, kept in their original order for display.
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: Category,
    pub last_updated: DateTime<Utc>,
    /// Path fragments, only used when ranking related entries.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_files: Vec<String>,
}

/// An entry as supplied by a caller, before the store assigns `id` and `last_updated`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewEntry {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub category: Category,
    #[serde(default)]
    pub related_files: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    /// The query occurred in the title.
    Exact,
    Partial,
    /// Reserved for an embedding-backed search; never produced.
    Semantic,
}

/// A ranked search hit. Derived per query, never stored.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchResult {
    pub entry: KnowledgeEntry,
    pub score: u32,
    pub match_type: MatchType,
    pub highlighted_content: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Pattern,
    Improvement,
    Related,
    Example,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextualSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    pub priority: Priority,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CodeQuality {
    High,
    Medium,
    Low,
}

/// Which analyzer produced an `AnalysisResult`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AnalysisSource {
    #[serde(rename = "claude")]
    Claude,
    #[serde(rename = "claude-code-sdk")]
    ClaudeCodeSdk,
    #[serde(rename = "local_knowledge")]
    LocalKnowledge,
    #[serde(rename = "fallback")]
    Fallback,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub code_quality: CodeQuality,
    pub potential_issues: Vec<String>,
    pub suggestions: Vec<String>,
    pub explanation: String,
    /// In `[0, 1]`.
    pub confidence: f64,
    pub source: AnalysisSource,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    #[default]
    File,
    Directory,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProjectFile {
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: FileKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WorkspaceStats {
    pub total_files: usize,
    #[serde(default)]
    pub total_size: u64,
    #[serde(default)]
    pub file_types: BTreeMap<String, usize>,
}

/// Snapshot of the caller's editor/workspace state, produced by a file scanner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FileContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_content: Option<String>,
    #[serde(default)]
    pub project_structure: Vec<ProjectFile>,
    #[serde(default)]
    pub recent_files: Vec<String>,
    #[serde(default)]
    pub workspace_stats: WorkspaceStats,
}

// ── Helpers ──

impl Category {
    pub const ALL: [Category; 4] = [
        Category::Pattern,
        Category::Solution,
        Category::Example,
        Category::Note,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pattern => "pattern",
            Category::Solution => "solution",
            Category::Example => "example",
            Category::Note => "note",
        }
    }
}

impl NewEntry {
    pub fn new(title: impl Into<String>, content: impl Into<String>, category: Category) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            tags: Vec::new(),
            category,
            related_files: Vec::new(),
        }
    }

    /// Attach the store-assigned identity and timestamp.
    pub fn into_entry(self, id: String, last_updated: DateTime<Utc>) -> KnowledgeEntry {
        KnowledgeEntry {
            id,
            title: self.title,
            content: self.content,
            tags: self.tags,
            category: self.category,
            last_updated,
            related_files: self.related_files,
        }
    }
}

impl Priority {
    /// Sort rank: high=3, medium=2, low=1.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

impl CodeQuality {
    /// Tier from the number of detected issues: none is high, one or two is
    /// medium, anything more is low.
    pub fn from_issue_count(issues: usize) -> Self {
        match issues {
            0 => CodeQuality::High,
            1 | 2 => CodeQuality::Medium,
            _ => CodeQuality::Low,
        }
    }
}

impl FromStr for Category {
    type Err = AdvisorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pattern" => Ok(Category::Pattern),
            "solution" => Ok(Category::Solution),
            "example" => Ok(Category::Example),
            "note" => Ok(Category::Note),
            _ => Err(AdvisorError::UnknownCategory(s.to_string())),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

impl fmt::Display for CodeQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CodeQuality::High => write!(f, "high"),
            CodeQuality::Medium => write!(f, "medium"),
            CodeQuality::Low => write!(f, "low"),
        }
    }
}

impl fmt::Display for AnalysisSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisSource::Claude => write!(f, "claude"),
            AnalysisSource::ClaudeCodeSdk => write!(f, "claude-code-sdk"),
            AnalysisSource::LocalKnowledge => write!(f, "local_knowledge"),
            AnalysisSource::Fallback => write!(f, "fallback"),
        }
    }
}
