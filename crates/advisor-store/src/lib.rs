pub mod highlight;
pub mod seed;
pub mod suggest;

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use advisor_core::{
    Category, ContextualSuggestion, FileContext, KnowledgeEntry, MatchType, NewEntry,
    SearchResult,
};
use chrono::Utc;
use uuid::Uuid;

use crate::highlight::{contains_ignore_case, highlight};

// ── Types ──

/// In-memory knowledge base. Cloning yields another handle to the same
/// entry list; one lock guards every read and append.
#[derive(Debug, Clone, Default)]
pub struct KnowledgeStore {
    entries: Arc<RwLock<Vec<KnowledgeEntry>>>,
}

// ── Scoring ──

const TITLE_SCORE: u32 = 100;
const TAG_SCORE: u32 = 50;
const CONTENT_SCORE: u32 = 30;
const CATEGORY_SCORE: u32 = 20;

const SHARED_TAG_SCORE: u32 = 10;
const SAME_CATEGORY_SCORE: u32 = 5;
const SHARED_FILE_SCORE: u32 = 3;

fn search_score(entry: &KnowledgeEntry, query: &str) -> (u32, MatchType) {
    let mut score = 0;
    let mut match_type = MatchType::Partial;

    if contains_ignore_case(&entry.title, query) {
        score += TITLE_SCORE;
        match_type = MatchType::Exact;
    }
    let tag_hits = entry
        .tags
        .iter()
        .filter(|t| contains_ignore_case(t, query))
        .count() as u32;
    score += tag_hits * TAG_SCORE;
    if contains_ignore_case(&entry.content, query) {
        score += CONTENT_SCORE;
    }
    if contains_ignore_case(entry.category.as_str(), query) {
        score += CATEGORY_SCORE;
    }

    (score, match_type)
}

fn related_score(target: &KnowledgeEntry, candidate: &KnowledgeEntry) -> u32 {
    let shared_tags = target
        .tags
        .iter()
        .filter(|t| candidate.tags.contains(t))
        .count() as u32;

    let shared_files = target
        .related_files
        .iter()
        .filter(|file| {
            candidate
                .related_files
                .iter()
                .any(|f| f.contains(file.as_str()) || file.contains(f.as_str()))
        })
        .count() as u32;

    let mut score = shared_tags * SHARED_TAG_SCORE + shared_files * SHARED_FILE_SCORE;
    if candidate.category == target.category {
        score += SAME_CATEGORY_SCORE;
    }
    score
}

fn normalize_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// Time-based id with a random suffix so two entries added within the same
/// millisecond still differ.
fn generate_id() -> String {
    let suffix = Uuid::new_v4().simple().to_string();
    format!("custom-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

// ── Public API ──

impl KnowledgeStore {
    /// A store holding no entries.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A store initialized with the curated seed entries.
    pub fn with_seed() -> Self {
        let store = Self::from_entries(seed::seed_entries());
        log::info!("knowledge base initialized with {} entries", store.len());
        store
    }

    /// Build a store from prepared entries. Later entries whose id is
    /// already present are dropped.
    pub fn from_entries(entries: impl IntoIterator<Item = KnowledgeEntry>) -> Self {
        let mut kept: Vec<KnowledgeEntry> = Vec::new();
        for entry in entries {
            if kept.iter().any(|e| e.id == entry.id) {
                log::warn!("dropping duplicate knowledge entry id: {}", entry.id);
                continue;
            }
            kept.push(entry);
        }
        Self {
            entries: Arc::new(RwLock::new(kept)),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<KnowledgeEntry>> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<KnowledgeEntry>> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Keyword search over title, tags, content and category.
    ///
    /// Scores are additive; zero-score entries are dropped and ties keep
    /// store order. An empty query or `max_results == 0` returns nothing.
    pub fn search(&self, query: &str, max_results: usize) -> Vec<SearchResult> {
        if query.is_empty() || max_results == 0 {
            return Vec::new();
        }

        let entries = self.read();
        let mut results: Vec<SearchResult> = entries
            .iter()
            .filter_map(|entry| {
                let (score, match_type) = search_score(entry, query);
                (score > 0).then(|| SearchResult {
                    entry: entry.clone(),
                    score,
                    match_type,
                    highlighted_content: highlight(&entry.content, query),
                })
            })
            .collect();

        results.sort_by(|a, b| b.score.cmp(&a.score));
        results.truncate(max_results);
        results
    }

    /// Entries ranked by shared tags, category and related-file overlap with
    /// `entry_id`. Unknown ids yield an empty list.
    pub fn related_entries(&self, entry_id: &str, max_results: usize) -> Vec<KnowledgeEntry> {
        let entries = self.read();
        let Some(target) = entries.iter().find(|e| e.id == entry_id) else {
            return Vec::new();
        };

        let mut scored: Vec<(u32, &KnowledgeEntry)> = entries
            .iter()
            .filter(|e| e.id != entry_id)
            .map(|e| (related_score(target, e), e))
            .filter(|(score, _)| *score > 0)
            .collect();

        scored.sort_by(|a, b| b.0.cmp(&a.0));
        scored
            .into_iter()
            .take(max_results)
            .map(|(_, e)| e.clone())
            .collect()
    }

    pub fn contextual_suggestions(&self, ctx: &FileContext) -> Vec<ContextualSuggestion> {
        suggest::contextual_suggestions(ctx)
    }

    /// Append a new entry and return its freshly generated id.
    pub fn add_entry(&self, mut new_entry: NewEntry) -> String {
        new_entry.tags = normalize_tags(new_entry.tags);

        let mut entries = self.write();
        let mut id = generate_id();
        while entries.iter().any(|e| e.id == id) {
            id = generate_id();
        }

        log::info!("added knowledge entry {}: {}", id, new_entry.title);
        entries.push(new_entry.into_entry(id.clone(), Utc::now()));
        id
    }

    pub fn get(&self, entry_id: &str) -> Option<KnowledgeEntry> {
        self.read().iter().find(|e| e.id == entry_id).cloned()
    }

    pub fn all_entries(&self) -> Vec<KnowledgeEntry> {
        self.read().clone()
    }

    pub fn entries_by_category(&self, category: Category) -> Vec<KnowledgeEntry> {
        self.read()
            .iter()
            .filter(|e| e.category == category)
            .cloned()
            .collect()
    }

    /// Entries with at least one tag containing `tag`, ignoring case.
    pub fn entries_by_tag(&self, tag: &str) -> Vec<KnowledgeEntry> {
        self.read()
            .iter()
            .filter(|e| e.tags.iter().any(|t| contains_ignore_case(t, tag)))
            .cloned()
            .collect()
    }
}
