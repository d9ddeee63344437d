// ── Configuration ──
//
// advisor.yaml:
//   search:    { max_results: 10 }
//   related:   { max_results: 5 }
//   analyzer:  { confidence: 0.6, detailed_confidence: 0.7 }
//   knowledge: { seed: true }

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ── Types ──

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AdvisorConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub related: RelatedConfig,
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
    #[serde(default)]
    pub knowledge: KnowledgeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    #[serde(default = "default_search_max")]
    pub max_results: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelatedConfig {
    #[serde(default = "default_related_max")]
    pub max_results: usize,
}

/// Fixed confidence reported by each offline analyzer mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalyzerConfig {
    #[serde(default = "default_confidence")]
    pub confidence: f64,
    #[serde(default = "default_detailed_confidence")]
    pub detailed_confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct KnowledgeConfig {
    /// Start the store with the curated seed entries.
    #[serde(default = "default_true")]
    pub seed: bool,
}

// ── Helpers ──

pub const DEFAULT_SEARCH_MAX: usize = 10;
pub const DEFAULT_RELATED_MAX: usize = 5;
pub const DEFAULT_CONFIDENCE: f64 = 0.6;
pub const DEFAULT_DETAILED_CONFIDENCE: f64 = 0.7;

fn default_search_max() -> usize {
    DEFAULT_SEARCH_MAX
}

fn default_related_max() -> usize {
    DEFAULT_RELATED_MAX
}

fn default_confidence() -> f64 {
    DEFAULT_CONFIDENCE
}

fn default_detailed_confidence() -> f64 {
    DEFAULT_DETAILED_CONFIDENCE
}

fn default_true() -> bool {
    true
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            max_results: default_search_max(),
        }
    }
}

impl Default for RelatedConfig {
    fn default() -> Self {
        Self {
            max_results: default_related_max(),
        }
    }
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            confidence: default_confidence(),
            detailed_confidence: default_detailed_confidence(),
        }
    }
}

impl Default for KnowledgeConfig {
    fn default() -> Self {
        Self { seed: true }
    }
}

impl AnalyzerConfig {
    /// Both confidences forced into `[0, 1]`; NaN falls back to the default.
    pub fn clamped(&self) -> Self {
        fn clamp(value: f64, fallback: f64) -> f64 {
            if value.is_nan() {
                fallback
            } else {
                value.clamp(0.0, 1.0)
            }
        }
        Self {
            confidence: clamp(self.confidence, DEFAULT_CONFIDENCE),
            detailed_confidence: clamp(self.detailed_confidence, DEFAULT_DETAILED_CONFIDENCE),
        }
    }
}

// ── Public API ──

/// Load the advisor config, falling back to defaults when the file is
/// missing, empty, or only a comment header.
pub fn load_config(path: &Path) -> Result<AdvisorConfig> {
    if !path.exists() {
        return Ok(AdvisorConfig::default());
    }

    let content = fs::read_to_string(path)?;
    if content
        .lines()
        .all(|l| l.trim().is_empty() || l.trim_start().starts_with('#'))
    {
        return Ok(AdvisorConfig::default());
    }

    let mut config: AdvisorConfig = serde_yaml::from_str(&content)?;
    config.analyzer = config.analyzer.clamped();
    Ok(config)
}
