// ── Remote Assistant Seam ──

use advisor_core::AnalysisResult;
use anyhow::Result;

/// A remote model client whose answers are preferred over the offline
/// engine. `Ok(None)` means "no answer", which falls back like an error does
/// but is not counted as one.
pub trait RemoteAssistant {
    /// Whether credentials are present. Unconfigured remotes are never called.
    fn is_configured(&self) -> bool;

    fn analyze_code(&self, code: &str, context: &str) -> Result<Option<AnalysisResult>>;

    fn chat(&self, message: &str, context: &str) -> Result<Option<String>>;
}

/// No remote at all: every request is served offline.
#[derive(Debug, Clone, Copy, Default)]
pub struct Offline;

impl RemoteAssistant for Offline {
    fn is_configured(&self) -> bool {
        false
    }

    fn analyze_code(&self, _code: &str, _context: &str) -> Result<Option<AnalysisResult>> {
        Ok(None)
    }

    fn chat(&self, _message: &str, _context: &str) -> Result<Option<String>> {
        Ok(None)
    }
}
