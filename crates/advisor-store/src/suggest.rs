// ── Contextual Suggestions ──
//
// Rule table over the caller's file context. Every matching rule adds one
// suggestion; the result is ordered high → medium → low, stable within a tier.

use advisor_core::{ContextualSuggestion, FileContext, Priority, SuggestionKind};

/// Suggest project-structure cleanup above this many files.
pub const LARGE_PROJECT_FILES: usize = 20;

fn suggestion(
    kind: SuggestionKind,
    title: &str,
    description: &str,
    action: Option<&str>,
    priority: Priority,
) -> ContextualSuggestion {
    ContextualSuggestion {
        kind,
        title: title.to_string(),
        description: description.to_string(),
        action: action.map(String::from),
        priority,
    }
}

/// Text after the last `.` of the current file, or the whole name when it
/// has no dot. Compared case-sensitively.
fn current_extension(ctx: &FileContext) -> Option<&str> {
    let file = ctx.current_file.as_deref()?;
    file.rsplit('.').next()
}

fn touches_ai(ctx: &FileContext) -> bool {
    ctx.project_structure
        .iter()
        .any(|f| f.path.to_lowercase().contains("ai"))
}

pub fn contextual_suggestions(ctx: &FileContext) -> Vec<ContextualSuggestion> {
    let mut suggestions = Vec::new();

    match current_extension(ctx) {
        Some("tsx") | Some("jsx") => suggestions.push(suggestion(
            SuggestionKind::Pattern,
            "React component optimization",
            "Review memoization patterns with React.memo, useMemo and useCallback",
            Some("optimization-patterns"),
            Priority::Medium,
        )),
        Some("ts") => suggestions.push(suggestion(
            SuggestionKind::Improvement,
            "Improve TypeScript type safety",
            "Enable strict mode and lean on utility types",
            Some("typescript-safety"),
            Priority::High,
        )),
        _ => {}
    }

    if touches_ai(ctx) {
        suggestions.push(suggestion(
            SuggestionKind::Related,
            "AI integration patterns",
            "Best practices for implementing and tuning AI features",
            Some("ai-patterns"),
            Priority::High,
        ));
    }

    if ctx.workspace_stats.total_files > LARGE_PROJECT_FILES {
        suggestions.push(suggestion(
            SuggestionKind::Improvement,
            "Reorganize project structure",
            "The file count is growing; consider modularizing and revisiting the folder layout",
            None,
            Priority::Low,
        ));
    }

    suggestions.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
    suggestions
}
