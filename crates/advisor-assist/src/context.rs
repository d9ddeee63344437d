// ── Project Context ──

use std::fmt;

use advisor_core::{FileContext, FileKind};

/// Files listed in a project summary.
const SUMMARY_FILE_LIMIT: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    TypeScript,
    React,
    JavaScript,
    Unknown,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::TypeScript => "typescript",
            Language::React => "react",
            Language::JavaScript => "javascript",
            Language::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Guess the snippet's language from a few telltale tokens. Type
/// annotations win over React hooks, which win over plain JS keywords.
pub fn detect_language(code: &str) -> Language {
    if code.contains("interface ") || code.contains(": ") {
        Language::TypeScript
    } else if code.contains("useState") || code.contains("useEffect") {
        Language::React
    } else if code.contains("function ") || code.contains("const ") {
        Language::JavaScript
    } else {
        Language::Unknown
    }
}

/// Markdown block describing the workspace, appended to analysis and chat
/// context.
pub fn project_summary(ctx: &FileContext) -> String {
    let stats = &ctx.workspace_stats;
    let file_types = stats
        .file_types
        .iter()
        .map(|(ext, count)| format!("{}({})", ext, count))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = format!(
        "## Project\n- files: {}\n- total size: {:.1}KB\n- file types: {}\n",
        stats.total_files,
        stats.total_size as f64 / 1024.0,
        if file_types.is_empty() { "none" } else { file_types.as_str() },
    );

    if let Some(current) = &ctx.current_file {
        out.push_str(&format!("- current file: {}\n", current));
    }

    let files: Vec<&str> = ctx
        .project_structure
        .iter()
        .filter(|f| f.kind == FileKind::File)
        .take(SUMMARY_FILE_LIMIT)
        .map(|f| f.path.as_str())
        .collect();
    if !files.is_empty() {
        out.push_str("\n## Files\n");
        for path in files {
            out.push_str(&format!("- {}\n", path));
        }
    }

    out.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use advisor_core::{ProjectFile, WorkspaceStats};
    use std::collections::BTreeMap;

    #[test]
    fn test_detect_language() {
        assert_eq!(detect_language("interface A {}"), Language::TypeScript);
        assert_eq!(detect_language("let a: number = 1"), Language::TypeScript);
        assert_eq!(detect_language("useState(0)"), Language::React);
        assert_eq!(detect_language("const a = 1"), Language::JavaScript);
        assert_eq!(detect_language("print 'hi'"), Language::Unknown);
    }

    #[test]
    fn test_project_summary() {
        let mut file_types = BTreeMap::new();
        file_types.insert("ts".to_string(), 2);
        file_types.insert("md".to_string(), 1);

        let mut structure = vec![ProjectFile {
            path: "src".to_string(),
            kind: FileKind::Directory,
            ..Default::default()
        }];
        for i in 0..12 {
            structure.push(ProjectFile {
                path: format!("src/f{i}.ts"),
                ..Default::default()
            });
        }

        let ctx = FileContext {
            current_file: Some("src/f0.ts".to_string()),
            project_structure: structure,
            workspace_stats: WorkspaceStats {
                total_files: 12,
                total_size: 2048,
                file_types,
            },
            ..Default::default()
        };

        let summary = project_summary(&ctx);
        assert!(summary.starts_with("## Project\n- files: 12\n- total size: 2.0KB"));
        assert!(summary.contains("- file types: md(1), ts(2)"));
        assert!(summary.contains("- current file: src/f0.ts"));
        assert!(summary.contains("- src/f9.ts"));
        assert!(!summary.contains("- src/f10.ts"));
        assert!(!summary.contains("- src\n"));
    }

    #[test]
    fn test_project_summary_empty() {
        let summary = project_summary(&FileContext::default());
        assert_eq!(
            summary,
            "## Project\n- files: 0\n- total size: 0.0KB\n- file types: none"
        );
    }
}
