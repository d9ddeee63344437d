// ── Workspace Scan ──
//
// Builds a FileContext from a directory on disk. Hidden entries and
// dependency/build folders are skipped.

use std::path::Path;

use advisor_core::{FileContext, FileKind, ProjectFile, WorkspaceStats};
use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

const SKIPPED_DIRS: [&str; 4] = ["node_modules", "target", "dist", "build"];

fn is_skipped(entry: &DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.') || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&&*name))
}

fn relative_path(entry: &DirEntry, root: &Path) -> String {
    let rel = entry.path().strip_prefix(root).unwrap_or(entry.path());
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

pub fn scan_directory(root: &Path, current_file: Option<String>) -> Result<FileContext> {
    if !root.is_dir() {
        anyhow::bail!("not a directory: {}", root.display());
    }

    let mut structure = Vec::new();
    let mut stats = WorkspaceStats::default();

    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped(e));

    for entry in walker {
        let entry = entry.with_context(|| format!("scanning {}", root.display()))?;
        if entry.depth() == 0 {
            continue;
        }

        let path = relative_path(&entry, root);
        if entry.file_type().is_dir() {
            structure.push(ProjectFile {
                path,
                kind: FileKind::Directory,
                extension: None,
                size: None,
            });
            continue;
        }

        let size = entry.metadata().map(|m| m.len()).unwrap_or(0);
        let extension = entry
            .path()
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        stats.total_files += 1;
        stats.total_size += size;
        if let Some(ext) = &extension {
            *stats.file_types.entry(ext.clone()).or_insert(0) += 1;
        }

        structure.push(ProjectFile {
            path,
            kind: FileKind::File,
            extension,
            size: Some(size),
        });
    }

    log::debug!(
        "scanned {} files under {}",
        stats.total_files,
        root.display()
    );

    Ok(FileContext {
        current_file,
        project_structure: structure,
        workspace_stats: stats,
        ..Default::default()
    })
}
