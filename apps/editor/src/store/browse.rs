//! Grouping and filtering of the recursive `.tex` scan for the file
//! browser. Workspace files always form the first group; the rest are
//! grouped by directory in scan order.

use serde::Serialize;

use super::TexFileEntry;

#[derive(Debug, Serialize)]
pub struct FileGroup {
    /// Directory path, or the workspace label for the dedicated folder.
    pub label: String,
    pub is_workspace: bool,
    pub files: Vec<TexFileEntry>,
}

/// Groups scanned files deterministically: one workspace group first (when
/// any workspace file exists), then one group per directory in first-seen
/// order.
pub fn group_files(files: Vec<TexFileEntry>, workspace_label: &str) -> Vec<FileGroup> {
    let mut workspace: Vec<TexFileEntry> = Vec::new();
    let mut order: Vec<String> = Vec::new();
    let mut by_dir: std::collections::HashMap<String, Vec<TexFileEntry>> =
        std::collections::HashMap::new();

    for file in files {
        if file.is_workspace {
            workspace.push(file);
        } else {
            if !by_dir.contains_key(&file.directory) {
                order.push(file.directory.clone());
            }
            by_dir.entry(file.directory.clone()).or_default().push(file);
        }
    }

    let mut groups = Vec::new();
    if !workspace.is_empty() {
        groups.push(FileGroup {
            label: workspace_label.to_string(),
            is_workspace: true,
            files: workspace,
        });
    }
    for dir in order {
        if let Some(files) = by_dir.remove(&dir) {
            groups.push(FileGroup {
                label: dir,
                is_workspace: false,
                files,
            });
        }
    }
    groups
}

/// Case-insensitive substring filter over name and path. An empty or
/// whitespace-only query keeps everything.
pub fn filter_files(files: Vec<TexFileEntry>, query: &str) -> Vec<TexFileEntry> {
    let q = query.trim().to_lowercase();
    if q.is_empty() {
        return files;
    }
    files
        .into_iter()
        .filter(|f| f.name.to_lowercase().contains(&q) || f.path.to_lowercase().contains(&q))
        .collect()
}
