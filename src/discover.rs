use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// File name suffix of a notation document.
pub const DOCUMENT_EXTENSION: &str = ".|Ψ";

/// Directories never descended into: build output, dependencies, VCS.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git", "dist", "target"];

pub fn is_document(path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(DOCUMENT_EXTENSION))
}

/// Expand files and directories into the sorted, de-duplicated set of
/// documents they contain. Paths that cannot be accessed are logged and
/// skipped; an empty result is left for the caller to judge.
pub fn collect_documents(inputs: &[PathBuf]) -> Vec<PathBuf> {
    let mut found = BTreeSet::new();
    for input in inputs {
        let root = std::path::absolute(input).unwrap_or_else(|_| input.clone());
        gather(&root, &mut found);
    }
    found.into_iter().collect()
}

fn gather(root: &Path, found: &mut BTreeSet<PathBuf>) {
    let walker = walkdir::WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            if entry.file_type().is_dir() {
                let name = entry.file_name().to_string_lossy();
                return !SKIPPED_DIRS.contains(&name.as_ref());
            }
            true
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                let path = err.path().unwrap_or(root).display().to_string();
                tracing::warn!(path = %path, "unable to access path: {err}");
                continue;
            }
        };
        if entry.file_type().is_file() && is_document(entry.path()) {
            found.insert(entry.into_path());
        }
    }
}
