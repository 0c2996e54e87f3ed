//! Finding the stylesheets to lint.

use anyhow::{Context, Result};
use sheetlint_config::FileFilter;
use sheetlint_types::Dialect;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

/// Directories never descended into.
const SKIPPED_DIRS: &[&str] = &["node_modules", "target", "vendor"];

/// Expand `paths` into a sorted, deduplicated list of stylesheet files.
///
/// Directories are walked for `.css` and `.scss` files; hidden entries and
/// dependency folders are skipped. Every file, including one named
/// explicitly, must pass `filter`, which matches paths relative to `root`.
#[tracing::instrument(skip(filter), fields(paths = paths.len()))]
pub fn collect_files(paths: &[PathBuf], root: &Path, filter: &FileFilter) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let metadata = std::fs::metadata(path)
            .with_context(|| format!("cannot read {}", path.display()))?;

        if metadata.is_file() {
            if in_scope(path, root, filter) {
                files.push(path.clone());
            }
            continue;
        }

        let walker = WalkDir::new(path)
            .follow_links(true)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !is_skipped(entry));
        for entry in walker {
            let entry = entry.with_context(|| format!("cannot walk {}", path.display()))?;
            let file = entry.path();
            if entry.file_type().is_file()
                && Dialect::from_path(file).is_some()
                && in_scope(file, root, filter)
            {
                files.push(file.to_path_buf());
            }
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!(files = files.len(), "collected stylesheets");
    Ok(files)
}

fn is_skipped(entry: &DirEntry) -> bool {
    let name = entry.file_name().to_string_lossy();
    name.starts_with('.')
        || (entry.file_type().is_dir() && SKIPPED_DIRS.contains(&name.as_ref()))
}

fn in_scope(path: &Path, root: &Path, filter: &FileFilter) -> bool {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let relative = absolute
        .strip_prefix(root)
        .or_else(|_| path.strip_prefix(root))
        .unwrap_or(path);
    filter.matches(relative)
}
