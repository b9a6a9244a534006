use anyhow::{Context, Result};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::keys::KeyStrategy;
use crate::domain::models::FileSet;
use crate::media::remux::is_temp_output;

pub const VIDEO_EXTENSIONS: &[&str] = &["mkv", "mp4", "avi"];

#[derive(Debug, Clone)]
pub struct ScanOptions {
    /// Extensions without the leading dot, compared case-insensitively.
    pub extensions: Vec<String>,
    pub recursive: bool,
    /// Directory names skipped at every depth.
    pub exclude_dirs: Vec<String>,
}

impl ScanOptions {
    pub fn mkv_only() -> Self {
        Self {
            extensions: vec!["mkv".to_string()],
            recursive: false,
            exclude_dirs: Vec::new(),
        }
    }

    pub fn has_allowed_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
            .unwrap_or(false)
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        dir.file_name()
            .and_then(|s| s.to_str())
            .map(|name| self.exclude_dirs.iter().any(|e| e == name))
            .unwrap_or(false)
    }
}

/// Lists candidate files under `root` in traversal order: each directory's
/// files sorted by name, then its subdirectories sorted by name.
pub fn collect_files(root: &Path, options: &ScanOptions) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    collect_files_helper(root, options, &mut files)
        .with_context(|| format!("Failed to scan directory {root:?}"))?;
    Ok(files)
}

fn collect_files_helper(dir: &Path, options: &ScanOptions, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<Vec<_>>>()?;
    entries.sort();

    let mut subdirs = Vec::new();
    for path in entries {
        if path.is_file() {
            if options.has_allowed_extension(&path) && !is_temp_output(&path) {
                files.push(path);
            }
        } else if path.is_dir() && options.recursive {
            if options.is_excluded(&path) {
                debug!("Skipping excluded directory {path:?}");
                continue;
            }
            subdirs.push(path);
        }
    }

    for subdir in subdirs {
        collect_files_helper(&subdir, options, files)?;
    }
    Ok(())
}

/// Builds the key -> path mapping for one source tree. On duplicate keys the
/// file visited last wins.
pub fn build_file_set(
    root: &Path,
    options: &ScanOptions,
    strategy: &KeyStrategy,
) -> Result<FileSet> {
    let mut set = FileSet::new();
    for path in collect_files(root, options)? {
        let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
            warn!("Skipping file with non UTF-8 name {path:?}");
            continue;
        };
        let Some(key) = strategy.extract(name) else {
            if strategy.warns_on_miss() {
                warn!("Could not extract season and episode from '{name}'.");
            }
            continue;
        };
        if let Some(previous) = set.insert(key.clone(), path.clone()) {
            warn!("Duplicate key {key}: {previous:?} replaced by {path:?}");
        }
    }
    Ok(set)
}
