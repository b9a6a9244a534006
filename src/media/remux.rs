use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempPath;

use crate::error::{MediaError, MediaResult};
use crate::media::directives::RemuxJob;
use crate::media::ffmpeg::MediaTool;

/// Marker between a temporary output's random part and its extension.
pub const TEMP_MARKER: &str = ".temp";

/// Runs remux jobs through a temporary file next to the target and only
/// renames it over the target once the tool has succeeded.
pub struct RemuxExecutor<'a> {
    tool: &'a dyn MediaTool,
    dry_run: bool,
}

impl<'a> RemuxExecutor<'a> {
    pub fn new(tool: &'a dyn MediaTool, dry_run: bool) -> Self {
        Self { tool, dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Rewrites `target`, which is usually also one of the job's inputs.
    pub fn replace_in_place(&self, job: &RemuxJob, target: &Path) -> MediaResult<()> {
        self.write_to(job, target)
    }

    /// Writes the job's output to `destination`, replacing any existing file.
    pub fn write_to(&self, job: &RemuxJob, destination: &Path) -> MediaResult<()> {
        if self.dry_run {
            info!(
                "[DRY RUN] Would run: {}",
                self.tool.command_line(job, destination)?
            );
            return Ok(());
        }

        let temp = temp_path_for(destination)?;
        self.tool.remux(job, &temp)?;

        let written = fs::metadata(&temp)
            .map_err(|source| MediaError::Io {
                path: temp.to_path_buf(),
                source,
            })?
            .len();
        if written == 0 {
            return Err(MediaError::EmptyOutput(temp.to_path_buf()));
        }
        if let Ok(existing) = fs::metadata(destination) {
            fs::set_permissions(&temp, existing.permissions()).map_err(|source| {
                MediaError::Io {
                    path: temp.to_path_buf(),
                    source,
                }
            })?;
        }

        temp.persist(destination).map_err(|e| MediaError::Io {
            path: destination.to_path_buf(),
            source: e.error,
        })?;
        Ok(())
    }
}

/// Reserves `.<stem>.<random>.temp.<ext>` in the destination's directory.
/// The file is removed when the returned path is dropped without being persisted.
fn temp_path_for(destination: &Path) -> MediaResult<TempPath> {
    let invalid = || MediaError::InvalidTarget {
        path: destination.to_path_buf(),
    };
    let stem = destination
        .file_stem()
        .and_then(|s| s.to_str())
        .ok_or_else(invalid)?;
    let directory = match destination.parent() {
        Some(p) if p.as_os_str().is_empty() => Path::new("."),
        Some(p) => p,
        None => return Err(invalid()),
    };
    let suffix = match destination.extension().and_then(|s| s.to_str()) {
        Some(ext) => format!("{TEMP_MARKER}.{ext}"),
        None => TEMP_MARKER.to_string(),
    };

    let prefix = format!(".{stem}.");
    let mut builder = tempfile::Builder::new();
    builder.prefix(&prefix).suffix(&suffix);
    // New outputs get the usual umask-filtered mode instead of 0600.
    #[cfg(unix)]
    builder.permissions(std::os::unix::fs::PermissionsExt::from_mode(0o666));
    let file = builder
        .tempfile_in(directory)
        .map_err(|source| MediaError::Io {
            path: directory.to_path_buf(),
            source,
        })?;
    Ok(file.into_temp_path())
}

/// Whether a file name looks like an unpromoted temporary output.
pub fn is_temp_output(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|s| s.to_str()) else {
        return false;
    };
    match path.extension().and_then(|s| s.to_str()) {
        Some(ext) => name.ends_with(&format!("{TEMP_MARKER}.{ext}")),
        None => name.ends_with(TEMP_MARKER),
    }
}

pub fn output_path_in(directory: &Path, source: &Path) -> MediaResult<PathBuf> {
    let name = source.file_name().ok_or_else(|| MediaError::InvalidTarget {
        path: source.to_path_buf(),
    })?;
    Ok(directory.join(name))
}
