use anyhow::Result;
use log::{info, warn};

use super::WorkflowReport;
use crate::config::SubtitleMergeConfig;
use crate::domain::keys::KeyStrategy;
use crate::domain::models::StreamKind;
use crate::infra::fileset::{build_file_set, ScanOptions};
use crate::media::directives::{MapDirective, RemuxJob, StreamSelector};
use crate::media::ffmpeg::MediaTool;
use crate::media::remux::RemuxExecutor;

/// Copies every subtitle track of each dubbed source file into the output file
/// of the same name, rewriting the output file in place.
pub fn run(
    config: &SubtitleMergeConfig,
    tool: &dyn MediaTool,
    dry_run: bool,
) -> Result<WorkflowReport> {
    let scan = ScanOptions::mkv_only();
    let output_files = build_file_set(&config.output_dir, &scan, &KeyStrategy::FileName)?;
    let source_files = build_file_set(
        &config.source_dir,
        &scan,
        &KeyStrategy::MarkerStripped(config.marker.clone()),
    )?;
    info!(
        "{} output file(s), {} source file(s) containing '{}'",
        output_files.len(),
        source_files.len(),
        config.marker.trim()
    );

    let executor = RemuxExecutor::new(tool, dry_run);
    let mut report = WorkflowReport::default();

    for (key, output_file) in &output_files {
        let Some(source_file) = source_files.get(key) else {
            warn!("No corresponding source file found for {output_file:?}.");
            report.skipped += 1;
            continue;
        };

        info!("Adding subtitles to {output_file:?}...");
        let job = RemuxJob::new(vec![output_file.clone(), source_file.clone()])
            .map(MapDirective::include(0, StreamSelector::All))
            .map(MapDirective::include(1, StreamSelector::Kind(StreamKind::Subtitle)));

        match executor.replace_in_place(&job, output_file) {
            Ok(()) => {
                info!("Subtitles added successfully to {output_file:?}.");
                report.processed += 1;
            }
            Err(e) => report.record_failure(key.as_str(), &e),
        }
    }

    Ok(report)
}
