use anyhow::Result;
use log::info;
use std::path::Path;

use super::WorkflowReport;
use crate::config::SubtitleStripConfig;
use crate::domain::models::StreamKind;
use crate::error::MediaResult;
use crate::infra::fileset::{collect_files, ScanOptions};
use crate::media::directives::{MapDirective, RemuxJob, StreamSelector};
use crate::media::ffmpeg::MediaTool;
use crate::media::remux::RemuxExecutor;

pub fn strip_job(path: &Path, languages: &[String]) -> RemuxJob {
    languages.iter().fold(
        RemuxJob::new(vec![path.to_path_buf()]).map(MapDirective::include(0, StreamSelector::All)),
        |job, language| {
            job.map(MapDirective::exclude(
                0,
                StreamSelector::KindWithLanguage(StreamKind::Subtitle, language.clone()),
            ))
        },
    )
}

pub fn run(
    config: &SubtitleStripConfig,
    tool: &dyn MediaTool,
    dry_run: bool,
) -> Result<WorkflowReport> {
    let files = collect_files(&config.target_dir, &ScanOptions::mkv_only())?;
    info!("Found {} MKV file(s) to process", files.len());

    let executor = RemuxExecutor::new(tool, dry_run);
    let mut report = WorkflowReport::default();

    for path in &files {
        info!(
            "Removing {} subtitles from {path:?}...",
            config.languages.join("/")
        );
        let job = strip_job(path, &config.languages);
        if executor.is_dry_run() {
            if let Err(e) = report_kept_streams(tool, &job, path) {
                info!("[DRY RUN] Could not list kept streams: {e}");
            }
        }
        match executor.replace_in_place(&job, path) {
            Ok(()) => {
                info!("Subtitles removed successfully from {path:?}.");
                report.processed += 1;
            }
            Err(e) => report.record_failure(&path.display().to_string(), &e),
        }
    }

    Ok(report)
}

fn report_kept_streams(tool: &dyn MediaTool, job: &RemuxJob, path: &Path) -> MediaResult<()> {
    let streams = tool.probe(path)?;
    let kept = job.resolve(&[streams]);
    let indices: Vec<String> = kept.iter().map(|(_, index)| format!("#{index}")).collect();
    info!("[DRY RUN] {path:?} would keep streams {}", indices.join(", "));
    Ok(())
}
