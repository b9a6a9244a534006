use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

use super::matcher::match_episodes;
use super::WorkflowReport;
use crate::config::AudioMergeConfig;
use crate::domain::keys::KeyStrategy;
use crate::domain::models::{MatchedEpisode, StreamKind};
use crate::error::{MediaError, MediaResult};
use crate::infra::fileset::{build_file_set, ScanOptions};
use crate::media::directives::{MapDirective, MetadataDirective, RemuxJob, StreamSelector};
use crate::media::ffmpeg::MediaTool;
use crate::media::remux::{output_path_in, RemuxExecutor};
use crate::media::streams::{find_language_audio_index, partition_streams};

pub fn run(
    config: &AudioMergeConfig,
    tool: &dyn MediaTool,
    dry_run: bool,
) -> Result<WorkflowReport> {
    let scan_a = ScanOptions {
        extensions: config.extensions.clone(),
        recursive: true,
        exclude_dirs: Vec::new(),
    };
    let scan_b = ScanOptions {
        exclude_dirs: config.exclude_dirs.clone(),
        ..scan_a.clone()
    };

    info!("Searching for episodes in {:?}...", config.source_a);
    let source_a = build_file_set(&config.source_a, &scan_a, &KeyStrategy::SeasonEpisode)?;
    info!("{} episodes found in {:?}.", source_a.len(), config.source_a);

    info!("Searching for episodes in {:?}...", config.source_b);
    let source_b = build_file_set(&config.source_b, &scan_b, &KeyStrategy::SeasonEpisode)?;
    info!("{} episodes found in {:?}.", source_b.len(), config.source_b);

    let matched = match_episodes(&source_a, &source_b);
    let mut report = WorkflowReport::default();
    if matched.is_empty() {
        info!("No episodes to process.");
        return Ok(report);
    }

    if !dry_run {
        fs::create_dir_all(&config.output_dir)
            .with_context(|| format!("Failed to create output directory {:?}", config.output_dir))?;
    }

    let executor = RemuxExecutor::new(tool, dry_run);
    for episode in &matched {
        info!("Processing episode: {}", episode.key);
        match process_episode(config, tool, &executor, episode) {
            Ok(output) => {
                info!("Episode '{}' processed successfully: {output:?}", episode.key);
                report.processed += 1;
            }
            Err(e) => report.record_failure(episode.key.as_str(), &e),
        }
    }
    info!("Processing completed.");
    Ok(report)
}

fn process_episode(
    config: &AudioMergeConfig,
    tool: &dyn MediaTool,
    executor: &RemuxExecutor,
    episode: &MatchedEpisode,
) -> MediaResult<PathBuf> {
    let english_index = english_audio_index(config, tool, &episode.source_b)?;
    let job = build_merge_job(tool, episode, english_index, &config.english_language)?;
    let output = output_path_in(&config.output_dir, &episode.source_a)?;
    executor.write_to(&job, &output)?;
    Ok(output)
}

fn english_audio_index(
    config: &AudioMergeConfig,
    tool: &dyn MediaTool,
    path: &Path,
) -> MediaResult<u32> {
    let streams = tool.probe(path)?;
    let index = find_language_audio_index(&streams, &config.english_language, &config.english_title)
        .ok_or_else(|| MediaError::NoMatchingStream {
            path: path.to_path_buf(),
            what: "English audio stream".to_string(),
        })?;
    info!("English audio stream found: Stream #{index}");
    Ok(index)
}

/// Video and primary audio from source A, then the given audio stream from
/// source B. Source A's first audio stream is assumed to be its native track.
fn build_merge_job(
    tool: &dyn MediaTool,
    episode: &MatchedEpisode,
    english_index: u32,
    english_language: &str,
) -> MediaResult<RemuxJob> {
    let streams = tool.probe(&episode.source_a)?;
    let partition = partition_streams(&streams);
    let missing = |what: &str| MediaError::NoMatchingStream {
        path: episode.source_a.clone(),
        what: what.to_string(),
    };
    let video_index = partition.video.ok_or_else(|| missing("video stream"))?;
    let (primary_index, primary_language) = partition
        .primary_audio()
        .ok_or_else(|| missing("audio stream"))?;
    info!("Video index in {:?}: {video_index}", episode.source_a);
    info!(
        "Primary audio stream index in {:?}: {primary_index} ({primary_language})",
        episode.source_a
    );

    Ok(RemuxJob::new(vec![episode.source_a.clone(), episode.source_b.clone()])
        .map(MapDirective::include(0, StreamSelector::Index(video_index)))
        .map(MapDirective::include(0, StreamSelector::Index(primary_index)))
        .map(MapDirective::include(1, StreamSelector::Index(english_index)))
        .tag(MetadataDirective::language(StreamKind::Audio, 0, primary_language))
        .tag(MetadataDirective::language(StreamKind::Audio, 1, english_language)))
}
