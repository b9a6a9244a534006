use anyhow::{bail, Context, Result};
use log::{debug, info};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{AddSubtitlesArgs, MergeAudioArgs, StripSubtitlesArgs};
use crate::domain::keys::DEFAULT_DUB_MARKER;
use crate::infra::fileset::VIDEO_EXTENSIONS;
use crate::media::ffmpeg::FfmpegTool;

const CONFIG_ENV: &str = "EPISODE_REMUX_CONFIG";

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    tools: ToolsSection,
    add_subtitles: AddSubtitlesSection,
    merge_audio: MergeAudioSection,
    strip_subtitles: StripSubtitlesSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ToolsSection {
    ffmpeg: Option<PathBuf>,
    ffprobe: Option<PathBuf>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct AddSubtitlesSection {
    output_dir: Option<PathBuf>,
    source_dir: Option<PathBuf>,
    marker: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct MergeAudioSection {
    source_a: Option<PathBuf>,
    source_b: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    exclude_dirs: Option<Vec<String>>,
    extensions: Option<Vec<String>>,
    english_language: Option<String>,
    english_title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct StripSubtitlesSection {
    target_dir: Option<PathBuf>,
    languages: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleMergeConfig {
    pub output_dir: PathBuf,
    pub source_dir: PathBuf,
    pub marker: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioMergeConfig {
    pub source_a: PathBuf,
    pub source_b: PathBuf,
    pub output_dir: PathBuf,
    pub exclude_dirs: Vec<String>,
    pub extensions: Vec<String>,
    /// Matched against source B's audio language tags.
    pub english_language: String,
    /// Matched against source B's audio titles.
    pub english_title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleStripConfig {
    pub target_dir: PathBuf,
    pub languages: Vec<String>,
}

impl ConfigFile {
    /// Loads the config file from `explicit`, then `$EPISODE_REMUX_CONFIG`, then
    /// the user config directory. Only the last may be absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_path(path);
        }
        if let Ok(path) = env::var(CONFIG_ENV) {
            return Self::from_path(Path::new(&path));
        }
        let default_path = get_config_path();
        if default_path.exists() {
            return Self::from_path(&default_path);
        }
        debug!("No config file at {default_path:?}, using defaults");
        Ok(Self::default())
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Using config file: {}", path.display());
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {path:?}"))?;
        Self::parse(&content).with_context(|| format!("Invalid config file {path:?}"))
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn tool(&self) -> FfmpegTool {
        let defaults = FfmpegTool::default();
        FfmpegTool {
            ffmpeg: self.tools.ffmpeg.clone().unwrap_or(defaults.ffmpeg),
            ffprobe: self.tools.ffprobe.clone().unwrap_or(defaults.ffprobe),
        }
    }

    pub fn add_subtitles(&self, args: &AddSubtitlesArgs) -> Result<SubtitleMergeConfig> {
        let section = &self.add_subtitles;
        Ok(SubtitleMergeConfig {
            output_dir: required(
                &args.output_dir,
                &section.output_dir,
                "add_subtitles.output_dir",
            )?,
            source_dir: required(
                &args.source_dir,
                &section.source_dir,
                "add_subtitles.source_dir",
            )?,
            marker: args
                .marker
                .clone()
                .or_else(|| section.marker.clone())
                .unwrap_or_else(|| DEFAULT_DUB_MARKER.to_string()),
        })
    }

    pub fn merge_audio(&self, args: &MergeAudioArgs) -> Result<AudioMergeConfig> {
        let section = &self.merge_audio;
        let exclude_dirs = if args.exclude_dirs.is_empty() {
            section.exclude_dirs.clone().unwrap_or_default()
        } else {
            args.exclude_dirs.clone()
        };
        let english_language = section
            .english_language
            .clone()
            .unwrap_or_else(|| "eng".to_string());
        let english_title = section
            .english_title
            .clone()
            .unwrap_or_else(|| "english".to_string());
        // An empty needle would match every audio stream.
        if english_language.trim().is_empty() || english_title.trim().is_empty() {
            bail!("merge_audio.english_language and merge_audio.english_title must not be empty");
        }
        Ok(AudioMergeConfig {
            source_a: required(&args.source_a, &section.source_a, "merge_audio.source_a")?,
            source_b: required(&args.source_b, &section.source_b, "merge_audio.source_b")?,
            output_dir: required(&args.output_dir, &section.output_dir, "merge_audio.output_dir")?,
            exclude_dirs,
            extensions: section
                .extensions
                .clone()
                .unwrap_or_else(|| VIDEO_EXTENSIONS.iter().map(|s| s.to_string()).collect()),
            english_language,
            english_title,
        })
    }

    pub fn strip_subtitles(&self, args: &StripSubtitlesArgs) -> Result<SubtitleStripConfig> {
        let section = &self.strip_subtitles;
        let languages = if args.languages.is_empty() {
            section
                .languages
                .clone()
                .unwrap_or_else(|| vec!["fre".to_string(), "fra".to_string()])
        } else {
            args.languages.clone()
        };
        if languages.is_empty() {
            bail!("strip_subtitles.languages must name at least one language");
        }
        Ok(SubtitleStripConfig {
            target_dir: required(
                &args.target_dir,
                &section.target_dir,
                "strip_subtitles.target_dir",
            )?,
            languages,
        })
    }
}

/// `key` is `section.field`; the matching flag is the field in kebab case.
fn required(flag: &Option<PathBuf>, file: &Option<PathBuf>, key: &str) -> Result<PathBuf> {
    if let Some(path) = flag.as_ref().or(file.as_ref()) {
        return Ok(path.clone());
    }
    let field = key.rsplit('.').next().unwrap_or(key);
    bail!(
        "Missing directory: pass --{} or set {key} in the config file",
        field.replace('_', "-")
    )
}

fn get_config_dir_path() -> PathBuf {
    xdir::config()
        .map(|path| path.join("episode-remux"))
        // If the standard path could not be found (e.g.`$HOME` is not set),
        // default to the current directory.
        .unwrap_or_default()
}

fn get_config_path() -> PathBuf {
    get_config_dir_path().join("config.toml")
}
