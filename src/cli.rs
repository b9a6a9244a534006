use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "episode-remux")]
#[command(about = "Match episodes across source trees and remux their audio and subtitle tracks")]
pub struct Cli {
    /// Config file (defaults to $EPISODE_REMUX_CONFIG or the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print the remux commands without running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short = 'v', long = "verbose", global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Copy the subtitle tracks of dubbed source files into matching output files
    AddSubtitles(AddSubtitlesArgs),
    /// Combine video and native audio from source A with English audio from source B
    MergeAudio(MergeAudioArgs),
    /// Drop subtitle tracks in the given languages from every MKV in a directory
    StripSubtitles(StripSubtitlesArgs),
}

#[derive(Args, Debug, Default)]
pub struct AddSubtitlesArgs {
    /// Directory with the MKV files to receive subtitles (rewritten in place)
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Directory with the dubbed source files
    #[arg(long)]
    pub source_dir: Option<PathBuf>,

    /// Name fragment identifying source files, removed to form the match key
    #[arg(long)]
    pub marker: Option<String>,
}

#[derive(Args, Debug, Default)]
pub struct MergeAudioArgs {
    /// Tree providing video and primary audio
    #[arg(long)]
    pub source_a: Option<PathBuf>,

    /// Tree providing the English audio track
    #[arg(long)]
    pub source_b: Option<PathBuf>,

    /// Directory for the merged files
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Directory name to skip while scanning source B (repeatable)
    #[arg(long = "exclude")]
    pub exclude_dirs: Vec<String>,
}

#[derive(Args, Debug, Default)]
pub struct StripSubtitlesArgs {
    /// Directory with the MKV files to rewrite in place
    #[arg(long)]
    pub target_dir: Option<PathBuf>,

    /// Subtitle language tag to remove (repeatable)
    #[arg(long = "language")]
    pub languages: Vec<String>,
}
