use log::{debug, info};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use crate::domain::models::StreamDescriptor;
use crate::error::{MediaError, MediaResult};
use crate::media::directives::RemuxJob;
use crate::media::streams;

/// The two external operations the workflows depend on.
pub trait MediaTool {
    fn probe(&self, path: &Path) -> MediaResult<Vec<StreamDescriptor>>;

    /// Runs the remux tool for `job`, writing to `destination`.
    fn remux(&self, job: &RemuxJob, destination: &Path) -> MediaResult<()>;

    fn command_line(&self, job: &RemuxJob, destination: &Path) -> MediaResult<String> {
        Ok(render_command(Path::new("ffmpeg"), &job.to_args(destination)?))
    }
}

#[derive(Debug, Clone)]
pub struct FfmpegTool {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
        }
    }
}

impl MediaTool for FfmpegTool {
    fn probe(&self, path: &Path) -> MediaResult<Vec<StreamDescriptor>> {
        info!("Extracting stream information from {path:?}...");
        let mut command = Command::new(&self.ffprobe);
        command
            .args(["-v", "error", "-show_entries", "stream", "-of", "json"])
            .arg(path);
        let output = run(&mut command, &self.ffprobe)?;

        if !output.status.success() {
            return Err(MediaError::ProbeFailed {
                path: path.to_path_buf(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        let streams = streams::parse_streams(path, &output.stdout)?;
        if streams.is_empty() {
            return Err(MediaError::NoStreams(path.to_path_buf()));
        }
        streams::log_streams(path, &streams);
        Ok(streams)
    }

    fn remux(&self, job: &RemuxJob, destination: &Path) -> MediaResult<()> {
        let args = job.to_args(destination)?;
        let command_line = render_command(&self.ffmpeg, &args);
        info!("Executing ffmpeg with the following command:\n{command_line}");

        let mut command = Command::new(&self.ffmpeg);
        command.args(&args);
        let output = run(&mut command, &self.ffmpeg)?;
        debug!("ffmpeg stderr:\n{}", String::from_utf8_lossy(&output.stderr));

        if !output.status.success() {
            return Err(MediaError::RemuxToolFailed {
                command: command_line,
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(())
    }

    fn command_line(&self, job: &RemuxJob, destination: &Path) -> MediaResult<String> {
        Ok(render_command(&self.ffmpeg, &job.to_args(destination)?))
    }
}

fn run(command: &mut Command, program: &Path) -> MediaResult<Output> {
    let tool = program.display().to_string();
    command.output().map_err(|source| match source.kind() {
        std::io::ErrorKind::NotFound => MediaError::ToolNotFound { tool },
        _ => MediaError::Spawn { tool, source },
    })
}

/// Human-readable command line, for logs only.
pub fn render_command(program: &Path, args: &[OsString]) -> String {
    let mut parts = vec![program.display().to_string()];
    parts.extend(args.iter().map(|a| a.to_string_lossy().into_owned()));
    parts.join(" ")
}
