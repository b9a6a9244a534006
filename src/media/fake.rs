//! In-memory [`MediaTool`] for tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::models::StreamDescriptor;
use crate::error::{MediaError, MediaResult};
use crate::media::directives::RemuxJob;
use crate::media::ffmpeg::MediaTool;

#[derive(Debug, Clone)]
pub enum RemuxOutcome {
    /// Exit 0 after writing these bytes to the destination.
    Write(Vec<u8>),
    /// Write some bytes, then exit non-zero.
    PartialThenFail(Vec<u8>),
}

pub struct FakeTool {
    probes: HashMap<PathBuf, Vec<StreamDescriptor>>,
    outcome: RemuxOutcome,
    failing_inputs: Vec<PathBuf>,
    jobs: RefCell<Vec<(RemuxJob, PathBuf)>>,
    probed: RefCell<Vec<PathBuf>>,
}

impl FakeTool {
    pub fn new() -> Self {
        Self {
            probes: HashMap::new(),
            outcome: RemuxOutcome::Write(b"remuxed".to_vec()),
            failing_inputs: Vec::new(),
            jobs: RefCell::new(Vec::new()),
            probed: RefCell::new(Vec::new()),
        }
    }

    /// Paths without canned streams fail to probe.
    pub fn with_streams(mut self, path: &Path, streams: Vec<StreamDescriptor>) -> Self {
        self.probes.insert(path.to_path_buf(), streams);
        self
    }

    pub fn with_remux(mut self, outcome: RemuxOutcome) -> Self {
        self.outcome = outcome;
        self
    }

    /// Any job reading `path` as its first input fails.
    pub fn failing_for(mut self, path: &Path) -> Self {
        self.failing_inputs.push(path.to_path_buf());
        self
    }

    pub fn remux_jobs(&self) -> Vec<RemuxJob> {
        self.jobs.borrow().iter().map(|(job, _)| job.clone()).collect()
    }

    pub fn remux_destinations(&self) -> Vec<PathBuf> {
        self.jobs.borrow().iter().map(|(_, dest)| dest.clone()).collect()
    }

    pub fn probed(&self) -> Vec<PathBuf> {
        self.probed.borrow().clone()
    }
}

impl MediaTool for FakeTool {
    fn probe(&self, path: &Path) -> MediaResult<Vec<StreamDescriptor>> {
        self.probed.borrow_mut().push(path.to_path_buf());
        self.probes
            .get(path)
            .cloned()
            .ok_or_else(|| MediaError::ProbeFailed {
                path: path.to_path_buf(),
                stderr: "Invalid data found when processing input".to_string(),
            })
    }

    fn remux(&self, job: &RemuxJob, destination: &Path) -> MediaResult<()> {
        self.jobs
            .borrow_mut()
            .push((job.clone(), destination.to_path_buf()));

        let fails = job
            .inputs
            .first()
            .map(|input| self.failing_inputs.contains(input))
            .unwrap_or(false);
        let io_err = |source| MediaError::Io {
            path: destination.to_path_buf(),
            source,
        };
        let command = self.command_line(job, destination)?;
        let failed = || MediaError::RemuxToolFailed {
            command: command.clone(),
            code: Some(1),
            stderr: "Conversion failed!".to_string(),
        };

        match &self.outcome {
            RemuxOutcome::Write(_) if fails => Err(failed()),
            RemuxOutcome::Write(bytes) => fs::write(destination, bytes).map_err(io_err),
            RemuxOutcome::PartialThenFail(bytes) => {
                fs::write(destination, bytes).map_err(io_err)?;
                Err(failed())
            }
        }
    }
}
