use crate::error::{CompressionError, ErrorKind};
use crate::formats::OutputFormat;
use crate::method::Method;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// One file's compression request with fully resolved parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompressionJob {
    pub input: PathBuf,
    pub output: PathBuf,
    pub method: Method,
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobError {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<&CompressionError> for JobError {
    fn from(err: &CompressionError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobOutcome {
    Compressed { compressed_size: u64 },
    Failed(JobError),
    /// Not attempted because the batch was stopped first.
    Skipped,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompressionResult {
    pub job: CompressionJob,
    pub original_size: u64,
    pub outcome: JobOutcome,
    pub elapsed: Duration,
}

impl CompressionResult {
    pub fn compressed(job: CompressionJob, original_size: u64, compressed_size: u64, elapsed: Duration) -> Self {
        Self {
            job,
            original_size,
            outcome: JobOutcome::Compressed { compressed_size },
            elapsed,
        }
    }

    pub fn failed(job: CompressionJob, original_size: u64, error: &CompressionError, elapsed: Duration) -> Self {
        Self {
            job,
            original_size,
            outcome: JobOutcome::Failed(JobError::from(error)),
            elapsed,
        }
    }

    pub fn skipped(job: CompressionJob) -> Self {
        Self {
            job,
            original_size: 0,
            outcome: JobOutcome::Skipped,
            elapsed: Duration::ZERO,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, JobOutcome::Compressed { .. })
    }

    pub fn compressed_size(&self) -> Option<u64> {
        match self.outcome {
            JobOutcome::Compressed { compressed_size } => Some(compressed_size),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&JobError> {
        match &self.outcome {
            JobOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }
}
