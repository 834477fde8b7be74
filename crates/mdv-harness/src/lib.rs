#![forbid(unsafe_code)]

//! Comparison orchestrator for two independently built mooring-dynamics
//! backends.
//!
//! The harness parses a system descriptor, builds one prescribed-motion
//! excitation, drives both backends through the same step sequence,
//! regularizes their output tables, and certifies per-channel agreement
//! with the magnitude-adaptive comparator. How each backend actually
//! runs (process launch for one, foreign-function stepping for the
//! other) lives behind the narrow [`Backend`] trait.

pub mod backend;
pub mod orchestrator;
pub mod report;

use std::io;
use std::path::PathBuf;

use mdv_descriptor::DescriptorError;
use mdv_motion::ExcitationFileError;
use mdv_output::OutputError;
use thiserror::Error;

pub use backend::{run_backend, Backend, BackendError};
pub use orchestrator::{run_comparison, ComparisonOutcome, MotionSource, RunConfig};
pub use report::{write_report, ChannelReport, RunReport};

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("descriptor parse failed for {path}: {source}")]
    Descriptor {
        path: PathBuf,
        source: DescriptorError,
    },
    #[error("output parse failed: {0}")]
    Output(#[from] OutputError),
    #[error("excitation trace load failed: {0}")]
    Excitation(#[from] ExcitationFileError),
    #[error("backend run failed: {0}")]
    Backend(#[from] BackendError),
    #[error("driver file write failed for {path}: {source}")]
    DriverWrite { path: PathBuf, source: io::Error },
    #[error("the two outputs disagree on channel count: {test} vs {baseline}")]
    ChannelCountMismatch { test: usize, baseline: usize },
    #[error("the two outputs disagree on channel {index}: `{test}` vs `{baseline}`")]
    ChannelOrderMismatch {
        index: usize,
        test: String,
        baseline: String,
    },
    #[error("report write failed for {path}: {reason}")]
    ReportWrite { path: PathBuf, reason: String },
}
