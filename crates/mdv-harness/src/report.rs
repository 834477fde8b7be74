#![forbid(unsafe_code)]

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::orchestrator::ComparisonOutcome;
use crate::HarnessError;

/// JSON artifact summarizing one comparison run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub rootname: String,
    pub passed: bool,
    pub channels: Vec<ChannelReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelReport {
    pub name: String,
    pub unit: String,
    pub passing: bool,
}

impl RunReport {
    #[must_use]
    pub fn from_outcome(rootname: &str, outcome: &ComparisonOutcome) -> Self {
        let units = outcome.test.units();
        let channels = outcome
            .verdict
            .channels
            .iter()
            .enumerate()
            .map(|(i, verdict)| ChannelReport {
                name: verdict.name.clone(),
                unit: units.get(i).cloned().unwrap_or_default(),
                passing: verdict.passing,
            })
            .collect();
        Self {
            rootname: rootname.to_owned(),
            passed: outcome.passed(),
            channels,
        }
    }
}

/// Serialize a run report as pretty JSON.
pub fn write_report(path: impl AsRef<Path>, report: &RunReport) -> Result<(), HarnessError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| HarnessError::ReportWrite {
        path: path.to_path_buf(),
        reason: source.to_string(),
    })?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, report).map_err(|source| HarnessError::ReportWrite {
        path: path.to_path_buf(),
        reason: source.to_string(),
    })?;
    out.flush().map_err(|source| HarnessError::ReportWrite {
        path: path.to_path_buf(),
        reason: source.to_string(),
    })
}
