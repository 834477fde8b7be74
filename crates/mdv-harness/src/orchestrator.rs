#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use mdv_compare::{passing_channels, ComparisonVerdict, ATOL_MAGNITUDE, RTOL_MAGNITUDE};
use mdv_descriptor::load_descriptor;
use mdv_motion::{write_driver_file, write_motion_file, DriverFileSpec, ExcitationTrace};
use mdv_output::{needs_resample, read_output_file, resample, ChannelMatrix};

use crate::backend::{run_backend, Backend};
use crate::HarnessError;

/// Where the excitation comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MotionSource {
    /// Hold the descriptor's initial pose for the whole run.
    Static,
    /// Interpolate a recorded motion file.
    FromFile(PathBuf),
}

/// Parameters for one comparison run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Descriptor file name is `rootname + extension`; output files
    /// derive from the rootname too.
    pub rootname: String,
    pub extension: String,
    /// Directory holding the descriptor and receiving driver files.
    pub work_dir: PathBuf,
    /// Simulation length in seconds.
    pub t_max: f64,
    /// DOF per coupled object: 3 for points, 6 for bodies and rods.
    pub dof: usize,
    pub motion: MotionSource,
    pub rtol_magnitude: f64,
    pub atol_magnitude: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            rootname: "lines".to_owned(),
            extension: ".txt".to_owned(),
            work_dir: PathBuf::from("."),
            t_max: 60.0,
            dof: 3,
            motion: MotionSource::Static,
            rtol_magnitude: RTOL_MAGNITUDE,
            atol_magnitude: ATOL_MAGNITUDE,
        }
    }
}

impl RunConfig {
    #[must_use]
    pub fn descriptor_path(&self) -> PathBuf {
        self.work_dir.join(format!("{}{}", self.rootname, self.extension))
    }
}

/// Everything one comparison run produced: the verdict plus the two
/// regularized matrices it was computed from. Discarded after
/// reporting.
#[derive(Debug, Clone)]
pub struct ComparisonOutcome {
    pub verdict: ComparisonVerdict,
    pub test: ChannelMatrix,
    pub baseline: ChannelMatrix,
}

impl ComparisonOutcome {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.verdict.passed()
    }
}

/// Run the full comparison: parse the descriptor, build the
/// excitation, drive both backends sequentially, regularize and align
/// their outputs, and compare.
///
/// `baseline` is the reference implementation, `candidate` the one
/// under test. A channel count or order mismatch between the two
/// outputs aborts before any tolerance comparison.
pub fn run_comparison(
    config: &RunConfig,
    baseline: &mut dyn Backend,
    candidate: &mut dyn Backend,
) -> Result<ComparisonOutcome, HarnessError> {
    let in_file = config.descriptor_path();
    let descriptor = load_descriptor(&in_file).map_err(|source| HarnessError::Descriptor {
        path: in_file.clone(),
        source,
    })?;

    let dt_c = descriptor
        .options
        .require_f64("dtM")
        .map_err(|source| HarnessError::Descriptor {
            path: in_file.clone(),
            source,
        })?;
    let dt_out = descriptor
        .options
        .optional_f64("dtOut", dt_c)
        .map_err(|source| HarnessError::Descriptor {
            path: in_file.clone(),
            source,
        })?;
    let water_density = descriptor
        .options
        .optional_f64("WtrDnsty", 1025.0)
        .map_err(|source| HarnessError::Descriptor {
            path: in_file.clone(),
            source,
        })?;
    let water_depth = descriptor
        .options
        .require_f64("WtrDpth")
        .map_err(|source| HarnessError::Descriptor {
            path: in_file.clone(),
            source,
        })?;

    let xi = descriptor.initial_pose(config.dof);
    let trace = match &config.motion {
        MotionSource::Static => ExcitationTrace::constant(&xi, dt_c, config.t_max),
        MotionSource::FromFile(path) => ExcitationTrace::from_motion_file(
            path,
            &xi,
            config.dof,
            descriptor.num_coupled,
            dt_c,
            config.t_max,
        )?,
    };

    write_driver_inputs(
        config,
        descriptor.num_coupled,
        water_density,
        water_depth,
        dt_c,
        &in_file,
        &trace,
    )?;

    // Strictly sequential: the library-backed implementation holds
    // process-wide state until its close call.
    run_backend(baseline, &trace, &in_file)?;
    run_backend(candidate, &trace, &in_file)?;

    let baseline_matrix = regularize(read_output_file(baseline.output_path())?, dt_out, config.t_max);
    let candidate_matrix = regularize(read_output_file(candidate.output_path())?, dt_out, config.t_max);

    align_channels(&candidate_matrix, &baseline_matrix)?;

    let flags = passing_channels(
        &candidate_matrix.by_channel(),
        &baseline_matrix.by_channel(),
        config.rtol_magnitude,
        config.atol_magnitude,
    );
    let verdict = ComparisonVerdict::new(candidate_matrix.names(), &flags);

    Ok(ComparisonOutcome {
        verdict,
        test: candidate_matrix,
        baseline: baseline_matrix,
    })
}

fn write_driver_inputs(
    config: &RunConfig,
    num_coupled: usize,
    water_density: f64,
    water_depth: f64,
    dt_c: f64,
    in_file: &Path,
    trace: &ExcitationTrace,
) -> Result<(), HarnessError> {
    let spec = DriverFileSpec {
        water_density,
        water_depth,
        input_file: in_file.to_path_buf(),
        t_max: config.t_max,
        dt_c,
        num_coupled,
        ..DriverFileSpec::default()
    };
    let driver_path = config.work_dir.join("MoorDyn.dvr");
    write_driver_file(&driver_path, &spec).map_err(|source| HarnessError::DriverWrite {
        path: driver_path,
        source,
    })?;
    if spec.inputs_mode() == 1 {
        let motions_path = config.work_dir.join(&spec.motions_file);
        write_motion_file(&motions_path, trace).map_err(|source| HarnessError::DriverWrite {
            path: motions_path,
            source,
        })?;
    }
    Ok(())
}

/// Resample a parsed table iff its row count disagrees with the
/// nominal output grid.
fn regularize(matrix: ChannelMatrix, dt_out: f64, t_max: f64) -> ChannelMatrix {
    if needs_resample(matrix.n_rows(), dt_out, t_max) {
        let rows = resample(matrix.rows(), matrix.n_channels(), dt_out, t_max, None);
        matrix.with_rows(rows)
    } else {
        matrix
    }
}

/// The two outputs must name the same channels in the same order.
fn align_channels(test: &ChannelMatrix, baseline: &ChannelMatrix) -> Result<(), HarnessError> {
    if test.n_channels() != baseline.n_channels() {
        return Err(HarnessError::ChannelCountMismatch {
            test: test.n_channels(),
            baseline: baseline.n_channels(),
        });
    }
    for (index, (t, b)) in test.names().iter().zip(baseline.names()).enumerate() {
        if t != b {
            return Err(HarnessError::ChannelOrderMismatch {
                index,
                test: t.clone(),
                baseline: b.clone(),
            });
        }
    }
    Ok(())
}
