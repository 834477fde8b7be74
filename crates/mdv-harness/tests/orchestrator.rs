//! End-to-end orchestration against scripted backends.
//!
//! The two "backends" here record the call sequence and write a
//! prepared output table on close, standing in for the driver
//! executable and the stepped shared library.

use std::fs;
use std::path::{Path, PathBuf};

use mdv_harness::{
    run_comparison, write_report, Backend, BackendError, HarnessError, MotionSource, RunConfig,
    RunReport,
};

const DESCRIPTOR: &str = "\
Coupled body test case
---------------------- BODIES ---------------------------------------------
ID   Attachment   X0    Y0    Z0    r0    p0    y0    M   CG   I   V   CdA  Ca
(#)  (word)       (m)   (m)   (m)   (deg) (deg) (deg) -   -    -   -   -    -
1    Coupled      0.0   0.0   0.0   0.0   0.0   0.0   0   0    0   0   0    0
---------------------- OPTIONS --------------------------------------------
0.1     dtM       coupling step
50      WtrDpth   water depth
---------------------- END ------------------------------------------------
";

struct ScriptedBackend {
    out_path: PathBuf,
    table: String,
    inits: usize,
    steps: usize,
    closes: usize,
}

impl ScriptedBackend {
    fn new(out_path: PathBuf, table: String) -> Self {
        Self {
            out_path,
            table,
            inits: 0,
            steps: 0,
            closes: 0,
        }
    }
}

impl Backend for ScriptedBackend {
    fn init(&mut self, x0: &[f64], xd0: &[f64], _in_file: &Path) -> Result<(), BackendError> {
        assert_eq!(x0.len(), 6, "one coupled body is six DOF");
        assert!(xd0.iter().all(|&v| v == 0.0), "static start");
        self.inits += 1;
        Ok(())
    }

    fn step(
        &mut self,
        _x: &[f64],
        _xd: &[f64],
        _f_out: &mut [f64],
        _t: f64,
        _dt: f64,
    ) -> Result<(), BackendError> {
        self.steps += 1;
        Ok(())
    }

    fn close(&mut self) -> Result<(), BackendError> {
        self.closes += 1;
        fs::write(&self.out_path, &self.table)?;
        Ok(())
    }

    fn output_path(&self) -> PathBuf {
        self.out_path.clone()
    }
}

/// A nominal 19-row table on the dtOut = 0.1 grid. Channels are
/// linear in time so resampled variants agree exactly.
fn nominal_table(offset: f64, nan_at: Option<usize>) -> String {
    let mut text = String::from("Time FairTen1 Body1Px\n(s) (N) (m)\n");
    for i in 1..20 {
        let t = i as f64 * 0.1;
        let ten = if nan_at == Some(i) {
            f64::NAN
        } else {
            1000.0 + 100.0 * t + offset
        };
        let px = 5.0 * t + offset;
        text.push_str(&format!("{t:.4} {ten} {px}\n"));
    }
    text
}

/// The same signal sampled unevenly over the run.
fn uneven_table(n_rows: usize) -> String {
    let mut text = String::from("Time FairTen1 Body1Px\n(s) (N) (m)\n");
    for i in 0..n_rows {
        let t = 2.0 * i as f64 / (n_rows - 1) as f64;
        text.push_str(&format!("{t} {} {}\n", 1000.0 + 100.0 * t, 5.0 * t));
    }
    text
}

fn config(dir: &Path) -> RunConfig {
    RunConfig {
        rootname: "body_case".to_owned(),
        extension: ".txt".to_owned(),
        work_dir: dir.to_path_buf(),
        t_max: 2.0,
        dof: 6,
        motion: MotionSource::Static,
        ..RunConfig::default()
    }
}

fn write_descriptor(dir: &Path) {
    fs::write(dir.join("body_case.txt"), DESCRIPTOR).expect("write descriptor");
}

#[test]
fn near_identical_outputs_pass() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_descriptor(dir.path());
    let mut baseline = ScriptedBackend::new(dir.path().join("body_caseF.out"), nominal_table(0.0, None));
    let mut candidate =
        ScriptedBackend::new(dir.path().join("body_caseC.out"), nominal_table(1e-7, None));

    let outcome =
        run_comparison(&config(dir.path()), &mut baseline, &mut candidate).expect("comparison");
    assert!(outcome.passed(), "failing: {:?}", outcome.verdict.failing());

    // Both backends saw the full static excitation, then closed.
    assert_eq!(baseline.inits, 1);
    assert_eq!(baseline.steps, 20);
    assert_eq!(baseline.closes, 1);
    assert_eq!(candidate.steps, 20);

    // Driver inputs were generated for the coupled case.
    assert!(dir.path().join("MoorDyn.dvr").exists());
    assert!(dir.path().join("ptfm_motions.dat").exists());
}

#[test]
fn gross_disagreement_fails_that_channel_only() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_descriptor(dir.path());
    let mut baseline = ScriptedBackend::new(dir.path().join("body_caseF.out"), nominal_table(0.0, None));
    let mut candidate =
        ScriptedBackend::new(dir.path().join("body_caseC.out"), nominal_table(50.0, None));

    let outcome =
        run_comparison(&config(dir.path()), &mut baseline, &mut candidate).expect("comparison");
    assert!(!outcome.passed());
    let failing = outcome.verdict.failing();
    assert!(failing.contains(&"FairTen1"));
    assert!(failing.contains(&"Body1Px"));
    assert!(!failing.contains(&"Time"));
}

#[test]
fn nan_in_candidate_output_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_descriptor(dir.path());
    let mut baseline = ScriptedBackend::new(dir.path().join("body_caseF.out"), nominal_table(0.0, None));
    let mut candidate =
        ScriptedBackend::new(dir.path().join("body_caseC.out"), nominal_table(0.0, Some(7)));

    let outcome =
        run_comparison(&config(dir.path()), &mut baseline, &mut candidate).expect("comparison");
    assert_eq!(outcome.verdict.failing(), vec!["FairTen1"]);
}

#[test]
fn uneven_candidate_sampling_is_resampled_and_passes() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_descriptor(dir.path());
    let mut baseline = ScriptedBackend::new(dir.path().join("body_caseF.out"), nominal_table(0.0, None));
    let mut candidate = ScriptedBackend::new(dir.path().join("body_caseC.out"), uneven_table(33));

    let outcome =
        run_comparison(&config(dir.path()), &mut baseline, &mut candidate).expect("comparison");
    assert!(outcome.passed(), "failing: {:?}", outcome.verdict.failing());
    assert_eq!(outcome.test.n_rows(), outcome.baseline.n_rows());
}

#[test]
fn channel_name_mismatch_aborts_before_comparison() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_descriptor(dir.path());
    let renamed = nominal_table(0.0, None).replace("FairTen1", "FairTen9");
    let mut baseline = ScriptedBackend::new(dir.path().join("body_caseF.out"), nominal_table(0.0, None));
    let mut candidate = ScriptedBackend::new(dir.path().join("body_caseC.out"), renamed);

    let err = run_comparison(&config(dir.path()), &mut baseline, &mut candidate).unwrap_err();
    assert!(matches!(
        err,
        HarnessError::ChannelOrderMismatch { index: 1, .. }
    ));
}

#[test]
fn missing_descriptor_is_a_descriptor_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut baseline = ScriptedBackend::new(dir.path().join("aF.out"), String::new());
    let mut candidate = ScriptedBackend::new(dir.path().join("aC.out"), String::new());
    let err = run_comparison(&config(dir.path()), &mut baseline, &mut candidate).unwrap_err();
    assert!(matches!(err, HarnessError::Descriptor { .. }));
}

#[test]
fn report_artifact_records_the_verdict() {
    let dir = tempfile::tempdir().expect("tempdir");
    write_descriptor(dir.path());
    let mut baseline = ScriptedBackend::new(dir.path().join("body_caseF.out"), nominal_table(0.0, None));
    let mut candidate =
        ScriptedBackend::new(dir.path().join("body_caseC.out"), nominal_table(1e-7, None));
    let outcome =
        run_comparison(&config(dir.path()), &mut baseline, &mut candidate).expect("comparison");

    let report = RunReport::from_outcome("body_case", &outcome);
    let path = dir.path().join("body_case_report.json");
    write_report(&path, &report).expect("report write");

    let back: RunReport =
        serde_json::from_str(&fs::read_to_string(&path).expect("read back")).expect("parse json");
    assert!(back.passed);
    assert_eq!(back.channels.len(), 3);
    assert_eq!(back.channels[1].name, "FairTen1");
    assert_eq!(back.channels[1].unit, "(N)");
}
