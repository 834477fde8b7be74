//! File-backed output reading tests.

use std::fs;

use mdv_output::{needs_resample, read_output_file, resample, OutputError};

#[test]
fn read_output_file_from_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("linesF.out");
    fs::write(
        &path,
        "These predictions were generated by MoorDyn v2\n\
         Time FairTen1\n\
         (s) (N)\n\
         0.01 100.0\n\
         0.02 101.0\n",
    )
    .expect("write output");

    let matrix = read_output_file(&path).expect("output should read");
    assert_eq!(matrix.n_rows(), 2);
    assert_eq!(matrix.names(), &["Time", "FairTen1"]);
}

#[test]
fn missing_output_file_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let err = read_output_file(dir.path().join("absent.out")).unwrap_err();
    assert!(matches!(err, OutputError::Missing { .. }));
}

#[test]
fn empty_output_file_errors() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("blank.out");
    fs::write(&path, "\n\n").expect("write output");
    let err = read_output_file(&path).unwrap_err();
    assert!(matches!(err, OutputError::Empty { .. }));
}

#[test]
fn uneven_table_resamples_onto_nominal_grid() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("linesC.out");
    // Five rows where the nominal grid (dtOut = 0.5, tMax = 2.0) has
    // three; channel 1 is linear in time so interpolation is exact.
    fs::write(
        &path,
        "Time X\n(s) (m)\n0.0 0.0\n0.3 0.6\n0.9 1.8\n1.4 2.8\n2.0 4.0\n",
    )
    .expect("write output");

    let matrix = read_output_file(&path).expect("output should read");
    assert!(needs_resample(matrix.n_rows(), 0.5, 2.0));
    let fixed = matrix.with_rows(resample(matrix.rows(), matrix.n_channels(), 0.5, 2.0, None));
    assert_eq!(fixed.n_rows(), 3);
    for row in fixed.rows() {
        assert!((row[1] - 2.0 * row[0]).abs() < 1e-12, "row {row:?}");
    }
}
