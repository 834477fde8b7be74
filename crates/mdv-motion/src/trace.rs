#![forbid(unsafe_code)]

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub enum ExcitationFileError {
    Io(io::Error),
    /// The motion file held fewer usable rows than interpolation needs.
    TooShort { expected: usize, rows: usize },
    /// A timestamp or position token failed to parse.
    BadToken { line: usize, token: String },
    /// The caller's initial pose disagrees with `dof * num_coupled`.
    PoseSizeMismatch { expected: usize, actual: usize },
}

impl fmt::Display for ExcitationFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(source) => write!(f, "motion file i/o failure: {source}"),
            Self::TooShort { expected, rows } => write!(
                f,
                "motion file too short for the stated DOF ({rows} usable rows, need {expected})"
            ),
            Self::BadToken { line, token } => {
                write!(f, "non-numeric motion token `{token}` on line {line}")
            }
            Self::PoseSizeMismatch { expected, actual } => write!(
                f,
                "initial pose has {actual} entries, excitation needs {expected}"
            ),
        }
    }
}

impl std::error::Error for ExcitationFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(source) => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for ExcitationFileError {
    fn from(source: io::Error) -> Self {
        Self::Io(source)
    }
}

/// The coupling step grid `0, dt_c, 2*dt_c, .. < t_max`.
#[must_use]
pub fn time_grid(dt_c: f64, t_max: f64) -> Vec<f64> {
    if dt_c <= 0.0 || !dt_c.is_finite() || !t_max.is_finite() {
        return Vec::new();
    }
    let n = (t_max / dt_c).ceil().max(0.0) as usize;
    (0..n).map(|i| i as f64 * dt_c).collect()
}

/// Position and velocity state vectors for every coupling step.
///
/// `x[t]` and `xd[t]` are `vector_size = num_coupled * dof` wide.
/// `xd` is the discrete time-derivative of `x` (backward difference
/// when built from a file, identically zero when static), and `x[0]`
/// always equals the descriptor's initial pose so the coupled
/// simulation starts from the stated geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct ExcitationTrace {
    pub time: Vec<f64>,
    pub x: Vec<Vec<f64>>,
    pub xd: Vec<Vec<f64>>,
    pub dt: f64,
}

impl ExcitationTrace {
    /// Static excitation: every row holds the initial pose, velocity
    /// identically zero.
    #[must_use]
    pub fn constant(xi: &[f64], dt_c: f64, t_max: f64) -> Self {
        let time = time_grid(dt_c, t_max);
        let x = vec![xi.to_vec(); time.len()];
        let xd = vec![vec![0.0; xi.len()]; time.len()];
        Self {
            time,
            x,
            xd,
            dt: dt_c,
        }
    }

    /// Excitation from a recorded motion file.
    ///
    /// Each line reads `t` followed by `dof * num_coupled` positions
    /// (rotational components already in radians). A trailing line
    /// with too few tokens ends the read, since backends pad their
    /// motion files that way. The recorded trace is interpolated onto the
    /// coupling grid with a forward-only search (timestamps must be
    /// non-decreasing), velocity follows by backward difference with
    /// `x[-1]` treated as zero, and `x[0]` is then forced to `xi`.
    pub fn from_motion_file(
        path: impl AsRef<Path>,
        xi: &[f64],
        dof: usize,
        num_coupled: usize,
        dt_c: f64,
        t_max: f64,
    ) -> Result<Self, ExcitationFileError> {
        let vector_size = dof * num_coupled;
        if xi.len() != vector_size {
            return Err(ExcitationFileError::PoseSizeMismatch {
                expected: vector_size,
                actual: xi.len(),
            });
        }

        let text = fs::read_to_string(path)?;
        let mut t_in: Vec<f64> = Vec::new();
        let mut xp_in: Vec<Vec<f64>> = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line_no = i + 1;
            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() < vector_size + 1 {
                break; // bad line or end of file
            }
            t_in.push(parse_token(tokens[0], line_no)?);
            let row = tokens[1..=vector_size]
                .iter()
                .map(|token| parse_token(token, line_no))
                .collect::<Result<Vec<f64>, _>>()?;
            xp_in.push(row);
        }
        if t_in.len() < 2 {
            return Err(ExcitationFileError::TooShort {
                expected: 2,
                rows: t_in.len(),
            });
        }

        let time = time_grid(dt_c, t_max);
        let mut x = vec![vec![0.0; vector_size]; time.len()];

        // Forward-only interpolation over the recorded samples; grid
        // points beyond the recording keep their zero fill.
        let mut ts = 0usize;
        for (its, &t) in time.iter().enumerate() {
            while ts < t_in.len() - 1 {
                if t_in[ts + 1] > t {
                    let frac = (t - t_in[ts]) / (t_in[ts + 1] - t_in[ts]);
                    for j in 0..vector_size {
                        x[its][j] = xp_in[ts][j] + frac * (xp_in[ts + 1][j] - xp_in[ts][j]);
                    }
                    break;
                }
                ts += 1;
            }
        }

        let mut xd = vec![vec![0.0; vector_size]; time.len()];
        let mut x_old = vec![0.0; vector_size];
        for (row_x, row_xd) in x.iter().zip(&mut xd) {
            for j in 0..vector_size {
                row_xd[j] = (row_x[j] - x_old[j]) / dt_c;
            }
            x_old.copy_from_slice(row_x);
        }

        if let Some(first) = x.first_mut() {
            first.copy_from_slice(xi);
        }

        Ok(Self {
            time,
            x,
            xd,
            dt: dt_c,
        })
    }

    #[must_use]
    pub fn vector_size(&self) -> usize {
        self.x.first().map_or(0, Vec::len)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }
}

fn parse_token(token: &str, line_no: usize) -> Result<f64, ExcitationFileError> {
    token.parse().map_err(|_| ExcitationFileError::BadToken {
        line: line_no,
        token: token.to_owned(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn time_grid_covers_zero_up_to_t_max_exclusive() {
        let grid = time_grid(0.5, 2.0);
        assert_eq!(grid, vec![0.0, 0.5, 1.0, 1.5]);
        assert!(time_grid(0.0, 1.0).is_empty());
    }

    #[test]
    fn constant_trace_holds_pose_with_zero_velocity() {
        let xi = [1.0, 2.0, 3.0];
        let trace = ExcitationTrace::constant(&xi, 0.01, 15.0);
        assert_eq!(trace.len(), 1500);
        assert_eq!(trace.vector_size(), 3);
        assert!(trace.x.iter().all(|row| row == &xi));
        assert!(trace.xd.iter().flatten().all(|&v| v == 0.0));
    }

    fn write_motion(dir: &tempfile::TempDir, body: &str) -> std::path::PathBuf {
        let path = dir.path().join("ptfm_motions.dat");
        let mut file = fs::File::create(&path).expect("create motion file");
        file.write_all(body.as_bytes()).expect("write motion file");
        path
    }

    #[test]
    fn from_file_interpolates_and_differentiates() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Single DOF ramping at 2 m/s, recorded coarsely.
        let path = write_motion(&dir, "0.0 0.0\n1.0 2.0\n2.0 4.0\n");
        let trace =
            ExcitationTrace::from_motion_file(&path, &[0.0], 1, 1, 0.25, 2.0).expect("trace");
        assert_eq!(trace.len(), 8);
        // x follows the ramp on the fine grid.
        assert!((trace.x[2][0] - 1.0).abs() < 1e-12);
        assert!((trace.x[5][0] - 2.5).abs() < 1e-12);
        // Backward difference recovers the 2 m/s rate after step 0.
        for row in &trace.xd[1..] {
            assert!((row[0] - 2.0).abs() < 1e-9, "xd {row:?}");
        }
    }

    #[test]
    fn first_row_is_forced_to_initial_pose() {
        let dir = tempfile::tempdir().expect("tempdir");
        // Recorded trace starts at 5.0, but the descriptor pose is 0.
        let path = write_motion(&dir, "0.0 5.0\n1.0 6.0\n");
        let trace =
            ExcitationTrace::from_motion_file(&path, &[0.0], 1, 1, 0.5, 1.0).expect("trace");
        assert_eq!(trace.x[0], vec![0.0]);
        // Velocity was derived before the pose override.
        assert!((trace.xd[0][0] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn short_trailing_line_ends_the_read() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_motion(&dir, "0.0 0.0 0.0 0.0\n1.0 1.0 1.0 1.0\n2.0 2.0\n");
        let trace =
            ExcitationTrace::from_motion_file(&path, &[0.0; 3], 3, 1, 0.5, 1.0).expect("trace");
        // Only the two full rows were read.
        assert_eq!(trace.len(), 2);
        assert!((trace.x[1][0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn grid_beyond_recording_keeps_zero_fill() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_motion(&dir, "0.0 1.0\n0.5 1.0\n");
        let trace =
            ExcitationTrace::from_motion_file(&path, &[1.0], 1, 1, 0.25, 2.0).expect("trace");
        // Samples past t = 0.5 fall outside the recording.
        assert_eq!(trace.x[6], vec![0.0]);
        assert_eq!(trace.x[7], vec![0.0]);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = ExcitationTrace::from_motion_file(
            dir.path().join("absent.dat"),
            &[0.0],
            1,
            1,
            0.1,
            1.0,
        )
        .unwrap_err();
        assert!(matches!(err, ExcitationFileError::Io(_)));
    }

    #[test]
    fn single_row_file_is_too_short() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_motion(&dir, "0.0 1.0\n");
        let err = ExcitationTrace::from_motion_file(&path, &[0.0], 1, 1, 0.1, 1.0).unwrap_err();
        assert!(matches!(
            err,
            ExcitationFileError::TooShort {
                expected: 2,
                rows: 1
            }
        ));
    }

    #[test]
    fn pose_size_mismatch_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = write_motion(&dir, "0.0 1.0\n1.0 2.0\n");
        let err =
            ExcitationTrace::from_motion_file(&path, &[0.0, 0.0], 1, 1, 0.1, 1.0).unwrap_err();
        assert!(matches!(
            err,
            ExcitationFileError::PoseSizeMismatch {
                expected: 1,
                actual: 2
            }
        ));
    }
}
