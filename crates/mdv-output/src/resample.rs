#![forbid(unsafe_code)]

//! Correction of non-uniform output sampling.
//!
//! The backends nominally write one row every `dtOut` seconds but
//! occasionally emit a different number of samples. When the parsed
//! row count disagrees with the nominal grid, every channel is
//! linearly interpolated onto `dtOut, 2*dtOut, .. < tMax` against the
//! authoritative source time base (column 0, unless the caller
//! supplies a separate time vector).

/// The nominal output grid: `dt_out, 2*dt_out, ..` strictly below
/// `t_max`. The first output sample lands at `dt_out`, not zero.
#[must_use]
pub fn target_grid(dt_out: f64, t_max: f64) -> Vec<f64> {
    if dt_out <= 0.0 || !dt_out.is_finite() || !t_max.is_finite() {
        return Vec::new();
    }
    let n = ((t_max - dt_out) / dt_out).ceil().max(0.0) as usize;
    (0..n).map(|i| dt_out + i as f64 * dt_out).collect()
}

/// Row count a well-behaved backend produces for this grid.
#[must_use]
pub fn expected_rows(dt_out: f64, t_max: f64) -> usize {
    target_grid(dt_out, t_max).len()
}

/// Whether a parsed table needs resampling.
#[must_use]
pub fn needs_resample(rows: usize, dt_out: f64, t_max: f64) -> bool {
    rows != expected_rows(dt_out, t_max)
}

/// Piecewise-linear interpolation of `(xp, fp)` sampled at `x`, with
/// values outside the source range clamped to the nearest known
/// sample. `xp` must be non-decreasing.
#[must_use]
pub fn interp(x: &[f64], xp: &[f64], fp: &[f64]) -> Vec<f64> {
    x.iter().map(|&xi| interp_one(xi, xp, fp)).collect()
}

fn interp_one(x: f64, xp: &[f64], fp: &[f64]) -> f64 {
    match xp.len() {
        0 => f64::NAN,
        1 => fp[0],
        n => {
            if x <= xp[0] {
                return fp[0];
            }
            if x >= xp[n - 1] {
                return fp[n - 1];
            }
            let mut lo = 0;
            let mut hi = n - 1;
            while hi - lo > 1 {
                let mid = (lo + hi) / 2;
                if xp[mid] <= x {
                    lo = mid;
                } else {
                    hi = mid;
                }
            }
            let span = xp[hi] - xp[lo];
            if span == 0.0 {
                return fp[lo];
            }
            fp[lo] + (x - xp[lo]) / span * (fp[hi] - fp[lo])
        }
    }
}

/// Resample `rows` onto the nominal grid.
///
/// With no separate `tdata`, column 0 is the source time base: the
/// output's column 0 is set to the grid itself and every other column
/// is interpolated. With `tdata` supplied, every column (including 0)
/// is interpolated against it.
#[must_use]
pub fn resample(
    rows: &[Vec<f64>],
    n_channels: usize,
    dt_out: f64,
    t_max: f64,
    tdata: Option<&[f64]>,
) -> Vec<Vec<f64>> {
    let grid = target_grid(dt_out, t_max);
    let mut out = vec![vec![0.0; n_channels]; grid.len()];
    let column = |c: usize| rows.iter().map(|row| row[c]).collect::<Vec<f64>>();
    match tdata {
        None => {
            let source_time = column(0);
            for (row, &t) in out.iter_mut().zip(&grid) {
                row[0] = t;
            }
            for c in 1..n_channels {
                let values = interp(&grid, &source_time, &column(c));
                for (row, v) in out.iter_mut().zip(values) {
                    row[c] = v;
                }
            }
        }
        Some(tdata) => {
            for c in 0..n_channels {
                let values = interp(&grid, tdata, &column(c));
                for (row, v) in out.iter_mut().zip(values) {
                    row[c] = v;
                }
            }
        }
    }
    out
}
