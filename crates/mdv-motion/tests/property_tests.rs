//! Property tests for the excitation traces.
//!
//! Convention: test_{module}_{function}_{scenario}

use std::fs;

use mdv_motion::{time_grid, ExcitationTrace};
use proptest::prelude::*;

proptest! {
    // The coupling grid starts at zero, is uniformly spaced, and has
    // ceil(t_max / dt) samples.
    #[test]
    fn test_trace_time_grid_uniform_from_zero(
        dt_percent in 1u32..100,
        t_max in 0.5f64..30.0,
    ) {
        let dt = f64::from(dt_percent) / 100.0;
        let grid = time_grid(dt, t_max);
        prop_assert_eq!(grid.len(), (t_max / dt).ceil() as usize);
        prop_assert_eq!(grid[0], 0.0);
        for (i, &t) in grid.iter().enumerate() {
            prop_assert!((t - i as f64 * dt).abs() < 1e-12);
        }
    }

    // A static trace holds the pose on every row with zero velocity,
    // whatever the pose.
    #[test]
    fn test_trace_constant_holds_pose(
        xi in proptest::collection::vec(-1e3f64..1e3, 1..12),
        dt_percent in 1u32..100,
    ) {
        let dt = f64::from(dt_percent) / 100.0;
        let trace = ExcitationTrace::constant(&xi, dt, 10.0);
        prop_assert_eq!(trace.len(), time_grid(dt, 10.0).len());
        prop_assert_eq!(trace.vector_size(), xi.len());
        for row in &trace.x {
            prop_assert_eq!(row, &xi);
        }
        prop_assert!(trace.xd.iter().flatten().all(|&v| v == 0.0));
    }

    // Backward differencing a linearly ramping recording recovers the
    // ramp rate at every step after the first.
    #[test]
    fn test_trace_from_file_recovers_linear_rate(slope in -10.0f64..10.0) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("ptfm_motions.dat");
        fs::write(
            &path,
            format!("0.0 0.0\n10.0 {}\n20.0 {}\n", 10.0 * slope, 20.0 * slope),
        )
        .expect("write motion file");

        let trace = ExcitationTrace::from_motion_file(&path, &[0.0], 1, 1, 0.5, 5.0)
            .expect("trace loads");
        prop_assert_eq!(trace.len(), 10);
        for (i, row) in trace.xd.iter().enumerate().skip(1) {
            prop_assert!((row[0] - slope).abs() < 1e-8, "step {i}: {row:?}");
        }
    }
}
