#![forbid(unsafe_code)]

//! The narrow interface both solver backends are driven through.
//!
//! One backend is a standalone driver executable, the other a shared
//! library stepped through a foreign-function surface; the orchestrator
//! sees only `init`/`step`/`close`. The library backend holds
//! process-wide state, so `close` must run before any other run
//! starts, whether or not every step completed; [`run_backend`]
//! guarantees that ordering.

use std::io;
use std::path::{Path, PathBuf};

use mdv_motion::ExcitationTrace;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend init failed with status {status}")]
    Init { status: i32 },
    #[error("backend step failed at t = {t}: status {status}")]
    Step { t: f64, status: i32 },
    #[error("backend close failed with status {status}")]
    Close { status: i32 },
    #[error("backend i/o failure: {0}")]
    Io(#[from] io::Error),
}

/// One solver implementation under test.
///
/// Call order is fixed: `init` once, `step` once per coupling sample
/// in strictly increasing time order, `close` exactly once.
pub trait Backend {
    /// Acquire the simulator handle at the initial state.
    fn init(&mut self, x0: &[f64], xd0: &[f64], in_file: &Path) -> Result<(), BackendError>;

    /// Advance one coupling step at time `t`. `f_out` receives the
    /// coupled reaction forces.
    fn step(
        &mut self,
        x: &[f64],
        xd: &[f64],
        f_out: &mut [f64],
        t: f64,
        dt: f64,
    ) -> Result<(), BackendError>;

    /// Tear down simulator state. Must be safe to call after a failed
    /// step.
    fn close(&mut self) -> Result<(), BackendError>;

    /// Where this backend writes its output table.
    fn output_path(&self) -> PathBuf;
}

/// Drive a backend through a full excitation trace.
///
/// `close` runs whether or not every step succeeded; a step failure
/// takes precedence over a close failure in the returned error.
pub fn run_backend(
    backend: &mut dyn Backend,
    trace: &ExcitationTrace,
    in_file: &Path,
) -> Result<(), BackendError> {
    let first_x = trace.x.first().map_or(&[] as &[f64], Vec::as_slice);
    let first_xd = trace.xd.first().map_or(&[] as &[f64], Vec::as_slice);
    backend.init(first_x, first_xd, in_file)?;

    let mut f_out = vec![0.0; trace.vector_size()];
    let mut stepped = Ok(());
    for (i, &t) in trace.time.iter().enumerate() {
        if let Err(err) = backend.step(&trace.x[i], &trace.xd[i], &mut f_out, t, trace.dt) {
            stepped = Err(err);
            break;
        }
    }
    let closed = backend.close();
    stepped.and(closed)
}
