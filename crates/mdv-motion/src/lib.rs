#![forbid(unsafe_code)]

//! Prescribed-motion excitation for the coupled simulation step loop.
//!
//! An [`ExcitationTrace`] holds the position and velocity state
//! vectors handed to the backends one coupling step at a time, built
//! either synthetically (static hold at the initial pose) or from a
//! recorded motion file (interpolated, then differentiated). The
//! `driver` module writes the fixed-format input files the
//! process-launched backend expects.

pub mod driver;
pub mod trace;

pub use driver::{write_driver_file, write_motion_file, DriverFileSpec};
pub use trace::{time_grid, ExcitationFileError, ExcitationTrace};
