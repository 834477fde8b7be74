#![forbid(unsafe_code)]

//! Driver-input and motion-file writers for the process-launched
//! backend. The driver format is fixed: labeled fields in a set
//! order with trailing comments the backend's parser keys off, so the
//! layout below must not be reflowed.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::trace::ExcitationTrace;

/// Fields of a backend driver input file.
#[derive(Debug, Clone, PartialEq)]
pub struct DriverFileSpec {
    pub water_density: f64,
    pub water_depth: f64,
    /// Primary mooring input file handed to the backend.
    pub input_file: PathBuf,
    pub t_max: f64,
    pub dt_c: f64,
    pub num_coupled: usize,
    /// Motion file named in the driver when coupled objects exist.
    pub motions_file: String,
}

impl Default for DriverFileSpec {
    fn default() -> Self {
        Self {
            water_density: 1025.0,
            water_depth: 0.0,
            input_file: PathBuf::new(),
            t_max: 0.0,
            dt_c: 0.0,
            num_coupled: 0,
            motions_file: "ptfm_motions.dat".to_owned(),
        }
    }
}

impl DriverFileSpec {
    /// 0 when no coupled objects exist (backend zeroes every input),
    /// 1 for time-series inputs from the motions file.
    #[must_use]
    pub fn inputs_mode(&self) -> u8 {
        u8::from(self.num_coupled != 0)
    }
}

/// Float-valued fields keep one decimal place when integral, so
/// `1025` reads `1025.0`.
fn fmt_field(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

/// `TMax` is carried as a whole-second count: no decimal when
/// integral.
fn fmt_seconds(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Write a driver input file. Field order and trailing comments are
/// part of the backend's parse contract.
pub fn write_driver_file(path: impl AsRef<Path>, spec: &DriverFileSpec) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    writeln!(out, "MoorDyn driver input file ")?;
    writeln!(out, "another comment line")?;
    writeln!(
        out,
        "---------------------- ENVIRONMENTAL CONDITIONS ------------------------------- "
    )?;
    writeln!(out, "9.80665            Gravity          - Gravity (m/s^2) ")?;
    writeln!(
        out,
        "{}             rhoW             - Water density (kg/m^3) ",
        fmt_field(spec.water_density)
    )?;
    writeln!(
        out,
        "{}              WtrDpth          - Water depth (m) ",
        fmt_field(spec.water_depth)
    )?;
    writeln!(
        out,
        "---------------------- MOORDYN ------------------------------------------------ "
    )?;
    writeln!(
        out,
        "\"{}\"      MDInputFile      - Primary MoorDyn input file name (quoted string) ",
        spec.input_file.display()
    )?;
    writeln!(
        out,
        "\"F\"            OutRootName      - The name which prefixes all HydroDyn generated files (quoted string) "
    )?;
    writeln!(
        out,
        "{}                  TMax             - Number of time steps in the simulations (-) ",
        fmt_seconds(spec.t_max)
    )?;
    writeln!(
        out,
        "{}                 dtC              - TimeInterval for the simulation (sec) ",
        fmt_field(spec.dt_c)
    )?;
    writeln!(
        out,
        "{}                   InputsMode       - MoorDyn coupled object inputs (0: all inputs are zero for every timestep (no coupled objects), 1: time-series inputs (coupled objects)) (switch) ",
        spec.inputs_mode()
    )?;
    writeln!(
        out,
        "\"{}\"   InputsFile       - Filename for the MoorDyn inputs file for when InputsMod = 1 (quoted string) ",
        spec.motions_file
    )?;
    writeln!(
        out,
        "0                   NumTurbines      - Number of wind turbines (-) [>=1 to use FAST.Farm mode. 0 to use OpenFAST mode.] "
    )?;
    writeln!(
        out,
        "---------------------- Initial Positions -------------------------------------- "
    )?;
    writeln!(
        out,
        "ref_X    ref_Y    surge_init   sway_init  heave_init  roll_init  pitch_init   yaw_init "
    )?;
    writeln!(
        out,
        "(m)      (m)        (m)          (m)        (m)       (rad)       (rad)        (rad)         [followed by MAX(1,NumTurbines) rows of data] "
    )?;
    writeln!(
        out,
        "0         0          0            0          0          0           0            0 "
    )?;
    writeln!(out, "END of driver input file ")?;
    out.flush()
}

/// Write an excitation trace as a motion file: one row per coupling
/// step, timestamp then every position component.
pub fn write_motion_file(path: impl AsRef<Path>, trace: &ExcitationTrace) -> io::Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);
    for (t, row) in trace.time.iter().zip(&trace.x) {
        write!(out, "{t}")?;
        for value in row {
            write!(out, " {value}")?;
        }
        writeln!(out)?;
    }
    out.flush()
}
