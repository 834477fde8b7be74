#![forbid(unsafe_code)]

//! Reading and regularizing simulator output tables.
//!
//! The backends write whitespace-tokenized text tables with two known
//! defects this crate repairs at parse time: near-zero underflow
//! printed as `***`, and scientific notation with the exponent marker
//! dropped (`1.23-45` for `1.23E-45`). A third quirk, occasional
//! non-uniform output timesteps, is corrected by the resampler.

pub mod resample;
pub mod table;

pub use resample::{expected_rows, interp, needs_resample, resample, target_grid};
pub use table::{
    parse_output, read_output_file, repair_exponents, ChannelMatrix, OutputError,
    PROVENANCE_BANNER,
};
