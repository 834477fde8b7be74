#![forbid(unsafe_code)]

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Comment line some backends prepend to their output tables.
pub const PROVENANCE_BANNER: &str = "predictions were generated by MoorDyn";

#[derive(Debug)]
pub enum OutputError {
    /// The output file does not exist.
    Missing { path: PathBuf },
    /// The file exists but holds no channel table.
    Empty { path: PathBuf },
    Io { path: PathBuf, source: io::Error },
    /// A data token failed to parse even after repair.
    BadToken { line: usize, token: String },
    /// The units line disagrees with the names line in width.
    HeaderMismatch { names: usize, units: usize },
    /// A data row disagrees with the header in width.
    RowWidth {
        line: usize,
        expected: usize,
        actual: usize,
    },
}

impl fmt::Display for OutputError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { path } => write!(f, "output file missing: {}", path.display()),
            Self::Empty { path } => {
                write!(f, "output file holds no channel table: {}", path.display())
            }
            Self::Io { path, source } => {
                write!(f, "failed to read output file {}: {source}", path.display())
            }
            Self::BadToken { line, token } => {
                write!(f, "non-numeric data token `{token}` on line {line}")
            }
            Self::HeaderMismatch { names, units } => {
                write!(f, "{names} channel names but {units} unit labels")
            }
            Self::RowWidth {
                line,
                expected,
                actual,
            } => write!(
                f,
                "data row on line {line} has {actual} values, expected {expected}"
            ),
        }
    }
}

impl std::error::Error for OutputError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// A parsed output table: ordered channel names, parallel units, and
/// row-major data indexed `[time step][channel]`. Channel 0 is time by
/// convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMatrix {
    names: Vec<String>,
    units: Vec<String>,
    rows: Vec<Vec<f64>>,
    index: HashMap<String, usize>,
}

impl ChannelMatrix {
    /// Assemble a matrix from parts. Callers guarantee each row is
    /// `names.len()` wide; the parser enforces this for file input.
    #[must_use]
    pub fn new(names: Vec<String>, units: Vec<String>, rows: Vec<Vec<f64>>) -> Self {
        let index = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), i))
            .collect();
        Self {
            names,
            units,
            rows,
            index,
        }
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn units(&self) -> &[String] {
        &self.units
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.names.len()
    }

    #[must_use]
    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    /// Column index for a channel name.
    #[must_use]
    pub fn channel_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// One channel as a time series.
    #[must_use]
    pub fn column(&self, channel: usize) -> Vec<f64> {
        self.rows.iter().map(|row| row[channel]).collect()
    }

    /// Transpose into `[channel][time]` form for the comparator.
    #[must_use]
    pub fn by_channel(&self) -> Vec<Vec<f64>> {
        (0..self.n_channels()).map(|c| self.column(c)).collect()
    }

    /// The same header over different rows (used after resampling).
    #[must_use]
    pub fn with_rows(&self, rows: Vec<Vec<f64>>) -> Self {
        Self::new(self.names.clone(), self.units.clone(), rows)
    }
}

/// Insert the missing `E` in truncated scientific notation: a `-`
/// sandwiched directly between two digits becomes `E-`. Ordinary
/// negative numbers and intact exponents are untouched.
#[must_use]
pub fn repair_exponents(line: &str) -> String {
    let chars: Vec<char> = line.chars().collect();
    let mut out = String::with_capacity(line.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '-'
            && i > 0
            && chars[i - 1].is_ascii_digit()
            && chars.get(i + 1).is_some_and(char::is_ascii_digit)
        {
            out.push('E');
        }
        out.push(c);
    }
    out
}

fn parse_token(token: &str, line_no: usize) -> Result<f64, OutputError> {
    // Underflow placeholder from the Fortran formatter.
    if token.contains("***") {
        return Ok(0.0);
    }
    token.parse().map_err(|_| OutputError::BadToken {
        line: line_no,
        token: token.to_owned(),
    })
}

/// Read and parse an output table from disk.
pub fn read_output_file(path: impl AsRef<Path>) -> Result<ChannelMatrix, OutputError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            OutputError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            OutputError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    parse_output(&text).and_then(|matrix| match matrix {
        Some(matrix) => Ok(matrix),
        None => Err(OutputError::Empty {
            path: path.to_path_buf(),
        }),
    })
}

/// Parse output-table text. Returns `Ok(None)` when no channel table
/// is present (the file-level reader turns that into [`OutputError::Empty`]).
///
/// The first substantive line supplies channel names, the second
/// units; every later line is data until a blank or single-token line
/// ends the block. Blank lines and the provenance banner before the
/// header are skipped.
pub fn parse_output(text: &str) -> Result<Option<ChannelMatrix>, OutputError> {
    let mut names: Vec<String> = Vec::new();
    let mut units: Vec<String> = Vec::new();
    let mut rows: Vec<Vec<f64>> = Vec::new();

    for (i, line) in text.lines().enumerate() {
        let line_no = i + 1;
        if line.contains(PROVENANCE_BANNER) {
            continue;
        }
        let token_count = line.split_whitespace().count();
        if token_count < 2 {
            if rows.is_empty() && units.is_empty() {
                continue; // leading blank
            }
            break; // end of the data block
        }
        if names.is_empty() {
            names = line.split_whitespace().map(str::to_owned).collect();
        } else if units.is_empty() {
            units = line.split_whitespace().map(str::to_owned).collect();
            if units.len() != names.len() {
                return Err(OutputError::HeaderMismatch {
                    names: names.len(),
                    units: units.len(),
                });
            }
        } else {
            let repaired = repair_exponents(line);
            let row = repaired
                .split_whitespace()
                .map(|token| parse_token(token, line_no))
                .collect::<Result<Vec<f64>, _>>()?;
            if row.len() != names.len() {
                return Err(OutputError::RowWidth {
                    line: line_no,
                    expected: names.len(),
                    actual: row.len(),
                });
            }
            rows.push(row);
        }
    }

    if names.is_empty() {
        return Ok(None);
    }
    Ok(Some(ChannelMatrix::new(names, units, rows)))
}
