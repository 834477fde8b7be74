#![forbid(unsafe_code)]

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum DescriptorError {
    Io(io::Error),
    /// A section's closing separator was never reached.
    UnexpectedEof { section: &'static str },
    /// A data row has too few tokens for its section's column layout.
    ShortLine { section: &'static str, line: usize },
    /// A token expected to be numeric failed to parse.
    BadNumber { line: usize, token: String },
    /// A mandatory option key is absent.
    MissingOption { key: &'static str },
    /// An option value failed to parse as a number.
    BadOption { key: &'static str, raw: String },
}

impl fmt::Display for DescriptorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(source) => write!(f, "descriptor i/o failure: {source}"),
            Self::UnexpectedEof { section } => {
                write!(f, "{section} section reached end of file before its separator")
            }
            Self::ShortLine { section, line } => {
                write!(f, "{section} row on line {line} has too few columns")
            }
            Self::BadNumber { line, token } => {
                write!(f, "unparsable numeric token `{token}` on line {line}")
            }
            Self::MissingOption { key } => write!(f, "mandatory option `{key}` is absent"),
            Self::BadOption { key, raw } => {
                write!(f, "option `{key}` has non-numeric value `{raw}`")
            }
        }
    }
}

impl std::error::Error for DescriptorError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(source) => Some(source),
            _ => None,
        }
    }
}

impl From<io::Error> for DescriptorError {
    fn from(source: io::Error) -> Self {
        Self::Io(source)
    }
}
