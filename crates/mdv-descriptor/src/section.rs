#![forbid(unsafe_code)]

//! Fixed enumeration of descriptor sections and their accepted header
//! aliases. Different tool generations name the same section
//! differently ("POINTS", "CONNECTION PROPERTIES", "NODE PROPERTIES"),
//! so headers resolve through one alias-table lookup.

/// Separator substring that delimits sections. A header line carries
/// both the separator and one of the section's aliases.
pub const SEPARATOR: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Bodies,
    Rods,
    Points,
    Options,
}

impl SectionKind {
    pub const ALL: [Self; 4] = [Self::Bodies, Self::Rods, Self::Points, Self::Options];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Bodies => "bodies",
            Self::Rods => "rods",
            Self::Points => "points",
            Self::Options => "options",
        }
    }

    /// Accepted header aliases, uppercase. Matching is by substring so
    /// decorated headers ("---- BODY LIST ----") resolve too.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Bodies => &["BODIES", "BODY LIST", "BODY PROPERTIES"],
            Self::Rods => &["RODS", "ROD LIST", "ROD PROPERTIES"],
            Self::Points => &[
                "POINTS",
                "POINT LIST",
                "POINT PROPERTIES",
                "CONNECTION PROPERTIES",
                "NODE PROPERTIES",
            ],
            Self::Options => &["OPTIONS"],
        }
    }

    /// Number of header/units lines between a section header and its
    /// first data row. Options rows start immediately.
    #[must_use]
    pub fn header_lines(self) -> usize {
        match self {
            Self::Options => 0,
            _ => 2,
        }
    }

    /// Resolve a line as a section header, case-insensitively.
    #[must_use]
    pub fn match_header(line: &str) -> Option<Self> {
        if !line.contains(SEPARATOR) {
            return None;
        }
        let upper = line.to_uppercase();
        Self::ALL
            .into_iter()
            .find(|kind| kind.aliases().iter().any(|alias| upper.contains(alias)))
    }
}
