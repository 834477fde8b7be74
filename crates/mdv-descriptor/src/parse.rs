#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use crate::error::DescriptorError;
use crate::model::{Body, CouplingMode, Point, Rod, SystemDescriptor};
use crate::options::OptionsBag;
use crate::section::{SectionKind, SEPARATOR};

/// Load and parse a descriptor file.
pub fn load_descriptor(path: impl AsRef<Path>) -> Result<SystemDescriptor, DescriptorError> {
    let text = fs::read_to_string(path)?;
    parse_descriptor(&text)
}

/// Parse descriptor text.
///
/// Sections open at a line carrying both the `---` separator and a
/// recognized alias, and close at the next separator line. A closing
/// separator is itself a candidate header for the following section,
/// so back-to-back sections need no blank separator between them.
pub fn parse_descriptor(text: &str) -> Result<SystemDescriptor, DescriptorError> {
    let lines: Vec<&str> = text.lines().collect();

    let mut bodies = Vec::new();
    let mut rods = Vec::new();
    let mut points = Vec::new();
    let mut options = OptionsBag::default();
    let mut num_coupled = 0usize;

    let mut idx = 0;
    while idx < lines.len() {
        let Some(kind) = SectionKind::match_header(lines[idx]) else {
            idx += 1;
            continue;
        };
        idx += 1 + kind.header_lines();
        loop {
            if idx >= lines.len() {
                return Err(DescriptorError::UnexpectedEof {
                    section: kind.name(),
                });
            }
            let row = lines[idx];
            if row.contains(SEPARATOR) {
                // Leave idx on the separator: it may open the next section.
                break;
            }
            let line_no = idx + 1;
            let tokens: Vec<&str> = row.split_whitespace().collect();
            match kind {
                SectionKind::Bodies => {
                    if let Some(body) = parse_body_row(&tokens, line_no)? {
                        num_coupled += 1;
                        bodies.push(body);
                    }
                }
                SectionKind::Rods => {
                    if let Some(rod) = parse_rod_row(&tokens, line_no)? {
                        num_coupled += 1;
                        rods.push(rod);
                    }
                }
                SectionKind::Points => {
                    if let Some(point) = parse_point_row(&tokens, line_no)? {
                        num_coupled += 1;
                        points.push(point);
                    }
                }
                SectionKind::Options => {
                    if tokens.len() < 2 {
                        return Err(DescriptorError::ShortLine {
                            section: kind.name(),
                            line: line_no,
                        });
                    }
                    // Option rows read `value key comment...`.
                    options.insert(tokens[1], tokens[0]);
                }
            }
            idx += 1;
        }
    }

    Ok(SystemDescriptor {
        bodies,
        rods,
        points,
        options,
        num_coupled,
    })
}

/// Body rows: `ID Attachment X0 Y0 Z0 r0 p0 y0 ...`. Orientation
/// columns are degrees in the file and radians in memory. Uncoupled
/// rows are skipped entirely.
fn parse_body_row(tokens: &[&str], line_no: usize) -> Result<Option<Body>, DescriptorError> {
    if tokens.len() < 2 {
        return Err(DescriptorError::ShortLine {
            section: "bodies",
            line: line_no,
        });
    }
    let attachment = tokens[1].to_lowercase();
    let coupled =
        attachment.contains("fair") || attachment.contains("coupled") || attachment.contains("ves");
    if !coupled {
        return Ok(None);
    }
    if tokens.len() < 8 {
        return Err(DescriptorError::ShortLine {
            section: "bodies",
            line: line_no,
        });
    }
    let id = parse_i64(tokens[0], line_no)?;
    let mut r6 = [0.0; 6];
    for (slot, token) in r6.iter_mut().zip(&tokens[2..8]) {
        *slot = parse_f64(token, line_no)?;
    }
    for angle in &mut r6[3..] {
        *angle = angle.to_radians();
    }
    Ok(Some(Body {
        id,
        coupling: CouplingMode::Coupled,
        r6,
    }))
}

/// Rod rows: `RodID RodType Attachment Xa Ya Za Xb Yb Zb ...`. The
/// coupled/vessel keyword test is a single case-insensitive check.
fn parse_rod_row(tokens: &[&str], line_no: usize) -> Result<Option<Rod>, DescriptorError> {
    if tokens.len() < 3 {
        return Err(DescriptorError::ShortLine {
            section: "rods",
            line: line_no,
        });
    }
    let attachment = tokens[2].to_lowercase();
    if !attachment.contains("coupled") && !attachment.contains("vessel") {
        return Ok(None);
    }
    if tokens.len() < 9 {
        return Err(DescriptorError::ShortLine {
            section: "rods",
            line: line_no,
        });
    }
    let id = parse_i64(tokens[0], line_no)?;
    let mut end_a = [0.0; 3];
    let mut end_b = [0.0; 3];
    for (slot, token) in end_a.iter_mut().zip(&tokens[3..6]) {
        *slot = parse_f64(token, line_no)?;
    }
    for (slot, token) in end_b.iter_mut().zip(&tokens[6..9]) {
        *slot = parse_f64(token, line_no)?;
    }
    Ok(Some(Rod {
        id,
        coupled: true,
        end_a,
        end_b,
    }))
}

/// Point rows: `ID Attachment X Y Z ...`. Some formats prefix point
/// ids with a letter, so alphabetic characters are stripped before the
/// integer parse.
fn parse_point_row(tokens: &[&str], line_no: usize) -> Result<Option<Point>, DescriptorError> {
    if tokens.len() < 2 {
        return Err(DescriptorError::ShortLine {
            section: "points",
            line: line_no,
        });
    }
    let attachment = tokens[1].to_lowercase();
    let coupled =
        attachment.contains("fair") || attachment.contains("ves") || attachment.contains("couple");
    if !coupled {
        return Ok(None);
    }
    if tokens.len() < 5 {
        return Err(DescriptorError::ShortLine {
            section: "points",
            line: line_no,
        });
    }
    let digits: String = tokens[0].chars().filter(|c| !c.is_alphabetic()).collect();
    let id = parse_i64(&digits, line_no)?;
    let mut r = [0.0; 3];
    for (slot, token) in r.iter_mut().zip(&tokens[2..5]) {
        *slot = parse_f64(token, line_no)?;
    }
    Ok(Some(Point {
        id,
        coupling: CouplingMode::Coupled,
        r,
    }))
}

fn parse_i64(token: &str, line_no: usize) -> Result<i64, DescriptorError> {
    token.parse().map_err(|_| DescriptorError::BadNumber {
        line: line_no,
        token: token.to_owned(),
    })
}

fn parse_f64(token: &str, line_no: usize) -> Result<f64, DescriptorError> {
    token.parse().map_err(|_| DescriptorError::BadNumber {
        line: line_no,
        token: token.to_owned(),
    })
}
